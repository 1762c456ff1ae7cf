use std::{fs, path::Path};

use anyhow::{Context, Result};
use treasure_room_world::GameConfig;

/// Command-line values that take precedence over the configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
}

/// Loads the game configuration, layering `overrides` over the optional file.
///
/// A missing seed is filled from system entropy so every run differs unless
/// one is pinned.
pub(crate) fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = overrides.width {
        config.width = width;
    }
    if let Some(height) = overrides.height {
        config.height = height;
    }
    config.seed = overrides
        .seed
        .or(config.seed)
        .or_else(|| Some(rand::random()));

    Ok(config)
}

fn load(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("invalid game configuration toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_parse_and_overrides_replace_defaults() {
        let config = parse("width = 12\nheight = 9\nseed = 4\n").expect("parse");
        assert_eq!((config.width, config.height, config.seed), (12, 9, Some(4)));

        let resolved = resolve(
            None,
            Overrides {
                seed: Some(8),
                width: Some(16),
                height: None,
            },
        )
        .expect("resolve");
        assert_eq!(resolved.width, 16);
        assert_eq!(resolved.height, 20);
        assert_eq!(resolved.seed, Some(8));
    }

    #[test]
    fn missing_seed_is_filled() {
        let resolved = resolve(None, Overrides::default()).expect("resolve");
        assert!(resolved.seed.is_some());
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(parse("width = \"wide\"").is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let error = resolve(
            Some(Path::new("/definitely/not/here.toml")),
            Overrides::default(),
        )
        .expect_err("missing file");
        assert!(error.to_string().contains("failed to read config file"));
    }
}
