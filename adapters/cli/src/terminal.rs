//! Crossterm backend that plays Treasure Room in a raw-mode terminal.

use std::io::{self, Write};

use anyhow::{Context, Result as AnyResult};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use treasure_room_core::Direction;
use treasure_room_rendering::{
    direction_for_key, Color, FrameInput, Presentation, RenderingBackend, Scene,
};

const HELP: &str = "move with the arrow keys, w/a/s/d or h/j/k/l; q or Esc quits";

/// Puts the terminal into raw mode on an alternate screen until dropped.
#[derive(Debug)]
pub(crate) struct TerminalGuard;

impl TerminalGuard {
    pub(crate) fn enter() -> AnyResult<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .context("failed to enter the alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking source of terminal events.
#[derive(Debug, Default)]
pub(crate) struct TerminalEvents;

impl Iterator for TerminalEvents {
    type Item = io::Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(event::read())
    }
}

/// What a single key press asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Move(Direction),
    Ignore,
}

/// Translates a key press, deferring every direction to [`direction_for_key`].
fn key_action(key: KeyEvent) -> KeyAction {
    let mut buffer = [0; 4];
    let name: &str = match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit
        }
        KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&'q') => return KeyAction::Quit,
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Char(ch) => ch.encode_utf8(&mut buffer),
        _ => return KeyAction::Ignore,
    };
    direction_for_key(name).map_or(KeyAction::Ignore, KeyAction::Move)
}

fn term_color(color: Color) -> TermColor {
    let [r, g, b] = color.to_rgb_u8();
    TermColor::Rgb { r, g, b }
}

/// Draws whole frames onto a writer.
#[derive(Debug)]
struct Screen<W> {
    output: W,
    colored: bool,
}

impl<W: Write> Screen<W> {
    fn draw(&mut self, title: &str, scene: &Scene, background: Color) -> AnyResult<()> {
        if self.colored {
            queue!(self.output, SetBackgroundColor(term_color(background)))?;
        }
        queue!(
            self.output,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print(title),
            Print("\r\n"),
            Print(HELP),
            Print("\r\n\r\n")
        )?;

        for row in scene.rows() {
            for cell in row {
                if self.colored {
                    queue!(self.output, SetForegroundColor(term_color(cell.color)))?;
                }
                queue!(self.output, Print(cell.glyph.symbol()))?;
            }
            queue!(self.output, Print("\r\n"))?;
        }

        let (columns, _) = scene.dimensions();
        if let Some((score, legend)) = scene.labels.split_first() {
            self.label(&score.text, score.color)?;
            self.label(&"-".repeat(columns as usize), scene.divider.color)?;
            for line in legend {
                self.label(&line.text, line.color)?;
            }
        }
        if self.colored {
            queue!(self.output, ResetColor)?;
        }
        self.output.flush().context("failed to flush terminal output")
    }

    fn label(&mut self, text: &str, color: Color) -> AnyResult<()> {
        if self.colored {
            queue!(self.output, SetForegroundColor(term_color(color)))?;
        }
        queue!(self.output, Print(text), Print("\r\n"))?;
        Ok(())
    }
}

/// Key-driven backend that redraws the scene after every move.
#[derive(Debug)]
pub(crate) struct TerminalBackend<E, W> {
    events: E,
    screen: Screen<W>,
}

impl<E, W> TerminalBackend<E, W>
where
    E: Iterator<Item = io::Result<Event>>,
    W: Write,
{
    /// Creates a backend reading key presses from `events` and drawing to
    /// `output`.
    pub(crate) fn new(events: E, output: W, colored: bool) -> Self {
        Self {
            events,
            screen: Screen { output, colored },
        }
    }
}

impl<E, W> RenderingBackend for TerminalBackend<E, W>
where
    E: Iterator<Item = io::Result<Event>>,
    W: Write,
{
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> AnyResult<()>,
    {
        let Presentation {
            window_title,
            clear_color,
            mut scene,
        } = presentation;
        let Self { events, mut screen } = self;

        screen.draw(&window_title, &scene, clear_color)?;
        for event in events {
            let key = match event.context("failed to read terminal event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                _ => continue,
            };
            match key_action(key) {
                KeyAction::Quit => break,
                KeyAction::Move(direction) => {
                    let input = FrameInput {
                        direction: Some(direction),
                    };
                    update_scene(input, &mut scene)?;
                    screen.draw(&window_title, &scene, clear_color)?;
                }
                KeyAction::Ignore => {}
            }
        }
        Ok(())
    }
}
