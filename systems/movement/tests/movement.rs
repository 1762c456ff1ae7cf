use treasure_room_core::{Direction, Grid, Position};
use treasure_room_system_movement::{MovementController, Step};

fn room() -> Grid {
    Grid::new(30, 20).expect("default room dimensions are valid")
}

#[test]
fn interior_steps_enter_neighbouring_tile() {
    let controller = MovementController;
    let grid = room();
    let start = Position::new(3, 3);

    assert_eq!(
        controller.resolve(&grid, start, Direction::Up),
        Step::Enter(Position::new(3, 2))
    );
    assert_eq!(
        controller.resolve(&grid, start, Direction::Down),
        Step::Enter(Position::new(3, 4))
    );
    assert_eq!(
        controller.resolve(&grid, start, Direction::Left),
        Step::Enter(Position::new(2, 3))
    );
    assert_eq!(
        controller.resolve(&grid, start, Direction::Right),
        Step::Enter(Position::new(4, 3))
    );
}

#[test]
fn steps_into_walls_are_blocked() {
    let controller = MovementController;
    let grid = room();

    assert_eq!(
        controller.resolve(&grid, Position::new(5, 1), Direction::Up),
        Step::Blocked
    );
    assert_eq!(
        controller.resolve(&grid, Position::new(5, 18), Direction::Down),
        Step::Blocked
    );
    assert_eq!(
        controller.resolve(&grid, Position::new(1, 7), Direction::Left),
        Step::Blocked
    );
    assert_eq!(
        controller.resolve(&grid, Position::new(28, 7), Direction::Right),
        Step::Blocked
    );
}

#[test]
fn every_resolved_destination_stays_inside_the_walls() {
    let controller = MovementController;
    let grid = room();

    for from in grid.interior() {
        for direction in Direction::ALL {
            if let Step::Enter(to) = controller.resolve(&grid, from, direction) {
                assert!(grid.is_walkable(to));
                assert!((1..=28).contains(&to.x()));
                assert!((1..=18).contains(&to.y()));
                assert_eq!(from.manhattan_distance(to), 1);
            }
        }
    }
}
