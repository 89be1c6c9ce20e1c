use std::time::Duration;

use snake_gate::game::{Action, Direction, EndReason, GameConfig, GameEngine, GameState, Position, Snake};
use snake_gate::session::{Phase, Session};

fn open_state(direction: Direction) -> GameState {
    GameState::new(
        Snake::new(Position::new(7, 7), direction, 3),
        Position::new(0, 0),
        15,
        Duration::from_millis(150),
    )
}

#[test]
fn head_moves_one_cell_for_every_non_reversing_turn() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 1);

    for heading in Direction::ALL {
        for requested in Direction::ALL {
            let mut state = open_state(heading);
            let head = state.snake.head();

            let result = engine.step(&mut state, Action::Move(requested));
            assert!(!result.terminated);

            let expected = if heading.is_opposite(requested) {
                heading
            } else {
                requested
            };
            assert_eq!(state.snake.direction, expected);
            assert_eq!(state.snake.head(), head.moved_in_direction(expected));
            assert_eq!(state.snake.len(), 3);
        }
    }
}

#[test]
fn eating_adds_score_length_and_speed_until_floor() {
    let mut engine = GameEngine::with_seed(GameConfig::new(60), 2);
    let mut state = engine.reset();

    let mut last_interval = state.tick_interval;
    for meal in 1..=25u32 {
        state.food = state.snake.head().moved_in_direction(state.snake.direction);
        let length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.ate_food);
        assert_eq!(state.score, meal * 10);
        assert_eq!(state.snake.len(), length + 1);
        if last_interval > Duration::from_millis(50) {
            assert!(state.tick_interval < last_interval);
        } else {
            assert_eq!(state.tick_interval, Duration::from_millis(50));
        }
        last_interval = state.tick_interval;
    }

    assert_eq!(state.tick_interval, Duration::from_millis(50));
}

#[test]
fn collision_freezes_round_until_restart() {
    let mut session = Session::new(GameEngine::with_seed(GameConfig::default(), 3));
    session.enter_as("Tester").unwrap();

    session.request_direction(Direction::Up);
    let mut reason = None;
    while let Some(result) = session.tick() {
        reason = result.info.end_reason;
    }
    assert_eq!(reason, Some(EndReason::Wall));

    let frozen = session.state().clone();
    for direction in Direction::ALL {
        assert!(!session.request_direction(direction));
    }
    assert!(session.tick().is_none());
    assert_eq!(session.state(), &frozen);

    assert!(session.restart());
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn food_stays_off_the_snake_during_play() {
    let mut engine = GameEngine::with_seed(GameConfig::new(6), 4);
    let mut state = engine.reset();

    // Sweep the board in a serpentine so the snake keeps eating.
    let turns = [Direction::Down, Direction::Left, Direction::Down, Direction::Right];
    let mut turn = 0;
    for _ in 0..500 {
        if !state.is_alive {
            state = engine.reset();
        }
        assert!(!state.snake.contains(state.food) || !state.is_alive);

        let ahead = state.snake.head().moved_in_direction(state.snake.direction);
        let action = if state.is_in_bounds(ahead) {
            Action::Continue
        } else {
            let next = turns[turn % turns.len()];
            turn += 1;
            Action::Move(next)
        };
        engine.step(&mut state, action);
    }
}
