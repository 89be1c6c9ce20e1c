use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info};

use crate::input::{Gesture, GestureTracker, InputHandler, KeyAction, NameKey};
use crate::render::Renderer;
use crate::session::{Phase, Session};

/// Render at 30 FPS
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive play in the terminal
pub struct HumanMode {
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    gestures: GestureTracker,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            gestures: GestureTracker::default(),
            should_quit: false,
        }
    }

    pub fn with_gestures(mut self, gestures: GestureTracker) -> Self {
        self.gestures = gestures;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.session.metrics().games_played,
            high_score = self.session.high_score(),
            "session ended"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_period = self.session.tick_interval();
        let mut tick_timer = new_tick_timer(tick_period);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.session.tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.session.metrics_mut().update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            self.sync_tick_timer(&mut tick_period, &mut tick_timer);

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Replace the tick timer when the session's pace no longer matches it
    ///
    /// Food and restarts change the interval. The new timer first fires one
    /// full period after the change.
    fn sync_tick_timer(&self, period: &mut Duration, timer: &mut Interval) -> bool {
        let current = self.session.tick_interval();
        if current == *period {
            return false;
        }

        *period = current;
        *timer = new_tick_timer(current);
        debug!(tick_ms = current.as_millis() as u64, "tick timer restarted");
        true
    }

    pub(crate) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                if self.session.phase() == Phase::NameEntry {
                    let name_key = self.input_handler.handle_name_key(key);
                    self.handle_name_key(name_key);
                } else {
                    let action = self.input_handler.handle_key_event(key);
                    self.handle_key_action(action);
                }
            }
            Event::Mouse(mouse) => match self.gestures.handle_mouse_event(mouse) {
                Some(Gesture::Swipe(direction)) => {
                    self.session.request_direction(direction);
                }
                Some(Gesture::Tap) => self.session.tap(),
                None => {}
            },
            _ => {}
        }
    }

    fn handle_name_key(&mut self, key: NameKey) {
        match key {
            NameKey::Char(c) => self.session.type_char(c),
            NameKey::Backspace => self.session.erase_char(),
            NameKey::Submit => {
                self.session.submit_name();
            }
            NameKey::Quit => self.should_quit = true,
            NameKey::None => {}
        }
    }

    fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Move(direction) => {
                self.session.request_direction(direction);
            }
            KeyAction::TogglePause => {
                self.session.toggle_pause();
            }
            KeyAction::Restart => {
                self.session.restart();
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// A tick timer whose first tick is one full period away
fn new_tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameEngine, Position};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn new_mode() -> HumanMode {
        HumanMode::new(Session::new(GameEngine::with_seed(GameConfig::default(), 5)))
    }

    fn named_mode() -> HumanMode {
        let mut mode = new_mode();
        for c in "Ada".chars() {
            mode.handle_event(key(KeyCode::Char(c)));
        }
        mode.handle_event(key(KeyCode::Enter));
        mode
    }

    #[test]
    fn test_name_entry_via_keys() {
        let mut mode = new_mode();
        assert_eq!(mode.session().phase(), Phase::NameEntry);

        // 'q' is text here, not quit
        mode.handle_event(key(KeyCode::Char('q')));
        mode.handle_event(key(KeyCode::Backspace));
        assert!(!mode.should_quit);
        assert_eq!(mode.session().name_input(), "");

        mode.handle_event(key(KeyCode::Enter));
        assert_eq!(mode.session().phase(), Phase::NameEntry);

        let mode = named_mode();
        assert_eq!(mode.session().phase(), Phase::Running);
        assert_eq!(mode.session().player().unwrap().as_str(), "Ada");
    }

    #[test]
    fn test_arrow_key_buffers_direction() {
        let mut mode = named_mode();
        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.session().pending_direction(), Some(Direction::Up));

        // Reversal of the current heading is dropped.
        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.session().pending_direction(), Some(Direction::Up));
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut mode = named_mode();
        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.session().phase(), Phase::Paused);
        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.session().phase(), Phase::Running);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = named_mode();
        let mut release = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        mode.handle_event(Event::Key(release));
        assert_eq!(mode.session().phase(), Phase::Running);
    }

    #[test]
    fn test_swipe_and_tap() {
        let mut mode = named_mode();
        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        mode.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 14));
        mode.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 14));
        assert_eq!(mode.session().pending_direction(), Some(Direction::Down));
        assert_eq!(mode.session().phase(), Phase::Running);

        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        mode.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 10));
        assert_eq!(mode.session().phase(), Phase::Paused);
    }

    #[test]
    fn test_enter_restarts_after_game_over() {
        let mut mode = named_mode();
        mode.handle_event(key(KeyCode::Up));
        while mode.session.tick().is_some() {}
        assert!(matches!(mode.session().phase(), Phase::GameOver(_)));

        mode.handle_event(key(KeyCode::Enter));
        assert_eq!(mode.session().phase(), Phase::Running);
        assert_eq!(mode.session().state().score, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut mode = named_mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);

        let mut mode = new_mode();
        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_quit);
    }

    #[tokio::test]
    async fn test_tick_timer_waits_one_period() {
        let start = Instant::now();
        let mut timer = new_tick_timer(Duration::from_millis(20));
        timer.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_timer_follows_food_and_restart() {
        let mut mode = named_mode();
        let mut period = mode.session().tick_interval();
        let mut timer = new_tick_timer(period);
        assert!(!mode.sync_tick_timer(&mut period, &mut timer));

        // Heading right from the center with food right in front.
        let head = mode.session().state().snake.head();
        mode.session.state_mut().food = head.moved_by(1, 0);
        assert!(mode.session.tick().unwrap().info.ate_food);

        assert!(mode.sync_tick_timer(&mut period, &mut timer));
        assert_eq!(period, Duration::from_millis(145));
        assert_eq!(timer.period(), Duration::from_millis(145));
        assert!(!mode.sync_tick_timer(&mut period, &mut timer));

        let start = Instant::now();
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(145));

        // Die on the top wall, then restart at the initial pace.
        mode.session.state_mut().food = Position::new(0, 14);
        mode.handle_event(key(KeyCode::Up));
        while mode.session.tick().is_some() {}
        assert!(matches!(mode.session().phase(), Phase::GameOver(_)));
        mode.sync_tick_timer(&mut period, &mut timer);

        mode.handle_event(key(KeyCode::Enter));
        assert!(mode.sync_tick_timer(&mut period, &mut timer));
        assert_eq!(period, Duration::from_millis(150));

        let start = Instant::now();
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(150));
    }
}
