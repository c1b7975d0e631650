use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Line,
};
use tetrorush_engine::{Command, Direction, GameEvent, GameSession, SessionConfig, SessionState};

use crate::{
    high_score::HighScoreStore,
    tui::{App, Runtime},
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay, style},
};

const STATUS_DURATION: Duration = Duration::from_millis(1500);

const INIT_KEYS: &[KeyBinding<'static>] = &[(&["Enter"], "Start"), (&["q"], "Quit")];
const PLAYING_KEYS: &[KeyBinding<'static>] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑"], "Rotate"),
    (&["Space"], "Hard Drop"),
    (&["h", "c"], "Hold"),
    (&["p", "Esc"], "Pause"),
    (&["q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding<'static>] = &[(&["p", "Esc"], "Resume"), (&["q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding<'static>] = &[(&["r"], "Restart"), (&["q"], "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Game(Command),
}

/// Translates a key event into an action.
///
/// Arrow keys become press/release pairs when the terminal reports releases, so the
/// engine can run its own key repeat. Otherwise each press is a single step and the
/// terminal's auto-repeat provides the rest.
fn key_action(key: &KeyEvent, keyboard_enhanced: bool) -> Option<KeyAction> {
    let direction = match key.code {
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Down => Some(Direction::Down),
        _ => None,
    };

    match key.kind {
        KeyEventKind::Repeat => None,
        KeyEventKind::Release => direction.map(|dir| KeyAction::Game(Command::Release(dir))),
        KeyEventKind::Press => {
            if let Some(dir) = direction {
                let command = if keyboard_enhanced {
                    Command::Press(dir)
                } else {
                    Command::Move(dir)
                };
                return Some(KeyAction::Game(command));
            }
            let command = match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(KeyAction::Quit);
                }
                KeyCode::Char('q') => return Some(KeyAction::Quit),
                KeyCode::Up => Command::Rotate,
                KeyCode::Char(' ') => Command::HardDrop,
                KeyCode::Char('h' | 'c') => Command::Hold,
                KeyCode::Esc | KeyCode::Char('p') => Command::TogglePause,
                KeyCode::Char('r') => Command::Restart,
                KeyCode::Enter => Command::Start,
                _ => return None,
            };
            Some(KeyAction::Game(command))
        }
    }
}

fn status_text(event: GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::GameStart => "GO!".to_owned(),
        GameEvent::LineClear { lines: 1 } => "SINGLE".to_owned(),
        GameEvent::LineClear { lines: 2 } => "DOUBLE".to_owned(),
        GameEvent::LineClear { lines } => format!("{lines} LINES"),
        GameEvent::MaxClear { lines: 4 } => "TETRIS!".to_owned(),
        GameEvent::MaxClear { lines } => format!("{lines} LINES!"),
        GameEvent::LevelUp { level } => format!("LEVEL {level}"),
        GameEvent::Move
        | GameEvent::RotateSuccess
        | GameEvent::HardDrop { .. }
        | GameEvent::Lock
        | GameEvent::Hold
        | GameEvent::Pause
        | GameEvent::Resume
        | GameEvent::GameOver { .. } => return None,
    };
    Some(text)
}

#[derive(Debug)]
pub(super) struct PlayApp {
    session: GameSession,
    store: HighScoreStore,
    tick_rate: f64,
    show_ghost: bool,
    status: Option<(String, Duration)>,
    error: Option<anyhow::Error>,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(config: SessionConfig, store: HighScoreStore, tick_rate: f64) -> Self {
        Self {
            session: GameSession::new(config),
            store,
            tick_rate,
            show_ghost: true,
            status: None,
            error: None,
            is_exiting: false,
        }
    }

    pub(super) fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    /// Returns the error that stopped the app, if any.
    pub(super) fn into_result(self) -> anyhow::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn set_status(&mut self, text: String) {
        self.status = Some((text, STATUS_DURATION));
    }

    fn process_events(&mut self) {
        for event in self.session.drain_events() {
            if let GameEvent::GameOver { final_score } = event {
                match self.store.submit(final_score) {
                    Ok(true) => self.set_status("NEW HIGH SCORE!".to_owned()),
                    Ok(false) => {}
                    Err(err) => {
                        self.error = Some(err);
                        self.is_exiting = true;
                    }
                }
            } else if let Some(text) = status_text(event) {
                self.set_status(text);
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(self.tick_rate);
        runtime.set_render_rate(self.tick_rate);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        match key_action(&key, runtime.keyboard_enhanced()) {
            Some(KeyAction::Quit) => self.is_exiting = true,
            Some(KeyAction::Game(command)) => {
                self.session.apply(command);
                self.process_events();
            }
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot, self.store.record().score)
            .show_ghost(self.show_ghost);
        let bindings = match snapshot.state {
            SessionState::Init => INIT_KEYS,
            SessionState::Playing => PLAYING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::GameOver => GAME_OVER_KEYS,
        };

        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(22),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        if let Some((text, _)) = &self.status {
            frame.render_widget(
                Line::styled(text.as_str(), style::STATUS).centered(),
                status_area,
            );
        }
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.session.tick(elapsed);
        self.process_events();

        if let Some((_, remaining)) = &mut self.status {
            *remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                self.status = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use tetrorush_engine::PieceSeed;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_arrow_keys_follow_keyboard_enhancement() {
        assert_eq!(
            key_action(&press(KeyCode::Left), true),
            Some(KeyAction::Game(Command::Press(Direction::Left)))
        );
        assert_eq!(
            key_action(&press(KeyCode::Left), false),
            Some(KeyAction::Game(Command::Move(Direction::Left)))
        );
        assert_eq!(
            key_action(&release(KeyCode::Down), true),
            Some(KeyAction::Game(Command::Release(Direction::Down)))
        );
    }

    #[test]
    fn test_key_mapping() {
        let cases = [
            (KeyCode::Up, Command::Rotate),
            (KeyCode::Char(' '), Command::HardDrop),
            (KeyCode::Char('h'), Command::Hold),
            (KeyCode::Char('c'), Command::Hold),
            (KeyCode::Esc, Command::TogglePause),
            (KeyCode::Char('p'), Command::TogglePause),
            (KeyCode::Char('r'), Command::Restart),
            (KeyCode::Enter, Command::Start),
        ];
        for (code, command) in cases {
            assert_eq!(
                key_action(&press(code), true),
                Some(KeyAction::Game(command)),
                "{code:?}"
            );
        }
        assert_eq!(
            key_action(&press(KeyCode::Char('q')), false),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            key_action(
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                false
            ),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn test_repeat_and_unmapped_keys_are_ignored() {
        let repeat =
            KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(key_action(&repeat, true), None);
        assert_eq!(key_action(&release(KeyCode::Up), true), None);
        assert_eq!(key_action(&press(KeyCode::Char('x')), true), None);
    }

    #[test]
    fn test_game_over_submits_high_score() {
        let dir = env::temp_dir().join(format!("tetrorush-{}-app", process::id()));
        let path = dir.join("highscore.json");
        let store = HighScoreStore::load(&path).unwrap();
        let config = SessionConfig {
            seed: Some(PieceSeed::from_bytes([42; 16])),
            ..SessionConfig::default()
        };
        let mut app = PlayApp::new(config, store, 60.0);
        let mut runtime = Runtime::new();

        app.handle_event(&mut runtime, Event::Key(press(KeyCode::Enter)));
        assert_eq!(app.status.as_ref().map(|(text, _)| text.as_str()), Some("GO!"));
        while app.session.state().is_playing() {
            app.handle_event(&mut runtime, Event::Key(press(KeyCode::Char(' '))));
        }

        assert!(app.session.state().is_game_over());
        let final_score = app.session.stats().score();
        assert!(final_score > 0);
        assert_eq!(app.store.record().score, final_score);
        assert_eq!(
            HighScoreStore::load(&path).unwrap().record().score,
            final_score
        );
        assert!(!app.should_exit());
        app.into_result().unwrap();

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_status_expires_after_updates() {
        let path = env::temp_dir()
            .join(format!("tetrorush-{}-status", process::id()))
            .join("highscore.json");
        let store = HighScoreStore::load(&path).unwrap();
        let mut app = PlayApp::new(SessionConfig::default(), store, 60.0);
        let mut runtime = Runtime::new();

        app.handle_event(&mut runtime, Event::Key(press(KeyCode::Enter)));
        assert!(app.status.is_some());
        app.update(&mut runtime, STATUS_DURATION);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_quit_key_exits() {
        let path = env::temp_dir()
            .join(format!("tetrorush-{}-quit", process::id()))
            .join("highscore.json");
        let store = HighScoreStore::load(&path).unwrap();
        let mut app = PlayApp::new(SessionConfig::default(), store, 60.0);
        let mut runtime = Runtime::new();

        app.handle_event(&mut runtime, Event::Key(press(KeyCode::Char('q'))));
        assert!(app.should_exit());
    }
}
