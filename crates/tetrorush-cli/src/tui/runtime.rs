use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use super::{App, event::TuiEvent, event_loop::EventLoop};

const DEFAULT_RATE: f64 = 60.0;

fn interval_from_rate(rate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / rate)
}

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
    keyboard_enhanced: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        let interval = interval_from_rate(DEFAULT_RATE);
        Self {
            events: EventLoop::new(interval, interval),
            keyboard_enhanced: false,
        }
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events.set_tick_interval(interval_from_rate(rate));
    }

    /// Sets the maximum render rate (frames per second).
    pub fn set_render_rate(&mut self, rate: f64) {
        self.events.set_render_interval(interval_from_rate(rate));
    }

    /// Returns whether the terminal reports key release events.
    ///
    /// Without it, every key event is a press and held keys arrive as the terminal's own
    /// auto-repeat.
    #[must_use]
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Runs the application.
    ///
    /// 1. Enables key release reporting if the terminal supports it
    /// 2. Calls `app.init()` for initialization
    /// 3. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()` with the elapsed time
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|term| {
            self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
            if self.keyboard_enhanced {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(
                        KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                            | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    )
                )?;
            }

            app.init(&mut self);
            let result = self.event_loop(term, app);

            if self.keyboard_enhanced {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn event_loop<A>(
        &mut self,
        terminal: &mut ratatui::DefaultTerminal,
        app: &mut A,
    ) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(elapsed) => {
                    app.update(self, elapsed);
                }
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => {
                    app.handle_event(self, event);
                }
            }
        }
        Ok(())
    }
}
