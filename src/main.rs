use anyhow::{Context, Result};
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use crossterm::event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use log::{info, warn};
use marquee::app::{App, UiEvent};
use marquee::config::Config;
use marquee::term::{self as input, Input};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Puts the terminal back the way we found it, even on early return.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide
        )
        .context("prepare terminal")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(
            io::stdout(),
            cursor::Show,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        ) {
            warn!("Failed to restore terminal: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
    }
}

fn draw(frame: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    // Raw mode needs explicit carriage returns.
    write!(stdout, "\x1b[H{}", frame.replace('\n', "\r\n"))?;
    stdout.flush()
}

/// Feeds every pending terminal event to the app. Returns false on quit.
fn pump_input(app: &mut App) -> io::Result<bool> {
    let cell_px = app.config.cell_px;
    while event::poll(Duration::ZERO)? {
        match input::translate(event::read()?, cell_px) {
            Some(Input::Quit) => return Ok(false),
            Some(Input::Ui(event)) => app.handle_event(event),
            None => {}
        }
    }
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting marquee...");

    // Load config
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load config, using defaults: {:#}", e);
            Config::default()
        }
    };
    let frame_time = Duration::from_secs_f64(1.0 / config.fps_cap.max(1) as f64);
    let mut app = App::new(config);

    let mut event_loop: EventLoop<App> =
        EventLoop::try_new().map_err(|e| anyhow::anyhow!("Failed to create event loop: {}", e))?;
    let signal = event_loop.get_signal();

    let guard = TerminalGuard::enter()?;
    match terminal::size() {
        Ok((columns, rows)) => {
            let cell_px = app.config.cell_px;
            app.handle_event(UiEvent::Resize {
                width: columns as f64 * cell_px,
                height: rows as f64 * cell_px,
            });
        }
        Err(e) => warn!("Could not read terminal size, keeping configured width: {}", e),
    }

    let mut last_frame = Instant::now();
    event_loop
        .handle()
        .insert_source(Timer::from_duration(frame_time), move |_, _, app| {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f64();
            last_frame = now;

            let keep_going = match pump_input(app) {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    warn!("Terminal input failed, stopping: {}", e);
                    false
                }
            };

            app.update(dt);
            if let Err(e) = draw(&app.render()) {
                warn!("Could not write frame, stopping: {}", e);
                signal.stop();
                return TimeoutAction::Drop;
            }

            if !keep_going || app.finished() {
                signal.stop();
                return TimeoutAction::Drop;
            }
            TimeoutAction::ToDuration(frame_time)
        })
        .map_err(|e| anyhow::anyhow!("Failed to insert frame timer: {}", e.error))?;

    info!("Starting main loop at {:?} per frame", frame_time);
    let result = event_loop
        .run(Some(frame_time), &mut app, |_| {})
        .map_err(|e| anyhow::anyhow!("Event loop failed: {}", e));

    drop(guard);
    app.shutdown();
    result
}
