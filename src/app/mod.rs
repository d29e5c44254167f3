mod event_loop;
mod render;
mod input;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;

use crate::config::AppConfig;
use crate::controller::Dashboard;
use crate::docker_controller::DockerMonitor;
use crate::executor::ShellExecutor;
use crate::view::{Presenter, Theme};

pub use input::{map_key, InputResult};

/// Longest the loop sleeps waiting for input, so streamed output keeps flowing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    let _ = disable_raw_mode();
}

/// Main application state and event loop.
pub struct App {
    pub dashboard: Dashboard,
    pub docker_monitor: DockerMonitor,
    pub executor: ShellExecutor,
    pub presenter: Presenter<io::Stdout>,
    pub last_tick: Instant,
    pub tick_rate: Duration,
}

impl App {
    pub fn new(rt: Arc<tokio::runtime::Runtime>, config: &AppConfig) -> Self {
        let user = &config.user_config;
        let tick_rate = user.update.refresh_interval();
        let docker_monitor = DockerMonitor::new(
            rt,
            &config.compose_prefix,
            config.project_name(),
            user.gui.show_all_containers,
        );

        let mut dashboard = Dashboard::new(user, config.compose_prefix.clone(), docker_monitor.project().is_some());
        if !docker_monitor.is_available() {
            dashboard.set_status(Some("Cannot reach the Docker daemon".to_string()));
        }

        Self {
            dashboard,
            docker_monitor,
            executor: ShellExecutor::new(user.gui.return_immediately),
            presenter: Presenter::new(io::stdout(), Theme::from_config(&user.gui.theme)),
            last_tick: Instant::now().checked_sub(tick_rate).unwrap_or_else(Instant::now),
            tick_rate,
        }
    }
}

/// Run the application. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(should_quit: Arc<AtomicBool>, config: &AppConfig) -> io::Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()?,
    );
    let mut app = App::new(Arc::clone(&rt), config);

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Clear(ClearType::All), cursor::Hide)?;
    info!(project = ?app.docker_monitor.project(), "dashboard started");

    let result = event_loop(&mut app, &should_quit);
    app.dashboard.shutdown();
    restore_terminal();
    result
}

fn event_loop(app: &mut App, should_quit: &AtomicBool) -> io::Result<()> {
    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            break;
        }

        if app.expire_pending_action() {
            needs_render = true;
        }
        if app.process_tick() {
            needs_render = true;
        }
        if app.poll_output() {
            needs_render = true;
        }

        if needs_render {
            render::render(app)?;
            needs_render = false;
        }

        let timeout = app.tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout.min(POLL_INTERVAL))? {
            match event::read()? {
                Event::Key(key_event) => match input::handle_key(app, key_event) {
                    Some(InputResult::Quit) => break,
                    Some(InputResult::Consumed) => needs_render = true,
                    None => {}
                },
                Event::Resize(..) => needs_render = true,
                _ => {}
            }
        }
    }
    Ok(())
}
