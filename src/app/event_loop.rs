use std::time::Instant;

use super::App;

impl App {
    /// Refresh Docker state once per refresh interval.
    pub fn process_tick(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_tick) < self.tick_rate {
            return false;
        }

        let snapshot = self.docker_monitor.refresh();
        self.dashboard.apply_snapshot(snapshot, &mut self.executor);
        if let Some(ref message) = self.docker_monitor.status_message {
            self.dashboard.set_status(Some(message.clone()));
        }

        self.last_tick = now;
        true
    }

    /// Drain the main view's command output.
    pub fn poll_output(&mut self) -> bool {
        self.dashboard.poll_output()
    }

    /// Expire pending confirmation if timed out.
    pub fn expire_pending_action(&mut self) -> bool {
        self.dashboard.expire_pending()
    }
}
