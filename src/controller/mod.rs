//! The dashboard controller.
//!
//! [`Dashboard`] owns every piece of UI state: panel cursors, the focus history,
//! the main view buffer and its output stream, the command menu and the pending
//! confirmation. Input arrives as [`DashboardEvent`]s, Docker state as snapshots,
//! and the renderer receives a [`Frame`]. Nothing here touches the terminal.

mod content;
mod state;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::UserConfig;
use crate::error::TemplateError;
use crate::executor::{CommandExit, Execution, Executor, OutputSource};
use crate::layout::{self, View};
use crate::model::{DockerSnapshot, MainBuffer, PanelKind, PanelStates, ViewId};
use crate::navigation::NavigationStack;
use crate::templates::{BindingContext, ResolvedCommand, TemplateSet};
use crate::view::shared::{printable_line, wrap_line};

pub use state::{Menu, MenuItem, PendingAction, PendingActionKind, CONFIRM_TIMEOUT};

/// Upper bound on lines moved from a stream into the buffer per poll.
const POLL_BATCH: usize = 500;

const CONFIRM_HINT: &str = "y to confirm, any other key to cancel";

/// Built-in actions on the selected service or container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelCommand {
    Restart,
    Stop,
    Rebuild,
    Recreate,
    ViewLogs,
    ViewAllLogs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    Quit,
    Confirm,
    Back,
    NextPanel,
    PrevPanel,
    /// Focus the n-th panel, counting the project header as 0.
    FocusPanel(usize),
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    NextContext,
    PrevContext,
    Select,
    Run(PanelCommand),
    OpenCustomMenu,
    OpenBulkMenu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What one view shows. `first_line` is the first visible row of `lines`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewContent {
    pub lines: Vec<String>,
    pub selected: Option<usize>,
    pub first_line: usize,
}

/// Everything the renderer needs for one draw. Popups come last in `views`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub views: Vec<View>,
    pub contents: BTreeMap<ViewId, ViewContent>,
    pub focused: Option<ViewId>,
}

impl Frame {
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn content(&self, id: ViewId) -> Option<&ViewContent> {
        self.contents.get(&id)
    }
}

pub struct Dashboard {
    templates: TemplateSet,
    compose_prefix: String,
    confirm_on_quit: bool,
    wrap_main: bool,
    show_volumes: bool,
    scroll_height: usize,
    panels: PanelStates,
    nav: NavigationStack,
    snapshot: DockerSnapshot,
    tall_panels: Vec<PanelKind>,
    main: MainBuffer,
    main_title: String,
    stream: Option<Box<dyn OutputSource>>,
    /// Object key the main view was last loaded for.
    synced_key: Option<String>,
    status: Option<String>,
    menu: Option<Menu>,
    pending: Option<PendingAction>,
    page_size: usize,
}

/// Tall panels in display order. Services only exist inside a compose project.
pub fn tall_panels(has_project: bool, show_volumes: bool) -> Vec<PanelKind> {
    let mut panels = Vec::with_capacity(4);
    if has_project {
        panels.push(PanelKind::Services);
    }
    panels.push(PanelKind::Containers);
    panels.push(PanelKind::Images);
    if show_volumes {
        panels.push(PanelKind::Volumes);
    }
    panels
}

impl Dashboard {
    pub fn new(config: &UserConfig, compose_prefix: impl Into<String>, has_project: bool) -> Self {
        let tall = tall_panels(has_project, config.gui.show_volumes);
        let mut nav = NavigationStack::new();
        nav.focus(ViewId::Panel(tall[0]));

        Self {
            templates: TemplateSet::new(config),
            compose_prefix: compose_prefix.into(),
            confirm_on_quit: config.confirm_on_quit,
            wrap_main: config.gui.wrap_main_panel,
            show_volumes: config.gui.show_volumes,
            scroll_height: config.gui.scroll_height.max(1),
            panels: PanelStates::new(),
            nav,
            snapshot: DockerSnapshot::default(),
            tall_panels: tall,
            main: MainBuffer::default(),
            main_title: String::new(),
            stream: None,
            synced_key: None,
            status: None,
            menu: None,
            pending: None,
            page_size: 10,
        }
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.nav.current()
    }

    /// The panel driving the main view: the most recently focused one.
    pub fn focused_panel(&self) -> Option<PanelKind> {
        self.nav.last_matching(|v| v.panel().is_some()).and_then(|v| v.panel())
    }

    pub fn panels(&self) -> &PanelStates {
        &self.panels
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.nav
    }

    pub fn tall_panels(&self) -> &[PanelKind] {
        &self.tall_panels
    }

    pub fn main_buffer(&self) -> &MainBuffer {
        &self.main
    }

    pub fn main_title(&self) -> &str {
        &self.main_title
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: Option<String>) {
        self.status = message;
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Take in a fresh snapshot: update item counts (clamping cursors), rebuild
    /// the panel list and reload the main view if its object changed.
    pub fn apply_snapshot(&mut self, snapshot: DockerSnapshot, exec: &mut dyn Executor) {
        let has_project = snapshot.project.is_some();
        self.snapshot = snapshot;
        for kind in PanelKind::ALL {
            self.panels.set_item_count(kind, content::item_count(kind, &self.snapshot));
        }

        self.tall_panels = tall_panels(has_project, self.show_volumes);
        for kind in PanelKind::ALL {
            if kind != PanelKind::Project && !self.tall_panels.contains(&kind) {
                self.nav.forget(ViewId::Panel(kind));
            }
        }
        if self.focused_panel().is_none() {
            self.nav.focus(ViewId::Panel(self.tall_panels[0]));
        }

        self.sync_main(exec);
        self.refresh_static_main();
    }

    pub fn handle(&mut self, event: DashboardEvent, exec: &mut dyn Executor) -> Flow {
        if let Some(pending) = self.pending.take() {
            return self.resolve_pending(pending, event, exec);
        }
        self.status = None;

        if self.nav.current() == Some(ViewId::Menu) {
            self.handle_menu(event, exec);
            self.sync_main(exec);
            return Flow::Continue;
        }

        match event {
            DashboardEvent::Quit => {
                if !self.confirm_on_quit {
                    return Flow::Quit;
                }
                self.pending = Some(PendingAction::new("Quit?", PendingActionKind::Quit));
            }
            DashboardEvent::Confirm => {}
            DashboardEvent::Back => {
                self.nav.back();
            }
            DashboardEvent::NextPanel => self.cycle_panel(1),
            DashboardEvent::PrevPanel => self.cycle_panel(-1),
            DashboardEvent::FocusPanel(n) => {
                if let Some(kind) = self.panel_order().get(n).copied() {
                    self.nav.focus(ViewId::Panel(kind));
                }
            }
            DashboardEvent::CursorUp => self.move_cursor(-1),
            DashboardEvent::CursorDown => self.move_cursor(1),
            DashboardEvent::PageUp => self.main.scroll(self.page_size as isize),
            DashboardEvent::PageDown => self.main.scroll(-(self.page_size as isize)),
            DashboardEvent::NextContext => {
                if let Some(kind) = self.focused_panel() {
                    self.panels.cycle_context(kind);
                }
            }
            DashboardEvent::PrevContext => {
                if let Some(kind) = self.focused_panel() {
                    self.panels.cycle_context_back(kind);
                }
            }
            DashboardEvent::Select => {
                if self.nav.current().and_then(|v| v.panel()).is_some() {
                    self.nav.focus(ViewId::Main);
                }
            }
            DashboardEvent::Run(command) => self.run_panel_command(command, exec),
            DashboardEvent::OpenCustomMenu => self.open_custom_menu(),
            DashboardEvent::OpenBulkMenu => self.open_bulk_menu(),
        }

        self.sync_main(exec);
        Flow::Continue
    }

    /// Drop a confirmation nobody answered in time. Returns true if one expired.
    pub fn expire_pending(&mut self) -> bool {
        if self.pending.as_ref().is_some_and(PendingAction::is_expired) {
            self.pending = None;
            return true;
        }
        false
    }

    /// Kill the running stream and drop the focus history.
    pub fn shutdown(&mut self) {
        self.stop_stream();
        self.menu = None;
        self.pending = None;
        self.nav.clear();
    }

    /// Move new output from the running stream into the main buffer.
    /// Returns true if anything changed.
    pub fn poll_output(&mut self) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };
        let poll = stream.poll(POLL_BATCH);
        let changed = !poll.lines.is_empty() || poll.exit.is_some();
        for line in poll.lines {
            self.main.push_line(printable_line(&line));
        }

        if let Some(exit) = poll.exit {
            self.stream = None;
            if !exit.success() {
                let message = describe_exit(exit);
                self.main.push_line(format!("[{}]", message));
                self.status = Some(format!("{} {}", self.main_title, message));
            }
        }
        changed
    }

    /// Lay out and fill every view for a `width` x `height` terminal.
    pub fn frame(&mut self, width: u16, height: u16) -> Frame {
        let mut views = layout::compute_layout(width, height, &self.tall_panels);
        let mut contents = BTreeMap::new();
        if layout::is_too_small(width, height) {
            return Frame {
                views,
                contents,
                focused: None,
            };
        }

        for view in &mut views {
            let content = match view.id {
                ViewId::Panel(kind) => {
                    let selected = self.panels.selected(kind);
                    ViewContent {
                        lines: content::panel_lines(kind, &self.snapshot),
                        selected,
                        first_line: first_visible(selected, view.rect.inner_height()),
                    }
                }
                ViewId::Main => {
                    view.title = self.main_title.clone();
                    view.wrap = self.wrap_main;
                    self.page_size = view.rect.inner_height().max(1);
                    self.main_content(view.rect.inner_width(), view.rect.inner_height())
                }
                ViewId::Options => ViewContent {
                    lines: vec![self.options_line()],
                    ..Default::default()
                },
                _ => ViewContent::default(),
            };
            contents.insert(view.id, content);
        }

        if let Some(menu) = &self.menu {
            let labels = menu.labels();
            let widest = labels
                .iter()
                .map(|l| l.chars().count())
                .chain(std::iter::once(menu.title.chars().count()))
                .max()
                .unwrap_or(0);
            let rect = layout::popup_rect(width, height, labels.len(), widest);
            views.push(View {
                id: ViewId::Menu,
                rect,
                title: menu.title.clone(),
                wrap: false,
                focusable: true,
            });
            contents.insert(
                ViewId::Menu,
                ViewContent {
                    first_line: first_visible(Some(menu.selected), rect.inner_height()),
                    lines: labels,
                    selected: Some(menu.selected),
                },
            );
        }

        if let Some(pending) = &self.pending {
            let lines = vec![pending.prompt(), CONFIRM_HINT.to_string()];
            let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let rect = layout::popup_rect(width, height, lines.len(), widest);
            views.push(View {
                id: ViewId::Confirmation,
                rect,
                title: "Confirm".to_string(),
                wrap: true,
                focusable: false,
            });
            contents.insert(
                ViewId::Confirmation,
                ViewContent {
                    lines,
                    ..Default::default()
                },
            );
        }

        Frame {
            views,
            contents,
            focused: self.nav.current(),
        }
    }

    // --- navigation ---

    fn panel_order(&self) -> Vec<PanelKind> {
        std::iter::once(PanelKind::Project)
            .chain(self.tall_panels.iter().copied())
            .collect()
    }

    fn cycle_panel(&mut self, delta: isize) {
        let order = self.panel_order();
        let current = self
            .focused_panel()
            .and_then(|kind| order.iter().position(|k| *k == kind))
            .unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(order.len() as isize) as usize;
        self.nav.focus(ViewId::Panel(order[next]));
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.nav.current() {
            // Up scrolls back through the buffer.
            Some(ViewId::Main) => self.main.scroll(-delta * self.scroll_height as isize),
            Some(ViewId::Panel(kind)) => self.panels.move_selection(kind, delta),
            _ => {}
        }
    }

    // --- commands ---

    fn binding_context(&self, kind: PanelKind) -> BindingContext {
        let mut ctx = BindingContext::global(self.compose_prefix.clone());
        let Some(index) = self.panels.selected(kind) else {
            return ctx;
        };
        match kind {
            PanelKind::Services => {
                if let Some(service) = self.snapshot.services.get(index) {
                    ctx = ctx.with_service(&service.name);
                    if let Some(c) = &service.container {
                        ctx = ctx.with_container(&c.id, &c.name);
                    }
                }
            }
            PanelKind::Containers => {
                if let Some(c) = self.snapshot.containers.get(index) {
                    ctx = ctx.with_container(&c.id, &c.name);
                    if let Some(service) = &c.service {
                        ctx = ctx.with_service(service);
                    }
                }
            }
            _ => {}
        }
        ctx
    }

    fn run_panel_command(&mut self, command: PanelCommand, exec: &mut dyn Executor) {
        let Some(kind) = self.focused_panel() else {
            return;
        };
        let name = match (kind, command) {
            (_, PanelCommand::ViewAllLogs) | (PanelKind::Project, PanelCommand::ViewLogs) => "ViewAllLogs",
            (PanelKind::Services, PanelCommand::Restart) => "RestartService",
            (PanelKind::Services, PanelCommand::Stop) => "StopService",
            (PanelKind::Services, PanelCommand::Rebuild) => "RebuildService",
            (PanelKind::Services, PanelCommand::Recreate) => "RecreateService",
            (PanelKind::Services, PanelCommand::ViewLogs) => "ViewServiceLogs",
            (PanelKind::Containers, PanelCommand::Restart) => "RestartContainer",
            (PanelKind::Containers, PanelCommand::Stop) => "StopContainer",
            (PanelKind::Containers, PanelCommand::ViewLogs) => "ViewContainerLogs",
            _ => {
                self.status = Some(format!("{:?} is not available for {}", command, kind));
                return;
            }
        };

        let ctx = if name == "ViewAllLogs" {
            BindingContext::global(self.compose_prefix.clone())
        } else {
            self.binding_context(kind)
        };
        let resolved = match self.templates.resolve(name, &ctx) {
            Ok(r) => r,
            Err(e) => return self.report_template_error(e),
        };

        if command == PanelCommand::Stop {
            let target = ctx
                .service
                .as_ref()
                .map(|s| s.name.clone())
                .or_else(|| ctx.container.as_ref().map(|c| c.name.clone()))
                .unwrap_or_default();
            self.pending = Some(PendingAction::new(
                format!("Stop {}?", target),
                PendingActionKind::Run(resolved),
            ));
        } else {
            self.execute(resolved, exec);
        }
    }

    fn execute(&mut self, command: ResolvedCommand, exec: &mut dyn Executor) {
        info!(name = %command.name, attach = command.attach, "running command");
        match exec.execute(&command) {
            Err(e) => {
                warn!(error = %e, name = %command.name, "command failed to start");
                self.status = Some(e.to_string());
            }
            Ok(Execution::Attached(exit)) => {
                self.status = (!exit.success()).then(|| format!("{} {}", command.name, describe_exit(exit)));
            }
            Ok(Execution::Detached(source)) => {
                // The output replaces the main view until the selection moves.
                self.stop_stream();
                self.main.replace([format!("$ {}", command.command)]);
                self.main_title = command.name.clone();
                self.panels.set_main_object(format!("command:{}", command.name));
                self.stream = Some(source);
            }
        }
    }

    fn report_template_error(&mut self, error: TemplateError) {
        warn!(%error, "cannot resolve command");
        self.status = Some(error.to_string());
    }

    fn resolve_pending(&mut self, pending: PendingAction, event: DashboardEvent, exec: &mut dyn Executor) -> Flow {
        if event != DashboardEvent::Confirm || pending.is_expired() {
            debug!(action = %pending.description, "confirmation cancelled");
            return Flow::Continue;
        }
        match pending.kind {
            PendingActionKind::Quit => Flow::Quit,
            PendingActionKind::Run(command) => {
                self.execute(command, exec);
                self.sync_main(exec);
                Flow::Continue
            }
        }
    }

    // --- menus ---

    fn open_custom_menu(&mut self) {
        let Some(kind) = self.focused_panel() else {
            return;
        };
        let ctx = self.binding_context(kind);
        let service = ctx.service.as_ref().map(|s| s.name.as_str());
        let items = self
            .templates
            .custom_commands(kind, service)
            .into_iter()
            .map(|template| MenuItem {
                template,
                context: ctx.clone(),
            })
            .collect();
        self.open_menu("Custom Commands", kind, items);
    }

    fn open_bulk_menu(&mut self) {
        let Some(kind) = self.focused_panel() else {
            return;
        };
        let ctx = BindingContext::global(self.compose_prefix.clone());
        let items = self
            .templates
            .bulk_commands(kind)
            .into_iter()
            .map(|template| MenuItem {
                template,
                context: ctx.clone(),
            })
            .collect();
        self.open_menu("Bulk Commands", kind, items);
    }

    fn open_menu(&mut self, title: &str, kind: PanelKind, items: Vec<MenuItem>) {
        if items.is_empty() {
            self.status = Some(format!("No {} for {}", title.to_lowercase(), kind));
            return;
        }
        self.menu = Some(Menu::new(title, items));
        self.nav.focus(ViewId::Menu);
    }

    fn close_menu(&mut self) {
        self.menu = None;
        if self.nav.current() == Some(ViewId::Menu) {
            self.nav.back();
        }
    }

    fn handle_menu(&mut self, event: DashboardEvent, exec: &mut dyn Executor) {
        match event {
            DashboardEvent::CursorUp => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.move_selection(-1);
                }
            }
            DashboardEvent::CursorDown => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.move_selection(1);
                }
            }
            DashboardEvent::Select => {
                let item = self.menu.as_ref().and_then(|m| m.current().cloned());
                self.close_menu();
                if let Some(item) = item {
                    match item.template.resolve(&item.context) {
                        Ok(command) => self.execute(command, exec),
                        Err(e) => self.report_template_error(e),
                    }
                }
            }
            DashboardEvent::Back | DashboardEvent::Quit => self.close_menu(),
            _ => {}
        }
    }

    // --- main view ---

    fn sync_main(&mut self, exec: &mut dyn Executor) {
        let Some(kind) = self.focused_panel() else {
            return;
        };
        let context = self.panels.context(kind);
        let selected = self.panels.selected(kind);
        let id = selected
            .and_then(|i| content::item_id(kind, &self.snapshot, i))
            .unwrap_or_default();
        let key = format!("{}:{}:{}", kind, id, context.title().to_lowercase());
        if self.synced_key.as_deref() == Some(key.as_str()) {
            return;
        }

        debug!(%key, "main view object changed");
        self.synced_key = Some(key.clone());
        self.panels.set_main_object(key);
        self.load_main(kind, selected, exec);
    }

    fn load_main(&mut self, kind: PanelKind, selected: Option<usize>, exec: &mut dyn Executor) {
        self.stop_stream();
        let context = self.panels.context(kind);
        self.main_title = context.title().to_string();

        if kind == PanelKind::Project && self.snapshot.project.is_none() {
            self.main.replace(["No compose project".to_string()]);
            return;
        }
        let Some(index) = selected.filter(|i| *i < content::item_count(kind, &self.snapshot)) else {
            self.main.replace([format!("No {} selected", kind.as_str())]);
            return;
        };

        let Some(template) = content::stream_template(kind, context) else {
            self.main.replace(content::config_lines(kind, &self.snapshot, index));
            return;
        };

        let command = match self.templates.resolve(template, &self.binding_context(kind)) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "cannot load main view");
                self.main.replace([e.to_string()]);
                return;
            }
        };
        match exec.execute(&command) {
            Ok(Execution::Detached(source)) => {
                self.main.replace(Vec::new());
                self.stream = Some(source);
            }
            Ok(Execution::Attached(_)) => self.main.replace(Vec::new()),
            Err(e) => {
                warn!(error = %e, "main view command failed");
                self.main.replace([e.to_string()]);
            }
        }
    }

    /// Static config content follows the snapshot when its object is on screen.
    fn refresh_static_main(&mut self) {
        let Some(kind) = self.focused_panel() else {
            return;
        };
        let Some(index) = self.panels.selected(kind) else {
            return;
        };
        let showing_object = self.synced_key.as_deref() == Some(self.panels.main.object_key.as_str());
        let context = self.panels.context(kind);
        if self.stream.is_some()
            || !showing_object
            || kind == PanelKind::Project
            || content::stream_template(kind, context).is_some()
        {
            return;
        }
        let lines = content::config_lines(kind, &self.snapshot, index);
        if !self.main.lines.iter().eq(lines.iter()) {
            self.main.replace(lines);
        }
    }

    fn stop_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.kill();
        }
    }

    fn main_content(&self, width: usize, height: usize) -> ViewContent {
        let lines: Vec<String> = if self.wrap_main {
            self.main.lines.iter().flat_map(|l| wrap_line(l, width)).collect()
        } else {
            self.main.lines.iter().cloned().collect()
        };
        let bottom = lines.len().saturating_sub(height);
        ViewContent {
            first_line: bottom.saturating_sub(self.main.scroll_offset),
            lines,
            selected: None,
        }
    }

    fn options_line(&self) -> String {
        if let Some(status) = &self.status {
            return status.clone();
        }
        let hints = match self.nav.current() {
            Some(ViewId::Menu) => "↑/↓: navigate | enter: run | esc: close",
            Some(ViewId::Main) => "↑/↓: scroll | pgup/pgdn: page | esc: back | q: quit",
            Some(ViewId::Panel(PanelKind::Services)) => {
                "r: restart | s: stop | b: rebuild | f: recreate | m: logs | c: custom | B: bulk | [/]: tab | enter: focus main | q: quit"
            }
            Some(ViewId::Panel(PanelKind::Containers)) => {
                "r: restart | s: stop | m: logs | c: custom | [/]: tab | enter: focus main | q: quit"
            }
            _ => "←/→: panel | ↑/↓: navigate | [/]: tab | L: all logs | c: custom | B: bulk | q: quit",
        };
        hints.to_string()
    }
}

/// First row to draw so that `selected` stays inside `height` rows.
fn first_visible(selected: Option<usize>, height: usize) -> usize {
    match selected {
        Some(line) if height > 0 && line >= height => line + 1 - height,
        _ => 0,
    }
}

fn describe_exit(exit: CommandExit) -> String {
    match exit.0 {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::error::ExecError;
    use crate::executor::OutputPoll;
    use crate::model::{ContainerInfo, ImageInfo, ServiceInfo, VolumeInfo};

    struct FakeOutput {
        lines: Vec<String>,
        exit: Option<CommandExit>,
        kills: Rc<Cell<usize>>,
    }

    impl OutputSource for FakeOutput {
        fn poll(&mut self, _max_lines: usize) -> OutputPoll {
            OutputPoll {
                lines: std::mem::take(&mut self.lines),
                exit: self.exit.take(),
            }
        }

        fn kill(&mut self) {
            self.kills.set(self.kills.get() + 1);
        }
    }

    #[derive(Default)]
    struct FakeExecutor {
        runs: Vec<ResolvedCommand>,
        kills: Rc<Cell<usize>>,
        stream_exit: Option<CommandExit>,
        stream_lines: Option<Vec<String>>,
    }

    impl FakeExecutor {
        fn names(&self) -> Vec<&str> {
            self.runs.iter().map(|r| r.name.as_str()).collect()
        }

        fn last(&self) -> &ResolvedCommand {
            self.runs.last().expect("no command ran")
        }
    }

    impl Executor for FakeExecutor {
        fn execute(&mut self, command: &ResolvedCommand) -> Result<Execution, ExecError> {
            self.runs.push(command.clone());
            if command.attach {
                return Ok(Execution::Attached(CommandExit(Some(0))));
            }
            Ok(Execution::Detached(Box::new(FakeOutput {
                lines: self
                    .stream_lines
                    .clone()
                    .unwrap_or_else(|| vec![format!("out: {}", command.name)]),
                exit: self.stream_exit,
                kills: Rc::clone(&self.kills),
            })))
        }
    }

    fn container(id: &str, name: &str, service: Option<&str>) -> ContainerInfo {
        ContainerInfo {
            id: id.into(),
            name: name.into(),
            state: "running".into(),
            service: service.map(str::to_string),
            project: service.map(|_| "shop".to_string()),
            ..Default::default()
        }
    }

    fn snapshot() -> DockerSnapshot {
        let web = container("c1", "shop-web-1", Some("web"));
        DockerSnapshot {
            project: Some("shop".into()),
            services: vec![
                ServiceInfo { name: "web".into(), container: Some(web.clone()) },
                ServiceInfo { name: "db".into(), container: None },
            ],
            containers: vec![web, container("c2", "loose", None)],
            images: vec![ImageInfo { id: "i1".into(), name: "nginx".into(), tag: "latest".into(), ..Default::default() }],
            volumes: vec![VolumeInfo { name: "shop_data".into(), driver: "local".into(), ..Default::default() }],
        }
    }

    fn dashboard(config: &UserConfig, exec: &mut FakeExecutor) -> Dashboard {
        let mut dash = Dashboard::new(config, "docker-compose", true);
        dash.apply_snapshot(snapshot(), exec);
        dash
    }

    fn setup() -> (Dashboard, FakeExecutor) {
        let mut exec = FakeExecutor::default();
        let dash = dashboard(&UserConfig::default(), &mut exec);
        (dash, exec)
    }

    #[test]
    fn first_snapshot_streams_selected_service_logs() {
        let (dash, exec) = setup();
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Services)));
        assert_eq!(dash.panels().main.object_key, "services:web:logs");
        assert_eq!(exec.last().command, "docker-compose logs --since=60m --follow web");
        assert!(dash.is_streaming());
        assert_eq!(dash.main_title(), "Logs");
    }

    #[test]
    fn cursor_move_swaps_stream() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::CursorDown, &mut exec);
        assert_eq!(dash.panels().main.object_key, "services:db:logs");
        assert_eq!(exec.runs.len(), 2);
        assert_eq!(exec.kills.get(), 1);
    }

    #[test]
    fn unchanged_object_is_not_reloaded() {
        let (mut dash, mut exec) = setup();
        dash.apply_snapshot(snapshot(), &mut exec);
        dash.handle(DashboardEvent::CursorUp, &mut exec);
        assert_eq!(exec.runs.len(), 1);
    }

    #[test]
    fn panel_cycling_wraps_around() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::PrevPanel, &mut exec);
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Project)));
        dash.handle(DashboardEvent::PrevPanel, &mut exec);
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Images)));
        dash.handle(DashboardEvent::NextPanel, &mut exec);
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Project)));
        assert_eq!(exec.last().name, "AllLogs");
    }

    #[test]
    fn select_focuses_main_and_back_returns() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::FocusPanel(2), &mut exec);
        dash.handle(DashboardEvent::Select, &mut exec);
        assert_eq!(dash.focused(), Some(ViewId::Main));
        assert_eq!(dash.focused_panel(), Some(PanelKind::Containers));
        dash.handle(DashboardEvent::Back, &mut exec);
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Containers)));
    }

    #[test]
    fn missing_binding_leaves_state_alone() {
        let mut exec = FakeExecutor::default();
        let mut dash = Dashboard::new(&UserConfig::default(), "docker-compose", true);
        let mut empty = snapshot();
        empty.containers.clear();
        dash.apply_snapshot(empty, &mut exec);
        dash.handle(DashboardEvent::FocusPanel(2), &mut exec);
        let ran = exec.runs.len();

        dash.handle(DashboardEvent::Run(PanelCommand::Restart), &mut exec);
        assert_eq!(exec.runs.len(), ran);
        assert_eq!(dash.status(), Some("'RestartContainer' needs a selected container"));
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Containers)));
        assert_eq!(dash.panels().selected(PanelKind::Containers), None);
    }

    #[test]
    fn stop_waits_for_confirmation() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::Run(PanelCommand::Stop), &mut exec);
        assert!(!exec.names().contains(&"StopService"));
        assert_eq!(dash.pending().map(|p| p.description.as_str()), Some("Stop web?"));

        dash.handle(DashboardEvent::Confirm, &mut exec);
        assert!(dash.pending().is_none());
        assert_eq!(exec.last().command, "docker-compose stop web");
    }

    #[test]
    fn expired_confirmation_is_dropped() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::Run(PanelCommand::Stop), &mut exec);
        if let Some(pending) = dash.pending.as_mut() {
            pending.expires = Instant::now() - Duration::from_millis(1);
        }
        assert!(dash.expire_pending());
        assert!(dash.pending().is_none());
        assert!(!dash.expire_pending());
    }

    #[test]
    fn late_confirm_does_not_run() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::Run(PanelCommand::Stop), &mut exec);
        if let Some(pending) = dash.pending.as_mut() {
            pending.expires = Instant::now() - Duration::from_millis(1);
        }
        dash.handle(DashboardEvent::Confirm, &mut exec);
        assert!(dash.pending().is_none());
        assert!(!exec.names().contains(&"StopService"));
    }

    #[test]
    fn any_other_key_cancels_confirmation() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::Run(PanelCommand::Stop), &mut exec);
        dash.handle(DashboardEvent::CursorDown, &mut exec);
        assert!(dash.pending().is_none());
        assert!(!exec.names().contains(&"StopService"));
        assert_eq!(dash.panels().selected(PanelKind::Services), Some(0));
    }

    #[test]
    fn view_logs_runs_attached() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::Run(PanelCommand::ViewLogs), &mut exec);
        assert_eq!(exec.last().name, "ViewServiceLogs");
        assert!(exec.last().attach);
        assert_eq!(dash.status(), None);
    }

    #[test]
    fn container_commands_bind_the_service_label() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::FocusPanel(2), &mut exec);
        assert_eq!(exec.last().command, "docker logs --timestamps --follow --since=60m c1");
        dash.handle(DashboardEvent::Run(PanelCommand::Restart), &mut exec);
        assert_eq!(exec.last().command, "docker restart c1");
    }

    #[test]
    fn unsupported_command_sets_status() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::FocusPanel(3), &mut exec);
        let ran = exec.runs.len();
        dash.handle(DashboardEvent::Run(PanelCommand::Rebuild), &mut exec);
        assert_eq!(exec.runs.len(), ran);
        assert!(dash.status().is_some_and(|s| s.contains("images")));
    }

    #[test]
    fn bulk_menu_runs_item_and_returns_focus() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::OpenBulkMenu, &mut exec);
        assert_eq!(dash.focused(), Some(ViewId::Menu));
        dash.handle(DashboardEvent::CursorDown, &mut exec);
        dash.handle(DashboardEvent::Select, &mut exec);

        assert_eq!(exec.last().name, "up (attached)");
        assert_eq!(exec.last().command, "docker-compose up");
        assert!(dash.menu().is_none());
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Services)));
    }

    #[test]
    fn escape_closes_menu_without_running() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::FocusPanel(2), &mut exec);
        dash.handle(DashboardEvent::OpenCustomMenu, &mut exec);
        assert_eq!(dash.menu().map(|m| m.labels()), Some(vec!["bash".to_string()]));
        let ran = exec.runs.len();
        dash.handle(DashboardEvent::Back, &mut exec);
        assert_eq!(exec.runs.len(), ran);
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Containers)));
    }

    #[test]
    fn empty_menu_is_not_opened() {
        let mut config = UserConfig::default();
        config.gui.show_volumes = true;
        let mut exec = FakeExecutor::default();
        let mut dash = dashboard(&config, &mut exec);
        dash.handle(DashboardEvent::FocusPanel(4), &mut exec);
        dash.handle(DashboardEvent::OpenCustomMenu, &mut exec);
        assert!(dash.menu().is_none());
        assert_eq!(dash.status(), Some("No custom commands for volumes"));
    }

    #[test]
    fn detached_command_output_stays_until_selection_moves() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::OpenBulkMenu, &mut exec);
        dash.handle(DashboardEvent::Select, &mut exec);
        assert_eq!(exec.last().name, "up");
        assert_eq!(dash.main_title(), "up");
        assert_eq!(dash.panels().main.object_key, "command:up");

        let ran = exec.runs.len();
        dash.apply_snapshot(snapshot(), &mut exec);
        assert_eq!(exec.runs.len(), ran);
        assert_eq!(dash.main_title(), "up");

        dash.handle(DashboardEvent::CursorDown, &mut exec);
        assert_eq!(dash.panels().main.object_key, "services:db:logs");
    }

    #[test]
    fn config_context_shows_object_json() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::NextContext, &mut exec);
        assert_eq!(dash.panels().main.object_key, "services:web:config");
        assert!(!dash.is_streaming());
        assert_eq!(exec.runs.len(), 1);
        assert!(dash.main_buffer().lines.iter().any(|l| l.contains("\"name\": \"web\"")));
    }

    #[test]
    fn services_panel_disappears_without_project() {
        let (mut dash, mut exec) = setup();
        let mut loose = snapshot();
        loose.project = None;
        loose.services.clear();
        dash.apply_snapshot(loose, &mut exec);
        assert!(!dash.tall_panels().contains(&PanelKind::Services));
        assert_eq!(dash.focused(), Some(ViewId::Panel(PanelKind::Containers)));
    }

    #[test]
    fn default_left_column_has_three_panels() {
        let (mut dash, _exec) = setup();
        assert_eq!(dash.tall_panels(), &[PanelKind::Services, PanelKind::Containers, PanelKind::Images]);

        let frame = dash.frame(120, 40);
        let heights: Vec<u16> = dash
            .tall_panels()
            .iter()
            .filter_map(|kind| frame.view(ViewId::Panel(*kind)))
            .map(|view| view.rect.height())
            .collect();
        assert_eq!(heights.len(), 3);
        assert_eq!(heights.iter().sum::<u16>(), 40 - 4);
    }

    #[test]
    fn volumes_panel_follows_config() {
        let mut config = UserConfig::default();
        config.gui.show_volumes = true;
        let mut exec = FakeExecutor::default();
        let dash = dashboard(&config, &mut exec);
        assert_eq!(
            dash.tall_panels(),
            &[PanelKind::Services, PanelKind::Containers, PanelKind::Images, PanelKind::Volumes]
        );
    }

    #[test]
    fn quit_with_confirmation() {
        let mut config = UserConfig::default();
        config.confirm_on_quit = true;
        let mut exec = FakeExecutor::default();
        let mut dash = dashboard(&config, &mut exec);

        assert_eq!(dash.handle(DashboardEvent::Quit, &mut exec), Flow::Continue);
        assert!(dash.pending().is_some());
        assert_eq!(dash.handle(DashboardEvent::Confirm, &mut exec), Flow::Quit);

        let (mut plain, mut exec) = setup();
        assert_eq!(plain.handle(DashboardEvent::Quit, &mut exec), Flow::Quit);
    }

    #[test]
    fn failed_stream_reports_exit_status() {
        let mut exec = FakeExecutor {
            stream_exit: Some(CommandExit(Some(1))),
            ..Default::default()
        };
        let mut dash = dashboard(&UserConfig::default(), &mut exec);
        assert!(dash.poll_output());
        assert!(!dash.is_streaming());
        let lines: Vec<&String> = dash.main_buffer().lines.iter().collect();
        assert_eq!(lines, ["out: ServiceLogs", "[exited with status 1]"]);
        assert_eq!(dash.status(), Some("Logs exited with status 1"));
        assert!(!dash.poll_output());
    }

    #[test]
    fn streamed_lines_are_made_printable() {
        let mut exec = FakeExecutor {
            stream_lines: Some(vec!["\x1b[36mweb_1 |\x1b[0m\tready\r".to_string()]),
            ..Default::default()
        };
        let mut dash = dashboard(&UserConfig::default(), &mut exec);
        assert!(dash.poll_output());
        let lines: Vec<&String> = dash.main_buffer().lines.iter().collect();
        assert_eq!(lines, ["web_1 | ready"]);
    }

    #[test]
    fn main_scroll_uses_scroll_height() {
        let (mut dash, mut exec) = setup();
        dash.poll_output();
        for i in 0..20 {
            dash.main.push_line(format!("line {}", i));
        }
        dash.handle(DashboardEvent::Select, &mut exec);
        dash.handle(DashboardEvent::CursorUp, &mut exec);
        assert_eq!(dash.main_buffer().scroll_offset, 2);
        assert!(!dash.main_buffer().auto_follow);
        dash.handle(DashboardEvent::CursorDown, &mut exec);
        assert!(dash.main_buffer().auto_follow);
    }

    #[test]
    fn shutdown_kills_stream_and_clears_history() {
        let (mut dash, exec) = setup();
        dash.shutdown();
        assert!(!dash.is_streaming());
        assert_eq!(exec.kills.get(), 1);
        assert!(dash.navigation().is_empty());
    }

    #[test]
    fn degraded_frame_has_single_view() {
        let (mut dash, _) = setup();
        let frame = dash.frame(5, 5);
        assert_eq!(frame.views.len(), 1);
        assert_eq!(frame.views[0].id, ViewId::Limit);
        assert_eq!(frame.focused, None);
    }

    #[test]
    fn frame_reflects_focus_and_selection() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::CursorDown, &mut exec);
        let frame = dash.frame(120, 40);

        assert_eq!(frame.focused, Some(ViewId::Panel(PanelKind::Services)));
        let services = frame.content(ViewId::Panel(PanelKind::Services)).unwrap();
        assert_eq!(services.selected, Some(1));
        assert_eq!(services.lines.len(), 2);
        assert_eq!(frame.view(ViewId::Main).map(|v| v.title.as_str()), Some("Logs"));
        assert!(frame.content(ViewId::Options).is_some_and(|c| c.lines[0].contains("restart")));
    }

    #[test]
    fn frame_adds_popups_last() {
        let (mut dash, mut exec) = setup();
        dash.handle(DashboardEvent::Run(PanelCommand::Stop), &mut exec);
        let frame = dash.frame(120, 40);
        assert_eq!(frame.views.last().map(|v| v.id), Some(ViewId::Confirmation));
        let prompt = frame.content(ViewId::Confirmation).map(|c| c.lines[0].as_str());
        assert_eq!(prompt, Some("Stop web? (y/n)"));
    }

    #[test]
    fn first_visible_keeps_selection_in_view() {
        assert_eq!(first_visible(None, 5), 0);
        assert_eq!(first_visible(Some(4), 5), 0);
        assert_eq!(first_visible(Some(9), 5), 5);
        assert_eq!(first_visible(Some(3), 0), 0);
    }
}
