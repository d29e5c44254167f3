use std::fmt;

/// The navigable side panels. `Project` is the fixed header above the tall panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelKind {
    Project,
    Services,
    Containers,
    Images,
    Volumes,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Project,
        PanelKind::Services,
        PanelKind::Containers,
        PanelKind::Images,
        PanelKind::Volumes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Project => "project",
            PanelKind::Services => "services",
            PanelKind::Containers => "containers",
            PanelKind::Images => "images",
            PanelKind::Volumes => "volumes",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Project => "Project",
            PanelKind::Services => "Services",
            PanelKind::Containers => "Containers",
            PanelKind::Images => "Images",
            PanelKind::Volumes => "Volumes",
        }
    }

    /// Main-view contexts this panel can cycle through, in order.
    pub fn contexts(&self) -> &'static [PanelContext] {
        match self {
            PanelKind::Project => &[PanelContext::Logs, PanelContext::Config],
            PanelKind::Services | PanelKind::Containers => {
                &[PanelContext::Logs, PanelContext::Config, PanelContext::Top]
            }
            PanelKind::Images | PanelKind::Volumes => &[PanelContext::Config],
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelContext {
    Logs,
    Config,
    Top,
}

impl PanelContext {
    pub fn title(&self) -> &'static str {
        match self {
            PanelContext::Logs => "Logs",
            PanelContext::Config => "Config",
            PanelContext::Top => "Top",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    /// `None` until the panel has items.
    pub selected_line: Option<usize>,
    pub context_index: usize,
    pub item_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MainPanelState {
    pub object_key: String,
}

/// Cursor and context for every panel, plus the main view's current object.
#[derive(Clone, Debug, Default)]
pub struct PanelStates {
    project: PanelState,
    services: PanelState,
    containers: PanelState,
    images: PanelState,
    volumes: PanelState,
    pub main: MainPanelState,
}

impl PanelStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: PanelKind) -> &PanelState {
        match kind {
            PanelKind::Project => &self.project,
            PanelKind::Services => &self.services,
            PanelKind::Containers => &self.containers,
            PanelKind::Images => &self.images,
            PanelKind::Volumes => &self.volumes,
        }
    }

    fn get_mut(&mut self, kind: PanelKind) -> &mut PanelState {
        match kind {
            PanelKind::Project => &mut self.project,
            PanelKind::Services => &mut self.services,
            PanelKind::Containers => &mut self.containers,
            PanelKind::Images => &mut self.images,
            PanelKind::Volumes => &mut self.volumes,
        }
    }

    pub fn selected(&self, kind: PanelKind) -> Option<usize> {
        self.get(kind).selected_line
    }

    /// Record the item count after a refresh. The first non-empty load selects
    /// line 0; shrinking lists clamp the cursor.
    pub fn set_item_count(&mut self, kind: PanelKind, count: usize) {
        let state = self.get_mut(kind);
        state.item_count = count;
        state.selected_line = match (state.selected_line, count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(line), n) => Some(line.min(n - 1)),
        };
    }

    /// Move the cursor by `delta`, clamped to the list. No wraparound.
    pub fn move_selection(&mut self, kind: PanelKind, delta: isize) {
        let state = self.get_mut(kind);
        if state.item_count == 0 {
            state.selected_line = None;
            return;
        }
        let last = (state.item_count - 1) as isize;
        let current = state.selected_line.map_or(-1, |l| l as isize);
        let next = current.saturating_add(delta).clamp(0, last);
        state.selected_line = Some(next as usize);
    }

    pub fn context(&self, kind: PanelKind) -> PanelContext {
        let contexts = kind.contexts();
        contexts[self.get(kind).context_index % contexts.len()]
    }

    pub fn cycle_context(&mut self, kind: PanelKind) -> PanelContext {
        let count = kind.contexts().len();
        let state = self.get_mut(kind);
        state.context_index = (state.context_index + 1) % count;
        self.context(kind)
    }

    pub fn cycle_context_back(&mut self, kind: PanelKind) -> PanelContext {
        let count = kind.contexts().len();
        let state = self.get_mut(kind);
        state.context_index = (state.context_index + count - 1) % count;
        self.context(kind)
    }

    pub fn set_main_object(&mut self, object_key: impl Into<String>) {
        self.main.object_key = object_key.into();
    }
}
