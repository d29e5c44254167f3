use std::time::{Duration, Instant};

use crate::templates::{BindingContext, CommandTemplate, ResolvedCommand};

pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Pending destructive action awaiting confirmation.
#[derive(Clone, Debug)]
pub struct PendingAction {
    pub description: String,
    pub kind: PendingActionKind,
    pub expires: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingActionKind {
    Run(ResolvedCommand),
    Quit,
}

impl PendingAction {
    pub fn new(description: impl Into<String>, kind: PendingActionKind) -> Self {
        Self {
            description: description.into(),
            kind,
            expires: Instant::now() + CONFIRM_TIMEOUT,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires
    }

    pub fn prompt(&self) -> String {
        format!("{} (y/n)", self.description)
    }
}

/// One runnable entry of the custom or bulk command menu. The binding context is
/// captured when the menu opens.
#[derive(Clone, Debug)]
pub struct MenuItem {
    pub template: CommandTemplate,
    pub context: BindingContext,
}

#[derive(Clone, Debug)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl Menu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: 0,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = (self.items.len() - 1) as isize;
        self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
    }

    pub fn current(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(|i| i.template.name.clone()).collect()
    }
}
