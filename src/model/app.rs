use std::fmt;

use super::PanelKind;

/// Identity of a view. Stable across layout passes; geometry is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    Panel(PanelKind),
    Main,
    Options,
    Menu,
    Confirmation,
    Limit, // the "Not Enough Space" placeholder
}

impl ViewId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewId::Panel(kind) => kind.as_str(),
            ViewId::Main => "main",
            ViewId::Options => "options",
            ViewId::Menu => "menu",
            ViewId::Confirmation => "confirmation",
            ViewId::Limit => "limit",
        }
    }

    pub fn panel(&self) -> Option<PanelKind> {
        match self {
            ViewId::Panel(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
