use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::{DashboardEvent, Flow, PanelCommand};

use super::App;

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was handled and
/// a render is needed, None if the key was not handled.
pub fn handle_key(app: &mut App, key_event: KeyEvent) -> Option<InputResult> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    // Unbound keys still cancel a pending confirmation.
    let event = match map_key(key_event) {
        Some(event) => event,
        None if app.dashboard.pending().is_some() => DashboardEvent::Back,
        None => return None,
    };

    match app.dashboard.handle(event, &mut app.executor) {
        Flow::Quit => Some(InputResult::Quit),
        Flow::Continue => Some(InputResult::Consumed),
    }
}

/// Key bindings.
pub fn map_key(key_event: KeyEvent) -> Option<DashboardEvent> {
    // ctrl-c quits like `q`, so confirmOnQuit still applies
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(DashboardEvent::Quit);
    }
    if key_event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let event = match key_event.code {
        KeyCode::Char('q') => DashboardEvent::Quit,
        KeyCode::Char('y') | KeyCode::Char('Y') => DashboardEvent::Confirm,
        KeyCode::Esc => DashboardEvent::Back,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => DashboardEvent::NextPanel,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => DashboardEvent::PrevPanel,
        KeyCode::Up | KeyCode::Char('k') => DashboardEvent::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => DashboardEvent::CursorDown,
        KeyCode::PageUp => DashboardEvent::PageUp,
        KeyCode::PageDown => DashboardEvent::PageDown,
        KeyCode::Char(']') => DashboardEvent::NextContext,
        KeyCode::Char('[') => DashboardEvent::PrevContext,
        KeyCode::Enter => DashboardEvent::Select,
        KeyCode::Char(c @ '1'..='5') => DashboardEvent::FocusPanel(c as usize - '1' as usize),
        KeyCode::Char('r') => DashboardEvent::Run(PanelCommand::Restart),
        KeyCode::Char('s') => DashboardEvent::Run(PanelCommand::Stop),
        KeyCode::Char('b') => DashboardEvent::Run(PanelCommand::Rebuild),
        KeyCode::Char('f') => DashboardEvent::Run(PanelCommand::Recreate),
        KeyCode::Char('m') => DashboardEvent::Run(PanelCommand::ViewLogs),
        KeyCode::Char('L') => DashboardEvent::Run(PanelCommand::ViewAllLogs),
        KeyCode::Char('c') => DashboardEvent::OpenCustomMenu,
        KeyCode::Char('B') => DashboardEvent::OpenBulkMenu,
        _ => return None,
    };
    Some(event)
}
