use serde::Serialize;

use crate::model::{DockerSnapshot, PanelContext, PanelKind};
use crate::view::shared::truncate_str;

/// Rows of a side panel, one per item.
pub(crate) fn panel_lines(kind: PanelKind, snapshot: &DockerSnapshot) -> Vec<String> {
    match kind {
        PanelKind::Project => vec![
            snapshot
                .project
                .clone()
                .unwrap_or_else(|| "no compose project".to_string()),
        ],
        PanelKind::Services => snapshot
            .services
            .iter()
            .map(|s| format!("{:<20} {}", truncate_str(&s.name, 20), s.state()))
            .collect(),
        PanelKind::Containers => snapshot
            .containers
            .iter()
            .map(|c| format!("{:<28} {:<8} {}", truncate_str(&c.name, 28), c.state, c.uptime))
            .collect(),
        PanelKind::Images => snapshot
            .images
            .iter()
            .map(|i| format!("{:<28} {:<10} {}", truncate_str(&i.name, 28), truncate_str(&i.tag, 10), i.size))
            .collect(),
        PanelKind::Volumes => snapshot
            .volumes
            .iter()
            .map(|v| format!("{:<8} {}", v.driver, v.name))
            .collect(),
    }
}

pub(crate) fn item_count(kind: PanelKind, snapshot: &DockerSnapshot) -> usize {
    match kind {
        PanelKind::Project => 1,
        PanelKind::Services => snapshot.services.len(),
        PanelKind::Containers => snapshot.containers.len(),
        PanelKind::Images => snapshot.images.len(),
        PanelKind::Volumes => snapshot.volumes.len(),
    }
}

/// Stable identity of the item at `index`, used in the main object key.
pub(crate) fn item_id(kind: PanelKind, snapshot: &DockerSnapshot, index: usize) -> Option<String> {
    match kind {
        PanelKind::Project => snapshot.project.clone(),
        PanelKind::Services => snapshot.services.get(index).map(|s| s.name.clone()),
        PanelKind::Containers => snapshot.containers.get(index).map(|c| c.id.clone()),
        PanelKind::Images => snapshot.images.get(index).map(|i| i.id.clone()),
        PanelKind::Volumes => snapshot.volumes.get(index).map(|v| v.name.clone()),
    }
}

/// Template streamed into the main view for a panel and context, if any.
/// Project templates take no selection.
pub(crate) fn stream_template(kind: PanelKind, context: PanelContext) -> Option<&'static str> {
    match (kind, context) {
        (PanelKind::Project, PanelContext::Logs) => Some("AllLogs"),
        (PanelKind::Project, PanelContext::Config) => Some("DockerComposeConfig"),
        (PanelKind::Services, PanelContext::Logs) => Some("ServiceLogs"),
        (PanelKind::Services, PanelContext::Top) => Some("ServiceTop"),
        (PanelKind::Containers, PanelContext::Logs) => Some("ContainerLogs"),
        (PanelKind::Containers, PanelContext::Top) => Some("ContainerTop"),
        _ => None,
    }
}

/// Pretty JSON of the selected object for the Config context.
pub(crate) fn config_lines(kind: PanelKind, snapshot: &DockerSnapshot, index: usize) -> Vec<String> {
    let json = match kind {
        PanelKind::Services => snapshot.services.get(index).map(to_json),
        PanelKind::Containers => snapshot.containers.get(index).map(to_json),
        PanelKind::Images => snapshot.images.get(index).map(to_json),
        PanelKind::Volumes => snapshot.volumes.get(index).map(to_json),
        PanelKind::Project => None,
    };
    match json {
        Some(Ok(text)) => text.lines().map(str::to_string).collect(),
        Some(Err(e)) => vec![format!("could not render config: {}", e)],
        None => vec![format!("No {} selected", kind.as_str())],
    }
}

fn to_json(value: &impl Serialize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
