use std::process::Command;

use bollard::Docker;
use bollard::container::ListContainersOptions;
use bollard::image::ListImagesOptions;
use bollard::models::{ContainerSummary, ImageSummary, Volume};
use bollard::volume::ListVolumesOptions;

use crate::model::{ContainerInfo, ImageInfo, VolumeInfo};

const SERVICE_LABEL: &str = "com.docker.compose.service";
const PROJECT_LABEL: &str = "com.docker.compose.project";

/// Wrapper around bollard's Docker client.
pub struct DockerClient {
    client: Docker,
}

impl DockerClient {
    /// Try to connect to the Docker daemon.
    /// Returns None if Docker is not available.
    pub fn try_new() -> Option<Self> {
        let client = Docker::connect_with_local_defaults().ok()?;
        Some(Self { client })
    }

    /// Ping the daemon to verify it is reachable.
    pub async fn is_available(&self) -> bool {
        self.client.ping().await.is_ok()
    }

    /// List containers (running only unless `all`) mapped to our model type.
    pub async fn list_containers(&self, all: bool) -> Result<Vec<ContainerInfo>, String> {
        let options: ListContainersOptions<String> = ListContainersOptions {
            all,
            ..Default::default()
        };
        let summaries = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(|e| e.to_string())?;

        let mut containers: Vec<ContainerInfo> = summaries.iter().map(summary_to_info).collect();
        containers.sort_by(|a, b| state_rank(&a.state).cmp(&state_rank(&b.state)).then_with(|| a.name.cmp(&b.name)));
        Ok(containers)
    }

    pub async fn list_images(&self) -> Result<Vec<ImageInfo>, String> {
        let options: ListImagesOptions<String> = ListImagesOptions {
            all: false,
            ..Default::default()
        };
        let images = self
            .client
            .list_images(Some(options))
            .await
            .map_err(|e| e.to_string())?;
        Ok(images.iter().map(image_to_info).collect())
    }

    pub async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, String> {
        let response = self
            .client
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await
            .map_err(|e| e.to_string())?;
        let mut volumes: Vec<VolumeInfo> = response.volumes.unwrap_or_default().iter().map(volume_to_info).collect();
        volumes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(volumes)
    }
}

/// Ask the compose CLI for the project's service names.
/// `compose_prefix` is the full invocation including `-f` flags, so it goes through the shell.
pub fn list_compose_services(compose_prefix: &str) -> Result<Vec<String>, String> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("{} config --services", compose_prefix))
        .output()
        .map_err(|e| format!("Failed to run {} config: {}", compose_prefix, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(format!("{} config failed: {}", compose_prefix, stderr));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let mut services: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    services.sort();
    Ok(services)
}

// --- Free helper functions ---

fn summary_to_info(s: &ContainerSummary) -> ContainerInfo {
    let id_full = s.id.clone().unwrap_or_default();
    let id_short = short_id(&id_full);

    let name = s.names.as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id_short.clone());

    let label = |key: &str| s.labels.as_ref().and_then(|l| l.get(key)).cloned();

    ContainerInfo {
        id: id_short,
        name,
        image: s.image.clone().unwrap_or_default(),
        state: s.state.clone().unwrap_or_default(),
        status: s.status.clone().unwrap_or_default(),
        uptime: format_uptime(s.created.unwrap_or(0)),
        ports: format_ports(s),
        service: label(SERVICE_LABEL),
        project: label(PROJECT_LABEL),
    }
}

fn image_to_info(i: &ImageSummary) -> ImageInfo {
    let (name, tag) = i
        .repo_tags
        .first()
        .and_then(|t| t.rsplit_once(':'))
        .map(|(n, t)| (n.to_string(), t.to_string()))
        .unwrap_or_else(|| ("<none>".to_string(), "<none>".to_string()));

    ImageInfo {
        id: short_id(i.id.trim_start_matches("sha256:")),
        name,
        tag,
        size: format_size(i.size.max(0) as u64),
        created: chrono::DateTime::from_timestamp(i.created, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    }
}

fn volume_to_info(v: &Volume) -> VolumeInfo {
    VolumeInfo {
        name: v.name.clone(),
        driver: v.driver.clone(),
        mountpoint: v.mountpoint.clone(),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

/// Running containers first, then paused, then everything else.
fn state_rank(state: &str) -> u8 {
    match state {
        "running" => 0,
        "paused" => 1,
        _ => 2,
    }
}

pub fn format_uptime(created_ts: i64) -> String {
    if created_ts == 0 {
        return "unknown".to_string();
    }
    let now = chrono::Utc::now().timestamp();
    let secs = (now - created_ts).max(0) as u64;

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {}m", h, m)
    } else {
        let d = secs / 86400;
        let h = (secs % 86400) / 3600;
        format!("{}d {}h", d, h)
    }
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}{}", bytes, UNITS[0])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

fn format_ports(s: &ContainerSummary) -> String {
    let Some(ports) = &s.ports else { return String::new() };
    let mut parts = Vec::new();
    for p in ports {
        let container_port = p.private_port;
        let proto = p.typ.as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "tcp".to_string());
        if let (Some(ip), Some(pub_port)) = (&p.ip, p.public_port) {
            parts.push(format!("{}:{}->{}/{}", ip, pub_port, container_port, proto));
        } else {
            parts.push(format!("{}/{}", container_port, proto));
        }
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn summary_reads_compose_labels() {
        let summary = ContainerSummary {
            id: Some("0123456789abcdef0123".into()),
            names: Some(vec!["/shop-web-1".into()]),
            state: Some("running".into()),
            labels: Some(HashMap::from([
                (SERVICE_LABEL.to_string(), "web".to_string()),
                (PROJECT_LABEL.to_string(), "shop".to_string()),
            ])),
            ..Default::default()
        };
        let info = summary_to_info(&summary);
        assert_eq!(info.id, "0123456789ab");
        assert_eq!(info.name, "shop-web-1");
        assert_eq!(info.service.as_deref(), Some("web"));
        assert_eq!(info.project.as_deref(), Some("shop"));
        assert_eq!(info.uptime, "unknown");
    }

    #[test]
    fn image_without_tags_is_none() {
        let image = ImageSummary {
            id: "sha256:feedfacecafebeef0000".into(),
            repo_tags: vec![],
            size: 2_500_000,
            ..Default::default()
        };
        let info = image_to_info(&image);
        assert_eq!(info.id, "feedfacecafe");
        assert_eq!(info.name, "<none>");
        assert_eq!(info.size, "2.5MB");
    }

    #[test]
    fn image_tag_splits_on_last_colon() {
        let image = ImageSummary {
            id: "sha256:abc".into(),
            repo_tags: vec!["localhost:5000/app:1.2".into()],
            ..Default::default()
        };
        let info = image_to_info(&image);
        assert_eq!(info.name, "localhost:5000/app");
        assert_eq!(info.tag, "1.2");
    }

    #[test]
    fn size_units() {
        assert_eq!(format_size(999), "999B");
        assert_eq!(format_size(1_500), "1.5KB");
        assert_eq!(format_size(3_000_000_000), "3.0GB");
    }

    #[test]
    fn running_containers_sort_first() {
        assert!(state_rank("running") < state_rank("exited"));
        assert!(state_rank("paused") < state_rank("created"));
    }
}
