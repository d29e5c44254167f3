use std::sync::Arc;

use tracing::{debug, warn};

use crate::docker::{list_compose_services, DockerClient};
use crate::model::{DockerSnapshot, ServiceInfo};

/// Loads Docker state on each refresh tick.
pub struct DockerMonitor {
    client: Option<DockerClient>,
    rt: Arc<tokio::runtime::Runtime>,
    pub docker_available: bool,
    show_all_containers: bool,
    project: Option<String>,
    service_names: Vec<String>,
    pub status_message: Option<String>,
}

impl DockerMonitor {
    pub fn new(
        rt: Arc<tokio::runtime::Runtime>,
        compose_prefix: &str,
        project_name: String,
        show_all_containers: bool,
    ) -> Self {
        let client = DockerClient::try_new();

        // Verify daemon is actually reachable
        let docker_available = if let Some(ref c) = client {
            rt.block_on(c.is_available())
        } else {
            false
        };
        if !docker_available {
            warn!("docker daemon is not reachable");
        }

        // The service list comes from the compose file, which does not change while
        // we run; no compose project means no services panel.
        let (project, service_names) = match list_compose_services(compose_prefix) {
            Ok(names) if !names.is_empty() => (Some(project_name), names),
            Ok(_) => (None, Vec::new()),
            Err(e) => {
                debug!(error = %e, "no compose project");
                (None, Vec::new())
            }
        };

        Self {
            client: if docker_available { client } else { None },
            rt,
            docker_available,
            show_all_containers,
            project,
            service_names,
            status_message: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.docker_available
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Collect a fresh snapshot. Partial failures keep whatever loaded and leave a
    /// status message.
    pub fn refresh(&mut self) -> DockerSnapshot {
        let mut snapshot = DockerSnapshot {
            project: self.project.clone(),
            services: self
                .service_names
                .iter()
                .map(|name| ServiceInfo {
                    name: name.clone(),
                    container: None,
                })
                .collect(),
            ..Default::default()
        };

        let Some(ref client) = self.client else {
            return snapshot;
        };

        let (containers, images, volumes) = self.rt.block_on(async {
            tokio::join!(
                client.list_containers(self.show_all_containers),
                client.list_images(),
                client.list_volumes(),
            )
        });

        self.status_message = None;
        match containers {
            Ok(c) => snapshot.containers = c,
            Err(e) => self.report("containers", e),
        }
        match images {
            Ok(i) => snapshot.images = i,
            Err(e) => self.report("images", e),
        }
        match volumes {
            Ok(v) => snapshot.volumes = v,
            Err(e) => self.report("volumes", e),
        }

        snapshot.link_services();
        snapshot
    }

    fn report(&mut self, what: &str, error: String) {
        warn!(%error, "failed to list {}", what);
        self.status_message = Some(format!("Error listing {}: {}", what, error));
    }
}
