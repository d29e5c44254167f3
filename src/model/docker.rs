use std::collections::VecDeque;

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContainerInfo {
    pub id: String,           // short ID (first 12 chars)
    pub name: String,
    pub image: String,
    pub state: String,        // "running", "exited", ...
    pub status: String,       // human status from Docker ("Up 2 hours")
    pub uptime: String,
    pub ports: String,
    pub service: Option<String>, // com.docker.compose.service label
    pub project: Option<String>, // com.docker.compose.project label
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub container: Option<ContainerInfo>,
}

impl ServiceInfo {
    pub fn state(&self) -> &str {
        self.container.as_ref().map_or("not created", |c| c.state.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImageInfo {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub size: String,
    pub created: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VolumeInfo {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
}

/// One refresh worth of Docker state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DockerSnapshot {
    pub project: Option<String>,
    pub services: Vec<ServiceInfo>,
    pub containers: Vec<ContainerInfo>,
    pub images: Vec<ImageInfo>,
    pub volumes: Vec<VolumeInfo>,
}

impl DockerSnapshot {
    /// Attach each service to the project container carrying its label.
    pub fn link_services(&mut self) {
        for service in &mut self.services {
            service.container = self
                .containers
                .iter()
                .find(|c| {
                    c.service.as_deref() == Some(service.name.as_str())
                        && (self.project.is_none() || c.project == self.project)
                })
                .cloned();
        }
    }
}

pub const MAIN_BUFFER_CAPACITY: usize = 5000;

/// Lines shown in the main view, with follow/scroll state.
#[derive(Clone, Debug)]
pub struct MainBuffer {
    pub lines: VecDeque<String>,
    pub scroll_offset: usize, // 0 = at bottom (following)
    pub auto_follow: bool,
}

impl Default for MainBuffer {
    fn default() -> Self {
        Self {
            lines: VecDeque::with_capacity(256),
            scroll_offset: 0,
            auto_follow: true,
        }
    }
}

impl MainBuffer {
    pub fn push_line(&mut self, line: String) {
        if self.lines.len() >= MAIN_BUFFER_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn replace(&mut self, lines: impl IntoIterator<Item = String>) {
        *self = Self::default();
        for line in lines {
            self.push_line(line);
        }
    }

    /// Scroll up (positive) or down (negative); reaching the bottom resumes following.
    pub fn scroll(&mut self, delta: isize) {
        let max_offset = self.lines.len().saturating_sub(1);
        let next = (self.scroll_offset as isize).saturating_add(delta).clamp(0, max_offset as isize);
        self.scroll_offset = next as usize;
        self.auto_follow = self.scroll_offset == 0;
    }
}
