//! User configuration: `config.yml` in the per-user config directory, merged over
//! the built-in defaults. Loaded once before the event loop starts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::model::PanelKind;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserConfig {
    pub gui: GuiConfig,
    pub confirm_on_quit: bool,
    pub command_templates: CommandTemplatesConfig,
    pub custom_commands: CustomCommands,
    pub bulk_commands: BulkCommands,
    pub update: UpdateConfig,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            gui: GuiConfig::default(),
            confirm_on_quit: false,
            command_templates: CommandTemplatesConfig::default(),
            custom_commands: CustomCommands::default(),
            bulk_commands: BulkCommands::default(),
            update: UpdateConfig::default(),
        }
    }
}

fn default_bulk_service_commands() -> Vec<CustomCommand> {
    [
        ("up", "{{ .DockerCompose }} up -d", false),
        ("up (attached)", "{{ .DockerCompose }} up", true),
        ("stop", "{{ .DockerCompose }} stop", false),
        ("pull", "{{ .DockerCompose }} pull", true),
        ("build", "{{ .DockerCompose }} build --parallel --force-rm", true),
        ("down", "{{ .DockerCompose }} down", false),
        ("down with volumes", "{{ .DockerCompose }} down --volumes", false),
        ("down with images", "{{ .DockerCompose }} down --rmi all", false),
        ("down with volumes and images", "{{ .DockerCompose }} down --volumes --rmi all", false),
    ]
    .into_iter()
    .map(|(name, command, attach)| CustomCommand {
        name: name.to_string(),
        command: command.to_string(),
        attach,
        service_names: Vec::new(),
    })
    .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuiConfig {
    pub scroll_height: usize,
    pub wrap_main_panel: bool,
    pub return_immediately: bool,
    pub show_all_containers: bool,
    pub show_volumes: bool,
    pub theme: ThemeConfig,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            scroll_height: 2,
            wrap_main_panel: false,
            return_immediately: false,
            show_all_containers: false,
            show_volumes: false,
            theme: ThemeConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub active_border_color: Vec<String>,
    pub inactive_border_color: Vec<String>,
    pub options_text_color: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            active_border_color: vec!["green".to_string(), "bold".to_string()],
            inactive_border_color: vec!["default".to_string()],
            options_text_color: vec!["blue".to_string()],
        }
    }
}

/// `dockerCompose` is the base invocation; every other key overrides the built-in
/// template of the same name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandTemplatesConfig {
    pub docker_compose: String,
    #[serde(flatten)]
    pub overrides: BTreeMap<String, String>,
}

impl Default for CommandTemplatesConfig {
    fn default() -> Self {
        Self {
            docker_compose: "docker-compose".to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCommand {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub attach: bool,
    #[serde(default)]
    pub service_names: Vec<String>,
}

/// Per-panel entries of the custom command menu. A panel missing from the file
/// keeps its default list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomCommands {
    pub containers: Vec<CustomCommand>,
    pub services: Vec<CustomCommand>,
    pub images: Vec<CustomCommand>,
    pub volumes: Vec<CustomCommand>,
}

impl Default for CustomCommands {
    fn default() -> Self {
        Self {
            containers: vec![CustomCommand {
                name: "bash".to_string(),
                command: "docker exec -it {{ .Container.ID }} /bin/sh -c 'eval $(grep ^$(id -un): /etc/passwd | cut -d : -f 7-)'".to_string(),
                attach: true,
                service_names: Vec::new(),
            }],
            services: Vec::new(),
            images: Vec::new(),
            volumes: Vec::new(),
        }
    }
}

impl CustomCommands {
    pub fn for_panel(&self, kind: PanelKind) -> &[CustomCommand] {
        match kind {
            PanelKind::Containers => &self.containers,
            PanelKind::Services | PanelKind::Project => &self.services,
            PanelKind::Images => &self.images,
            PanelKind::Volumes => &self.volumes,
        }
    }
}

/// Per-panel entries of the bulk command menu, merged the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkCommands {
    pub containers: Vec<CustomCommand>,
    pub services: Vec<CustomCommand>,
    pub images: Vec<CustomCommand>,
    pub volumes: Vec<CustomCommand>,
}

impl Default for BulkCommands {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            services: default_bulk_service_commands(),
            images: Vec::new(),
            volumes: Vec::new(),
        }
    }
}

impl BulkCommands {
    pub fn for_panel(&self, kind: PanelKind) -> &[CustomCommand] {
        match kind {
            PanelKind::Containers => &self.containers,
            PanelKind::Services | PanelKind::Project => &self.services,
            PanelKind::Images => &self.images,
            PanelKind::Volumes => &self.volumes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Milliseconds between Docker refreshes.
    pub docker_refresh_interval: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            docker_refresh_interval: 1000,
        }
    }
}

impl UpdateConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.docker_refresh_interval.max(100))
    }
}

/// Everything resolved at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub debug: bool,
    pub user_config: UserConfig,
    pub config_dir: PathBuf,
    pub project_dir: PathBuf,
    /// `dockerCompose` plus one `-f` per compose file, built once per session.
    pub compose_prefix: String,
}

impl AppConfig {
    pub fn load(
        name: &str,
        version: &str,
        project_dir: PathBuf,
        debug: bool,
        compose_files: &[String],
        config_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config_dir = find_or_create_config_dir(name, config_dir)?;
        let user_config = load_user_config(&config_dir)?;
        let compose_prefix = compose_prefix(&user_config.command_templates.docker_compose, compose_files);
        debug!(dir = %config_dir.display(), prefix = %compose_prefix, "loaded config");

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            debug: debug || std::env::var("DEBUG").is_ok_and(|v| v == "TRUE"),
            user_config,
            config_dir,
            project_dir,
            compose_prefix,
        })
    }

    pub fn config_filename(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Compose project name as docker-compose derives it from the directory.
    pub fn project_name(&self) -> String {
        let base = self
            .project_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        base.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect()
    }
}

pub fn compose_prefix(base: &str, compose_files: &[String]) -> String {
    let mut prefix = base.to_string();
    for file in compose_files {
        prefix.push_str(" -f ");
        prefix.push_str(file);
    }
    prefix
}

fn find_or_create_config_dir(name: &str, override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    let dir = match override_dir {
        Some(dir) => dir,
        None => match std::env::var_os("CONFIG_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir().ok_or(ConfigError::NoConfigDir)?.join(name),
        },
    };
    fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

fn load_user_config(dir: &Path) -> Result<UserConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let io_err = |source| ConfigError::Io {
        path: path.clone(),
        source,
    };

    if !path.exists() {
        fs::File::create(&path).map_err(io_err)?;
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(io_err)?;
    if content.trim().is_empty() {
        return Ok(UserConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}
