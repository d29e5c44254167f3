//! Command templates and their resolution against the current selection.
//!
//! A template body is plain text with `{{ .Path }}` placeholders. Each placeholder
//! reads exactly one binding namespace; resolving a template whose namespace is not
//! bound is a [`TemplateError::MissingBinding`], never an empty substitution.

mod defaults;
mod parse;

use std::collections::BTreeMap;
use std::fmt;

use crate::config::{BulkCommands, CustomCommand, CustomCommands, UserConfig};
use crate::error::TemplateError;
use crate::model::PanelKind;

use parse::Segment;

pub use defaults::BUILTIN_TEMPLATES;

/// Which part of the [`BindingContext`] a placeholder reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Compose,
    Container,
    Service,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Compose => write!(f, "compose project"),
            Namespace::Container => write!(f, "container"),
            Namespace::Service => write!(f, "service"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeholder {
    DockerCompose,
    ContainerId,
    ContainerName,
    ServiceName,
}

impl Placeholder {
    fn parse(token: &str) -> Option<Self> {
        match token.strip_prefix('.')? {
            "DockerCompose" => Some(Placeholder::DockerCompose),
            "Container.ID" => Some(Placeholder::ContainerId),
            "Container.Name" => Some(Placeholder::ContainerName),
            "Service.Name" => Some(Placeholder::ServiceName),
            _ => None,
        }
    }

    pub fn namespace(self) -> Namespace {
        match self {
            Placeholder::DockerCompose => Namespace::Compose,
            Placeholder::ContainerId | Placeholder::ContainerName => Namespace::Container,
            Placeholder::ServiceName => Namespace::Service,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerBinding {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceBinding {
    pub name: String,
}

/// Values available for substitution. The compose prefix is always bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingContext {
    pub compose: String,
    pub container: Option<ContainerBinding>,
    pub service: Option<ServiceBinding>,
}

impl BindingContext {
    /// Context for bulk commands: only the compose prefix.
    pub fn global(compose: impl Into<String>) -> Self {
        Self {
            compose: compose.into(),
            container: None,
            service: None,
        }
    }

    pub fn with_container(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.container = Some(ContainerBinding {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_service(mut self, name: impl Into<String>) -> Self {
        self.service = Some(ServiceBinding { name: name.into() });
        self
    }

    fn lookup(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::DockerCompose => Some(&self.compose),
            Placeholder::ContainerId => self.container.as_ref().map(|c| c.id.as_str()),
            Placeholder::ContainerName => self.container.as_ref().map(|c| c.name.as_str()),
            Placeholder::ServiceName => self.service.as_ref().map(|s| s.name.as_str()),
        }
    }
}

/// A literal command line ready for the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub name: String,
    pub command: String,
    pub attach: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandTemplate {
    pub name: String,
    pub body: String,
    pub attach: bool,
}

impl CommandTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>, attach: bool) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            attach,
        }
    }

    pub fn resolve(&self, ctx: &BindingContext) -> Result<ResolvedCommand, TemplateError> {
        let mut command = String::with_capacity(self.body.len());
        for segment in parse::parse(&self.name, &self.body)? {
            match segment {
                Segment::Literal(text) => command.push_str(text),
                Segment::Placeholder(p) => {
                    let value = ctx.lookup(p).ok_or_else(|| TemplateError::MissingBinding {
                        template: self.name.clone(),
                        namespace: p.namespace(),
                    })?;
                    command.push_str(value);
                }
            }
        }
        Ok(ResolvedCommand {
            name: self.name.clone(),
            command,
            attach: self.attach,
        })
    }

    /// Namespaces this template reads, in order of first use.
    #[cfg(test)]
    fn namespaces(&self) -> Result<Vec<Namespace>, TemplateError> {
        let mut out = Vec::new();
        for segment in parse::parse(&self.name, &self.body)? {
            if let Segment::Placeholder(p) = segment {
                if !out.contains(&p.namespace()) {
                    out.push(p.namespace());
                }
            }
        }
        Ok(out)
    }
}

impl From<&CustomCommand> for CommandTemplate {
    fn from(c: &CustomCommand) -> Self {
        CommandTemplate::new(c.name.clone(), c.command.clone(), c.attach)
    }
}

/// The session's templates: user overrides over built-ins, plus the custom and
/// bulk command menus. Loaded once, never mutated.
#[derive(Clone, Debug)]
pub struct TemplateSet {
    overrides: BTreeMap<String, String>,
    custom: CustomCommands,
    bulk: BulkCommands,
}

impl TemplateSet {
    pub fn new(config: &UserConfig) -> Self {
        let overrides = config
            .command_templates
            .overrides
            .iter()
            .map(|(k, v)| (canonical_name(k), v.clone()))
            .collect();
        Self {
            overrides,
            custom: config.custom_commands.clone(),
            bulk: config.bulk_commands.clone(),
        }
    }

    /// Look up a named template. Overrides replace the body only; the attach flag
    /// belongs to the built-in definition.
    pub fn get(&self, name: &str) -> Option<CommandTemplate> {
        let name = canonical_name(name);
        let builtin = BUILTIN_TEMPLATES.iter().find(|(n, _, _)| *n == name);
        match (self.overrides.get(&name), builtin) {
            (Some(body), Some((_, _, attach))) => Some(CommandTemplate::new(name, body.clone(), *attach)),
            (Some(body), None) => Some(CommandTemplate::new(name, body.clone(), false)),
            (None, Some((n, body, attach))) => Some(CommandTemplate::new(*n, *body, *attach)),
            (None, None) => None,
        }
    }

    pub fn resolve(&self, name: &str, ctx: &BindingContext) -> Result<ResolvedCommand, TemplateError> {
        self.get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))?
            .resolve(ctx)
    }

    /// Custom commands offered for `kind`. A command restricted to named services
    /// is only offered when one of them is selected.
    pub fn custom_commands(&self, kind: PanelKind, service: Option<&str>) -> Vec<CommandTemplate> {
        self.custom
            .for_panel(kind)
            .iter()
            .filter(|c| {
                c.service_names.is_empty()
                    || service.is_some_and(|s| c.service_names.iter().any(|n| n == s))
            })
            .map(CommandTemplate::from)
            .collect()
    }

    pub fn bulk_commands(&self, kind: PanelKind) -> Vec<CommandTemplate> {
        self.bulk.for_panel(kind).iter().map(CommandTemplate::from).collect()
    }
}

/// Config files spell template names in camelCase (`serviceLogs`); lookups use
/// the PascalCase form (`ServiceLogs`).
fn canonical_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
