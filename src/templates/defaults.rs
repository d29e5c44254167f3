/// Built-in templates: `(name, body, attach)`. `View*Logs` take over the terminal;
/// everything else runs detached with its output shown in the main panel.
pub const BUILTIN_TEMPLATES: &[(&str, &str, bool)] = &[
    ("RestartService", "{{ .DockerCompose }} restart {{ .Service.Name }}", false),
    ("RebuildService", "{{ .DockerCompose }} up -d --build {{ .Service.Name }}", false),
    ("RecreateService", "{{ .DockerCompose }} up -d --force-recreate {{ .Service.Name }}", false),
    ("StopService", "{{ .DockerCompose }} stop {{ .Service.Name }}", false),
    ("ServiceLogs", "{{ .DockerCompose }} logs --since=60m --follow {{ .Service.Name }}", false),
    ("ViewServiceLogs", "{{ .DockerCompose }} logs --follow {{ .Service.Name }}", true),
    ("AllLogs", "{{ .DockerCompose }} logs --tail=300 --follow", false),
    ("ViewAllLogs", "{{ .DockerCompose }} logs", true),
    ("DockerComposeConfig", "{{ .DockerCompose }} config", false),
    ("CheckDockerComposeConfig", "{{ .DockerCompose }} config --quiet", false),
    ("ServiceTop", "{{ .DockerCompose }} top {{ .Service.Name }}", false),
    ("ContainerLogs", "docker logs --timestamps --follow --since=60m {{ .Container.ID }}", false),
    ("ViewContainerLogs", "docker logs --timestamps --follow --since=60m {{ .Container.ID }}", true),
    ("RestartContainer", "docker restart {{ .Container.ID }}", false),
    ("StopContainer", "docker stop {{ .Container.ID }}", false),
    ("ContainerTop", "docker top {{ .Container.ID }}", false),
];
