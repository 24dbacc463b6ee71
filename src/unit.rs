//! Service unit descriptors and systemd unit-file rendering.

use serde::Serialize;
use std::fmt::Write;

/// When the supervisor restarts the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Never restart (systemd default, key omitted).
    #[default]
    No,
    Always,
    OnFailure,
}

impl RestartPolicy {
    fn directive(&self) -> Option<&'static str> {
        match self {
            RestartPolicy::No => None,
            RestartPolicy::Always => Some("always"),
            RestartPolicy::OnFailure => Some("on-failure"),
        }
    }
}

/// How the supervisor decides the service has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    /// Long-running main process (systemd default, key omitted).
    #[default]
    Simple,
    /// `ExecStart` runs to completion before the unit counts as started.
    Oneshot,
}

impl ServiceType {
    fn directive(&self) -> Option<&'static str> {
        match self {
            ServiceType::Simple => None,
            ServiceType::Oneshot => Some("oneshot"),
        }
    }
}

/// Declarative start/stop/restart/identity directives for one service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceUnit {
    /// Unit file name, e.g. `stargazer.service`.
    pub name: String,
    pub description: String,
    pub after: Vec<String>,
    pub wants: Vec<String>,
    pub wanted_by: Vec<String>,
    pub service_type: ServiceType,
    /// Keep the unit active after `ExecStart` exits, so `ExecStop` only runs
    /// when the unit is stopped.
    pub remain_after_exit: bool,
    pub exec_start: String,
    pub exec_stop: Option<String>,
    pub restart: RestartPolicy,
    pub user: Option<String>,
    pub group: Option<String>,
    pub ambient_capabilities: Vec<String>,
}

impl ServiceUnit {
    /// Render as a systemd unit file. Empty lists and unset values are left
    /// out rather than written as empty assignments.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("[Unit]\n");
        if !self.description.is_empty() {
            let _ = writeln!(out, "Description={}", self.description);
        }
        write_list(&mut out, "After", &self.after);
        write_list(&mut out, "Wants", &self.wants);

        out.push_str("\n[Service]\n");
        if let Some(kind) = self.service_type.directive() {
            let _ = writeln!(out, "Type={}", kind);
        }
        if self.remain_after_exit {
            out.push_str("RemainAfterExit=yes\n");
        }
        let _ = writeln!(out, "ExecStart={}", self.exec_start);
        if let Some(stop) = &self.exec_stop {
            let _ = writeln!(out, "ExecStop={}", stop);
        }
        if let Some(restart) = self.restart.directive() {
            let _ = writeln!(out, "Restart={}", restart);
        }
        if let Some(user) = &self.user {
            let _ = writeln!(out, "User={}", user);
        }
        if let Some(group) = &self.group {
            let _ = writeln!(out, "Group={}", group);
        }
        write_list(&mut out, "AmbientCapabilities", &self.ambient_capabilities);

        if !self.wanted_by.is_empty() {
            out.push_str("\n[Install]\n");
            write_list(&mut out, "WantedBy", &self.wanted_by);
        }

        out
    }
}

fn write_list(out: &mut String, key: &str, values: &[String]) {
    if !values.is_empty() {
        let _ = writeln!(out, "{}={}", key, values.join(" "));
    }
}
