//! DRBD distributed block device module.
//!
//! The config text is installed verbatim at `/etc/drbd.conf`, where `drbdadm`
//! reads it by default. The unit is a oneshot that stays active once every
//! resource is up, and takes them down when it is stopped.

use serde::Deserialize;
use std::path::PathBuf;

use super::{Artifact, ServiceModule};
use crate::provision::{Provisioning, Target};
use crate::schema::{OptionDecl, OptionKind};
use crate::unit::{RestartPolicy, ServiceType, ServiceUnit};

pub const NAME: &str = "drbd";

pub const CONFIG_PATH: &str = "/etc/drbd.conf";
const UNIT_NAME: &str = "drbd.service";
const UDEV_SETTLE: &str = "systemd-udev-settle.service";

pub const SCHEMA: &[OptionDecl] = &[
    OptionDecl {
        name: "config",
        kind: OptionKind::Lines,
        default: "\"\"",
        description: "Contents of drbd.conf. See drbd.conf(5).",
    },
    OptionDecl {
        name: "package",
        kind: OptionKind::Path,
        default: "/usr",
        description: "Installation prefix; drbdadm is <package>/sbin/drbdadm.",
    },
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DrbdOptions {
    pub config: String,
    pub package: PathBuf,
}

impl Default for DrbdOptions {
    fn default() -> Self {
        Self {
            config: String::new(),
            package: PathBuf::from("/usr"),
        }
    }
}

/// Config text, newline terminated unless empty.
pub fn render_config(opts: &DrbdOptions) -> String {
    let mut text = opts.config.clone();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

pub fn service_unit(opts: &DrbdOptions) -> ServiceUnit {
    let drbdadm = opts.package.join("sbin/drbdadm");

    ServiceUnit {
        name: UNIT_NAME.to_string(),
        description: "DRBD distributed block device".to_string(),
        after: vec![UDEV_SETTLE.to_string(), "network.target".to_string()],
        wants: vec![UDEV_SETTLE.to_string()],
        wanted_by: vec![Target::MultiUser.unit_name().to_string()],
        service_type: ServiceType::Oneshot,
        remain_after_exit: true,
        exec_start: format!("{} up all", drbdadm.display()),
        exec_stop: Some(format!("{} down all", drbdadm.display())),
        restart: RestartPolicy::No,
        user: None,
        group: None,
        ambient_capabilities: Vec::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Drbd {
    pub options: DrbdOptions,
}

impl Drbd {
    pub fn new(options: DrbdOptions) -> Self {
        Self { options }
    }
}

impl ServiceModule for Drbd {
    fn name(&self) -> &'static str {
        NAME
    }

    fn schema(&self) -> &'static [OptionDecl] {
        SCHEMA
    }

    fn config(&self) -> Option<Artifact> {
        Some(Artifact::at(CONFIG_PATH, render_config(&self.options)))
    }

    fn unit(&self, _config: Option<&Artifact>) -> ServiceUnit {
        service_unit(&self.options)
    }

    fn provisioning(&self) -> Provisioning {
        Provisioning {
            enable: vec![(Target::MultiUser, UNIT_NAME.to_string())],
            ..Provisioning::default()
        }
    }
}
