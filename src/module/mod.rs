//! Declarative service modules.
//!
//! A module turns resolved options into everything the system needs to run
//! one daemon. It describes WHAT is produced; the executor decides where it
//! lands on disk.
//!
//! ```text
//! options (TOML)  →  ServiceModule  →  ModulePlan  →  executor
//!                     config()          config artifact
//!                     unit()            service unit
//!                     provisioning()    users, groups, dirs, wants links
//! ```
//!
//! Nothing here touches the filesystem, so a plan computed twice from the same
//! options is identical.

pub mod drbd;
pub mod stargazer;

use anyhow::{bail, Result};
use std::path::Path;

use crate::options::load_options;
use crate::provision::Provisioning;
use crate::schema::OptionDecl;
use crate::unit::ServiceUnit;

pub use drbd::Drbd;
pub use stargazer::Stargazer;

/// Directory that holds generated config files on the target system.
pub const CONFIG_ROOT: &str = "/etc/unitforge";

/// Every module this tool knows, by name.
pub const MODULES: &[&str] = &[stargazer::NAME, drbd::NAME];

/// A generated config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute path on the target system.
    pub path: String,
    pub contents: String,
}

impl Artifact {
    /// Artifact under this tool's per-module config directory.
    pub fn for_module(module: &str, file_name: &str, contents: String) -> Self {
        Self {
            path: format!("{}/{}/{}", CONFIG_ROOT, module, file_name),
            contents,
        }
    }

    /// Artifact at a fixed path the daemon looks up by itself.
    pub fn at(path: impl Into<String>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Everything one module produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulePlan {
    pub name: String,
    pub config: Option<Artifact>,
    pub unit: ServiceUnit,
    pub provisioning: Provisioning,
}

/// A module: resolved options in, config artifact and service wiring out.
pub trait ServiceModule {
    /// Module name, also used for the option file and config directory.
    fn name(&self) -> &'static str;

    /// Option declarations shown to the user.
    fn schema(&self) -> &'static [OptionDecl];

    /// Rendered config file, if the daemon takes one.
    fn config(&self) -> Option<Artifact>;

    /// Service unit. `config` is the artifact returned by [`Self::config`].
    fn unit(&self, config: Option<&Artifact>) -> ServiceUnit;

    /// Identities, directories and wants links the unit relies on.
    fn provisioning(&self) -> Provisioning;

    fn plan(&self) -> ModulePlan {
        let config = self.config();
        let unit = self.unit(config.as_ref());
        ModulePlan {
            name: self.name().to_string(),
            config,
            unit,
            provisioning: self.provisioning(),
        }
    }
}

/// Registry entry: how to find a module's schema and build it from options.
struct Registration {
    name: &'static str,
    schema: &'static [OptionDecl],
    load: fn(Option<&Path>) -> Result<Box<dyn ServiceModule>>,
}

const REGISTRY: &[Registration] = &[
    Registration {
        name: stargazer::NAME,
        schema: stargazer::SCHEMA,
        load: load_stargazer,
    },
    Registration {
        name: drbd::NAME,
        schema: drbd::SCHEMA,
        load: load_drbd,
    },
];

fn load_stargazer(options: Option<&Path>) -> Result<Box<dyn ServiceModule>> {
    Ok(Box::new(Stargazer::new(load_options(options)?)))
}

fn load_drbd(options: Option<&Path>) -> Result<Box<dyn ServiceModule>> {
    Ok(Box::new(Drbd::new(load_options(options)?)))
}

fn registration(name: &str) -> Result<&'static Registration> {
    match REGISTRY.iter().find(|r| r.name == name) {
        Some(registration) => Ok(registration),
        None => bail!(
            "Unknown module '{}'. Available: {}",
            name,
            MODULES.join(", ")
        ),
    }
}

/// Option declarations for a module, by name.
pub fn schema_for(name: &str) -> Result<&'static [OptionDecl]> {
    Ok(registration(name)?.schema)
}

/// Build a module from an option file (defaults when `options` is `None`).
pub fn load_module(name: &str, options: Option<&Path>) -> Result<Box<dyn ServiceModule>> {
    (registration(name)?.load)(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_loads_with_defaults() {
        for name in MODULES {
            let module = load_module(name, None).unwrap();
            assert_eq!(module.name(), *name);
            assert!(!module.schema().is_empty());
            assert_eq!(schema_for(name).unwrap().len(), module.schema().len());
        }
    }

    #[test]
    fn test_registry_matches_module_list() {
        let registered: Vec<&str> = REGISTRY.iter().map(|r| r.name).collect();
        assert_eq!(registered, MODULES);
    }

    #[test]
    fn test_unknown_module_lists_available() {
        let err = load_module("gopher", None).err().expect("unknown module must fail");
        let msg = err.to_string();
        assert!(msg.contains("gopher"));
        assert!(msg.contains("stargazer"));
        assert!(msg.contains("drbd"));
        assert!(schema_for("gopher").is_err());
    }

    #[test]
    fn test_artifact_for_module_path() {
        let artifact = Artifact::for_module("demo", "config.ini", String::new());
        assert_eq!(artifact.path, "/etc/unitforge/demo/config.ini");
    }

    #[test]
    fn test_plan_is_deterministic() {
        for name in MODULES {
            let a = load_module(name, None).unwrap().plan();
            let b = load_module(name, None).unwrap().plan();
            assert_eq!(a, b);
        }
    }
}
