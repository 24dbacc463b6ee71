//! Plan executor - writes a module's artifacts into an output root.
//!
//! This is the single place where generated files touch the disk. Modules
//! only describe WHAT they produce; paths under the output root mirror the
//! target system's layout.
//!
//! ```text
//! <root>/etc/unitforge/<module>/<config>          rendered config
//! <root>/usr/lib/systemd/system/<unit>            service unit
//! <root>/etc/systemd/system/<target>.wants/<unit> enable link
//! <root>/usr/lib/sysusers.d/<module>.conf         users and groups
//! <root>/usr/lib/tmpfiles.d/<module>.conf         directories
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cache::needs_write;
use crate::module::ModulePlan;
use crate::provision::{render_sysusers, render_tmpfiles, Op, Target};

const UNIT_DIR: &str = "usr/lib/systemd/system";
const SYSUSERS_DIR: &str = "usr/lib/sysusers.d";
const TMPFILES_DIR: &str = "usr/lib/tmpfiles.d";

/// Where generated files go.
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Output root standing in for `/` of the target system.
    pub root: PathBuf,
}

impl InstallContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an absolute target-system path into the output root.
    pub fn resolve(&self, system_path: &str) -> PathBuf {
        self.root.join(system_path.trim_start_matches('/'))
    }
}

/// What an install changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Files or links created or rewritten.
    pub written: Vec<PathBuf>,
    /// Files already holding the generated content.
    pub unchanged: Vec<PathBuf>,
    /// Fragments left over from an earlier install that no longer apply.
    pub removed: Vec<PathBuf>,
}

impl InstallReport {
    fn record(&mut self, path: PathBuf, written: bool) {
        if written {
            self.written.push(path);
        } else {
            self.unchanged.push(path);
        }
    }
}

/// Install every artifact of `plan` under the context root.
pub fn install(ctx: &InstallContext, plan: &ModulePlan) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    info!("Installing {}...", plan.name);

    if let Some(config) = &plan.config {
        let dst = ctx.resolve(&config.path);
        let written = write_if_changed(&dst, &config.contents)
            .with_context(|| format!("in module '{}': config {}", plan.name, config.path))?;
        report.record(dst, written);
    }

    let unit_path = ctx.root.join(UNIT_DIR).join(&plan.unit.name);
    let written = write_if_changed(&unit_path, &plan.unit.render())
        .with_context(|| format!("in module '{}': unit {}", plan.name, plan.unit.name))?;
    report.record(unit_path, written);

    let ops = plan.provisioning.ops();

    let sysusers = ctx
        .root
        .join(SYSUSERS_DIR)
        .join(format!("{}.conf", plan.name));
    install_fragment(&sysusers, &render_sysusers(&ops), &mut report)
        .with_context(|| format!("in module '{}': sysusers.d fragment", plan.name))?;

    let tmpfiles = ctx
        .root
        .join(TMPFILES_DIR)
        .join(format!("{}.conf", plan.name));
    install_fragment(&tmpfiles, &render_tmpfiles(&ops), &mut report)
        .with_context(|| format!("in module '{}': tmpfiles.d fragment", plan.name))?;

    for op in &ops {
        if let Op::Enable { unit, target } = op {
            let (link, created) = enable_unit(ctx, unit, *target)
                .with_context(|| format!("in module '{}': {:?}", plan.name, op))?;
            report.record(link, created);
        }
    }

    info!(
        "  {}: {} written, {} unchanged, {} removed",
        plan.name,
        report.written.len(),
        report.unchanged.len(),
        report.removed.len()
    );
    Ok(report)
}

/// Write a sysusers.d/tmpfiles.d fragment. An empty fragment means the
/// module provisions nothing of that kind, so a file from a previous install
/// is deleted.
fn install_fragment(path: &Path, contents: &str, report: &mut InstallReport) -> Result<()> {
    if !contents.is_empty() {
        let written = write_if_changed(path, contents)?;
        report.record(path.to_path_buf(), written);
    } else if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        debug!("removed: {}", path.display());
        report.removed.push(path.to_path_buf());
    }
    Ok(())
}

/// Write `contents` to `path` unless it already holds exactly that.
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if !needs_write(path, contents.as_bytes()) {
        debug!("unchanged: {}", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("wrote: {}", path.display());
    Ok(true)
}

/// Link `unit` into the target's wants directory.
/// Returns the link path and whether it was created.
fn enable_unit(ctx: &InstallContext, unit: &str, target: Target) -> Result<(PathBuf, bool)> {
    let wants_dir = ctx.root.join(target.wants_dir());
    fs::create_dir_all(&wants_dir)?;

    let link = wants_dir.join(unit);
    let dest = PathBuf::from(format!("/{}/{}", UNIT_DIR, unit));
    let created = create_symlink_if_missing(&dest, &link)?;
    Ok((link, created))
}

/// Create a symlink unless one already points at `target`.
/// A link pointing elsewhere is replaced.
fn create_symlink_if_missing(target: &Path, link: &Path) -> Result<bool> {
    if link.is_symlink() {
        let current = fs::read_link(link)
            .with_context(|| format!("Failed to read link {}", link.display()))?;
        if current == target {
            return Ok(false);
        }
        fs::remove_file(link)
            .with_context(|| format!("Failed to replace link {}", link.display()))?;
    }

    symlink(target, link).with_context(|| {
        format!(
            "Failed to link {} -> {}",
            link.display(),
            target.display()
        )
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Artifact, ModulePlan};
    use crate::provision::{Dir, Group, Provisioning, User};
    use crate::unit::ServiceUnit;
    use tempfile::TempDir;

    fn demo_plan() -> ModulePlan {
        ModulePlan {
            name: "demo".to_string(),
            config: Some(Artifact::for_module("demo", "demo.ini", "a = 1\n".to_string())),
            unit: ServiceUnit {
                name: "demo.service".to_string(),
                exec_start: "/usr/bin/demo /etc/unitforge/demo/demo.ini".to_string(),
                ..ServiceUnit::default()
            },
            provisioning: Provisioning {
                groups: vec![Group::new("demo")],
                users: vec![User::system("demo", "demo")],
                dirs: vec![Dir::owned("/var/lib/demo", "demo", "demo")],
                enable: vec![(Target::MultiUser, "demo.service".to_string())],
            },
        }
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let ctx = InstallContext::new("/tmp/out");
        assert_eq!(
            ctx.resolve("/etc/drbd.conf"),
            PathBuf::from("/tmp/out/etc/drbd.conf")
        );
    }

    #[test]
    fn test_install_writes_layout() {
        let dir = TempDir::new().unwrap();
        let ctx = InstallContext::new(dir.path());

        let report = install(&ctx, &demo_plan()).unwrap();
        assert_eq!(report.written.len(), 5);
        assert!(report.unchanged.is_empty());

        let root = dir.path();
        assert_eq!(
            fs::read_to_string(root.join("etc/unitforge/demo/demo.ini")).unwrap(),
            "a = 1\n"
        );
        assert!(root.join("usr/lib/systemd/system/demo.service").is_file());
        assert_eq!(
            fs::read_to_string(root.join("usr/lib/sysusers.d/demo.conf")).unwrap(),
            "g demo -\nu demo -:demo - -\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("usr/lib/tmpfiles.d/demo.conf")).unwrap(),
            "d /var/lib/demo - demo demo -\n"
        );

        let link = root.join("etc/systemd/system/multi-user.target.wants/demo.service");
        assert_eq!(
            fs::read_link(link).unwrap(),
            PathBuf::from("/usr/lib/systemd/system/demo.service")
        );
    }

    #[test]
    fn test_second_install_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let ctx = InstallContext::new(dir.path());

        install(&ctx, &demo_plan()).unwrap();
        let report = install(&ctx, &demo_plan()).unwrap();
        assert!(report.written.is_empty(), "rewrote: {:?}", report.written);
        assert_eq!(report.unchanged.len(), 5);
    }

    #[test]
    fn test_changed_config_is_rewritten() {
        let dir = TempDir::new().unwrap();
        let ctx = InstallContext::new(dir.path());
        install(&ctx, &demo_plan()).unwrap();

        let mut plan = demo_plan();
        plan.config = Some(Artifact::for_module("demo", "demo.ini", "a = 2\n".to_string()));
        let report = install(&ctx, &plan).unwrap();

        assert_eq!(
            report.written,
            [dir.path().join("etc/unitforge/demo/demo.ini")]
        );
    }

    #[test]
    fn test_empty_fragments_not_written() {
        let dir = TempDir::new().unwrap();
        let ctx = InstallContext::new(dir.path());

        let mut plan = demo_plan();
        plan.provisioning = Provisioning::default();
        install(&ctx, &plan).unwrap();

        assert!(!dir.path().join("usr/lib/sysusers.d/demo.conf").exists());
        assert!(!dir.path().join("usr/lib/tmpfiles.d/demo.conf").exists());
    }

    #[test]
    fn test_fragments_removed_when_provisioning_drops() {
        let dir = TempDir::new().unwrap();
        let ctx = InstallContext::new(dir.path());
        install(&ctx, &demo_plan()).unwrap();

        let mut plan = demo_plan();
        plan.provisioning.users.clear();
        plan.provisioning.groups.clear();
        plan.provisioning.dirs.clear();
        let report = install(&ctx, &plan).unwrap();

        let sysusers = dir.path().join("usr/lib/sysusers.d/demo.conf");
        let tmpfiles = dir.path().join("usr/lib/tmpfiles.d/demo.conf");
        assert!(!sysusers.exists());
        assert!(!tmpfiles.exists());
        assert_eq!(report.removed, [sysusers, tmpfiles]);
        assert!(report.written.is_empty());

        let again = install(&ctx, &plan).unwrap();
        assert!(again.removed.is_empty());
    }

    #[test]
    fn test_stale_link_is_replaced() {
        let dir = TempDir::new().unwrap();
        let ctx = InstallContext::new(dir.path());
        let wants = dir.path().join(Target::MultiUser.wants_dir());
        fs::create_dir_all(&wants).unwrap();
        symlink("/wrong/place", wants.join("demo.service")).unwrap();

        install(&ctx, &demo_plan()).unwrap();
        assert_eq!(
            fs::read_link(wants.join("demo.service")).unwrap(),
            PathBuf::from("/usr/lib/systemd/system/demo.service")
        );
    }
}
