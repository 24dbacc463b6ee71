//! Provisioning directives that accompany a service unit.
//!
//! A module describes what the system must have before its service can
//! start (an identity, a state directory, a wants link) as [`Op`]s. The
//! executor installs them as sysusers.d / tmpfiles.d fragments and symlinks.
//!
//! # Example
//!
//! ```
//! use unitforge::provision::{Dir, Group, Provisioning, Target, User};
//!
//! let p = Provisioning {
//!     groups: vec![Group::new("stargazer")],
//!     users: vec![User::system("stargazer", "stargazer")],
//!     dirs: vec![Dir::owned("/var/lib/gemini/certs", "stargazer", "stargazer")],
//!     enable: vec![(Target::MultiUser, "stargazer.service".to_string())],
//! };
//! assert_eq!(p.ops().len(), 4);
//! ```

use std::fmt::Write;

/// Install target whose `.wants` directory receives the enable link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// multi-user.target.wants
    MultiUser,
}

impl Target {
    pub fn unit_name(&self) -> &'static str {
        match self {
            Target::MultiUser => "multi-user.target",
        }
    }

    /// Wants directory, relative to the output root.
    pub fn wants_dir(&self) -> &'static str {
        match self {
            Target::MultiUser => "etc/systemd/system/multi-user.target.wants",
        }
    }
}

/// A system service account. The UID is allocated from the system range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    /// Primary group.
    pub group: String,
}

impl User {
    pub fn system(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A directory that must exist with the given owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dir {
    /// Absolute path on the target system.
    pub path: String,
    pub mode: Option<u32>,
    pub user: String,
    pub group: String,
}

impl Dir {
    pub fn owned(path: impl Into<String>, user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: None,
            user: user.into(),
            group: group.into(),
        }
    }
}

/// A single provisioning operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Group(Group),
    User(User),
    Dir(Dir),
    /// Link `unit` into the target's wants directory.
    Enable { unit: String, target: Target },
}

/// Everything a module needs provisioned next to its unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provisioning {
    pub groups: Vec<Group>,
    pub users: Vec<User>,
    pub dirs: Vec<Dir>,
    pub enable: Vec<(Target, String)>,
}

impl Provisioning {
    /// Flatten into ops. Groups come before users so a user's primary group
    /// always exists when the user is created.
    pub fn ops(&self) -> Vec<Op> {
        let mut ops = Vec::new();

        for group in &self.groups {
            ops.push(Op::Group(group.clone()));
        }
        for user in &self.users {
            ops.push(Op::User(user.clone()));
        }
        for dir in &self.dirs {
            ops.push(Op::Dir(dir.clone()));
        }
        for (target, unit) in &self.enable {
            ops.push(Op::Enable {
                unit: unit.clone(),
                target: *target,
            });
        }

        ops
    }
}

/// Render the identity ops as a sysusers.d fragment.
pub fn render_sysusers(ops: &[Op]) -> String {
    let mut out = String::new();
    for op in ops {
        match op {
            Op::Group(group) => {
                let _ = writeln!(out, "g {} -", group.name);
            }
            Op::User(user) => {
                let _ = writeln!(out, "u {} -:{} - -", user.name, user.group);
            }
            _ => {}
        }
    }
    out
}

/// Render the directory ops as a tmpfiles.d fragment.
pub fn render_tmpfiles(ops: &[Op]) -> String {
    let mut out = String::new();
    for op in ops {
        if let Op::Dir(dir) = op {
            let mode = dir
                .mode
                .map(|m| format!("{:04o}", m))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "d {} {} {} {} -", dir.path, mode, dir.user, dir.group);
        }
    }
    out
}
