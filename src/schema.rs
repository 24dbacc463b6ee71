//! Option schema declarations.
//!
//! Every module publishes a static table of [`OptionDecl`]s. The table is the
//! documentation surface (`unitforge show options <module>`); the typed
//! options struct that serde fills in is what the renderer consumes.

use std::fmt::{self, Write};

/// Type of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int,
    Str,
    Path,
    /// Multi-line text copied into a config file.
    Lines,
    StrList,
    /// String that may be left unset; unset options produce no output.
    OptionalStr,
    /// List of free-form route records.
    Records,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Bool => "boolean",
            OptionKind::Int => "integer",
            OptionKind::Str => "string",
            OptionKind::Path => "path",
            OptionKind::Lines => "lines",
            OptionKind::StrList => "list of string",
            OptionKind::OptionalStr => "null or string",
            OptionKind::Records => "list of route records",
        };
        f.write_str(name)
    }
}

/// One user-facing option.
#[derive(Debug, Clone, Copy)]
pub struct OptionDecl {
    /// Key as written in the option file.
    pub name: &'static str,
    pub kind: OptionKind,
    /// Default, as shown to the user.
    pub default: &'static str,
    pub description: &'static str,
}

/// Look up a declaration by name.
pub fn find<'a>(decls: &'a [OptionDecl], name: &str) -> Option<&'a OptionDecl> {
    decls.iter().find(|d| d.name == name)
}

/// Human-readable listing of a module's options.
pub fn describe(module: &str, decls: &[OptionDecl]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Options for {}:", module);
    for decl in decls {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", decl.name);
        let _ = writeln!(out, "    type:    {}", decl.kind);
        let _ = writeln!(out, "    default: {}", decl.default);
        for line in decl.description.lines() {
            let _ = writeln!(out, "    {}", line);
        }
    }
    out
}
