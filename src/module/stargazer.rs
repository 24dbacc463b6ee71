//! Gemini server module (stargazer).
//!
//! Renders the server's INI config from a global options block plus a list
//! of route records, and wires a `stargazer.service` unit that starts the
//! server with that config.
//!
//! # Rendered config
//!
//! ```text
//! listen = 0.0.0.0 [::0]
//! connection-logging = true
//! log-ip = false
//! log-ip-partial = false
//! request-timeout = 5
//! response-timeout = 0
//!
//! [:tls]
//! store = /var/lib/gemini/certs
//! organization = stargazer
//! gen-certs = true
//! regen-certs = true
//!
//! [example.org]
//! root = /srv/gemini/example.org
//! ```
//!
//! The global block and `[:tls]` follow a fixed template order. Route sections
//! follow in the order they were declared.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{Artifact, ServiceModule};
use crate::ini::IniDocument;
use crate::provision::{Dir, Group, Provisioning, Target, User};
use crate::route::RouteRecord;
use crate::schema::{OptionDecl, OptionKind};
use crate::unit::{RestartPolicy, ServiceType, ServiceUnit};

pub const NAME: &str = "stargazer";

/// Service identity used when the user does not pick one.
pub const DEFAULT_USER: &str = "stargazer";
pub const DEFAULT_GROUP: &str = "stargazer";

/// Certificate store provisioned automatically when left at the default.
pub const DEFAULT_STORE: &str = "/var/lib/gemini/certs";

const CONFIG_FILE: &str = "config.ini";
const UNIT_NAME: &str = "stargazer.service";

pub const SCHEMA: &[OptionDecl] = &[
    OptionDecl {
        name: "listen",
        kind: OptionKind::StrList,
        default: "[ \"0.0.0.0\" \"[::0]\" ]",
        description: "Addresses and ports to listen on. The port defaults to 1965.",
    },
    OptionDecl {
        name: "connection-logging",
        kind: OptionKind::Bool,
        default: "true",
        description: "Log connections to stdout.",
    },
    OptionDecl {
        name: "ip-log",
        kind: OptionKind::Bool,
        default: "false",
        description: "Log client IP addresses in the connection log.",
    },
    OptionDecl {
        name: "ip-log-partial",
        kind: OptionKind::Bool,
        default: "false",
        description: "Log only the first half of client IP addresses.",
    },
    OptionDecl {
        name: "request-timeout",
        kind: OptionKind::Int,
        default: "5",
        description: "Seconds a client has to finish sending its request.\n0 disables the timeout.",
    },
    OptionDecl {
        name: "response-timeout",
        kind: OptionKind::Int,
        default: "0",
        description: "Seconds the client has to read the whole response.\n0 disables the timeout.",
    },
    OptionDecl {
        name: "store",
        kind: OptionKind::Path,
        default: DEFAULT_STORE,
        description: "Directory holding TLS certificates.\n\
                      Created automatically only when left at the default.",
    },
    OptionDecl {
        name: "cert-org",
        kind: OptionKind::Str,
        default: "stargazer",
        description: "Organization name written into generated certificates.",
    },
    OptionDecl {
        name: "gen-certs",
        kind: OptionKind::Bool,
        default: "true",
        description: "Generate missing certificates.",
    },
    OptionDecl {
        name: "regen-certs",
        kind: OptionKind::Bool,
        default: "true",
        description: "Regenerate expired certificates.",
    },
    OptionDecl {
        name: "cert-lifetime",
        kind: OptionKind::OptionalStr,
        default: "null",
        description: "Lifetime of generated certificates (e.g. \"1y\", \"6m\").\n\
                      Unset leaves the line out and uses the server default.",
    },
    OptionDecl {
        name: "routes",
        kind: OptionKind::Records,
        default: "[ ]",
        description: "Route sections. Each entry needs a `route` key naming the\n\
                      section; every other key is copied into it verbatim.",
    },
    OptionDecl {
        name: "allow-cgi-user",
        kind: OptionKind::Bool,
        default: "false",
        description: "Grant CAP_SETUID/CAP_SETGID so CGI scripts can run as other users.",
    },
    OptionDecl {
        name: "user",
        kind: OptionKind::Str,
        default: DEFAULT_USER,
        description: "Account the server runs as.\n\
                      Created automatically only when left at the default.",
    },
    OptionDecl {
        name: "group",
        kind: OptionKind::Str,
        default: DEFAULT_GROUP,
        description: "Group the server runs as.\n\
                      Created automatically only when left at the default.",
    },
    OptionDecl {
        name: "package",
        kind: OptionKind::Path,
        default: "/usr",
        description: "Installation prefix; the server binary is <package>/bin/stargazer.",
    },
];

/// Resolved options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct StargazerOptions {
    pub listen: Vec<String>,
    pub connection_logging: bool,
    pub ip_log: bool,
    pub ip_log_partial: bool,
    pub request_timeout: u64,
    pub response_timeout: u64,
    pub store: PathBuf,
    pub cert_org: String,
    pub gen_certs: bool,
    pub regen_certs: bool,
    pub cert_lifetime: Option<String>,
    pub routes: Vec<RouteRecord>,
    pub allow_cgi_user: bool,
    pub user: String,
    pub group: String,
    pub package: PathBuf,
}

impl Default for StargazerOptions {
    fn default() -> Self {
        Self {
            listen: vec!["0.0.0.0".to_string(), "[::0]".to_string()],
            connection_logging: true,
            ip_log: false,
            ip_log_partial: false,
            request_timeout: 5,
            response_timeout: 0,
            store: PathBuf::from(DEFAULT_STORE),
            cert_org: "stargazer".to_string(),
            gen_certs: true,
            regen_certs: true,
            cert_lifetime: None,
            routes: Vec::new(),
            allow_cgi_user: false,
            user: DEFAULT_USER.to_string(),
            group: DEFAULT_GROUP.to_string(),
            package: PathBuf::from("/usr"),
        }
    }
}

/// Render the server config.
pub fn render_config(opts: &StargazerOptions) -> String {
    let mut doc = IniDocument::new();

    doc.global()
        .set("listen", opts.listen.join(" "))
        .set("connection-logging", opts.connection_logging)
        .set("log-ip", opts.ip_log)
        .set("log-ip-partial", opts.ip_log_partial)
        .set("request-timeout", opts.request_timeout)
        .set("response-timeout", opts.response_timeout);

    doc.section(":tls")
        .set("store", opts.store.display())
        .set("organization", &opts.cert_org)
        .set("gen-certs", opts.gen_certs)
        .set("regen-certs", opts.regen_certs)
        .set_opt("cert-lifetime", opts.cert_lifetime.as_deref());

    for route in &opts.routes {
        route.append_to(&mut doc);
    }

    doc.render()
}

/// Build the service unit that runs the server with `config_path`.
pub fn service_unit(opts: &StargazerOptions, config_path: &str) -> ServiceUnit {
    let binary = opts.package.join("bin/stargazer");

    let ambient_capabilities = if opts.allow_cgi_user {
        vec!["CAP_SETGID".to_string(), "CAP_SETUID".to_string()]
    } else {
        Vec::new()
    };

    ServiceUnit {
        name: UNIT_NAME.to_string(),
        description: "stargazer gemini server".to_string(),
        after: vec!["network.target".to_string()],
        wants: Vec::new(),
        wanted_by: vec![Target::MultiUser.unit_name().to_string()],
        service_type: ServiceType::Simple,
        remain_after_exit: false,
        exec_start: format!("{} {}", binary.display(), config_path),
        exec_stop: None,
        restart: RestartPolicy::Always,
        user: Some(opts.user.clone()),
        group: Some(opts.group.clone()),
        ambient_capabilities,
    }
}

/// Provision the default identity and certificate store.
///
/// A user-chosen identity or store path is assumed to exist already.
pub fn provisioning(opts: &StargazerOptions) -> Provisioning {
    let mut p = Provisioning {
        enable: vec![(Target::MultiUser, UNIT_NAME.to_string())],
        ..Provisioning::default()
    };

    if opts.group == DEFAULT_GROUP {
        p.groups.push(Group::new(DEFAULT_GROUP));
    }
    if opts.user == DEFAULT_USER {
        p.users.push(User::system(DEFAULT_USER, opts.group.clone()));
    }
    if opts.store == Path::new(DEFAULT_STORE) {
        p.dirs.push(Dir::owned(DEFAULT_STORE, opts.user.clone(), opts.group.clone()));
    }

    p
}

/// The Gemini server module.
#[derive(Debug, Clone, Default)]
pub struct Stargazer {
    pub options: StargazerOptions,
}

impl Stargazer {
    pub fn new(options: StargazerOptions) -> Self {
        Self { options }
    }
}

impl ServiceModule for Stargazer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn schema(&self) -> &'static [OptionDecl] {
        SCHEMA
    }

    fn config(&self) -> Option<Artifact> {
        Some(Artifact::for_module(
            NAME,
            CONFIG_FILE,
            render_config(&self.options),
        ))
    }

    fn unit(&self, config: Option<&Artifact>) -> ServiceUnit {
        let path = config
            .map(|a| a.path.clone())
            .unwrap_or_else(|| format!("{}/{}/{}", super::CONFIG_ROOT, NAME, CONFIG_FILE));
        service_unit(&self.options, &path)
    }

    fn provisioning(&self) -> Provisioning {
        provisioning(&self.options)
    }
}
