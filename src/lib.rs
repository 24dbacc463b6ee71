//! Unitforge library exports.
//!
//! Declarative service modules: typed option schemas rendered into daemon
//! config files, systemd units and provisioning fragments at build time.

pub mod atom;
pub mod cache;
pub mod commands;
pub mod config;
pub mod executor;
pub mod ini;
pub mod module;
pub mod options;
pub mod provision;
pub mod route;
pub mod schema;
pub mod timing;
pub mod unit;
