//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `generate` - Render modules into the output root
//! - `show` - Display configuration, schemas and rendered artifacts
//! - `clean` - Remove the output root

pub mod clean;
pub mod generate;
pub mod show;

pub use clean::cmd_clean;
pub use generate::cmd_generate;
pub use show::cmd_show;
