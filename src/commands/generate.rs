//! Generate command - renders modules into the output root.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::executor::{install, InstallContext};
use crate::module::{load_module, MODULES};
use crate::timing::Timer;

/// Arguments for the generate command.
#[derive(Debug, Default)]
pub struct GenerateArgs {
    /// Single module to generate (all when None)
    pub module: Option<String>,
    /// Explicit option file, only valid with a single module
    pub options: Option<PathBuf>,
    /// Output root overriding the configured one
    pub output: Option<PathBuf>,
}

/// Totals across all generated modules.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub modules: usize,
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
}

/// Execute the generate command.
pub fn cmd_generate(config: &Config, args: GenerateArgs) -> Result<GenerateSummary> {
    if args.options.is_some() && args.module.is_none() {
        bail!("--options requires a module name (the file applies to one module)");
    }

    let names: Vec<&str> = match &args.module {
        Some(name) => vec![name.as_str()],
        None => MODULES.to_vec(),
    };

    let root = args.output.unwrap_or_else(|| config.output_dir.clone());
    let ctx = InstallContext::new(root);
    info!("Generating into {}", ctx.root.display());

    let mut summary = GenerateSummary::default();
    for name in names {
        let timer = Timer::start(name);

        let options = args
            .options
            .clone()
            .or_else(|| config.options_file(name));
        match &options {
            Some(path) => info!("{}: options from {}", name, path.display()),
            None => info!("{}: no option file, using defaults", name),
        }

        let module = load_module(name, options.as_deref())
            .with_context(|| format!("Failed to load module '{}'", name))?;
        let report = install(&ctx, &module.plan())?;

        summary.modules += 1;
        summary.written += report.written.len();
        summary.unchanged += report.unchanged.len();
        summary.removed += report.removed.len();
        timer.finish();
    }

    println!(
        "Generated {} module(s): {} file(s) written, {} unchanged, {} removed",
        summary.modules, summary.written, summary.unchanged, summary.removed
    );
    Ok(summary)
}
