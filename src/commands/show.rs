//! Show command - displays information.

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::module::{load_module, schema_for, MODULES};
use crate::schema::{describe, find};

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// List known modules
    Modules,
    /// Show a module's option schema, or a single option
    Options { module: String, option: Option<String> },
    /// Show a module's service unit
    Unit { module: String, json: bool },
    /// Show a module's rendered config file
    Render(String),
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => {
            config.print();
        }
        ShowTarget::Modules => {
            println!("Modules:");
            for name in MODULES {
                let source = match config.options_file(name) {
                    Some(path) => path.display().to_string(),
                    None => "defaults".to_string(),
                };
                println!("  {:<12} options: {}", name, source);
            }
        }
        ShowTarget::Options { module, option } => {
            let decls = schema_for(&module)?;
            match option {
                None => print!("{}", describe(&module, decls)),
                Some(name) => {
                    let Some(decl) = find(decls, &name) else {
                        bail!("Module '{}' has no option '{}'", module, name);
                    };
                    print!("{}", describe(&module, std::slice::from_ref(decl)));
                }
            }
        }
        ShowTarget::Unit { module, json } => {
            let plan = load_module(&module, config.options_file(&module).as_deref())?.plan();
            if json {
                let text = serde_json::to_string_pretty(&plan.unit)
                    .context("Failed to serialize unit")?;
                println!("{}", text);
            } else {
                println!("# {}", plan.unit.name);
                print!("{}", plan.unit.render());
            }
        }
        ShowTarget::Render(module) => {
            let plan = load_module(&module, config.options_file(&module).as_deref())?.plan();
            match plan.config {
                Some(artifact) => {
                    println!("# {}", artifact.path);
                    print!("{}", artifact.contents);
                }
                None => println!("Module '{}' renders no config file", module),
            }
        }
    }
    Ok(())
}
