use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use actionbook_loader::load_actions;

use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// Override the configured actions directory
    #[arg(long, value_name = "DIR")]
    pub actions_dir: Option<PathBuf>,

    /// Show each step's description and verb
    #[arg(long)]
    pub verbose: bool,
}

pub async fn cmd_list(args: ListArgs, config: &AppConfig) -> Result<()> {
    let actions_dir = args.actions_dir.as_ref().unwrap_or(&config.actions_dir);
    let table = load_actions(actions_dir)?;

    if table.is_empty() {
        println!("No actions loaded from {}", actions_dir.display());
        return Ok(());
    }

    for (name, definition) in &table {
        if definition.get("type").map_or(false, Value::is_string) {
            println!("- {}", summarize(name, definition));
            if args.verbose {
                print_steps(definition, "    ");
            }
        } else if let Value::Object(children) = definition {
            println!("- {name}:");
            for (child, child_definition) in children {
                println!("  - {}", summarize(&format!("{name}.{child}"), child_definition));
                if args.verbose {
                    print_steps(child_definition, "      ");
                }
            }
        } else {
            println!("- {name}: (not a mapping)");
        }
    }

    Ok(())
}

fn summarize(name: &str, definition: &Value) -> String {
    let kind = definition
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("?");
    match definition.get("steps") {
        None => format!("{name} ({kind}, no steps)"),
        Some(Value::Array(items)) => {
            let plural = if items.len() == 1 { "" } else { "s" };
            format!("{name} ({kind}, {} step{plural})", items.len())
        }
        Some(_) => format!("{name} ({kind}, steps not a sequence)"),
    }
}

fn print_steps(definition: &Value, indent: &str) {
    let Some(Value::Array(items)) = definition.get("steps") else {
        return;
    };
    for (index, raw) in items.iter().enumerate() {
        let desc = raw.get("desc").and_then(Value::as_str).unwrap_or("");
        let verb = raw
            .get("logical")
            .or_else(|| raw.get("action"))
            .and_then(Value::as_str)
            .unwrap_or("?");
        println!("{indent}{}. {verb}: {desc}", index + 1);
    }
}
