use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;

use actionbook_core_types::{ActionKind, ExecutableStep, StepDefinition};
use actionbook_loader::load_actions;
use actionbook_registry::CapabilityRegistry;

use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Override the configured actions directory
    #[arg(long, value_name = "DIR")]
    pub actions_dir: Option<PathBuf>,
}

/// Loads the whole table and checks every definition the way a run would:
/// kind string, steps shape, per-step fields, verbs against the registry.
pub async fn cmd_validate(args: ValidateArgs, config: &AppConfig) -> Result<()> {
    let actions_dir = args.actions_dir.as_ref().unwrap_or(&config.actions_dir);
    let table = load_actions(actions_dir)?;
    let registry = CapabilityRegistry::with_builtins();

    let mut checked = 0usize;
    let mut problems = Vec::new();
    for (name, definition) in &table {
        if is_definition(definition) {
            checked += 1;
            check_definition(name, definition, &registry, &mut problems);
        } else if let Value::Object(children) = definition {
            for (child, child_definition) in children {
                let full_name = format!("{name}.{child}");
                if is_definition(child_definition) {
                    checked += 1;
                    check_definition(&full_name, child_definition, &registry, &mut problems);
                } else {
                    problems.push(format!(
                        "{full_name}: not an action definition (missing 'type')"
                    ));
                }
            }
        } else {
            problems.push(format!("{name}: definition must be a mapping"));
        }
    }

    if problems.is_empty() {
        println!(
            "{checked} definition(s) OK across {} top-level entries in {}",
            table.len(),
            actions_dir.display()
        );
        Ok(())
    } else {
        for problem in &problems {
            println!("problem: {problem}");
        }
        bail!("validation found {} problem(s)", problems.len())
    }
}

fn is_definition(value: &Value) -> bool {
    value.get("type").map_or(false, Value::is_string)
}

fn check_definition(
    name: &str,
    definition: &Value,
    registry: &CapabilityRegistry,
    problems: &mut Vec<String>,
) {
    let declared = definition
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let kind = match ActionKind::from_str(declared) {
        Ok(kind) => kind,
        Err(err) => {
            problems.push(format!("{name}: {err}"));
            return;
        }
    };

    match definition.get("steps") {
        None => {}
        Some(Value::Array(items)) => {
            for (index, raw) in items.iter().enumerate() {
                let def: StepDefinition = match serde_json::from_value(raw.clone()) {
                    Ok(def) => def,
                    Err(err) => {
                        problems.push(format!("{name}: step {index} is malformed: {err}"));
                        continue;
                    }
                };
                match ExecutableStep::derive(&def, kind) {
                    Ok(step) => {
                        if !registry.contains(&step.verb) {
                            problems.push(format!(
                                "{name}: step {index} uses unknown verb '{}'",
                                step.verb
                            ));
                        }
                    }
                    Err(err) => problems.push(format!("{name}: step {index}: {err}")),
                }
            }
        }
        Some(_) => problems.push(format!("{name}: 'steps' must be a sequence")),
    }
}
