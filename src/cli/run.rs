use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;
use tracing::{debug, info};

use actionbook_core_types::{ActionKind, ContextSource};
use actionbook_driver::{BrowserDriver, NoopDriver};
use actionbook_engine::Engine;
use actionbook_loader::load_actions;
use actionbook_registry::CapabilityRegistry;

use crate::config::AppConfig;
use crate::report::FsReporter;

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum KindOpt {
    Op,
    Assert,
}

impl From<KindOpt> for ActionKind {
    fn from(value: KindOpt) -> Self {
        match value {
            KindOpt::Op => ActionKind::Op,
            KindOpt::Assert => ActionKind::Assert,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Action name; dotted for nested definitions (e.g. `login.submit`)
    pub action: String,

    /// Kind to run the action as
    #[arg(short, long, value_enum, default_value = "op")]
    pub kind: KindOpt,

    /// Context as an inline JSON object
    #[arg(long, conflicts_with = "ctx_file")]
    pub ctx: Option<String>,

    /// File containing the context JSON object
    #[arg(long, value_name = "FILE")]
    pub ctx_file: Option<PathBuf>,

    /// Override the configured actions directory
    #[arg(long, value_name = "DIR")]
    pub actions_dir: Option<PathBuf>,
}

pub async fn cmd_run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let actions_dir = args.actions_dir.as_ref().unwrap_or(&config.actions_dir);
    let table = load_actions(actions_dir)
        .with_context(|| format!("failed to load actions from {}", actions_dir.display()))?;
    info!(actions = table.len(), dir = %actions_dir.display(), "action table ready");

    let ctx = match (&args.ctx, &args.ctx_file) {
        (Some(inline), _) => ContextSource::from(inline.as_str()),
        (None, Some(path)) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read context file {}", path.display()))?;
            ContextSource::from(content)
        }
        (None, None) => ContextSource::default(),
    };

    // No concrete browser protocol is wired in; runs drive the no-op adapter,
    // which logs every call it would make with the configured wait budget.
    let timeouts = config.timeouts.to_driver_timeouts();
    debug!(?timeouts, "driver wait budgets");
    let driver: Arc<dyn BrowserDriver> = Arc::new(NoopDriver::with_timeouts(timeouts));

    let engine = Engine::new(
        Arc::new(table),
        Arc::new(CapabilityRegistry::with_builtins()),
        driver,
    )
    .with_reporter(Arc::new(FsReporter::new(&config.screenshot_dir)));

    let results = engine.run(&args.action, args.kind.into(), ctx).await?;

    if results.is_empty() {
        println!("Run finished; no results returned.");
    } else {
        println!("{}", serde_json::to_string_pretty(&Value::Object(results))?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutsConfig;
    use std::fs;
    use tempfile::TempDir;

    fn config_under(dir: &TempDir) -> AppConfig {
        AppConfig {
            actions_dir: dir.path().join("actions"),
            report_dir: dir.path().join("reports"),
            screenshot_dir: dir.path().join("reports/screenshots"),
            log_dir: None,
            timeouts: TimeoutsConfig {
                page_ready_ms: 1_000,
                element_visible_ms: 500,
                clickable_ms: 800,
            },
        }
    }

    #[tokio::test]
    async fn run_command_dry_runs_a_loaded_action() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("actions")).unwrap();
        fs::write(
            dir.path().join("actions/smoke.json"),
            r#"{"smoke": {"type": "op", "steps": [
                {"desc": "open", "action": "open", "selector": "https://example.com"}
            ]}}"#,
        )
        .unwrap();

        let args = RunArgs {
            action: "smoke".to_string(),
            kind: KindOpt::Op,
            ctx: None,
            ctx_file: None,
            actions_dir: None,
        };

        // Configured budgets flow into the driver; the dry run completes.
        cmd_run(args, &config_under(&dir)).await.unwrap();
    }

    #[tokio::test]
    async fn run_command_surfaces_engine_failures() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("actions")).unwrap();
        fs::write(
            dir.path().join("actions/smoke.json"),
            r#"{"smoke": {"type": "op", "steps": []}}"#,
        )
        .unwrap();

        let args = RunArgs {
            action: "smoke".to_string(),
            kind: KindOpt::Assert,
            ctx: None,
            ctx_file: None,
            actions_dir: None,
        };

        let err = cmd_run(args, &config_under(&dir)).await.unwrap_err();
        assert!(err.to_string().contains("declared 'op'"));
    }
}
