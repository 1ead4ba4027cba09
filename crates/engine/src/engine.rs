//! Sequential action runner

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use actionbook_core_types::{
    ActionKind, ActionTable, Context, ContextSource, ExecutableStep, ResultsMap, RunId,
    StepDefinition,
};
use actionbook_driver::BrowserDriver;
use actionbook_registry::CapabilityRegistry;
use actionbook_resolver::resolve;

use crate::errors::EngineError;
use crate::report::{NoopReporter, Reporter};

/// Runs actions out of an immutable definition table.
///
/// Holds the table, the verb registry, one browser driver and a reporting
/// sink. Every run derives its own executable step copies, so one engine
/// value can serve concurrent runs over shared definitions.
pub struct Engine {
    table: Arc<ActionTable>,
    registry: Arc<CapabilityRegistry>,
    driver: Arc<dyn BrowserDriver>,
    reporter: Arc<dyn Reporter>,
}

impl Engine {
    pub fn new(
        table: Arc<ActionTable>,
        registry: Arc<CapabilityRegistry>,
        driver: Arc<dyn BrowserDriver>,
    ) -> Self {
        Self {
            table,
            registry,
            driver,
            reporter: Arc::new(NoopReporter),
        }
    }

    /// Replaces the reporting sink.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Runs the named action as `kind` with the given context.
    ///
    /// The name may be dotted (`parent.child`) to address a nested action.
    /// Steps run strictly in order; the first failure aborts the run after a
    /// best-effort failure-artifact capture and surfaces that step's error.
    /// Mapping-shaped step results merge into the returned map, last write
    /// wins; other results are logged and dropped.
    pub async fn run(
        &self,
        name: &str,
        kind: ActionKind,
        ctx: impl Into<ContextSource>,
    ) -> Result<ResultsMap, EngineError> {
        let run_id = RunId::new();
        info!(run = %run_id, action = name, kind = %kind, "starting action run");

        let definition = self.lookup(name)?;

        let declared = definition.get("type").and_then(Value::as_str).unwrap_or("");
        if declared != kind.as_str() {
            return Err(EngineError::KindMismatch {
                name: name.to_string(),
                declared: declared.to_string(),
                requested: kind,
            });
        }

        // Executable copies are derived per run; the loaded table is never
        // rewritten, even for assert aliases.
        let steps = self.derive_steps(name, kind, definition)?;

        if let Some(title) = definition.get("title").and_then(Value::as_str) {
            self.reporter.annotate_title(title).await;
        }
        if let Some(description) = definition.get("description").and_then(Value::as_str) {
            self.reporter.annotate_description(description).await;
        }

        let ctx = ctx.into().normalize().map_err(|err| EngineError::Context {
            reason: err.to_string(),
        })?;

        let mut results = ResultsMap::new();
        for (index, step) in steps.iter().enumerate() {
            debug!(run = %run_id, step = index, desc = %step.desc, verb = %step.verb, "executing step");
            match self.execute_step(step, &ctx).await {
                Ok(Some(Value::Object(map))) => {
                    for (key, value) in map {
                        if results.contains_key(&key) {
                            debug!(run = %run_id, key = %key, "step result overwrites an earlier value");
                        }
                        results.insert(key, value);
                    }
                }
                Ok(Some(other)) => {
                    info!(run = %run_id, desc = %step.desc, value = %other, "discarding non-mapping step result");
                }
                Ok(None) => {}
                Err(err) => {
                    error!(run = %run_id, desc = %step.desc, error = %err, "step failed, aborting run");
                    self.capture_failure_artifact().await;
                    return Err(err);
                }
            }
        }

        info!(run = %run_id, action = name, results = results.len(), "action run finished");
        Ok(results)
    }

    /// Splits a dotted name once and walks the table. A trailing dot with no
    /// child text addresses the parent itself.
    fn lookup(&self, name: &str) -> Result<&Value, EngineError> {
        let (parent, child) = match name.split_once('.') {
            Some((parent, child)) if !child.is_empty() => (parent, Some(child)),
            Some((parent, _)) => (parent, None),
            None => (name, None),
        };

        let definition = self
            .table
            .get(parent)
            .ok_or_else(|| EngineError::NotFound {
                name: parent.to_string(),
            })?;

        match child {
            None => Ok(definition),
            Some(child) => definition
                .get(child)
                .ok_or_else(|| EngineError::ChildNotFound {
                    parent: parent.to_string(),
                    child: child.to_string(),
                }),
        }
    }

    /// Validates the step sequence and derives executable copies for this
    /// run. A missing `steps` field means a definition with nothing to do.
    fn derive_steps(
        &self,
        name: &str,
        kind: ActionKind,
        definition: &Value,
    ) -> Result<Vec<ExecutableStep>, EngineError> {
        let raw_steps = match definition.get("steps") {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(EngineError::Schema {
                    name: name.to_string(),
                    reason: "'steps' must be a sequence".to_string(),
                })
            }
        };

        let mut steps = Vec::with_capacity(raw_steps.len());
        for (index, raw) in raw_steps.iter().enumerate() {
            let def: StepDefinition =
                serde_json::from_value(raw.clone()).map_err(|err| EngineError::Schema {
                    name: name.to_string(),
                    reason: format!("step {index} is malformed: {err}"),
                })?;
            let step = ExecutableStep::derive(&def, kind).map_err(|err| EngineError::Schema {
                name: name.to_string(),
                reason: format!("step {index}: {err}"),
            })?;
            steps.push(step);
        }
        Ok(steps)
    }

    /// Resolves the step's references, then dispatches its verb.
    async fn execute_step(
        &self,
        step: &ExecutableStep,
        ctx: &Context,
    ) -> Result<Option<Value>, EngineError> {
        let locator = step
            .selector
            .as_ref()
            .map(|selector| resolve(ctx, selector))
            .transpose()?;
        let data = step
            .param
            .as_ref()
            .map(|param| resolve(ctx, param))
            .transpose()?;

        let ctor = self
            .registry
            .get(&step.verb)
            .ok_or_else(|| EngineError::UnknownVerb {
                verb: step.verb.clone(),
                desc: step.desc.clone(),
            })?;
        let capability = ctor(self.driver.clone());

        capability
            .execute(locator.as_ref(), data.as_ref())
            .await
            .map_err(|source| EngineError::Step {
                desc: step.desc.clone(),
                verb: step.verb.clone(),
                source,
            })
    }

    /// Best-effort capture. Failures here are logged and swallowed; the step
    /// error that triggered the capture is the one the caller sees.
    async fn capture_failure_artifact(&self) {
        match self.driver.capture_failure_artifact().await {
            Ok(bytes) if bytes.is_empty() => {
                debug!("driver produced no failure artifact");
            }
            Ok(bytes) => {
                if let Err(err) = self
                    .reporter
                    .attach_artifact("failure-screenshot", &bytes)
                    .await
                {
                    warn!(error = %err, "failed to store failure artifact");
                }
            }
            Err(err) => {
                warn!(error = %err, "failure artifact capture failed");
            }
        }
    }
}
