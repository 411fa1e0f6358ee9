//! Pipeline builder for composing migration steps.
//!
//! Steps are added in the order they must run. [`PipelineBuilder::build`]
//! checks that versions strictly increase, so a misordered or duplicated
//! step list is rejected before any document is touched.

use super::step::{MigrationStep, StepContext};
use crate::document::Document;
use crate::errors::{MigrationError, Result};
use std::fmt;
use std::time::{Duration, Instant};

/// Builder for constructing migration pipelines.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new()
///     .step(StoriesToClaims)
///     .step(CategoriesToCommunities)
///     .when(with_mint, |p| p.step(AddMintModule))
///     .build()?;
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    steps: Vec<Box<dyn MigrationStep>>,
    progress_enabled: bool,
}

impl PipelineBuilder {
    /// Create a new empty pipeline builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn step<S>(mut self, step: S) -> Self
    where
        S: MigrationStep + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Append an already boxed step.
    pub fn boxed_step(mut self, step: Box<dyn MigrationStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Add steps conditionally.
    ///
    /// If the condition is true, `f` is applied to the builder. Otherwise
    /// this is a no-op.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Log each step at info level as it starts.
    pub fn with_progress(mut self) -> Self {
        self.progress_enabled = true;
        self
    }

    /// Build the final pipeline ready for execution.
    ///
    /// Fails with `Configuration` when step versions are not strictly
    /// increasing.
    pub fn build(self) -> Result<BuiltPipeline> {
        for pair in self.steps.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.version() <= prev.version() {
                return Err(MigrationError::config(format!(
                    "step `{}` (v{}) cannot follow `{}` (v{})",
                    next.name(),
                    next.version(),
                    prev.name(),
                    prev.version()
                )));
            }
        }
        Ok(BuiltPipeline {
            steps: self.steps,
            progress_enabled: self.progress_enabled,
        })
    }
}

/// A built pipeline ready for execution.
///
/// The pipeline can be run multiple times with different documents.
pub struct BuiltPipeline {
    steps: Vec<Box<dyn MigrationStep>>,
    progress_enabled: bool,
}

impl fmt::Debug for BuiltPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltPipeline")
            .field("steps", &self.steps().map(|s| s.name()).collect::<Vec<_>>())
            .field("progress_enabled", &self.progress_enabled)
            .finish()
    }
}

impl BuiltPipeline {
    /// Run every step in order, threading each output into the next step.
    ///
    /// The first failure stops the run; the error names the failing step.
    pub fn run(&self, document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        self.run_with_timing(document, ctx)
            .map(|(document, _)| document)
    }

    /// Run the pipeline and collect timing information for each step.
    pub fn run_with_timing(
        &self,
        document: Document,
        ctx: &StepContext<'_>,
    ) -> Result<(Document, Vec<StepTiming>)> {
        let mut document = document;
        let mut timings = Vec::with_capacity(self.steps.len());
        let total = self.steps.len();

        if self.progress_enabled {
            tracing::info!("Pipeline: {} steps", total);
        }

        for (i, step) in self.steps.iter().enumerate() {
            let span = tracing::info_span!("step", version = step.version(), name = step.name());
            let _guard = span.enter();

            if self.progress_enabled {
                tracing::info!("Step {}/{}: {}", i + 1, total, step.name());
            } else {
                tracing::debug!("Step {}/{}: {}", i + 1, total, step.name());
            }

            let start = Instant::now();
            document = step
                .apply(document, ctx)
                .map_err(|e| e.in_step(step.name()))?;
            let elapsed = start.elapsed();

            tracing::debug!("Finished {} in {:.3}s", step.name(), elapsed.as_secs_f64());
            timings.push(StepTiming {
                version: step.version(),
                name: step.name().to_string(),
                duration: elapsed,
            });
        }

        Ok((document, timings))
    }

    /// Get the number of steps in this pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> impl Iterator<Item = &dyn MigrationStep> {
        self.steps.iter().map(|s| s.as_ref())
    }

    /// Whether any selected step reads the template document.
    pub fn requires_template(&self) -> bool {
        self.steps.iter().any(|s| s.requires_template())
    }
}

/// Timing information for a pipeline step.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub version: u32,

    /// Name of the step
    pub name: String,

    /// Time taken to apply the step
    pub duration: Duration,
}

impl StepTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.2}s", self.name, self.duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MigrateConfig, MigrationParams};
    use crate::pipeline::step::StepCategory;
    use serde_json::json;

    /// Appends its version to `app_state.trace.seen`, or fails if told to.
    struct Trace {
        version: u32,
        name: &'static str,
        fail: bool,
    }

    impl Trace {
        fn new(version: u32, name: &'static str) -> Self {
            Self {
                version,
                name,
                fail: false,
            }
        }

        fn failing(version: u32, name: &'static str) -> Self {
            Self {
                version,
                name,
                fail: true,
            }
        }
    }

    impl MigrationStep for Trace {
        fn version(&self) -> u32 {
            self.version
        }

        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "records that it ran"
        }

        fn category(&self) -> StepCategory {
            StepCategory::Addition
        }

        fn apply(&self, mut document: Document, _ctx: &StepContext<'_>) -> Result<Document> {
            if self.fail {
                return Err(MigrationError::missing_section("story"));
            }
            document.push_record("trace.seen", json!(self.version))?;
            Ok(document)
        }
    }

    fn params() -> MigrationParams {
        MigrationParams {
            chain_id: "devnet-n".into(),
            start_time: "2019-02-11T12:00:00Z".into(),
            bond_denom: "trusteak".into(),
        }
    }

    fn document() -> Document {
        Document::from_value(json!({"app_state": {"trace": {"seen": []}}})).unwrap()
    }

    #[test]
    fn test_steps_run_in_order() {
        let pipeline = PipelineBuilder::new()
            .step(Trace::new(1, "one"))
            .step(Trace::new(2, "two"))
            .step(Trace::new(5, "five"))
            .build()
            .unwrap();

        let (params, config) = (params(), MigrateConfig::default());
        let ctx = StepContext::new(&params, &config);
        let result = pipeline.run(document(), &ctx).unwrap();

        assert_eq!(result.get_path("trace.seen").unwrap(), &json!([1, 2, 5]));
    }

    #[test]
    fn test_pipeline_conditional() {
        let with_extra = PipelineBuilder::new()
            .step(Trace::new(1, "one"))
            .when(true, |p| p.step(Trace::new(2, "two")))
            .build()
            .unwrap();
        let without_extra = PipelineBuilder::new()
            .step(Trace::new(1, "one"))
            .when(false, |p| p.step(Trace::new(2, "two")))
            .build()
            .unwrap();

        assert_eq!(with_extra.step_count(), 2);
        assert_eq!(without_extra.step_count(), 1);
    }

    #[test]
    fn test_non_increasing_versions_rejected() {
        let result = PipelineBuilder::new()
            .step(Trace::new(3, "three"))
            .step(Trace::new(3, "again"))
            .build();
        let err = result.err().unwrap();
        assert!(matches!(err, MigrationError::Configuration { .. }));
        assert!(err.to_string().contains("`again` (v3) cannot follow `three` (v3)"));
    }

    #[test]
    fn test_first_failure_halts_and_names_step() {
        let pipeline = PipelineBuilder::new()
            .step(Trace::new(1, "one"))
            .step(Trace::failing(2, "breaks"))
            .step(Trace::new(3, "never"))
            .build()
            .unwrap();

        let (params, config) = (params(), MigrateConfig::default());
        let ctx = StepContext::new(&params, &config);
        let err = pipeline.run(document(), &ctx).unwrap_err();

        assert_eq!(err.failed_step(), Some("breaks"));
        assert!(matches!(err.root_cause(), MigrationError::MissingSection { .. }));
    }

    #[test]
    fn test_debug_lists_step_names() {
        let pipeline = PipelineBuilder::new()
            .step(Trace::new(1, "one"))
            .step(Trace::new(4, "four"))
            .with_progress()
            .build()
            .unwrap();

        let rendered = format!("{pipeline:?}");
        assert!(rendered.contains(r#"steps: ["one", "four"]"#), "{rendered}");
        assert!(rendered.contains("progress_enabled: true"));
    }

    #[test]
    fn test_pipeline_timing() {
        let pipeline = PipelineBuilder::new()
            .step(Trace::new(1, "one"))
            .step(Trace::new(2, "two"))
            .build()
            .unwrap();

        let (params, config) = (params(), MigrateConfig::default());
        let ctx = StepContext::new(&params, &config);
        let (_, timings) = pipeline.run_with_timing(document(), &ctx).unwrap();

        assert_eq!(timings.len(), 2);
        assert_eq!(timings[0].name, "one");
        assert_eq!(timings[1].version, 2);
    }
}
