//! Ordered migration of a genesis document.
//!
//! Each schema change is a [`MigrationStep`]. Steps are composed with
//! [`PipelineBuilder`] and run strictly in version order, each receiving the
//! previous step's output. The first failing step halts the run.

pub mod builder;
pub mod configs;
pub mod step;
pub mod steps;

pub use builder::{BuiltPipeline, PipelineBuilder, StepTiming};
pub use configs::{standard_pipeline, standard_steps, StepSelection};
pub use step::{MigrationStep, SequenceGenerator, StepCategory, StepContext};
