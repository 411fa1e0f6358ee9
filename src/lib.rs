// Export modules for library usage
pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod resolver;

// Re-export commonly used types
pub use crate::config::{MigrateConfig, MigrationParams};
pub use crate::document::{Amount, Coin, Document, Key, Rate};
pub use crate::errors::{ErrorCode, MigrationError, Result};
pub use crate::pipeline::{
    standard_pipeline, BuiltPipeline, MigrationStep, PipelineBuilder, StepContext, StepSelection,
};
pub use crate::resolver::Resolver;
