//! The standard migration catalogue and the pipelines built from it.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use genesis_migrate::pipeline::configs::{standard_pipeline, StepSelection};
//!
//! let pipeline = standard_pipeline(&StepSelection::range(Some(10), Some(13)))?;
//! let migrated = pipeline.run(document, &ctx)?;
//! ```

use super::steps::*;
use super::{BuiltPipeline, MigrationStep, PipelineBuilder};
use crate::errors::{MigrationError, Result};
use std::fmt;

/// Every migration step, in version order.
pub fn standard_steps() -> Vec<Box<dyn MigrationStep>> {
    vec![
        Box::new(ReconcileTemplate),
        Box::new(StoriesToClaims),
        Box::new(CategoriesToCommunities),
        Box::new(AddMintModule),
        Box::new(MigrateArguments),
        Box::new(MigrateStakes),
        Box::new(AddBankTransactions),
        Box::new(AddSlashingModule),
        Box::new(FixClaimTotals),
        Box::new(RemoveDeprecatedSections),
        Box::new(RenameStakeDenom),
        Box::new(RenameAddressPrefix),
        Box::new(TokenInflation),
        Box::new(TokenInflationReset),
        Box::new(ConvertMicroDenom),
        Box::new(RecomputeUsersEarnings),
    ]
}

/// Which part of the catalogue to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSelection {
    /// Steps whose version lies in `from..=to`; an open bound is unlimited.
    Range { from: Option<u32>, to: Option<u32> },
    /// A single step, by name.
    Named(String),
}

impl StepSelection {
    pub fn all() -> Self {
        Self::Range {
            from: None,
            to: None,
        }
    }

    pub fn range(from: Option<u32>, to: Option<u32>) -> Self {
        Self::Range { from, to }
    }

    fn matches(&self, step: &dyn MigrationStep) -> bool {
        match self {
            Self::Range { from, to } => {
                from.map_or(true, |from| step.version() >= from)
                    && to.map_or(true, |to| step.version() <= to)
            }
            Self::Named(name) => step.name() == name,
        }
    }
}

impl Default for StepSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for StepSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { from, to } => {
                let bound = |v: &Option<u32>| v.map_or_else(String::new, |v| format!("v{v}"));
                write!(f, "{}..{}", bound(from), bound(to))
            }
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Build a pipeline over the selected steps of the standard catalogue.
///
/// # Arguments
///
/// * `selection` - Version range or step name
///
/// # Returns
///
/// The pipeline, or `Configuration` when the selection matches no step.
pub fn standard_pipeline(selection: &StepSelection) -> Result<BuiltPipeline> {
    let selected: Vec<Box<dyn MigrationStep>> = standard_steps()
        .into_iter()
        .filter(|step| selection.matches(step.as_ref()))
        .collect();

    if selected.is_empty() {
        return Err(match selection {
            StepSelection::Named(name) => MigrationError::config(format!("unknown step `{name}`")),
            StepSelection::Range { .. } => {
                MigrationError::config(format!("no migration steps in range {selection}"))
            }
        });
    }

    selected
        .into_iter()
        .fold(PipelineBuilder::new(), PipelineBuilder::boxed_step)
        .with_progress()
        .build()
}
