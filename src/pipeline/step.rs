//! Migration step abstraction.
//!
//! A step moves a document from one schema version to the next. Steps are
//! pure with respect to the outside world: they receive the document by value
//! together with a read-only [`StepContext`], and return the migrated
//! document or the first error. A failed step never leaves a half-migrated
//! document behind, since the caller only sees the returned value.

use crate::config::{MigrateConfig, MigrationParams};
use crate::document::Document;
use crate::errors::{MigrationError, Result};
use std::fmt;

/// What a step does to the document, for listings and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCategory {
    /// Moves sections and fields to new names.
    Restructure,
    /// Recomputes a derived total and checks it against the stored one.
    Recompute,
    /// Injects literal sections, fields or records.
    Addition,
    /// Textual substitution over the serialized document.
    GlobalRename,
    /// Merges the export with a template document.
    Reconciliation,
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepCategory::Restructure => "restructure",
            StepCategory::Recompute => "recompute",
            StepCategory::Addition => "addition",
            StepCategory::GlobalRename => "global rename",
            StepCategory::Reconciliation => "reconciliation",
        };
        f.write_str(label)
    }
}

/// Read-only inputs shared by every step of a run.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub params: &'a MigrationParams,
    pub config: &'a MigrateConfig,
    /// Template genesis, present only when a step that needs one is selected.
    pub template: Option<&'a Document>,
}

impl<'a> StepContext<'a> {
    pub fn new(params: &'a MigrationParams, config: &'a MigrateConfig) -> Self {
        Self {
            params,
            config,
            template: None,
        }
    }

    pub fn with_template(mut self, template: &'a Document) -> Self {
        self.template = Some(template);
        self
    }

    pub fn require_template(&self) -> Result<&'a Document> {
        self.template
            .ok_or_else(|| MigrationError::config_field("template_genesis", "template genesis required"))
    }

    /// Stamp the configured chain id and start time onto `document`.
    pub fn stamp(&self, document: &mut Document) {
        document.stamp_chain(&self.params.chain_id, &self.params.start_time);
    }
}

/// One schema-version transition.
///
/// Implementations decode everything they read before mutating, so that a
/// malformed input fails with a typed error rather than a partial rewrite.
pub trait MigrationStep: Send + Sync {
    /// Schema version this step produces. Versions strictly increase along
    /// a pipeline.
    fn version(&self) -> u32;

    /// Stable, kebab-case identifier used on the command line and in errors.
    fn name(&self) -> &'static str;

    /// One-line summary for listings.
    fn description(&self) -> &'static str;

    fn category(&self) -> StepCategory;

    fn requires_template(&self) -> bool {
        false
    }

    /// Apply the transition.
    fn apply(&self, document: Document, ctx: &StepContext<'_>) -> Result<Document>;
}

/// Monotonic identifier source for records a step synthesizes.
///
/// Created fresh inside a step invocation and passed to its helpers, so
/// identifiers restart at 1 on every run.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    last: u64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier, starting at 1.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Next identifier as the decimal string stored in documents.
    pub fn next_key(&mut self) -> String {
        self.next_id().to_string()
    }
}
