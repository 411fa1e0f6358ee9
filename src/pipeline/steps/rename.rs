//! Global textual renames.
//!
//! These steps rewrite the serialized document and parse the result back.
//! They match text, not structure: every occurrence is replaced wherever it
//! appears, keys and values alike.

use crate::document::Document;
use crate::errors::Result;
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A bech32 address: human-readable prefix, separator `1`, then at least 38
/// data characters. Validator and public key prefixes extend the account
/// prefix (`cosmosvaloper`, `cosmosvalconspub`).
static ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z]+)(1[0-9a-z]{38,})").unwrap());

/// Rewrite the serialized document with `rewrite` and parse it back.
fn rewrite_text<F>(document: &Document, rewrite: F) -> Result<Document>
where
    F: FnOnce(&str) -> String,
{
    let text = document.to_canonical_string()?;
    Document::from_json_str(&rewrite(&text))
}

pub struct RenameStakeDenom;

impl MigrationStep for RenameStakeDenom {
    fn version(&self) -> u32 {
        12
    }

    fn name(&self) -> &'static str {
        "rename-stake-denom"
    }

    fn description(&self) -> &'static str {
        "Rename the stake denomination everywhere in the document"
    }

    fn category(&self) -> StepCategory {
        StepCategory::GlobalRename
    }

    fn apply(&self, document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let denominations = &ctx.config.denominations;
        rewrite_text(&document, |text| {
            tracing::debug!(
                "Renaming {} occurrences of {} to {}",
                text.matches(denominations.legacy.as_str()).count(),
                denominations.legacy,
                denominations.stake
            );
            text.replace(&denominations.legacy, &denominations.stake)
        })
    }
}

pub struct RenameAddressPrefix;

/// Replace `from` with `to` at the start of every address prefix that
/// begins with `from`, keeping any role suffix such as `valoper`.
fn rename_prefix(text: &str, from: &str, to: &str) -> String {
    ADDRESS
        .replace_all(text, |caps: &Captures<'_>| match caps[1].strip_prefix(from) {
            Some(role) => format!("{to}{role}{}", &caps[2]),
            None => caps[0].to_string(),
        })
        .into_owned()
}

impl MigrationStep for RenameAddressPrefix {
    fn version(&self) -> u32 {
        13
    }

    fn name(&self) -> &'static str {
        "rename-address-prefix"
    }

    fn description(&self) -> &'static str {
        "Rename the account address prefix everywhere in the document"
    }

    fn category(&self) -> StepCategory {
        StepCategory::GlobalRename
    }

    fn apply(&self, document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let denominations = &ctx.config.denominations;
        rewrite_text(&document, |text| {
            rename_prefix(
                text,
                &denominations.legacy_address_prefix,
                &denominations.address_prefix,
            )
        })
    }
}
