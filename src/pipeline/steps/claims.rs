//! Stories become claims.

use super::patch_records;
use crate::aggregate::{legacy_claim_totals, ClaimTotals};
use crate::document::{Coin, Document, Key};
use crate::errors::Result;
use crate::model::{legacy_votes, CATEGORIES, CLAIMS, STORIES};
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Resolver;
use serde_json::json;

/// Story fields with no counterpart on a claim.
const DROPPED_FIELDS: [&str; 4] = ["timestamp", "status", "expire_time", "type"];

pub struct StoriesToClaims;

/// Values computed for one story before the section is rewritten.
struct ClaimPatch {
    community_id: String,
    created_time: String,
    totals: ClaimTotals,
}

impl MigrationStep for StoriesToClaims {
    fn version(&self) -> u32 {
        2
    }

    fn name(&self) -> &'static str {
        "stories-to-claims"
    }

    fn description(&self) -> &'static str {
        "Copy stories into the claim section with community ids and stake totals"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Restructure
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let patches = claim_patches(&document)?;
        let denom = ctx.config.denominations.legacy.as_str();

        // `story` stays until the cleanup step; stakes still read its status.
        document.copy_section("story", "claim")?;
        document.remove_path("claim.story_queue")?;
        let min = document.get_path("claim.params.min_story_length")?.clone();
        let max = document.get_path("claim.params.max_story_length")?.clone();
        document.set_path(
            "claim.params",
            json!({ "min_claim_length": min, "max_claim_length": max }),
        )?;
        let stories = document.remove_path("claim.stories")?;
        document.set_path(CLAIMS.path(), stories)?;

        patch_records(&mut document, CLAIMS, patches, |patch, mut claim| {
            claim.insert("community_id", patch.community_id);
            claim.remove("category_id")?;
            claim.insert("created_time", patch.created_time);
            claim.insert("total_backed", Coin::new(denom, patch.totals.backed).to_value());
            claim.insert(
                "total_challenged",
                Coin::new(denom, patch.totals.challenged).to_value(),
            );
            claim.insert("total_stakers", patch.totals.stakers.to_string());
            for field in DROPPED_FIELDS {
                claim.remove(field)?;
            }
            Ok(())
        })?;

        ctx.stamp(&mut document);
        Ok(document)
    }
}

fn claim_patches(document: &Document) -> Result<Vec<ClaimPatch>> {
    let resolver = Resolver::new(document);
    let stories = resolver.records(STORIES)?;
    let story_ids = stories
        .iter()
        .map(|story| story.require_key("id"))
        .collect::<Result<Vec<Key>>>()?;

    let votes = legacy_votes(document)?;
    let mut totals = legacy_claim_totals(story_ids.iter().cloned(), &votes)?;
    let categories = resolver.index(CATEGORIES, "id")?;

    let mut patches = Vec::with_capacity(stories.len());
    for (story, id) in stories.iter().zip(&story_ids) {
        let category = categories.get(document, &story.require_key("category_id")?)?;
        for field in DROPPED_FIELDS {
            story.require(field)?;
        }
        patches.push(ClaimPatch {
            community_id: category.require_str("slug")?.to_string(),
            created_time: story
                .require_object("timestamp")?
                .require_str("created_time")?
                .to_string(),
            totals: totals.remove(id).unwrap_or_default(),
        });
    }
    Ok(patches)
}
