//! Categories become communities keyed by slug. The `category` section is
//! left as it was.

use super::patch_records;
use crate::document::{Document, RecordView};
use crate::errors::{MigrationError, Result};
use crate::model::{CATEGORIES, COMMUNITIES};
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Resolver;
use serde_json::json;

/// Curated descriptions for the launch communities.
const DESCRIPTIONS: [(&str, &str); 5] = [
    (
        "crypto",
        "Satoshi inspired a new generation of technologists to rethink how the world’s financial and economic system works. But the toxicity on crypto Twitter leaves little room for constructive debate. Until now.",
    ),
    (
        "product",
        "TruStory is a startup. We make critical product decisions every week and want you to be a part of the process. Let’s debate how to make TruStory better together.",
    ),
    (
        "tech",
        "Technology has revolutionized our lives in every facet. What are the pros & cons of the latest innovations and applications that shape our future?",
    ),
    (
        "entertainment",
        "Content is being created and consumed at a breakneck pace, whether it’s via videos, podcasts, books or music. Debate the value of specific content or the medium itself.",
    ),
    (
        "sports",
        "Sports inspire, motivate, and capture the attention of young kids and senior citizens alike. The estimated size of the global sports industry is over a trillion dollars. Ready, set, go!",
    ),
];

pub struct CategoriesToCommunities;

/// Category shape this step reads.
struct Category {
    slug: String,
    /// Absent on categories created before timestamps were recorded.
    created_time: Option<String>,
}

impl Category {
    fn decode(record: &RecordView<'_>) -> Result<Self> {
        record.require("title")?;
        record.require("total_cred")?;
        let created_time = match record.optional("timestamp") {
            Some(_) => Some(
                record
                    .require_object("timestamp")?
                    .require_str("created_time")?
                    .to_string(),
            ),
            None => None,
        };
        Ok(Self {
            slug: record.require_str("slug")?.to_string(),
            created_time,
        })
    }
}

fn curated_description(slug: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == slug)
        .map(|(_, description)| *description)
}

impl MigrationStep for CategoriesToCommunities {
    fn version(&self) -> u32 {
        3
    }

    fn name(&self) -> &'static str {
        "categories-to-communities"
    }

    fn description(&self) -> &'static str {
        "Rename categories to communities identified by slug"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Restructure
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let categories = Resolver::new(&document)
            .records(CATEGORIES)?
            .iter()
            .map(Category::decode)
            .collect::<Result<Vec<_>>>()?;

        let mut section = document.section("category")?.clone();
        let fields = section
            .as_object_mut()
            .ok_or_else(|| MigrationError::shape("category", "object"))?;
        let communities = fields
            .remove("categories")
            .ok_or_else(|| MigrationError::missing_field("category", "categories"))?;
        fields.insert(
            "params".to_string(),
            json!({
                "min_id_length": "3",
                "max_id_length": "15",
                "min_name_length": "5",
                "max_name_length": "25",
                "max_description_length": "140"
            }),
        );
        fields.insert("communities".to_string(), communities);
        document.insert_section("community", section);

        patch_records(&mut document, COMMUNITIES, categories, |category, mut community| {
            community.rename("title", "name")?;
            community.take_optional("timestamp");
            if let Some(created_time) = category.created_time {
                community.insert("created_time", created_time);
            }
            community.remove("total_cred")?;
            if let Some(description) = curated_description(&category.slug) {
                community.insert("description", description);
            }
            community.remove("slug")?;
            community.insert("id", category.slug);
            Ok(())
        })?;

        ctx.stamp(&mut document);
        Ok(document)
    }
}
