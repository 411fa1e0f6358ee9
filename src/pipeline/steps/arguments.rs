//! Legacy arguments move into the staking module.
//!
//! Each argument gains the stake figures derived from the legacy votes cast
//! on it (see [`argument_totals`]) and the community of the claim it belongs
//! to.

use super::patch_records;
use crate::aggregate::{argument_totals, ArgumentAuthor, ArgumentTotals};
use crate::document::{Coin, Document, Key, RecordView};
use crate::errors::{MigrationError, Result};
use crate::model::{legacy_votes, ARGUMENTS, CLAIMS, LEGACY_ARGUMENTS};
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Resolver;
use serde_json::{json, Value};

/// Length of the summary cut from an argument body, in characters.
const SUMMARY_LENGTH: usize = 140;

pub struct MigrateArguments;

/// Argument shape in `argument.arguments`.
struct LegacyArgument {
    id: Key,
    creator: String,
    story_id: Key,
    body: String,
    created_time: String,
    updated_time: String,
}

impl LegacyArgument {
    fn decode(record: &RecordView<'_>) -> Result<Self> {
        record.require("stake_id")?;
        let timestamp = record.require_object("timestamp")?;
        Ok(Self {
            id: record.require_key("id")?,
            creator: record.require_str("creator")?.to_string(),
            story_id: record.require_key("story_id")?,
            body: record.require_str("body")?.to_string(),
            created_time: timestamp.require_str("created_time")?.to_string(),
            updated_time: timestamp.require_str("updated_time")?.to_string(),
        })
    }

    fn author(&self) -> ArgumentAuthor {
        ArgumentAuthor {
            id: self.id.clone(),
            creator: self.creator.clone(),
        }
    }

    fn summary(&self) -> String {
        self.body.chars().take(SUMMARY_LENGTH).collect()
    }
}

struct ArgumentPatch {
    argument: LegacyArgument,
    community_id: String,
    totals: ArgumentTotals,
}

fn staking_params(legacy_denom: &str) -> Value {
    json!({
        "period": "604800000000000",
        "argument_creation_stake": {"denom": legacy_denom, "amount": "50000000000"},
        "argument_body_max_length": "1250",
        "argument_body_min_length": "25",
        "argument_summary_max_length": "140",
        "argument_summary_min_length": "25",
        "upvote_stake": {"denom": legacy_denom, "amount": "10000000000"},
        "creator_share": "0.500000000000000000",
        "interest_rate": "1.050000000000000000",
        "stake_limit_percent": "0.667000000000000000",
        "stake_limit_days": "604800000000000",
        "unjail_upvotes": "1",
        "max_arguments_per_claim": "5"
    })
}

impl MigrationStep for MigrateArguments {
    fn version(&self) -> u32 {
        5
    }

    fn name(&self) -> &'static str {
        "migrate-arguments"
    }

    fn description(&self) -> &'static str {
        "Move arguments into trustaking with stake totals and summaries"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Restructure
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let patches = argument_patches(&document)?;
        let denom = ctx.config.denominations.legacy.as_str();

        let arguments = document.records(LEGACY_ARGUMENTS.path())?.clone();
        document.insert_section(
            "trustaking",
            json!({ "params": staking_params(denom), "arguments": arguments }),
        );

        patch_records(&mut document, ARGUMENTS, patches, |patch, mut record| {
            let ArgumentPatch {
                argument,
                community_id,
                totals,
            } = patch;
            record.rename("story_id", "claim_id")?;
            record.insert("community_id", community_id);
            record.insert("summary", argument.summary());
            record.insert("stake_type", totals.stake_type.code());
            record.insert("upvoted_count", totals.upvoted_count.to_string());
            record.insert("upvoted_stake", Coin::new(denom, totals.upvoted_stake).to_value());
            record.insert("total_stake", Coin::new(denom, totals.total_stake).to_value());
            record.remove("stake_id")?;
            record.insert("unhelpful_count", "0");
            record.insert("is_unhelpful", false);
            record.insert("created_time", argument.created_time);
            record.insert("updated_time", argument.updated_time);
            record.remove("timestamp")?;
            Ok(())
        })?;

        ctx.stamp(&mut document);
        Ok(document)
    }
}

fn argument_patches(document: &Document) -> Result<Vec<ArgumentPatch>> {
    let resolver = Resolver::new(document);
    let arguments = resolver
        .records(LEGACY_ARGUMENTS)?
        .iter()
        .map(LegacyArgument::decode)
        .collect::<Result<Vec<_>>>()?;

    let authors: Vec<ArgumentAuthor> = arguments.iter().map(LegacyArgument::author).collect();
    let votes = legacy_votes(document)?;
    let mut totals = argument_totals(document, &authors, &votes)?;
    let claims = resolver.index(CLAIMS, "id")?;

    arguments
        .into_iter()
        .map(|argument| {
            let claim = claims.get(document, &argument.story_id)?;
            let community_id = claim.require_str("community_id")?.to_string();
            let totals = totals.remove(&argument.id).ok_or_else(|| {
                MigrationError::inconsistent(
                    format!("argument {}", argument.id),
                    "argument id appears more than once",
                )
            })?;
            Ok(ArgumentPatch {
                argument,
                community_id,
                totals,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::steps::test_support::{config, doc, params};
    use pretty_assertions::assert_eq;

    fn argument(id: u64, story: u64, creator: &str, body: &str) -> Value {
        json!({
            "id": id, "story_id": story, "stake_id": 4, "creator": creator, "body": body,
            "timestamp": {"created_time": "2019-02-02T00:00:00Z", "updated_time": "2019-02-03T00:00:00Z"}
        })
    }

    fn vote(argument: u64, creator: &str, amount: &str, supports: bool) -> Value {
        json!({"vote": {
            "story_id": 1, "argument_id": argument, "creator": creator,
            "amount": {"amount": amount, "denom": "trusteak"}, "vote": supports
        }})
    }

    fn app_state(arguments: Vec<Value>, backings: Vec<Value>) -> Value {
        json!({
            "claim": {"claims": [{"id": 1, "community_id": "crypto"}]},
            "argument": {"arguments": arguments},
            "backing": {"backings": backings},
            "challenge": {"challenges": []}
        })
    }

    #[test]
    fn test_argument_gains_totals_and_community() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let document = doc(app_state(
            vec![argument(10, 1, "A", "Water is wet because it is made of water.")],
            vec![vote(10, "A", "100", true), vote(10, "B", "50", true)],
        ));

        let migrated = MigrateArguments.apply(document, &ctx).unwrap();

        assert_eq!(
            migrated.get_path("trustaking.arguments").unwrap(),
            &json!([{
                "id": 10, "claim_id": 1, "creator": "A", "community_id": "crypto",
                "body": "Water is wet because it is made of water.",
                "summary": "Water is wet because it is made of water.",
                "stake_type": 0,
                "upvoted_count": "1",
                "upvoted_stake": {"amount": "50", "denom": "trusteak"},
                "total_stake": {"amount": "150", "denom": "trusteak"},
                "unhelpful_count": "0",
                "is_unhelpful": false,
                "created_time": "2019-02-02T00:00:00Z",
                "updated_time": "2019-02-03T00:00:00Z"
            }])
        );
        assert_eq!(
            migrated.get_path("trustaking.params.upvote_stake").unwrap(),
            &json!({"denom": "trusteak", "amount": "10000000000"})
        );
        assert!(migrated.has_section("argument"));
    }

    #[test]
    fn test_summary_cut_at_character_boundary() {
        let body = "é".repeat(200);
        let legacy = LegacyArgument {
            id: Key::from(1u64),
            creator: "A".into(),
            story_id: Key::from(1u64),
            body,
            created_time: String::new(),
            updated_time: String::new(),
        };
        assert_eq!(legacy.summary().chars().count(), 140);
    }

    #[test]
    fn test_argument_on_unknown_claim() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let document = doc(app_state(
            vec![argument(10, 7, "A", "body")],
            vec![vote(10, "A", "100", true)],
        ));

        let err = MigrateArguments.apply(document, &ctx).unwrap_err();
        assert_eq!(err.to_string(), "no record in `claim.claims` with id = 7");
    }

    #[test]
    fn test_argument_without_timestamp() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let mut bare = argument(10, 1, "A", "body");
        bare.as_object_mut().unwrap().remove("timestamp");
        let document = doc(app_state(vec![bare], vec![vote(10, "A", "1", true)]));

        let err = MigrateArguments.apply(document, &ctx).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::MissingField { ref field, .. } if field == "timestamp"
        ));
    }
}
