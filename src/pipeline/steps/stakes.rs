//! Legacy votes become stakes.

use crate::document::{Document, Key};
use crate::errors::{MigrationError, Result};
use crate::model::{
    legacy_votes, ArgumentRecord, LegacyVote, StakeKind, ARGUMENTS, CLAIMS, STAKES, STORIES,
    STORY_EXPIRED,
};
use crate::pipeline::step::{MigrationStep, SequenceGenerator, StepCategory, StepContext};
use crate::resolver::{Resolver, SectionIndex};
use serde_json::{json, Value};

pub struct MigrateStakes;

impl MigrationStep for MigrateStakes {
    fn version(&self) -> u32 {
        6
    }

    fn name(&self) -> &'static str {
        "migrate-stakes"
    }

    fn description(&self) -> &'static str {
        "Build trustaking stakes from backing and challenge votes"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Addition
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let mut ids = SequenceGenerator::new();
        let stakes = build_stakes(&document, &mut ids)?;
        tracing::debug!("Built {} stakes from legacy votes", stakes.len());

        document.set_path(STAKES.path(), Value::Array(stakes))?;
        ctx.stamp(&mut document);
        Ok(document)
    }
}

/// Lookups a stake needs beyond its own vote.
struct StakeSources<'a> {
    document: &'a Document,
    arguments: &'a [ArgumentRecord],
    argument_index: SectionIndex,
    claims: SectionIndex,
    stories: SectionIndex,
}

impl StakeSources<'_> {
    fn argument(&self, id: &Key) -> Result<&ArgumentRecord> {
        let position = self.argument_index.position(id)?;
        // The index was built over the same records, so positions line up.
        self.arguments
            .get(position)
            .ok_or_else(|| MigrationError::reference_not_found(ARGUMENTS.path(), "id", id))
    }

    fn stake(&self, id: String, vote: &LegacyVote) -> Result<Value> {
        let argument = self.argument(&vote.argument_id)?;
        // Written as stored on the argument so numeric ids stay numeric.
        let argument_id = self
            .argument_index
            .get(self.document, &vote.argument_id)?
            .require("id")?
            .clone();
        let claim = self.claims.get(self.document, &argument.claim_id)?;
        let story = self.stories.get(self.document, &vote.story_id)?;

        let kind = if argument.creator == vote.creator {
            StakeKind::from_vote(vote.supports)
        } else {
            StakeKind::Upvote
        };

        Ok(json!({
            "id": id,
            "argument_id": argument_id,
            "community_id": claim.require_str("community_id")?,
            "type": kind.code(),
            "amount": vote.amount.to_value(),
            "creator": vote.creator,
            "created_time": vote.require_created_time()?,
            "end_time": story.require("expire_time")?,
            "expired": story.require_u64("status")? == STORY_EXPIRED,
        }))
    }
}

/// One stake per legacy vote, backings first, numbered from `ids`.
fn build_stakes(document: &Document, ids: &mut SequenceGenerator) -> Result<Vec<Value>> {
    let resolver = Resolver::new(document);
    let arguments = resolver
        .records(ARGUMENTS)?
        .iter()
        .map(ArgumentRecord::decode)
        .collect::<Result<Vec<_>>>()?;
    let sources = StakeSources {
        document,
        arguments: &arguments,
        argument_index: resolver.index(ARGUMENTS, "id")?,
        claims: resolver.index(CLAIMS, "id")?,
        stories: resolver.index(STORIES, "id")?,
    };

    legacy_votes(document)?
        .iter()
        .map(|vote| sources.stake(ids.next_key(), vote))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::steps::test_support::{config, doc, params};
    use pretty_assertions::assert_eq;

    fn vote(argument: u64, creator: &str, amount: &str, supports: bool) -> Value {
        json!({"vote": {
            "story_id": 1, "argument_id": argument, "creator": creator,
            "amount": {"amount": amount, "denom": "trusteak"}, "vote": supports,
            "timestamp": {"created_time": "2019-02-05T00:00:00Z"}
        }})
    }

    fn app_state(backings: Vec<Value>, challenges: Vec<Value>) -> Value {
        json!({
            "story": {"stories": [{"id": 1, "status": 1, "expire_time": "2019-03-01T00:00:00Z"}]},
            "claim": {"claims": [{"id": 1, "community_id": "crypto"}]},
            "trustaking": {"arguments": [
                {"id": 10, "claim_id": 1, "creator": "A", "stake_type": 0},
                {"id": 11, "claim_id": 1, "creator": "C", "stake_type": 1}
            ]},
            "backing": {"backings": backings},
            "challenge": {"challenges": challenges}
        })
    }

    #[test]
    fn test_votes_become_numbered_stakes() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let document = doc(app_state(
            vec![vote(10, "A", "100", true), vote(10, "B", "50", true)],
            vec![vote(11, "C", "30", false)],
        ));

        let migrated = MigrateStakes.apply(document, &ctx).unwrap();
        let stakes = migrated.get_path("trustaking.stakes").unwrap();

        assert_eq!(
            stakes[0],
            json!({
                "id": "1", "argument_id": 10, "community_id": "crypto", "type": 0,
                "amount": {"amount": "100", "denom": "trusteak"}, "creator": "A",
                "created_time": "2019-02-05T00:00:00Z",
                "end_time": "2019-03-01T00:00:00Z", "expired": true
            })
        );
        assert_eq!(stakes[1]["type"], json!(2));
        assert_eq!(stakes[1]["id"], json!("2"));
        assert_eq!(stakes[2]["type"], json!(1));
        assert_eq!(stakes[2]["id"], json!("3"));
    }

    #[test]
    fn test_argument_id_keeps_its_json_type() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let mut state = app_state(vec![vote(10, "A", "1", true)], vec![]);
        state["trustaking"]["arguments"][0]["id"] = json!("10");
        state["backing"]["backings"][0]["vote"]["argument_id"] = json!("10");

        let migrated = MigrateStakes.apply(doc(state), &ctx).unwrap();
        assert_eq!(
            migrated.get_path("trustaking.stakes").unwrap()[0]["argument_id"],
            json!("10")
        );
    }

    #[test]
    fn test_numbering_restarts_on_each_run() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        for _ in 0..2 {
            let document = doc(app_state(vec![vote(10, "A", "1", true)], vec![]));
            let migrated = MigrateStakes.apply(document, &ctx).unwrap();
            assert_eq!(migrated.get_path("trustaking.stakes").unwrap()[0]["id"], json!("1"));
        }
    }

    #[test]
    fn test_vote_on_unknown_argument() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let document = doc(app_state(vec![vote(99, "A", "1", true)], vec![]));

        let err = MigrateStakes.apply(document, &ctx).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::ReferenceNotFound { ref section, ref key, .. }
                if section == "trustaking.arguments" && key == "99"
        ));
    }
}
