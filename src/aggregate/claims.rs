//! Claim-level stake totals.
//!
//! Two historical sources feed these totals: legacy backing/challenge votes
//! (before stakes existed) and `trustaking.stakes` (after). Both group by the
//! claim a stake ultimately belongs to.

use super::aggregate_into;
use crate::document::{Amount, Key};
use crate::errors::{MigrationError, Result};
use crate::model::{ArgumentRecord, LegacyVote, StakeKind, StakeRecord, ARGUMENTS, CLAIMS, STORIES};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimTotals {
    pub backed: Amount,
    pub challenged: Amount,
    pub stakers: u64,
}

impl ClaimTotals {
    fn add(&mut self, side: StakeKind, amount: Amount) {
        match side {
            StakeKind::Backing => self.backed += amount,
            StakeKind::Challenge => self.challenged += amount,
            // Upvotes are redirected to a side before reaching here.
            StakeKind::Upvote => {}
        }
        self.stakers += 1;
    }
}

/// Totals per story from legacy votes (pure).
///
/// # Arguments
///
/// * `story_ids` - Every story in the document; each gets a group
/// * `votes` - Legacy backing and challenge votes
///
/// # Returns
///
/// Backed/challenged sums and voter counts by story id, or
/// `ReferenceNotFound` when a vote names an unknown story
pub fn legacy_claim_totals(
    story_ids: impl IntoIterator<Item = Key>,
    votes: &[LegacyVote],
) -> Result<BTreeMap<Key, ClaimTotals>> {
    let seed = story_ids
        .into_iter()
        .map(|id| (id, ClaimTotals::default()))
        .collect();
    aggregate_into(
        seed,
        votes,
        |vote| Ok(vote.story_id.clone()),
        |vote| Ok((StakeKind::from_vote(vote.supports), vote.amount.amount.clone())),
        |totals: &mut ClaimTotals, (side, amount)| totals.add(side, amount),
        |id| MigrationError::reference_not_found(STORIES.path(), "id", id),
    )
}

/// Totals per claim recomputed from stakes (pure).
///
/// Each stake resolves `argument_id -> argument -> claim_id`. Backing and
/// challenge stakes count toward their own side; an upvote counts toward the
/// side its argument took.
///
/// # Arguments
///
/// * `claim_ids` - Every claim in the document; each gets a group
/// * `stakes` - All stakes
/// * `arguments` - All arguments
///
/// # Returns
///
/// Sums by claim id, or `ReferenceNotFound` for a stake whose argument or
/// claim does not exist
pub fn stake_claim_totals(
    claim_ids: impl IntoIterator<Item = Key>,
    stakes: &[StakeRecord],
    arguments: &[ArgumentRecord],
) -> Result<BTreeMap<Key, ClaimTotals>> {
    let mut by_id: HashMap<&Key, &ArgumentRecord> = HashMap::new();
    for argument in arguments {
        by_id.entry(&argument.id).or_insert(argument);
    }
    let seed = claim_ids
        .into_iter()
        .map(|id| (id, ClaimTotals::default()))
        .collect();
    aggregate_into(
        seed,
        stakes,
        |stake| Ok(argument_of(&by_id, stake)?.claim_id.clone()),
        |stake| {
            let side = match stake.kind {
                StakeKind::Upvote => argument_of(&by_id, stake)?.stake_type,
                kind => kind,
            };
            Ok((side, stake.amount.amount.clone()))
        },
        |totals: &mut ClaimTotals, (side, amount)| totals.add(side, amount),
        |id| MigrationError::reference_not_found(CLAIMS.path(), "id", id),
    )
}

fn argument_of<'a>(
    by_id: &HashMap<&Key, &'a ArgumentRecord>,
    stake: &StakeRecord,
) -> Result<&'a ArgumentRecord> {
    by_id.get(&stake.argument_id).copied().ok_or_else(|| {
        MigrationError::reference_not_found(ARGUMENTS.path(), "id", &stake.argument_id)
    })
}
