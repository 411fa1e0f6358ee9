//! Argument-level stake totals derived from legacy votes.

use super::aggregate_into;
use crate::document::{Amount, Document, Key};
use crate::errors::{MigrationError, Result};
use crate::model::{LegacyVote, StakeKind, BACKINGS, CHALLENGES, LEGACY_ARGUMENTS};
use crate::resolver::Resolver;
use std::collections::BTreeMap;

/// Derived stake fields of one argument.
///
/// `upvoted_stake + author stake == total_stake` and
/// `upvoted_count == total_count - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTotals {
    pub total_stake: Amount,
    pub total_count: u64,
    pub upvoted_stake: Amount,
    pub upvoted_count: u64,
    pub stake_type: StakeKind,
}

/// Identity of an argument as far as the totals are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentAuthor {
    pub id: Key,
    pub creator: String,
}

/// Compute [`ArgumentTotals`] for every argument.
///
/// Totals sum every legacy vote on the argument. The author's own vote is
/// the first vote on the argument cast by its creator, searching backings
/// before challenges; it fixes the argument's side and is excluded from the
/// upvoted figures.
///
/// Fails with `ReferenceNotFound` if a vote names an unknown argument or an
/// argument has no author vote, and with `InconsistentAggregate` if the author
/// vote exceeds the total.
pub fn argument_totals(
    document: &Document,
    arguments: &[ArgumentAuthor],
    votes: &[LegacyVote],
) -> Result<BTreeMap<Key, ArgumentTotals>> {
    let seed = arguments
        .iter()
        .map(|argument| (argument.id.clone(), (Amount::zero(), 0u64)))
        .collect();
    let sums = aggregate_into(
        seed,
        votes,
        |vote| Ok(vote.argument_id.clone()),
        |vote| Ok(vote.amount.amount.clone()),
        |(stake, count): &mut (Amount, u64), amount| {
            *stake += amount;
            *count += 1;
        },
        |id| MigrationError::reference_not_found(LEGACY_ARGUMENTS.path(), "id", id),
    )?;

    let resolver = Resolver::new(document);
    let mut totals = BTreeMap::new();
    for argument in arguments {
        let author = author_vote(&resolver, argument)?;
        let (total_stake, total_count) = sums
            .get(&argument.id)
            .cloned()
            .unwrap_or_default();
        let upvoted_stake = total_stake.checked_sub(&author.amount.amount).ok_or_else(|| {
            MigrationError::inconsistent(
                format!("argument {}", argument.id),
                format!(
                    "author stake {} exceeds total stake {}",
                    author.amount.amount, total_stake
                ),
            )
        })?;
        totals.insert(
            argument.id.clone(),
            ArgumentTotals {
                total_stake,
                total_count,
                upvoted_stake,
                upvoted_count: total_count.saturating_sub(1),
                stake_type: StakeKind::from_vote(author.supports),
            },
        );
    }
    Ok(totals)
}

fn author_vote(resolver: &Resolver<'_>, argument: &ArgumentAuthor) -> Result<LegacyVote> {
    let record = resolver.find_where_either(
        BACKINGS,
        CHALLENGES,
        "vote.argument_id+vote.creator",
        format!("{}/{}", argument.id, argument.creator),
        |record| {
            let vote = record.require_object("vote")?;
            Ok(vote.require_key("argument_id")? == argument.id
                && vote.require_str("creator")? == argument.creator)
        },
    )?;
    LegacyVote::decode(&record)
}
