//! Recompute claim totals from stakes.
//!
//! Claim totals were first derived from legacy votes. Stakes are now the
//! source of truth, and totals recomputed from them may only grow: a lower
//! recomputed figure means stakes were lost and aborts the migration.

use super::for_each_record;
use crate::aggregate::{stake_claim_totals, ClaimTotals};
use crate::document::{Amount, Coin, Document, Key, RecordView};
use crate::errors::{MigrationError, Result};
use crate::model::{ArgumentRecord, StakeRecord, ARGUMENTS, CLAIMS, STAKES};
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Resolver;

pub struct FixClaimTotals;

/// Stored figures of one claim.
struct StoredTotals {
    id: Key,
    backed: Coin,
    challenged: Coin,
}

impl StoredTotals {
    fn decode(record: &RecordView<'_>) -> Result<Self> {
        Ok(Self {
            id: record.require_key("id")?,
            backed: record.require_coin("total_backed")?,
            challenged: record.require_coin("total_challenged")?,
        })
    }
}

/// Value to write back: the recomputed total, if it does not regress.
fn checked_total(entity: &str, aggregate: &str, stored: &Amount, recomputed: Amount) -> Result<Amount> {
    if recomputed < *stored {
        return Err(MigrationError::regression(entity, aggregate, stored, recomputed));
    }
    Ok(recomputed)
}

impl MigrationStep for FixClaimTotals {
    fn version(&self) -> u32 {
        10
    }

    fn name(&self) -> &'static str {
        "fix-claim-totals"
    }

    fn description(&self) -> &'static str {
        "Recompute claim totals from stakes and set the reward broker"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Recompute
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let updates = recomputed_totals(&document)?;

        document.set_path("trustaking.params.argument_body_max_length", "1500")?;
        document.set_path(
            "trubank2.params.reward_broker_address",
            ctx.config.accounts.reward_broker.as_str(),
        )?;

        let mut updates = updates.into_iter();
        for_each_record(&mut document, CLAIMS, |_, mut claim| {
            if let Some((backed, challenged)) = updates.next() {
                claim.insert("total_backed", backed.to_value());
                claim.insert("total_challenged", challenged.to_value());
            }
            Ok(())
        })?;

        ctx.stamp(&mut document);
        Ok(document)
    }
}

/// New `(total_backed, total_challenged)` per claim, in claim order.
fn recomputed_totals(document: &Document) -> Result<Vec<(Coin, Coin)>> {
    let resolver = Resolver::new(document);
    let claims = resolver
        .records(CLAIMS)?
        .iter()
        .map(StoredTotals::decode)
        .collect::<Result<Vec<_>>>()?;
    let stakes = resolver
        .records(STAKES)?
        .iter()
        .map(StakeRecord::decode)
        .collect::<Result<Vec<_>>>()?;
    let arguments = resolver
        .records(ARGUMENTS)?
        .iter()
        .map(ArgumentRecord::decode)
        .collect::<Result<Vec<_>>>()?;

    let totals = stake_claim_totals(claims.iter().map(|c| c.id.clone()), &stakes, &arguments)?;

    claims
        .into_iter()
        .map(|claim| {
            let recomputed = totals.get(&claim.id).cloned().unwrap_or_default();
            let ClaimTotals {
                backed, challenged, ..
            } = recomputed;
            let entity = format!("claim {}", claim.id);
            let backed = checked_total(&entity, "total_backed", &claim.backed.amount, backed)?;
            let challenged =
                checked_total(&entity, "total_challenged", &claim.challenged.amount, challenged)?;
            Ok((
                Coin::new(claim.backed.denom, backed),
                Coin::new(claim.challenged.denom, challenged),
            ))
        })
        .collect()
}
