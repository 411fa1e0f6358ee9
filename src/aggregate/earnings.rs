//! Per-account earnings by community.
//!
//! Earnings are held as coins whose denomination is the community id, so an
//! account's earnings form one coin per community it earned in.

use super::aggregate;
use crate::document::{Amount, Coin, Rate};
use crate::errors::{MigrationError, Result};
use crate::model::{Transaction, TransactionKind};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEarnings {
    pub address: String,
    pub coins: Vec<Coin>,
}

/// Net earnings per account and community (pure).
///
/// Each earning transaction adds `truncate(amount * rate)` to its community;
/// each deducting transaction subtracts the same quantity. Truncation happens
/// per transaction, and transactions apply in stored order.
///
/// # Arguments
///
/// * `transactions` - Bank transactions
/// * `earning` - Transaction kinds that count as earnings
/// * `deducting` - Transaction kinds that take earnings back
/// * `rate` - Conversion applied to each counted amount
///
/// # Returns
///
/// Earnings sorted by address, each with coins sorted by community. Accounts
/// with no counted transactions are omitted. A deduction that exceeds the
/// community's running balance is `InconsistentAggregate`.
pub fn user_earnings(
    transactions: &[Transaction],
    earning: &[TransactionKind],
    deducting: &[TransactionKind],
    rate: &Rate,
) -> Result<Vec<UserEarnings>> {
    let counted = transactions
        .iter()
        .filter(|tx| earning.contains(&tx.kind) || deducting.contains(&tx.kind));
    let grouped = aggregate(
        counted,
        |tx| Ok(tx.address.clone()),
        |tx| Ok(*tx),
        |history: &mut Vec<&Transaction>, tx| history.push(tx),
    )?;

    grouped
        .into_iter()
        .map(|(address, history)| {
            let coins = community_balances(&address, &history, deducting, rate)?;
            Ok(UserEarnings { address, coins })
        })
        .collect()
}

fn community_balances(
    address: &str,
    history: &[&Transaction],
    deducting: &[TransactionKind],
    rate: &Rate,
) -> Result<Vec<Coin>> {
    let mut balances: BTreeMap<String, Amount> = BTreeMap::new();
    for tx in history {
        let community = tx.require_community()?;
        let amount = tx.amount.amount.scale(rate);
        let balance = balances.entry(community.to_string()).or_default();
        if deducting.contains(&tx.kind) {
            let remaining = balance.checked_sub(&amount).ok_or_else(|| {
                MigrationError::inconsistent(
                    format!("earnings of {address} in {community}"),
                    format!("deduction {amount} at {} exceeds balance {balance}", tx.location),
                )
            })?;
            *balance = remaining;
        } else {
            *balance += amount;
        }
    }
    Ok(balances
        .into_iter()
        .map(|(community, amount)| Coin::new(community, amount))
        .collect())
}
