//! The migration step catalogue.
//!
//! One module per schema change, in version order. Shared helpers for
//! rewriting record collections live here.

pub mod arguments;
pub mod bank;
pub mod claim_totals;
pub mod claims;
pub mod cleanup;
pub mod communities;
pub mod earnings;
pub mod inflation;
pub mod micro_denom;
pub mod mint;
pub mod reconcile;
pub mod rename;
pub mod slashing;
pub mod stakes;

pub use arguments::MigrateArguments;
pub use bank::AddBankTransactions;
pub use claim_totals::FixClaimTotals;
pub use claims::StoriesToClaims;
pub use cleanup::RemoveDeprecatedSections;
pub use communities::CategoriesToCommunities;
pub use earnings::RecomputeUsersEarnings;
pub use inflation::{TokenInflation, TokenInflationReset};
pub use micro_denom::ConvertMicroDenom;
pub use mint::AddMintModule;
pub use reconcile::ReconcileTemplate;
pub use rename::{RenameAddressPrefix, RenameStakeDenom};
pub use slashing::AddSlashingModule;
pub use stakes::MigrateStakes;

use crate::document::{Coin, Document, RecordMut};
use crate::errors::{MigrationError, Result};
use crate::resolver::Collection;
use serde_json::Value;

/// Apply `f` to every record of `collection` with its position.
///
/// Callers decode and validate what they need beforehand; `f` should only
/// fail on fields it reads itself.
pub(crate) fn for_each_record<F>(document: &mut Document, collection: Collection, mut f: F) -> Result<()>
where
    F: FnMut(usize, RecordMut<'_>) -> Result<()>,
{
    let path = collection.path();
    for (index, value) in document.records_mut(path)?.iter_mut().enumerate() {
        f(index, RecordMut::new(path, index, value)?)?;
    }
    Ok(())
}

/// Apply one patch per record of `collection`, pairing them by position.
///
/// Fails with `ShapeMismatch` before touching any record when the counts
/// differ.
pub(crate) fn patch_records<P, F>(
    document: &mut Document,
    collection: Collection,
    patches: Vec<P>,
    mut f: F,
) -> Result<()>
where
    F: FnMut(P, RecordMut<'_>) -> Result<()>,
{
    let records = document.records(collection.path())?.len();
    if records != patches.len() {
        return Err(MigrationError::shape(
            format!(
                "{} ({records} records, {} patches)",
                collection.path(),
                patches.len()
            ),
            "one patch per record",
        ));
    }

    let mut patches = patches.into_iter();
    for_each_record(document, collection, |_, record| match patches.next() {
        Some(patch) => f(patch, record),
        None => Ok(()),
    })
}

/// Decode a JSON array of coin objects.
pub(crate) fn coin_list(location: &str, value: &Value) -> Result<Vec<Coin>> {
    let coins = value
        .as_array()
        .ok_or_else(|| MigrationError::shape(location, "coin list"))?;
    coins
        .iter()
        .enumerate()
        .map(|(index, coin)| Coin::from_value(&format!("{location}[{index}]"), coin))
        .collect()
}

/// Admin address list as a JSON array.
pub(crate) fn address_list(addresses: &[String]) -> Value {
    addresses.iter().map(String::as_str).collect()
}
