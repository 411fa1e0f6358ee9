//! Pure aggregation functions over decoded records.
//!
//! [`aggregate`] is the group-by-key accumulation every derived total in the
//! migration is built on. [`aggregate_into`] is the strict variant used when
//! the set of groups is known up front: a record whose key has no seeded group
//! is a dangling reference.

pub mod arguments;
pub mod claims;
pub mod earnings;

pub use arguments::{argument_totals, ArgumentAuthor, ArgumentTotals};
pub use claims::{legacy_claim_totals, stake_claim_totals, ClaimTotals};
pub use earnings::{user_earnings, UserEarnings};

use crate::errors::{MigrationError, Result};
use std::collections::BTreeMap;

/// Group records by key and fold each group's values (pure).
///
/// # Arguments
///
/// * `records` - Records to aggregate
/// * `group_key` - Extracts the group key of a record
/// * `value` - Extracts the value a record contributes
/// * `combine` - Folds a value into its group's accumulator
///
/// # Returns
///
/// Accumulators by key, in key order
pub fn aggregate<R, K, V, A, G, F, C>(
    records: impl IntoIterator<Item = R>,
    group_key: G,
    value: F,
    combine: C,
) -> Result<BTreeMap<K, A>>
where
    K: Ord,
    A: Default,
    G: FnMut(&R) -> Result<K>,
    F: FnMut(&R) -> Result<V>,
    C: FnMut(&mut A, V),
{
    fold_records(
        BTreeMap::new(),
        records,
        group_key,
        value,
        combine,
        None::<fn(&K) -> MigrationError>,
    )
}

/// Like [`aggregate`], but only into groups present in `seed`.
///
/// # Arguments
///
/// * `seed` - Every valid group with its starting accumulator
/// * `dangling` - Builds the error for a record whose key is not seeded
///
/// # Returns
///
/// The seeded map with every record folded in
pub fn aggregate_into<R, K, V, A, G, F, C, D>(
    seed: BTreeMap<K, A>,
    records: impl IntoIterator<Item = R>,
    group_key: G,
    value: F,
    combine: C,
    dangling: D,
) -> Result<BTreeMap<K, A>>
where
    K: Ord,
    A: Default,
    G: FnMut(&R) -> Result<K>,
    F: FnMut(&R) -> Result<V>,
    C: FnMut(&mut A, V),
    D: Fn(&K) -> MigrationError,
{
    fold_records(seed, records, group_key, value, combine, Some(dangling))
}

fn fold_records<R, K, V, A, G, F, C, D>(
    mut groups: BTreeMap<K, A>,
    records: impl IntoIterator<Item = R>,
    mut group_key: G,
    mut value: F,
    mut combine: C,
    dangling: Option<D>,
) -> Result<BTreeMap<K, A>>
where
    K: Ord,
    A: Default,
    G: FnMut(&R) -> Result<K>,
    F: FnMut(&R) -> Result<V>,
    C: FnMut(&mut A, V),
    D: Fn(&K) -> MigrationError,
{
    for record in records {
        let key = group_key(&record)?;
        let contribution = value(&record)?;
        let accumulator = match &dangling {
            Some(dangling) => match groups.get_mut(&key) {
                Some(accumulator) => accumulator,
                None => return Err(dangling(&key)),
            },
            None => groups.entry(key).or_default(),
        };
        combine(accumulator, contribution);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_sums_by_key() {
        let records = [("a", 1u64), ("b", 5), ("a", 2)];
        let totals = aggregate(
            records.iter(),
            |r| Ok(r.0),
            |r| Ok(r.1),
            |acc: &mut u64, v| *acc += v,
        )
        .unwrap();
        assert_eq!(totals.get("a"), Some(&3));
        assert_eq!(totals.get("b"), Some(&5));
    }

    #[test]
    fn test_aggregate_empty_input() {
        let totals = aggregate(
            Vec::<u64>::new(),
            |r| Ok(*r),
            |r| Ok(*r),
            |acc: &mut u64, v| *acc += v,
        )
        .unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn test_aggregate_into_keeps_empty_groups() {
        let seed = BTreeMap::from([("a", 0u64), ("z", 0)]);
        let totals = aggregate_into(
            seed,
            [("a", 4u64)],
            |r| Ok(r.0),
            |r| Ok(r.1),
            |acc, v| *acc += v,
            |k| MigrationError::reference_not_found("test", "id", k),
        )
        .unwrap();
        assert_eq!(totals, BTreeMap::from([("a", 4), ("z", 0)]));
    }

    #[test]
    fn test_aggregate_into_rejects_unknown_group() {
        let seed = BTreeMap::from([("a", 0u64)]);
        let err = aggregate_into(
            seed,
            [("b", 1u64)],
            |r| Ok(r.0),
            |r| Ok(r.1),
            |acc, v| *acc += v,
            |k| MigrationError::reference_not_found("test", "id", k),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "no record in `test` with id = b");
    }

    #[test]
    fn test_aggregate_propagates_extractor_errors() {
        let err = aggregate(
            [1u64],
            |_| Err::<u64, _>(MigrationError::missing_field("r[0]", "id")),
            |r| Ok(*r),
            |acc: &mut u64, v| *acc += v,
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::MissingField { .. }));
    }
}
