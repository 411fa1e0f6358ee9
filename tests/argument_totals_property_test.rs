use genesis_migrate::aggregate::{argument_totals, ArgumentAuthor};
use genesis_migrate::document::{Amount, Document, Key};
use genesis_migrate::model::{legacy_votes, StakeKind};
use proptest::prelude::*;
use serde_json::{json, Value};

const AUTHOR: &str = "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn";

fn vote(creator: &str, amount: &str, supports: bool) -> Value {
    json!({"vote": {
        "story_id": 1, "argument_id": 7, "creator": creator,
        "amount": {"amount": amount, "denom": "trusteak"}, "vote": supports
    }})
}

/// Decimal amounts wider than 64 bits.
fn amount_text() -> impl Strategy<Value = String> {
    (any::<u64>(), any::<u64>()).prop_map(|(high, low)| {
        let value = (u128::from(high) << 64) | u128::from(low);
        value.to_string()
    })
}

fn document(author_amount: &str, supports: bool, upvotes: &[String]) -> Document {
    let author_vote = vote(AUTHOR, author_amount, supports);
    let upvotes: Vec<Value> = upvotes
        .iter()
        .enumerate()
        .map(|(i, amount)| vote(&format!("cosmos1voter{i}"), amount, true))
        .collect();
    let (backings, challenges) = if supports {
        ([vec![author_vote], upvotes].concat(), vec![])
    } else {
        (upvotes, vec![author_vote])
    };

    Document::from_value(json!({
        "app_state": {
            "argument": {"arguments": [{"id": 7, "creator": AUTHOR}]},
            "backing": {"backings": backings},
            "challenge": {"challenges": challenges}
        }
    }))
    .unwrap()
}

proptest! {
    #[test]
    fn upvoted_stake_plus_author_stake_is_total(
        author_amount in amount_text(),
        supports in any::<bool>(),
        upvotes in prop::collection::vec(amount_text(), 0..8),
    ) {
        let document = document(&author_amount, supports, &upvotes);
        let authors = vec![ArgumentAuthor { id: Key::from(7u64), creator: AUTHOR.to_string() }];
        let votes = legacy_votes(&document).unwrap();

        let totals = argument_totals(&document, &authors, &votes).unwrap();
        let totals = &totals[&Key::from(7u64)];

        let author = Amount::parse("author", &author_amount).unwrap();
        prop_assert_eq!(totals.total_stake.checked_sub(&totals.upvoted_stake), Some(author));
        prop_assert_eq!(totals.total_count, upvotes.len() as u64 + 1);
        prop_assert_eq!(totals.upvoted_count, upvotes.len() as u64);
        prop_assert_eq!(totals.stake_type, StakeKind::from_vote(supports));
    }
}
