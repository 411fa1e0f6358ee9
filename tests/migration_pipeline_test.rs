mod common;

use common::{legacy_export, migrate_to, records, run, ALICE, BOB};
use genesis_migrate::errors::ErrorCode;
use genesis_migrate::pipeline::steps::{AddMintModule, MigrateStakes};
use genesis_migrate::pipeline::{PipelineBuilder, StepSelection};
use genesis_migrate::Document;
use pretty_assertions::assert_eq;
use serde_json::json;

fn renamed(address: &str) -> String {
    address.replacen("cosmos1", "tru1", 1)
}

#[test]
fn test_argument_totals_survive_through_renames() {
    let migrated = migrate_to(13).unwrap();

    let argument = &records(&migrated, "trustaking.arguments")[0];
    assert_eq!(argument["id"], json!(10));
    assert_eq!(argument["claim_id"], json!(1));
    assert_eq!(argument["creator"], json!(renamed(ALICE)));
    assert_eq!(argument["total_stake"], json!({"amount": "150", "denom": "tru"}));
    assert_eq!(argument["upvoted_stake"], json!({"amount": "50", "denom": "tru"}));
    assert_eq!(argument["upvoted_count"], json!("1"));
    assert_eq!(argument["stake_type"], json!(0));
    assert_eq!(argument["community_id"], json!("crypto"));
}

#[test]
fn test_stakes_follow_their_votes() {
    let migrated = migrate_to(13).unwrap();

    let stakes = records(&migrated, "trustaking.stakes");
    assert_eq!(stakes.len(), 2);
    assert_eq!(stakes[0]["creator"], json!(renamed(ALICE)));
    assert_eq!(stakes[0]["type"], json!(0));
    assert_eq!(stakes[1]["creator"], json!(renamed(BOB)));
    assert_eq!(stakes[1]["amount"], json!({"amount": "50", "denom": "tru"}));

    let claim = &records(&migrated, "claim.claims")[0];
    assert_eq!(claim["total_backed"], json!({"amount": "150", "denom": "tru"}));
    assert_eq!(claim["total_challenged"], json!({"amount": "0", "denom": "tru"}));
}

#[test]
fn test_cleanup_drops_superseded_sections_only() {
    let migrated = migrate_to(11).unwrap();

    for section in ["story", "backing", "challenge", "expiration", "trubank"] {
        assert!(!migrated.has_section(section), "{section} still present");
    }
    for section in ["category", "argument", "claim", "community", "trustaking", "trubank2"] {
        assert!(migrated.has_section(section), "{section} missing");
    }
    assert_eq!(migrated.root_field("chain_id").unwrap(), &json!("devnet-n"));
    assert_eq!(
        migrated.root_field("genesis_time").unwrap(),
        &json!("2019-02-11T12:00:00Z")
    );
}

#[test]
fn test_full_run_produces_micro_denominated_relaunch() {
    let migrated = run(StepSelection::all(), legacy_export()).unwrap();
    let text = migrated.to_canonical_string().unwrap();

    assert!(!text.contains("trusteak"));
    assert!(!text.contains("cosmos1"));
    assert_eq!(migrated.root_field("chain_id").unwrap(), &json!("betanet-1"));
    assert!(migrated.root_field("validators").is_err());

    let accounts = records(&migrated, "accounts");
    let alice = accounts
        .iter()
        .find(|account| account["address"] == json!(renamed(ALICE)))
        .unwrap();
    assert_eq!(alice["coins"], json!([{"amount": "1", "denom": "utru"}]));
    let bob = accounts
        .iter()
        .find(|account| account["address"] == json!(renamed(BOB)))
        .unwrap();
    assert_eq!(bob["coins"], json!([{"amount": "2", "denom": "utru"}]));

    assert_eq!(
        migrated.get_path("mint.params.mint_denom").unwrap(),
        &json!("utru")
    );
    assert_eq!(
        migrated.get_path("trustaking.users_earnings").unwrap(),
        &json!([])
    );
}

#[test]
fn test_inflated_stored_total_is_a_regression() {
    let mut document = migrate_to(9).unwrap();
    let mut claims = records(&document, "claim.claims").clone();
    claims[0]["total_backed"]["amount"] = json!("999");
    document.set_path("claim.claims", json!(claims)).unwrap();

    let err = run(StepSelection::Named("fix-claim-totals".into()), document).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AGGREGATE_REGRESSION);
    assert_eq!(err.failed_step(), Some("fix-claim-totals"));
}

#[test]
fn test_vote_on_unknown_argument_stops_the_run() {
    let mut value = legacy_export().into_value();
    value["app_state"]["backing"]["backings"]
        .as_array_mut()
        .unwrap()
        .push(json!({"vote": {
            "story_id": 1, "argument_id": 42, "creator": BOB,
            "amount": {"amount": "5", "denom": "trusteak"}, "vote": true,
            "timestamp": {"created_time": "2019-01-07T00:00:00Z"}
        }}));
    let document = Document::from_value(value).unwrap();

    let err = run(StepSelection::range(None, Some(5)), document).unwrap_err();
    assert_eq!(err.code(), ErrorCode::REFERENCE_NOT_FOUND);
    assert_eq!(err.failed_step(), Some("migrate-arguments"));
    assert!(err.to_string().contains("42"));
}

#[test]
fn test_stake_denom_rename_touches_nothing_else() {
    let before = migrate_to(11).unwrap();
    let expected = before.to_canonical_string().unwrap().replace("trusteak", "tru");

    let after = run(StepSelection::Named("rename-stake-denom".into()), before).unwrap();
    assert_eq!(after.to_canonical_string().unwrap(), expected);
}

#[test]
fn test_token_inflation_is_not_idempotent() {
    let once = migrate_to(16).unwrap();
    let twice = run(StepSelection::Named("token-inflation".into()), once.clone()).unwrap();

    let fee_collectors = |document: &Document| {
        records(document, "accounts")
            .iter()
            .filter(|account| account["module_name"] == json!("fee_collector"))
            .count()
    };
    assert_eq!(fee_collectors(&once), 1);
    assert_eq!(fee_collectors(&twice), 2);
}

#[test]
fn test_misordered_pipeline_is_rejected() {
    let err = PipelineBuilder::new()
        .step(MigrateStakes)
        .step(AddMintModule)
        .build()
        .err()
        .unwrap();
    assert_eq!(err.code(), ErrorCode::CONFIGURATION);
    assert!(err.to_string().contains("add-mint-module"));
}

#[test]
fn test_template_is_required_for_reconcile() {
    let pipeline = genesis_migrate::standard_pipeline(&StepSelection::range(Some(1), Some(1)))
        .unwrap();
    assert!(pipeline.requires_template());

    let pipeline = genesis_migrate::standard_pipeline(&StepSelection::range(Some(2), None))
        .unwrap();
    assert!(!pipeline.requires_template());
}
