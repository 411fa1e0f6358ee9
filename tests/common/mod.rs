// Test utility module for genesis-migrate integration tests
#![allow(dead_code)]

use genesis_migrate::config::{MigrateConfig, MigrationParams};
use genesis_migrate::pipeline::{standard_pipeline, StepContext, StepSelection};
use genesis_migrate::{Document, Result};
use indoc::indoc;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Author of argument 10.
pub const ALICE: &str = "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn";
/// Upvoter of argument 10.
pub const BOB: &str = "cosmos1xqc5gwfhx4f5k3jcf4r55j6ntge5y3jtxesy8r";

const LEGACY_EXPORT: &str = indoc! {r#"
{
  "chain_id": "alpha-1",
  "genesis_time": "2019-01-01T00:00:00Z",
  "consensus_params": {"block": {"max_bytes": "1"}},
  "validators": [],
  "app_state": {
    "auth": {"collected_fees": []},
    "expiration": {"params": {}},
    "trubank": {"params": {}},
    "account": {"params": {"max_slash_count": "50"}},
    "distribution": {
      "community_tax": "0.020000000000000000",
      "fee_pool": {"community_pool": []}
    },
    "accounts": [
      {
        "address": "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn",
        "coins": [{"amount": "1000", "denom": "trusteak"}]
      },
      {
        "address": "cosmos1xqc5gwfhx4f5k3jcf4r55j6ntge5y3jtxesy8r",
        "coins": [{"amount": "2500", "denom": "trusteak"}]
      }
    ],
    "category": {
      "categories": [{
        "id": 1,
        "slug": "crypto",
        "title": "Cryptocurrency",
        "total_cred": "cred-crypto",
        "timestamp": {"created_time": "2019-01-02T00:00:00Z"}
      }]
    },
    "story": {
      "params": {"min_story_length": "25", "max_story_length": "350"},
      "story_queue": [],
      "stories": [{
        "id": 1,
        "body": "Bitcoin will outlive every fiat currency.",
        "category_id": 1,
        "creator": "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn",
        "status": 0,
        "expire_time": "2019-02-01T00:00:00Z",
        "type": 0,
        "timestamp": {
          "created_time": "2019-01-03T00:00:00Z",
          "updated_time": "2019-01-03T00:00:00Z"
        }
      }]
    },
    "argument": {
      "arguments": [{
        "id": 10,
        "story_id": 1,
        "stake_id": 1,
        "creator": "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn",
        "body": "Fixed supply and no central issuer make it the hardest money available.",
        "timestamp": {
          "created_time": "2019-01-04T00:00:00Z",
          "updated_time": "2019-01-05T00:00:00Z"
        }
      }]
    },
    "backing": {
      "backings": [
        {"vote": {
          "id": 1, "story_id": 1, "argument_id": 10,
          "creator": "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn",
          "amount": {"amount": "100", "denom": "trusteak"},
          "vote": true,
          "timestamp": {"created_time": "2019-01-04T00:00:00Z"}
        }},
        {"vote": {
          "id": 2, "story_id": 1, "argument_id": 10,
          "creator": "cosmos1xqc5gwfhx4f5k3jcf4r55j6ntge5y3jtxesy8r",
          "amount": {"amount": "50", "denom": "trusteak"},
          "vote": true,
          "timestamp": {"created_time": "2019-01-06T00:00:00Z"}
        }}
      ]
    },
    "challenge": {"challenges": []}
  }
}
"#};

const TEMPLATE: &str = indoc! {r#"
{
  "chain_id": "template",
  "genesis_time": "2019-06-01T00:00:00Z",
  "consensus_params": {"block": {"max_bytes": "22020096", "max_gas": "-1"}},
  "app_state": {
    "auth": {"collected_fees": [], "params": {"max_memo_characters": "256"}},
    "staking": {"params": {"bond_denom": "stake", "max_validators": 100}},
    "distr": {"community_tax": "0.020000000000000000"},
    "genutil": {"gentxs": null},
    "params": {},
    "expiration": {"params": {"expiration_duration": "86400000000000"}}
  }
}
"#};

pub fn legacy_export_json() -> &'static str {
    LEGACY_EXPORT
}

pub fn template_json() -> &'static str {
    TEMPLATE
}

pub fn legacy_export() -> Document {
    Document::from_json_str(LEGACY_EXPORT).expect("fixture export is valid")
}

pub fn template() -> Document {
    Document::from_json_str(TEMPLATE).expect("fixture template is valid")
}

pub fn params() -> MigrationParams {
    MigrationParams {
        chain_id: "devnet-n".into(),
        start_time: "2019-02-11T12:00:00Z".into(),
        bond_denom: "trusteak".into(),
    }
}

/// Run a selection of the standard catalogue with default configuration.
pub fn run(selection: StepSelection, document: Document) -> Result<Document> {
    let (params, config, template) = (params(), MigrateConfig::default(), template());
    let ctx = StepContext::new(&params, &config).with_template(&template);
    standard_pipeline(&selection)?.run(document, &ctx)
}

/// Run steps `1..=to` over the legacy export.
pub fn migrate_to(to: u32) -> Result<Document> {
    run(StepSelection::range(None, Some(to)), legacy_export())
}

// Helper to create temporary test files
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

pub fn records<'a>(document: &'a Document, path: &str) -> &'a Vec<Value> {
    document.records(path).expect("collection exists")
}
