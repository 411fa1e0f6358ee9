use crate::document::Document;
use crate::errors::Result;
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use serde_json::json;

/// Injects the `mint` module with its launch minter and parameters.
pub struct AddMintModule;

impl MigrationStep for AddMintModule {
    fn version(&self) -> u32 {
        4
    }

    fn name(&self) -> &'static str {
        "add-mint-module"
    }

    fn description(&self) -> &'static str {
        "Add the mint module"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Addition
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        document.insert_section(
            "mint",
            json!({
                "minter": {
                    "inflation": "0.200000000000000000",
                    "annual_provisions": "0.000000000000000000"
                },
                "params": {
                    // The stake denom in use, so the later denom renames reach it.
                    "mint_denom": ctx.config.denominations.legacy,
                    "inflation_rate_change": "0.150000000000000000",
                    "inflation_max": "0.250000000000000000",
                    "inflation_min": "0.100000000000000000",
                    "goal_bonded": "0.670000000000000000",
                    "blocks_per_year": "6311520"
                }
            }),
        );
        ctx.stamp(&mut document);
        Ok(document)
    }
}
