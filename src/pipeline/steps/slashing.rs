use super::address_list;
use crate::document::{Coin, Document};
use crate::errors::Result;
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use serde_json::json;

/// One week, in nanoseconds.
const JAIL_DURATION: &str = "604800000000000";

/// Installs the `truslashing` module and the account jail duration.
pub struct AddSlashingModule;

impl MigrationStep for AddSlashingModule {
    fn version(&self) -> u32 {
        9
    }

    fn name(&self) -> &'static str {
        "add-slashing-module"
    }

    fn description(&self) -> &'static str {
        "Add the truslashing module and account jail duration"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Addition
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let min_stake = Coin::new(ctx.config.denominations.legacy.as_str(), 10_000_000_000u64);
        document.insert_section(
            "truslashing",
            json!({
                "params": {
                    "min_slash_count": "5",
                    "slash_magnitude": "3",
                    "slash_min_stake": min_stake.to_value(),
                    "slash_admins": address_list(&ctx.config.admins.initial_slash_admins),
                    "curator_share": "0.250000000000000000"
                }
            }),
        );
        document.set_path("account.params.jail_duration", JAIL_DURATION)?;
        ctx.stamp(&mut document);
        Ok(document)
    }
}
