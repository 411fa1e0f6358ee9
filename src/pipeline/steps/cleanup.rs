//! Remove sections superseded by the claim, staking and bank modules, and
//! install the shared admin lists.

use super::address_list;
use crate::document::Document;
use crate::errors::Result;
use crate::model::ACCOUNTS;
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Resolver;
use serde_json::{json, Value};

/// The legacy `argument` section is not among them and stays in place.
const DEPRECATED_SECTIONS: [&str; 5] = ["backing", "challenge", "expiration", "story", "trubank"];

/// Parameter fields that receive the shared admin list.
const ADMIN_FIELDS: [&str; 4] = [
    "claim.params.claim_admins",
    "truslashing.params.slash_admins",
    "community.params.community_admins",
    "trustaking.params.staking_admins",
];

pub struct RemoveDeprecatedSections;

impl MigrationStep for RemoveDeprecatedSections {
    fn version(&self) -> u32 {
        11
    }

    fn name(&self) -> &'static str {
        "remove-deprecated-sections"
    }

    fn description(&self) -> &'static str {
        "Drop legacy sections and install module admins and app accounts"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Restructure
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let app_accounts = Resolver::new(&document)
            .records(ACCOUNTS)?
            .iter()
            .map(|account| Ok(json!({ "addresses": [account.require_str("address")?] })))
            .collect::<Result<Vec<Value>>>()?;

        for section in DEPRECATED_SECTIONS {
            document.remove_section(section)?;
        }
        ctx.stamp(&mut document);

        document.set_path("truslashing.params.max_detailed_reason_length", "140")?;
        let admins = address_list(&ctx.config.admins.module_admins);
        for field in ADMIN_FIELDS {
            document.set_path(field, admins.clone())?;
        }
        document.set_path("truslashing.params.slash_min_stake.amount", "25000000000")?;
        document.set_path("account.app_accounts", Value::Array(app_accounts))?;

        Ok(document)
    }
}
