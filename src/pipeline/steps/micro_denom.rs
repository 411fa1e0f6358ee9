//! Switch the chain to its micro denomination.
//!
//! Every coin of the stake denomination is rescaled (truncating) and
//! relabelled. Coins of any other denomination are left alone. Each module
//! is only touched when its section is present.

use super::coin_list;
use crate::document::{Amount, Coin, Document, Rate};
use crate::errors::{MigrationError, Result};
use crate::model::{ACCOUNTS, ARGUMENTS, CLAIMS, STAKES, TRANSACTIONS};
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Collection;
use serde_json::{json, Value};

/// Module accounts whose balances the chain recreates at launch.
const POOL_MODULES: [&str; 6] = [
    "user_stakes_tokens_pool",
    "user_growth_tokens_pool",
    "bonded_tokens_pool",
    "user_reward_tokens_pool",
    "not_bonded_tokens_pool",
    "distribution",
];

const DISTRIBUTION_RECORDS: [&str; 7] = [
    "delegator_withdraw_infos",
    "delegator_starting_infos",
    "outstanding_rewards",
    "validator_accumulated_commissions",
    "validator_historical_rewards",
    "validator_current_rewards",
    "validator_slash_events",
];

struct Converter<'a> {
    stake: &'a str,
    micro: &'a str,
    rate: &'a Rate,
}

impl Converter<'_> {
    fn amount(&self, amount: &Amount) -> Coin {
        Coin::new(self.micro, amount.scale(self.rate))
    }

    fn coin(&self, coin: Coin) -> Coin {
        if coin.denom == self.stake {
            self.amount(&coin.amount)
        } else {
            coin
        }
    }

    /// Rewrite the coin object held in `value`.
    fn convert_value(&self, location: &str, value: &mut Value) -> Result<()> {
        let coin = Coin::from_value(location, value)?;
        *value = self.coin(coin).to_value();
        Ok(())
    }

    fn convert_path(&self, document: &mut Document, path: &str) -> Result<()> {
        self.convert_value(path, document.get_path_mut(path)?)
    }

    /// Convert coin `fields` on every record of a collection.
    fn convert_records(
        &self,
        document: &mut Document,
        collection: Collection,
        fields: &[&str],
    ) -> Result<usize> {
        let path = collection.path();
        let records = document.records_mut(path)?;
        for (index, record) in records.iter_mut().enumerate() {
            let location = format!("{path}[{index}]");
            for field in fields {
                let value = record
                    .get_mut(*field)
                    .ok_or_else(|| MigrationError::missing_field(&location, *field))?;
                self.convert_value(&format!("{location}.{field}"), value)?;
            }
        }
        Ok(records.len())
    }
}

pub struct ConvertMicroDenom;

impl MigrationStep for ConvertMicroDenom {
    fn version(&self) -> u32 {
        18
    }

    fn name(&self) -> &'static str {
        "convert-micro-denom"
    }

    fn description(&self) -> &'static str {
        "Convert stake amounts to the micro denomination"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Recompute
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let denominations = &ctx.config.denominations;
        let converter = Converter {
            stake: &denominations.stake,
            micro: &denominations.micro,
            rate: &denominations.micro_rate,
        };
        let micro = converter.micro;

        reset_sdk_modules(&mut document, micro)?;
        if document.has_section(ACCOUNTS.path()) {
            convert_accounts(&mut document, &converter)?;
        }
        if document.has_section("validators") {
            document.remove_section("validators")?;
        }
        if !document.has_section("genutil") {
            document.insert_section("genutil", json!({ "gentx": null }));
        }

        if document.has_section("trubank2") && document.has_section("account") {
            let count = converter.convert_records(&mut document, TRANSACTIONS, &["amount"])?;
            tracing::debug!("Converted {} transactions", count);
        }
        if document.has_section("trustaking") {
            converter.convert_path(&mut document, "trustaking.params.argument_creation_stake")?;
            converter.convert_path(&mut document, "trustaking.params.upvote_stake")?;
            converter.convert_records(&mut document, ARGUMENTS, &["total_stake", "upvoted_stake"])?;
            converter.convert_records(&mut document, STAKES, &["amount"])?;
            convert_stake_results(&mut document, &converter)?;
        }
        if document.has_section("claim") {
            converter.convert_records(
                &mut document,
                CLAIMS,
                &["total_backed", "total_challenged"],
            )?;
        }
        if document.has_section("truslashing") {
            converter.convert_path(&mut document, "truslashing.params.slash_min_stake")?;
        }

        Ok(document)
    }
}

/// Point the SDK modules at the micro denomination and clear state the
/// relaunched chain rebuilds.
fn reset_sdk_modules(document: &mut Document, micro: &str) -> Result<()> {
    let fee = Coin::new(micro, 1000u64).to_value();

    if document.has_section("crisis") {
        document.set_path("crisis.constant_fee", fee.clone())?;
    }
    if document.has_section("supply") {
        document.set_path("supply.supply", json!([]))?;
    }
    if document.has_section("staking") {
        document.set_path("staking.params.bond_denom", micro)?;
        document.set_path("staking.last_total_power", "0")?;
        for field in [
            "validators",
            "last_validator_powers",
            "delegations",
            "unbonding_delegations",
            "redelegations",
        ] {
            document.set_path(&format!("staking.{field}"), Value::Null)?;
        }
        document.set_path("staking.exported", false)?;
    }
    if document.has_section("gov") {
        document.set_path("gov.deposit_params.min_deposit", json!([fee]))?;
    }
    if document.has_section("mint") {
        document.set_path("mint.params.mint_denom", micro)?;
    }
    if document.has_section("distribution") {
        document.set_path("distribution.fee_pool.community_pool", json!([]))?;
        document.set_path("distribution.previous_proposer", "")?;
        for field in DISTRIBUTION_RECORDS {
            document.set_path(&format!("distribution.{field}"), json!([]))?;
        }
    }
    Ok(())
}

/// Pool module accounts are emptied; every other account keeps only its
/// stake balance, converted.
fn convert_accounts(document: &mut Document, converter: &Converter<'_>) -> Result<()> {
    let path = ACCOUNTS.path();
    for (index, account) in document.records_mut(path)?.iter_mut().enumerate() {
        let location = format!("{path}[{index}]");
        let object = account
            .as_object_mut()
            .ok_or_else(|| MigrationError::shape(&location, "record object"))?;
        let is_pool = object
            .get("module_name")
            .and_then(Value::as_str)
            .is_some_and(|name| POOL_MODULES.contains(&name));

        let coins = if is_pool {
            Vec::new()
        } else {
            let held = object
                .get("coins")
                .ok_or_else(|| MigrationError::missing_field(&location, "coins"))?;
            let stake: Amount = coin_list(&format!("{location}.coins"), held)?
                .into_iter()
                .filter(|coin| coin.denom == converter.stake)
                .map(|coin| coin.amount)
                .sum();
            vec![converter.amount(&stake).to_value()]
        };
        object.insert("coins".to_string(), Value::Array(coins));
    }
    Ok(())
}

/// Stake results carry reward coins once a stake has been settled.
fn convert_stake_results(document: &mut Document, converter: &Converter<'_>) -> Result<()> {
    let path = STAKES.path();
    for (index, stake) in document.records_mut(path)?.iter_mut().enumerate() {
        let Some(result) = stake.get_mut("result").filter(|r| !r.is_null()) else {
            continue;
        };
        let location = format!("{path}[{index}].result");
        for field in ["argument_creator_reward", "stake_creator_reward"] {
            let reward = result
                .get_mut(field)
                .ok_or_else(|| MigrationError::missing_field(&location, field))?;
            converter.convert_value(&format!("{location}.{field}"), reward)?;
        }
    }
    Ok(())
}
