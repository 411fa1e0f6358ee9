//! Token inflation: module pools, allocations and the SDK modules that
//! inflation depends on, followed by a reset for the relaunched chain.

use super::for_each_record;
use crate::document::{Amount, Coin, Document};
use crate::errors::Result;
use crate::model::ACCOUNTS;
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use serde_json::{json, Value};

/// Tokens in circulation when inflation starts.
const INITIAL_SUPPLY: u64 = 253_644_628_704_484;

/// Module accounts holding the inflation pools: module name, address body
/// (without prefix) and opening balance.
const MODULE_ACCOUNTS: [(&str, &str, u64); 4] = [
    ("fee_collector", "17xpfvakm2amg962yls6f84z3kell8c5lserqta", 0),
    ("user_reward_tokens_pool", "1ed82m7snyk8mux8xxpwygvtyq633a4k43rfp8l", 2_500_000),
    ("user_growth_tokens_pool", "1f7x5wx3adh6klcurmd8n36etx4elgu9d4wkys3", 2_500_000),
    ("stakeholder_tokens_pool", "1m9rhdryf059x684um3pa9n30tsdxuww84pxemz", 0),
];

const BONDED_POOL: &str = "bonded_tokens_pool";

fn module_account(address: String, module_name: &str, coins: Vec<Coin>) -> Value {
    json!({
        "address": address,
        "coins": coins.iter().map(Coin::to_value).collect::<Vec<_>>(),
        "sequence_number": "0",
        "account_number": "0",
        "original_vesting": [],
        "delegated_free": [],
        "delegated_vesting": [],
        "start_time": "0",
        "end_time": "0",
        "module_name": module_name,
        "module_permissions": []
    })
}

fn gov_section(denom: &str) -> Value {
    json!({
        "starting_proposal_id": "1",
        "deposits": null,
        "votes": null,
        "proposals": null,
        "deposit_params": {
            "min_deposit": [Coin::new(denom, 1000u64).to_value()],
            "max_deposit_period": "172800000000000"
        },
        "voting_params": {"voting_period": "172800000000000"},
        "tally_params": {
            "quorum": "0.334000000000000000",
            "threshold": "0.500000000000000000",
            "veto": "0.334000000000000000"
        }
    })
}

fn crisis_section(denom: &str) -> Value {
    json!({ "constant_fee": Coin::new(denom, 1000u64).to_value() })
}

fn slashing_section() -> Value {
    json!({
        "params": {
            "max_evidence_age": "120000000000",
            "signed_blocks_window": "100",
            "min_signed_per_window": "0.500000000000000000",
            "downtime_jail_duration": "600000000000",
            "slash_fraction_double_sign": "0.050000000000000000",
            "slash_fraction_downtime": "0.010000000000000000"
        },
        "signing_infos": {},
        "missed_blocks": {}
    })
}

/// Install the SDK modules both inflation steps reset to the same values.
fn install_sdk_modules(document: &mut Document, denom: &str) {
    document.insert_section("gov", gov_section(denom));
    document.insert_section("crisis", crisis_section(denom));
    document.insert_section("slashing", slashing_section());
}

pub struct TokenInflation;

impl MigrationStep for TokenInflation {
    fn version(&self) -> u32 {
        16
    }

    fn name(&self) -> &'static str {
        "token-inflation"
    }

    fn description(&self) -> &'static str {
        "Add inflation allocations, SDK modules and pool module accounts"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Addition
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let denominations = &ctx.config.denominations;
        let denom = denominations.stake.as_str();

        document.set_path("distribution.community_tax", "0.800000000000000000")?;
        document.set_path("account.params.user_growth_allocation", "0.200000000000000000")?;
        document.set_path("account.params.stakeholder_allocation", "0.200000000000000000")?;
        document.set_path("trustaking.params.user_reward_allocation", "0.200000000000000000")?;

        document.insert_section(
            "supply",
            json!({ "supply": [Coin::new(denom, INITIAL_SUPPLY).to_value()] }),
        );
        install_sdk_modules(&mut document, denom);

        for (module_name, body, balance) in MODULE_ACCOUNTS {
            let address = format!("{}{}", denominations.address_prefix, body);
            let account = module_account(address, module_name, vec![Coin::new(denom, balance)]);
            document.push_record(ACCOUNTS.path(), account)?;
        }
        tracing::debug!("Appended {} module accounts", MODULE_ACCOUNTS.len());

        Ok(document)
    }
}

pub struct TokenInflationReset;

impl MigrationStep for TokenInflationReset {
    fn version(&self) -> u32 {
        17
    }

    fn name(&self) -> &'static str {
        "token-inflation-reset"
    }

    fn description(&self) -> &'static str {
        "Reset pools, balances and SDK modules for the relaunched chain"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Addition
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let config = ctx.config;
        let denom = config.denominations.stake.as_str();
        let treasury_balance = Coin::new(
            denom,
            Amount::parse("accounts.treasury_balance", &config.accounts.treasury_balance)?,
        );

        document.set_path("distribution.community_tax", "0.500000000000000000")?;
        document.set_path("distribution.fee_pool.community_pool", json!([]))?;
        document.insert_section(
            "trudistribution",
            json!({
                "params": {
                    "user_growth_allocation": "0.500000000000000000",
                    "user_reward_allocation": "0.500000000000000000"
                }
            }),
        );
        document.set_path("mint.minter.inflation", "0.700000000000000000")?;
        document.set_path("mint.params.inflation_min", "0.700000000000000000")?;
        document.set_path("mint.params.inflation_max", "0.700000000000000000")?;
        document.remove_root_field("validators")?;

        for_each_record(&mut document, ACCOUNTS, |_, mut account| {
            let view = account.view();
            let address = view.require_str("address")?.to_string();
            let is_bonded_pool = view
                .optional("module_name")
                .and_then(Value::as_str)
                .is_some_and(|name| name == BONDED_POOL);

            if is_bonded_pool || config.accounts.drained.contains(&address) {
                account.insert("coins", json!([]));
            } else if address == config.accounts.treasury {
                account.insert("coins", json!([treasury_balance.to_value()]));
            }
            Ok(())
        })?;

        document.insert_section(
            "staking",
            json!({
                "params": {
                    "unbonding_time": "1814400000000000",
                    "max_validators": 100,
                    "max_entries": 7,
                    "bond_denom": denom
                },
                "last_total_power": "0",
                "last_validator_powers": null,
                "validators": null,
                "delegations": null,
                "unbonding_delegations": null,
                "redelegations": null,
                "exported": false
            }),
        );
        document.insert_section("supply", json!({ "supply": [] }));
        install_sdk_modules(&mut document, denom);
        document.insert_section("genutil", json!({ "gentx": null }));

        document.set_root_field("chain_id", config.chain.reset_chain_id.as_str())?;
        Ok(document)
    }
}
