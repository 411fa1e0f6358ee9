use crate::document::Rate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAIN_ID: &str = "devnet-n";
pub const DEFAULT_START_TIME: &str = "2019-02-11T12:00:00Z";
pub const DEFAULT_BOND_DENOM: &str = "trusteak";

/// Contents of `.genesis-migrate.toml`.
///
/// Every table is optional; missing values fall back to the literals the
/// migrations were originally written against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MigrateConfig {
    pub chain: ChainConfig,
    pub admins: AdminConfig,
    pub accounts: AccountConfig,
    pub rewards: RewardConfig,
    pub denominations: DenominationConfig,
}

/// Defaults for the runtime parameters; command-line flags win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: String,
    pub start_time: String,
    pub bond_denom: String,
    /// Chain id written by the inflation reset.
    pub reset_chain_id: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            start_time: DEFAULT_START_TIME.to_string(),
            bond_denom: DEFAULT_BOND_DENOM.to_string(),
            reset_chain_id: "betanet-1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Slashing admins installed with the slashing module.
    pub initial_slash_admins: Vec<String>,
    /// Admin list later shared by the claim, community, slashing and
    /// staking modules.
    pub module_admins: Vec<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            initial_slash_admins: strings(&[
                "cosmos1xqc5gwzpg3fyv5en2fzyx36z2se5ks33tt57e7",
                "cosmos1xqc5gwz923znjvzyg3pnxdfsgcu4jv34mep8hp",
            ]),
            module_admins: strings(&[
                "cosmos1tfpcnjzkthft3ynewqvn7mtdk7guf3knjdqg4d",
                "cosmos1xqc5gwzpg3fyv5en2fzyx36z2se5ks33tt57e7",
                "cosmos1xqc5gwz923znjvzyg3pnxdfsgcu4jv34mep8hp",
                "cosmos1xqc5gwzpgdr4wjz8xscnys2jx3f9x4zy223g9w",
                "cosmos1xqc5gwzpgdr4gk3nfdxn24jegc6rv5zewn82ch",
                "cosmos1xqc5gwzy2ge9ysec2vursk2etqm5yjzceu04ez",
                "cosmos1xqc5gwzpgdr4jkjkx3z9xs2x2gurgs22fzksza",
                "cosmos1xqc5gwz9g4pnvvznfpzyxkp5t92yx5pkx9lnsh",
                "cosmos1xqc5gwzgx9z9xvjjxq6rzkfs23f9j5jx748tp4",
                "cosmos1xqc5gwzpfp8ygkzdfdpnq4j3xd8y6djy5z8gfn",
                "cosmos1xqc5gwfhx4f5k3jcf4r55j6ntge5y3jtxesy8r",
            ]),
        }
    }
}

/// Well-known accounts touched by the migrations.
///
/// Addresses used after the prefix rename carry the renamed prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub reward_broker: String,
    /// Account funded by the inflation reset.
    pub treasury: String,
    pub treasury_balance: String,
    /// Accounts whose balances the inflation reset clears.
    pub drained: Vec<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            reward_broker: "cosmos1tfpcnjzkthft3ynewqvn7mtdk7guf3knjdqg4d".to_string(),
            treasury: "tru1tfpcnjzkthft3ynewqvn7mtdk7guf3knjdqg4d".to_string(),
            treasury_balance: "1000000000000".to_string(),
            drained: strings(&[
                "tru1pmp80ys5kplk0gnvmhtxq086xlerkwvcdhk8gx",
                "tru1em44grl9ylmmnwawwp5fjn079kesatwp67rxjx",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Applied to each qualifying transaction when recomputing earnings.
    pub earnings_rate: Rate,
    /// Transaction type codes that count as earnings.
    pub earning_transaction_types: Vec<u64>,
    /// Transaction type codes that take earnings back. None of the legacy
    /// transaction types do.
    pub earning_deduction_types: Vec<u64>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            earnings_rate: Rate::decimal(25, 3),
            earning_transaction_types: vec![7, 8, 9, 10],
            earning_deduction_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenominationConfig {
    /// Stake denomination before the global rename.
    pub legacy: String,
    /// Stake denomination after the global rename.
    pub stake: String,
    /// Micro denomination introduced by the last migration.
    pub micro: String,
    /// Ratio from `stake` units to `micro` units.
    pub micro_rate: Rate,
    pub legacy_address_prefix: String,
    pub address_prefix: String,
}

impl Default for DenominationConfig {
    fn default() -> Self {
        Self {
            legacy: "trusteak".to_string(),
            stake: "tru".to_string(),
            micro: "utru".to_string(),
            micro_rate: Rate::decimal(1, 3),
            legacy_address_prefix: "cosmos".to_string(),
            address_prefix: "tru".to_string(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: MigrateConfig = toml::from_str("").unwrap();
        assert_eq!(config, MigrateConfig::default());
        assert_eq!(config.admins.module_admins.len(), 11);
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config: MigrateConfig = toml::from_str(
            r#"
            [chain]
            chain_id = "testnet-7"

            [rewards]
            earnings_rate = "0.5"
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.chain_id, "testnet-7");
        assert_eq!(config.chain.bond_denom, DEFAULT_BOND_DENOM);
        assert_eq!(config.rewards.earnings_rate.as_str(), "0.5");
        assert_eq!(config.rewards.earning_transaction_types, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_invalid_rate_rejected_at_parse() {
        let result = toml::from_str::<MigrateConfig>("[rewards]\nearnings_rate = \"abc\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&MigrateConfig::default()).unwrap();
        let parsed: MigrateConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, MigrateConfig::default());
    }
}
