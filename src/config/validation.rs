//! Validation of runtime parameters and configuration files.
//!
//! Checks collect every problem before reporting, so a bad config file is
//! fixed in one round instead of one error per run.

use super::core::{ChainConfig, MigrateConfig};
use crate::errors::{MigrationError, Result};
use crate::model::TransactionKind;
use chrono::DateTime;

/// One failed check, with the dotted field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Parameters every migration step receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationParams {
    /// Target chain id, already trimmed.
    pub chain_id: String,
    /// Genesis time, RFC 3339.
    pub start_time: String,
    /// Staking bond denomination, already trimmed.
    pub bond_denom: String,
}

/// Values given on the command line, which take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamOverrides {
    pub chain_id: Option<String>,
    pub start_time: Option<String>,
    pub bond_denom: Option<String>,
}

impl MigrationParams {
    /// Merge overrides onto the configured defaults and validate the result.
    pub fn resolve(overrides: ParamOverrides, chain: &ChainConfig) -> Result<Self> {
        let chain_id = overrides.chain_id.unwrap_or_else(|| chain.chain_id.clone());
        let start_time = overrides
            .start_time
            .unwrap_or_else(|| chain.start_time.clone());
        let bond_denom = overrides
            .bond_denom
            .unwrap_or_else(|| chain.bond_denom.clone());

        let issues = check_params(&chain_id, &start_time, &bond_denom);
        into_result(issues)?;

        Ok(Self {
            chain_id: chain_id.trim().to_string(),
            start_time,
            bond_denom: bond_denom.trim().to_string(),
        })
    }
}

fn check_params(chain_id: &str, start_time: &str, bond_denom: &str) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if chain_id.trim().is_empty() {
        issues.push(ConfigIssue::new("chain_id", "chain-id required"));
    }
    if let Err(e) = DateTime::parse_from_rfc3339(start_time) {
        issues.push(ConfigIssue::new(
            "start_time",
            format!("`{start_time}` is not an RFC 3339 timestamp: {e}"),
        ));
    }
    if bond_denom.trim().is_empty() {
        issues.push(ConfigIssue::new("bond_denom", "bond denomination required"));
    }
    issues
}

/// Check a loaded configuration file, reporting every problem at once.
pub fn validate_config(config: &MigrateConfig) -> Result<()> {
    let mut issues = Vec::new();

    let type_lists = [
        ("rewards.earning_transaction_types", &config.rewards.earning_transaction_types),
        ("rewards.earning_deduction_types", &config.rewards.earning_deduction_types),
    ];
    for (field, codes) in type_lists {
        for (index, code) in codes.iter().enumerate() {
            if TransactionKind::from_code("", *code).is_err() {
                issues.push(ConfigIssue::new(
                    format!("{field}[{index}]"),
                    format!("unknown transaction type {code}"),
                ));
            }
        }
    }

    let admin_lists = [
        ("admins.initial_slash_admins", &config.admins.initial_slash_admins),
        ("admins.module_admins", &config.admins.module_admins),
    ];
    for (field, admins) in admin_lists {
        if admins.is_empty() {
            issues.push(ConfigIssue::new(field, "at least one admin address required"));
        }
        if admins.iter().any(|a| a.trim().is_empty()) {
            issues.push(ConfigIssue::new(field, "admin addresses must not be blank"));
        }
    }

    let required = [
        ("chain.reset_chain_id", &config.chain.reset_chain_id),
        ("accounts.reward_broker", &config.accounts.reward_broker),
        ("accounts.treasury", &config.accounts.treasury),
        ("denominations.legacy", &config.denominations.legacy),
        ("denominations.stake", &config.denominations.stake),
        ("denominations.micro", &config.denominations.micro),
        ("denominations.legacy_address_prefix", &config.denominations.legacy_address_prefix),
        ("denominations.address_prefix", &config.denominations.address_prefix),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            issues.push(ConfigIssue::new(field, "must not be empty"));
        }
    }

    if config.accounts.treasury_balance.is_empty()
        || !config.accounts.treasury_balance.bytes().all(|b| b.is_ascii_digit())
    {
        issues.push(ConfigIssue::new(
            "accounts.treasury_balance",
            "must be a non-negative integer string",
        ));
    }

    into_result(issues)
}

fn into_result(issues: Vec<ConfigIssue>) -> Result<()> {
    match issues.len() {
        0 => Ok(()),
        1 => {
            let issue = &issues[0];
            Err(MigrationError::config_field(
                &issue.field,
                format!("{}: {}", issue.field, issue.message),
            ))
        }
        n => {
            let joined = issues
                .iter()
                .map(|i| format!("{}: {}", i.field, i.message))
                .collect::<Vec<_>>()
                .join("; ");
            Err(MigrationError::config(format!("{n} problems: {joined}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(chain_id: &str, start_time: &str, bond_denom: &str) -> ParamOverrides {
        ParamOverrides {
            chain_id: Some(chain_id.into()),
            start_time: Some(start_time.into()),
            bond_denom: Some(bond_denom.into()),
        }
    }

    #[test]
    fn test_overrides_win_and_are_trimmed() {
        let params = MigrationParams::resolve(
            overrides(" betanet-1 ", "2019-06-05T12:00:00Z", " trusteak"),
            &ChainConfig::default(),
        )
        .unwrap();
        assert_eq!(params.chain_id, "betanet-1");
        assert_eq!(params.bond_denom, "trusteak");
    }

    #[test]
    fn test_defaults_fill_missing_overrides() {
        let params =
            MigrationParams::resolve(ParamOverrides::default(), &ChainConfig::default()).unwrap();
        assert_eq!(params.chain_id, "devnet-n");
        assert_eq!(params.start_time, "2019-02-11T12:00:00Z");
    }

    #[test]
    fn test_blank_chain_id_rejected() {
        let err = MigrationParams::resolve(
            overrides("   ", "2019-02-11T12:00:00Z", "trusteak"),
            &ChainConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Configuration { field: Some(ref f), .. } if f == "chain_id"
        ));
    }

    #[test]
    fn test_all_param_problems_reported_together() {
        let err = MigrationParams::resolve(overrides("", "yesterday", ""), &ChainConfig::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("3 problems"), "{message}");
        assert!(message.contains("start_time"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MigrateConfig::default()).is_ok());
    }

    #[test]
    fn test_unknown_earning_type_rejected() {
        let mut config = MigrateConfig::default();
        config.rewards.earning_transaction_types.push(42);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("unknown transaction type 42"));
    }

    #[test]
    fn test_unknown_deduction_type_rejected() {
        let mut config = MigrateConfig::default();
        config.rewards.earning_deduction_types = vec![5, 99];
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("rewards.earning_deduction_types[1]"), "{message}");
    }

    #[test]
    fn test_empty_admin_list_rejected() {
        let mut config = MigrateConfig::default();
        config.admins.module_admins.clear();
        assert!(validate_config(&config).is_err());
    }
}
