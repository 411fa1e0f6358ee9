use crate::aggregate::{user_earnings, UserEarnings};
use crate::document::Document;
use crate::errors::Result;
use crate::model::{Transaction, TransactionKind, TRANSACTIONS};
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use crate::resolver::Resolver;
use serde_json::{json, Value};

/// Rebuilds `trustaking.users_earnings` from the bank transaction history,
/// replacing whatever was stored.
pub struct RecomputeUsersEarnings;

impl MigrationStep for RecomputeUsersEarnings {
    fn version(&self) -> u32 {
        19
    }

    fn name(&self) -> &'static str {
        "recompute-users-earnings"
    }

    fn description(&self) -> &'static str {
        "Recompute per-community user earnings from bank transactions"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Recompute
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let rewards = &ctx.config.rewards;
        let earning = transaction_kinds(
            "rewards.earning_transaction_types",
            &rewards.earning_transaction_types,
        )?;
        let deducting = transaction_kinds(
            "rewards.earning_deduction_types",
            &rewards.earning_deduction_types,
        )?;
        let transactions = Resolver::new(&document)
            .records(TRANSACTIONS)?
            .iter()
            .map(Transaction::decode)
            .collect::<Result<Vec<_>>>()?;

        let earnings = user_earnings(&transactions, &earning, &deducting, &rewards.earnings_rate)?;
        tracing::debug!(
            "Recomputed earnings for {} accounts from {} transactions",
            earnings.len(),
            transactions.len()
        );

        let entries: Vec<Value> = earnings.iter().map(earnings_entry).collect();
        document.set_path("trustaking.users_earnings", entries)?;
        Ok(document)
    }
}

fn transaction_kinds(field: &str, codes: &[u64]) -> Result<Vec<TransactionKind>> {
    codes
        .iter()
        .map(|code| TransactionKind::from_code(field, *code))
        .collect()
}

fn earnings_entry(earnings: &UserEarnings) -> Value {
    json!({
        "address": earnings.address,
        "coins": earnings.coins.iter().map(|coin| coin.to_value()).collect::<Vec<_>>()
    })
}
