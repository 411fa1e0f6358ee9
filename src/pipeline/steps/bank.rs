//! Opening balances recorded as bank transactions.

use super::coin_list;
use crate::document::{Coin, Document, RecordView};
use crate::errors::Result;
use crate::model::{TransactionKind, ACCOUNTS, TRANSACTIONS};
use crate::pipeline::step::{MigrationStep, SequenceGenerator, StepCategory, StepContext};
use crate::resolver::Resolver;
use serde_json::{json, Value};

pub struct AddBankTransactions;

impl MigrationStep for AddBankTransactions {
    fn version(&self) -> u32 {
        8
    }

    fn name(&self) -> &'static str {
        "add-bank-transactions"
    }

    fn description(&self) -> &'static str {
        "Create trubank2 with a registration transaction per stake balance"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Addition
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let mut ids = SequenceGenerator::new();
        let transactions = registration_transactions(
            &document,
            &ctx.config.denominations.legacy,
            &ctx.params.start_time,
            &mut ids,
        )?;

        document.insert_section(
            "trubank2",
            json!({
                "params": {"reward_broker_address": null},
                "transactions": []
            }),
        );
        for transaction in transactions {
            document.push_record(TRANSACTIONS.path(), transaction)?;
        }

        ctx.stamp(&mut document);
        Ok(document)
    }
}

/// Balances of `denom` held by one account.
fn stake_balances(account: &RecordView<'_>, denom: &str) -> Result<Vec<Coin>> {
    let location = format!("{}.coins", account.location());
    let coins = coin_list(&location, account.require("coins")?)?;
    Ok(coins.into_iter().filter(|coin| coin.denom == denom).collect())
}

fn registration_transactions(
    document: &Document,
    denom: &str,
    created_time: &str,
    ids: &mut SequenceGenerator,
) -> Result<Vec<Value>> {
    let mut transactions = Vec::new();
    for account in Resolver::new(document).records(ACCOUNTS)? {
        let address = account.require_str("address")?;
        for coin in stake_balances(&account, denom)? {
            transactions.push(json!({
                "id": ids.next_key(),
                "type": TransactionKind::Registration.code(),
                "app_account_address": address,
                "reference_id": "0",
                "amount": coin.to_value(),
                "created_time": created_time,
            }));
        }
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::steps::test_support::{config, doc, params};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_registration_per_stake_coin() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let document = doc(json!({
            "accounts": [
                {"address": "cosmos1a", "coins": [
                    {"denom": "trusteak", "amount": "500"},
                    {"denom": "other", "amount": "9"}
                ]},
                {"address": "cosmos1b", "coins": []},
                {"address": "cosmos1c", "coins": [{"denom": "trusteak", "amount": "7"}]}
            ]
        }));

        let migrated = AddBankTransactions.apply(document, &ctx).unwrap();

        assert_eq!(
            migrated.get_path("trubank2.transactions").unwrap(),
            &json!([
                {
                    "id": "1", "type": 0, "app_account_address": "cosmos1a", "reference_id": "0",
                    "amount": {"amount": "500", "denom": "trusteak"},
                    "created_time": "2019-02-11T12:00:00Z"
                },
                {
                    "id": "2", "type": 0, "app_account_address": "cosmos1c", "reference_id": "0",
                    "amount": {"amount": "7", "denom": "trusteak"},
                    "created_time": "2019-02-11T12:00:00Z"
                }
            ])
        );
        assert_eq!(
            migrated.get_path("trubank2.params.reward_broker_address").unwrap(),
            &Value::Null
        );
    }

    #[test]
    fn test_running_twice_restarts_numbering() {
        let (params, config) = (params(), config());
        let ctx = StepContext::new(&params, &config);
        let document = doc(json!({
            "accounts": [{"address": "cosmos1a", "coins": [{"denom": "trusteak", "amount": "1"}]}]
        }));

        let once = AddBankTransactions.apply(document, &ctx).unwrap();
        let twice = AddBankTransactions.apply(once, &ctx).unwrap();
        assert_eq!(
            twice.get_path("trubank2.transactions").unwrap()[0]["id"],
            json!("1")
        );
    }
}
