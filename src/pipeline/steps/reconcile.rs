//! Reconcile an export with a freshly generated template genesis.

use crate::document::Document;
use crate::errors::Result;
use crate::pipeline::step::{MigrationStep, StepCategory, StepContext};
use serde_json::Value;

/// Sections the template's modules own outright.
const TEMPLATE_SECTIONS: [&str; 6] = ["auth", "staking", "distr", "genutil", "params", "expiration"];

/// Sections and root keys dropped from the export before merging.
const REPLACED_SECTIONS: [&str; 2] = ["auth", "expiration"];

pub struct ReconcileTemplate;

impl MigrationStep for ReconcileTemplate {
    fn version(&self) -> u32 {
        1
    }

    fn name(&self) -> &'static str {
        "reconcile-template"
    }

    fn description(&self) -> &'static str {
        "Replace consensus params and SDK module sections with the template's"
    }

    fn category(&self) -> StepCategory {
        StepCategory::Reconciliation
    }

    fn requires_template(&self) -> bool {
        true
    }

    fn apply(&self, mut document: Document, ctx: &StepContext<'_>) -> Result<Document> {
        let template = ctx.require_template()?;

        let consensus_params = template.root_field("consensus_params")?.clone();
        let sections = TEMPLATE_SECTIONS
            .iter()
            .map(|name| Ok((*name, template.section(name)?.clone())))
            .collect::<Result<Vec<(&str, Value)>>>()?;

        document.remove_root_field("consensus_params")?;
        for name in REPLACED_SECTIONS {
            document.remove_section(name)?;
        }

        document.set_root_field("consensus_params", consensus_params)?;
        for (name, section) in sections {
            document.insert_section(name, section);
        }

        document.set_path("staking.params.bond_denom", ctx.params.bond_denom.as_str())?;
        ctx.stamp(&mut document);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MigrateConfig, MigrationParams};
    use crate::errors::MigrationError;
    use serde_json::json;

    fn params() -> MigrationParams {
        MigrationParams {
            chain_id: "truchain".into(),
            start_time: "2019-06-05T12:00:00Z".into(),
            bond_denom: "trusteak".into(),
        }
    }

    fn template() -> Document {
        Document::from_value(json!({
            "consensus_params": {"block_size": {"max_gas": "-1"}},
            "app_state": {
                "auth": {"collected_fees": null},
                "staking": {"params": {"bond_denom": "stake"}},
                "distr": {"community_tax": "0.02"},
                "genutil": {"gentxs": null},
                "params": {},
                "expiration": {"params": {"expiration_duration": "86400"}}
            }
        }))
        .unwrap()
    }

    fn export() -> Document {
        Document::from_value(json!({
            "chain_id": "old",
            "genesis_time": "2019-01-01T00:00:00Z",
            "consensus_params": {"old": true},
            "app_state": {
                "auth": {"old": true},
                "expiration": {"old": true},
                "story": {"stories": []}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_sections_replaced_and_bond_denom_set() {
        let (params, config, template) = (params(), MigrateConfig::default(), template());
        let ctx = StepContext::new(&params, &config).with_template(&template);

        let migrated = ReconcileTemplate.apply(export(), &ctx).unwrap();

        assert_eq!(
            migrated.root_field("consensus_params").unwrap(),
            &json!({"block_size": {"max_gas": "-1"}})
        );
        assert_eq!(migrated.section("auth").unwrap(), &json!({"collected_fees": null}));
        assert_eq!(
            migrated.get_path("staking.params.bond_denom").unwrap(),
            &json!("trusteak")
        );
        assert_eq!(migrated.root_field("chain_id").unwrap(), &json!("truchain"));
        assert!(migrated.has_section("story"));
    }

    #[test]
    fn test_template_missing_section_fails() {
        let mut template = template();
        template.remove_section("genutil").unwrap();
        let (params, config) = (params(), MigrateConfig::default());
        let ctx = StepContext::new(&params, &config).with_template(&template);

        let err = ReconcileTemplate.apply(export(), &ctx).unwrap_err();
        assert!(matches!(err, MigrationError::MissingSection { ref section } if section == "genutil"));
    }

    #[test]
    fn test_export_missing_section_fails() {
        let mut export = export();
        export.remove_section("expiration").unwrap();
        let (params, config, template) = (params(), MigrateConfig::default(), template());
        let ctx = StepContext::new(&params, &config).with_template(&template);

        assert!(ReconcileTemplate.apply(export, &ctx).is_err());
    }
}
