use crate::cli::args::MigrateArgs;
use crate::config::{load_config, MigrationParams, ParamOverrides};
use crate::document::Document;
use crate::errors::MigrationError;
use crate::pipeline::{standard_pipeline, StepContext, StepSelection};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Selection implied by `--step` or `--from`/`--to`.
pub fn selection(args: &MigrateArgs) -> StepSelection {
    match &args.step {
        Some(name) => StepSelection::Named(name.clone()),
        None => StepSelection::range(args.from, args.to),
    }
}

fn read_document(path: &Path, role: &str) -> Result<Document> {
    let text = fs::read_to_string(path)
        .map_err(|e| MigrationError::io(path, e))
        .with_context(|| format!("failed to read {role} genesis"))?;
    let document = Document::from_json_str(&text)
        .with_context(|| format!("failed to parse {role} genesis {}", path.display()))?;
    tracing::info!(
        "Loaded {} genesis {} (sha256:{})",
        role,
        path.display(),
        document.digest()?
    );
    Ok(document)
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{text}\n"))
            .map_err(|e| MigrationError::io(path, e))
            .context("failed to write migrated genesis"),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("failed to write migrated genesis to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}

/// Run the selected migration steps and emit the migrated document.
///
/// Nothing is written unless every step succeeds.
pub fn handle_migrate_command(args: MigrateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    let params = MigrationParams::resolve(
        ParamOverrides {
            chain_id: args.chain_id.clone(),
            start_time: args.start_time.clone(),
            bond_denom: args.bond_denom.clone(),
        },
        &config.chain,
    )
    .context("invalid migration parameters")?;

    let selection = selection(&args);
    let pipeline = standard_pipeline(&selection)?;
    tracing::debug!("Selected steps {} ({} steps)", selection, pipeline.step_count());

    let template = match (&args.template_genesis, pipeline.requires_template()) {
        (Some(path), true) => Some(read_document(path, "template")?),
        (None, true) => {
            return Err(MigrationError::config_field(
                "template_genesis",
                "--template-genesis is required when reconcile-template runs",
            )
            .into())
        }
        (Some(path), false) => {
            tracing::warn!("Ignoring template {}: no selected step reads it", path.display());
            None
        }
        (None, false) => None,
    };
    let document = read_document(&args.exported_genesis, "exported")?;

    let ctx = StepContext::new(&params, &config);
    let ctx = match &template {
        Some(template) => ctx.with_template(template),
        None => ctx,
    };
    let (migrated, timings) = pipeline.run_with_timing(document, &ctx)?;

    if args.timings {
        for timing in &timings {
            tracing::info!("{}", timing.format());
        }
    }

    let text = migrated.to_canonical_string()?;
    tracing::info!("Migrated genesis sha256:{}", migrated.digest()?);
    write_output(&text, args.output.as_deref())
}
