use crate::pipeline::{standard_pipeline, BuiltPipeline, StepSelection};
use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

/// Render the steps of a pipeline as a table.
pub fn steps_table(pipeline: &BuiltPipeline) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Version", "Step", "Category", "Template", "Description"]);

    for step in pipeline.steps() {
        table.add_row(vec![
            Cell::new(step.version()),
            Cell::new(step.name()),
            Cell::new(step.category()),
            Cell::new(if step.requires_template() { "yes" } else { "" }),
            Cell::new(step.description()),
        ]);
    }
    table
}

pub fn handle_steps_command(from: Option<u32>, to: Option<u32>) -> Result<()> {
    let pipeline = standard_pipeline(&StepSelection::range(from, to))?;
    println!("{}", steps_table(&pipeline));
    Ok(())
}
