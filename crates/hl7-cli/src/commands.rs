use std::rc::Rc;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tracing::info;

use hl7_cli::definitions::demo_registry;
use hl7_cli::listing::list_messages;
use hl7_cli::skeleton::{SkeletonOptions, build_skeleton};

use crate::cli::{MessagesArgs, SkeletonArgs};

pub fn run_messages(args: &MessagesArgs) -> Result<()> {
    let registry = Rc::new(demo_registry().context("load demo definitions")?);
    let summaries = list_messages(&registry, args.version).context("build message summaries")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Message"),
        header_cell("Version"),
        header_cell("Slots"),
        header_cell("Required"),
        header_cell("Repeating"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.name).add_attribute(Attribute::Bold),
            Cell::new(summary.version),
            Cell::new(summary.slots.join(", ")),
            Cell::new(summary.required),
            Cell::new(summary.repeating),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_skeleton(args: &SkeletonArgs) -> Result<()> {
    let registry = demo_registry().context("load demo definitions")?;
    let options = SkeletonOptions {
        version: args.version,
        append: args.append.clone(),
        repeat: args.repeat,
        strict: args.strict,
    };
    let message = build_skeleton(&args.message, Rc::new(registry), &options)
        .with_context(|| format!("build {} skeleton", args.message))?;
    info!(message = %message.name(), generic = message.is_generic(), "skeleton built");
    println!("{}", message.print_structure());
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
