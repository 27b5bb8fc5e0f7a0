// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod cli;
mod config;
mod console_format;
mod engine;
mod export;
mod input;
mod reports;
mod types;
mod ui;

use config::ExportPlan;
use engine::{ReportError, ReportTable};
use log::info;
use types::ReportContext;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    if args.list_reports {
        if let Err(e) = list_reports(&args) {
            ui::print_error(&e.to_string());
            std::process::exit(1);
        }
        return;
    }

    // Resolve config file and flags into one plan
    let plan = match config::build_export_plan(&args) {
        Ok(p) => p,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&plan) {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load sources, generate the table, and hand it to the sink
fn run(plan: &ExportPlan) -> Result<(), ReportError> {
    let definition = reports::find(&plan.report)?;

    let collections = plan
        .sources
        .iter()
        .map(|path| input::load_collection(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = reports::generate(definition.as_ref(), &collections, &plan.context)?;

    if let Some((ref column, descending)) = plan.sort {
        let index = engine::column_index(table.columns(), column).ok_or_else(|| {
            ReportError::configuration(definition.name(), format!("no column labelled '{}'", column))
        })?;
        table = table.sorted_by(index, descending);
    }

    if table.is_placeholder() {
        ui::print_warning("no records with an id were found; writing headers with an empty row");
    }

    if plan.preview {
        console_format::print_table(&table, true);
    }

    write_table(&table, plan)?;
    ui::status(&format!(
        "{}: {} record(s) written to {}",
        definition.title(),
        table.record_count(),
        plan.output.display()
    ));
    Ok(())
}

fn write_table(table: &ReportTable, plan: &ExportPlan) -> Result<(), ReportError> {
    export::sink_for(plan.format, &plan.style).write(table, &plan.output)?;
    info!("Wrote {:?} output to {}", plan.format, plan.output.display());
    Ok(())
}

/// Print the report catalog, or export it when --output is given
fn list_reports(args: &cli::CliArgs) -> Result<(), ReportError> {
    let context = ReportContext::at(chrono::Local::now().naive_local());
    let table = reports::catalog(&context)?;

    match args.output {
        Some(ref output) => {
            let format = args.output_format();
            export::sink_for(format, &export::SheetStyle::default()).write(&table, output)?;
            ui::status(&format!("Report catalog written to {}", output.display()));
        }
        None => console_format::print_table(&table, false),
    }
    Ok(())
}
