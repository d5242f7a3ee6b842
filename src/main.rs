//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::{self, stdout};

use lift_tracker_lib::{
    units::{format_weight, percent_of_max, to_display, unit_label},
    AppService, Direction, Prescription, Step, TrackingLift, TrainingCycle, Units,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    let units = service.config.units;
    let header_color = service.config.header_color();

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Add { name, weight } => match service.add_lift(&name, &weight) {
            Ok(tracked) => println!(
                "Now tracking '{}' with a max of {} {} (ID: {}).",
                tracked.lift.name,
                format_weight(to_display(tracked.lift.max_weight, units)),
                unit_label(units),
                tracked.id.unwrap_or_default()
            ),
            Err(e) => bail!("Error adding lift: {e}"),
        },
        cli::Commands::List => {
            let lifts = service.list_lifts()?;
            if lifts.is_empty() {
                println!("No lifts tracked yet. Use 'add <name> <weight>' to start.");
            } else if export_csv {
                print_lift_csv(&lifts, units)?;
            } else {
                print_lift_table(&lifts, header_color, units);
            }
        }
        cli::Commands::Edit { id, weight } => match service.edit_max_weight(id, &weight) {
            Ok(new_max) => println!(
                "Updated lift ID {id}: max is now {} {}.",
                format_weight(to_display(new_max, units)),
                unit_label(units)
            ),
            Err(e) => bail!("Error editing lift ID {id}: {e}"),
        },
        cli::Commands::Bump { id, large, down } => {
            let step = if large { Step::Large } else { Step::Small };
            let direction = if down { Direction::Down } else { Direction::Up };
            match service.step_max_weight(id, step, direction) {
                Ok(new_max) => println!(
                    "Updated lift ID {id}: max is now {} {}.",
                    format_weight(to_display(new_max, units)),
                    unit_label(units)
                ),
                Err(e) => bail!("Error stepping lift ID {id}: {e}"),
            }
        }
        cli::Commands::Delete { id } => match service.delete_lift(id) {
            Ok(()) => println!("Deleted lift ID {id}."),
            Err(e) => bail!("Error deleting lift: {e}"),
        },
        cli::Commands::Plan { id, cycle } => {
            let (tracked, prescription) = service.prescription_for(id, cycle.as_deref())?;
            if export_csv {
                print_plan_csv(&tracked, &prescription, units)?;
            } else {
                print_plan_table(&tracked, &prescription, header_color, units);
            }
        }
        cli::Commands::Cycles => print_cycles_table(header_color),
        cli::Commands::SetUnits { units } => {
            let units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            service.set_units(units)?;
            println!("Display unit set to {}.", unit_label(units));
        }
        cli::Commands::SetCycle { cycle } => {
            let cycle = service.set_default_cycle(&cycle)?;
            println!("Default cycle set to {cycle}.");
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

/// Label, weight (lbs), reps, and the percentage shown for it.
type PlanRow = (String, f64, u32, Option<i64>);

#[derive(Serialize)]
struct PlanCsvRow<'a> {
    lift: &'a str,
    cycle: TrainingCycle,
    set: String,
    weight: String,
    unit: &'static str,
    reps: u32,
    percent_of_max: Option<i64>,
}

#[derive(Serialize)]
struct LiftCsvRow<'a> {
    id: Option<i64>,
    name: &'a str,
    max_weight: String,
    unit: &'static str,
    date: NaiveDate,
}

fn plan_rows(tracked: &TrackingLift, prescription: &Prescription) -> Vec<PlanRow> {
    let max_weight = tracked.lift.max_weight;
    let mut rows = Vec::new();

    if let Some(warm_up) = prescription.warm_up {
        for (i, (weight, reps)) in warm_up.rows().into_iter().enumerate() {
            rows.push((format!("Warm-up {}", i + 1), weight, reps, None));
        }
    }
    for (i, (weight, reps)) in prescription.working_sets.rows().into_iter().enumerate() {
        rows.push((
            format!("Set {}", i + 1),
            weight,
            reps,
            Some(percent_of_max(weight, max_weight)),
        ));
    }
    rows
}

fn print_plan_table(
    tracked: &TrackingLift,
    prescription: &Prescription,
    header_color: Color,
    units: Units,
) {
    println!(
        "{} ({} cycle), max {} {}",
        tracked.lift.name,
        prescription.cycle,
        format_weight(to_display(tracked.lift.max_weight, units)),
        unit_label(units)
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Set").fg(header_color),
            Cell::new(format!("Weight ({})", unit_label(units))).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("% of Max").fg(header_color),
        ]);

    for (label, weight, reps, percent) in plan_rows(tracked, prescription) {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_weight(to_display(weight, units))),
            Cell::new(reps.to_string()),
            Cell::new(percent.map_or("-".to_string(), |p| format!("{p}%"))),
        ]);
    }
    println!("{table}");
}

fn print_plan_csv(tracked: &TrackingLift, prescription: &Prescription, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for (set, weight, reps, percent_of_max) in plan_rows(tracked, prescription) {
        writer.serialize(PlanCsvRow {
            lift: &tracked.lift.name,
            cycle: prescription.cycle,
            set,
            weight: format_weight(to_display(weight, units)),
            unit: unit_label(units),
            reps,
            percent_of_max,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_lift_table(lifts: &[TrackingLift], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Lift").fg(header_color),
            Cell::new(format!("Max ({})", unit_label(units))).fg(header_color),
            Cell::new("Date").fg(header_color),
        ]);

    for tracked in lifts {
        table.add_row(vec![
            Cell::new(tracked.id.map_or("-".to_string(), |id| id.to_string())),
            Cell::new(&tracked.lift.name),
            Cell::new(format_weight(to_display(tracked.lift.max_weight, units))),
            Cell::new(tracked.date.format("%x").to_string()),
        ]);
    }
    println!("{table}");
}

fn print_lift_csv(lifts: &[TrackingLift], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for tracked in lifts {
        writer.serialize(LiftCsvRow {
            id: tracked.id,
            name: &tracked.lift.name,
            max_weight: format_weight(to_display(tracked.lift.max_weight, units)),
            unit: unit_label(units),
            date: tracked.date,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_cycles_table(header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Cycle").fg(header_color),
            Cell::new("Set 1").fg(header_color),
            Cell::new("Set 2").fg(header_color),
            Cell::new("Set 3").fg(header_color),
            Cell::new("Warm-up").fg(header_color),
        ]);

    for cycle in TrainingCycle::all() {
        let mut row = vec![Cell::new(cycle.label())];
        for (percent, reps) in cycle.working_table() {
            row.push(Cell::new(format!("{percent:.0}% x {reps}")));
        }
        row.push(Cell::new(if cycle.has_warm_up() { "yes" } else { "no" }));
        table.add_row(row);
    }
    println!("{table}");
}
