use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;

use roadworthy::error::AppError;
use roadworthy::store::MemoryStore;
use roadworthy::workflows::inspection::{Inspection, InspectionService};
use roadworthy::workflows::scheduling::domain::AppointmentId;
use roadworthy::workflows::scheduling::slots::{free_slots, DEFAULT_WINDOW_DAYS};
use roadworthy::workflows::scheduling::SchedulingService;

use crate::infra::{next_bookable_slot, seed_demo_fixtures, DemoFixtures};

#[derive(Args, Debug, Default)]
pub(crate) struct SlotsArgs {
    /// First date of the window (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Last date of the window, inclusive (YYYY-MM-DD). Defaults to from + 30 days.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Anchor date for the walkthrough (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Prints the bookable slot lattice for a date window, one line per day.
pub(crate) fn run_slots(args: SlotsArgs) -> Result<(), AppError> {
    let now = Local::now().naive_local();
    let from = args.from.unwrap_or_else(|| now.date());
    let to = args.to.unwrap_or(from + Duration::days(DEFAULT_WINDOW_DAYS));
    if to < from {
        return Err(AppError::Bootstrap(
            "--to must not be before --from".to_string(),
        ));
    }

    let slots = free_slots(from, to, &HashSet::new(), now);

    println!("Bookable inspection slots, {from} to {to}");
    let mut by_day: BTreeMap<NaiveDate, Vec<NaiveDateTime>> = BTreeMap::new();
    for slot in &slots {
        by_day.entry(slot.date()).or_default().push(*slot);
    }
    for (day, times) in &by_day {
        let hours: Vec<String> = times
            .iter()
            .map(|slot| slot.format("%H:%M").to_string())
            .collect();
        println!("  {} {}  {}", day.format("%a"), day, hours.join(" "));
    }
    println!("Total: {} slots", slots.len());
    Ok(())
}

/// Walks one booking from request to verdict against a fresh registry,
/// narrating each step: seed, book, confirm, score, finalize.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args
        .today
        .map(|day| day.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| Local::now().naive_local());

    println!("Roadworthy inspection walkthrough");

    let store = Arc::new(MemoryStore::default());
    let fixtures = seed_demo_fixtures(&store, now)?;
    let scheduling = SchedulingService::new(store.clone());
    let inspections = InspectionService::new(store.clone());

    println!("Seeded demo records:");
    println!(
        "- Users {} (owner), {} (inspector), {} (admin)",
        fixtures.owner.0, fixtures.inspector.0, fixtures.admin.0
    );
    println!(
        "- Vehicle {} owned by Owner Demo",
        fixtures.vehicle.plate
    );
    println!(
        "- Checklist '{}' with {} items, active: {}",
        fixtures.template.name,
        fixtures.template.items.len(),
        fixtures.template.active
    );
    println!(
        "- Appointment {} for {} ({})",
        fixtures.appointment.id.0,
        fixtures.appointment.scheduled_at.format("%Y-%m-%d %H:%M"),
        fixtures.appointment.state.label()
    );

    let window = scheduling.availability(None, None, now).map_err(demo_error)?;
    println!(
        "\n{} bookable slots remain over the next {} days",
        window.total, DEFAULT_WINDOW_DAYS
    );

    let confirmed = scheduling
        .confirm(&fixtures.appointment.id)
        .map_err(demo_error)?;
    println!(
        "\nAppointment {} confirmed for {}",
        confirmed.id.0,
        confirmed.scheduled_at.format("%Y-%m-%d %H:%M")
    );

    println!("\nInspection 1: worn front brakes");
    let first_values: [u8; 8] = [4, 9, 8, 9, 7, 10, 9, 8];
    let first = run_inspection_sheet(
        &inspections,
        &fixtures,
        &confirmed.id,
        now,
        first_values,
        Some("pads below minimum thickness"),
        Some("brake service required before resubmission"),
    )?;
    println!(
        "Verdict: {} (total {})",
        first.result.label(),
        first.total
    );

    println!("\nInspection 2: after the brake service");
    let slot = next_bookable_slot(&store, now)?;
    let rebooked = scheduling
        .create(
            &fixtures.owner,
            &fixtures.vehicle.id,
            &slot.format("%Y-%m-%dT%H:%M:%S").to_string(),
            now,
        )
        .map_err(demo_error)?;
    let rebooked = scheduling.confirm(&rebooked.id).map_err(demo_error)?;
    println!(
        "Rebooked as {} for {}",
        rebooked.id.0,
        rebooked.scheduled_at.format("%Y-%m-%d %H:%M")
    );

    let second = run_inspection_sheet(
        &inspections,
        &fixtures,
        &rebooked.id,
        now,
        [10; 8],
        None,
        Some("all items within tolerance"),
    )?;
    println!(
        "Verdict: {} (total {})",
        second.result.label(),
        second.total
    );

    let overview = inspections.get(&second.id).map_err(demo_error)?;
    match serde_json::to_string_pretty(&overview) {
        Ok(json) => println!("\nFinal inspection record:\n{json}"),
        Err(err) => println!("\nFinal inspection record unavailable: {err}"),
    }

    Ok(())
}

fn run_inspection_sheet(
    inspections: &InspectionService<MemoryStore>,
    fixtures: &DemoFixtures,
    appointment: &AppointmentId,
    now: NaiveDateTime,
    values: [u8; 8],
    first_item_note: Option<&str>,
    general_note: Option<&str>,
) -> Result<Inspection, AppError> {
    let inspection = inspections
        .create(&fixtures.inspector, appointment, now)
        .map_err(demo_error)?;

    for (index, (item, value)) in fixtures.template.items.iter().zip(values).enumerate() {
        let note = (index == 0)
            .then_some(first_item_note)
            .flatten()
            .map(str::to_string);
        inspections
            .add_score(&fixtures.inspector, &inspection.id, &item.id, value, note)
            .map_err(demo_error)?;
        println!("  {} -> {}", item.label, value);
    }

    inspections
        .finalize(
            &fixtures.inspector,
            &inspection.id,
            general_note.map(str::to_string),
        )
        .map_err(demo_error)
}

fn demo_error(err: impl std::fmt::Display) -> AppError {
    AppError::Bootstrap(err.to_string())
}
