use super::common::*;

use chrono::{Duration, NaiveDate};

use crate::identity::UserId;
use crate::workflows::checklist::{ChecklistService, TemplateUpdate};
use crate::workflows::inspection::domain::{Inspection, InspectionId, Verdict};
use crate::workflows::inspection::repository::InspectionStore;
use crate::workflows::scheduling::domain::AppointmentState;
use crate::workflows::scheduling::service::SchedulingError;
use crate::workflows::vehicles::domain::VehicleId;

#[test]
fn create_checks_ownership_before_the_date() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    // A past date on a foreign vehicle must still read as Forbidden.
    let intruder = UserId("usr-000099".to_string());
    match service.create(&intruder, &vehicle.id, "2020-01-01T10:00:00", anchor()) {
        Err(SchedulingError::VehicleNotOwned) => {}
        other => panic!("expected ownership rejection, got {other:?}"),
    }

    match service.create(
        &owner,
        &VehicleId("veh-missing".to_string()),
        "2026-03-04T10:00:00",
        anchor(),
    ) {
        Err(SchedulingError::VehicleNotOwned) => {}
        other => panic!("expected ownership rejection, got {other:?}"),
    }
}

#[test]
fn create_rejects_past_and_malformed_dates() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    match service.create(&owner, &vehicle.id, "2026-03-01T10:00:00", anchor()) {
        Err(SchedulingError::DateInPast) => {}
        other => panic!("expected past date rejection, got {other:?}"),
    }

    match service.create(&owner, &vehicle.id, "next tuesday", anchor()) {
        Err(SchedulingError::InvalidDate(raw)) => assert_eq!(raw, "next tuesday"),
        other => panic!("expected malformed date rejection, got {other:?}"),
    }
}

#[test]
fn create_requires_an_active_template() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");

    match service.create(&owner, &vehicle.id, "2026-03-04T10:00:00", anchor()) {
        Err(SchedulingError::NoActiveTemplate) => {}
        other => panic!("expected missing template rejection, got {other:?}"),
    }

    // A deactivated template does not count either.
    let template = seed_active_template(&store, "Basic 8-Point", anchor());
    let checklist = ChecklistService::new(store.clone());
    checklist
        .update(
            &template.id,
            TemplateUpdate {
                active: Some(false),
                ..TemplateUpdate::default()
            },
            anchor(),
        )
        .expect("deactivation succeeds");

    match service.create(&owner, &vehicle.id, "2026-03-04T10:00:00", anchor()) {
        Err(SchedulingError::NoActiveTemplate) => {}
        other => panic!("expected missing template rejection, got {other:?}"),
    }
}

#[test]
fn create_snapshots_the_newest_active_template() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());
    let newer = seed_active_template(&store, "Revised 8-Point", anchor() + Duration::hours(1));

    // Seconds are optional on the wire.
    let appointment = service
        .create(&owner, &vehicle.id, "2026-03-04T10:00", anchor())
        .expect("appointment books");

    assert_eq!(appointment.template_id, newer.id);
    assert_eq!(appointment.state, AppointmentState::Pending);
    assert_eq!(
        appointment.scheduled_at,
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .expect("valid date")
            .and_hms_opt(10, 0, 0)
            .expect("valid time")
    );
}

#[test]
fn confirm_transitions_pending_appointments_only() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    let appointment = service
        .create(&owner, &vehicle.id, "2026-03-04T10:00:00", anchor())
        .expect("appointment books");

    let confirmed = service.confirm(&appointment.id).expect("confirmation works");
    assert_eq!(confirmed.state, AppointmentState::Confirmed);

    match service.confirm(&appointment.id) {
        Err(SchedulingError::NotPending) => {}
        other => panic!("expected non-pending rejection, got {other:?}"),
    }

    service
        .cancel(&owner, &appointment.id, None)
        .expect("cancellation works");
    match service.confirm(&appointment.id) {
        Err(SchedulingError::NotPending) => {}
        other => panic!("expected non-pending rejection, got {other:?}"),
    }
}

#[test]
fn cancel_is_owner_scoped_and_terminal() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    let appointment = service
        .create(&owner, &vehicle.id, "2026-03-04T10:00:00", anchor())
        .expect("appointment books");

    let intruder = UserId("usr-000099".to_string());
    match service.cancel(&intruder, &appointment.id, None) {
        Err(SchedulingError::AppointmentNotFound) => {}
        other => panic!("expected combined not-found, got {other:?}"),
    }

    let cancelled = service
        .cancel(&owner, &appointment.id, Some("car sold".to_string()))
        .expect("cancellation works");
    assert_eq!(cancelled.state, AppointmentState::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("car sold"));

    match service.cancel(&owner, &appointment.id, None) {
        Err(SchedulingError::AlreadyCancelled) => {}
        other => panic!("expected terminal state rejection, got {other:?}"),
    }
}

#[test]
fn availability_excludes_occupied_slots_until_cancellation() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    let day = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
    let report = service
        .availability(Some(day), Some(day), anchor())
        .expect("availability works");
    assert_eq!(report.total, 9);

    let appointment = service
        .create(&owner, &vehicle.id, "2026-03-02T10:00:00", anchor())
        .expect("appointment books");

    let report = service
        .availability(Some(day), Some(day), anchor())
        .expect("availability works");
    assert_eq!(report.total, 8);
    let booked = NaiveDate::from_ymd_opt(2026, 3, 2)
        .expect("valid date")
        .and_hms_opt(10, 0, 0)
        .expect("valid time");
    assert!(!report.slots.contains(&booked));

    service
        .cancel(&owner, &appointment.id, None)
        .expect("cancellation works");
    let report = service
        .availability(Some(day), Some(day), anchor())
        .expect("availability works");
    assert_eq!(report.total, 9, "a cancelled appointment frees its slot");
}

#[test]
fn default_availability_window_spans_thirty_days() {
    let (service, _) = build_scheduler();

    let report = service
        .availability(None, None, anchor())
        .expect("availability works");

    // 2026-03-02 through 2026-04-01 holds 23 weekdays.
    assert_eq!(report.total, 23 * 9);
    assert_eq!(
        report.slots.first().copied(),
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
    );
    assert_eq!(
        report.slots.last().copied(),
        NaiveDate::from_ymd_opt(2026, 4, 1)
            .expect("valid date")
            .and_hms_opt(17, 0, 0)
    );
}

#[test]
fn awaiting_inspection_lists_confirmed_without_inspection() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let inspector = seed_user(&store, "usr-000002", "Inspector Demo", "inspector@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    let late = service
        .create(&owner, &vehicle.id, "2026-03-04T15:00:00", anchor())
        .expect("appointment books");
    let early = service
        .create(&owner, &vehicle.id, "2026-03-04T09:00:00", anchor())
        .expect("appointment books");
    // Stays PENDING, must not appear in the candidate list.
    let _pending = service
        .create(&owner, &vehicle.id, "2026-03-04T11:00:00", anchor())
        .expect("appointment books");

    service.confirm(&late.id).expect("confirmation works");
    service.confirm(&early.id).expect("confirmation works");

    let candidates = service
        .awaiting_inspection()
        .expect("candidate listing works");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, early.id, "earliest first");
    assert_eq!(candidates[1].id, late.id);
    let template = candidates[0].template.as_ref().expect("template present");
    assert_eq!(template.items.len(), 8);
    assert_eq!(
        candidates[0].requester.as_ref().map(|user| user.email.as_str()),
        Some("owner@mail.com")
    );

    // Starting an inspection removes the appointment from the list.
    store
        .insert_inspection(Inspection {
            id: InspectionId("insp-test".to_string()),
            appointment_id: early.id.clone(),
            inspector_id: inspector.clone(),
            total: 0,
            result: Verdict::Safe,
            general_note: None,
            scores: Vec::new(),
            created_at: anchor(),
        })
        .expect("inspection seeds");

    let candidates = service
        .awaiting_inspection()
        .expect("candidate listing works");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, late.id);
}

#[test]
fn list_all_resolves_related_records() {
    let (service, store) = build_scheduler();
    let owner = seed_user(&store, "usr-000001", "Owner Demo", "owner@mail.com");
    let inspector = seed_user(&store, "usr-000002", "Inspector Demo", "inspector@mail.com");
    let vehicle = seed_vehicle(&store, &owner, "ABC123");
    seed_active_template(&store, "Basic 8-Point", anchor());

    let appointment = service
        .create(&owner, &vehicle.id, "2026-03-04T10:00:00", anchor())
        .expect("appointment books");
    service.confirm(&appointment.id).expect("confirmation works");
    store
        .insert_inspection(Inspection {
            id: InspectionId("insp-test".to_string()),
            appointment_id: appointment.id.clone(),
            inspector_id: inspector.clone(),
            total: 61,
            result: Verdict::Recheck,
            general_note: None,
            scores: Vec::new(),
            created_at: anchor(),
        })
        .expect("inspection seeds");

    let rows = service.list_all().expect("admin listing works");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    let row_vehicle = row.vehicle.as_ref().expect("vehicle present");
    assert_eq!(row_vehicle.plate, "ABC123");
    assert_eq!(
        row_vehicle.owner.as_ref().map(|user| user.email.as_str()),
        Some("owner@mail.com")
    );
    assert_eq!(
        row.requester.as_ref().map(|user| user.email.as_str()),
        Some("owner@mail.com")
    );
    assert_eq!(
        row.inspector.as_ref().map(|user| user.email.as_str()),
        Some("inspector@mail.com"),
        "starting an inspection stamps the inspector onto the appointment"
    );
    let summary = row.inspection.as_ref().expect("inspection summary present");
    assert_eq!(summary.total, 61);
}
