//! Integration tests for `SqliteStore` against an in-memory database.

use carebook_core::{
  ErrorClass, Patch, StoreError as _, UserId,
  record::{
    Allergy, AllergyPatch, Appointment, AppointmentPatch, ChronicCondition,
    Insurance, InsurancePatch, MedicalRecord, NewAllergy, NewAppointment,
    NewChronicCondition, NewInsurance, NewMedicalRecord, NewPrescription,
    Prescription,
  },
  store::{AccountStore, RecordStore},
  user::{NewUser, ProfilePatch},
};
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str) -> UserId {
  s.create_user(NewUser {
    email:         email.into(),
    name:          "Test User".into(),
    password_hash: "$argon2id$placeholder".into(),
  })
  .await
  .unwrap()
  .id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn asthma() -> NewChronicCondition {
  NewChronicCondition {
    condition:      "Asthma".into(),
    diagnosis_date: Some(date(2010, 3, 14)),
    severity:       Some("Moderate".into()),
    notes:          None,
  }
}

fn peanut() -> NewAllergy {
  NewAllergy {
    kind:     "Food".into(),
    name:     "Peanut".into(),
    severity: Some("Severe".into()),
    reaction: Some("Anaphylaxis".into()),
    notes:    Some("Carries epinephrine".into()),
  }
}

fn appointment(on: NaiveDate) -> NewAppointment {
  NewAppointment {
    doctor_name:   "Dr. Lee".into(),
    hospital_name: None,
    date:          on,
    time:          "10:00".into(),
    kind:          "Checkup".into(),
    notes:         None,
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_owner_and_timestamps() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let rec = s.create::<ChronicCondition>(alice, asthma()).await.unwrap();
  assert_eq!(rec.owner_id, alice);
  assert_eq!(rec.record.condition, "Asthma");
  assert_eq!(rec.record.diagnosis_date, Some(date(2010, 3, 14)));
  assert_eq!(rec.created_at, rec.updated_at);
}

#[tokio::test]
async fn create_writes_assigned_status() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let appt = s
    .create::<Appointment>(alice, appointment(date(2024, 5, 1)))
    .await
    .unwrap();
  assert_eq!(appt.record.status, "Scheduled");

  let rx = s
    .create::<Prescription>(alice, NewPrescription {
      doctor_name: "Dr. Lee".into(),
      medication:  "Amoxicillin".into(),
      dosage:      "250mg".into(),
      frequency:   "3x daily".into(),
      start_date:  date(2024, 5, 1),
      end_date:    None,
      refills:     0,
      notes:       None,
    })
    .await
    .unwrap();
  assert_eq!(rx.record.status, "Active");
  assert_eq!(rx.record.refills, 0);
}

#[tokio::test]
async fn create_for_unknown_owner_is_a_conflict() {
  let s = store().await;
  let err = s
    .create::<ChronicCondition>(UserId::new(), asthma())
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::Conflict);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_scoped_to_owner() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;

  s.create::<ChronicCondition>(alice, asthma()).await.unwrap();

  let mine = s.list::<ChronicCondition>(alice).await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].record.condition, "Asthma");

  let theirs = s.list::<ChronicCondition>(bob).await.unwrap();
  assert!(theirs.is_empty());
}

#[tokio::test]
async fn list_newest_first_by_default() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  for name in ["Peanut", "Shellfish", "Penicillin"] {
    let mut input = peanut();
    input.name = name.into();
    s.create::<Allergy>(alice, input).await.unwrap();
  }

  let names: Vec<_> = s
    .list::<Allergy>(alice)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.record.name)
    .collect();
  assert_eq!(names, ["Penicillin", "Shellfish", "Peanut"]);
}

#[tokio::test]
async fn appointments_list_soonest_first() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  for on in [date(2024, 7, 1), date(2024, 5, 1), date(2024, 6, 1)] {
    s.create::<Appointment>(alice, appointment(on)).await.unwrap();
  }

  let dates: Vec<_> = s
    .list::<Appointment>(alice)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.record.date)
    .collect();
  assert_eq!(dates, [date(2024, 5, 1), date(2024, 6, 1), date(2024, 7, 1)]);
}

#[tokio::test]
async fn medical_records_list_latest_date_first() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  for (title, on) in [("old", date(2020, 1, 1)), ("new", date(2023, 1, 1)), ("mid", date(2021, 1, 1))] {
    s.create::<MedicalRecord>(alice, NewMedicalRecord {
      record_type:   "Lab".into(),
      title:         title.into(),
      description:   None,
      date:          on,
      doctor_name:   None,
      hospital_name: None,
      file_url:      None,
    })
    .await
    .unwrap();
  }

  let titles: Vec<_> = s
    .list::<MedicalRecord>(alice)
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.record.title)
    .collect();
  assert_eq!(titles, ["new", "mid", "old"]);
}

#[tokio::test]
async fn prescriptions_list_latest_start_first() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let starts = [
    ("Amoxicillin", date(2024, 3, 1)),
    ("Ibuprofen", date(2024, 6, 1)),
    ("Cetirizine", date(2024, 3, 1)),
    ("Metformin", date(2024, 1, 1)),
  ];
  for (medication, start) in starts {
    s.create::<Prescription>(alice, NewPrescription {
      doctor_name: "Dr. Lee".into(),
      medication:  medication.into(),
      dosage:      "1 tablet".into(),
      frequency:   "daily".into(),
      start_date:  start,
      end_date:    None,
      refills:     0,
      notes:       None,
    })
    .await
    .unwrap();
  }

  let meds: Vec<_> = s
    .list::<Prescription>(alice)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.record.medication)
    .collect();
  // Equal start dates: the later insert comes first.
  assert_eq!(meds, ["Ibuprofen", "Cetirizine", "Amoxicillin", "Metformin"]);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_supplied_fields() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let created = s.create::<Allergy>(alice, peanut()).await.unwrap();

  let patch = AllergyPatch { severity: Patch::Set("Mild".into()), ..Default::default() };
  let updated = s.update::<Allergy>(alice, created.id, patch).await.unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.record.severity.as_deref(), Some("Mild"));
  assert_eq!(updated.record.name, "Peanut");
  assert_eq!(updated.record.kind, "Food");
  assert_eq!(updated.record.reaction.as_deref(), Some("Anaphylaxis"));
  assert_eq!(updated.record.notes.as_deref(), Some("Carries epinephrine"));
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_clear_sets_optional_field_to_null() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let created = s.create::<Allergy>(alice, peanut()).await.unwrap();

  let patch = AllergyPatch { notes: Patch::Clear, ..Default::default() };
  let updated = s.update::<Allergy>(alice, created.id, patch).await.unwrap();
  assert_eq!(updated.record.notes, None);
  assert_eq!(updated.record.reaction.as_deref(), Some("Anaphylaxis"));
}

#[tokio::test]
async fn update_with_empty_patch_keeps_record() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let created = s.create::<Allergy>(alice, peanut()).await.unwrap();

  let updated = s
    .update::<Allergy>(alice, created.id, AllergyPatch::default())
    .await
    .unwrap();
  assert_eq!(updated.record, created.record);
}

#[tokio::test]
async fn update_status_override() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let first = s
    .create::<Appointment>(alice, appointment(date(2024, 5, 1)))
    .await
    .unwrap();
  let second = s
    .create::<Appointment>(alice, appointment(date(2024, 6, 1)))
    .await
    .unwrap();

  let patch = AppointmentPatch { status: Patch::Set("Completed".into()), ..Default::default() };
  s.update::<Appointment>(alice, first.id, patch).await.unwrap();

  let listed = s.list::<Appointment>(alice).await.unwrap();
  let status_of = |id: Uuid| {
    listed
      .iter()
      .find(|a| a.id == id)
      .map(|a| a.record.status.clone())
      .unwrap()
  };
  assert_eq!(status_of(first.id), "Completed");
  assert_eq!(status_of(second.id), "Scheduled");
}

#[tokio::test]
async fn update_other_owners_record_is_not_found_and_unchanged() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;
  let bobs = s
    .create::<Insurance>(bob, NewInsurance {
      provider:      "Acme Health".into(),
      policy_number: "P-100".into(),
      group_number:  None,
      coverage_type: "Full".into(),
      start_date:    date(2024, 1, 1),
      end_date:      None,
      is_active:     true,
    })
    .await
    .unwrap();

  let patch = InsurancePatch { is_active: Patch::Set(false), ..Default::default() };
  let err = s.update::<Insurance>(alice, bobs.id, patch).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::NotFound);

  let still = s.list::<Insurance>(bob).await.unwrap();
  assert!(still[0].record.is_active);
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let err = s
    .update::<Allergy>(alice, Uuid::new_v4(), AllergyPatch::default())
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::NotFound);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_returns_record_and_removes_it() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let created = s.create::<Allergy>(alice, peanut()).await.unwrap();

  let deleted = s.delete::<Allergy>(alice, created.id).await.unwrap();
  assert_eq!(deleted.id, created.id);
  assert!(s.list::<Allergy>(alice).await.unwrap().is_empty());

  let again = s.delete::<Allergy>(alice, created.id).await.unwrap_err();
  assert_eq!(again.class(), ErrorClass::NotFound);
}

#[tokio::test]
async fn delete_other_owners_record_is_not_found() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;
  let bobs = s.create::<Allergy>(bob, peanut()).await.unwrap();

  let err = s.delete::<Allergy>(alice, bobs.id).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::NotFound);
  assert_eq!(s.list::<Allergy>(bob).await.unwrap().len(), 1);
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_starts_empty_and_patches_in_place() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let before = s.get_profile(alice).await.unwrap();
  assert_eq!(before.profile.blood_group, None);

  let patch = ProfilePatch {
    blood_group:   Patch::Set("O+".into()),
    date_of_birth: Patch::Set(date(1990, 2, 3)),
    ..Default::default()
  };
  let after = s.update_profile(alice, patch).await.unwrap();
  assert_eq!(after.profile.blood_group.as_deref(), Some("O+"));
  assert_eq!(after.profile.date_of_birth, Some(date(1990, 2, 3)));
  assert_eq!(after.email, "alice@example.com");

  let cleared = s
    .update_profile(alice, ProfilePatch { blood_group: Patch::Clear, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(cleared.profile.blood_group, None);
  assert_eq!(cleared.profile.date_of_birth, Some(date(1990, 2, 3)));
}

#[tokio::test]
async fn profile_of_unknown_user_is_not_found() {
  let s = store().await;
  let err = s.get_profile(UserId::new()).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::NotFound);
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_is_a_conflict_case_insensitively() {
  let s = store().await;
  user(&s, "alice@example.com").await;

  let err = s
    .create_user(NewUser {
      email:         "Alice@Example.com".into(),
      name:          "Other".into(),
      password_hash: "x".into(),
    })
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::Conflict);
}

#[tokio::test]
async fn find_credentials_by_email() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let creds = s
    .find_credentials("ALICE@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.user.id, alice);
  assert_eq!(creds.password_hash, "$argon2id$placeholder");

  assert!(s.find_credentials("nobody@example.com".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_resolve_until_expiry_or_deletion() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let now = Utc::now();

  s.create_session(alice, "live".into(), now + Duration::hours(1)).await.unwrap();
  s.create_session(alice, "stale".into(), now - Duration::hours(1)).await.unwrap();

  assert_eq!(s.resolve_session("live".into(), now).await.unwrap(), Some(alice));
  assert_eq!(s.resolve_session("stale".into(), now).await.unwrap(), None);
  assert_eq!(s.resolve_session("unknown".into(), now).await.unwrap(), None);

  assert!(s.delete_session("live".into()).await.unwrap());
  assert!(!s.delete_session("live".into()).await.unwrap());
  assert_eq!(s.resolve_session("live".into(), now).await.unwrap(), None);
}
