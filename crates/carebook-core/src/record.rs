//! The owner-scoped record kinds.
//!
//! Each kind comes as a triple: the stored payload, a `New*` create input and
//! a `*Patch` update input. Server-assigned fields (appointment and
//! prescription status) are absent from the create inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  patch::Patch,
  schema::{Field, FieldType, NEWEST_FIRST, RecordKind, SortKey},
};

/// Status written on every new appointment.
pub const APPOINTMENT_SCHEDULED: &str = "Scheduled";
/// Status written on every new prescription.
pub const PRESCRIPTION_ACTIVE: &str = "Active";

// ─── Chronic condition ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronicCondition {
  pub condition:      String,
  pub diagnosis_date: Option<NaiveDate>,
  pub severity:       Option<String>,
  pub notes:          Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChronicCondition {
  pub condition:      String,
  #[serde(default)]
  pub diagnosis_date: Option<NaiveDate>,
  #[serde(default)]
  pub severity:       Option<String>,
  #[serde(default)]
  pub notes:          Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronicConditionPatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub condition:      Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub diagnosis_date: Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub severity:       Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub notes:          Patch<String>,
}

impl RecordKind for ChronicCondition {
  type New = NewChronicCondition;
  type Patch = ChronicConditionPatch;

  const NAME: &'static str = "ChronicCondition";
  const PLURAL: &'static str = "ChronicConditions";
  const TABLE: &'static str = "chronic_conditions";
  const FIELDS: &'static [Field] = &[
    Field::required("condition", "condition", FieldType::Text),
    Field::optional("diagnosisDate", "diagnosis_date", FieldType::Date),
    Field::optional("severity", "severity", FieldType::Text),
    Field::optional("notes", "notes", FieldType::Text),
  ];
  const ORDER: SortKey = NEWEST_FIRST;
}

// ─── Allergy ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
  /// Allergen category, e.g. "Food" or "Drug".
  #[serde(rename = "type")]
  pub kind:     String,
  pub name:     String,
  pub severity: Option<String>,
  pub reaction: Option<String>,
  pub notes:    Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllergy {
  #[serde(rename = "type")]
  pub kind:     String,
  pub name:     String,
  #[serde(default)]
  pub severity: Option<String>,
  #[serde(default)]
  pub reaction: Option<String>,
  #[serde(default)]
  pub notes:    Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyPatch {
  #[serde(rename = "type", default, skip_serializing_if = "Patch::is_keep")]
  pub kind:     Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub name:     Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub severity: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub reaction: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub notes:    Patch<String>,
}

impl RecordKind for Allergy {
  type New = NewAllergy;
  type Patch = AllergyPatch;

  const NAME: &'static str = "Allergy";
  const PLURAL: &'static str = "Allergies";
  const TABLE: &'static str = "allergies";
  const FIELDS: &'static [Field] = &[
    Field::required("type", "allergy_type", FieldType::Text),
    Field::required("name", "name", FieldType::Text),
    Field::optional("severity", "severity", FieldType::Text),
    Field::optional("reaction", "reaction", FieldType::Text),
    Field::optional("notes", "notes", FieldType::Text),
  ];
  const ORDER: SortKey = NEWEST_FIRST;
}

// ─── Current medication ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMedication {
  pub name:          String,
  pub dosage:        String,
  pub frequency:     String,
  pub start_date:    NaiveDate,
  pub end_date:      Option<NaiveDate>,
  pub prescribed_by: Option<String>,
  pub notes:         Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrentMedication {
  pub name:          String,
  pub dosage:        String,
  pub frequency:     String,
  pub start_date:    NaiveDate,
  #[serde(default)]
  pub end_date:      Option<NaiveDate>,
  #[serde(default)]
  pub prescribed_by: Option<String>,
  #[serde(default)]
  pub notes:         Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMedicationPatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub name:          Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub dosage:        Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub frequency:     Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub start_date:    Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub end_date:      Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub prescribed_by: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub notes:         Patch<String>,
}

impl RecordKind for CurrentMedication {
  type New = NewCurrentMedication;
  type Patch = CurrentMedicationPatch;

  const NAME: &'static str = "CurrentMedication";
  const PLURAL: &'static str = "CurrentMedications";
  const TABLE: &'static str = "current_medications";
  const FIELDS: &'static [Field] = &[
    Field::required("name", "name", FieldType::Text),
    Field::required("dosage", "dosage", FieldType::Text),
    Field::required("frequency", "frequency", FieldType::Text),
    Field::required("startDate", "start_date", FieldType::Date),
    Field::optional("endDate", "end_date", FieldType::Date),
    Field::optional("prescribedBy", "prescribed_by", FieldType::Text),
    Field::optional("notes", "notes", FieldType::Text),
  ];
  const ORDER: SortKey = NEWEST_FIRST;
}

// ─── Insurance ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
  pub provider:      String,
  pub policy_number: String,
  pub group_number:  Option<String>,
  pub coverage_type: String,
  pub start_date:    NaiveDate,
  pub end_date:      Option<NaiveDate>,
  pub is_active:     bool,
}

fn active_by_default() -> bool { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInsurance {
  pub provider:      String,
  pub policy_number: String,
  #[serde(default)]
  pub group_number:  Option<String>,
  pub coverage_type: String,
  pub start_date:    NaiveDate,
  #[serde(default)]
  pub end_date:      Option<NaiveDate>,
  #[serde(default = "active_by_default")]
  pub is_active:     bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub provider:      Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub policy_number: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub group_number:  Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub coverage_type: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub start_date:    Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub end_date:      Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub is_active:     Patch<bool>,
}

impl RecordKind for Insurance {
  type New = NewInsurance;
  type Patch = InsurancePatch;

  const NAME: &'static str = "Insurance";
  const PLURAL: &'static str = "Insurances";
  const TABLE: &'static str = "insurances";
  const FIELDS: &'static [Field] = &[
    Field::required("provider", "provider", FieldType::Text),
    Field::required("policyNumber", "policy_number", FieldType::Text),
    Field::optional("groupNumber", "group_number", FieldType::Text),
    Field::required("coverageType", "coverage_type", FieldType::Text),
    Field::required("startDate", "start_date", FieldType::Date),
    Field::optional("endDate", "end_date", FieldType::Date),
    Field::defaulted("isActive", "is_active", FieldType::Bool),
  ];
  const ORDER: SortKey = NEWEST_FIRST;
}

// ─── Appointment ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
  pub doctor_name:   String,
  pub hospital_name: Option<String>,
  pub date:          NaiveDate,
  /// Free-form time of day as entered, e.g. "10:00".
  pub time:          String,
  #[serde(rename = "type")]
  pub kind:          String,
  pub status:        String,
  pub notes:         Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
  pub doctor_name:   String,
  #[serde(default)]
  pub hospital_name: Option<String>,
  pub date:          NaiveDate,
  pub time:          String,
  #[serde(rename = "type")]
  pub kind:          String,
  #[serde(default)]
  pub notes:         Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub doctor_name:   Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub hospital_name: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub date:          Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub time:          Patch<String>,
  #[serde(rename = "type", default, skip_serializing_if = "Patch::is_keep")]
  pub kind:          Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub status:        Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub notes:         Patch<String>,
}

impl RecordKind for Appointment {
  type New = NewAppointment;
  type Patch = AppointmentPatch;

  const NAME: &'static str = "Appointment";
  const PLURAL: &'static str = "Appointments";
  const TABLE: &'static str = "appointments";
  const FIELDS: &'static [Field] = &[
    Field::required("doctorName", "doctor_name", FieldType::Text),
    Field::optional("hospitalName", "hospital_name", FieldType::Text),
    Field::required("date", "date", FieldType::Date),
    Field::required("time", "time", FieldType::Text),
    Field::required("type", "appointment_type", FieldType::Text),
    Field::assigned("status", "status", APPOINTMENT_SCHEDULED),
    Field::optional("notes", "notes", FieldType::Text),
  ];
  // Soonest first.
  const ORDER: SortKey = SortKey::asc("date");
}

// ─── Medical record ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
  pub record_type:   String,
  pub title:         String,
  pub description:   Option<String>,
  pub date:          NaiveDate,
  pub doctor_name:   Option<String>,
  pub hospital_name: Option<String>,
  /// Link to an externally stored document; never fetched by the server.
  pub file_url:      Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicalRecord {
  pub record_type:   String,
  pub title:         String,
  #[serde(default)]
  pub description:   Option<String>,
  pub date:          NaiveDate,
  #[serde(default)]
  pub doctor_name:   Option<String>,
  #[serde(default)]
  pub hospital_name: Option<String>,
  #[serde(default)]
  pub file_url:      Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordPatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub record_type:   Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub title:         Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub description:   Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub date:          Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub doctor_name:   Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub hospital_name: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub file_url:      Patch<String>,
}

impl RecordKind for MedicalRecord {
  type New = NewMedicalRecord;
  type Patch = MedicalRecordPatch;

  const NAME: &'static str = "MedicalRecord";
  const PLURAL: &'static str = "MedicalRecords";
  const TABLE: &'static str = "medical_records";
  const FIELDS: &'static [Field] = &[
    Field::required("recordType", "record_type", FieldType::Text),
    Field::required("title", "title", FieldType::Text),
    Field::optional("description", "description", FieldType::Text),
    Field::required("date", "date", FieldType::Date),
    Field::optional("doctorName", "doctor_name", FieldType::Text),
    Field::optional("hospitalName", "hospital_name", FieldType::Text),
    Field::optional("fileUrl", "file_url", FieldType::Text),
  ];
  const ORDER: SortKey = SortKey::desc("date");
}

// ─── Prescription ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
  pub doctor_name: String,
  pub medication:  String,
  pub dosage:      String,
  pub frequency:   String,
  pub start_date:  NaiveDate,
  pub end_date:    Option<NaiveDate>,
  pub refills:     u32,
  pub status:      String,
  pub notes:       Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescription {
  pub doctor_name: String,
  pub medication:  String,
  pub dosage:      String,
  pub frequency:   String,
  pub start_date:  NaiveDate,
  #[serde(default)]
  pub end_date:    Option<NaiveDate>,
  #[serde(default)]
  pub refills:     u32,
  #[serde(default)]
  pub notes:       Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionPatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub doctor_name: Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub medication:  Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub dosage:      Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub frequency:   Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub start_date:  Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub end_date:    Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub refills:     Patch<u32>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub status:      Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub notes:       Patch<String>,
}

impl RecordKind for Prescription {
  type New = NewPrescription;
  type Patch = PrescriptionPatch;

  const NAME: &'static str = "Prescription";
  const PLURAL: &'static str = "Prescriptions";
  const TABLE: &'static str = "prescriptions";
  const FIELDS: &'static [Field] = &[
    Field::required("doctorName", "doctor_name", FieldType::Text),
    Field::required("medication", "medication", FieldType::Text),
    Field::required("dosage", "dosage", FieldType::Text),
    Field::required("frequency", "frequency", FieldType::Text),
    Field::required("startDate", "start_date", FieldType::Date),
    Field::optional("endDate", "end_date", FieldType::Date),
    Field::defaulted("refills", "refills", FieldType::Integer),
    Field::assigned("status", "status", PRESCRIPTION_ACTIVE),
    Field::optional("notes", "notes", FieldType::Text),
  ];
  const ORDER: SortKey = SortKey::desc("start_date");
}
