//! SQL schema for the Carebook SQLite store.
//!
//! Executed once at connection startup. Column names must match the `column`
//! of every [`carebook_core::schema::Field`] declared for the table.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- stored lowercased
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    date_of_birth TEXT,                   -- YYYY-MM-DD
    gender        TEXT,
    blood_group   TEXT,
    phone         TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token_hash  TEXT NOT NULL UNIQUE,     -- hex SHA-256 of the bearer token
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chronic_conditions (
    id             TEXT PRIMARY KEY,
    owner_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    condition      TEXT NOT NULL,
    diagnosis_date TEXT,
    severity       TEXT,
    notes          TEXT
);

CREATE TABLE IF NOT EXISTS allergies (
    id           TEXT PRIMARY KEY,
    owner_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    allergy_type TEXT NOT NULL,
    name         TEXT NOT NULL,
    severity     TEXT,
    reaction     TEXT,
    notes        TEXT
);

CREATE TABLE IF NOT EXISTS current_medications (
    id            TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    name          TEXT NOT NULL,
    dosage        TEXT NOT NULL,
    frequency     TEXT NOT NULL,
    start_date    TEXT NOT NULL,
    end_date      TEXT,
    prescribed_by TEXT,
    notes         TEXT
);

CREATE TABLE IF NOT EXISTS insurances (
    id            TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    provider      TEXT NOT NULL,
    policy_number TEXT NOT NULL,
    group_number  TEXT,
    coverage_type TEXT NOT NULL,
    start_date    TEXT NOT NULL,
    end_date      TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1))
);

CREATE TABLE IF NOT EXISTS appointments (
    id               TEXT PRIMARY KEY,
    owner_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    doctor_name      TEXT NOT NULL,
    hospital_name    TEXT,
    date             TEXT NOT NULL,
    time             TEXT NOT NULL,
    appointment_type TEXT NOT NULL,
    status           TEXT NOT NULL,
    notes            TEXT
);

CREATE TABLE IF NOT EXISTS medical_records (
    id            TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    record_type   TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT,
    date          TEXT NOT NULL,
    doctor_name   TEXT,
    hospital_name TEXT,
    file_url      TEXT
);

CREATE TABLE IF NOT EXISTS prescriptions (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    doctor_name TEXT NOT NULL,
    medication  TEXT NOT NULL,
    dosage      TEXT NOT NULL,
    frequency   TEXT NOT NULL,
    start_date  TEXT NOT NULL,
    end_date    TEXT,
    refills     INTEGER NOT NULL DEFAULT 0 CHECK (refills >= 0),
    status      TEXT NOT NULL,
    notes       TEXT
);

CREATE INDEX IF NOT EXISTS sessions_user_idx            ON sessions(user_id);
CREATE INDEX IF NOT EXISTS chronic_conditions_owner_idx  ON chronic_conditions(owner_id);
CREATE INDEX IF NOT EXISTS allergies_owner_idx           ON allergies(owner_id);
CREATE INDEX IF NOT EXISTS current_medications_owner_idx ON current_medications(owner_id);
CREATE INDEX IF NOT EXISTS insurances_owner_idx          ON insurances(owner_id);
CREATE INDEX IF NOT EXISTS appointments_owner_idx        ON appointments(owner_id);
CREATE INDEX IF NOT EXISTS medical_records_owner_idx     ON medical_records(owner_id);
CREATE INDEX IF NOT EXISTS prescriptions_owner_idx       ON prescriptions(owner_id);

PRAGMA user_version = 1;
";
