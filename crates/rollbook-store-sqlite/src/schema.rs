//! SQL schema for the Rollbook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// A person is one row: scalar columns for the base identity and the owned
/// address, plus a role discriminant column and a JSON payload column for
/// the specialization. Records are retained after departure; no DELETE is
/// issued against `persons` anywhere in this crate.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id   TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,    -- ISO 8601 UTC; server-assigned
    given_name  TEXT NOT NULL,
    middle_name TEXT,
    nickname    TEXT,
    maiden_name TEXT,
    family_name TEXT NOT NULL,
    birthdate   TEXT NOT NULL,    -- ISO 8601 date; age is derived, never stored
    gender      TEXT NOT NULL CHECK (gender IN ('B', 'S')),
    married     INTEGER NOT NULL DEFAULT 0,
    -- home address, owned by the record
    street      TEXT NOT NULL,
    locality    TEXT NOT NULL,
    region      TEXT,
    postal_code TEXT,
    country     TEXT,
    -- self-reference by id; resolved (or reported NotFound) at read time
    spouse_id   TEXT,
    role        TEXT NOT NULL DEFAULT 'none',   -- discriminant of Role variant
    role_json   TEXT NOT NULL DEFAULT 'null'    -- JSON payload (inner data only)
);

CREATE TABLE IF NOT EXISTS terms (
    term_id TEXT PRIMARY KEY,
    code    TEXT NOT NULL UNIQUE,
    name    TEXT NOT NULL,
    start   TEXT NOT NULL,
    end     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    team_id  TEXT PRIMARY KEY,
    name     TEXT NOT NULL,
    locality TEXT
);

CREATE TABLE IF NOT EXISTS houses (
    house_id TEXT PRIMARY KEY,
    name     TEXT NOT NULL,
    gender   TEXT NOT NULL CHECK (gender IN ('B', 'S'))
);

CREATE TABLE IF NOT EXISTS bunks (
    bunk_id  TEXT PRIMARY KEY,
    number   INTEGER NOT NULL,
    house_id TEXT NOT NULL REFERENCES houses(house_id)
);

CREATE TABLE IF NOT EXISTS services (
    service_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    category   TEXT
);

CREATE TABLE IF NOT EXISTS vehicles (
    vehicle_id    TEXT PRIMARY KEY,
    description   TEXT NOT NULL,
    license_plate TEXT NOT NULL,
    capacity      INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS persons_role_idx   ON persons(role);
CREATE INDEX IF NOT EXISTS persons_family_idx ON persons(family_name);
CREATE INDEX IF NOT EXISTS bunks_house_idx    ON bunks(house_id);

PRAGMA user_version = 1;
";
