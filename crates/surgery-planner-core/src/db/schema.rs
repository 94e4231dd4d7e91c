//! SQLite schema definition.

/// Complete database schema for the surgery planner.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Non-operable cases (registry of cases held back from scheduling)
-- ============================================================================

CREATE TABLE IF NOT EXISTS non_operable_cases (
    case_id INTEGER PRIMARY KEY,
    case_json TEXT NOT NULL,                     -- JSON-serialized Case
    reason TEXT NOT NULL,
    registered_at TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_non_operable_registered_at ON non_operable_cases(registered_at);
"#;
