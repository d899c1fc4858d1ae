//! Event log migrations - embedded SQL files
//!
//! Each migration is a (name, sql) pair compiled in with include_str!
//! and applied in order.

/// All log migrations.
///
/// New migrations get the next NNN_ prefix and an entry at the end.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
