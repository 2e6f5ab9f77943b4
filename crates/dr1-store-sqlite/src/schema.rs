//! SQL for the connection setup and the flat sample logs.
//!
//! The demo database schema itself is not compiled in; it is read from the
//! storage root on every seeding pass (see [`crate::layout`]).

/// Applied to every demo-database connection before anything else.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Lux log. No migrations, no retention.
pub const LUX_TABLE: &str = "
CREATE TABLE IF NOT EXISTS lux_table (
    lux             REAL,
    battery_voltage REAL,
    kerberos        TEXT,
    ts              INTEGER   -- epoch milliseconds
);
";

/// Relative-humidity / temperature log. No migrations, no retention.
pub const RHT_TABLE: &str = "
CREATE TABLE IF NOT EXISTS rht_table (
    rh         REAL,
    t          REAL,
    heat_index REAL,
    ts         INTEGER   -- epoch milliseconds
);
";
