//! SQLite backend for the DR1 sensor demo.
//!
//! Holds the demo data generator ([`seed`]), the aggregate queries behind
//! [`SqliteStore`], and the flat lux/rht sample logs. Async access goes
//! through [`tokio_rusqlite`] so queries run on a dedicated thread without
//! blocking the runtime.

mod encode;
mod samples;
mod schema;
mod store;

pub mod error;
pub mod layout;
pub mod seed;

pub use error::{Error, Result};
pub use layout::Layout;
pub use seed::{SeedOptions, ensure_seeded, seed_connection};
pub use store::SqliteStore;
