//! Core types and trait definitions for the DR1 sensor demo.
//!
//! This crate is free of HTTP and database dependencies. The store, API and
//! server crates all depend on it.

pub mod area;
pub mod error;
pub mod heat;
pub mod reading;
pub mod store;
pub mod summary;
pub mod time;

pub use error::{Error, Result};
