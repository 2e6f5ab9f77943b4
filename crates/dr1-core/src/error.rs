//! Error types for `dr1-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
