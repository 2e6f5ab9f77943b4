//! Error type for `dr1-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] dr1_core::Error),

  /// The schema definition file is missing from the storage root.
  #[error("schema not found: {}", .0.display())]
  SchemaNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("areas table is empty; expected seeded areas")]
  NoAreas,

  #[error("invalid seed options: {0}")]
  InvalidSeedOptions(String),

  /// A query parameter whose time span does not fit in a timestamp.
  #[error("{0} is out of range")]
  OutOfRange(&'static str),
}

impl From<tokio_rusqlite::Error> for Error {
  /// Errors raised by our own code inside `Connection::call` travel boxed in
  /// `Other`; unwrap them so callers can match on the original variant.
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
        Ok(ours) => *ours,
        Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
      },
      other => Error::Database(other),
    }
  }
}

/// Box a crate error so it can leave a `Connection::call` closure.
pub(crate) fn into_call_error(err: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(err))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
