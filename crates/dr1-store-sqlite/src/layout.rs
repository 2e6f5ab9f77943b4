//! On-disk layout of a storage root.
//!
//! ```text
//! <root>/database/dr1_schema.sql   schema definition (input)
//! <root>/database/dr1_demo.db      seeded demo database (output)
//! <root>/lux_log.db                lux sample log
//! <root>/rht_log.db                rht sample log
//! ```

use std::{
  fs,
  path::{Path, PathBuf},
};

use crate::{Error, Result};

const DATABASE_DIR: &str = "database";
const DATABASE_FILE: &str = "dr1_demo.db";
const SCHEMA_FILE: &str = "dr1_schema.sql";
const LUX_LOG_FILE: &str = "lux_log.db";
const RHT_LOG_FILE: &str = "rht_log.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  root:    PathBuf,
  lux_log: PathBuf,
  rht_log: PathBuf,
}

impl Layout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    Self {
      lux_log: root.join(LUX_LOG_FILE),
      rht_log: root.join(RHT_LOG_FILE),
      root,
    }
  }

  /// Override where the lux and rht logs live.
  pub fn with_sample_logs(mut self, lux_log: PathBuf, rht_log: PathBuf) -> Self {
    self.lux_log = lux_log;
    self.rht_log = rht_log;
    self
  }

  pub fn root(&self) -> &Path { &self.root }

  pub fn database_dir(&self) -> PathBuf { self.root.join(DATABASE_DIR) }

  pub fn db_path(&self) -> PathBuf { self.database_dir().join(DATABASE_FILE) }

  pub fn schema_path(&self) -> PathBuf { self.database_dir().join(SCHEMA_FILE) }

  pub fn lux_log(&self) -> &Path { &self.lux_log }

  pub fn rht_log(&self) -> &Path { &self.rht_log }

  /// Create the database directory and read the schema definition.
  ///
  /// Fails with [`Error::SchemaNotFound`] before anything else is touched
  /// when the schema file is absent.
  pub fn prepare(&self) -> Result<String> {
    fs::create_dir_all(self.database_dir())?;
    read_schema(&self.schema_path())
  }
}

pub(crate) fn read_schema(path: &Path) -> Result<String> {
  if !path.exists() {
    return Err(Error::SchemaNotFound(path.to_path_buf()));
  }
  Ok(fs::read_to_string(path)?)
}
