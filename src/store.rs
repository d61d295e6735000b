//! JSON file persistence for a saved projection
//!
//! The whole `LotteryData` record is written as one document. Dates are ISO
//! 8601 and floats round-trip exactly, so a load after a save reproduces the
//! record bit for bit.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::StoreError;
use crate::projection::LotteryData;

/// Default data file name used by the CLI
pub const DEFAULT_DATA_FILE: &str = "lottery.json";

/// Load a saved projection
pub fn load<P: AsRef<Path>>(path: P) -> Result<LotteryData, StoreError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let data = serde_json::from_str(&contents)?;
    debug!("loaded projection from {}", path.display());
    Ok(data)
}

/// Save a projection, replacing any existing file
pub fn save<P: AsRef<Path>>(path: P, data: &LotteryData) -> Result<(), StoreError> {
    let path = path.as_ref();
    let contents = serde_json::to_string_pretty(data)?;
    fs::write(path, contents)?;
    debug!("saved projection to {}", path.display());
    Ok(())
}

/// Remove a saved projection; a missing file is not an error
pub fn clear<P: AsRef<Path>>(path: P) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
