//! Backup file naming

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Timestamp layout of backup file names
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Path of the backup written by a pass started at `time`.
///
/// Backups sit in the project root as `<YYYYMMDD-HHMMSS>.<extension>.bak`.
pub fn backup_path(root: &Path, extension: &str, time: DateTime<Local>) -> PathBuf {
    root.join(format!("{}.{}.bak", time.format(STAMP_FORMAT), extension))
}
