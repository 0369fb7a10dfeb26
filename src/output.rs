//! Per-run output directory and JSON persistence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use log::info;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{Result, ScrapeError};

pub static REFERENCES_FILE: &str = "product_references.json";

/// Malaysia time, UTC+8 all year round.
static MYT: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset"));

/// Compact `DDMMYYYY_HHMM` stamp of `now` in Malaysia time.
pub fn run_stamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&*MYT).format("%d%m%Y_%H%M").to_string()
}

/// File name for one product. Path separators in the reference are replaced.
pub fn product_file_name(reference: &str) -> String {
    let safe: String = reference
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("product_{safe}.json")
}

#[derive(Debug, Clone)]
pub struct RunDirectory {
    path: PathBuf,
}

impl RunDirectory {
    /// Create `<root>/<stamp>` (and any missing parents).
    pub fn create(root: impl AsRef<Path>, now: DateTime<Utc>) -> Result<Self> {
        let path = root.as_ref().join(run_stamp(now));
        fs::create_dir_all(&path).map_err(|source| ScrapeError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Output directory: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pretty-print `value` into `<run dir>/<file_name>` and return the written path.
    pub fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.path.join(file_name);
        let body = serde_json::to_string_pretty(value).map_err(|source| ScrapeError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, body).map_err(|source| ScrapeError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Data saved in: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamp_is_rendered_in_malaysia_time() {
        // 16:05 UTC is 00:05 the next day in Kuala Lumpur.
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 16, 5, 42).unwrap();
        assert_eq!(run_stamp(now), "10032025_0005");
    }

    #[test]
    fn stamp_offset_is_utc_plus_eight() {
        assert_eq!(MYT.local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn stamp_has_no_path_separators() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 1, 2, 3).unwrap();
        let stamp = run_stamp(now);
        assert_eq!(stamp, "31122024_0902");
        assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn create_makes_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("product").join("nested");
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let dir = RunDirectory::create(&root, now).unwrap();

        assert!(dir.path().is_dir());
        assert_eq!(dir.path(), root.join("01012025_0800"));
    }

    #[test]
    fn create_surfaces_filesystem_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = RunDirectory::create(&blocker, Utc::now()).unwrap_err();
        assert!(matches!(err, ScrapeError::Io { .. }));
    }

    #[test]
    fn write_json_uses_two_space_indent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = RunDirectory::create(tmp.path(), Utc::now()).unwrap();

        let path = dir.write_json(REFERENCES_FILE, &["A1259", "B200"]).unwrap();

        let body = fs::read_to_string(path).unwrap();
        assert_eq!(body, "[\n  \"A1259\",\n  \"B200\"\n]");
    }

    #[test]
    fn product_file_names_stay_inside_the_run_directory() {
        assert_eq!(product_file_name("A1259"), "product_A1259.json");
        assert_eq!(product_file_name("../x/y"), "product_.._x_y.json");
    }
}
