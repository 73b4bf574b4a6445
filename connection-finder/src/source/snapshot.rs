//! Schedule snapshot files.
//!
//! A snapshot is every table of the schedule serialised as one JSON
//! document. Converting a published dataset into this form happens outside
//! this crate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::SnapshotError;
use crate::domain::{Agency, Calendar, CalendarException, Route, Stop, StopTime, Transfer, Trip};

/// All tables of a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSnapshot {
    pub stops: Vec<Stop>,
    pub transfers: Vec<Transfer>,
    pub routes: Vec<Route>,
    pub agencies: Vec<Agency>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendars: Vec<Calendar>,
    pub calendar_exceptions: Vec<CalendarException>,
}

impl ScheduleSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the snapshot as JSON.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let io_err = |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }
}
