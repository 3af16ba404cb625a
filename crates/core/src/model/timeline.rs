use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::activity::Activity;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A named snapshot of activities with its own date range metadata.
///
/// This is the shape the timelines endpoint accepts and returns; unknown
/// fields such as `createdAt` are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            start_date: String::new(),
            end_date: String::new(),
            activities: Vec::new(),
        }
    }

    pub fn from_json(data: &[u8]) -> Result<Self, LoadError> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a timeline file. Accepts a single timeline object, or a listing
    /// (as returned by `GET /api/timelines`) in which case the first entry is used.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut timelines = parse_timelines(&data)?;
        if timelines.is_empty() {
            return Ok(Self::new(
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ));
        }
        Ok(timelines.swap_remove(0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Timeline>),
    One(Box<Timeline>),
}

/// Parse either one timeline object or an array of them.
pub fn parse_timelines(data: &[u8]) -> Result<Vec<Timeline>, LoadError> {
    Ok(match serde_json::from_slice(data)? {
        OneOrMany::Many(timelines) => timelines,
        OneOrMany::One(timeline) => vec![*timeline],
    })
}
