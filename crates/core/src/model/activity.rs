use serde::{Deserialize, Serialize};

use super::dates;

/// A named, date-ranged item placed on the timeline.
///
/// Field names follow the REST payload (`startDate`, `endDate`). Dates are
/// kept as the raw strings the store hands back; they are only interpreted
/// when an activity is laid out or filtered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub status: String,
}

impl Activity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            start_date: String::new(),
            end_date: end_date.into(),
            status: String::new(),
        }
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// End date as milliseconds since the Unix epoch, if it parses.
    pub fn end_timestamp(&self) -> Option<f64> {
        dates::parse_timestamp(&self.end_date)
    }
}
