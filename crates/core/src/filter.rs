//! Narrowing an activity snapshot before layout.
//!
//! Calendar ranges are evaluated against a `today` supplied by the caller,
//! so filtering stays deterministic and independent of the system clock.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::model::{Activity, dates};

/// Calendar window an activity's end date must fall in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// Sunday through Saturday of the current week.
    Week,
    Month,
    /// The calendar quarter containing `today`.
    Quarter,
}

impl DateRange {
    pub fn contains(self, date: Date, today: Date) -> bool {
        match self {
            Self::All => true,
            Self::Today => date == today,
            Self::Week => {
                let offset = Duration::days(i64::from(today.weekday().number_days_from_sunday()));
                let Some(start) = today.checked_sub(offset) else {
                    return false;
                };
                let end = start.checked_add(Duration::days(6)).unwrap_or(Date::MAX);
                start <= date && date <= end
            }
            Self::Month => date.year() == today.year() && date.month() == today.month(),
            Self::Quarter => date.year() == today.year() && quarter(date) == quarter(today),
        }
    }
}

fn quarter(date: Date) -> u8 {
    (u8::from(date.month()) - 1) / 3
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityFilter {
    /// Exact status to keep; `None` keeps every status.
    pub status: Option<String>,
    pub date_range: DateRange,
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
}

impl ActivityFilter {
    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.date_range != DateRange::All || self.search_term().is_some()
    }

    pub fn matches(&self, activity: &Activity, today: Date) -> bool {
        if let Some(status) = &self.status
            && activity.status != *status
        {
            return false;
        }

        if self.date_range != DateRange::All {
            let Some(end) = dates::parse_date(&activity.end_date) else {
                return false;
            };
            if !self.date_range.contains(end, today) {
                return false;
            }
        }

        match self.search_term() {
            Some(term) => {
                activity.name.to_lowercase().contains(&term)
                    || activity.description.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    /// Keep matching activities, preserving input order.
    pub fn apply(&self, activities: &[Activity], today: Date) -> Vec<Activity> {
        activities
            .iter()
            .filter(|a| self.matches(a, today))
            .cloned()
            .collect()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}
