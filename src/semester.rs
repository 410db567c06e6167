use crate::calendar::{SemesterWindow, WeekdayMask};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Date-keyed text entries: break labels, reminders, final exam times.
pub type DateMap = BTreeMap<NaiveDate, String>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SemesterError {
    #[error("semester first day {first} must be on or before last day {last}")]
    StartAfterEnd { first: NaiveDate, last: NaiveDate },
}

/// Everything known about one term of a course offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterInfo {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub days: WeekdayMask,
    #[serde(default)]
    pub breaks: DateMap,
    /// Values may hold several reminders separated by commas.
    #[serde(default)]
    pub reminders: DateMap,
    #[serde(default)]
    pub final_exam: DateMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_times: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Keys the compiler does not interpret, kept for template contexts.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SemesterInfo {
    pub fn new(first_day: NaiveDate, last_day: NaiveDate, days: WeekdayMask) -> Self {
        Self {
            first_day,
            last_day,
            days,
            breaks: DateMap::new(),
            reminders: DateMap::new(),
            final_exam: DateMap::new(),
            meeting_times: None,
            room: None,
            extra: Map::new(),
        }
    }

    pub fn window(&self) -> SemesterWindow {
        SemesterWindow::new(self.first_day, self.last_day, self.days)
    }

    pub fn class_dates(&self) -> Vec<NaiveDate> {
        self.window().class_dates()
    }

    /// Rejects an inverted window. Anything else that looks off (an empty
    /// weekday mask, dated entries outside the window) is only logged.
    pub fn validate(&self) -> Result<(), SemesterError> {
        if self.first_day > self.last_day {
            return Err(SemesterError::StartAfterEnd {
                first: self.first_day,
                last: self.last_day,
            });
        }
        if self.days.is_empty() {
            warn!("weekday mask has no recognized letters; the calendar will be empty");
        }
        let window = self.window();
        for (kind, entries) in [("break", &self.breaks), ("reminder", &self.reminders)] {
            for date in entries.keys().filter(|date| !window.contains(**date)) {
                warn!(%date, kind, "dated entry falls outside the semester window");
            }
        }
        Ok(())
    }
}
