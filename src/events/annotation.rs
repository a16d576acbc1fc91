//! Event annotation types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Political,
    Economic,
    OpecDecision,
    Other,
}

/// A dated historical event that may explain a structural break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAnnotation {
    pub event_name: String,
    pub event_date: NaiveDate,
    pub category: EventCategory,
}

impl EventAnnotation {
    pub fn new(event_name: impl Into<String>, event_date: NaiveDate, category: EventCategory) -> Self {
        Self {
            event_name: event_name.into(),
            event_date,
            category,
        }
    }
}
