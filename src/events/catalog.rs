//! Static catalogs of historical events.

use super::annotation::{EventAnnotation, EventCategory};
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A read-only, date-sorted set of event annotations.
///
/// TOML layout:
///
/// ```toml
/// [[events]]
/// event_name = "COVID-19 declared a pandemic"
/// event_date = "2020-03-11"
/// category = "economic"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    events: Vec<EventAnnotation>,
}

impl EventCatalog {
    /// Build a catalog; events are sorted by date, then name.
    pub fn new(mut events: Vec<EventAnnotation>) -> Self {
        events.sort_by(|a, b| {
            a.event_date
                .cmp(&b.event_date)
                .then_with(|| a.event_name.cmp(&b.event_name))
        });
        Self { events }
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let parsed: EventCatalog = toml::from_str(text)?;
        Ok(Self::new(parsed.events))
    }

    /// Load a catalog from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn events(&self) -> &[EventAnnotation] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one category.
    pub fn by_category(&self, category: EventCategory) -> impl Iterator<Item = &EventAnnotation> {
        self.events.iter().filter(move |e| e.category == category)
    }

    /// Major market-moving events since 1990.
    pub fn brent_key_events() -> Self {
        use EventCategory::*;
        let event = |name: &str, y: i32, m: u32, d: u32, category: EventCategory| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| EventAnnotation::new(name, date, category))
        };
        let events = [
            event("Iraq invades Kuwait", 1990, 8, 2, Political),
            event("Operation Desert Storm begins", 1991, 1, 17, Political),
            event("Asian financial crisis", 1997, 7, 2, Economic),
            event("OPEC production increase in Jakarta", 1997, 11, 29, OpecDecision),
            event("September 11 attacks", 2001, 9, 11, Political),
            event("Invasion of Iraq", 2003, 3, 20, Political),
            event("Lehman Brothers bankruptcy", 2008, 9, 15, Economic),
            event("OPEC record production cut", 2008, 12, 17, OpecDecision),
            event("Arab Spring unrest in Libya", 2011, 2, 17, Political),
            event("OPEC declines to cut output", 2014, 11, 27, OpecDecision),
            event("OPEC+ production agreement", 2016, 11, 30, OpecDecision),
            event("US sanctions on Iranian oil", 2018, 11, 5, Political),
            event("COVID-19 declared a pandemic", 2020, 3, 11, Economic),
            event("OPEC+ record output cut", 2020, 4, 12, OpecDecision),
            event("Russia invades Ukraine", 2022, 2, 24, Political),
        ];
        Self::new(events.into_iter().flatten().collect())
    }
}
