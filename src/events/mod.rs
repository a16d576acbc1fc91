//! Historical events and their relation to detected change points.
//!
//! - [`correlate`] pairs change points with the nearest event by date
//! - [`EventCatalog`] holds reference events (built-in or from TOML)
//! - [`analyze_impacts`] measures price behaviour around each event

pub mod annotation;
pub mod catalog;
pub mod correlate;
pub mod impact;

pub use annotation::{EventAnnotation, EventCategory};
pub use catalog::EventCatalog;
pub use correlate::{correlate, CorrelatedChangePoint};
pub use impact::{
    analyze_impacts, event_impact, pooled_t_test, two_sample_t_test, welch_t_test, EventImpact,
    HorizonChange, ImpactConfig, TTest, TTestKind,
};
