//! Price behaviour around events.
//!
//! For each event inside the observed range this measures percentage moves
//! over symmetric horizons, cumulative returns on each side of the event
//! and a two-sample t-test comparing price levels before and after it.

use super::annotation::EventAnnotation;
use crate::core::ObservedSeries;
use crate::error::{AnalysisError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::warn;

/// Options for event impact analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Horizons in days for the before/after percentage change.
    pub horizons_days: Vec<u32>,
    /// Days on each side of the event used for returns and the t-test.
    pub window_days: u32,
    /// Variance assumption of the before/after t-test.
    pub t_test: TTestKind,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            horizons_days: vec![30, 90, 180],
            window_days: 180,
            t_test: TTestKind::Welch,
        }
    }
}

impl ImpactConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(AnalysisError::Configuration(
                "impact window_days must be positive".to_string(),
            ));
        }
        if self.horizons_days.iter().any(|&h| h == 0) {
            return Err(AnalysisError::Configuration(
                "impact horizons must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Percentage move between `days` before and `days` after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonChange {
    pub days: u32,
    /// `None` when either endpoint falls outside the series.
    pub pct_change: Option<f64>,
}

/// Two-sample t-test flavour.
///
/// `Welch` does not assume equal variances, which suits price windows
/// around a shock. `Pooled` is the classic Student's test
/// (`scipy.stats.ttest_ind` with its default `equal_var=True`) and
/// reproduces p-values reported by that tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestKind {
    #[default]
    Welch,
    Pooled,
}

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    pub kind: TTestKind,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

/// Measured impact of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventImpact {
    pub event: EventAnnotation,
    pub price_on_event: f64,
    pub changes: Vec<HorizonChange>,
    pub cumulative_return_before: Option<f64>,
    pub cumulative_return_after: Option<f64>,
    pub mean_before: Option<f64>,
    pub mean_after: Option<f64>,
    pub t_test: Option<TTest>,
}

/// Welch's t-test of `a` against `b`.
///
/// Returns `None` when either sample has fewer than two observations or
/// both samples have zero variance.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (mean_a, var_a) = mean_and_variance(a);
    let (mean_b, var_b) = mean_and_variance(b);
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);

    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let se = se_a + se_b;
    if se <= 0.0 {
        return None;
    }

    let t_statistic = (mean_a - mean_b) / se.sqrt();
    let degrees_of_freedom =
        se * se / (se_a * se_a / (n_a - 1.0) + se_b * se_b / (n_b - 1.0));
    finish(TTestKind::Welch, t_statistic, degrees_of_freedom)
}

/// Student's t-test of `a` against `b` with a pooled variance.
///
/// Same degenerate cases as [`welch_t_test`].
pub fn pooled_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (mean_a, var_a) = mean_and_variance(a);
    let (mean_b, var_b) = mean_and_variance(b);
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);

    let degrees_of_freedom = n_a + n_b - 2.0;
    let pooled = ((n_a - 1.0) * var_a + (n_b - 1.0) * var_b) / degrees_of_freedom;
    let se = pooled * (1.0 / n_a + 1.0 / n_b);
    if se <= 0.0 {
        return None;
    }
    finish(TTestKind::Pooled, (mean_a - mean_b) / se.sqrt(), degrees_of_freedom)
}

/// Run the test selected by `kind`.
pub fn two_sample_t_test(a: &[f64], b: &[f64], kind: TTestKind) -> Option<TTest> {
    match kind {
        TTestKind::Welch => welch_t_test(a, b),
        TTestKind::Pooled => pooled_t_test(a, b),
    }
}

/// Two-sided p-value from Student's t.
fn finish(kind: TTestKind, t_statistic: f64, degrees_of_freedom: f64) -> Option<TTest> {
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
    let p_value = (2.0 * (1.0 - dist.cdf(t_statistic.abs()))).clamp(0.0, 1.0);
    Some(TTest {
        kind,
        t_statistic,
        degrees_of_freedom,
        p_value,
    })
}

/// Sample mean and unbiased variance.
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

/// Cumulative simple return from first to last value.
fn cumulative_return(values: &[f64]) -> Option<f64> {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() >= 2 && first != 0.0 => Some(last / first - 1.0),
        _ => None,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Analyze one event.
///
/// Returns `None` when the event date falls outside the observed range.
pub fn event_impact(
    series: &ObservedSeries,
    event: &EventAnnotation,
    config: &ImpactConfig,
) -> Option<EventImpact> {
    let (first, last) = (series.first_date()?, series.last_date()?);
    let date = event.event_date;
    if date < first || date > last {
        return None;
    }
    let values = series.values();
    let price_on_event = values[series.index_on_or_before(date)?];

    // Endpoints use the last observation on or before each target date.
    let price_at = |offset: i64| {
        let target = date + Duration::days(offset);
        if target < first || target > last {
            return None;
        }
        series.index_on_or_before(target).map(|i| values[i])
    };

    let changes = config
        .horizons_days
        .iter()
        .map(|&days| {
            let before = price_at(-i64::from(days));
            let after = price_at(i64::from(days));
            let pct_change = match (before, after) {
                (Some(b), Some(a)) if b != 0.0 => Some((a - b) / b * 100.0),
                _ => None,
            };
            HorizonChange { days, pct_change }
        })
        .collect();

    let window = Duration::days(i64::from(config.window_days));
    let before = &values[series.range_between(date - window, date)];
    let after = &values[series.range_between(date, date + window)];

    Some(EventImpact {
        event: event.clone(),
        price_on_event,
        changes,
        cumulative_return_before: cumulative_return(before),
        cumulative_return_after: cumulative_return(after),
        mean_before: mean(before),
        mean_after: mean(after),
        t_test: two_sample_t_test(before, after, config.t_test),
    })
}

/// Analyze every event that falls inside the series.
///
/// Events outside the observed range are skipped with a warning.
pub fn analyze_impacts(
    series: &ObservedSeries,
    events: &[EventAnnotation],
    config: &ImpactConfig,
) -> Result<Vec<EventImpact>> {
    config.validate()?;
    if series.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    Ok(events
        .iter()
        .filter_map(|event| {
            let impact = event_impact(series, event, config);
            if impact.is_none() {
                warn!(event = %event.event_name, date = %event.event_date, "event outside observed range, skipped");
            }
            impact
        })
        .collect())
}
