//! ObservedSeries: the immutable, gap-free price series every stage reads.

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Expected spacing between consecutive observations.
///
/// A series is "gap-free" relative to its cadence: a `Daily` series has
/// every calendar day, a `Weekdays` series has every Monday-Friday, and an
/// `Irregular` series never skips more than `max_gap_days` calendar days
/// (trading-day data with exchange holidays).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Cadence {
    #[default]
    Daily,
    Weekdays,
    Irregular { max_gap_days: i64 },
}

impl Cadence {
    /// The date that must follow `date` under this cadence, if fixed.
    fn successor(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Cadence::Daily | Cadence::Irregular { .. } => date + Duration::days(1),
            Cadence::Weekdays => next_weekday(date),
        }
    }

    fn check_step(&self, prev: NaiveDate, next: NaiveDate) -> Result<()> {
        let ok = match *self {
            Cadence::Daily => next - prev == Duration::days(1),
            Cadence::Weekdays => next == next_weekday(prev),
            Cadence::Irregular { max_gap_days } => (next - prev).num_days() <= max_gap_days,
        };
        if ok {
            Ok(())
        } else {
            Err(AnalysisError::MissingDates {
                after: prev,
                before: next,
            })
        }
    }
}

fn next_weekday(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

/// A cleaned, strictly increasing, gap-free univariate price series.
///
/// Built once and never mutated; every stage borrows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    cadence: Cadence,
}

impl ObservedSeries {
    /// Create a daily series.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        Self::with_cadence(dates, values, Cadence::Daily)
    }

    /// Create a series, validating it against the given cadence.
    ///
    /// Fails fast on length mismatch, NaN/inf values, out-of-order or
    /// duplicate dates, and gaps the cadence does not allow.
    pub fn with_cadence(dates: Vec<NaiveDate>, values: Vec<f64>, cadence: Cadence) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        if let Cadence::Irregular { max_gap_days } = cadence {
            if max_gap_days < 1 {
                return Err(AnalysisError::Configuration(
                    "max_gap_days must be at least 1".to_string(),
                ));
            }
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::MissingValues);
        }
        if cadence == Cadence::Weekdays {
            if let Some(d) = dates
                .iter()
                .find(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            {
                return Err(AnalysisError::Timestamp(format!(
                    "{d} falls on a weekend in a weekday series"
                )));
            }
        }
        for w in dates.windows(2) {
            if w[1] <= w[0] {
                return Err(AnalysisError::Timestamp(format!(
                    "dates must be strictly increasing ({} then {})",
                    w[0], w[1]
                )));
            }
            cadence.check_step(w[0], w[1])?;
        }

        Ok(Self {
            dates,
            values,
            cadence,
        })
    }

    /// Build a series from consecutive values starting at `start`,
    /// generating dates according to the cadence.
    pub fn from_values(start: NaiveDate, values: Vec<f64>, cadence: Cadence) -> Result<Self> {
        let mut dates = Vec::with_capacity(values.len());
        let mut current = match cadence {
            Cadence::Weekdays if matches!(start.weekday(), Weekday::Sat | Weekday::Sun) => {
                next_weekday(start)
            }
            _ => start,
        };
        for _ in 0..values.len() {
            dates.push(current);
            current = cadence.successor(current);
        }
        Self::with_cadence(dates, values, cadence)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Date of the observation at `index`.
    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Index of an exact date.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Index of the last observation dated on or before `date`.
    pub fn index_on_or_before(&self, date: NaiveDate) -> Option<usize> {
        match self.dates.binary_search(&date) {
            Ok(i) => Some(i),
            Err(0) => None,
            Err(i) => Some(i - 1),
        }
    }

    /// Observations with `start <= date <= end`, as an index range.
    pub fn range_between(&self, start: NaiveDate, end: NaiveDate) -> std::ops::Range<usize> {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end);
        lo..hi.max(lo)
    }

    /// Mean of all values.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Copy of the observations in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<ObservedSeries> {
        if start > end {
            return Err(AnalysisError::Configuration(
                "slice start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(AnalysisError::InsufficientData {
                needed: end,
                got: self.len(),
            });
        }
        Ok(ObservedSeries {
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            cadence: self.cadence,
        })
    }

    /// Split off the trailing `holdout` observations.
    ///
    /// Returns `(train, test)`; every training date is strictly before every
    /// test date.
    pub fn split_holdout(&self, holdout: usize) -> Result<(ObservedSeries, ObservedSeries)> {
        if holdout == 0 {
            return Err(AnalysisError::Configuration(
                "holdout length must be positive".to_string(),
            ));
        }
        if holdout >= self.len() {
            return Err(AnalysisError::InsufficientData {
                needed: holdout + 1,
                got: self.len(),
            });
        }
        let boundary = self.len() - holdout;
        Ok((self.slice(0, boundary)?, self.slice(boundary, self.len())?))
    }

    /// The `horizon` dates that follow the last observation.
    ///
    /// Irregular series step one calendar day at a time.
    pub fn future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        let Some(mut current) = self.last_date() else {
            return Vec::new();
        };
        (0..horizon)
            .map(|_| {
                current = self.cadence.successor(current);
                current
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_series_builds() {
        let series = ObservedSeries::from_values(date(2020, 1, 1), vec![1.0, 2.0, 3.0], Cadence::Daily)
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_date(), Some(date(2020, 1, 3)));
        assert_relative_eq!(series.mean(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_non_monotonic_dates() {
        let dates = vec![date(2020, 1, 2), date(2020, 1, 1)];
        let err = ObservedSeries::new(dates, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::Timestamp(_)));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let dates = vec![date(2020, 1, 1), date(2020, 1, 1)];
        let err = ObservedSeries::new(dates, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::Timestamp(_)));
    }

    #[test]
    fn rejects_missing_dates_in_daily_series() {
        let dates = vec![date(2020, 1, 1), date(2020, 1, 2), date(2020, 1, 5)];
        let err = ObservedSeries::new(dates, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingDates {
                after: date(2020, 1, 2),
                before: date(2020, 1, 5)
            }
        );
    }

    #[test]
    fn rejects_nan_values() {
        let dates = vec![date(2020, 1, 1), date(2020, 1, 2)];
        let err = ObservedSeries::new(dates, vec![1.0, f64::NAN]).unwrap_err();
        assert_eq!(err, AnalysisError::MissingValues);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = ObservedSeries::new(vec![date(2020, 1, 1)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::DimensionMismatch { .. }));
    }

    #[test]
    fn weekday_cadence_skips_weekends() {
        // 2020-01-03 is a Friday
        let series =
            ObservedSeries::from_values(date(2020, 1, 3), vec![1.0, 2.0, 3.0], Cadence::Weekdays)
                .unwrap();
        assert_eq!(series.dates()[1], date(2020, 1, 6));
        assert_eq!(series.future_dates(1), vec![date(2020, 1, 8)]);
    }

    #[test]
    fn weekday_cadence_rejects_weekend_dates() {
        let dates = vec![date(2020, 1, 3), date(2020, 1, 4)];
        let err = ObservedSeries::with_cadence(dates, vec![1.0, 2.0], Cadence::Weekdays).unwrap_err();
        assert!(matches!(err, AnalysisError::Timestamp(_)));
    }

    #[test]
    fn irregular_cadence_allows_holiday_gaps() {
        let dates = vec![date(2020, 12, 24), date(2020, 12, 28), date(2020, 12, 29)];
        let cadence = Cadence::Irregular { max_gap_days: 4 };
        assert!(ObservedSeries::with_cadence(dates.clone(), vec![1.0, 2.0, 3.0], cadence).is_ok());

        let tight = Cadence::Irregular { max_gap_days: 3 };
        assert!(ObservedSeries::with_cadence(dates, vec![1.0, 2.0, 3.0], tight).is_err());
    }

    #[test]
    fn split_holdout_keeps_order() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let series = ObservedSeries::from_values(date(2021, 6, 1), values, Cadence::Daily).unwrap();
        let (train, test) = series.split_holdout(3).unwrap();
        assert_eq!(train.len(), 7);
        assert_eq!(test.values(), &[7.0, 8.0, 9.0]);
        assert!(train.last_date().unwrap() < test.first_date().unwrap());
    }

    #[test]
    fn split_holdout_validates_length() {
        let series =
            ObservedSeries::from_values(date(2021, 6, 1), vec![1.0, 2.0], Cadence::Daily).unwrap();
        assert!(matches!(
            series.split_holdout(2),
            Err(AnalysisError::InsufficientData { .. })
        ));
        assert!(matches!(
            series.split_holdout(0),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn date_lookups() {
        let series = ObservedSeries::from_values(
            date(2021, 1, 4),
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            Cadence::Weekdays,
        )
        .unwrap();
        assert_eq!(series.index_of(date(2021, 1, 6)), Some(2));
        assert_eq!(series.index_of(date(2021, 1, 9)), None);
        // Saturday resolves to the preceding Friday
        assert_eq!(series.index_on_or_before(date(2021, 1, 9)), Some(4));
        assert_eq!(series.index_on_or_before(date(2020, 12, 31)), None);
        assert_eq!(series.range_between(date(2021, 1, 5), date(2021, 1, 7)), 1..4);
    }
}
