//! End-to-end scenarios for change point detection, event correlation,
//! forecasting and hold-out evaluation.

use brent_analytics::changepoint::{ChangePointDetector, DetectionMethod, DetectorConfig};
use brent_analytics::core::{Cadence, ObservedSeries};
use brent_analytics::error::AnalysisError;
use brent_analytics::evaluation::EvaluationHarness;
use brent_analytics::events::{correlate, EventAnnotation, EventCatalog, EventCategory};
use brent_analytics::io::load_price_csv;
use brent_analytics::models::arima::ARIMA;
use brent_analytics::models::lstm::{LstmConfig, LSTM};
use brent_analytics::models::{BoxedForecaster, Forecaster};
use brent_analytics::pipeline::{ArimaConfig, FixedArimaConfig, Pipeline, PipelineConfig};
use chrono::{Duration, NaiveDate};
use std::io::Write;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn daily(values: Vec<f64>) -> ObservedSeries {
    ObservedSeries::from_values(start(), values, Cadence::Daily).unwrap()
}

/// 100 days: mean 50 until day 60, mean 70 afterwards, bounded noise.
fn mean_shift_series() -> ObservedSeries {
    let values = (0..100)
        .map(|i| {
            let level = if i < 60 { 50.0 } else { 70.0 };
            level + 0.5 * (i as f64 * 1.7).sin()
        })
        .collect();
    daily(values)
}

fn small_lstm() -> LstmConfig {
    LstmConfig {
        window_size: 5,
        epochs: 10,
        hidden_units: 4,
        ..LstmConfig::default()
    }
}

// =============================================================================
// Change point detection
// =============================================================================

#[test]
fn single_mean_shift_is_found() {
    let config = DetectorConfig::default()
        .min_segment_length(10)
        .penalty(100.0);
    let series = mean_shift_series();

    for method in [DetectionMethod::Pelt, DetectionMethod::BinarySegmentation] {
        let detector = ChangePointDetector::new(config.clone().method(method)).unwrap();
        let points = detector.detect(&series).unwrap();

        assert_eq!(points.len(), 1, "{method:?}");
        let cp = &points[0];
        assert!((59..=61).contains(&cp.index), "{method:?} found {}", cp.index);
        assert!((cp.segment_before_mean - 50.0).abs() < 1.0);
        assert!((cp.segment_after_mean - 70.0).abs() < 1.0);
        assert!(cp.confidence > 0.9 && cp.confidence <= 1.0);
        assert_eq!(cp.timestamp, series.date(cp.index).unwrap());
    }
}

#[test]
fn change_points_are_ordered_and_spaced() {
    let values: Vec<f64> = (0..300)
        .map(|i| match i {
            0..=79 => 40.0,
            80..=159 => 90.0,
            160..=229 => 60.0,
            _ => 100.0,
        })
        .collect();
    let detector =
        ChangePointDetector::new(DetectorConfig::default().min_segment_length(25).penalty(50.0))
            .unwrap();
    let points = detector.detect(&daily(values)).unwrap();

    let indices: Vec<usize> = points.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![80, 160, 230]);
    for w in points.windows(2) {
        assert!(w[1].index - w[0].index >= 25);
    }
}

#[test]
fn short_series_rules() {
    let detector = ChangePointDetector::new(
        DetectorConfig::default()
            .min_segment_length(10)
            .min_series_length(5),
    )
    .unwrap();

    // Shorter than two segments: nothing to split.
    assert!(detector.detect(&daily(vec![1.0; 15])).unwrap().is_empty());

    // Shorter than the configured minimum: rejected.
    assert_eq!(
        detector.detect(&daily(vec![1.0; 4])).unwrap_err(),
        AnalysisError::InsufficientData { needed: 5, got: 4 }
    );
}

// =============================================================================
// Event correlation
// =============================================================================

#[test]
fn detected_shift_matches_nearest_event() {
    let series = mean_shift_series();
    let detector =
        ChangePointDetector::new(DetectorConfig::default().min_segment_length(10).penalty(100.0))
            .unwrap();
    let points = detector.detect(&series).unwrap();

    let catalog = EventCatalog::new(vec![
        EventAnnotation::new("Early", start() + Duration::days(20), EventCategory::Economic),
        EventAnnotation::new("Embargo", start() + Duration::days(58), EventCategory::Political),
    ]);
    let correlated = correlate(&points, catalog.events(), 7);

    assert_eq!(correlated.len(), 1);
    let nearest = correlated[0].nearest_event.as_ref().unwrap();
    assert_eq!(nearest.event_name, "Embargo");
    let expected = (series.date(points[0].index).unwrap() - nearest.event_date).num_days();
    assert_eq!(correlated[0].days_offset, Some(expected));

    // Pure: same inputs, same output.
    assert_eq!(correlate(&points, catalog.events(), 7), correlated);
    // The event precedes the shift, so a zero-day window matches nothing.
    assert!(correlate(&points, catalog.events(), 0)
        .iter()
        .all(|c| c.nearest_event.is_none()));
}

#[test]
fn equidistant_events_prefer_earlier_date() {
    let values: Vec<f64> = (0..60).map(|i| if i < 30 { 10.0 } else { 20.0 }).collect();
    let points = ChangePointDetector::new(DetectorConfig::default().min_segment_length(5))
        .unwrap()
        .detect(&daily(values))
        .unwrap();
    assert_eq!(points[0].index, 30);

    let events = vec![
        EventAnnotation::new("After", start() + Duration::days(33), EventCategory::Other),
        EventAnnotation::new("Before", start() + Duration::days(27), EventCategory::Other),
    ];
    let correlated = correlate(&points, &events, 10);
    assert_eq!(
        correlated[0].nearest_event.as_ref().unwrap().event_name,
        "Before"
    );
    assert_eq!(correlated[0].days_offset, Some(3));
}

// =============================================================================
// Forecasting and evaluation
// =============================================================================

#[test]
fn constant_series_is_forecast_exactly() {
    let series = daily(vec![42.0; 80]);
    let mut models: Vec<BoxedForecaster> =
        vec![Box::new(ARIMA::default()), Box::new(LSTM::new(small_lstm()))];

    let results = EvaluationHarness::new(10).evaluate(&series, &mut models).unwrap();

    assert_eq!(results.len(), 2);
    for result in results {
        let report = result.outcome.unwrap();
        assert!(report.mae < 1e-6, "{}: mae {}", report.model_name, report.mae);
        assert!(report.rmse < 1e-6);
        assert!(report.mape.unwrap() < 1e-6);
    }
}

#[test]
fn mape_is_undefined_when_a_test_value_is_zero() {
    let mut values: Vec<f64> = (0..50).map(|i| 5.0 + (i % 3) as f64).collect();
    values[47] = 0.0;
    let mut models: Vec<BoxedForecaster> = vec![Box::new(ARIMA::new(1, 0, 0))];

    let results = EvaluationHarness::new(5)
        .evaluate(&daily(values), &mut models)
        .unwrap();
    let report = results[0].outcome.as_ref().unwrap();
    assert!(report.mape.is_none());
    assert!(report.mae.is_finite());
}

#[test]
fn test_window_never_influences_the_forecast() {
    let train: Vec<f64> = (0..60).map(|i| 60.0 + (i as f64 * 0.4).sin() * 3.0).collect();
    let mut calm = train.clone();
    calm.extend(vec![61.0; 10]);
    let mut wild = train;
    wild.extend(vec![1.0e6; 10]);

    let harness = EvaluationHarness::new(10);
    let forecast_for = |values: Vec<f64>| {
        let mut models: Vec<BoxedForecaster> =
            vec![Box::new(ARIMA::new(1, 0, 0)), Box::new(LSTM::new(small_lstm()))];
        harness
            .evaluate(&daily(values), &mut models)
            .unwrap()
            .into_iter()
            .map(|r| r.outcome.unwrap().forecast.predictions)
            .collect::<Vec<_>>()
    };

    assert_eq!(forecast_for(calm), forecast_for(wild));
}

#[test]
fn differencing_fits_a_trend_better() {
    let values: Vec<f64> = (0..120)
        .map(|i| 30.0 + 0.8 * i as f64 + 0.05 * (i as f64 * 2.1).sin())
        .collect();
    let series = daily(values);

    let mut integrated = ARIMA::new(1, 1, 0);
    integrated.fit(&series).unwrap();
    let mut levels = ARIMA::new(1, 0, 0);
    levels.fit(&series).unwrap();

    let var_d1 = integrated.residual_variance().unwrap();
    let var_d0 = levels.residual_variance().unwrap();
    assert!(var_d1 < var_d0, "d=1 {var_d1} vs d=0 {var_d0}");

    // The integrated model keeps climbing.
    let forecast = integrated.predict(5).unwrap();
    for w in forecast.predictions.windows(2) {
        assert!(w[1] > w[0]);
    }
}

// =============================================================================
// Whole pipeline
// =============================================================================

#[test]
fn pipeline_from_csv_to_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Date,Price").unwrap();
    for (i, v) in mean_shift_series().values().iter().enumerate() {
        let date = start() + Duration::days(i as i64);
        writeln!(file, "{},{v:.4}", date.format("%d-%b-%y")).unwrap();
    }

    let mut config = PipelineConfig::default();
    config.cadence = Cadence::Daily;
    config.bic_penalty = false;
    config.detector = config.detector.min_segment_length(10).penalty(100.0);
    config.arima = ArimaConfig::Fixed(FixedArimaConfig {
        p: 1,
        d: 1,
        q: 0,
        require_stationary_input: false,
    });
    config.lstm = small_lstm();
    config.events.impact.horizons_days = vec![10];
    config.events.impact.window_days = 20;
    config.evaluation.test_horizon = 10;
    config.evaluation.forecast_horizon = 5;

    let pipeline = Pipeline::new(config).unwrap();
    let series = load_price_csv(file.path(), pipeline.config().cadence).unwrap();
    assert_eq!(series.len(), 100);

    let catalog = EventCatalog::new(vec![EventAnnotation::new(
        "Embargo",
        start() + Duration::days(60),
        EventCategory::Political,
    )]);
    let result = pipeline.run_with_catalog(&series, &catalog).unwrap();

    assert_eq!(result.change_points.len(), 1);
    assert!(result.change_points[0].is_matched());
    assert_eq!(result.forecasts.len(), 2);
    assert!(result.best_model().is_some());

    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(json["change_points"][0]["nearest_event"]["event_name"], "Embargo");
    assert_eq!(json["forecasts"]["ARIMA"]["predictions"].as_array().unwrap().len(), 5);
}
