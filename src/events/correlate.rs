//! Timestamp correlation between change points and events.

use super::annotation::EventAnnotation;
use crate::changepoint::ChangePoint;
use serde::Serialize;

/// A change point paired with the nearest event inside the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedChangePoint {
    pub change_point: ChangePoint,
    pub nearest_event: Option<EventAnnotation>,
    /// Change-point date minus event date, in days.
    pub days_offset: Option<i64>,
}

impl CorrelatedChangePoint {
    pub fn is_matched(&self) -> bool {
        self.nearest_event.is_some()
    }
}

/// Pair each change point with its nearest event.
///
/// An event matches when its absolute distance to the change-point date is
/// at most `window_days`. Among equidistant events the earlier date wins,
/// then the earlier position in `events`. The output has one entry per
/// input point, in input order.
pub fn correlate(
    points: &[ChangePoint],
    events: &[EventAnnotation],
    window_days: u32,
) -> Vec<CorrelatedChangePoint> {
    let window = i64::from(window_days);
    points
        .iter()
        .map(|cp| {
            let nearest = events
                .iter()
                .map(|event| (event, (cp.timestamp - event.event_date).num_days()))
                .filter(|(_, offset)| offset.abs() <= window)
                .fold(None, |best: Option<(&EventAnnotation, i64)>, (event, offset)| match best {
                    Some((b, b_off))
                        if (b_off.abs(), b.event_date) <= (offset.abs(), event.event_date) =>
                    {
                        Some((b, b_off))
                    }
                    _ => Some((event, offset)),
                });

            CorrelatedChangePoint {
                change_point: cp.clone(),
                nearest_event: nearest.map(|(event, _)| event.clone()),
                days_offset: nearest.map(|(_, offset)| offset),
            }
        })
        .collect()
}
