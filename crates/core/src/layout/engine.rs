use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::config::{LayoutConfig, LayoutMode};
use crate::model::Activity;

/// Why an activity was left out of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("activity `{id}` has an unparseable end date {value:?}")]
    InvalidEndDate { id: String, value: String },
    #[error("activity `{id}` has an empty name")]
    EmptyName { id: String },
}

impl ValidationError {
    pub fn activity_id(&self) -> &str {
        match self {
            Self::InvalidEndDate { id, .. } | Self::EmptyName { id } => id,
        }
    }
}

/// Placement row, assigned by chronological rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Above,
    Below,
}

impl Lane {
    pub fn for_rank(rank: usize) -> Self {
        if rank % 2 == 0 { Self::Above } else { Self::Below }
    }
}

/// Where one activity lands, in the layout's local coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPosition {
    pub activity_id: String,
    /// Index of the activity in the slice passed to the engine.
    pub source_index: usize,
    /// Center of the activity's box, measured from the left content edge.
    pub x: f64,
    pub lane: Lane,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// One entry per laid-out activity, ascending by end date.
    pub positions: Vec<LayoutPosition>,
    pub content_width: f64,
    pub line_start: f64,
    pub line_end: f64,
    /// Content is wider than the available width; the presentation layer
    /// must scroll instead of compressing.
    pub overflow: bool,
    /// Factor applied to the natural positions (1.0 when overflowing).
    pub scale: f64,
    /// Width the content needs before any scaling.
    pub natural_width: f64,
    pub mode: LayoutMode,
    /// Activities excluded from this pass, in input order.
    pub skipped: Vec<ValidationError>,
}

impl LayoutResult {
    fn empty(mode: LayoutMode, skipped: Vec<ValidationError>) -> Self {
        Self {
            positions: Vec::new(),
            content_width: 0.0,
            line_start: 0.0,
            line_end: 0.0,
            overflow: false,
            scale: 1.0,
            natural_width: 0.0,
            mode,
            skipped,
        }
    }

    /// Nothing to draw; the presentation layer shows its empty state.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn skipped_ids(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(ValidationError::activity_id)
    }
}

/// Unscaled positions for a sorted run of timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalLayout {
    /// Box centers, first box's left edge at 0.
    pub positions: Vec<f64>,
    /// Distance from the first box's left edge to the last box's right edge.
    pub width: f64,
}

/// Proportional placement followed by the monotonic minimum-gap clamp.
///
/// `timestamps` must already be sorted ascending. This is the positioning
/// core shared by every consumer that needs timeline x coordinates (the
/// interactive view and static exports alike); units only need to agree
/// with `config`.
pub fn natural_positions(timestamps: &[f64], config: &LayoutConfig) -> NaturalLayout {
    let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
        return NaturalLayout {
            positions: Vec::new(),
            width: 0.0,
        };
    };

    let min_gap = config.min_gap();
    let range = (last - first).max(1.0);
    let base_width = (min_gap * timestamps.len() as f64).max(config.floor_width);

    let mut adjusted: Vec<f64> = Vec::with_capacity(timestamps.len());
    for &ts in timestamps {
        let raw = (ts - first) / range * base_width;
        let pos = match adjusted.last() {
            Some(&prev) => raw.max(prev + min_gap),
            None => raw,
        };
        adjusted.push(pos);
    }

    let half_box = config.box_width / 2.0;
    let shift = adjusted[0] - half_box;
    let width = (adjusted[adjusted.len() - 1] - shift) + half_box;
    for pos in &mut adjusted {
        *pos -= shift;
    }

    NaturalLayout {
        positions: adjusted,
        width,
    }
}

/// Lays out activities against a fixed set of pixel constants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute the layout for one snapshot of activities.
    ///
    /// Activities are ordered by end date (stable for ties), placed
    /// proportionally, pushed apart to at least `min_gap`, then either
    /// stretched to fill `available_width` or left at natural size with
    /// `overflow` set. The input slice is never reordered or modified.
    ///
    /// `available_width` of zero, negative, NaN or `-inf` means no space:
    /// the result overflows at natural width. `+inf` means unconstrained:
    /// natural width, no scaling, no overflow.
    pub fn compute(
        &self,
        activities: &[Activity],
        available_width: f64,
        mode: LayoutMode,
    ) -> LayoutResult {
        let mut skipped = Vec::new();
        let mut entries: Vec<(f64, usize)> = Vec::with_capacity(activities.len());

        for (index, activity) in activities.iter().enumerate() {
            if activity.name.trim().is_empty() {
                debug!(id = %activity.id, "excluding activity with empty name");
                skipped.push(ValidationError::EmptyName {
                    id: activity.id.clone(),
                });
                continue;
            }
            match activity.end_timestamp() {
                Some(ts) => entries.push((ts, index)),
                None => {
                    debug!(
                        id = %activity.id,
                        value = %activity.end_date,
                        "excluding activity with unparseable end date"
                    );
                    skipped.push(ValidationError::InvalidEndDate {
                        id: activity.id.clone(),
                        value: activity.end_date.clone(),
                    });
                }
            }
        }

        if entries.is_empty() {
            return LayoutResult::empty(mode, skipped);
        }

        // `sort_by` is stable: equal end dates keep their input order.
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        let timestamps: Vec<f64> = entries.iter().map(|&(ts, _)| ts).collect();
        let natural = natural_positions(&timestamps, &self.config);
        let available = sanitize_width(available_width);

        // A zero natural width only comes from an unvalidated config with
        // zero-width boxes; there is nothing to stretch.
        let (scale, content_width, overflow) = if available.is_infinite() || natural.width <= 0.0 {
            (1.0, natural.width, false)
        } else if natural.width <= available {
            (available / natural.width, available, false)
        } else {
            (1.0, natural.width, true)
        };

        let positions = entries
            .iter()
            .zip(&natural.positions)
            .enumerate()
            .map(|(rank, (&(_, index), &x))| LayoutPosition {
                activity_id: activities[index].id.clone(),
                source_index: index,
                x: x * scale,
                lane: Lane::for_rank(rank),
            })
            .collect();

        LayoutResult {
            positions,
            content_width,
            line_start: 0.0,
            line_end: content_width,
            overflow,
            scale,
            natural_width: natural.width,
            mode,
            skipped,
        }
    }
}

/// Lay out `activities` with the default pixel constants.
pub fn compute_layout(
    activities: &[Activity],
    available_width: f64,
    mode: LayoutMode,
) -> LayoutResult {
    LayoutEngine::default().compute(activities, available_width, mode)
}

/// Transient measurements (zero width during mount, NaN from a detached
/// node) must not crash rendering; they all collapse to "no space".
fn sanitize_width(width: f64) -> f64 {
    if width > 0.0 { width } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn activity(id: &str, end: &str) -> Activity {
        Activity::new(id, format!("Activity {id}"), end)
    }

    fn xs(result: &LayoutResult) -> Vec<f64> {
        result.positions.iter().map(|p| p.x).collect()
    }

    fn ids(result: &LayoutResult) -> Vec<&str> {
        result
            .positions
            .iter()
            .map(|p| p.activity_id.as_str())
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_input_has_no_content() {
        let result = compute_layout(&[], 800.0, LayoutMode::Inline);
        assert!(result.is_empty());
        assert!(!result.overflow);
        assert_close(result.content_width, 0.0);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn single_activity_is_centered_and_fills_width() {
        let result = compute_layout(&[activity("a", "2024-01-01")], 800.0, LayoutMode::Inline);
        assert_eq!(result.positions.len(), 1);
        assert!(!result.overflow);
        assert_close(result.content_width, 800.0);
        assert_close(result.positions[0].x, 400.0);
        assert_eq!(result.positions[0].lane, Lane::Above);
    }

    #[test]
    fn identical_dates_fan_out_in_input_order() {
        let activities = [
            activity("a", "2024-05-01"),
            activity("b", "2024-05-01"),
            activity("c", "2024-05-01"),
        ];
        let result = compute_layout(&activities, 900.0, LayoutMode::Inline);
        assert_eq!(ids(&result), ["a", "b", "c"]);
        // Natural width 500 stretched to 900.
        assert_close(result.scale, 900.0 / 500.0);
        let xs = xs(&result);
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= 180.0);
        }
    }

    #[test]
    fn sorts_by_end_date_with_stable_ties() {
        let activities = [
            activity("late", "2024-03-01"),
            activity("tie-1", "2024-01-01"),
            activity("tie-2", "2024-01-01"),
        ];
        let result = compute_layout(&activities, 2000.0, LayoutMode::Inline);
        assert_eq!(ids(&result), ["tie-1", "tie-2", "late"]);
        assert_eq!(result.positions[2].source_index, 0);
    }

    #[test]
    fn overflow_keeps_natural_size() {
        let activities: Vec<_> = (0..10)
            .map(|i| activity(&i.to_string(), "2024-01-01"))
            .collect();
        let result = compute_layout(&activities, 300.0, LayoutMode::Inline);
        assert!(result.overflow);
        assert_close(result.content_width, result.natural_width);
        assert_close(result.content_width, 9.0 * 180.0 + 140.0);
        assert_close(result.scale, 1.0);
        for pair in xs(&result).windows(2) {
            assert_close(pair[1] - pair[0], 180.0);
        }
    }

    #[test]
    fn scale_to_fit_doubles_natural_positions() {
        let activities = [
            activity("a", "2024-01-01"),
            activity("b", "2024-01-01"),
            activity("c", "2024-01-01"),
        ];
        let result = compute_layout(&activities, 1000.0, LayoutMode::Outline);
        assert_close(result.natural_width, 500.0);
        assert_close(result.scale, 2.0);
        assert_close(result.content_width, 1000.0);
        assert_eq!(xs(&result), vec![140.0, 500.0, 860.0]);
        assert_close(result.line_end, 1000.0);
    }

    #[test]
    fn lanes_alternate_by_chronological_rank() {
        let activities = [
            activity("e", "2024-05-01"),
            activity("a", "2024-01-01"),
            activity("d", "2024-04-01"),
            activity("b", "2024-02-01"),
            activity("c", "2024-03-01"),
        ];
        let result = compute_layout(&activities, 1200.0, LayoutMode::Inline);
        assert_eq!(ids(&result), ["a", "b", "c", "d", "e"]);
        let lanes: Vec<_> = result.positions.iter().map(|p| p.lane).collect();
        assert_eq!(
            lanes,
            [Lane::Above, Lane::Below, Lane::Above, Lane::Below, Lane::Above]
        );
    }

    #[test]
    fn dense_dates_are_clamped_sparse_dates_stay_proportional() {
        let timestamps = [0.0, 1.0, 364.0];
        let natural = natural_positions(&timestamps, &LayoutConfig::default());
        // raw: 0, ~2.47, 900 → clamped: 0, 180, 900 → shifted by +70.
        assert_eq!(natural.positions, vec![70.0, 250.0, 970.0]);
        assert_close(natural.width, 1040.0);
    }

    #[test]
    fn base_width_grows_with_count() {
        let timestamps: Vec<f64> = (0..6).map(f64::from).collect();
        let natural = natural_positions(&timestamps, &LayoutConfig::default());
        // 6 * 180 = 1080 > 900 floor; evenly spread dates land 216 apart.
        assert_close(natural.positions[1] - natural.positions[0], 216.0);
        assert_close(natural.width, 1080.0 + 140.0);
    }

    #[test]
    fn invalid_dates_are_skipped_not_propagated() {
        let activities = [
            activity("ok", "2024-01-01"),
            activity("bad", "soon"),
            Activity::new("blank", "   ", "2024-01-02"),
            activity("ok-2", "2024-02-01"),
        ];
        let result = compute_layout(&activities, 1000.0, LayoutMode::Inline);
        assert_eq!(ids(&result), ["ok", "ok-2"]);
        assert!(result.positions.iter().all(|p| p.x.is_finite()));
        assert_eq!(result.skipped_ids().collect::<Vec<_>>(), ["bad", "blank"]);
        assert_eq!(
            result.skipped[0],
            ValidationError::InvalidEndDate {
                id: "bad".into(),
                value: "soon".into()
            }
        );
    }

    #[test]
    fn all_invalid_is_empty_with_skips() {
        let result = compute_layout(&[activity("x", "")], 1000.0, LayoutMode::Inline);
        assert!(result.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn non_positive_widths_force_overflow() {
        let activities = [activity("a", "2024-01-01")];
        for width in [0.0, -50.0, f64::NAN, f64::NEG_INFINITY] {
            let result = compute_layout(&activities, width, LayoutMode::Inline);
            assert!(result.overflow, "width {width}");
            assert_close(result.content_width, 140.0);
            assert_close(result.positions[0].x, 70.0);
        }
    }

    #[test]
    fn unconstrained_width_keeps_natural_layout() {
        let activities = [activity("a", "2024-01-01"), activity("b", "2024-01-02")];
        let result = compute_layout(&activities, f64::INFINITY, LayoutMode::Inline);
        assert!(!result.overflow);
        assert_close(result.scale, 1.0);
        assert_close(result.content_width, result.natural_width);
    }

    #[test]
    fn exact_fit_does_not_overflow() {
        let activities = [activity("a", "2024-01-01"), activity("b", "2024-01-01")];
        let result = compute_layout(&activities, 320.0, LayoutMode::Inline);
        assert!(!result.overflow);
        assert_close(result.scale, 1.0);
    }

    #[test]
    fn custom_config_changes_spacing() {
        let engine = LayoutEngine::new(LayoutConfig {
            box_width: 100.0,
            min_spacing: 20.0,
            ..LayoutConfig::default()
        });
        let activities = [activity("a", "2024-01-01"), activity("b", "2024-01-01")];
        let result = engine.compute(&activities, 0.0, LayoutMode::Inline);
        assert_close(result.positions[1].x - result.positions[0].x, 120.0);
        assert_close(result.content_width, 220.0);
    }

    #[test]
    fn zero_width_boxes_never_produce_nan() {
        let engine = LayoutEngine::new(LayoutConfig {
            box_width: 0.0,
            min_spacing: 0.0,
            ..LayoutConfig::default()
        });
        let result = engine.compute(&[activity("a", "2024-01-01")], 800.0, LayoutMode::Inline);
        assert!(result.positions.iter().all(|p| p.x.is_finite()));
        assert!(result.scale.is_finite());
        assert!(result.content_width.is_finite());
        assert!(!result.overflow);
    }

    #[test]
    fn result_serializes_with_camel_case_fields() {
        let result = compute_layout(&[activity("a", "2024-01-01")], 500.0, LayoutMode::Outline);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["positions"][0]["activityId"], "a");
        assert_eq!(json["positions"][0]["lane"], "above");
        assert_eq!(json["contentWidth"], 500.0);
        assert_eq!(json["mode"], "outline");
        assert_eq!(json["overflow"], false);
    }
}
