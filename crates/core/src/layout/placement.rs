use journey_protocol::{Point, Rect};
use serde::{Deserialize, Serialize};

use super::config::LayoutConfig;
use super::engine::{Lane, LayoutResult};

/// Vertical geometry for one laid-out activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub activity_id: String,
    pub source_index: usize,
    pub lane: Lane,
    /// Where the activity sits on the timeline.
    pub marker: Point,
    /// Connector from the marker to the near edge of the box.
    pub connector: (Point, Point),
    pub box_rect: Rect,
}

/// Derive marker, connector and box geometry for every position, with the
/// timeline drawn at `baseline_y`.
///
/// Boxes in the `Above` lane end `gap` pixels above the line; `Below`
/// boxes start `gap` pixels under it, where `gap` is the result mode's
/// vertical gap.
pub fn place(result: &LayoutResult, config: &LayoutConfig, baseline_y: f64) -> Vec<Placement> {
    let gap = result.mode.vertical_gap(config);

    result
        .positions
        .iter()
        .map(|pos| {
            let marker = Point::new(pos.x, baseline_y);
            let (edge_y, box_y) = match pos.lane {
                Lane::Above => (baseline_y - gap, baseline_y - gap - config.box_height),
                Lane::Below => (baseline_y + gap, baseline_y + gap),
            };
            Placement {
                activity_id: pos.activity_id.clone(),
                source_index: pos.source_index,
                lane: pos.lane,
                marker,
                connector: (marker, Point::new(pos.x, edge_y)),
                box_rect: Rect::centered_at(pos.x, box_y, config.box_width, config.box_height),
            }
        })
        .collect()
}

/// Height needed to show both lanes around a centered baseline.
pub fn required_height(result: &LayoutResult, config: &LayoutConfig) -> f64 {
    2.0 * (result.mode.vertical_gap(config) + config.box_height)
}
