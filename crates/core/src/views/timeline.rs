use journey_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::layout::{LayoutConfig, LayoutMode, LayoutResult, place};
use crate::model::Activity;

const LINE_WIDTH: f64 = 4.0;
const CONNECTOR_WIDTH: f64 = 1.0;
const INLINE_MARKER_RADIUS: f64 = 6.0;
const OUTLINE_MARKER_RADIUS: f64 = 8.0;
const EMPTY_FONT_SIZE: f64 = 14.0;
const SCROLL_INDICATOR_HEIGHT: f64 = 4.0;

pub const EMPTY_MESSAGE: &str = "No activities yet";

/// Furthest the viewport can scroll into an overflowing layout.
pub fn max_scroll(result: &LayoutResult, viewport_width: f64) -> f64 {
    if result.overflow {
        (result.content_width - viewport_width).max(0.0)
    } else {
        0.0
    }
}

/// Render a computed layout: the reference line, a marker and connector per
/// activity, and the labelled activity boxes.
///
/// The baseline runs through the vertical middle of the viewport. When the
/// layout overflows, `viewport.x` is the horizontal scroll offset (clamped
/// to the content) and boxes entirely outside the visible window are culled.
pub fn render_timeline(
    result: &LayoutResult,
    activities: &[Activity],
    config: &LayoutConfig,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    let baseline_y = viewport.height / 2.0;

    if result.is_empty() {
        return vec![RenderCommand::DrawText {
            position: Point::new(viewport.width / 2.0, baseline_y),
            text: EMPTY_MESSAGE.to_string(),
            color: ThemeToken::TextMuted,
            font_size: EMPTY_FONT_SIZE,
            align: TextAlign::Center,
        }];
    }

    let scroll_x = viewport.x.max(0.0).min(max_scroll(result, viewport.width));
    let visible = scroll_x..=scroll_x + viewport.width;
    let marker_radius = match result.mode {
        LayoutMode::Inline => INLINE_MARKER_RADIUS,
        LayoutMode::Outline => OUTLINE_MARKER_RADIUS,
    };

    let mut commands = Vec::with_capacity(result.positions.len() * 3 + 6);
    commands.push(RenderCommand::BeginGroup {
        id: "timeline".into(),
        label: Some(format!("Timeline ({})", result.mode)),
    });

    if result.overflow {
        commands.push(RenderCommand::PushTransform {
            translate: Point::new(-scroll_x, 0.0),
            scale: Point::new(1.0, 1.0),
        });
    }

    commands.push(RenderCommand::DrawLine {
        from: Point::new(result.line_start, baseline_y),
        to: Point::new(result.line_end, baseline_y),
        color: ThemeToken::TimelineLine,
        width: LINE_WIDTH,
    });

    for placement in place(result, config, baseline_y) {
        let rect = placement.box_rect;
        if rect.right() < *visible.start() || rect.x > *visible.end() {
            continue;
        }

        let (from, to) = placement.connector;
        commands.push(RenderCommand::DrawLine {
            from,
            to,
            color: ThemeToken::Connector,
            width: CONNECTOR_WIDTH,
        });
        commands.push(RenderCommand::DrawCircle {
            center: placement.marker,
            radius: marker_radius,
            fill: ThemeToken::ActivityBoxBackground,
            stroke: ThemeToken::Marker,
        });
        commands.push(RenderCommand::DrawRect {
            rect,
            color: ThemeToken::ActivityBoxBackground,
            border_color: Some(ThemeToken::ActivityBoxBorder),
            label: activities
                .get(placement.source_index)
                .map(|a| a.name.clone()),
            activity_id: Some(placement.activity_id),
        });
    }

    if result.overflow {
        commands.push(RenderCommand::PopTransform);

        // Thumb showing which slice of the content is visible.
        let ratio = viewport.width / result.content_width;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                scroll_x * ratio,
                viewport.height - SCROLL_INDICATOR_HEIGHT,
                viewport.width * ratio,
                SCROLL_INDICATOR_HEIGHT,
            ),
            color: ThemeToken::ScrollIndicator,
            border_color: None,
            label: None,
            activity_id: None,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
