//! Property tests for the layout engine invariants: no overlap, chronological
//! order, determinism and lane alternation, over arbitrary snapshots and widths.

use journey_core::layout::{Lane, LayoutConfig, LayoutMode, LayoutResult, compute_layout};
use journey_core::model::Activity;
use proptest::prelude::*;
use time::{Date, Duration, macros::date};

const EPS: f64 = 1e-6;
const EPOCH: Date = date!(2020 - 01 - 01);

fn snapshot(day_offsets: &[i64]) -> Vec<Activity> {
    day_offsets
        .iter()
        .enumerate()
        .map(|(i, &days)| {
            let end = EPOCH + Duration::days(days);
            Activity::new(format!("id-{i}"), format!("Activity {i}"), end.to_string())
        })
        .collect()
}

fn mode_strategy() -> impl Strategy<Value = LayoutMode> {
    prop_oneof![Just(LayoutMode::Inline), Just(LayoutMode::Outline)]
}

fn end_of(result: &LayoutResult, activities: &[Activity], rank: usize) -> f64 {
    activities[result.positions[rank].source_index]
        .end_timestamp()
        .unwrap_or(f64::NAN)
}

proptest! {
    #[test]
    fn adjacent_boxes_never_overlap(
        offsets in proptest::collection::vec(0i64..3650, 1..40),
        width in 0.0f64..6000.0,
        mode in mode_strategy(),
    ) {
        let activities = snapshot(&offsets);
        let result = compute_layout(&activities, width, mode);
        let min_gap = LayoutConfig::default().min_gap();
        let required = if result.overflow { min_gap } else { min_gap * result.scale };

        for pair in result.positions.windows(2) {
            prop_assert!(
                pair[1].x - pair[0].x >= required - EPS,
                "gap {} < {}", pair[1].x - pair[0].x, required
            );
        }
    }

    #[test]
    fn positions_follow_chronological_order(
        offsets in proptest::collection::vec(0i64..365, 1..30),
        width in 100.0f64..4000.0,
    ) {
        let activities = snapshot(&offsets);
        let result = compute_layout(&activities, width, LayoutMode::Inline);
        prop_assert_eq!(result.positions.len(), activities.len());

        for rank in 1..result.positions.len() {
            prop_assert!(result.positions[rank].x >= result.positions[rank - 1].x);
            let (prev, curr) = (
                end_of(&result, &activities, rank - 1),
                end_of(&result, &activities, rank),
            );
            prop_assert!(curr >= prev);
            // Equal end dates keep input order.
            if curr == prev {
                let (a, b) = (&result.positions[rank - 1], &result.positions[rank]);
                prop_assert!(b.source_index > a.source_index);
            }
        }
    }

    #[test]
    fn identical_input_gives_bit_identical_output(
        offsets in proptest::collection::vec(0i64..3650, 0..30),
        width in -100.0f64..3000.0,
        mode in mode_strategy(),
    ) {
        let activities = snapshot(&offsets);
        let a = compute_layout(&activities, width, mode);
        let b = compute_layout(&activities, width, mode);
        prop_assert_eq!(a.content_width.to_bits(), b.content_width.to_bits());
        prop_assert_eq!(a.positions.len(), b.positions.len());
        for (pa, pb) in a.positions.iter().zip(&b.positions) {
            prop_assert_eq!(pa.x.to_bits(), pb.x.to_bits());
            prop_assert_eq!(&pa.activity_id, &pb.activity_id);
            prop_assert_eq!(pa.lane, pb.lane);
        }
    }

    #[test]
    fn lanes_alternate_by_rank(
        offsets in proptest::collection::vec(0i64..3650, 1..30),
        width in 0.0f64..3000.0,
    ) {
        let result = compute_layout(&snapshot(&offsets), width, LayoutMode::Outline);
        for (rank, pos) in result.positions.iter().enumerate() {
            let expected = if rank % 2 == 0 { Lane::Above } else { Lane::Below };
            prop_assert_eq!(pos.lane, expected);
        }
    }

    #[test]
    fn content_fits_or_overflows(
        offsets in proptest::collection::vec(0i64..3650, 1..30),
        width in 1.0f64..5000.0,
    ) {
        let result = compute_layout(&snapshot(&offsets), width, LayoutMode::Inline);
        let half_box = LayoutConfig::default().box_width / 2.0;

        if result.overflow {
            prop_assert!(result.natural_width > width);
            prop_assert_eq!(result.content_width, result.natural_width);
        } else {
            prop_assert!((result.content_width - width).abs() < EPS);
        }
        prop_assert_eq!(result.line_start, 0.0);
        prop_assert_eq!(result.line_end, result.content_width);

        let first = result.positions[0].x;
        let last = result.positions[result.positions.len() - 1].x;
        prop_assert!((first - half_box * result.scale).abs() < EPS);
        prop_assert!((result.content_width - last - half_box * result.scale).abs() < EPS);
    }
}
