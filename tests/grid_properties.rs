//! Property tests for grid generation across random ranges and zoom levels.
//!
//! Run: cargo test --test grid_properties

#![allow(clippy::unwrap_used)]

use gridwork::geometry::{ModelRect, Viewport};
use gridwork::grid::{Alignment, Axis, GridGenerator, TickSequence};
use gridwork::pane::Pane;
use gridwork::render::{triangulate, DrawMode, GeometryBuffer};
use proptest::prelude::*;

fn pane(lo: f64, hi: f64, extent: i32) -> Pane {
    Pane::new(Viewport::new(0, 0, extent, 100), ModelRect::new(lo, 0.0, hi, 1.0))
}

fn is_multiple(value: f64, step: f64) -> bool {
    let q = value / step;
    (q - q.round()).abs() < 1e-6
}

// ============================================================================
// STEP AND RANGE
// ============================================================================

proptest! {
    #[test]
    fn prop_ticks_cover_visible_range(
        lo in -1.0e4f64..1.0e4,
        width in 1.0e-2f64..1.0e6,
        extent in 100i32..2000,
    ) {
        let hi = lo + width;
        let mut grid = GridGenerator::new();
        grid.generate_grid(&pane(lo, hi, extent), Axis::X);

        let ticks: Vec<f64> = grid.begin(Axis::X).collect();
        let step = grid.step(Axis::X);
        prop_assert!(step > 0.0);
        prop_assert!(ticks.len() >= 2);

        let first = ticks[0];
        let last = *ticks.last().unwrap();
        let slack = step * 1e-6;
        prop_assert!(first <= lo + slack);
        prop_assert!(first > lo - step - slack);
        prop_assert!(last >= hi - slack);
        prop_assert!(last < hi + step + slack);
        for t in &ticks {
            prop_assert!(is_multiple(*t, step), "{} is not a multiple of {}", t, step);
        }
    }

    #[test]
    fn prop_cell_size_within_limits(
        lo in -1.0e4f64..1.0e4,
        width in 1.0e-2f64..1.0e6,
        extent in 100i32..2000,
        min_px in 5.0f64..60.0,
        ratio in 3.0f64..10.0,
    ) {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(min_px, min_px * ratio);
        let hi = lo + width;
        grid.generate_grid(&pane(lo, hi, extent), Axis::X);

        let cell_px = grid.step(Axis::X) * f64::from(extent) / (hi - lo);
        prop_assert!(cell_px >= min_px * (1.0 - 1e-9), "cell {} px below {}", cell_px, min_px);
        prop_assert!(cell_px <= min_px * ratio * (1.0 + 1e-9), "cell {} px above {}", cell_px, min_px * ratio);

        let max_ticks = (f64::from(extent) / min_px).ceil() as usize + 3;
        prop_assert!(grid.begin(Axis::X).len() <= max_ticks);
    }

    #[test]
    fn prop_integer_mode_gives_integral_ticks(
        lo in -1.0e5f64..1.0e5,
        width in 1.0e-3f64..1.0e5,
        extent in 50i32..2000,
    ) {
        let mut grid = GridGenerator::new();
        grid.set_integer_mode(true, true);
        grid.generate_grid(&pane(lo, lo + width, extent), Axis::X);

        let step = grid.step(Axis::X);
        prop_assert!(step >= 1.0);
        prop_assert_eq!(step, step.round());
        for t in grid.begin(Axis::X) {
            prop_assert!((t - t.round()).abs() < 1e-9, "tick {} is not integral", t);
        }
    }

    #[test]
    fn prop_one_based_labels_are_round(
        lo in 0.0f64..1.0e6,
        width in 10.0f64..1.0e6,
    ) {
        let mut grid = GridGenerator::new();
        grid.set_alignment(Axis::X, Alignment::OneBased);
        grid.set_integer_mode(true, false);
        grid.generate_grid(&pane(lo, lo + width, 800), Axis::X);

        let step = grid.step(Axis::X);
        for t in grid.begin(Axis::X) {
            let shown = grid.display_value(Axis::X, t);
            prop_assert!((shown - (t + 1.0)).abs() < 1e-9);
            prop_assert!(is_multiple(shown, step));
        }
    }

    #[test]
    fn prop_begin_is_repeatable(
        lo in -1.0e3f64..1.0e3,
        width in 1.0e-1f64..1.0e4,
    ) {
        let mut grid = GridGenerator::new();
        grid.generate(&pane(lo, lo + width, 640));
        for axis in Axis::ALL {
            let first: Vec<f64> = grid.begin(axis).collect();
            let second: Vec<f64> = grid.begin(axis).collect();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(grid.begin(axis).len(), first.len());
        }
    }

    #[test]
    fn prop_tick_count_matches_iteration(
        start in -1.0e3f64..1.0e3,
        steps in 0u32..500,
        step_exp in -3i32..4,
    ) {
        let step = 10f64.powi(step_exp);
        let finish = start + f64::from(steps) * step;
        let seq = TickSequence::new(start, finish, step);
        prop_assert_eq!(seq.tick_count(), seq.count());
    }
}

// ============================================================================
// GEOMETRY BUFFERS
// ============================================================================

proptest! {
    #[test]
    fn prop_triangle_counts_agree(n in 0usize..200) {
        let mut buf = GeometryBuffer::new();
        for mode in [DrawMode::Triangles, DrawMode::TriangleStrip, DrawMode::TriangleFan, DrawMode::Quads] {
            buf.begin(mode).unwrap();
            for i in 0..n {
                buf.vertex2(i as f64, (i % 7) as f64);
            }
            buf.end().unwrap();
            prop_assert_eq!(buf.vertex_count(), n);
            let triangles = triangulate(mode, n).len();
            let expected = if mode == DrawMode::Quads { 2 * buf.primitive_count() } else { buf.primitive_count() };
            prop_assert_eq!(triangles, expected);
        }
    }

    #[test]
    fn prop_partial_colors_rejected(n in 2usize..50, missing in 1usize..10) {
        let missing = missing.min(n - 1);
        let mut buf = GeometryBuffer::new();
        buf.begin(DrawMode::LineStrip).unwrap();
        for i in 0..n {
            if i >= missing {
                buf.color(gridwork::color::Rgba::RED);
            }
            buf.vertex2(i as f64, 0.0);
        }
        prop_assert!(buf.end().is_err());
    }
}

// ============================================================================
// EDGE CASES
// ============================================================================

#[test]
fn degenerate_range_single_tick() {
    let mut grid = GridGenerator::new();
    grid.set_cell_limits(10.0, 100.0);
    grid.generate_grid(&pane(5.0, 5.0, 400), Axis::X);
    let ticks: Vec<f64> = grid.begin(Axis::X).collect();
    assert_eq!(ticks, vec![5.0]);
}

#[test]
fn non_finite_range_yields_no_ticks() {
    let mut grid = GridGenerator::new();
    grid.generate_grid(&pane(f64::NAN, 10.0, 400), Axis::X);
    assert_eq!(grid.begin(Axis::X).count(), 0);
    assert_eq!(grid.begin(Axis::X), TickSequence::END);
}

#[test]
fn shared_step_between_views() {
    let mut overview = GridGenerator::new();
    overview.generate_grid(&pane(0.0, 1.0e6, 1000), Axis::X);

    let mut detail = GridGenerator::new();
    detail.set_auto_step_update(false);
    detail.set_step(Axis::X, overview.step(Axis::X));
    detail.generate_grid(&pane(0.0, 1000.0, 1000), Axis::X);

    assert_eq!(detail.step(Axis::X), overview.step(Axis::X));
    assert_eq!(detail.start(Axis::X), 0.0);
    assert_eq!(detail.finish(Axis::X), overview.step(Axis::X));
}
