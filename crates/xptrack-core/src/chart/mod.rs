//! Projection chart rendering.
//!
//! Maps a series onto a fixed-size 2D surface: axis scaling, gridlines,
//! the dashed zero baseline, the dashed projection polyline, boxed
//! interval annotations and date labels, issued as drawing commands in a
//! fixed order. The same vertical space carries two unrelated unit
//! systems: XP gridline labels on the left (for the plotted line) and
//! income milestone labels on the right (the investor-facing framing).
//! The two label passes never share values.

mod ascii;
mod surface;

pub use ascii::AsciiSurface;
pub use surface::{DrawCommand, DrawSurface, RecordingSurface, Stroke};

use chrono::NaiveDate;

use crate::series::Series;
use crate::storage::ChartConfig;

/// Horizontal gridlines drawn per render.
pub const GRIDLINE_COUNT: usize = 5;

/// Projected-day offsets that get an exact-XP annotation and a future
/// date label, clamped to however many projected points exist.
pub const ANNOTATION_OFFSETS: [i64; 5] = [7, 30, 90, 180, 365];

// Income milestones labeled on the right edge, top to bottom.
const INCOME_MILESTONE_PERCENTS: [f64; 5] = [100.0, 80.0, 70.0, 60.0, 50.0];
const INCOME_TARGET: f64 = 10_000.0;

// An all-zero series still gets a usable scale.
const SCALE_FLOOR_XP: u64 = 100;
// Headroom above the tallest value.
const HEADROOM: f64 = 1.2;

const BASELINE_DASH: [f64; 2] = [4.0, 4.0];
const PROJECTION_DASH: [f64; 2] = [8.0, 4.0];

/// Renders a [`Series`] onto any [`DrawSurface`].
///
/// Rendering is idempotent: the same series and surface size always
/// produce the same command sequence, and each frame fully overwrites
/// the previous one.
pub struct ChartRenderer {
    config: ChartConfig,
}

struct Layout {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_step: f64,
    scale: f64,
    max_value: f64,
}

impl Layout {
    fn x_at(&self, index: usize) -> f64 {
        self.left + index as f64 * self.x_step
    }

    fn y_for(&self, xp: f64) -> f64 {
        self.bottom - xp * self.scale
    }
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render the series. Absent plot area (zero-sized or smaller than
    /// the paddings) is a no-op; an empty series produces background and
    /// grid only.
    pub fn render(&self, series: &Series, surface: &mut dyn DrawSurface) {
        let (w, h) = (surface.width(), surface.height());
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let Some(layout) = self.layout(series, w, h) else {
            return;
        };

        surface.begin_frame();
        self.draw_background(surface, w, h);
        self.draw_grid(series, &layout, surface);
        self.draw_income_labels(&layout, surface, w);
        if series.is_empty() {
            // Degenerate-but-valid render: background and grid only.
            return;
        }
        self.draw_baseline(&layout, surface);
        self.draw_projection(series, &layout, surface);
        self.draw_annotations(series, &layout, surface);
        self.draw_date_labels(series, &layout, surface);
    }

    fn layout(&self, series: &Series, w: f64, h: f64) -> Option<Layout> {
        let left = self.config.padding;
        let right = w - self.config.padding;
        let top = self.config.top_padding;
        let bottom = h - self.config.padding;
        if right <= left || bottom <= top {
            return None;
        }

        let max_value = series
            .iter()
            .map(|p| p.xp.max(p.goal as u64))
            .max()
            .unwrap_or(0)
            .max(SCALE_FLOOR_XP) as f64;
        let scale = (bottom - top) / (max_value * HEADROOM);
        let x_step = (right - left) / series.len().saturating_sub(1).max(1) as f64;

        Some(Layout {
            left,
            right,
            top,
            bottom,
            x_step,
            scale,
            max_value,
        })
    }

    fn draw_background(&self, surface: &mut dyn DrawSurface, w: f64, h: f64) {
        surface.fill_rect(0.0, 0.0, w, h, &self.config.theme.background);
    }

    // 5 labeled horizontal gridlines plus one vertical gridline per
    // historical point. Projected points are too numerous and regular to
    // grid individually.
    fn draw_grid(&self, series: &Series, layout: &Layout, surface: &mut dyn DrawSurface) {
        let theme = &self.config.theme;
        let size = self.config.label_text_size;
        let grid = Stroke::solid(&theme.grid, 1.0);

        for i in 0..GRIDLINE_COUNT {
            let value = layout.max_value * (1.0 - i as f64 / GRIDLINE_COUNT as f64);
            let y = layout.y_for(value);
            surface.stroke_line(layout.left, y, layout.right, y, &grid);

            let label = group_thousands(value.round() as u64);
            let x = (layout.left - surface.measure_text(&label, size) - 6.0).max(0.0);
            surface.draw_text(x, y + size * 0.35, &label, size, &theme.grid_label);
        }

        for i in 0..series.historical.len() {
            let x = layout.x_at(i);
            surface.stroke_line(x, layout.top, x, layout.bottom, &grid);
        }
    }

    // Second, independent Y-label pass: income milestones over the same
    // pixel range. These values never mix with the XP gridline labels.
    fn draw_income_labels(&self, layout: &Layout, surface: &mut dyn DrawSurface, w: f64) {
        let theme = &self.config.theme;
        let size = self.config.label_text_size;
        let span = layout.bottom - layout.top;
        let slots = (INCOME_MILESTONE_PERCENTS.len() - 1) as f64;

        for (i, pct) in INCOME_MILESTONE_PERCENTS.iter().enumerate() {
            let label = format_money(INCOME_TARGET * pct / 100.0);
            let y = layout.top + span * i as f64 / slots;
            let x = (layout.right + 2.0).min(w - surface.measure_text(&label, size) - 1.0);
            surface.draw_text(x, y + size * 0.35, &label, size, &theme.income_label);
        }
    }

    // Visual reference at xp = 0, drawn before the data line.
    fn draw_baseline(&self, layout: &Layout, surface: &mut dyn DrawSurface) {
        let stroke = Stroke::dashed(&self.config.theme.baseline, 1.0, &BASELINE_DASH);
        let y = layout.y_for(0.0);
        surface.stroke_line(layout.left, y, layout.right, y, &stroke);
    }

    // One continuous polyline: the last historical point (always at the
    // zero baseline) followed by every projected point.
    fn draw_projection(&self, series: &Series, layout: &Layout, surface: &mut dyn DrawSurface) {
        let mut points: Vec<(f64, f64)> = Vec::with_capacity(series.projected.len() + 1);
        let historical_len = series.historical.len();
        if historical_len > 0 {
            points.push((layout.x_at(historical_len - 1), layout.y_for(0.0)));
        }
        for (i, point) in series.projected.iter().enumerate() {
            points.push((layout.x_at(historical_len + i), layout.y_for(point.xp as f64)));
        }
        if points.len() < 2 {
            return;
        }

        let stroke = Stroke::dashed(&self.config.theme.projection, 2.0, &PROJECTION_DASH);
        surface.stroke_polyline(&points, &stroke);
    }

    // Background-boxed exact-XP labels at the key projected offsets,
    // skipped when the box would cross into the title/header area.
    fn draw_annotations(&self, series: &Series, layout: &Layout, surface: &mut dyn DrawSurface) {
        let theme = &self.config.theme;
        let size = self.config.label_text_size;
        let vpad = (size * 0.25).max(1.0);
        let hpad = vpad + 1.0;
        let historical_len = series.historical.len();

        for offset in ANNOTATION_OFFSETS {
            let Some(point) = series.projected.get(offset as usize - 1) else {
                continue;
            };
            let x = layout.x_at(historical_len + offset as usize - 1);
            let y = layout.y_for(point.xp as f64);

            let label = format!("{} XP", group_thousands(point.xp));
            let text_width = surface.measure_text(&label, size);
            let box_w = text_width + 2.0 * hpad;
            let box_h = size + 2.0 * vpad;
            let box_x = x - box_w / 2.0;
            let box_y = y - box_h - vpad;
            if box_y < layout.top {
                continue;
            }

            surface.fill_rect(box_x, box_y, box_w, box_h, &theme.annotation_bg);
            surface.draw_text(
                box_x + hpad,
                box_y + box_h - vpad,
                &label,
                size,
                &theme.annotation_text,
            );
        }
    }

    // Below the x-axis: one date per historical point, and future dates
    // at the annotation offsets (month+day near term, month+year beyond).
    fn draw_date_labels(&self, series: &Series, layout: &Layout, surface: &mut dyn DrawSurface) {
        let theme = &self.config.theme;
        let size = self.config.label_text_size;
        let y = layout.bottom + size + (size * 0.25).max(1.0);
        let historical_len = series.historical.len();

        for (i, point) in series.historical.iter().enumerate() {
            let label = format_day(point.date);
            let x = layout.x_at(i) - surface.measure_text(&label, size) / 2.0;
            surface.draw_text(x, y, &label, size, &theme.date_label);
        }

        for offset in ANNOTATION_OFFSETS {
            let Some(point) = series.projected.get(offset as usize - 1) else {
                continue;
            };
            let label = if offset <= 30 {
                format_day(point.date)
            } else {
                format_month_year(point.date)
            };
            let x = layout.x_at(historical_len + offset as usize - 1)
                - surface.measure_text(&label, size) / 2.0;
            surface.draw_text(x, y, &label, size, &theme.date_label);
        }
    }
}

fn format_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

fn format_money(value: f64) -> String {
    format!("${}", group_thousands(value.round() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::goal::DailyGoal;
    use crate::series::SeriesGenerator;
    use crate::storage::CourseConfig;

    fn series(goal: i64, window: i64) -> Series {
        SeriesGenerator::new(CourseConfig::default())
            .generate_from(
                NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
                DailyGoal::new(goal).unwrap(),
                window,
            )
            .unwrap()
    }

    fn empty_series() -> Series {
        Series {
            historical: vec![],
            projected: vec![],
        }
    }

    fn render(series: &Series) -> Vec<DrawCommand> {
        let mut surface = RecordingSurface::new(800.0, 400.0);
        ChartRenderer::new(ChartConfig::default()).render(series, &mut surface);
        surface.into_commands()
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn zero_sized_surface_is_a_no_op() {
        let mut surface = RecordingSurface::new(0.0, 0.0);
        ChartRenderer::new(ChartConfig::default()).render(&series(100, 7), &mut surface);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn surface_smaller_than_padding_is_a_no_op() {
        let mut surface = RecordingSurface::new(40.0, 40.0);
        ChartRenderer::new(ChartConfig::default()).render(&series(100, 7), &mut surface);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn background_fill_is_always_the_first_command() {
        let commands = render(&series(100, 7));
        match &commands[0] {
            DrawCommand::FillRect { x, y, w, h, .. } => {
                assert_eq!((*x, *y, *w, *h), (0.0, 0.0, 800.0, 400.0));
            }
            other => panic!("first command was {other:?}, not the background fill"),
        }
    }

    #[test]
    fn empty_series_renders_background_and_grid_only() {
        let commands = render(&empty_series());
        assert!(!commands.is_empty());
        // No baseline, no polyline, no annotations.
        assert!(commands
            .iter()
            .all(|c| !matches!(c, DrawCommand::StrokePolyline { .. })));
        assert!(commands.iter().all(|c| match c {
            DrawCommand::StrokeLine { stroke, .. } => stroke.dash.is_none(),
            _ => true,
        }));
        // Scale falls back to the 100-XP floor: top gridline label.
        assert!(texts(&commands).contains(&"100"));
    }

    #[test]
    fn gridline_labels_step_down_from_max_value() {
        let commands = render(&series(500, 7));
        // max_value = 7000 (last point of the 14-day projection).
        let labels = texts(&commands);
        for expected in ["7,000", "5,600", "4,200", "2,800", "1,400"] {
            assert!(labels.contains(&expected), "missing gridline label {expected}");
        }
    }

    #[test]
    fn goal_feeds_the_scale_floor() {
        // A 1-day window at goal 500: projection reaches 1000, but even
        // the goal value alone would keep max_value at 500 or more.
        let commands = render(&series(500, 1));
        let max = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => text.replace(',', "").parse::<u64>().ok(),
                _ => None,
            })
            .max()
            .unwrap();
        assert!(max >= 500);
    }

    #[test]
    fn income_labels_are_an_independent_pass() {
        let commands = render(&series(100, 7));
        let labels = texts(&commands);
        for expected in ["$10,000", "$8,000", "$7,000", "$6,000", "$5,000"] {
            assert!(labels.contains(&expected), "missing income label {expected}");
        }
    }

    #[test]
    fn one_vertical_gridline_per_historical_point() {
        let commands = render(&series(100, 7));
        let verticals = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeLine { x1, x2, y1, y2, .. }
                if x1 == x2 && y1 != y2))
            .count();
        assert_eq!(verticals, 7);
    }

    #[test]
    fn baseline_and_projection_use_distinct_dash_patterns() {
        let commands = render(&series(100, 7));
        let baseline_dash = commands.iter().find_map(|c| match c {
            DrawCommand::StrokeLine { stroke, .. } => stroke.dash.clone(),
            _ => None,
        });
        let projection_dash = commands.iter().find_map(|c| match c {
            DrawCommand::StrokePolyline { stroke, .. } => stroke.dash.clone(),
            _ => None,
        });
        assert_eq!(baseline_dash, Some(vec![4.0, 4.0]));
        assert_eq!(projection_dash, Some(vec![8.0, 4.0]));
    }

    #[test]
    fn projection_starts_at_the_last_historical_point_on_the_baseline() {
        let commands = render(&series(100, 7));
        let points = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokePolyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        // 1 anchor + 14 projected points.
        assert_eq!(points.len(), 15);
        let baseline_y = 400.0 - 48.0;
        assert_eq!(points[0].1, baseline_y);
        // Monotonically rising line (decreasing y).
        assert!(points.windows(2).all(|w| w[1].1 < w[0].1));
    }

    #[test]
    fn annotations_appear_only_at_reachable_offsets() {
        // Window 7 -> 14 projected days: only the 7-day offset exists.
        let commands = render(&series(100, 7));
        let labels = texts(&commands);
        assert!(labels.contains(&"700 XP"));
        assert!(!labels.iter().any(|t| t.ends_with(" XP") && *t != "700 XP"));

        // Window 90 -> 180 projected days: 7/30/90/180 exist, 365 doesn't.
        let commands = render(&series(100, 90));
        let labels = texts(&commands);
        for expected in ["700 XP", "3,000 XP", "9,000 XP", "18,000 XP"] {
            assert!(labels.contains(&expected), "missing annotation {expected}");
        }
        assert!(!labels.contains(&"36,500 XP"));
    }

    #[test]
    fn annotation_near_the_top_padding_is_skipped() {
        // Squeeze the plot area until the topmost annotation box cannot
        // fit under the header boundary.
        let config = ChartConfig {
            height: 120,
            top_padding: 40.0,
            ..ChartConfig::default()
        };
        let mut surface = RecordingSurface::new(800.0, 120.0);
        ChartRenderer::new(config).render(&series(100, 7), &mut surface);
        let labels = texts(surface.commands());
        assert!(!labels.contains(&"700 XP"));
    }

    #[test]
    fn date_labels_cover_history_and_future_offsets() {
        let commands = render(&series(100, 7));
        let labels = texts(&commands);
        // Historical run Aug 1 - Aug 7, future 7-day offset Aug 14.
        for expected in ["Aug 1", "Aug 7", "Aug 14"] {
            assert!(labels.contains(&expected), "missing date label {expected}");
        }
    }

    #[test]
    fn far_future_offsets_use_month_year_labels() {
        let commands = render(&series(100, 90));
        let labels = texts(&commands);
        // 90 and 180 days past Aug 7 2026.
        assert!(labels.contains(&"Nov 2026"));
        assert!(labels.contains(&"Feb 2027"));
        // The 30-day offset stays month+day.
        assert!(labels.contains(&"Sep 6"));
    }

    #[test]
    fn rendering_twice_produces_identical_commands() {
        let series = series(200, 30);
        let renderer = ChartRenderer::new(ChartConfig::default());
        let mut surface = RecordingSurface::new(800.0, 400.0);
        renderer.render(&series, &mut surface);
        let first = surface.commands().to_vec();
        renderer.render(&series, &mut surface);
        assert_eq!(surface.commands(), first.as_slice());
    }

    #[test]
    fn group_thousands_formats() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(700), "700");
        assert_eq!(group_thousands(3000), "3,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
