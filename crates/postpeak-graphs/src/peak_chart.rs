//! Daily post-count line chart with numbered peak markers.

use crate::renderer::{encode_png, parse_color, ChartRenderer};
use chrono::{Datelike, Months, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use postpeak_common::{DailyCount, DateRange, PeakEntry, Result};
use postpeak_config::{ChartConfig, LabelOffsets};
use tracing::debug;

/// Headroom above the highest daily count.
const HEADROOM: f64 = 1.05;

/// Share of the image height kept free above the plot for peak labels.
const LABEL_BAND: f64 = 0.15;

/// Image positions of the plot area and the peak annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ChartGeometry {
    plot_top: i32,
    plot_bottom: i32,
    marker_columns: Vec<i32>,
    label_anchors: Vec<(i32, i32)>,
}

/// Everything drawn on a peak chart.
///
/// The x axis is measured in days since the start of `range`, so the plot
/// always spans the whole configured window regardless of where the data
/// starts and ends.
#[derive(Debug, Clone)]
pub struct PeakChart {
    series: Vec<DailyCount>,
    peaks: Vec<PeakEntry>,
    range: DateRange,
    offsets: LabelOffsets,
}

impl PeakChart {
    /// Create a chart for a daily series and its selected peaks
    pub fn new(
        series: Vec<DailyCount>,
        peaks: Vec<PeakEntry>,
        range: DateRange,
        offsets: LabelOffsets,
    ) -> Self {
        Self {
            series,
            peaks,
            range,
            offsets,
        }
    }

    /// Largest daily count, 0 for an empty series.
    pub fn max_count(&self) -> u32 {
        self.series.iter().map(|d| d.count).max().unwrap_or(0)
    }

    /// Data height of a peak's label.
    ///
    /// Labels share a baseline at the series maximum and are lifted by the
    /// offset configured for their label number, which puts them above the
    /// plot area.
    pub fn label_height(&self, peak: &PeakEntry) -> f64 {
        f64::from(self.max_count()) + self.offsets.offset_for(peak.label)
    }

    /// Top of the y axis: the highest daily count plus headroom, never
    /// below 1.
    pub fn y_top(&self) -> f64 {
        (f64::from(self.max_count()) * HEADROOM).max(1.0)
    }

    /// First-of-month tick dates every `interval_months`, starting with the
    /// first month that begins inside the range.
    pub fn tick_dates(&self, interval_months: u32) -> Vec<NaiveDate> {
        let start = self.range.start();
        let Some(mut tick) = start.with_day(1) else {
            return Vec::new();
        };
        if tick < start {
            match tick.checked_add_months(Months::new(1)) {
                Some(next) => tick = next,
                None => return Vec::new(),
            }
        }

        let step = Months::new(interval_months.max(1));
        let mut ticks = Vec::new();
        while tick <= self.range.end() {
            ticks.push(tick);
            match tick.checked_add_months(step) {
                Some(next) => tick = next,
                None => break,
            }
        }
        ticks
    }

    #[allow(clippy::cast_precision_loss)]
    fn x_of(&self, date: NaiveDate) -> f64 {
        (date - self.range.start()).num_days() as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn x_span(&self) -> f64 {
        ((self.range.num_days() - 1).max(1)) as f64
    }

    fn prepare_plot_data(&self) -> Vec<(f64, f64)> {
        self.series
            .iter()
            .map(|d| (self.x_of(d.date), f64::from(d.count)))
            .collect()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartConfig,
    ) -> Result<ChartGeometry>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let font_px = f64::from(style.points_to_px(style.font_size_pt));
        let text_color = parse_color(&style.label_color);
        let text = |scale: f64| {
            FontDesc::new(
                FontFamily::from(style.font_family.as_str()),
                font_px * scale,
                FontStyle::Normal,
            )
            .color(&text_color)
        };
        let px = |value: f64| value.round().max(0.0) as u32;

        root.fill(&parse_color(&style.background_color))?;

        let rotated = style.tick_label_rotation == 45;
        let y_top = self.y_top();
        let label_band =
            px(f64::from(root.dim_in_pixel().1) * LABEL_BAND).max(px(font_px * 2.5));

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(px(font_px))
            .margin_top(label_band)
            .x_label_area_size(px(font_px * if rotated { 6.5 } else { 3.5 }))
            .y_label_area_size(px(font_px * 5.0));
        if let Some(title) = &style.title {
            builder.caption(title, text(1.4));
        }
        let mut chart = builder.build_cartesian_2d(0f64..self.x_span(), 0f64..y_top)?;

        // x ticks are drawn by hand below so they land on month starts
        chart
            .configure_mesh()
            .disable_x_mesh()
            .max_light_lines(0)
            .bold_line_style(parse_color(&style.grid_color).stroke_width(1))
            .x_label_formatter(&|_: &f64| String::new())
            .set_tick_mark_size(LabelAreaPosition::Bottom, 0)
            .y_label_formatter(&|y: &f64| format!("{y:.0}"))
            .label_style(text(1.0))
            .axis_desc_style(text(1.0))
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .draw()?;

        let tick_len = px(font_px * 0.35).max(1) as i32;
        let tick_style = text_color.stroke_width(1);
        for date in self.tick_dates(style.tick_interval_months) {
            let (x, y) = chart.backend_coord(&(self.x_of(date), 0.0));
            root.draw(&PathElement::new(vec![(x, y), (x, y + tick_len)], tick_style))?;

            let label = date.format("%Y-%m").to_string();
            let anchor = (x, y + tick_len * 2);
            if rotated {
                Self::draw_diagonal_label(root, &label, anchor, &text(1.0), font_px)?;
            } else {
                root.draw(&Text::new(
                    label,
                    anchor,
                    text(1.0).pos(Pos::new(HPos::Center, VPos::Top)),
                ))?;
            }
        }

        let plot_data = self.prepare_plot_data();
        if !plot_data.is_empty() {
            let line_style = parse_color(&style.line_color)
                .stroke_width(style.points_to_px(style.line_width_pt));
            chart.draw_series(LineSeries::new(plot_data, line_style))?;
        }

        let (_, plot_top) = chart.backend_coord(&(0.0, y_top));
        let (_, plot_bottom) = chart.backend_coord(&(0.0, 0.0));
        let mut geometry = ChartGeometry {
            plot_top,
            plot_bottom,
            ..ChartGeometry::default()
        };

        // markers stop at the plot top; the labels live in the band above it
        let marker_style =
            parse_color(&style.marker_color).stroke_width(style.points_to_px(style.marker_width_pt));
        let dash = px(font_px * 0.6).max(2);
        let gap = px(font_px * 0.4).max(1);
        for peak in &self.peaks {
            let x = self.x_of(peak.date);
            chart.draw_series(DashedLineSeries::new(
                vec![(x, 0.0), (x, y_top)],
                dash,
                gap,
                marker_style,
            ))?;
            geometry.marker_columns.push(chart.backend_coord(&(x, 0.0)).0);
        }

        let label_style = text(1.0).pos(Pos::new(HPos::Center, VPos::Bottom));
        let label_floor = plot_top - 2;
        let label_ceiling = (font_px.ceil() as i32).min(label_floor);
        for peak in &self.peaks {
            let (x, y) = chart.backend_coord(&(self.x_of(peak.date), self.label_height(peak)));
            let anchor = (x, y.clamp(label_ceiling, label_floor));
            root.draw(&Text::new(peak.label.to_string(), anchor, label_style.clone()))?;
            geometry.label_anchors.push(anchor);
        }

        Ok(geometry)
    }

    /// Draws `label` rising at 45° to the upper right, centered under
    /// `anchor`, one upright glyph per step.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn draw_diagonal_label<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        label: &str,
        anchor: (i32, i32),
        style: &TextStyle,
        font_px: f64,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let step = font_px * 0.6;
        let glyphs = label.chars().count() as f64;
        let glyph_style = style.pos(Pos::new(HPos::Center, VPos::Top));
        for (i, glyph) in label.chars().enumerate() {
            let i = i as f64;
            let x = f64::from(anchor.0) + (i - (glyphs - 1.0) / 2.0) * step;
            let y = f64::from(anchor.1) + (glyphs - 1.0 - i) * step;
            root.draw(&Text::new(
                glyph.to_string(),
                (x.round() as i32, y.round() as i32),
                glyph_style.clone(),
            ))?;
        }
        Ok(())
    }
}

impl PeakChart {
    fn render_rgb(&self, style: &ChartConfig) -> Result<(Vec<u8>, ChartGeometry)> {
        let (width, height) = style.pixel_size();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        let geometry = {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let geometry = self.draw(&root, style)?;
            root.present()?;
            geometry
        };
        Ok((buffer, geometry))
    }
}

impl ChartRenderer for PeakChart {
    fn render_to_bytes(&self, style: &ChartConfig) -> Result<Vec<u8>> {
        let (width, height) = style.pixel_size();
        let (pixels, geometry) = self.render_rgb(style)?;
        debug!(
            "Rendered {}x{} chart with {} days, plot rows {}..{}, markers at {:?}, labels at {:?}",
            width,
            height,
            self.series.len(),
            geometry.plot_top,
            geometry.plot_bottom,
            geometry.marker_columns,
            geometry.label_anchors
        );
        encode_png(&pixels, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::select_peaks;
    use postpeak_common::test_utils::{date, series};
    use postpeak_common::PostPeakError;
    use tempfile::TempDir;

    fn small_style() -> ChartConfig {
        ChartConfig {
            width_in: 4.0,
            height_in: 2.0,
            dpi: 60,
            ..ChartConfig::default()
        }
    }

    fn spike_chart(offsets: LabelOffsets) -> PeakChart {
        let daily = series(&[
            (date(2021, 6, 1), 3),
            (date(2021, 6, 2), 5),
            (date(2021, 6, 3), 50),
            (date(2021, 6, 4), 2),
            (date(2021, 6, 5), 4),
        ]);
        let peaks = select_peaks(&daily, 3);
        PeakChart::new(daily, peaks, DateRange::reference_window(), offsets)
    }

    #[test]
    fn test_tick_dates_every_three_months() {
        let chart = spike_chart(LabelOffsets::flat(5.0));

        let ticks = chart.tick_dates(3);
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0], date(2021, 1, 1));
        assert_eq!(ticks[1], date(2021, 4, 1));
        assert_eq!(ticks[11], date(2023, 10, 1));
    }

    #[test]
    fn test_tick_dates_skip_partial_first_month() {
        let range = DateRange::new(date(2022, 2, 15), date(2022, 9, 1)).unwrap();
        let chart = PeakChart::new(Vec::new(), Vec::new(), range, LabelOffsets::flat(0.0));

        assert_eq!(
            chart.tick_dates(3),
            [date(2022, 3, 1), date(2022, 6, 1), date(2022, 9, 1)]
        );
    }

    #[test]
    fn test_label_heights_use_offsets() {
        let chart = spike_chart(LabelOffsets::flat(18.0).with_override(2, 26.0));

        let heights: Vec<_> = chart.peaks.iter().map(|p| chart.label_height(p)).collect();
        assert_eq!(heights, [68.0, 76.0, 68.0]);
        assert!((chart.y_top() - 50.0 * HEADROOM).abs() < 1e-9);
        assert!(heights.iter().all(|&h| h > chart.y_top()));
    }

    #[test]
    fn test_y_top_without_peaks() {
        let range = DateRange::reference_window();
        let empty = PeakChart::new(Vec::new(), Vec::new(), range, LabelOffsets::flat(5.0));
        assert!((empty.y_top() - 1.0).abs() < f64::EPSILON);

        let flat = PeakChart::new(
            series(&[(date(2021, 3, 1), 10)]),
            Vec::new(),
            range,
            LabelOffsets::flat(5.0),
        );
        assert!((flat.y_top() - 10.0 * HEADROOM).abs() < 1e-9);
    }

    #[test]
    fn test_x_positions_are_days_from_range_start() {
        let chart = spike_chart(LabelOffsets::flat(5.0));

        assert!(chart.x_of(date(2021, 1, 1)).abs() < f64::EPSILON);
        assert!((chart.x_of(date(2021, 6, 3)) - 153.0).abs() < f64::EPSILON);
        assert!((chart.x_span() - 1094.0).abs() < f64::EPSILON);
    }

    const MARKER: (u8, u8, u8) = (0xff, 0x00, 0x00);

    fn pixel(pixels: &[u8], width: u32, x: i32, y: i32) -> (u8, u8, u8) {
        let i = (usize::try_from(y).unwrap() * width as usize + usize::try_from(x).unwrap()) * 3;
        (pixels[i], pixels[i + 1], pixels[i + 2])
    }

    #[test]
    fn test_markers_stop_below_labels() {
        let daily = series(&[
            (date(2021, 3, 1), 3),
            (date(2022, 3, 1), 100),
            (date(2023, 3, 1), 4),
        ]);
        let peaks = select_peaks(&daily, 2);
        let range = DateRange::reference_window();
        let chart = PeakChart::new(daily, peaks, range, LabelOffsets::flat(18.0));
        let style = small_style();
        let (width, _) = style.pixel_size();

        let (pixels, geometry) = chart.render_rgb(&style).unwrap();

        assert_eq!(geometry.marker_columns.len(), 2);
        assert_eq!(geometry.label_anchors.len(), 2);
        let anchors = geometry.marker_columns.iter().zip(&geometry.label_anchors);
        for (&column, &(label_x, label_y)) in anchors {
            assert_eq!(column, label_x);
            assert!(label_y >= 0);
            assert!(
                label_y < geometry.plot_top,
                "label at {label_y} inside plot starting at {}",
                geometry.plot_top
            );

            let under_label = (0..=label_y)
                .filter(|&y| pixel(&pixels, width, column, y) == MARKER)
                .count();
            assert_eq!(under_label, 0, "marker in column {column} reaches its label");
            let inside = (geometry.plot_top..=geometry.plot_bottom)
                .filter(|&y| pixel(&pixels, width, column, y) == MARKER)
                .count();
            assert!(inside > 0, "no marker drawn in column {column}");
        }
    }

    #[test]
    fn test_marker_columns_follow_peak_dates() {
        let daily = series(&[(date(2021, 2, 1), 9), (date(2023, 11, 1), 7)]);
        let peaks = select_peaks(&daily, 2);
        let range = DateRange::reference_window();
        let chart = PeakChart::new(daily, peaks, range, LabelOffsets::flat(5.0));

        let (_, geometry) = chart.render_rgb(&small_style()).unwrap();
        assert!(geometry.marker_columns[0] < geometry.marker_columns[1]);
    }

    #[test]
    fn test_empty_chart_has_no_markers() {
        let chart = PeakChart::new(
            Vec::new(),
            Vec::new(),
            DateRange::reference_window(),
            LabelOffsets::flat(5.0),
        );

        let (pixels, geometry) = chart.render_rgb(&small_style()).unwrap();
        assert!(geometry.marker_columns.is_empty());
        assert!(pixels.chunks_exact(3).all(|p| (p[0], p[1], p[2]) != MARKER));
    }

    #[test]
    fn test_render_to_bytes_is_png() {
        let chart = spike_chart(LabelOffsets::flat(5.0));

        let bytes = chart.render_to_bytes(&small_style()).unwrap();
        assert_eq!(bytes[..4], [0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_render_empty_chart() {
        let chart = PeakChart::new(
            Vec::new(),
            Vec::new(),
            DateRange::reference_window(),
            LabelOffsets::flat(5.0),
        );
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");

        let result = chart.render_to_file(&small_style(), &path);
        assert!(result.is_ok(), "Failed to render empty chart: {:?}", result.err());
        assert!(path.exists());
    }

    #[test]
    fn test_render_unrotated_labels_with_title() {
        let chart = spike_chart(LabelOffsets::flat(5.0));
        let style = ChartConfig {
            tick_label_rotation: 0,
            title: Some("Daily posts".to_string()),
            ..small_style()
        };

        assert!(chart.render_to_bytes(&style).is_ok());
    }

    #[test]
    fn test_render_into_missing_directory_fails() {
        let chart = spike_chart(LabelOffsets::flat(5.0));
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("chart.png");

        let err = chart.render_to_file(&small_style(), &path).unwrap_err();
        assert!(matches!(err, PostPeakError::Render { .. }));
    }
}
