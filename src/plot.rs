//! Rendering of FNC heatmaps and cohort trend bar charts to PNG files.
//!
//! Only available with the `plot` feature.

use log::warn;
use ndarray::{Array2, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::*;

use std::path::Path;

use crate::colormap::ColorRange;
use crate::error::{FncError, Result};
use crate::icn_table::NetworkLayout;
use crate::reorder::organize_ordered_map;
use crate::trends::{fnc_trend_stats, TrendStats};

const COLORBAR_WIDTH: u32 = 110;

/// Colorbar ticks of [`draw_ordered_map`].
pub const ORDERED_MAP_TICKS: [f64; 9] = [-1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0];


fn plot_err<E: std::fmt::Display>(err: E) -> FncError {
    FncError::Plot(err.to_string())
}


/// Settings for [`draw_heatmap`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapStyle {
    pub title: String,
    /// Color limits. Symmetric around 0 and derived from the data if `None`.
    pub range: Option<ColorRange>,
    pub show_boundaries: bool,
    pub boundary_width: u32,
    pub font_size: u32,
    pub title_size: u32,
    pub size: (u32, u32),
}

impl Default for HeatmapStyle {
    fn default() -> HeatmapStyle {
        HeatmapStyle {
            title: String::from("Network Connectivity Map"),
            range: None,
            show_boundaries: true,
            boundary_width: 2,
            font_size: 14,
            title_size: 20,
            size: (1000, 800),
        }
    }
}


/// Settings for [`draw_heatmap_batch`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStyle {
    pub heatmap: HeatmapStyle,
    pub rows: usize,
    pub cols: usize,
    /// Use one color range and one colorbar for all maps.
    pub single_colorbar: bool,
    /// Pixel size of one map panel.
    pub panel_size: (u32, u32),
}

impl Default for BatchStyle {
    fn default() -> BatchStyle {
        BatchStyle {
            heatmap: HeatmapStyle::default(),
            rows: 2,
            cols: 3,
            single_colorbar: false,
            panel_size: (550, 450),
        }
    }
}


/// Draw a matrix as heatmap into the area, with network boundaries and network tick labels.
fn draw_map_on<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    matrix: &ArrayView2<f64>,
    layout: Option<&NetworkLayout>,
    title: &str,
    range: &ColorRange,
    style: &HeatmapStyle,
) -> Result<()> {
    let (rows, cols) = matrix.dim();
    let (nr, nc) = (rows as f64, cols as f64);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", style.title_size as f64).into_font())
        .margin(10)
        .x_label_area_size(style.font_size * 3)
        .y_label_area_size(style.font_size * 3)
        .build_cartesian_2d(0f64..nc, 0f64..nr)
        .map_err(plot_err)?;

    // Row 0 is drawn at the top.
    chart
        .draw_series(matrix.indexed_iter().filter_map(|((i, j), v)| {
            range.color(*v).map(|[r, g, b]| {
                Rectangle::new(
                    [(j as f64, nr - i as f64), (j as f64 + 1.0, nr - i as f64 - 1.0)],
                    RGBColor(r, g, b).filled(),
                )
            })
        }))
        .map_err(plot_err)?;

    let layout = match layout {
        Some(layout) => layout,
        None => return Ok(()),
    };

    if style.show_boundaries {
        let line_style = BLACK.stroke_width(style.boundary_width);
        for b in layout.boundaries() {
            let b = b as f64;
            chart
                .draw_series(vec![
                    PathElement::new(vec![(b, 0.0), (b, nr)], line_style),
                    PathElement::new(vec![(0.0, nr - b), (nc, nr - b)], line_style),
                ])
                .map_err(plot_err)?;
        }
    }

    let base = area.get_base_pixel();
    let font = ("sans-serif", style.font_size as f64).into_font().color(&BLACK);
    for (pos, label) in layout.tick_positions().iter().zip(layout.abbreviations()) {
        let (bx, by) = chart.backend_coord(&(*pos, 0.0));
        area.draw(&Text::new(label.clone(), (bx - base.0 - 8, by - base.1 + 6), font.clone()))
            .map_err(plot_err)?;
        let (bx, by) = chart.backend_coord(&(0.0, nr - *pos));
        area.draw(&Text::new(label, (bx - base.0 - 3 * style.font_size as i32, by - base.1 - 6), font.clone()))
            .map_err(plot_err)?;
    }
    Ok(())
}


/// Draw a vertical colorbar for the range into the area.
///
/// Tick positions are chosen by plotters unless `ticks` is given; ticks outside the range are skipped.
fn draw_colorbar_on<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    range: &ColorRange,
    font_size: u32,
    ticks: Option<&[f64]>,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(40)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, range.min..range.max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(if ticks.is_some() { 0 } else { 9 })
        .y_label_formatter(&|v| format!("{:.2}", v))
        .y_label_style(("sans-serif", font_size.saturating_sub(2).max(8) as f64).into_font())
        .draw()
        .map_err(plot_err)?;

    let steps = 256;
    let step = (range.max - range.min) / steps as f64;
    chart
        .draw_series((0..steps).filter_map(|s| {
            let lo = range.min + s as f64 * step;
            range.color(lo + step / 2.0).map(|[r, g, b]| {
                Rectangle::new([(0.0, lo), (1.0, lo + step)], RGBColor(r, g, b).filled())
            })
        }))
        .map_err(plot_err)?;

    let ticks = match ticks {
        Some(ticks) => ticks,
        None => return Ok(()),
    };
    let base = area.get_base_pixel();
    let font = ("sans-serif", font_size.saturating_sub(2).max(8) as f64).into_font().color(&BLACK);
    for tick in ticks.iter().filter(|t| **t >= range.min && **t <= range.max) {
        let (bx, by) = chart.backend_coord(&(0.0, *tick));
        let (x, y) = (bx - base.0, by - base.1);
        area.draw(&PathElement::new(vec![(x - 5, y), (x, y)], BLACK.stroke_width(1)))
            .map_err(plot_err)?;
        area.draw(&Text::new(format!("{:.2}", tick), (x - 50, y - 6), font.clone()))
            .map_err(plot_err)?;
    }
    Ok(())
}


/// Render a single FNC matrix as heatmap PNG with a colorbar.
///
/// If a network layout is given, network boundaries and network abbreviations are drawn. The
/// matrix is expected to be in network order, see [`crate::NetworkReorderer`].
pub fn draw_heatmap<P: AsRef<Path>>(
    matrix: ArrayView2<f64>,
    layout: Option<&NetworkLayout>,
    style: &HeatmapStyle,
    path: P,
) -> Result<()> {
    let range = style.range.unwrap_or_else(|| ColorRange::symmetric_for(&matrix));

    let root = BitMapBackend::new(path.as_ref(), style.size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (map_area, bar_area) = root.split_horizontally(style.size.0.saturating_sub(COLORBAR_WIDTH));

    draw_map_on(&map_area, &matrix, layout, &style.title, &range, style)?;
    draw_colorbar_on(&bar_area, &range, style.font_size, None)?;
    root.present().map_err(plot_err)?;
    Ok(())
}


/// Render a network-ordered FNC matrix restricted to the networks of the layout.
///
/// The matrix is organized with [`organize_ordered_map`] first: cells outside of the layout's
/// networks become 0 and the upper triangle is mirrored into the lower one. The colorbar shows
/// the fixed [`ORDERED_MAP_TICKS`]; the color range defaults to (-1, 1). Returns the organized matrix.
pub fn draw_ordered_map<P: AsRef<Path>>(
    matrix: ArrayView2<f64>,
    layout: &NetworkLayout,
    style: &HeatmapStyle,
    path: P,
) -> Result<Array2<f64>> {
    let organized = organize_ordered_map(matrix, layout)?;
    let range = style.range.unwrap_or_default();

    let root = BitMapBackend::new(path.as_ref(), style.size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (map_area, bar_area) = root.split_horizontally(style.size.0.saturating_sub(COLORBAR_WIDTH));

    draw_map_on(&map_area, &organized.view(), Some(layout), &style.title, &range, style)?;
    draw_colorbar_on(&bar_area, &range, style.font_size, Some(&ORDERED_MAP_TICKS[..]))?;
    root.present().map_err(plot_err)?;
    Ok(organized)
}


/// Render several FNC matrices as a grid of heatmaps into one PNG.
///
/// Maps beyond `rows * cols` are skipped. Titles default to "Map 1", "Map 2", ...
pub fn draw_heatmap_batch<P: AsRef<Path>>(
    matrices: &[Array2<f64>],
    titles: Option<&[String]>,
    layout: Option<&NetworkLayout>,
    style: &BatchStyle,
    path: P,
) -> Result<()> {
    let capacity = style.rows * style.cols;
    if capacity == 0 {
        return Err(FncError::Plot(String::from("the grid must have at least one row and one column")));
    }
    if matrices.len() > capacity {
        warn!("Only showing the first {} of {} maps.", capacity, matrices.len());
    }

    let bar_width = if style.single_colorbar { COLORBAR_WIDTH } else { 0 };
    let width = style.panel_size.0 * style.cols as u32 + bar_width;
    let height = style.panel_size.1 * style.rows as u32;

    let shared_range = match (style.heatmap.range, style.single_colorbar) {
        (Some(range), _) => Some(range),
        (None, true) => Some(ColorRange::symmetric_for_all(matrices.iter())),
        (None, false) => None,
    };

    let root = BitMapBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (grid_area, bar_area) = root.split_horizontally(width - bar_width);

    let panels = grid_area.split_evenly((style.rows, style.cols));
    for (idx, (matrix, panel)) in matrices.iter().zip(panels.iter()).enumerate() {
        let title = titles
            .and_then(|t| t.get(idx).cloned())
            .unwrap_or_else(|| format!("Map {}", idx + 1));
        let range = shared_range.unwrap_or_else(|| ColorRange::symmetric_for(matrix));

        if style.single_colorbar {
            draw_map_on(panel, &matrix.view(), layout, &title, &range, &style.heatmap)?;
        } else {
            let panel_width = panel.dim_in_pixel().0;
            let (map_area, panel_bar) = panel.split_horizontally(panel_width.saturating_sub(COLORBAR_WIDTH * 2 / 3));
            draw_map_on(&map_area, &matrix.view(), layout, &title, &range, &style.heatmap)?;
            draw_colorbar_on(&panel_bar, &range, style.heatmap.font_size, None)?;
        }
    }

    if let (true, Some(range)) = (style.single_colorbar, shared_range) {
        draw_colorbar_on(&bar_area, &range, style.heatmap.font_size, None)?;
    }
    root.present().map_err(plot_err)?;
    Ok(())
}


/// Settings for [`draw_fnc_trends`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendStyle {
    pub label_a: String,
    pub label_b: String,
    pub size: (u32, u32),
}

impl Default for TrendStyle {
    fn default() -> TrendStyle {
        TrendStyle {
            label_a: String::from("HC"),
            label_b: String::from("SZ"),
            size: (1200, 600),
        }
    }
}


/// Draw a grouped bar chart comparing the FNC of one component pair between two cohorts.
///
/// `cohort_a` and `cohort_b` have shape (subjects, windows); `window_labels` names the windows
/// on the x axis. Bars show the cohort means, error bars the standard errors. Returns the
/// per-window statistics, see [`fnc_trend_stats`].
pub fn draw_fnc_trends<P: AsRef<Path>>(
    window_labels: &[String],
    cohort_a: ArrayView2<f64>,
    cohort_b: ArrayView2<f64>,
    components: (usize, usize),
    style: &TrendStyle,
    path: P,
) -> Result<TrendStats> {
    let stats = fnc_trend_stats(cohort_a, cohort_b)?;
    let num_windows = stats.num_windows();
    if window_labels.len() != num_windows {
        return Err(FncError::WindowCountMismatch { a: window_labels.len(), b: num_windows });
    }

    let extent = |mean: f64, sem: f64| if sem.is_finite() { (mean - sem, mean + sem) } else { (mean, mean) };
    let (mut y_min, mut y_max) = (0f64, 0f64);
    for w in 0..num_windows {
        for (lo, hi) in [extent(stats.mean_a[w], stats.sem_a[w]), extent(stats.mean_b[w], stats.sem_b[w])].iter() {
            y_min = y_min.min(*lo);
            y_max = y_max.max(*hi);
        }
    }
    let pad = ((y_max - y_min) * 0.1).max(1e-3);

    let root = BitMapBackend::new(path.as_ref(), style.size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let title = format!("Component {} to Component {}", components.0, components.1);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30.0).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(num_windows as f64 - 0.5), (y_min - pad)..(y_max + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time Windows")
        .y_desc("Correlation")
        .x_labels(num_windows)
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                window_labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(plot_err)?;

    let width = 0.35;
    let cohorts = [
        (&stats.mean_a, &stats.sem_a, -width, BLUE, style.label_a.clone()),
        (&stats.mean_b, &stats.sem_b, 0.0, RED, style.label_b.clone()),
    ];
    for (means, sems, offset, color, label) in cohorts.iter() {
        let (offset, color) = (*offset, *color);
        chart
            .draw_series((0..num_windows).map(|w| {
                let x0 = w as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + width, means[w])], color.filled())
            }))
            .map_err(plot_err)?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));

        chart
            .draw_series((0..num_windows).filter(|w| sems[*w].is_finite()).map(|w| {
                let x = w as f64 + offset + width / 2.0;
                ErrorBar::new_vertical(x, means[w] - sems[w], means[w], means[w] + sems[w], BLACK.filled(), 10)
            }))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(stats)
}
