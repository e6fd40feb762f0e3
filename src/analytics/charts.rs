use super::{correlation_matrix, mean_by, survival_grid};
use crate::constants::{EMBARKED, FARE, PCLASS, SURVIVAL_RATE};
use crate::error::{DataLakeError, Result};
use once_cell::sync::Lazy;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::DataFrame;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

// Dark shades of the Blues / Greens / Purples palettes
const BLUES: RGBColor = RGBColor(49, 130, 189);
const GREENS: RGBColor = RGBColor(49, 163, 84);
const PURPLES: RGBColor = RGBColor(117, 107, 177);
const MISSING_CELL: RGBColor = RGBColor(235, 235, 235);

/// Font for captions, axis labels and cell notes, registered as the sans-serif family
const CHART_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const CHART_FONT_FAMILY: &str = "sans-serif";

static FONT_REGISTERED: Lazy<bool> =
    Lazy::new(|| register_font(CHART_FONT_FAMILY, FontStyle::Normal, CHART_FONT).is_ok());

const BAR_SIZE: (u32, u32) = (800, 500);
const HEATMAP_SIZE: (u32, u32) = (600, 400);

pub const SURVIVAL_BY_CLASS_PNG: &str = "survival_rate_by_class.png";
pub const FARE_BY_CLASS_PNG: &str = "fare_by_class.png";
pub const SURVIVAL_BY_EMBARKED_PNG: &str = "survival_rate_by_embarked.png";
pub const CORRELATION_PNG: &str = "correlation_heatmap.png";
pub const SURVIVAL_HEATMAP_PNG: &str = "survival_rate_heatmap.png";

struct BarChart<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    bars: Vec<(String, f64)>,
    color: RGBColor,
}

struct Heatmap<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    x_labels: Vec<String>,
    y_labels: Vec<String>,
    /// `cells[y][x]`
    cells: Vec<Vec<Option<f64>>>,
    range: (f64, f64),
}

/// Make the bundled font available to plotters. Safe to call repeatedly.
pub fn register_chart_font() -> Result<()> {
    if *FONT_REGISTERED {
        Ok(())
    } else {
        Err(DataLakeError::Chart(
            "bundled chart font could not be loaded".to_string(),
        ))
    }
}

/// Render all charts of the transformed frame into `out_dir`.
pub fn render_charts(df: &DataFrame, out_dir: &Path) -> Result<Vec<PathBuf>> {
    register_chart_font()?;
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let bar_charts = [
        (
            SURVIVAL_BY_CLASS_PNG,
            BarChart {
                title: "Average Survival Rate by Passenger Class",
                x_desc: "Passenger Class",
                y_desc: "Survival Rate",
                bars: mean_by(df, PCLASS, SURVIVAL_RATE)?,
                color: BLUES,
            },
        ),
        (
            FARE_BY_CLASS_PNG,
            BarChart {
                title: "Average Fare by Passenger Class",
                x_desc: "Passenger Class",
                y_desc: "Fare",
                bars: mean_by(df, PCLASS, FARE)?,
                color: GREENS,
            },
        ),
        (
            SURVIVAL_BY_EMBARKED_PNG,
            BarChart {
                title: "Survival Rate by Embarkation Port",
                x_desc: "Embarked From",
                y_desc: "Survival Rate",
                bars: mean_by(df, EMBARKED, SURVIVAL_RATE)?,
                color: PURPLES,
            },
        ),
    ];
    for (file, chart) in &bar_charts {
        let path = out_dir.join(file);
        draw_bar_chart(&path, chart).map_err(chart_error)?;
        info!("Saved chart {}", path.display());
        written.push(path);
    }

    let corr_columns = [SURVIVAL_RATE, FARE];
    let corr = correlation_matrix(df, &corr_columns)?;
    let labels: Vec<String> = corr_columns.iter().map(|c| c.to_string()).collect();
    let correlation = Heatmap {
        title: "Correlation Heatmap",
        x_desc: "",
        y_desc: "",
        x_labels: labels.clone(),
        y_labels: labels,
        cells: corr
            .into_iter()
            .map(|row| row.into_iter().map(|v| (!v.is_nan()).then_some(v)).collect())
            .collect(),
        range: (-1.0, 1.0),
    };
    let path = out_dir.join(CORRELATION_PNG);
    draw_heatmap(&path, &correlation).map_err(chart_error)?;
    info!("Saved chart {}", path.display());
    written.push(path);

    let grid = survival_grid(df)?;
    let survival = Heatmap {
        title: "Survival Rate by Class and Port",
        x_desc: "Embarked From",
        y_desc: "Passenger Class",
        x_labels: grid.ports,
        y_labels: grid.classes,
        cells: grid.cells,
        range: (0.0, 1.0),
    };
    let path = out_dir.join(SURVIVAL_HEATMAP_PNG);
    draw_heatmap(&path, &survival).map_err(chart_error)?;
    info!("Saved chart {}", path.display());
    written.push(path);

    Ok(written)
}

fn chart_error(e: Box<dyn std::error::Error>) -> DataLakeError {
    DataLakeError::Chart(e.to_string())
}

/// Segment count for a discrete axis. A single category still gets a
/// two-segment axis so the coordinate range is never degenerate.
fn axis_end(count: usize) -> u32 {
    (count.max(2) - 1) as u32
}

fn draw_bar_chart(path: &Path, chart: &BarChart<'_>) -> DrawResult {
    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = chart.bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let y_min = chart.bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::min);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let labels: Vec<String> = chart.bars.iter().map(|(l, _)| l.clone()).collect();
    let label_for = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    let mut ctx = ChartBuilder::on(&root)
        .margin(20)
        .caption(chart.title, (CHART_FONT_FAMILY, 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..axis_end(chart.bars.len())).into_segmented(), y_min..y_top)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_desc)
        .y_desc(chart.y_desc)
        .x_labels(chart.bars.len().max(1))
        .x_label_formatter(&label_for)
        .draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(chart.color.filled())
            .margin(20)
            .data(chart.bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
    )?;

    root.present()?;
    Ok(())
}

/// Blue → grey → red, `t` in [0, 1]
fn coolwarm(t: f64) -> RGBColor {
    const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let (from, to, s) = if t < 0.5 { (COOL, MID, t * 2.0) } else { (MID, WARM, (t - 0.5) * 2.0) };
    let lerp = |a: f64, b: f64| (a + (b - a) * s).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

fn draw_heatmap(path: &Path, map: &Heatmap<'_>) -> DrawResult {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n_rows = map.y_labels.len();
    let (lo, hi) = map.range;

    let x_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            map.x_labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    // First row is drawn at the top
    let y_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => n_rows
            .checked_sub(1 + *i as usize)
            .and_then(|idx| map.y_labels.get(idx))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    let mut ctx = ChartBuilder::on(&root)
        .margin(15)
        .caption(map.title, (CHART_FONT_FAMILY, 22))
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(
            (0u32..axis_end(map.x_labels.len())).into_segmented(),
            (0u32..axis_end(n_rows)).into_segmented(),
        )?;

    ctx.configure_mesh()
        .disable_mesh()
        .x_desc(map.x_desc)
        .y_desc(map.y_desc)
        .x_labels(map.x_labels.len().max(1))
        .y_labels(n_rows.max(1))
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    let note_style = TextStyle::from((CHART_FONT_FAMILY, 18).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut tiles = Vec::new();
    let mut notes = Vec::new();
    for (r, row) in map.cells.iter().enumerate() {
        let y = (n_rows - 1 - r) as u32;
        for (c, cell) in row.iter().enumerate() {
            let x = c as u32;
            let fill = match cell {
                Some(v) => coolwarm((v - lo) / (hi - lo)),
                None => MISSING_CELL,
            };
            tiles.push(Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                fill.filled(),
            ));
            if let Some(v) = cell {
                notes.push(Text::new(
                    format!("{v:.2}"),
                    (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                    note_style.clone(),
                ));
            }
        }
    }
    ctx.draw_series(tiles)?;
    ctx.draw_series(notes)?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(0.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.5), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(f64::NAN), RGBColor(221, 221, 221));
    }

    #[test]
    fn bundled_font_registers() {
        assert!(register_chart_font().is_ok());
        assert!(register_chart_font().is_ok());
    }

    #[test]
    fn single_category_axis_is_not_degenerate() {
        assert_eq!(axis_end(0), 1);
        assert_eq!(axis_end(1), 1);
        assert_eq!(axis_end(3), 2);
    }
}
