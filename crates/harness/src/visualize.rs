// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

//! Charts for the state-overhead study.
//!
//! Timelines of different runs have different lengths and sample times, so each run is first
//! resampled onto a fixed number of evenly spaced points over its own time range. The
//! resampled runs of one configuration are then averaged point-wise.

use crate::{
    catalog::{config_color, RUN_CONFIGS},
    result::RunResult,
};
use benchutil::Marker;
use eyre::{eyre, Result};
use plotters::prelude::*;
use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const TIMELINE_POINTS: usize = 20;
/// Stand-in for runs that hit the deadline. Not a measurement.
pub const TIMEOUT_SENTINEL_SECS: f64 = 600.;

pub const TIMELINE_PLOT: &str = "state_corpus_timeline.png";
pub const MEMORY_PLOT: &str = "memory_comparison.png";
pub const DETECTION_PLOT: &str = "detection_time_comparison.png";

const PLOT_SIZE: (u32, u32) = (1200, 600);
const FONT_FAMILY: &str = "sans-serif";
const FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const BAR_WIDTH: f64 = 0.25;
/// Lower bound of the log axis; smaller corpus sizes are drawn on it.
const LOG_FLOOR: f64 = 1.;

type Series = Vec<(f64, f64)>;
/// project -> config -> value
pub type Grouped = BTreeMap<String, BTreeMap<String, f64>>;

/// Results written by the state-overhead runner. A missing or blank file is not an error.
pub fn load_metrics(path: &Path) -> io::Result<Vec<RunResult>> {
    if !path.exists() {
        warn!("{} Metrics file not found: {}", Marker::Fail, path.display());
        return Ok(vec![]);
    }
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        warn!("{} Metrics file is empty: {}", Marker::Fail, path.display());
        return Ok(vec![]);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Makes the bundled font available to the bitmap backend under the family the charts use.
fn register_font() -> Result<()> {
    plotters::style::register_font(FONT_FAMILY, plotters::style::FontStyle::Normal, FONT)
        .map_err(|_| eyre!("bundled chart font is not a valid OpenType font"))
}

/// Linear interpolation over `points`, which must be sorted by x.
/// Outside the sampled range the nearest end value is returned.
pub fn interpolate(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let (first, last) = (points.first()?, points.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    let upper = points.partition_point(|p| p.0 <= x);
    let (x0, y0) = points[upper - 1];
    let (x1, y1) = points[upper];
    if x1 == x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

/// `count` evenly spaced points from zero to the latest sample time.
pub fn resample(points: &[(f64, f64)], count: usize) -> Series {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let Some(max_time) = sorted.last().map(|p| p.0) else {
        return vec![];
    };

    (0..count)
        .filter_map(|i| {
            let x = match count {
                1 => 0.,
                _ => max_time * i as f64 / (count - 1) as f64,
            };
            interpolate(&sorted, x).map(|y| (x, y))
        })
        .collect()
}

/// Point-wise mean of equally long series.
pub fn average_timelines(series: &[Series]) -> Series {
    let Some(len) = series.iter().map(Vec::len).min() else {
        return vec![];
    };
    let n = series.len() as f64;
    (0..len)
        .map(|i| {
            let x = series.iter().map(|s| s[i].0).sum::<f64>() / n;
            let y = series.iter().map(|s| s[i].1).sum::<f64>() / n;
            (x, y)
        })
        .collect()
}

/// Averaged corpus-size timeline per configuration. Samples without a corpus size are skipped.
pub fn timelines_by_config(results: &[RunResult]) -> BTreeMap<String, Series> {
    let mut runs: BTreeMap<String, Vec<Series>> = BTreeMap::new();
    for result in results {
        let points: Series = result
            .metrics_timeline
            .iter()
            .filter_map(|s| s.corpus_size.map(|size| (s.timestamp, size as f64)))
            .collect();
        if points.is_empty() {
            continue;
        }
        runs.entry(result.config.clone())
            .or_default()
            .push(resample(&points, TIMELINE_POINTS));
    }
    runs.into_iter()
        .map(|(config, series)| (config, average_timelines(&series)))
        .collect()
}

pub fn parse_detection_secs(result: &RunResult) -> f64 {
    result
        .detection_time
        .map_or(0., |time| time.as_secs(TIMEOUT_SENTINEL_SECS))
}

pub fn final_memory(result: &RunResult) -> f64 {
    result
        .summary
        .as_ref()
        .and_then(|summary| summary.final_memory_mb)
        .unwrap_or(0.)
}

/// Groups one scalar per (contract, config). A later result for the same pair wins.
pub fn group_by_project(results: &[RunResult], value: impl Fn(&RunResult) -> f64) -> Grouped {
    let mut grouped = Grouped::new();
    for result in results {
        grouped
            .entry(result.project.clone())
            .or_default()
            .insert(result.config.clone(), value(result));
    }
    grouped
}

fn rgb(config: &str) -> RGBColor {
    let (r, g, b) = config_color(config);
    RGBColor(r, g, b)
}

pub fn plot_timeline(path: &Path, timelines: &BTreeMap<String, Series>) -> Result<()> {
    let points = timelines.values().flatten();
    let max_time = points.clone().map(|p| p.0).fold(1., f64::max);
    let max_size = points.map(|p| p.1).fold(LOG_FLOOR, f64::max);

    register_font()?;
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("RQ3: Infant State Corpus Storage Overhead", (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..max_time, (LOG_FLOOR..max_size * 2.).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Infant State Corpus Size")
        .draw()?;

    for (config, series) in timelines {
        let color = rgb(config);
        let series: Series = series.iter().map(|&(t, s)| (t, s.max(LOG_FLOOR))).collect();
        chart
            .draw_series(LineSeries::new(series.clone(), color.stroke_width(3)))?
            .label(config.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
        chart.draw_series(series.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn label_at(projects: &[&String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0. || index as usize >= projects.len() {
        return String::new();
    }
    projects[index as usize].clone()
}

/// One group of bars per contract, one bar per catalog configuration.
pub fn plot_grouped_bars(path: &Path, title: &str, y_desc: &str, values: &Grouped) -> Result<()> {
    let projects: Vec<&String> = values.keys().collect();
    let y_max = values
        .values()
        .flat_map(|configs| configs.values())
        .copied()
        .fold(1., f64::max)
        * 1.1;
    let center = (RUN_CONFIGS.len() as f64 - 1.) / 2.;

    register_font()?;
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..projects.len() as f64 - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(projects.len())
        .x_label_formatter(&|x| label_at(&projects, *x))
        .x_desc("Smart Contract")
        .y_desc(y_desc)
        .draw()?;

    for (i, config) in RUN_CONFIGS.iter().enumerate() {
        let color = rgb(config.name);
        let offset = (i as f64 - center) * BAR_WIDTH;
        chart
            .draw_series(projects.iter().enumerate().map(|(p, project)| {
                let value = values[*project].get(config.name).copied().unwrap_or(0.);
                let x = p as f64 + offset;
                Rectangle::new(
                    [(x - BAR_WIDTH / 2., 0.), (x + BAR_WIDTH / 2., value)],
                    color.mix(0.8).filled(),
                )
            }))?
            .label(config.name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Renders every chart into `plots_dir` and returns the files written.
/// Nothing is written when there are no metrics.
pub fn generate_all(metrics_path: &Path, plots_dir: &Path) -> Result<Vec<PathBuf>> {
    let results = load_metrics(metrics_path)?;
    if results.is_empty() {
        warn!("{} No metrics to visualize", Marker::Fail);
        return Ok(vec![]);
    }
    fs::create_dir_all(plots_dir)?;
    let mut written = vec![];

    info!("{} Generating state corpus timeline plot...", Marker::Step);
    let timelines = timelines_by_config(&results);
    if timelines.is_empty() {
        warn!("{} No timeline data to plot", Marker::Fail);
    } else {
        let path = plots_dir.join(TIMELINE_PLOT);
        plot_timeline(&path, &timelines)?;
        info!("{} Plot saved: {}", Marker::Done, path.display());
        written.push(path);
    }

    info!("{} Generating memory usage comparison plot...", Marker::Step);
    let path = plots_dir.join(MEMORY_PLOT);
    let memory = group_by_project(&results, final_memory);
    plot_grouped_bars(&path, "RQ3: Memory Overhead Comparison", "Memory Usage (MB)", &memory)?;
    info!("{} Plot saved: {}", Marker::Done, path.display());
    written.push(path);

    info!("{} Generating detection time comparison plot...", Marker::Step);
    let path = plots_dir.join(DETECTION_PLOT);
    let detection = group_by_project(&results, parse_detection_secs);
    plot_grouped_bars(
        &path,
        "RQ3: Vulnerability Detection Time Comparison",
        "Detection Time (seconds)",
        &detection,
    )?;
    info!("{} Plot saved: {}", Marker::Done, path.display());
    written.push(path);

    Ok(written)
}
