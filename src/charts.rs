//! Chart rendering: aggregated series in, fixed-size PNG files out
//!
//! Every chart is 640x480 and named by its human-readable title. Bar/line
//! charts carry tweet counts on the left axis and trimmed-mean engagement
//! on a secondary right axis, matching the reporting layout.

use crate::aggregator::{self, DayBucket, GroupStats};
use crate::config::{CHART_HEIGHT, CHART_WIDTH, TOP_HASHTAGS};
use crate::domain::Tweet;
use plotters::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const BAR_COLOR: RGBColor = RGBColor(79, 129, 189);
const LINE_COLOR: RGBColor = RGBColor(192, 80, 77);

const PIE_PALETTE: [RGBColor; 10] = [
    RGBColor(79, 129, 189),
    RGBColor(192, 80, 77),
    RGBColor(155, 187, 89),
    RGBColor(128, 100, 162),
    RGBColor(75, 172, 198),
    RGBColor(247, 150, 70),
    RGBColor(119, 44, 42),
    RGBColor(77, 93, 83),
    RGBColor(165, 165, 165),
    RGBColor(54, 96, 146),
];

/// Render the full fixed chart set into `charts_dir`.
pub fn draw_charts(
    tweets: &[Tweet],
    charts_dir: &Path,
    drop_percentage: f64,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(charts_dir)?;

    draw_thread_length_chart(tweets, charts_dir, drop_percentage)?;
    draw_media_pie(tweets, charts_dir)?;
    draw_hashtags_pie(tweets, charts_dir)?;

    for bucket in DayBucket::all() {
        let bucket_tweets = aggregator::bucket_tweets(tweets, bucket);
        let report = aggregator::by_hour(&bucket_tweets, drop_percentage);
        let title = format!("ניתוח ציוצים ל{}", bucket.label());
        let labels: Vec<String> = (0..24).map(|hour| format!("{:02}", hour)).collect();
        draw_count_and_engagement_chart(
            &chart_path(charts_dir, &title),
            &title,
            "שעת הציוץ",
            &labels,
            &report,
        )?;
    }
    Ok(())
}

fn chart_path(charts_dir: &Path, title: &str) -> PathBuf {
    charts_dir.join(format!("{}.png", title))
}

fn draw_thread_length_chart(
    tweets: &[Tweet],
    charts_dir: &Path,
    drop_percentage: f64,
) -> Result<(), Box<dyn Error>> {
    let rows = aggregator::by_thread_length(tweets, drop_percentage);
    let title = "ניתוח ציוצים לפי אורך השרשור";
    if rows.is_empty() {
        log::warn!("No threads longer than 2 tweets; skipping {:?}", title);
        return Ok(());
    }
    let labels: Vec<String> = rows.iter().map(|(length, _)| length.to_string()).collect();
    let stats: Vec<GroupStats> = rows.iter().map(|(_, stats)| *stats).collect();
    draw_count_and_engagement_chart(
        &chart_path(charts_dir, title),
        title,
        "אורך השרשור",
        &labels,
        &stats,
    )
}

fn draw_media_pie(tweets: &[Tweet], charts_dir: &Path) -> Result<(), Box<dyn Error>> {
    let slices: Vec<(String, usize)> = aggregator::media_type_counts(tweets)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(media_type, count)| (media_type.display_name().to_string(), count))
        .collect();
    let title = "התפלגות ציוצים לפי מדיה מצורפת";
    draw_pie(&chart_path(charts_dir, title), title, &slices, true)
}

fn draw_hashtags_pie(tweets: &[Tweet], charts_dir: &Path) -> Result<(), Box<dyn Error>> {
    let slices = aggregator::top_hashtags(tweets, TOP_HASHTAGS);
    let title = "מספר המופעים של 20 ההאשטגים המובילים";
    draw_pie(&chart_path(charts_dir, title), title, &slices, false)
}

/// Bars (tweet count, left axis) plus a line (trimmed-mean engagement,
/// right axis) over one labeled category per entry.
fn draw_count_and_engagement_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    labels: &[String],
    stats: &[GroupStats],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = stats.iter().map(|s| s.count).max().unwrap_or(0).max(1) as f64;
    let max_engagement = stats
        .iter()
        .map(|s| s.avg_engagement)
        .filter(|rate| rate.is_finite())
        .fold(0.0f64, f64::max)
        .max(1.0);
    let n = stats.len() as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n - 0.5), 0.0f64..max_count * 1.1)?
        .set_secondary_coord(-0.5f64..(n - 0.5), 0.0f64..max_engagement * 1.1);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().min(24))
        .x_label_formatter(&|x| {
            let index = x.round();
            if index < 0.0 {
                return String::new();
            }
            labels.get(index as usize).cloned().unwrap_or_default()
        })
        .x_desc(x_desc)
        .y_desc("מספר הציוצים")
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("מדד היעילות הממוצע")
        .draw()?;

    chart.draw_series(stats.iter().enumerate().map(|(i, s)| {
        Rectangle::new(
            [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, s.count as f64)],
            BAR_COLOR.mix(0.6).filled(),
        )
    }))?;

    chart.draw_secondary_series(LineSeries::new(
        stats
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.avg_engagement)),
        &LINE_COLOR,
    ))?;

    root.present()?;
    log::info!("Chart written: {}", path.display());
    Ok(())
}

fn draw_pie(
    path: &Path,
    title: &str,
    slices: &[(String, usize)],
    show_percentages: bool,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 22))?;

    let total: usize = slices.iter().map(|(_, count)| count).sum();
    if total == 0 {
        log::warn!("No data for {:?}; leaving an empty chart", title);
        root.present()?;
        return Ok(());
    }

    let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count as f64).collect();
    let labels: Vec<String> = slices
        .iter()
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect();
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|i| PIE_PALETTE[i % PIE_PALETTE.len()])
        .collect();

    let center = ((CHART_WIDTH / 2) as i32, (CHART_HEIGHT / 2) as i32);
    let radius = CHART_HEIGHT as f64 * 0.32;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
    if show_percentages {
        pie.percentages(("sans-serif", 12).into_font().color(&BLACK));
    }
    root.draw(&pie)?;

    root.present()?;
    log::info!("Chart written: {}", path.display());
    Ok(())
}
