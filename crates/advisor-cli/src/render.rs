//! Close-price chart rendering

use advisor_core::ChartData;
use anyhow::Result;
use chrono::Utc;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Where a rendered chart for `symbol` lands
pub fn chart_output_path(symbol: &str) -> PathBuf {
    std::env::temp_dir().join(format!("advisor_{}_{}.png", symbol, Utc::now().timestamp()))
}

/// Render the close-price line to a PNG file
pub fn render_png(chart: &ChartData, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("Chart render failed: {e}"))?;

    let (mut min, mut max) = (chart.min_price, chart.max_price);
    if (max - min).abs() < f64::EPSILON {
        // A flat series still needs a drawable y-range.
        min -= 1.0;
        max += 1.0;
    }
    let pad = (max - min) * 0.05;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0..chart.points.len(), (min - pad)..(max + pad))
        .map_err(|e| anyhow::anyhow!("Chart render failed: {e}"))?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .y_desc("Close")
        .draw()
        .map_err(|e| anyhow::anyhow!("Chart render failed: {e}"))?;

    ctx.draw_series(LineSeries::new(
        chart.points.iter().enumerate().map(|(i, p)| (i, p.close)),
        &BLUE,
    ))
    .map_err(|e| anyhow::anyhow!("Chart render failed: {e}"))?;

    root.present()
        .map_err(|e| anyhow::anyhow!("Chart render failed: {e}"))?;

    Ok(())
}
