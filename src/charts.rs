//! Renders the combined donation chart: a 7-day trend line next to a pie of
//! the per-charity 50%-allocated pool, as one PNG.
//!
//! Decimals are converted to floats here and nowhere else; pixel geometry
//! does not need exact arithmetic.
use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::reporting_service::{CharityBreakdown, DailyTotal};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 500;

const PALETTE: &[RGBColor] = &[
    RGBColor(102, 153, 255),
    RGBColor(255, 153, 102),
    RGBColor(102, 204, 153),
    RGBColor(204, 102, 204),
    RGBColor(255, 204, 102),
    RGBColor(153, 102, 255),
    RGBColor(102, 204, 255),
    RGBColor(255, 102, 153),
];

fn chart_err<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow!("chart rendering failed: {err}")
}

/// Render the composite chart and encode it as PNG bytes.
pub fn render_donation_charts(
    trend: &[DailyTotal],
    allocations: &[CharityBreakdown],
) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let (left, right) = root.split_horizontally((WIDTH / 2) as i32);
        draw_trend_chart(&left, trend)?;
        draw_split_chart(&right, allocations)?;

        root.present().map_err(chart_err)?;
    }
    encode_png(buffer)
}

fn draw_trend_chart(area: &DrawingArea<BitMapBackend, Shift>, trend: &[DailyTotal]) -> Result<()> {
    let max_total = trend
        .iter()
        .filter_map(|day| day.total.to_f64())
        .fold(0.0f64, f64::max);
    let y_max = if max_total <= 0.0 {
        1.0
    } else {
        max_total * 1.1
    };
    let x_max = trend.len().saturating_sub(1).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Donation Trend (Last 7 Days)", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(trend.len().max(2))
        .x_label_formatter(&|x| {
            let index = x.round() as usize;
            trend
                .get(index)
                .map(|day| day.date.format("%d-%m").to_string())
                .unwrap_or_default()
        })
        .y_desc("Total Donations")
        .draw()
        .map_err(chart_err)?;

    let points: Vec<(f64, f64)> = trend
        .iter()
        .enumerate()
        .map(|(index, day)| (index as f64, day.total.to_f64().unwrap_or(0.0)))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), &BLUE))
        .map_err(chart_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )
        .map_err(chart_err)?;

    Ok(())
}

fn draw_split_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    allocations: &[CharityBreakdown],
) -> Result<()> {
    let area = area
        .titled("Donation Split by Charity (50% allocated)", ("sans-serif", 22))
        .map_err(chart_err)?;

    let (labels, sizes): (Vec<String>, Vec<f64>) = if allocations.is_empty() {
        // Placeholder slice so the pie still renders with no confirmed
        // donations.
        (vec!["No Donations".to_string()], vec![1.0])
    } else {
        allocations
            .iter()
            .map(|a| {
                (
                    a.charity_name.clone(),
                    a.total_allocated.to_f64().unwrap_or(0.0),
                )
            })
            .unzip()
    };
    let colors: Vec<RGBColor> = (0..labels.len())
        .map(|index| PALETTE[index % PALETTE.len()])
        .collect();

    let (width, height) = area.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(("sans-serif", 16).into_font());
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    area.draw(&pie).map_err(chart_err)?;

    Ok(())
}

fn encode_png(buffer: Vec<u8>) -> Result<Vec<u8>> {
    let image = image::RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .context("chart buffer has unexpected size")?;
    let mut png = Vec::new();
    image.write_to(
        &mut Cursor::new(&mut png),
        image::ImageOutputFormat::Png,
    )?;
    Ok(png)
}
