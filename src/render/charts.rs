use std::fs;
use std::io::Cursor;
use std::path::Path;

use chrono::DateTime;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

use super::{ChartKind, ChartRenderer, PlotMetadata, RenderError};
use crate::dataset::ConsolidatedDataset;

struct ChartStyle;

impl ChartStyle {
    const FONT_FAMILY: &'static str = "sans-serif";
    const CAPTION_FONT_SIZE: i32 = 24;
    const NO_DATA_FONT_SIZE: i32 = 20;
    const LABEL_AREA_SIZE: u32 = 48;
    const X_LABEL_COUNT: usize = 6;
    const Y_LABEL_COUNT: usize = 6;
    const BACKGROUND: RGBColor = WHITE;
    const AREA_ALPHA: f64 = 0.6;

    fn series_color(index: usize) -> RGBColor {
        let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
        RGBColor(r, g, b)
    }
}

/// Default rasterization backend: draws into an RGB buffer and writes the
/// encoded PNG to the artifact path.
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render(
        &self,
        kind: ChartKind,
        path: &Path,
        dataset: &ConsolidatedDataset,
        metadata: &PlotMetadata,
    ) -> Result<(), RenderError> {
        let width = metadata.width.max(1);
        let height = metadata.height.max(1);
        let mut rgb_buffer = vec![255u8; width as usize * height as usize * 3];

        {
            let drawing_area =
                BitMapBackend::with_buffer(&mut rgb_buffer, (width, height)).into_drawing_area();
            drawing_area
                .fill(&ChartStyle::BACKGROUND)
                .map_err(backend_error)?;

            match kind {
                ChartKind::NoData => draw_no_data(&drawing_area)?,
                ChartKind::StackedBar => draw_stacked(&drawing_area, dataset, metadata, true)?,
                ChartKind::StackedLine => draw_stacked(&drawing_area, dataset, metadata, false)?,
                ChartKind::Cumulative => {
                    let accumulated = dataset.accumulated();
                    draw_stacked(&drawing_area, &accumulated, metadata, false)?;
                }
                ChartKind::Pie => draw_pie(&drawing_area, dataset, metadata)?,
                ChartKind::Quality => draw_quality(&drawing_area, dataset, metadata)?,
            }

            drawing_area.present().map_err(backend_error)?;
        }

        write_png(path, width, height, rgb_buffer)
    }
}

fn draw_no_data(area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), RenderError> {
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        "no data available",
        ((width / 2) as i32 - 70, (height / 2) as i32 - 10),
        (ChartStyle::FONT_FAMILY, ChartStyle::NO_DATA_FONT_SIZE),
    ))
    .map_err(backend_error)?;
    Ok(())
}

fn draw_stacked(
    area: &DrawingArea<BitMapBackend, Shift>,
    dataset: &ConsolidatedDataset,
    metadata: &PlotMetadata,
    bars: bool,
) -> Result<(), RenderError> {
    let keys: Vec<String> = dataset.series_keys().map(str::to_string).collect();
    let epochs = dataset.epochs();
    let (Some(&x_start), Some(&x_last)) = (epochs.first(), epochs.last()) else {
        return draw_no_data(area);
    };
    let span = metadata
        .span_secs
        .unwrap_or_else(|| infer_span(&epochs))
        .max(1);
    let x_end = x_last + span;

    // per-series stacking bands: (epoch, lower, upper)
    let mut bands: Vec<Vec<(i64, f64, f64)>> = Vec::with_capacity(keys.len());
    let mut running: std::collections::BTreeMap<i64, f64> =
        epochs.iter().map(|&epoch| (epoch, 0.0)).collect();
    for key in &keys {
        let mut band = Vec::with_capacity(epochs.len());
        for &epoch in &epochs {
            let lower = running.get(&epoch).copied().unwrap_or(0.0);
            let upper = lower + dataset.get(key, epoch).unwrap_or(0.0);
            running.insert(epoch, upper);
            band.push((epoch, lower, upper));
        }
        bands.push(band);
    }

    let stack_max = running.values().copied().fold(0.0, f64::max);
    let y_max = if stack_max > 0.0 { stack_max * 1.05 } else { 1.0 };

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(metadata.padding)
        .x_label_area_size(ChartStyle::LABEL_AREA_SIZE)
        .y_label_area_size(ChartStyle::LABEL_AREA_SIZE);
    if let Some(title) = &metadata.title {
        builder.caption(
            title,
            (ChartStyle::FONT_FAMILY, ChartStyle::CAPTION_FONT_SIZE),
        );
    }
    let mut chart = builder
        .build_cartesian_2d(x_start..x_end, 0.0..y_max)
        .map_err(backend_error)?;

    let x_formatter = |epoch: &i64| format_epoch_label(*epoch);
    let mut mesh = chart.configure_mesh();
    mesh.x_labels(ChartStyle::X_LABEL_COUNT)
        .y_labels(ChartStyle::Y_LABEL_COUNT)
        .x_label_formatter(&x_formatter);
    if let Some(ylabel) = &metadata.ylabel {
        mesh.y_desc(ylabel.as_str());
    }
    if let Some(xlabel) = &metadata.xlabel {
        mesh.x_desc(xlabel.as_str());
    }
    mesh.draw().map_err(backend_error)?;

    // areas are painted coarsest cumulative first so every band keeps its
    // own color; bars have disjoint bands and draw in key order
    let order: Vec<usize> = if bars {
        (0..keys.len()).collect()
    } else {
        (0..keys.len()).rev().collect()
    };
    let bar_width = (span * 9 / 10).max(1);

    for index in order {
        let color = ChartStyle::series_color(index);
        let band = &bands[index];
        let series = if bars {
            chart.draw_series(band.iter().map(|&(epoch, lower, upper)| {
                Rectangle::new([(epoch, lower), (epoch + bar_width, upper)], color.filled())
            }))
        } else {
            chart.draw_series(AreaSeries::new(
                band.iter().map(|&(epoch, _, upper)| (epoch, upper)),
                0.0,
                color.mix(ChartStyle::AREA_ALPHA),
            ))
        };
        series
            .map_err(backend_error)?
            .label(keys[index].clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if metadata.legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(backend_error)?;
    }
    Ok(())
}

fn draw_pie(
    area: &DrawingArea<BitMapBackend, Shift>,
    dataset: &ConsolidatedDataset,
    metadata: &PlotMetadata,
) -> Result<(), RenderError> {
    let totals: Vec<(String, f64)> = dataset
        .series_totals()
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(key, total)| (key.to_string(), total))
        .collect();
    if totals.is_empty() {
        return draw_no_data(area);
    }

    let (width, height) = area.dim_in_pixel();
    if let Some(title) = &metadata.title {
        area.draw(&Text::new(
            title.clone(),
            ((width / 2) as i32 - (title.len() as i32 * 5), 10),
            (ChartStyle::FONT_FAMILY, ChartStyle::CAPTION_FONT_SIZE),
        ))
        .map_err(backend_error)?;
    }

    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = ((width.min(height) as f64) / 2.0 - metadata.padding as f64).max(10.0);
    let sizes: Vec<f64> = totals.iter().map(|(_, total)| *total).collect();
    let colors: Vec<RGBColor> = (0..totals.len()).map(ChartStyle::series_color).collect();
    let labels: Vec<String> = totals.iter().map(|(key, _)| key.clone()).collect();

    let pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    area.draw(&pie).map_err(backend_error)?;
    Ok(())
}

fn draw_quality(
    area: &DrawingArea<BitMapBackend, Shift>,
    dataset: &ConsolidatedDataset,
    metadata: &PlotMetadata,
) -> Result<(), RenderError> {
    let keys: Vec<String> = dataset.series_keys().map(str::to_string).collect();
    let epochs = dataset.epochs();
    let (Some(&x_start), Some(&x_last)) = (epochs.first(), epochs.last()) else {
        return draw_no_data(area);
    };
    let span = metadata
        .span_secs
        .unwrap_or_else(|| infer_span(&epochs))
        .max(1);
    let x_end = x_last + span;
    let rows = keys.len() as i32;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(metadata.padding)
        .x_label_area_size(ChartStyle::LABEL_AREA_SIZE)
        .y_label_area_size(ChartStyle::LABEL_AREA_SIZE * 2);
    if let Some(title) = &metadata.title {
        builder.caption(
            title,
            (ChartStyle::FONT_FAMILY, ChartStyle::CAPTION_FONT_SIZE),
        );
    }
    let mut chart = builder
        .build_cartesian_2d(x_start..x_end, 0..rows)
        .map_err(backend_error)?;

    let x_formatter = |epoch: &i64| format_epoch_label(*epoch);
    let y_formatter = |row: &i32| keys.get(*row as usize).cloned().unwrap_or_default();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(ChartStyle::X_LABEL_COUNT)
        .y_labels(keys.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()
        .map_err(backend_error)?;

    let mut tiles = Vec::new();
    for (row, key) in keys.iter().enumerate() {
        for &epoch in &epochs {
            if let Some(value) = dataset.get(key, epoch) {
                tiles.push(Rectangle::new(
                    [(epoch, row as i32), (epoch + span, row as i32 + 1)],
                    quality_color(value).filled(),
                ));
            }
        }
    }
    chart.draw_series(tiles).map_err(backend_error)?;
    Ok(())
}

/// Red at 0, green at 100.
fn quality_color(value: f64) -> RGBColor {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    RGBColor((220.0 * (1.0 - ratio)) as u8 + 35, (200.0 * ratio) as u8, 40)
}

fn infer_span(epochs: &[i64]) -> i64 {
    epochs
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0)
        .min()
        .unwrap_or(3600)
}

fn format_epoch_label(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|timestamp| timestamp.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn write_png(path: &Path, width: u32, height: u32, rgb_buffer: Vec<u8>) -> Result<(), RenderError> {
    let rgb_image = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| RenderError::Backend("image buffer conversion failed".to_string()))?;
    let mut encoded = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb_image).write_to(&mut encoded, ImageFormat::Png)?;
    fs::write(path, encoded.into_inner()).map_err(|source| RenderError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn backend_error<E: std::fmt::Debug>(error: E) -> RenderError {
    RenderError::Backend(format!("{:?}", error))
}
