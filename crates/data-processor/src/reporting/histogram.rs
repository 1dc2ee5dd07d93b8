//! Histogram images for numeric columns.
//!
//! Only shapes are drawn (bars and axis lines), so no font backend is needed.

use crate::error::{ProcessorError, Result};
use plotters::prelude::*;
use std::path::Path;

/// Number of equal-width bins per histogram.
pub const BIN_COUNT: usize = 10;

/// Canvas size in pixels.
pub const CANVAS: (u32, u32) = (800, 600);

/// One histogram bar over `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins over `[min, max]`.
///
/// All-equal values collapse into one bin of width 1 centred on the value.
/// Empty input yields no bins.
pub fn compute_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![Bin {
            start: min - 0.5,
            end: max + 0.5,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &finite {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + width * i as f64,
            end: if i == bins - 1 {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// File name used for a column's histogram.
pub fn histogram_file_name(column: &str) -> String {
    format!("hist_{column}.png")
}

/// Render `bins` as a PNG bar chart at `path`.
pub fn draw_histogram(path: &Path, bins: &[Bin]) -> Result<()> {
    let write_err = |e: &dyn std::fmt::Display| ProcessorError::io_write(path, e.to_string());

    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(ProcessorError::io_write(path, "no values to plot"));
    };
    let tallest = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;

    let root = BitMapBackend::new(path, CANVAS).into_drawing_area();
    root.fill(&WHITE).map_err(|e| write_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .build_cartesian_2d(first.start..last.end, 0f64..tallest * 1.1)
        .map_err(|e| write_err(&e))?;

    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(|e| write_err(&e))?;
    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                BLACK.stroke_width(1),
            )
        }))
        .map_err(|e| write_err(&e))?;

    // baseline
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(first.start, 0.0), (last.end, 0.0)],
            BLACK.stroke_width(2),
        )))
        .map_err(|e| write_err(&e))?;

    root.present().map_err(|e| write_err(&e))?;
    Ok(())
}
