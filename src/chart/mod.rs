//! Chart artifact rendering.
//!
//! The aggregator's `ChartModel` is the full contract here: this module only
//! turns it into pixels. Bodies span open..close and are coloured by
//! direction; day boundaries get dashed vertical gridlines with date labels.

use std::path::Path;

use plotters::prelude::*;

use crate::analysis::ChartModel;
use crate::config::CHART;
use crate::domain::CandleType;
use crate::error::{MarketError, Result};

pub trait ChartRenderer {
    fn render(&self, model: &ChartModel, path: &Path) -> Result<()>;
}

/// Bitmap candle chart on a dark background.
pub struct CandleChart;

impl ChartRenderer for CandleChart {
    fn render(&self, model: &ChartModel, path: &Path) -> Result<()> {
        if model.candles.is_empty() {
            return Err(MarketError::NoData);
        }

        let n = model.candles.len() as f64;
        let (mut y_lo, mut y_hi) = (model.y_axis.low, model.y_axis.high);
        if y_hi <= y_lo {
            // Degenerate span (single price level); widen so the backend
            // still gets a drawable range.
            y_lo -= 1.0;
            y_hi += 1.0;
        }

        let text = rgb(CHART.colors.text);
        let grid = rgb(CHART.colors.grid);
        let bullish = rgb(CHART.colors.bullish);
        let bearish = rgb(CHART.colors.bearish);

        let root = BitMapBackend::new(path, (CHART.width, CHART.height)).into_drawing_area();
        root.fill(&rgb(CHART.colors.background)).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(model.title.as_str(), ("sans-serif", 48).into_font().color(&text))
            .margin(24)
            .x_label_area_size(80)
            .y_label_area_size(120)
            .build_cartesian_2d(-0.5f64..(n - 0.5), y_lo..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc("Date")
            .y_desc("Price")
            .axis_style(ShapeStyle::from(&grid))
            .light_line_style(grid.mix(0.2))
            .label_style(("sans-serif", 24).into_font().color(&text))
            .axis_desc_style(("sans-serif", 32).into_font().color(&text))
            .draw()
            .map_err(render_err)?;

        // Day-boundary gridlines behind the candles, labels along the bottom
        for tick in &model.day_ticks {
            let x = tick.index as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, y_lo), (x, y_hi)],
                    grid.mix(0.4),
                )))
                .map_err(render_err)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    tick.label.clone(),
                    (x, y_lo),
                    ("sans-serif", 22).into_font().color(&text),
                )))
                .map_err(render_err)?;
        }

        chart
            .draw_series(model.candles.iter().enumerate().map(|(i, candle)| {
                let color = match candle.get_type() {
                    CandleType::Bullish => bullish,
                    CandleType::Bearish => bearish,
                };
                let (body_lo, body_hi) = candle.body_range();
                let x = i as f64;
                Rectangle::new(
                    [
                        (x - CHART.body_half_width, body_lo),
                        (x + CHART.body_half_width, body_hi),
                    ],
                    color.filled(),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        log::info!("Chart artifact written to {}", path.display());
        Ok(())
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

fn render_err<E: std::fmt::Display>(e: E) -> MarketError {
    MarketError::Render(e.to_string())
}
