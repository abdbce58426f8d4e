use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::history::PricePoint;
use crate::providers::traits::MarketDataProvider;

const CHART_WIDTH: u32 = 1600;
const CHART_HEIGHT: u32 = 900;

/// Renders close-price history charts for up to five tickers.
///
/// Fetches each ticker's daily closes from the gateway and draws one
/// line series per ticker into a PNG under `output_dir`. The file name
/// encodes the tickers and the date range, so re-rendering the same
/// request overwrites the same file.
pub struct ChartService {
    gateway: Arc<dyn MarketDataProvider>,
    output_dir: PathBuf,
}

impl ChartService {
    pub fn new(gateway: Arc<dyn MarketDataProvider>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            gateway,
            output_dir: output_dir.into(),
        }
    }

    /// Render the shared history chart and return the written path.
    ///
    /// `symbols` must already be validated (1–5, uppercase, saved in
    /// the portfolio). Fails with `Render` when no ticker has any
    /// price data inside the range.
    pub async fn render_history(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PathBuf, CoreError> {
        let mut series: Vec<(String, Vec<PricePoint>)> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let points = self.gateway.close_history(symbol, start, end).await?;
            series.push((symbol.clone(), points));
        }

        if series.iter().all(|(_, points)| points.is_empty()) {
            return Err(CoreError::Render(format!(
                "no price data between {start} and {end} for {}",
                symbols.join(" ")
            )));
        }

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| CoreError::Render(format!("cannot create chart directory: {e}")))?;
        let path = self
            .output_dir
            .join(format!("{}_history_{start}_{end}.png", symbols.join("_")));

        self.draw(&path, &series, start, end)?;

        tracing::info!(path = %path.display(), tickers = %symbols.join(" "), "history chart rendered");
        Ok(path)
    }

    fn draw(
        &self,
        path: &std::path::Path,
        series: &[(String, Vec<PricePoint>)],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), CoreError> {
        let (y_min, y_max) = value_bounds(series);
        // A degenerate axis range makes plotters refuse to build the chart
        let x_end = if end > start { end } else { start + chrono::Duration::days(1) };

        let tickers = series
            .iter()
            .map(|(s, _)| s.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let title = format!("{tickers} history between {start} and {end}");

        let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(start..x_end, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Close")
            .draw()
            .map_err(render_error)?;

        for (idx, (symbol, points)) in series.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            chart
                .draw_series(LineSeries::new(
                    points.iter().map(|p| (p.date, p.close)),
                    color.stroke_width(2),
                ))
                .map_err(render_error)?
                .label(symbol.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn value_bounds(series: &[(String, Vec<PricePoint>)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, points) in series {
        for p in points {
            min = min.min(p.close);
            max = max.max(p.close);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        // flat series: pad so the axis has height
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn render_error<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Render(e.to_string())
}
