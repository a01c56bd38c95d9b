//! Turns computed bands into drawing primitives.
//!
//! The adapter never computes anything: it takes the output of
//! [`Bb::compute`](crate::Bb::compute), the current [`StyleSettings`] and a
//! [`Viewport`], and issues polylines and a polygon to a [`Renderer`].

use tracing::trace;

use crate::{
    BbValue, Price,
    style::{Band, Fill, Stroke, StyleSettings},
};

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Drawing surface supplied by the host chart.
pub trait Renderer {
    /// Strokes an open polyline through `points`.
    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke);

    /// Fills the closed polygon through `points`.
    fn fill_polygon(&mut self, points: &[Point], fill: &Fill);
}

/// A recorded draw call, see the [`Renderer`] impl on `Vec<DrawCommand>`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Polyline { points: Vec<Point>, stroke: Stroke },
    Polygon { points: Vec<Point>, fill: Fill },
}

/// Records draw calls instead of painting them.
impl Renderer for Vec<DrawCommand> {
    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.push(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Point], fill: &Fill) {
        self.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill: fill.clone(),
        });
    }
}

/// Visible slice of the chart and its linear pixel mapping.
///
/// Bars `from..to` are visible. Bar `from` is centred at
/// `x_origin + bar_spacing / 2`, each following bar `bar_spacing` further
/// right. Prices map linearly from `price_max` (y = 0) to `price_min`
/// (y = `height`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub from: usize,
    pub to: usize,
    pub x_origin: f64,
    pub bar_spacing: f64,
    pub price_min: Price,
    pub price_max: Price,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn x(&self, index: usize) -> f64 {
        let slot = index as f64 - self.from as f64;
        self.x_origin + slot * self.bar_spacing + self.bar_spacing / 2.0
    }

    /// Flat price ranges map to the vertical centre.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn y(&self, price: Price) -> f64 {
        let range = self.price_max - self.price_min;
        if range == 0.0 {
            return self.height / 2.0;
        }
        (self.price_max - price) / range * self.height
    }

    fn point(&self, index: usize, price: Price) -> Point {
        Point {
            x: self.x(index),
            y: self.y(price),
        }
    }
}

fn band_price(value: &BbValue, band: Band) -> Price {
    match band {
        Band::Basis => value.basis(),
        Band::Upper => value.upper(),
        Band::Lower => value.lower(),
    }
}

/// Contiguous runs of present values for one band, in visible order.
///
/// A run ends at every absent entry so no segment bridges a gap. Runs of a
/// single point draw nothing and are skipped.
fn line_runs(
    bands: &[Option<BbValue>],
    from: usize,
    band: Band,
    viewport: &Viewport,
) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, value) in bands.iter().enumerate() {
        match value {
            Some(v) => current.push(viewport.point(from + i, band_price(v, band))),
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }

    if current.len() > 1 {
        runs.push(current);
    }

    runs
}

/// Upper band forward, then lower band backward, skipping absent entries.
fn background_polygon(bands: &[Option<BbValue>], from: usize, viewport: &Viewport) -> Vec<Point> {
    let upper = bands
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| viewport.point(from + i, v.upper())));
    let lower = bands
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(i, v)| v.map(|v| viewport.point(from + i, v.lower())));

    upper.chain(lower).collect()
}

/// Draws the visible part of `bands` with `style`.
///
/// The background is filled first, then basis, upper and lower lines are
/// stroked on top. Hidden elements are skipped entirely. The viewport range
/// is clamped to the length of `bands`.
pub fn draw_bands(
    bands: &[Option<BbValue>],
    style: &StyleSettings,
    viewport: &Viewport,
    renderer: &mut impl Renderer,
) {
    let to = viewport.to.min(bands.len());
    let from = viewport.from.min(to);
    let visible = &bands[from..to];

    if let Some(fill) = style.fill() {
        let polygon = background_polygon(visible, from, viewport);
        if !polygon.is_empty() {
            renderer.fill_polygon(&polygon, &fill);
        }
    }

    for band in Band::ALL {
        let Some(stroke) = style.stroke(band) else {
            continue;
        };

        let runs = line_runs(visible, from, band, viewport);
        trace!(?band, runs = runs.len(), "stroking band");

        for run in &runs {
            renderer.stroke_polyline(run, &stroke);
        }
    }
}
