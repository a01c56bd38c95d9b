use tracing::debug;

use crate::{
    Bar, Bb, BbConfig, BbValue,
    render::{Renderer, Viewport, draw_bands},
    style::StyleSettings,
};

/// Bollinger Bands overlay bound to one bar series.
///
/// Owns the bars, the current [`BbConfig`] and the bands computed from them.
/// Bands are recomputed eagerly when the bars change or the config actually
/// changes, and only then. Styling is not part of the overlay: it is passed
/// to [`draw`](BandOverlay::draw) each time, so a style change is a redraw,
/// never a recomputation.
///
/// # Example
///
/// ```
/// use candle_bands::{Bar, BandOverlay, BbConfig, DrawCommand, StyleSettings, Viewport};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = (1..=30).map(|c| {
///     let c = f64::from(c);
///     Bar::new(c, c, c, c)
/// }).collect();
///
/// let mut overlay = BandOverlay::new(BbConfig::close(NonZero::new(5).unwrap()));
/// overlay.set_bars(bars);
///
/// let viewport = Viewport {
///     from: 0, to: 30,
///     x_origin: 0.0, bar_spacing: 10.0,
///     price_min: 0.0, price_max: 40.0, height: 400.0,
/// };
/// let mut commands: Vec<DrawCommand> = Vec::new();
/// overlay.draw(&StyleSettings::default(), &viewport, &mut commands);
///
/// // background polygon plus basis, upper and lower lines
/// assert_eq!(commands.len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct BandOverlay {
    calculator: Bb,
    bars: Vec<Bar>,
    bands: Vec<Option<BbValue>>,
    revision: u64,
}

impl BandOverlay {
    #[must_use]
    pub fn new(config: BbConfig) -> Self {
        Self {
            calculator: Bb::new(config),
            bars: Vec::new(),
            bands: Vec::new(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BbConfig {
        self.calculator.config()
    }

    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Bands for the current bars and config, one entry per bar.
    #[must_use]
    pub fn bands(&self) -> &[Option<BbValue>] {
        &self.bands
    }

    /// Number of recomputations so far. The cached bands always belong to the
    /// latest one.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the bar series and recomputes.
    pub fn set_bars(&mut self, bars: Vec<Bar>) {
        self.bars = bars;
        self.recompute();
    }

    /// Applies new parameters. Returns `true` if the bands were recomputed,
    /// `false` if `config` equals the current one.
    pub fn set_config(&mut self, config: BbConfig) -> bool {
        if *self.calculator.config() == config {
            return false;
        }

        self.calculator = Bb::new(config);
        self.recompute();
        true
    }

    /// Draws the cached bands. Never recomputes.
    pub fn draw(&self, style: &StyleSettings, viewport: &Viewport, renderer: &mut impl Renderer) {
        draw_bands(&self.bands, style, viewport, renderer);
    }

    fn recompute(&mut self) {
        self.bands = self.calculator.compute(&self.bars);
        self.revision += 1;

        debug!(
            revision = self.revision,
            bars = self.bars.len(),
            calculator = %self.calculator,
            "recomputed band overlay"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PriceSource,
        render::DrawCommand,
        style::LineStyle,
        test_util::{closes, ramp},
    };
    use std::num::NonZero;

    fn config(length: usize) -> BbConfig {
        BbConfig::close(NonZero::new(length).unwrap())
    }

    fn viewport(to: usize) -> Viewport {
        Viewport {
            from: 0,
            to,
            x_origin: 0.0,
            bar_spacing: 1.0,
            price_min: 0.0,
            price_max: 100.0,
            height: 100.0,
        }
    }

    mod recomputation {
        use super::*;

        #[test]
        fn starts_empty() {
            let overlay = BandOverlay::new(config(3));
            assert!(overlay.bands().is_empty());
            assert_eq!(overlay.revision(), 0);
        }

        #[test]
        fn setting_bars_computes_bands() {
            let mut overlay = BandOverlay::new(config(3));
            overlay.set_bars(ramp(5));
            assert_eq!(overlay.bands(), Bb::new(config(3)).compute(&ramp(5)));
            assert_eq!(overlay.revision(), 1);
        }

        #[test]
        fn changed_config_recomputes() {
            let mut overlay = BandOverlay::new(config(3));
            overlay.set_bars(ramp(5));

            let shifted = BbConfig::builder()
                .length(NonZero::new(3).unwrap())
                .offset(1)
                .build();
            assert!(overlay.set_config(shifted));
            assert_eq!(overlay.revision(), 2);
            assert_eq!(overlay.bands(), Bb::new(shifted).compute(&ramp(5)));
        }

        #[test]
        fn identical_config_is_a_no_op() {
            let mut overlay = BandOverlay::new(config(3));
            overlay.set_bars(ramp(5));
            assert!(!overlay.set_config(config(3)));
            assert_eq!(overlay.revision(), 1);
        }

        #[test]
        fn source_change_recomputes() {
            let mut overlay = BandOverlay::new(config(2));
            overlay.set_bars(closes(&[1.0, 2.0]));
            let open = BbConfig::builder()
                .length(NonZero::new(2).unwrap())
                .source(PriceSource::Open)
                .build();
            assert!(overlay.set_config(open));
            assert_eq!(overlay.config().source(), PriceSource::Open);
        }

        #[test]
        fn new_bars_replace_old_bands() {
            let mut overlay = BandOverlay::new(config(2));
            overlay.set_bars(ramp(10));
            overlay.set_bars(ramp(3));
            assert_eq!(overlay.bands().len(), 3);
            assert_eq!(overlay.bars().len(), 3);
        }
    }

    mod drawing {
        use super::*;

        #[test]
        fn style_changes_do_not_recompute() {
            let mut overlay = BandOverlay::new(config(3));
            overlay.set_bars(ramp(10));

            let mut solid = Vec::new();
            overlay.draw(&StyleSettings::default(), &viewport(10), &mut solid);

            let dashed_style = StyleSettings {
                basis_style: LineStyle::Dashed,
                ..StyleSettings::default()
            };
            let mut dashed = Vec::new();
            overlay.draw(&dashed_style, &viewport(10), &mut dashed);

            assert_eq!(overlay.revision(), 1);
            assert_eq!(solid.len(), dashed.len());
            assert!(dashed.iter().any(|c| matches!(
                c,
                DrawCommand::Polyline { stroke, .. } if stroke.style == LineStyle::Dashed
            )));
        }

        #[test]
        fn nothing_to_draw_before_bars() {
            let overlay = BandOverlay::new(config(3));
            let mut commands = Vec::new();
            overlay.draw(&StyleSettings::default(), &viewport(10), &mut commands);
            assert!(commands.is_empty());
        }
    }
}
