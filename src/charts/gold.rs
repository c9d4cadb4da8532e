//! Gold difference charts: win rate per bucket, histogram of wins, scatter

use super::{padded_range, Chart, ChartKind, ChartStyle};
use crate::features::{BucketRate, Histogram, OutcomeSplit};
use crate::{MatchRecord, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Blue and red win rate against each bucket's lower edge
pub struct WinRateChart<'a> {
    pub rates: &'a [BucketRate],
    /// Full bucket range, so the axis stays fixed when edge buckets are empty
    pub range: (f64, f64),
}

impl Chart for WinRateChart<'_> {
    const KIND: ChartKind = ChartKind::WinRateByGold;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let (x_lo, x_hi) = self.range;
        let mut chart = ChartBuilder::on(root)
            .caption("Win Rate vs Gold Difference", ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, 0.0f64..1.05f64)?;

        chart
            .configure_mesh()
            .x_desc("Gold Difference Range")
            .y_desc("Win Rate")
            .draw()?;

        let series = [
            (
                "Blue Win Rate",
                style.blue,
                self.rates.iter().map(|r| (r.bucket.lower, r.blue_rate)).collect::<Vec<_>>(),
            ),
            (
                "Red Win Rate",
                style.red,
                self.rates.iter().map(|r| (r.bucket.lower, r.red_rate)).collect(),
            ),
        ];

        for (label, color, points) in series {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

/// Overlaid histograms of final gold difference for blue wins and red wins
pub struct GoldHistogramChart<'a> {
    pub blue: Option<&'a Histogram>,
    pub red: Option<&'a Histogram>,
}

impl Chart for GoldHistogramChart<'_> {
    const KIND: ChartKind = ChartKind::GoldHistogram;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let present = || self.blue.into_iter().chain(self.red);
        let (x_lo, x_hi) = padded_range(
            present().flat_map(|h| [h.lower, h.upper]),
            (-1.0, 1.0),
        );
        let y_max = present().map(|h| h.max_count()).max().unwrap_or(0).max(1) as f64 * 1.1;

        let mut chart = ChartBuilder::on(root)
            .caption("Histogram of Gold Difference for Wins", ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, 0.0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Gold Difference")
            .y_desc("Frequency")
            .draw()?;

        let series = [
            ("Blue Wins", style.blue, self.blue),
            ("Red Wins", style.red, self.red),
        ];
        for (label, color, hist) in series {
            let Some(hist) = hist else { continue };
            let fill = color.mix(0.7);

            chart
                .draw_series(hist.bins().map(|(start, end, count)| {
                    Rectangle::new([(start, 0.0), (end, count as f64)], fill.filled())
                }))?
                .label(format!("{} (n = {})", label, hist.total()))
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
            chart.draw_series(hist.bins().filter(|(_, _, count)| *count > 0).map(
                |(start, end, count)| {
                    Rectangle::new([(start, 0.0), (end, count as f64)], BLACK.stroke_width(1))
                },
            ))?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

/// Gold difference against match length: all matches, upsets, and expected results
pub struct GoldScatterChart<'a> {
    pub all: &'a [MatchRecord],
    pub split: &'a OutcomeSplit<'a>,
}

impl GoldScatterChart<'_> {
    fn draw_panel<'r, DB, I>(
        area: &DrawingArea<DB, Shift>,
        title: &str,
        records: I,
        bounds: ((f64, f64), (f64, f64)),
        style: &ChartStyle,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        I: Iterator<Item = &'r MatchRecord>,
    {
        let ((x_lo, x_hi), (y_lo, y_hi)) = bounds;
        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("Gold Difference")
            .y_desc("Game Length (minutes)")
            .draw()?;

        chart.draw_series(records.filter_map(|r| {
            let diff = r.resource_diff?;
            let color = style.side_color(r.blue_won).mix(0.7);
            Some(Circle::new((diff, r.duration), 3, color.filled()))
        }))?;

        Ok(())
    }
}

impl Chart for GoldScatterChart<'_> {
    const KIND: ChartKind = ChartKind::GoldScatter;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let panels = root.split_evenly((1, 3));
        // Shared axes so the three panels compare directly
        let bounds = (
            padded_range(self.all.iter().filter_map(|r| r.resource_diff), (-1.0, 1.0)),
            padded_range(self.all.iter().map(|r| r.duration), (0.0, 60.0)),
        );

        Self::draw_panel(
            &panels[0],
            "Gold Difference vs Game Length (Full Dataset)",
            self.all.iter(),
            bounds,
            style,
        )?;
        Self::draw_panel(
            &panels[1],
            "Unexpected (Team with Less Gold Wins)",
            self.split.unexpected.iter().copied(),
            bounds,
            style,
        )?;
        Self::draw_panel(
            &panels[2],
            "Expected (Team with More Gold Wins)",
            self.split.expected.iter().copied(),
            bounds,
            style,
        )?;

        Ok(())
    }
}
