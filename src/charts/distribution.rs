//! Match length charts: box plot + ECDF, and red/blue wins per length

use super::{padded_range, Chart, ChartKind, ChartStyle};
use crate::features::{DurationSummary, DurationWins};
use crate::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Box plot and empirical CDF of match lengths, side by side
pub struct DurationDistributionChart<'a> {
    pub summary: &'a DurationSummary,
    pub ecdf: &'a [(f64, f64)],
}

impl Chart for DurationDistributionChart<'_> {
    const KIND: ChartKind = ChartKind::DurationDistribution;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let panels = root.split_evenly((1, 2));
        let s = self.summary;

        // Box plot
        let (y_lo, y_hi) = padded_range([s.min, s.max].into_iter(), (0.0, 1.0));
        let mut boxplot = ChartBuilder::on(&panels[0])
            .caption("Boxplot of Game Length", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(20)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0f64..2.0f64, y_lo..y_hi)?;

        boxplot
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_: &f64| String::new())
            .y_desc("Game Length (minutes)")
            .draw()?;

        boxplot.draw_series(std::iter::once(Rectangle::new(
            [(0.6, s.q1), (1.4, s.q3)],
            style.blue.mix(0.3).filled(),
        )))?;
        boxplot.draw_series(std::iter::once(Rectangle::new(
            [(0.6, s.q1), (1.4, s.q3)],
            BLACK.stroke_width(1),
        )))?;

        let lines = [
            vec![(0.6, s.median), (1.4, s.median)],
            vec![(1.0, s.lower_whisker), (1.0, s.q1)],
            vec![(1.0, s.q3), (1.0, s.upper_whisker)],
            vec![(0.8, s.lower_whisker), (1.2, s.lower_whisker)],
            vec![(0.8, s.upper_whisker), (1.2, s.upper_whisker)],
        ];
        for (i, points) in lines.into_iter().enumerate() {
            let stroke = if i == 0 {
                style.median.stroke_width(2)
            } else {
                BLACK.stroke_width(1)
            };
            boxplot.draw_series(std::iter::once(PathElement::new(points, stroke)))?;
        }

        let outliers = self
            .ecdf
            .iter()
            .map(|&(x, _)| x)
            .filter(|&x| x < s.lower_whisker || x > s.upper_whisker);
        boxplot.draw_series(outliers.map(|x| Circle::new((1.0, x), 3, BLACK.stroke_width(1))))?;

        // ECDF
        let (x_lo, x_hi) = padded_range(self.ecdf.iter().map(|&(x, _)| x), (0.0, 1.0));
        let mut cdf = ChartBuilder::on(&panels[1])
            .caption("Empirical CDF of Game Length", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_lo..x_hi, 0.0f64..1.05f64)?;

        cdf.configure_mesh()
            .x_desc("Game Length (minutes)")
            .y_desc("ECDF")
            .draw()?;

        let blue = style.blue;
        cdf.draw_series(
            self.ecdf
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, blue.filled())),
        )?;

        for (level, color, label) in [
            (0.25, style.q1, "25th Percentile"),
            (0.50, style.median, "50th Percentile"),
            (0.75, style.q3, "75th Percentile"),
        ] {
            cdf.draw_series(std::iter::once(PathElement::new(
                vec![(x_lo, level), (x_hi, level)],
                color.stroke_width(2),
            )))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        cdf.configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

/// Population-pyramid of red (left) and blue (right) wins per match length
pub struct WinsByDurationChart<'a> {
    pub groups: &'a [DurationWins],
}

impl WinsByDurationChart<'_> {
    /// Half the bar thickness: a little under half the smallest gap between lengths
    fn half_height(&self) -> f64 {
        let min_gap = self
            .groups
            .windows(2)
            .map(|w| w[1].duration - w[0].duration)
            .filter(|gap| *gap > 0.0)
            .fold(f64::INFINITY, f64::min);
        if min_gap.is_finite() {
            (min_gap * 0.4).min(0.4)
        } else {
            0.4
        }
    }
}

impl Chart for WinsByDurationChart<'_> {
    const KIND: ChartKind = ChartKind::WinsByDuration;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let max_red = self.groups.iter().map(|g| g.tally.red_wins).max().unwrap_or(0);
        let max_blue = self.groups.iter().map(|g| g.tally.blue_wins).max().unwrap_or(0);
        let x_lo = -(max_red.max(1) as f64) * 1.1;
        let x_hi = max_blue.max(1) as f64 * 1.1;
        let (y_lo, y_hi) = padded_range(self.groups.iter().map(|g| g.duration), (0.0, 60.0));
        let h = self.half_height();

        let mut chart = ChartBuilder::on(root)
            .caption("Red vs Blue Wins by Game Length", ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("Wins")
            .y_desc("Game Length (minutes)")
            .x_label_formatter(&|x: &f64| format!("{:.0}", x.abs()))
            .draw()?;

        let (red, blue) = (style.red, style.blue);
        chart
            .draw_series(self.groups.iter().map(|g| {
                Rectangle::new(
                    [(-(g.tally.red_wins as f64), g.duration - h), (0.0, g.duration + h)],
                    red.filled(),
                )
            }))?
            .label("Red Side Wins")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], red.filled()));
        chart
            .draw_series(self.groups.iter().map(|g| {
                Rectangle::new(
                    [(0.0, g.duration - h), (g.tally.blue_wins as f64, g.duration + h)],
                    blue.filled(),
                )
            }))?
            .label("Blue Side Wins")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], blue.filled()));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::WinTally;

    fn group(duration: f64) -> DurationWins {
        DurationWins {
            duration,
            tally: WinTally { blue_wins: 1, red_wins: 1 },
        }
    }

    #[test]
    fn test_half_height_follows_gaps() {
        let groups = vec![group(30.0), group(30.5), group(32.0)];
        let chart = WinsByDurationChart { groups: &groups };
        assert!((chart.half_height() - 0.2).abs() < 1e-12);

        let groups = vec![group(30.0), group(40.0)];
        let chart = WinsByDurationChart { groups: &groups };
        assert_eq!(chart.half_height(), 0.4);

        let chart = WinsByDurationChart { groups: &[] };
        assert_eq!(chart.half_height(), 0.4);
    }
}
