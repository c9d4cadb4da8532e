//! Per-region win comparison: blue wins, red wins and their absolute difference

use super::{Chart, ChartKind, ChartStyle};
use crate::features::RegionWins;
use crate::{Result, Side};
use plotters::coord::Shift;
use plotters::prelude::*;

pub struct WinComparisonChart<'a> {
    pub groups: &'a [RegionWins],
}

/// Region name for an integer x position, empty between bars
fn region_label(groups: &[RegionWins], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    groups
        .get(i as usize)
        .map(|g| g.region.clone())
        .unwrap_or_default()
}

impl WinComparisonChart<'_> {
    fn draw_panel<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        title: &str,
        y_desc: &str,
        bars: &[(f64, RGBAColor)],
    ) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let n = self.groups.len().max(1);
        let y_max = bars.iter().map(|(v, _)| *v).fold(1.0, f64::max) * 1.1;

        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0f64..y_max)?;

        let groups = self.groups;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x: &f64| region_label(groups, *x))
            .x_desc("Region")
            .y_desc(y_desc)
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, &(value, color))| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, value)], color.filled())
        }))?;

        Ok(())
    }
}

impl Chart for WinComparisonChart<'_> {
    const KIND: ChartKind = ChartKind::WinComparison;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
    {
        let panels = root.split_evenly((1, 3));

        let blue: Vec<_> = self
            .groups
            .iter()
            .map(|g| (g.tally.blue_wins as f64, style.blue.mix(1.0)))
            .collect();
        let red: Vec<_> = self
            .groups
            .iter()
            .map(|g| (g.tally.red_wins as f64, style.red.mix(1.0)))
            .collect();
        let difference: Vec<_> = self
            .groups
            .iter()
            .map(|g| {
                let color = match g.tally.leading_side() {
                    Side::Blue => style.blue,
                    Side::Red => style.red,
                };
                (g.tally.difference().unsigned_abs() as f64, color.mix(0.7))
            })
            .collect();

        self.draw_panel(&panels[0], "Blue Side Wins", "Wins", &blue)?;
        self.draw_panel(&panels[1], "Red Side Wins", "Wins", &red)?;
        self.draw_panel(
            &panels[2],
            "Difference in Wins (Absolute)",
            "Difference in Wins",
            &difference,
        )?;

        Ok(())
    }
}
