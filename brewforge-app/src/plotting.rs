//! PNG charts for a single technique's pour structure and for the ratio comparison.

use anyhow::Result;
use brewforge_core::{registry::RatioRow, timeline::Timeline};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const CHART_SIZE: (u32, u32) = (1024, 768);
const COFFEE_BROWN: RGBColor = RGBColor(111, 78, 55);
const POUR_ORANGE: RGBColor = RGBColor(234, 88, 12);

/// Cumulative water over time, with a marker on every labelled step.
pub fn plot_pour_structure(path: &Path, title: &str, timeline: &Timeline) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = timeline
        .iter()
        .map(|p| p.time)
        .fold(timeline.duration(), f64::max)
        .max(1.0);
    let max_water = timeline.max_water().max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 36).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_time, 0f64..max_water * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Water (g)")
        .draw()?;

    chart
        .draw_series(AreaSeries::new(
            timeline.iter().map(|p| (p.time, p.water)),
            0.0,
            &POUR_ORANGE.mix(0.2),
        ))?;

    chart
        .draw_series(LineSeries::new(
            timeline.iter().map(|p| (p.time, p.water)),
            POUR_ORANGE.stroke_width(3),
        ))?
        .label("Cumulative water")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], POUR_ORANGE.stroke_width(3)));

    chart
        .draw_series(
            timeline
                .iter()
                .filter(|p| !p.label.is_empty())
                .map(|p| Circle::new((p.time, p.water), 4, COFFEE_BROWN.filled())),
        )?
        .label("Step")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, COFFEE_BROWN.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;

    info!(path = %path.display(), "saved pour structure chart");
    Ok(())
}

/// One bar per technique, labelled with its method.
pub fn plot_ratio_comparison(path: &Path, rows: &[RatioRow]) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let max_ratio = rows.iter().map(|r| r.ratio).fold(1.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Brew Ratio by Technique", ("sans-serif", 36).into_font())
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0..rows.len()).into_segmented(), 0f64..max_ratio * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rows.len())
        .x_label_style(("sans-serif", 12).into_font())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                rows.get(*i).map(|r| r.method_name.clone()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .y_desc("Water : coffee")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(COFFEE_BROWN.filled())
            .margin(8)
            .data(rows.iter().enumerate().map(|(i, r)| (i, r.ratio))),
    )?;

    chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
        Text::new(
            format!("1:{}", r.ratio),
            (SegmentValue::CenterOf(i), r.ratio + max_ratio * 0.02),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    root.present()?;

    info!(path = %path.display(), bars = rows.len(), "saved ratio comparison chart");
    Ok(())
}
