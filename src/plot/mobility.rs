//! # 迁移率-密度图
//!
//! 横轴为对数坐标的面密度；每个散射机制一条曲线，总迁移率加粗。
//!
//! ## 依赖关系
//! - 被 `plot/mod.rs` 的 `plot_any` 调用
//! - 使用 `data/mobility.rs` 的 `MobilityData`

use super::{backend_error, padded_range, render, title_or, ChartOptions};
use crate::data::MobilityData;
use crate::error::{QmtError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 生成迁移率图（PNG 或 SVG）
pub fn plot_mobility(data: &MobilityData, output_path: &Path, opts: &ChartOptions) -> Result<()> {
    if data.mechanisms.is_empty() {
        return Err(QmtError::InvalidArgument(
            "mobility data has no scattering mechanisms to plot".to_string(),
        ));
    }
    render!(output_path, opts, |root| draw_mobility_chart(&root, data, opts))
}

fn draw_mobility_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &MobilityData,
    opts: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(backend_error)?;

    let n_min = data.densities[0];
    let n_max = data.densities[data.densities.len() - 1];
    let total = data.total_mobility();
    let mu_max = padded_range(
        data.mechanisms
            .values()
            .flat_map(|mu| mu.iter().copied())
            .chain(total.iter().copied())
            .chain(std::iter::once(0.0)),
        0.05,
    )
    .map(|(_, hi)| hi)
    .unwrap_or(1.0);

    let title = title_or(opts, &format!("Mobility at {:.2} K", data.temperature));
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d((n_min..n_max).log_scale(), 0.0..mu_max)
        .map_err(backend_error)?;

    chart
        .configure_mesh()
        .x_desc("density (cm^-2)")
        .y_desc("mobility (cm^2/Vs)")
        .x_label_formatter(&|v| format!("{:.1e}", v))
        .y_label_formatter(&|v| format!("{:.2e}", v))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(backend_error)?;

    for (i, (name, mu)) in data.mechanisms.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                data.densities.iter().copied().zip(mu.iter().copied()),
                color.stroke_width(2),
            ))
            .map_err(backend_error)?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .draw_series(LineSeries::new(
            data.densities.iter().copied().zip(total.iter().copied()),
            BLACK.stroke_width(3),
        ))
        .map_err(backend_error)?
        .label("total")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(backend_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_requires_mechanisms() {
        let data = MobilityData::new(vec![1e11, 1e12], 1.0).unwrap();
        let path = std::env::temp_dir().join("qmtdata_empty_mobility.svg");
        assert!(matches!(
            plot_mobility(&data, &path, &ChartOptions::default()),
            Err(QmtError::InvalidArgument(_))
        ));
        assert!(!path.exists());
    }
}
