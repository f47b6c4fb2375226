//! # 密度分布图
//!
//! ## 依赖关系
//! - 被 `plot/mod.rs` 的 `plot_any` 调用
//! - 使用 `data/density.rs` 的 `Density1DData`

use super::{backend_error, padded_range, render, title_or, ChartOptions};
use crate::data::Density1DData;
use crate::error::Result;

use plotters::prelude::*;
use std::path::Path;

/// 生成密度分布图（PNG 或 SVG）
pub fn plot_density(data: &Density1DData, output_path: &Path, opts: &ChartOptions) -> Result<()> {
    render!(output_path, opts, |root| draw_density_chart(&root, data, opts))
}

fn draw_density_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &Density1DData,
    opts: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(backend_error)?;

    let (x_min, x_max) = data.bounds();
    // 纵轴总包含 0
    let (y_min, y_max) = padded_range(
        data.density.iter().copied().chain(std::iter::once(0.0)),
        0.05,
    )
    .unwrap_or((0.0, 1.0));

    let title = title_or(opts, "Carrier density");
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(backend_error)?;

    chart
        .configure_mesh()
        .x_desc(format!("x ({})", data.length_unit))
        .y_desc(format!("density ({})", data.density_unit))
        .y_label_formatter(&|v| format!("{:.2e}", v))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(backend_error)?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(AreaSeries::new(
            data.mesh.iter().copied().zip(data.density.iter().copied()),
            0.0,
            line_color.mix(0.2),
        ))
        .map_err(backend_error)?;
    chart
        .draw_series(LineSeries::new(
            data.mesh.iter().copied().zip(data.density.iter().copied()),
            line_color.stroke_width(2),
        ))
        .map_err(backend_error)?;

    let (x_peak, n_peak) = data.peak();
    chart
        .draw_series(std::iter::once(Circle::new(
            (x_peak, n_peak),
            4,
            RGBColor(204, 51, 0).filled(),
        )))
        .map_err(backend_error)?;
    chart
        .draw_series(std::iter::once(Text::new(
            format!("peak {:.3e}", n_peak),
            (x_peak, n_peak),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(backend_error)?;

    Ok(())
}
