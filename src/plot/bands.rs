//! # 能带图
//!
//! 导带边、Fermi 能级，以及每个子带的概率密度 |ψ_i|²。
//! 概率密度以 E_i 为基线叠加，并统一缩放到能带起伏的一定比例。
//!
//! ## 依赖关系
//! - 被 `plot/mod.rs` 的 `plot_any` 调用
//! - 使用 `data/schrodinger_poisson.rs` 的 `SchrodingerPoissonData`

use super::{backend_error, padded_range, render, title_or, ChartOptions};
use crate::data::SchrodingerPoissonData;
use crate::error::Result;

use plotters::prelude::*;
use std::path::Path;

/// 最高的 |ψ|² 峰占纵轴跨度的比例
const WAVEFUNCTION_HEIGHT: f64 = 0.25;

/// 每个子带的 (z, E_i + s·|ψ_i|²) 曲线
pub(crate) fn offset_wavefunctions(data: &SchrodingerPoissonData) -> Vec<Vec<(f64, f64)>> {
    let probs: Vec<Vec<f64>> = (0..data.num_states())
        .filter_map(|i| data.probability_density(i))
        .collect();
    let p_max = probs
        .iter()
        .flat_map(|p| p.iter().copied())
        .fold(0.0, f64::max);

    let span = padded_range(
        data.band_edge
            .iter()
            .copied()
            .chain(data.energies.iter().copied())
            .chain(std::iter::once(data.fermi_level)),
        0.0,
    )
    .map(|(lo, hi)| hi - lo)
    .unwrap_or(1.0);
    let scale = if p_max > 0.0 {
        WAVEFUNCTION_HEIGHT * span / p_max
    } else {
        0.0
    };

    probs
        .iter()
        .zip(&data.energies)
        .map(|(p, &e)| {
            data.z
                .iter()
                .zip(p)
                .map(|(&z, &v)| (z, e + scale * v))
                .collect()
        })
        .collect()
}

/// 生成能带图（PNG 或 SVG）
pub fn plot_band_diagram(
    data: &SchrodingerPoissonData,
    output_path: &Path,
    opts: &ChartOptions,
) -> Result<()> {
    render!(output_path, opts, |root| draw_band_chart(&root, data, opts))
}

fn draw_band_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &SchrodingerPoissonData,
    opts: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(backend_error)?;

    let curves = offset_wavefunctions(data);
    let z_min = data.z[0];
    let z_max = data.z[data.z.len() - 1];
    let (e_min, e_max) = padded_range(
        data.band_edge
            .iter()
            .copied()
            .chain(std::iter::once(data.fermi_level))
            .chain(curves.iter().flat_map(|c| c.iter().map(|(_, e)| *e))),
        0.05,
    )
    .unwrap_or((-1.0, 1.0));

    let title = title_or(opts, "Band diagram");
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(z_min..z_max, e_min..e_max)
        .map_err(backend_error)?;

    chart
        .configure_mesh()
        .x_desc("z (nm)")
        .y_desc("Energy (eV)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(backend_error)?;

    chart
        .draw_series(LineSeries::new(
            data.z.iter().copied().zip(data.band_edge.iter().copied()),
            BLACK.stroke_width(2),
        ))
        .map_err(backend_error)?
        .label("E_c")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    let fermi_color = RGBColor(204, 0, 0);
    chart
        .draw_series(LineSeries::new(
            vec![(z_min, data.fermi_level), (z_max, data.fermi_level)],
            fermi_color.stroke_width(1),
        ))
        .map_err(backend_error)?
        .label("E_F")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fermi_color.stroke_width(1)));

    for (i, (curve, &e)) in curves.iter().zip(&data.energies).enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                vec![(z_min, e), (z_max, e)],
                color.mix(0.4).stroke_width(1),
            ))
            .map_err(backend_error)?;
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), color.stroke_width(2)))
            .map_err(backend_error)?
            .label(format!("E_{} = {:.4} eV", i, e))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(backend_error)?;

    Ok(())
}
