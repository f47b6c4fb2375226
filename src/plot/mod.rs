//! # 图表生成
//!
//! 使用 `plotters` 为一维数据生成图表，按输出扩展名选择 PNG 或 SVG。
//!
//! ## 图表
//! - 密度分布 (`density.rs`)
//! - 能带图: 导带边、Fermi 能级、各子带 |ψ|² (`bands.rs`)
//! - 迁移率-密度曲线，对数横轴 (`mobility.rs`)
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 调用
//! - 使用 `io/store.rs` 的 `AnyData` 分派

pub mod bands;
pub mod density;
pub mod mobility;

use crate::error::{QmtError, Result};
use crate::io::store::AnyData;

use std::path::Path;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    /// 由扩展名判断格式
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ChartFormat::Png),
            "svg" => Ok(ChartFormat::Svg),
            _ => Err(QmtError::UnsupportedFormat(format!(
                "chart output must end in .png or .svg: {}",
                path.display()
            ))),
        }
    }
}

/// 图表选项
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            title: String::new(),
            width: 1200,
            height: 800,
        }
    }
}

/// 在选定后端上绘制并输出
macro_rules! render {
    ($path:expr, $opts:expr, |$root:ident| $draw:expr) => {{
        use plotters::prelude::*;
        match $crate::plot::ChartFormat::from_path($path)? {
            $crate::plot::ChartFormat::Svg => {
                let $root = SVGBackend::new($path, ($opts.width, $opts.height)).into_drawing_area();
                $draw?;
                $root.present().map_err($crate::plot::backend_error)?;
            }
            $crate::plot::ChartFormat::Png => {
                let $root = BitMapBackend::new($path, ($opts.width, $opts.height)).into_drawing_area();
                $draw?;
                $root.present().map_err($crate::plot::backend_error)?;
            }
        }
        Ok(())
    }};
}
pub(crate) use render;

pub(crate) fn backend_error<E: std::fmt::Debug>(e: E) -> QmtError {
    QmtError::Other(format!("{:?}", e))
}

/// 数据范围，两端各留 `pad` 比例的空白；退化区间扩成单位宽度
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        return Some((lo - 0.5, hi + 0.5));
    }
    let margin = (hi - lo) * pad;
    Some((lo - margin, hi + margin))
}

/// 默认标题：优先使用选项中的标题
fn title_or(opts: &ChartOptions, fallback: &str) -> String {
    if opts.title.is_empty() {
        fallback.to_string()
    } else {
        opts.title.clone()
    }
}

/// 按种类绘图；无对应图表的种类返回 `UnsupportedFormat`
pub fn plot_any(data: &AnyData, path: &Path, opts: &ChartOptions) -> Result<()> {
    match data {
        AnyData::Density1D(d) => density::plot_density(d, path, opts),
        AnyData::SchrodingerPoisson(d) => bands::plot_band_diagram(d, path, opts),
        AnyData::Mobility(d) => mobility::plot_mobility(d, path, opts),
        other => Err(QmtError::UnsupportedFormat(format!(
            "no chart is available for {} data",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::Geo1DData;

    #[test]
    fn test_chart_format_from_path() {
        assert_eq!(ChartFormat::from_path(Path::new("a/b.png")).unwrap(), ChartFormat::Png);
        assert_eq!(ChartFormat::from_path(Path::new("c.SVG")).unwrap(), ChartFormat::Svg);
        assert!(ChartFormat::from_path(Path::new("d.pdf")).is_err());
        assert!(ChartFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range([1.0, 3.0, f64::NAN, 2.0], 0.05).unwrap();
        assert!((lo - 0.9).abs() < 1e-12);
        assert!((hi - 3.1).abs() < 1e-12);
        assert_eq!(padded_range([2.0, 2.0], 0.1), Some((1.5, 2.5)));
        assert_eq!(padded_range(std::iter::empty(), 0.1), None);
    }

    #[test]
    fn test_title_or() {
        let mut opts = ChartOptions::default();
        assert_eq!(title_or(&opts, "Density"), "Density");
        opts.title = "Sample A".to_string();
        assert_eq!(title_or(&opts, "Density"), "Sample A");
    }

    #[test]
    fn test_plot_any_rejects_geometry() {
        let mut geo = Geo1DData::new();
        geo.add_part("well", 0.0, 1.0, false).unwrap();
        let path = std::env::temp_dir().join("qmtdata_geo_chart.png");
        assert!(matches!(
            plot_any(&AnyData::Geo1D(geo), &path, &ChartOptions::default()),
            Err(QmtError::UnsupportedFormat(_))
        ));
    }
}
