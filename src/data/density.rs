//! # 一维载流子密度
//!
//! 沿单一坐标轴采样的载流子密度分布。
//!
//! ## 依赖关系
//! - 被 `io/csv.rs`, `plot/`, `commands/sample.rs` 使用
//! - 实现 `data/template.rs` 的 `Data`

use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use serde::{Deserialize, Serialize};

/// 一维密度数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Density1DData {
    /// 采样位置（严格递增）
    pub mesh: Vec<f64>,

    /// 各位置的密度
    pub density: Vec<f64>,

    /// 长度单位
    pub length_unit: String,

    /// 密度单位
    pub density_unit: String,
}

impl Density1DData {
    pub fn new(mesh: Vec<f64>, density: Vec<f64>) -> Result<Self> {
        let data = Density1DData {
            mesh,
            density,
            length_unit: "nm".to_string(),
            density_unit: "cm^-3".to_string(),
        };
        data.validate()?;
        Ok(data)
    }

    pub fn with_units(mut self, length_unit: impl Into<String>, density_unit: impl Into<String>) -> Self {
        self.length_unit = length_unit.into();
        self.density_unit = density_unit.into();
        self
    }

    pub fn len(&self) -> usize {
        self.mesh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// 采样区间 (min, max)
    pub fn bounds(&self) -> (f64, f64) {
        (self.mesh[0], self.mesh[self.mesh.len() - 1])
    }

    /// 线性插值，区间外返回 `None`
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        linear_interpolate(&self.mesh, &self.density, x)
    }

    /// 梯形积分（面密度）
    pub fn integrate(&self) -> f64 {
        trapezoid(&self.mesh, &self.density)
    }

    /// 最大值位置与数值（并列时取第一个）
    pub fn peak(&self) -> (f64, f64) {
        let mut best = 0;
        for (i, &n) in self.density.iter().enumerate() {
            if n > self.density[best] {
                best = i;
            }
        }
        (self.mesh[best], self.density[best])
    }

    /// 在相同区间上均匀重采样为 `n` 个点
    pub fn resample(&self, n: usize) -> Result<Density1DData> {
        if n < 2 {
            return Err(QmtError::InvalidArgument(format!(
                "resample needs at least 2 points, got {}",
                n
            )));
        }
        let (lo, hi) = self.bounds();
        let step = (hi - lo) / (n - 1) as f64;
        let mesh: Vec<f64> = (0..n)
            .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
            .collect();
        let density = mesh
            .iter()
            .map(|&x| self.interpolate(x).unwrap_or(0.0))
            .collect();

        Ok(Density1DData {
            mesh,
            density,
            length_unit: self.length_unit.clone(),
            density_unit: self.density_unit.clone(),
        })
    }

    /// 密度乘以常数（单位换算）
    pub fn scaled(&self, factor: f64, density_unit: impl Into<String>) -> Density1DData {
        Density1DData {
            mesh: self.mesh.clone(),
            density: self.density.iter().map(|n| n * factor).collect(),
            length_unit: self.length_unit.clone(),
            density_unit: density_unit.into(),
        }
    }
}

impl Data for Density1DData {
    const KIND: DataKind = DataKind::Density1D;

    fn validate(&self) -> Result<()> {
        check_axis(Self::KIND, "mesh", &self.mesh)?;
        check_same_len(Self::KIND, "density", self.mesh.len(), self.density.len())?;
        check_finite(Self::KIND, "density", &self.density)
    }

    fn summary(&self) -> Vec<(String, String)> {
        let (lo, hi) = self.bounds();
        let (x_peak, n_peak) = self.peak();
        vec![
            ("points".to_string(), self.len().to_string()),
            (
                "range".to_string(),
                format!("{:.4} .. {:.4} {}", lo, hi, self.length_unit),
            ),
            (
                "peak".to_string(),
                format!("{:.4e} {} at {:.4} {}", n_peak, self.density_unit, x_peak, self.length_unit),
            ),
            ("integral".to_string(), format!("{:.4e}", self.integrate())),
        ]
    }
}

// ─────────────────────────────────────────────────────────────
// 一维数值工具（同模块内其他数据类型共用）
// ─────────────────────────────────────────────────────────────

/// 校验坐标轴：至少两点、有限、严格递增
pub(crate) fn check_axis(kind: DataKind, name: &str, axis: &[f64]) -> Result<()> {
    if axis.len() < 2 {
        return Err(QmtError::invalid(
            kind,
            format!("{} needs at least 2 points, got {}", name, axis.len()),
        ));
    }
    check_finite(kind, name, axis)?;
    if let Some(i) = axis.windows(2).position(|w| w[1] <= w[0]) {
        return Err(QmtError::invalid(
            kind,
            format!("{} is not strictly increasing at index {}", name, i + 1),
        ));
    }
    Ok(())
}

pub(crate) fn check_finite(kind: DataKind, name: &str, values: &[f64]) -> Result<()> {
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(QmtError::invalid(
            kind,
            format!("{} has a non-finite value at index {}", name, i),
        ));
    }
    Ok(())
}

pub(crate) fn check_same_len(kind: DataKind, name: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(QmtError::ShapeMismatch {
            what: format!("{} {}", kind, name),
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// 在严格递增的 `xs` 上线性插值
pub(crate) fn linear_interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let (first, last) = (*xs.first()?, *xs.last()?);
    if !(first..=last).contains(&x) {
        return None;
    }
    let hi = xs.partition_point(|&v| v < x).max(1).min(xs.len() - 1);
    let lo = hi - 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    Some(ys[lo] + t * (ys[hi] - ys[lo]))
}

/// 梯形积分
pub(crate) fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn triangle() -> Density1DData {
        Density1DData::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 2.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Density1DData::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, QmtError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_new_rejects_unsorted_mesh() {
        assert!(Density1DData::new(vec![0.0, 2.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
        assert!(Density1DData::new(vec![0.0, 0.0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_new_rejects_single_point_and_nan() {
        assert!(Density1DData::new(vec![0.0], vec![1.0]).is_err());
        assert!(Density1DData::new(vec![0.0, 1.0], vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_integrate_triangle() {
        assert_abs_diff_eq!(triangle().integrate(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate() {
        let d = triangle();
        assert_abs_diff_eq!(d.interpolate(1.5).unwrap(), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(d.interpolate(0.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.interpolate(4.0).unwrap(), 0.0, epsilon = 1e-12);
        assert!(d.interpolate(-0.1).is_none());
        assert!(d.interpolate(4.1).is_none());
    }

    #[test]
    fn test_peak_first_on_ties() {
        let d = Density1DData::new(vec![0.0, 1.0, 2.0], vec![3.0, 3.0, 1.0]).unwrap();
        assert_eq!(d.peak(), (0.0, 3.0));
        assert_eq!(triangle().peak(), (2.0, 2.0));
    }

    #[test]
    fn test_resample_keeps_bounds() {
        let r = triangle().resample(9).unwrap();
        assert_eq!(r.len(), 9);
        assert_eq!(r.bounds(), (0.0, 4.0));
        assert_abs_diff_eq!(r.interpolate(2.5).unwrap(), 1.5, epsilon = 1e-12);
        assert!(triangle().resample(1).is_err());
    }

    #[test]
    fn test_scaled() {
        let s = triangle().scaled(1e-21, "nm^-3");
        assert_eq!(s.density_unit, "nm^-3");
        assert_abs_diff_eq!(s.density[2], 2e-21, epsilon = 1e-30);
    }

    #[test]
    fn test_summary_keys() {
        let keys: Vec<String> = triangle().summary().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["points", "range", "peak", "integral"]);
    }
}
