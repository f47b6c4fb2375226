//! # 三维标量场
//!
//! - `ScalarData3D`: 直角网格上的标量场，三线性插值
//! - `FenicsPotentialData3D`: 四面体网格上的 P1 有限元电势（FEniCS 导出格式的等价表示）
//!
//! ## 依赖关系
//! - 使用 `data/mesh.rs` 的 `TetMesh`
//! - 被 `data/thomas_fermi.rs`, `commands/sample.rs` 使用
//! - 使用 `ndarray` 存储网格数据，`rayon` 并行采样

use crate::data::density::{check_axis, check_finite};
use crate::data::mesh::TetMesh;
use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use ndarray::Array3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────
// ScalarData3D
// ─────────────────────────────────────────────────────────────

/// 直角网格标量场，`values[[i, j, k]]` 对应 `(x[i], y[j], z[k])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarData3D {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub values: Array3<f64>,

    /// 物理量名称
    pub name: String,

    /// 物理量单位
    pub unit: String,
}

impl ScalarData3D {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, values: Array3<f64>) -> Result<Self> {
        let data = ScalarData3D {
            x,
            y,
            z,
            values,
            name: "scalar".to_string(),
            unit: String::new(),
        };
        data.validate()?;
        Ok(data)
    }

    pub fn with_name_unit(mut self, name: impl Into<String>, unit: impl Into<String>) -> Self {
        self.name = name.into();
        self.unit = unit.into();
        self
    }

    /// 各轴范围
    pub fn bounds(&self) -> [(f64, f64); 3] {
        [axis_bounds(&self.x), axis_bounds(&self.y), axis_bounds(&self.z)]
    }

    /// 三线性插值，网格外返回 `None`
    pub fn interpolate(&self, p: [f64; 3]) -> Option<f64> {
        let (i, tx) = cell_of(&self.x, p[0])?;
        let (j, ty) = cell_of(&self.y, p[1])?;
        let (k, tz) = cell_of(&self.z, p[2])?;

        let v = &self.values;
        let lerp = |a: f64, b: f64, t: f64| a + t * (b - a);

        let c00 = lerp(v[[i, j, k]], v[[i + 1, j, k]], tx);
        let c10 = lerp(v[[i, j + 1, k]], v[[i + 1, j + 1, k]], tx);
        let c01 = lerp(v[[i, j, k + 1]], v[[i + 1, j, k + 1]], tx);
        let c11 = lerp(v[[i, j + 1, k + 1]], v[[i + 1, j + 1, k + 1]], tx);

        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);
        Some(lerp(c0, c1, tz))
    }

    /// 忽略 NaN 的最小值与最大值
    pub fn min_max(&self) -> Option<(f64, f64)> {
        min_max(self.values.iter().copied())
    }

    /// 忽略 NaN 的算术平均
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// 沿线段均匀取 `n` 个点的剖面
    pub fn line_profile(&self, start: [f64; 3], end: [f64; 3], n: usize) -> Result<Vec<([f64; 3], Option<f64>)>> {
        if n < 2 {
            return Err(QmtError::InvalidArgument(format!(
                "line profile needs at least 2 points, got {}",
                n
            )));
        }
        Ok((0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                let p = [
                    start[0] + t * (end[0] - start[0]),
                    start[1] + t * (end[1] - start[1]),
                    start[2] + t * (end[2] - start[2]),
                ];
                (p, self.interpolate(p))
            })
            .collect())
    }
}

impl Data for ScalarData3D {
    const KIND: DataKind = DataKind::Scalar3D;

    fn validate(&self) -> Result<()> {
        check_axis(Self::KIND, "x", &self.x)?;
        check_axis(Self::KIND, "y", &self.y)?;
        check_axis(Self::KIND, "z", &self.z)?;
        let expected = (self.x.len(), self.y.len(), self.z.len());
        if self.values.dim() != expected {
            return Err(QmtError::ShapeMismatch {
                what: "scalar3d values".to_string(),
                expected: format!("{:?}", expected),
                found: format!("{:?}", self.values.dim()),
            });
        }
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let (nx, ny, nz) = self.values.dim();
        let b = self.bounds();
        let mut lines = vec![
            ("quantity".to_string(), format!("{} [{}]", self.name, self.unit)),
            ("grid".to_string(), format!("{} x {} x {}", nx, ny, nz)),
            (
                "extent".to_string(),
                format!(
                    "x {:.3}..{:.3}, y {:.3}..{:.3}, z {:.3}..{:.3}",
                    b[0].0, b[0].1, b[1].0, b[1].1, b[2].0, b[2].1
                ),
            ),
        ];
        if let Some((lo, hi)) = self.min_max() {
            lines.push(("range".to_string(), format!("{:.4e} .. {:.4e}", lo, hi)));
        }
        lines
    }
}

fn axis_bounds(axis: &[f64]) -> (f64, f64) {
    (axis[0], axis[axis.len() - 1])
}

/// 返回 `v` 所在单元的下标与单元内归一化坐标
fn cell_of(axis: &[f64], v: f64) -> Option<(usize, f64)> {
    let (lo, hi) = axis_bounds(axis);
    if !(lo..=hi).contains(&v) {
        return None;
    }
    let upper = axis.partition_point(|&a| a < v).max(1).min(axis.len() - 1);
    let i = upper - 1;
    Some((i, (v - axis[i]) / (axis[upper] - axis[i])))
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ─────────────────────────────────────────────────────────────
// FenicsPotentialData3D
// ─────────────────────────────────────────────────────────────

/// 四面体网格上的 P1 电势，每个顶点一个值 (V)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenicsPotentialData3D {
    pub mesh: TetMesh,
    pub values: Vec<f64>,
}

impl FenicsPotentialData3D {
    pub fn new(mesh: TetMesh, values: Vec<f64>) -> Result<Self> {
        let data = FenicsPotentialData3D { mesh, values };
        data.validate()?;
        Ok(data)
    }

    /// 在任意点求值，网格外返回 `None`
    pub fn evaluate(&self, point: [f64; 3]) -> Option<f64> {
        self.mesh.interpolate(&self.values, point)
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        min_max(self.values.iter().copied())
    }

    /// 并行采样到直角网格；网格外的点取 `fill`
    pub fn to_scalar_data(&self, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, fill: f64) -> Result<ScalarData3D> {
        let (nx, ny, nz) = (x.len(), y.len(), z.len());
        log::debug!("sampling P1 potential onto {}x{}x{} grid", nx, ny, nz);

        let samples: Vec<f64> = (0..nx * ny * nz)
            .into_par_iter()
            .map(|flat| {
                let (i, rest) = (flat / (ny * nz), flat % (ny * nz));
                let (j, k) = (rest / nz, rest % nz);
                self.evaluate([x[i], y[j], z[k]]).unwrap_or(fill)
            })
            .collect();

        let values = Array3::from_shape_vec((nx, ny, nz), samples).map_err(|e| QmtError::ShapeMismatch {
            what: "sampled grid".to_string(),
            expected: format!("({}, {}, {})", nx, ny, nz),
            found: e.to_string(),
        })?;

        let outside = values
            .iter()
            .filter(|v| v.to_bits() == fill.to_bits())
            .count();
        if outside > 0 {
            log::debug!("{} grid points filled with {}", outside, fill);
        }

        Ok(ScalarData3D::new(x, y, z, values)?.with_name_unit("potential", "V"))
    }
}

impl Data for FenicsPotentialData3D {
    const KIND: DataKind = DataKind::FenicsPotential3D;

    fn validate(&self) -> Result<()> {
        self.mesh.validate()?;
        if self.values.len() != self.mesh.num_vertices() {
            return Err(QmtError::ShapeMismatch {
                what: "potential values".to_string(),
                expected: self.mesh.num_vertices().to_string(),
                found: self.values.len().to_string(),
            });
        }
        check_finite(Self::KIND, "values", &self.values)
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("vertices".to_string(), self.mesh.num_vertices().to_string()),
            ("tetrahedra".to_string(), self.mesh.num_tets().to_string()),
            ("regions".to_string(), self.mesh.region_names.len().to_string()),
        ];
        if let Some((lo, hi)) = self.min_max() {
            lines.push(("potential".to_string(), format!("{:.4} .. {:.4} V", lo, hi)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mesh::unit_cube_mesh;
    use approx::assert_abs_diff_eq;

    fn linear(p: [f64; 3]) -> f64 {
        1.0 + 2.0 * p[0] - 3.0 * p[1] + 0.5 * p[2]
    }

    fn linear_grid() -> ScalarData3D {
        let x = vec![0.0, 1.0, 3.0];
        let y = vec![0.0, 2.0];
        let z = vec![-1.0, 0.0, 1.0, 2.0];
        let values = Array3::from_shape_fn((3, 2, 4), |(i, j, k)| linear([x[i], y[j], z[k]]));
        ScalarData3D::new(x, y, z, values).unwrap()
    }

    #[test]
    fn test_trilinear_reproduces_linear_field() {
        let grid = linear_grid();
        for p in [[0.5, 1.0, 0.5], [2.9, 0.1, -0.9], [3.0, 2.0, 2.0], [0.0, 0.0, -1.0]] {
            assert_abs_diff_eq!(grid.interpolate(p).unwrap(), linear(p), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interpolate_outside() {
        let grid = linear_grid();
        assert!(grid.interpolate([3.1, 0.0, 0.0]).is_none());
        assert!(grid.interpolate([0.0, -0.1, 0.0]).is_none());
        assert!(grid.interpolate([0.0, 0.0, f64::NAN]).is_none());
    }

    #[test]
    fn test_shape_mismatch() {
        let values = Array3::zeros((2, 2, 2));
        let err = ScalarData3D::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0], vec![0.0, 1.0], values).unwrap_err();
        assert!(matches!(err, QmtError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_min_max_mean() {
        let x = vec![0.0, 1.0];
        let mut values = Array3::from_elem((2, 2, 2), 1.0);
        values[[0, 0, 0]] = -2.0;
        values[[1, 1, 1]] = f64::NAN;
        let grid = ScalarData3D::new(x.clone(), x.clone(), x, values).unwrap();
        assert_eq!(grid.min_max(), Some((-2.0, 1.0)));
        assert_abs_diff_eq!(grid.mean().unwrap(), 4.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_line_profile() {
        let grid = linear_grid();
        let profile = grid.line_profile([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], 5).unwrap();
        assert_eq!(profile.len(), 5);
        assert_abs_diff_eq!(profile[1].1.unwrap(), linear([1.0, 0.0, 0.0]), epsilon = 1e-12);
        assert!(profile[4].1.is_none());
        assert!(grid.line_profile([0.0; 3], [1.0; 3], 1).is_err());
    }

    #[test]
    fn test_fenics_evaluate_linear() {
        let mesh = unit_cube_mesh();
        let values = mesh.vertices.iter().map(|&v| linear(v)).collect();
        let pot = FenicsPotentialData3D::new(mesh, values).unwrap();
        assert_abs_diff_eq!(pot.evaluate([0.3, 0.6, 0.2]).unwrap(), linear([0.3, 0.6, 0.2]), epsilon = 1e-9);
        assert!(pot.evaluate([2.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_fenics_evaluate_micron_scale_mesh() {
        let mut mesh = unit_cube_mesh();
        for v in &mut mesh.vertices {
            *v = [v[0] * 1e-5, v[1] * 1e-5, v[2] * 1e-5];
        }
        let values = vec![0.25; mesh.num_vertices()];
        let pot = FenicsPotentialData3D::new(mesh, values).unwrap();
        assert_abs_diff_eq!(pot.evaluate([0.5e-5; 3]).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_fenics_rejects_wrong_length() {
        let mesh = unit_cube_mesh();
        assert!(FenicsPotentialData3D::new(mesh, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_fenics_to_scalar_data() {
        let mesh = unit_cube_mesh();
        let values = mesh.vertices.iter().map(|&v| linear(v)).collect();
        let pot = FenicsPotentialData3D::new(mesh, values).unwrap();

        let axis = vec![0.0, 0.5, 1.0, 1.5];
        let grid = pot.to_scalar_data(axis.clone(), axis.clone(), axis, f64::NAN).unwrap();
        assert_eq!(grid.values.dim(), (4, 4, 4));
        assert_eq!(grid.unit, "V");
        assert_abs_diff_eq!(grid.values[[1, 2, 1]], linear([0.5, 1.0, 0.5]), epsilon = 1e-9);
        assert!(grid.values[[3, 0, 0]].is_nan());
    }
}
