//! # 四面体网格
//!
//! 三维数据类型共用的非结构化四面体网格，每个四面体带区域编号。
//!
//! ## 依赖关系
//! - 被 `data/geo.rs`, `data/scalar.rs`, `data/thomas_fermi.rs` 使用

use crate::error::{QmtError, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 点定位容差（重心坐标）
const LOCATE_TOL: f64 = 1e-9;

/// 退化判据：体积不超过包围盒对角线立方的这一比例
const DEGENERATE_REL: f64 = 1e-12;

/// 四面体网格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TetMesh {
    /// 顶点坐标
    pub vertices: Vec<[f64; 3]>,

    /// 四面体顶点索引
    pub tets: Vec<[usize; 4]>,

    /// 每个四面体的区域编号
    pub regions: Vec<u32>,

    /// 区域编号 -> 区域名称（通常是部件标签）
    pub region_names: IndexMap<u32, String>,
}

impl TetMesh {
    pub fn new(vertices: Vec<[f64; 3]>, tets: Vec<[usize; 4]>, regions: Vec<u32>) -> Self {
        TetMesh {
            vertices,
            tets,
            regions,
            region_names: IndexMap::new(),
        }
    }

    pub fn with_region_name(mut self, id: u32, name: impl Into<String>) -> Self {
        self.region_names.insert(id, name.into());
        self
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_tets(&self) -> usize {
        self.tets.len()
    }

    /// 校验网格拓扑
    pub fn validate(&self) -> Result<()> {
        if self.tets.is_empty() {
            return Err(QmtError::invalid("mesh", "mesh has no tetrahedra"));
        }
        if self.regions.len() != self.tets.len() {
            return Err(QmtError::ShapeMismatch {
                what: "mesh regions".to_string(),
                expected: self.tets.len().to_string(),
                found: self.regions.len().to_string(),
            });
        }
        if let Some(v) = self.vertices.iter().find(|v| v.iter().any(|c| !c.is_finite())) {
            return Err(QmtError::invalid(
                "mesh",
                format!("non-finite vertex {:?}", v),
            ));
        }

        let n = self.vertices.len();
        let min_volume = self.volume_tolerance();
        for (i, tet) in self.tets.iter().enumerate() {
            if let Some(&idx) = tet.iter().find(|&&idx| idx >= n) {
                return Err(QmtError::invalid(
                    "mesh",
                    format!("tetrahedron {} references vertex {} (only {} vertices)", i, idx, n),
                ));
            }
            for a in 0..4 {
                for b in (a + 1)..4 {
                    if tet[a] == tet[b] {
                        return Err(QmtError::invalid(
                            "mesh",
                            format!("tetrahedron {} repeats vertex {}", i, tet[a]),
                        ));
                    }
                }
            }
            if self.tet_volume(i) <= min_volume {
                return Err(QmtError::invalid(
                    "mesh",
                    format!("tetrahedron {} is degenerate", i),
                ));
            }
        }

        for region in &self.regions {
            if !self.region_names.contains_key(region) {
                return Err(QmtError::invalid(
                    "mesh",
                    format!("region id {} has no name", region),
                ));
            }
        }

        Ok(())
    }

    /// 四面体体积（绝对值）
    pub fn tet_volume(&self, tet: usize) -> f64 {
        let [a, b, c, d] = self.corners(tet);
        signed_volume(a, b, c, d).abs()
    }

    /// 四面体所属区域名称
    pub fn region_name(&self, tet: usize) -> Option<&str> {
        self.regions
            .get(tet)
            .and_then(|id| self.region_names.get(id))
            .map(|s| s.as_str())
    }

    /// 退化体积阈值，随网格尺度缩放
    pub fn volume_tolerance(&self) -> f64 {
        self.bounding_box()
            .map(|(lo, hi)| DEGENERATE_REL * diagonal(lo, hi).powi(3))
            .unwrap_or(0.0)
    }

    /// 包围盒 (min, max)
    pub fn bounding_box(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = self.vertices.first()?;
        let mut lo = *first;
        let mut hi = *first;
        for v in &self.vertices {
            for k in 0..3 {
                lo[k] = lo[k].min(v[k]);
                hi[k] = hi[k].max(v[k]);
            }
        }
        Some((lo, hi))
    }

    /// 定位包含 `point` 的四面体，返回其索引与重心坐标
    pub fn locate(&self, point: [f64; 3]) -> Option<(usize, [f64; 4])> {
        let (lo, hi) = self.bounding_box()?;
        let slack = LOCATE_TOL * diagonal(lo, hi);
        if (0..3).any(|k| point[k] < lo[k] - slack || point[k] > hi[k] + slack) {
            return None;
        }

        let min_volume = self.volume_tolerance();
        (0..self.tets.len()).find_map(|i| {
            let bary = self.barycentric(i, point, min_volume)?;
            if bary.iter().all(|&w| w >= -LOCATE_TOL) {
                Some((i, bary))
            } else {
                None
            }
        })
    }

    /// P1 插值：顶点值按重心坐标加权
    pub fn interpolate(&self, values: &[f64], point: [f64; 3]) -> Option<f64> {
        let (tet, bary) = self.locate(point)?;
        Some(
            self.tets[tet]
                .iter()
                .zip(bary.iter())
                .map(|(&v, &w)| values[v] * w)
                .sum(),
        )
    }

    /// 逐四面体积分 P1 函数（体积 × 顶点平均值）
    pub fn integrate_per_tet(&self, values: &[f64]) -> Vec<f64> {
        self.tets
            .iter()
            .enumerate()
            .map(|(i, tet)| {
                let mean = tet.iter().map(|&v| values[v]).sum::<f64>() / 4.0;
                self.tet_volume(i) * mean
            })
            .collect()
    }

    /// 按区域名称汇总逐四面体数值
    pub fn sum_by_region(&self, per_tet: &[f64]) -> IndexMap<String, f64> {
        let mut totals: IndexMap<String, f64> = self
            .region_names
            .values()
            .map(|name| (name.clone(), 0.0))
            .collect();
        for (i, value) in per_tet.iter().enumerate() {
            if let Some(name) = self.region_name(i) {
                *totals.entry(name.to_string()).or_insert(0.0) += value;
            }
        }
        totals
    }

    fn corners(&self, tet: usize) -> [[f64; 3]; 4] {
        let t = self.tets[tet];
        [
            self.vertices[t[0]],
            self.vertices[t[1]],
            self.vertices[t[2]],
            self.vertices[t[3]],
        ]
    }

    fn barycentric(&self, tet: usize, p: [f64; 3], min_volume: f64) -> Option<[f64; 4]> {
        let [a, b, c, d] = self.corners(tet);
        let total = signed_volume(a, b, c, d);
        if total.abs() <= min_volume {
            return None;
        }
        let wa = signed_volume(p, b, c, d) / total;
        let wb = signed_volume(a, p, c, d) / total;
        let wc = signed_volume(a, b, p, d) / total;
        let wd = 1.0 - wa - wb - wc;
        Some([wa, wb, wc, wd])
    }
}

fn diagonal(lo: [f64; 3], hi: [f64; 3]) -> f64 {
    (0..3).map(|k| (hi[k] - lo[k]).powi(2)).sum::<f64>().sqrt()
}

/// 四面体有向体积
fn signed_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let w = [d[0] - a[0], d[1] - a[1], d[2] - a[2]];
    (u[0] * (v[1] * w[2] - v[2] * w[1]) - u[1] * (v[0] * w[2] - v[2] * w[0])
        + u[2] * (v[0] * w[1] - v[1] * w[0]))
        / 6.0
}

/// 测试用：单位立方体剖分为 6 个四面体，前三个属于 substrate，后三个属于 gate
#[cfg(test)]
pub(crate) fn unit_cube_mesh() -> TetMesh {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    // Kuhn 剖分：所有四面体共享对角线 0-6
    let tets = vec![
        [0, 1, 2, 6],
        [0, 2, 3, 6],
        [0, 3, 7, 6],
        [0, 7, 4, 6],
        [0, 4, 5, 6],
        [0, 5, 1, 6],
    ];
    let regions = vec![1, 1, 1, 2, 2, 2];
    TetMesh::new(vertices, tets, regions)
        .with_region_name(1, "substrate")
        .with_region_name(2, "gate")
}
