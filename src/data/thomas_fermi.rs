//! # Thomas-Fermi 计算结果
//!
//! 四面体网格上收敛后的电势与载流子密度，附带 Fermi 能级、温度和收敛信息。
//!
//! ## 依赖关系
//! - 使用 `data/mesh.rs` 的 `TetMesh`
//! - 使用 `data/scalar.rs` 的 `FenicsPotentialData3D`
//! - 被 `commands/sample.rs` 使用

use crate::data::density::check_finite;
use crate::data::mesh::TetMesh;
use crate::data::scalar::FenicsPotentialData3D;
use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 自洽迭代的收敛信息
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    pub iterations: u32,
    pub residual: f64,
    pub converged: bool,
}

impl Default for Convergence {
    fn default() -> Self {
        Convergence {
            iterations: 0,
            residual: f64::INFINITY,
            converged: false,
        }
    }
}

/// Thomas-Fermi 结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThomasFermiData {
    pub mesh: TetMesh,

    /// 顶点电势 (V)
    pub potential: Vec<f64>,

    /// 顶点载流子密度（每单位体积，长度单位同网格）
    pub density: Vec<f64>,

    /// Fermi 能级 (eV)
    pub fermi_level: f64,

    /// 温度 (K)
    pub temperature: f64,

    pub convergence: Convergence,
}

impl ThomasFermiData {
    pub fn new(
        mesh: TetMesh,
        potential: Vec<f64>,
        density: Vec<f64>,
        fermi_level: f64,
        temperature: f64,
    ) -> Result<Self> {
        let data = ThomasFermiData {
            mesh,
            potential,
            density,
            fermi_level,
            temperature,
            convergence: Convergence::default(),
        };
        data.validate()?;
        Ok(data)
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    /// 以 P1 电势形式取出
    pub fn potential_data(&self) -> FenicsPotentialData3D {
        FenicsPotentialData3D {
            mesh: self.mesh.clone(),
            values: self.potential.clone(),
        }
    }

    pub fn density_at(&self, point: [f64; 3]) -> Option<f64> {
        self.mesh.interpolate(&self.density, point)
    }

    pub fn potential_at(&self, point: [f64; 3]) -> Option<f64> {
        self.mesh.interpolate(&self.potential, point)
    }

    /// 全网格积分的载流子总数
    pub fn total_charge(&self) -> f64 {
        self.mesh.integrate_per_tet(&self.density).iter().sum()
    }

    /// 按区域的载流子数
    pub fn charge_by_region(&self) -> IndexMap<String, f64> {
        let per_tet = self.mesh.integrate_per_tet(&self.density);
        self.mesh.sum_by_region(&per_tet)
    }
}

impl Data for ThomasFermiData {
    const KIND: DataKind = DataKind::ThomasFermi;

    fn validate(&self) -> Result<()> {
        self.mesh.validate()?;
        let n = self.mesh.num_vertices();
        for (name, values) in [("potential", &self.potential), ("density", &self.density)] {
            if values.len() != n {
                return Err(QmtError::ShapeMismatch {
                    what: format!("thomas_fermi {}", name),
                    expected: n.to_string(),
                    found: values.len().to_string(),
                });
            }
            check_finite(Self::KIND, name, values)?;
        }
        if !(self.temperature.is_finite() && self.temperature >= 0.0) {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("temperature must be >= 0 K, got {}", self.temperature),
            ));
        }
        if !self.fermi_level.is_finite() {
            return Err(QmtError::invalid(Self::KIND, "fermi level is not finite"));
        }
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            (
                "mesh".to_string(),
                format!("{} vertices, {} tets", self.mesh.num_vertices(), self.mesh.num_tets()),
            ),
            ("fermi level".to_string(), format!("{:.4} eV", self.fermi_level)),
            ("temperature".to_string(), format!("{:.2} K", self.temperature)),
            (
                "convergence".to_string(),
                format!(
                    "{} after {} iterations (residual {:.3e})",
                    if self.convergence.converged { "converged" } else { "not converged" },
                    self.convergence.iterations,
                    self.convergence.residual
                ),
            ),
            ("total charge".to_string(), format!("{:.4e}", self.total_charge())),
        ];
        for (region, q) in self.charge_by_region() {
            lines.push((format!("  {}", region), format!("{:.4e}", q)));
        }
        lines
    }
}
