//! # Schrödinger-Poisson 计算结果
//!
//! 一维异质结自洽 Schrödinger-Poisson 输出：能带边、子带能量与波函数。
//!
//! ## 子带占据
//! 二维电子气第 i 个子带的面密度（Fermi-Dirac 积分）：
//! ```text
//! n_i = D · k_B T · ln(1 + exp((E_F − E_i) / k_B T)),   D = m* / (π ħ²)
//! ```
//! T = 0 时退化为 `D · max(E_F − E_i, 0)`。
//!
//! ## 依赖关系
//! - 使用 `constants.rs`
//! - 被 `io/csv.rs`, `plot/` 使用

use crate::constants::{dos_2d, BOLTZMANN_EV, PER_NM_TO_PER_CM};
use crate::data::density::{check_axis, check_finite, check_same_len, trapezoid};
use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Schrödinger-Poisson 结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchrodingerPoissonData {
    /// 生长方向坐标 (nm)
    pub z: Vec<f64>,

    /// 导带边 (eV)
    pub band_edge: Vec<f64>,

    /// 子带能量 (eV)，升序
    pub energies: Vec<f64>,

    /// 波函数，形状 (子带数, z 点数)
    pub wavefunctions: Array2<f64>,

    /// Fermi 能级 (eV)
    pub fermi_level: f64,

    /// 温度 (K)
    pub temperature: f64,

    /// 有效质量（电子静止质量单位）
    pub effective_mass: f64,
}

impl SchrodingerPoissonData {
    pub fn new(
        z: Vec<f64>,
        band_edge: Vec<f64>,
        energies: Vec<f64>,
        wavefunctions: Array2<f64>,
        fermi_level: f64,
        temperature: f64,
        effective_mass: f64,
    ) -> Result<Self> {
        let data = SchrodingerPoissonData {
            z,
            band_edge,
            energies,
            wavefunctions,
            fermi_level,
            temperature,
            effective_mass,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn num_states(&self) -> usize {
        self.energies.len()
    }

    /// 把每个波函数缩放到 ∫|ψ|² dz = 1
    pub fn normalize(&mut self) {
        for mut psi in self.wavefunctions.axis_iter_mut(Axis(0)) {
            let sq: Vec<f64> = psi.iter().map(|v| v * v).collect();
            let norm = trapezoid(&self.z, &sq).sqrt();
            if norm > 0.0 {
                psi.mapv_inplace(|v| v / norm);
            }
        }
    }

    /// 第 `i` 个子带的归一化概率密度 (1/nm)
    pub fn probability_density(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.num_states() {
            return None;
        }
        let sq: Vec<f64> = self.wavefunctions.row(i).iter().map(|v| v * v).collect();
        let norm = trapezoid(&self.z, &sq);
        if norm <= 0.0 {
            return None;
        }
        Some(sq.into_iter().map(|v| v / norm).collect())
    }

    /// 各子带面密度 (cm⁻²)
    pub fn subband_occupations(&self) -> Vec<f64> {
        let dos = dos_2d(self.effective_mass);
        let kt = BOLTZMANN_EV * self.temperature;
        self.energies
            .iter()
            .map(|&e| {
                let de = self.fermi_level - e;
                if kt <= 0.0 {
                    dos * de.max(0.0)
                } else {
                    dos * kt * softplus(de / kt)
                }
            })
            .collect()
    }

    /// 总面密度 (cm⁻²)
    pub fn sheet_density(&self) -> f64 {
        self.subband_occupations().iter().sum()
    }

    /// 体密度分布 (cm⁻³)：Σ n_i |ψ_i(z)|²
    pub fn electron_density(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.z.len()];
        for (i, n_i) in self.subband_occupations().into_iter().enumerate() {
            if let Some(prob) = self.probability_density(i) {
                for (t, p) in total.iter_mut().zip(prob) {
                    *t += n_i * p * PER_NM_TO_PER_CM;
                }
            }
        }
        total
    }

    /// 基态能量
    pub fn ground_state(&self) -> Option<f64> {
        self.energies.first().copied()
    }

    /// 相邻子带能量间隔
    pub fn subband_spacings(&self) -> Vec<f64> {
        self.energies.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// 已占据子带数（E_i < E_F）
    pub fn occupied_subbands(&self) -> usize {
        self.energies.iter().filter(|&&e| e < self.fermi_level).count()
    }
}

/// ln(1 + eˣ)，大 |x| 时数值稳定
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

impl Data for SchrodingerPoissonData {
    const KIND: DataKind = DataKind::SchrodingerPoisson;

    fn validate(&self) -> Result<()> {
        check_axis(Self::KIND, "z", &self.z)?;
        check_same_len(Self::KIND, "band_edge", self.z.len(), self.band_edge.len())?;
        check_finite(Self::KIND, "band_edge", &self.band_edge)?;
        check_finite(Self::KIND, "energies", &self.energies)?;
        if let Some(i) = self.energies.windows(2).position(|w| w[1] < w[0]) {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("energies are not ascending at index {}", i + 1),
            ));
        }

        let expected = (self.energies.len(), self.z.len());
        if self.wavefunctions.dim() != expected {
            return Err(QmtError::ShapeMismatch {
                what: "schrodinger_poisson wavefunctions".to_string(),
                expected: format!("{:?}", expected),
                found: format!("{:?}", self.wavefunctions.dim()),
            });
        }
        if self.wavefunctions.iter().any(|v| !v.is_finite()) {
            return Err(QmtError::invalid(Self::KIND, "wavefunctions contain non-finite values"));
        }
        for i in 0..self.num_states() {
            if self.probability_density(i).is_none() {
                return Err(QmtError::invalid(
                    Self::KIND,
                    format!("wavefunction {} is identically zero", i),
                ));
            }
        }

        if !(self.effective_mass.is_finite() && self.effective_mass > 0.0) {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("effective mass must be positive, got {}", self.effective_mass),
            ));
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
            ("z points".to_string(), self.z.len().to_string()),
            ("subbands".to_string(), self.num_states().to_string()),
            ("fermi level".to_string(), format!("{:.4} eV", self.fermi_level)),
            ("temperature".to_string(), format!("{:.2} K", self.temperature)),
            ("m*".to_string(), format!("{:.4} m_e", self.effective_mass)),
            ("occupied".to_string(), self.occupied_subbands().to_string()),
            ("sheet density".to_string(), format!("{:.4e} cm^-2", self.sheet_density())),
        ];
        for (i, (e, n)) in self
            .energies
            .iter()
            .zip(self.subband_occupations())
            .enumerate()
        {
            lines.push((format!("  E{}", i), format!("{:.5} eV, n = {:.3e} cm^-2", e, n)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    /// 宽 20 nm 的无限深势阱，前两个本征态
    fn square_well(fermi_level: f64, temperature: f64) -> SchrodingerPoissonData {
        let width = 20.0;
        let n = 401;
        let z: Vec<f64> = (0..n).map(|i| width * i as f64 / (n - 1) as f64).collect();
        let psi = Array2::from_shape_fn((2, n), |(s, i)| {
            (((s + 1) as f64) * PI * z[i] / width).sin()
        });
        SchrodingerPoissonData::new(
            z,
            vec![0.0; n],
            vec![0.014, 0.056],
            psi,
            fermi_level,
            temperature,
            0.067,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize() {
        let mut sp = square_well(0.03, 0.0);
        sp.normalize();
        let sq: Vec<f64> = sp.wavefunctions.row(0).iter().map(|v| v * v).collect();
        assert_abs_diff_eq!(trapezoid(&sp.z, &sq), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_probability_density_unit_integral() {
        let sp = square_well(0.03, 0.0);
        let p = sp.probability_density(1).unwrap();
        assert_abs_diff_eq!(trapezoid(&sp.z, &p), 1.0, epsilon = 1e-9);
        assert!(sp.probability_density(2).is_none());
    }

    #[test]
    fn test_zero_temperature_occupation() {
        let sp = square_well(0.03, 0.0);
        let occ = sp.subband_occupations();
        assert_relative_eq!(occ[0], dos_2d(0.067) * 0.016, max_relative = 1e-12);
        assert_eq!(occ[1], 0.0);
        assert_eq!(sp.occupied_subbands(), 1);
    }

    #[test]
    fn test_finite_temperature_approaches_zero_temperature() {
        let cold = square_well(0.03, 0.0).subband_occupations();
        let warm = square_well(0.03, 1.0).subband_occupations();
        assert_relative_eq!(warm[0], cold[0], max_relative = 1e-6);
        assert!(warm[1] < 1e-3);
    }

    #[test]
    fn test_occupations_decrease_with_energy() {
        let occ = square_well(0.1, 300.0).subband_occupations();
        assert!(occ[0] > occ[1]);
        assert!(occ[1] > 0.0);
    }

    #[test]
    fn test_electron_density_integrates_to_sheet_density() {
        let sp = square_well(0.08, 10.0);
        let n3d = sp.electron_density();
        // cm⁻³ × nm -> cm⁻²
        let sheet = trapezoid(&sp.z, &n3d) / PER_NM_TO_PER_CM;
        assert_relative_eq!(sheet, sp.sheet_density(), max_relative = 1e-9);
    }

    #[test]
    fn test_spacings_and_ground_state() {
        let sp = square_well(0.03, 0.0);
        assert_eq!(sp.ground_state(), Some(0.014));
        assert_abs_diff_eq!(sp.subband_spacings()[0], 0.042, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_descending_energies() {
        let mut sp = square_well(0.03, 0.0);
        sp.energies = vec![0.056, 0.014];
        assert!(sp.validate().is_err());
    }

    #[test]
    fn test_rejects_wavefunction_shape() {
        let mut sp = square_well(0.03, 0.0);
        sp.wavefunctions = Array2::ones((3, sp.z.len()));
        assert!(matches!(sp.validate(), Err(QmtError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_rejects_zero_wavefunction_and_mass() {
        let mut sp = square_well(0.03, 0.0);
        sp.wavefunctions.row_mut(1).fill(0.0);
        assert!(sp.validate().is_err());

        let mut sp = square_well(0.03, 0.0);
        sp.effective_mass = 0.0;
        assert!(sp.validate().is_err());
    }

    #[test]
    fn test_softplus_extremes() {
        assert_abs_diff_eq!(softplus(0.0), 2f64.ln(), epsilon = 1e-15);
        assert_abs_diff_eq!(softplus(800.0), 800.0, epsilon = 1e-9);
        assert!(softplus(-800.0) >= 0.0);
    }
}
