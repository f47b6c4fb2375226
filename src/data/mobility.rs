//! # 迁移率数据
//!
//! 二维载流子气的迁移率随面密度的变化，按散射机制分项。
//! 总迁移率由 Matthiessen 定则合成：1/μ = Σ 1/μ_i。
//!
//! ## 依赖关系
//! - 使用 `constants.rs`
//! - 被 `io/csv.rs`, `plot/` 使用

use crate::constants::ELEMENTARY_CHARGE;
use crate::data::density::{check_axis, check_same_len};
use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 迁移率数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobilityData {
    /// 面密度 (cm⁻²)，严格递增
    pub densities: Vec<f64>,

    /// 散射机制 -> 迁移率序列 (cm²/Vs)
    pub mechanisms: IndexMap<String, Vec<f64>>,

    /// 温度 (K)
    pub temperature: f64,
}

impl MobilityData {
    pub fn new(densities: Vec<f64>, temperature: f64) -> Result<Self> {
        let data = MobilityData {
            densities,
            mechanisms: IndexMap::new(),
            temperature,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn add_mechanism(&mut self, name: &str, mobility: Vec<f64>, overwrite: bool) -> Result<()> {
        if self.mechanisms.contains_key(name) && !overwrite {
            return Err(QmtError::DuplicateName {
                name: name.to_string(),
                container: "mobility mechanisms".to_string(),
            });
        }
        check_series(name, self.densities.len(), &mobility)?;
        self.mechanisms.insert(name.to_string(), mobility);
        Ok(())
    }

    /// Matthiessen 定则合成的总迁移率；无机制时为空
    pub fn total_mobility(&self) -> Vec<f64> {
        if self.mechanisms.is_empty() {
            return Vec::new();
        }
        (0..self.densities.len())
            .map(|i| {
                let inv: f64 = self.mechanisms.values().map(|mu| 1.0 / mu[i]).sum();
                1.0 / inv
            })
            .collect()
    }

    /// 第 `i` 个密度点上迁移率最低（起主导作用）的机制
    pub fn limiting_mechanism(&self, i: usize) -> Option<&str> {
        if i >= self.densities.len() {
            return None;
        }
        self.mechanisms
            .iter()
            .min_by(|a, b| a.1[i].total_cmp(&b.1[i]))
            .map(|(name, _)| name.as_str())
    }

    /// 方块电导 σ = n e μ (S)
    pub fn conductivity(&self) -> Vec<f64> {
        self.densities
            .iter()
            .zip(self.total_mobility())
            .map(|(n, mu)| n * ELEMENTARY_CHARGE * mu)
            .collect()
    }

    /// 总迁移率峰值 (密度, 迁移率)
    pub fn peak_mobility(&self) -> Option<(f64, f64)> {
        self.densities
            .iter()
            .copied()
            .zip(self.total_mobility())
            .fold(None, |best: Option<(f64, f64)>, (n, mu)| match best {
                Some((_, best_mu)) if best_mu >= mu => best,
                _ => Some((n, mu)),
            })
    }
}

fn check_series(name: &str, expected: usize, mobility: &[f64]) -> Result<()> {
    check_same_len(DataKind::Mobility, name, expected, mobility.len())?;
    if let Some(i) = mobility.iter().position(|&mu| !(mu.is_finite() && mu > 0.0)) {
        return Err(QmtError::invalid(
            DataKind::Mobility,
            format!("mechanism '{}' has a non-positive mobility at index {}", name, i),
        ));
    }
    Ok(())
}

impl Data for MobilityData {
    const KIND: DataKind = DataKind::Mobility;

    fn validate(&self) -> Result<()> {
        check_axis(Self::KIND, "densities", &self.densities)?;
        // 递增序列只需检查首项
        if self.densities[0] <= 0.0 {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("sheet densities must be positive, got {}", self.densities[0]),
            ));
        }
        for (name, mu) in &self.mechanisms {
            check_series(name, self.densities.len(), mu)?;
        }
        if !(self.temperature.is_finite() && self.temperature >= 0.0) {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("temperature must be >= 0 K, got {}", self.temperature),
            ));
        }
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let (lo, hi) = (self.densities[0], self.densities[self.densities.len() - 1]);
        let mut lines = vec![
            ("points".to_string(), self.densities.len().to_string()),
            ("density".to_string(), format!("{:.3e} .. {:.3e} cm^-2", lo, hi)),
            ("temperature".to_string(), format!("{:.2} K", self.temperature)),
            (
                "mechanisms".to_string(),
                self.mechanisms.keys().cloned().collect::<Vec<_>>().join(", "),
            ),
        ];
        if let Some((n, mu)) = self.peak_mobility() {
            lines.push((
                "peak".to_string(),
                format!("{:.4e} cm^2/Vs at {:.3e} cm^-2", mu, n),
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> MobilityData {
        let mut data = MobilityData::new(vec![1e11, 2e11, 4e11], 1.5).unwrap();
        data.add_mechanism("background", vec![1e5, 2e5, 4e5], false).unwrap();
        data.add_mechanism("interface", vec![4e5, 2e5, 1e5], false).unwrap();
        data
    }

    #[test]
    fn test_matthiessen_rule() {
        let total = sample().total_mobility();
        assert_relative_eq!(total[0], 8e4, max_relative = 1e-12);
        assert_relative_eq!(total[1], 1e5, max_relative = 1e-12);
        assert_relative_eq!(total[2], 8e4, max_relative = 1e-12);
    }

    #[test]
    fn test_limiting_mechanism() {
        let data = sample();
        assert_eq!(data.limiting_mechanism(0), Some("background"));
        assert_eq!(data.limiting_mechanism(2), Some("interface"));
        assert_eq!(data.limiting_mechanism(5), None);
    }

    #[test]
    fn test_conductivity() {
        let sigma = sample().conductivity();
        assert_relative_eq!(sigma[1], 2e11 * ELEMENTARY_CHARGE * 1e5, max_relative = 1e-12);
    }

    #[test]
    fn test_peak_mobility() {
        let (n, mu) = sample().peak_mobility().unwrap();
        assert_eq!(n, 2e11);
        assert_relative_eq!(mu, 1e5, max_relative = 1e-12);
        let empty = MobilityData::new(vec![1e11, 2e11], 0.0).unwrap();
        assert!(empty.total_mobility().is_empty());
        assert!(empty.peak_mobility().is_none());
    }

    #[test]
    fn test_add_mechanism_checks() {
        let mut data = sample();
        assert!(matches!(
            data.add_mechanism("background", vec![1.0, 1.0, 1.0], false),
            Err(QmtError::DuplicateName { .. })
        ));
        assert!(data.add_mechanism("phonon", vec![1.0, 1.0], false).is_err());
        assert!(data.add_mechanism("phonon", vec![1.0, 0.0, 1.0], false).is_err());
        data.add_mechanism("background", vec![1.0, 1.0, 1.0], true).unwrap();
        assert_eq!(data.mechanisms.len(), 2);
    }

    #[test]
    fn test_rejects_unsorted_densities() {
        assert!(MobilityData::new(vec![2e11, 1e11], 1.0).is_err());
        assert!(MobilityData::new(vec![1e11, 2e11], -1.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive_densities() {
        assert!(matches!(
            MobilityData::new(vec![-1e11, 0.0, 1e11], 1.0),
            Err(QmtError::InvalidData { .. })
        ));
        assert!(MobilityData::new(vec![0.0, 1e11], 1.0).is_err());
        assert!(MobilityData::new(vec![1e9, 1e11], 1.0).is_ok());
    }
}
