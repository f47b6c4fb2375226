//! # 物理常数
//!
//! CODATA 2018 数值（2019 SI 重定义后 e, k_B, h 为精确值）。
//!
//! ## 依赖关系
//! - 被 `data/schrodinger_poisson.rs`, `data/mobility.rs` 使用

/// 元电荷 (C)
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Boltzmann 常数 (eV/K)
pub const BOLTZMANN_EV: f64 = 8.617_333_262e-5;

/// 约化 Planck 常数 (J·s)
pub const HBAR: f64 = 1.054_571_817e-34;

/// 电子静止质量 (kg)
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;

/// 1/nm 换算为 1/cm
pub const PER_NM_TO_PER_CM: f64 = 1.0e7;

/// 二维态密度 m*/(π ħ²)，单位 eV⁻¹·cm⁻²
///
/// `effective_mass` 以电子静止质量为单位。
pub fn dos_2d(effective_mass: f64) -> f64 {
    // J⁻¹·m⁻² -> eV⁻¹·cm⁻²
    effective_mass * ELECTRON_MASS / (std::f64::consts::PI * HBAR * HBAR) * ELEMENTARY_CHARGE
        * 1.0e-4
}
