//! # 数据模块
//!
//! 将各数据类型汇总到同一命名空间下。根命名空间只导出以下名称：
//! `Data`, `Density1DData`, `Geo1DData`, `Geo2DData`, `Geo3DData`,
//! `Part3DData`, `ScalarData3D`, `FenicsPotentialData3D`, `ThomasFermiData`,
//! `SchrodingerPoissonData`, `MobilityData`。
//! 辅助类型（`DataKind`, `TetMesh`, `Directive` 等）通过各自子模块访问。
//!
//! ## 依赖关系
//! - 被 `io/`, `plot/`, `commands/` 使用
//! - 子模块: template, density, geo, part, scalar, mesh,
//!   thomas_fermi, schrodinger_poisson, mobility

pub mod density;
pub mod geo;
pub mod mesh;
pub mod mobility;
pub mod part;
pub mod scalar;
pub mod schrodinger_poisson;
pub mod template;
pub mod thomas_fermi;

pub use density::Density1DData;
pub use geo::{Geo1DData, Geo2DData, Geo3DData};
pub use mobility::MobilityData;
pub use part::Part3DData;
pub use scalar::{FenicsPotentialData3D, ScalarData3D};
pub use schrodinger_poisson::SchrodingerPoissonData;
pub use template::Data;
pub use thomas_fermi::ThomasFermiData;
