//! # 数据模板
//!
//! 所有可存储数据类型的公共契约 `Data`，以及数据种类标签 `DataKind`。
//!
//! ## 依赖关系
//! - 被 `data/` 下所有数据类型实现
//! - 使用 `io/store.rs` 完成二进制编解码

use crate::error::{QmtError, Result};
use crate::io::store;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 数据种类标签，写入存储文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    Density1D,
    Geo1D,
    Geo2D,
    Geo3D,
    Part3D,
    Scalar3D,
    FenicsPotential3D,
    ThomasFermi,
    SchrodingerPoisson,
    Mobility,
}

impl DataKind {
    /// 全部种类（按声明顺序）
    pub const ALL: [DataKind; 10] = [
        DataKind::Density1D,
        DataKind::Geo1D,
        DataKind::Geo2D,
        DataKind::Geo3D,
        DataKind::Part3D,
        DataKind::Scalar3D,
        DataKind::FenicsPotential3D,
        DataKind::ThomasFermi,
        DataKind::SchrodingerPoisson,
        DataKind::Mobility,
    ];

    /// 稳定名称，用于显示与命令行解析
    pub fn name(&self) -> &'static str {
        match self {
            DataKind::Density1D => "density1d",
            DataKind::Geo1D => "geo1d",
            DataKind::Geo2D => "geo2d",
            DataKind::Geo3D => "geo3d",
            DataKind::Part3D => "part3d",
            DataKind::Scalar3D => "scalar3d",
            DataKind::FenicsPotential3D => "fenics_potential3d",
            DataKind::ThomasFermi => "thomas_fermi",
            DataKind::SchrodingerPoisson => "schrodinger_poisson",
            DataKind::Mobility => "mobility",
        }
    }

    /// 是否为可导出 CSV 表格的一维数据
    pub fn is_tabular(&self) -> bool {
        matches!(
            self,
            DataKind::Density1D | DataKind::SchrodingerPoisson | DataKind::Mobility
        )
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DataKind {
    type Err = QmtError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        DataKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == key)
            .ok_or_else(|| QmtError::InvalidArgument(format!("Unknown data kind: {}", s)))
    }
}

/// 可存储数据的公共契约
///
/// 每个实现者声明唯一的 `KIND`，并负责校验自身不变量。
/// 二进制编解码由默认方法提供，解码后总会重新校验。
pub trait Data: Serialize + DeserializeOwned + Sized {
    /// 数据种类标签
    const KIND: DataKind;

    /// 校验不变量
    fn validate(&self) -> Result<()>;

    /// 用于终端显示的键值摘要
    fn summary(&self) -> Vec<(String, String)>;

    /// 编码为带文件头的二进制
    fn to_bytes(&self) -> Result<Vec<u8>> {
        store::encode(self)
    }

    /// 从带文件头的二进制解码
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        store::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_round_trip() {
        for kind in DataKind::ALL {
            assert_eq!(kind.name().parse::<DataKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_parse_case_insensitive() {
        assert_eq!(" Geo3D ".parse::<DataKind>().unwrap(), DataKind::Geo3D);
        assert!("voxel".parse::<DataKind>().is_err());
    }

    #[test]
    fn test_tabular_kinds() {
        let tabular: Vec<_> = DataKind::ALL.iter().filter(|k| k.is_tabular()).collect();
        assert_eq!(tabular.len(), 3);
        assert!(!DataKind::Geo2D.is_tabular());
    }
}
