//! # 二进制数据存储
//!
//! `.qmt` 文件布局：
//! ```text
//! [magic "QMTD"][version: u32][kind: DataKind]   <- bincode 文件头
//! [payload]                                       <- bincode 编码的数据本体
//! ```
//! 先解析文件头再解码本体，种类不符时不会尝试解码。
//!
//! ## 依赖关系
//! - 被 `data/template.rs` 的 `Data` 默认方法调用
//! - 被 `commands/` 使用（`read_any` 按种类分派）
//! - 使用 `bincode` 编解码

use crate::data::template::{Data, DataKind};
use crate::data::{
    Density1DData, FenicsPotentialData3D, Geo1DData, Geo2DData, Geo3DData, MobilityData,
    Part3DData, ScalarData3D, SchrodingerPoissonData, ThomasFermiData,
};
use crate::error::{QmtError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

/// 文件标识
pub const MAGIC: [u8; 4] = *b"QMTD";

/// 当前文件格式版本
pub const FORMAT_VERSION: u32 = 1;

/// 数据文件扩展名
pub const EXTENSION: &str = "qmt";

/// 文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    pub kind: DataKind,
}

/// 逐字段读取文件头：先比较 magic，再检查版本，最后解码种类
fn read_header<R: Read>(mut reader: R) -> Result<Header> {
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|_| QmtError::InvalidFormat("too short for a qmt header".to_string()))?;
    if magic != MAGIC {
        return Err(QmtError::InvalidFormat(format!(
            "bad magic {:?}, not a qmt data file",
            magic
        )));
    }

    let version: u32 =
        bincode::deserialize_from(&mut reader).map_err(|e| QmtError::Decode(e.to_string()))?;
    if version == 0 {
        return Err(QmtError::InvalidFormat(
            "format version 0 is not a valid qmt version".to_string(),
        ));
    }
    if version > FORMAT_VERSION {
        return Err(QmtError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let kind: DataKind =
        bincode::deserialize_from(&mut reader).map_err(|e| QmtError::Decode(e.to_string()))?;
    Ok(Header {
        magic,
        version,
        kind,
    })
}

/// 编码为带文件头的二进制；编码前先校验
pub fn encode<T: Data>(value: &T) -> Result<Vec<u8>> {
    value.validate()?;
    let header = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
        kind: T::KIND,
    };
    let mut bytes = bincode::serialize(&header).map_err(|e| QmtError::Encode(e.to_string()))?;
    bincode::serialize_into(&mut bytes, value).map_err(|e| QmtError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// 只解析文件头
pub fn decode_header(bytes: &[u8]) -> Result<(Header, &[u8])> {
    let mut rest = bytes;
    let header = read_header(&mut rest)?;
    Ok((header, rest))
}

/// 解码并校验
pub fn decode<T: Data>(bytes: &[u8]) -> Result<T> {
    let (header, payload) = decode_header(bytes)?;
    if header.kind != T::KIND {
        return Err(QmtError::KindMismatch {
            expected: T::KIND.to_string(),
            found: header.kind.to_string(),
        });
    }
    let value: T = bincode::deserialize(payload).map_err(|e| QmtError::Decode(e.to_string()))?;
    value.validate()?;
    Ok(value)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(QmtError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read(path).map_err(|e| QmtError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 写入数据文件
pub fn write_data<T: Data>(path: &Path, value: &T) -> Result<()> {
    let bytes = value.to_bytes()?;
    fs::write(path, bytes).map_err(|e| QmtError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    log::debug!("wrote {} data to {}", T::KIND, path.display());
    Ok(())
}

/// 读取指定类型的数据文件
pub fn read_data<T: Data>(path: &Path) -> Result<T> {
    T::from_bytes(&read_bytes(path)?)
}

/// 只读取数据种类
pub fn read_kind(path: &Path) -> Result<DataKind> {
    let file = fs::File::open(path).map_err(|e| QmtError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(read_header(BufReader::new(file))?.kind)
}

// ─────────────────────────────────────────────────────────────
// 任意种类数据
// ─────────────────────────────────────────────────────────────

/// 按文件头种类解码出的任意数据
#[derive(Debug, Clone)]
pub enum AnyData {
    Density1D(Density1DData),
    Geo1D(Geo1DData),
    Geo2D(Geo2DData),
    Geo3D(Geo3DData),
    Part3D(Part3DData),
    Scalar3D(ScalarData3D),
    FenicsPotential3D(FenicsPotentialData3D),
    ThomasFermi(ThomasFermiData),
    SchrodingerPoisson(SchrodingerPoissonData),
    Mobility(MobilityData),
}

/// 对每个变体执行同一表达式
macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            AnyData::Density1D($inner) => $body,
            AnyData::Geo1D($inner) => $body,
            AnyData::Geo2D($inner) => $body,
            AnyData::Geo3D($inner) => $body,
            AnyData::Part3D($inner) => $body,
            AnyData::Scalar3D($inner) => $body,
            AnyData::FenicsPotential3D($inner) => $body,
            AnyData::ThomasFermi($inner) => $body,
            AnyData::SchrodingerPoisson($inner) => $body,
            AnyData::Mobility($inner) => $body,
        }
    };
}

impl AnyData {
    pub fn kind(&self) -> DataKind {
        match self {
            AnyData::Density1D(_) => DataKind::Density1D,
            AnyData::Geo1D(_) => DataKind::Geo1D,
            AnyData::Geo2D(_) => DataKind::Geo2D,
            AnyData::Geo3D(_) => DataKind::Geo3D,
            AnyData::Part3D(_) => DataKind::Part3D,
            AnyData::Scalar3D(_) => DataKind::Scalar3D,
            AnyData::FenicsPotential3D(_) => DataKind::FenicsPotential3D,
            AnyData::ThomasFermi(_) => DataKind::ThomasFermi,
            AnyData::SchrodingerPoisson(_) => DataKind::SchrodingerPoisson,
            AnyData::Mobility(_) => DataKind::Mobility,
        }
    }

    pub fn validate(&self) -> Result<()> {
        dispatch!(self, d => d.validate())
    }

    pub fn summary(&self) -> Vec<(String, String)> {
        dispatch!(self, d => d.summary())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        dispatch!(self, d => d.to_bytes())
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        dispatch!(self, d => super::to_yaml_string(d))
    }

    /// 按文件头种类解码
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, _) = decode_header(bytes)?;
        Ok(match header.kind {
            DataKind::Density1D => AnyData::Density1D(decode(bytes)?),
            DataKind::Geo1D => AnyData::Geo1D(decode(bytes)?),
            DataKind::Geo2D => AnyData::Geo2D(decode(bytes)?),
            DataKind::Geo3D => AnyData::Geo3D(decode(bytes)?),
            DataKind::Part3D => AnyData::Part3D(decode(bytes)?),
            DataKind::Scalar3D => AnyData::Scalar3D(decode(bytes)?),
            DataKind::FenicsPotential3D => AnyData::FenicsPotential3D(decode(bytes)?),
            DataKind::ThomasFermi => AnyData::ThomasFermi(decode(bytes)?),
            DataKind::SchrodingerPoisson => AnyData::SchrodingerPoisson(decode(bytes)?),
            DataKind::Mobility => AnyData::Mobility(decode(bytes)?),
        })
    }
}

/// 读取任意种类的数据文件
pub fn read_any(path: &Path) -> Result<AnyData> {
    let data = AnyData::from_bytes(&read_bytes(path)?)?;
    log::debug!("read {} data from {}", data.kind(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mesh::unit_cube_mesh;

    fn density() -> Density1DData {
        Density1DData::new(vec![0.0, 1.0, 2.0], vec![1e17, 3e17, 2e17]).unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("qmtdata_store_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_encode_decode_density() {
        let bytes = encode(&density()).unwrap();
        assert_eq!(&bytes[..4], b"QMTD");
        let back: Density1DData = decode(&bytes).unwrap();
        assert_eq!(back, density());
    }

    #[test]
    fn test_decode_kind_mismatch() {
        let bytes = density().to_bytes().unwrap();
        let err = MobilityData::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, QmtError::KindMismatch { .. }));
    }

    #[test]
    fn test_decode_bad_magic() {
        let mut bytes = density().to_bytes().unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            Density1DData::from_bytes(&bytes),
            Err(QmtError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_foreign_bytes() {
        assert!(matches!(
            Density1DData::from_bytes(b"hello world, this is not a qmt file"),
            Err(QmtError::InvalidFormat(_))
        ));
        assert!(matches!(AnyData::from_bytes(b"QM"), Err(QmtError::InvalidFormat(_))));

        let path = temp_path("notes.qmt");
        std::fs::write(&path, "x,density\n0.0,1e17\n").unwrap();
        assert!(matches!(read_kind(&path), Err(QmtError::InvalidFormat(_))));
        assert!(matches!(read_any(&path), Err(QmtError::InvalidFormat(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_decode_version_zero() {
        let mut bytes = density().to_bytes().unwrap();
        bytes[4..8].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            Density1DData::from_bytes(&bytes),
            Err(QmtError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_newer_version() {
        let mut bytes = density().to_bytes().unwrap();
        // version 紧跟 4 字节 magic，小端 u32
        bytes[4..8].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            Density1DData::from_bytes(&bytes),
            Err(QmtError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = density().to_bytes().unwrap();
        assert!(Density1DData::from_bytes(&bytes[..6]).is_err());
        assert!(Density1DData::from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn test_encode_rejects_invalid() {
        let mut d = density();
        d.density.pop();
        assert!(d.to_bytes().is_err());
    }

    #[test]
    fn test_any_data_dispatch() {
        let mesh = unit_cube_mesh();
        let values = vec![0.5; mesh.num_vertices()];
        let pot = FenicsPotentialData3D::new(mesh, values).unwrap();
        let any = AnyData::from_bytes(&pot.to_bytes().unwrap()).unwrap();
        assert_eq!(any.kind(), DataKind::FenicsPotential3D);
        any.validate().unwrap();
        assert!(!any.summary().is_empty());
    }

    #[test]
    fn test_file_round_trip_and_kind() {
        let path = temp_path("density.qmt");
        write_data(&path, &density()).unwrap();
        assert_eq!(read_kind(&path).unwrap(), DataKind::Density1D);
        let back: Density1DData = read_data(&path).unwrap();
        assert_eq!(back, density());
        assert!(matches!(read_any(&path).unwrap(), AnyData::Density1D(_)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_missing_file() {
        let path = temp_path("missing.qmt");
        assert!(matches!(
            read_data::<Density1DData>(&path),
            Err(QmtError::FileNotFound { .. })
        ));
    }
}
