//! # 数据读写模块
//!
//! - `store`: `.qmt` 二进制存储与按种类分派的 `AnyData`
//! - `csv`: 一维数据的 CSV 表格导入导出
//! - YAML 文本导出（本文件）
//!
//! ## 依赖关系
//! - 被 `data/template.rs`, `commands/` 使用
//! - 使用 `serde_yaml` 生成 YAML

pub mod csv;
pub mod store;

pub use store::{read_any, read_data, read_kind, write_data, AnyData};

use crate::error::{QmtError, Result};

use serde::Serialize;
use std::fs;
use std::path::Path;

/// 序列化为 YAML 文本
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// 写出 YAML 文件
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = to_yaml_string(value)?;
    fs::write(path, text).map_err(|e| QmtError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
