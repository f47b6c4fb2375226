//! # 批量处理模块
//!
//! 提供统一的数据文件批量处理能力。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）
//! - 按 glob 模式收集数据文件
//! - 并行处理，进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/validate.rs`, `commands/export.rs`, `commands/inspect.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
