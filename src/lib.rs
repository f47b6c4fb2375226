//! # qmtdata - 量子器件仿真数据
//!
//! 量子材料与器件建模流程中各类数据容器的统一定义、存储与命令行工具。
//! 数据类型统一从 [`data`] 命名空间导入：
//!
//! ```no_run
//! use qmtdata::data::{Data, Density1DData};
//!
//! let n = Density1DData::new(vec![0.0, 5.0, 10.0], vec![0.0, 1e18, 0.0])?;
//! qmtdata::io::write_data(std::path::Path::new("well.qmt"), &n)?;
//! # Ok::<(), qmtdata::error::QmtError>(())
//! ```
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── data/       (数据类型，命名空间根只导出 11 个名称)
//!   ├── io/         (二进制存储、YAML、CSV)
//!   ├── plot/       (图表)
//!   ├── batch/      (批量并行处理)
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── constants.rs (物理常数)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod data;
pub mod error;
pub mod io;
pub mod plot;
pub mod utils;
