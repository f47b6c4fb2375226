//! # import-density 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/import_density.rs`

use clap::Args;
use std::path::PathBuf;

/// import-density 子命令参数
#[derive(Args, Debug)]
pub struct ImportDensityArgs {
    /// CSV file with "x (unit), density (unit)" columns
    pub csv: PathBuf,

    /// Output data file (.qmt)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
