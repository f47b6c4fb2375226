//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `io/`, `plot/`, `utils/`
//! - 子模块: inspect, validate, export, sample, plot, import_density

pub mod export;
pub mod import_density;
pub mod inspect;
pub mod plot;
pub mod sample;
pub mod validate;

use crate::batch::FileCollector;
use crate::cli::{Commands, InputArgs};
use crate::error::{QmtError, Result};

use std::path::PathBuf;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Inspect(args) => inspect::execute(args),
        Commands::Validate(args) => validate::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Sample(args) => sample::execute(args),
        Commands::Plot(args) => plot::execute(args),
        Commands::ImportDensity(args) => import_density::execute(args),
    }
}

/// 按输入参数收集数据文件，没有匹配时报错
pub(crate) fn collect_inputs(input: &InputArgs) -> Result<Vec<PathBuf>> {
    let files = FileCollector::new(input.input.clone())
        .with_pattern(&input.pattern)?
        .recursive(input.recursive)
        .collect()?;
    if files.is_empty() {
        return Err(QmtError::NoFilesFound {
            pattern: format!("{} in {}", input.pattern, input.input.display()),
        });
    }
    Ok(files)
}
