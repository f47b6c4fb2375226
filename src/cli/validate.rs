//! # validate 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/validate.rs`

use super::InputArgs;
use clap::Args;

/// validate 子命令参数
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0, env = "QMTDATA_JOBS")]
    pub jobs: usize,
}
