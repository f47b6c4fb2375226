//! # validate 命令实现
//!
//! 并行解码并校验数据文件，任一文件失败时以非零状态退出。
//!
//! ## 依赖关系
//! - 使用 `cli/validate.rs` 定义的参数
//! - 使用 `batch/` 并行处理
//! - 使用 `io/store.rs` 的 `read_any`

use super::collect_inputs;
use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::validate::ValidateArgs;
use crate::error::{QmtError, Result};
use crate::io::read_any;
use crate::utils::output;

use std::path::Path;

/// 执行 validate 命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    output::print_header("Validating Data Files");

    let files = collect_inputs(&args.input)?;
    let total = files.len();
    output::print_info(&format!("Found {} data files", total));

    let runner = BatchRunner::new(args.jobs).with_message("Validating");
    let result = runner.run(files, |file| validate_file(file))?;
    result.report(10);

    if result.failed > 0 {
        return Err(QmtError::Other(format!(
            "{} of {} files failed validation",
            result.failed, total
        )));
    }
    output::print_done(&format!("All {} files are valid", total));
    Ok(())
}

/// 解码（含不变量校验）单个文件
pub(crate) fn validate_file(path: &Path) -> ProcessResult {
    match read_any(path).and_then(|data| data.validate().map(|_| data)) {
        Ok(data) => ProcessResult::Success(format!("{}: {}", path.display(), data.kind())),
        Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
    }
}
