//! # import-density 命令实现
//!
//! 读取 `x (unit), density (unit)` 表格并写成 `.qmt` 密度数据文件。
//!
//! ## 依赖关系
//! - 使用 `cli/import_density.rs` 定义的参数
//! - 使用 `io/csv.rs` 读入，`io/store.rs` 写出

use crate::cli::import_density::ImportDensityArgs;
use crate::data::template::Data;
use crate::error::{QmtError, Result};
use crate::io::{self, write_data};
use crate::utils::output;

/// 执行 import-density 命令
pub fn execute(args: ImportDensityArgs) -> Result<()> {
    output::print_header("Importing Density Profile");

    if args.output.exists() && !args.overwrite {
        return Err(QmtError::InvalidArgument(format!(
            "'{}' already exists (use --overwrite to replace it)",
            args.output.display()
        )));
    }

    let data = io::csv::read_density_csv(&args.csv)?;
    write_data(&args.output, &data)?;

    output::print_written(
        &args.csv.display().to_string(),
        &args.output.display().to_string(),
    );
    output::print_summary(&data.summary());
    Ok(())
}
