//! # plot 命令实现
//!
//! 为密度、Schrödinger-Poisson 或迁移率数据生成 PNG/SVG 图表。
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `plot/` 模块绘图

use crate::cli::plot::PlotArgs;
use crate::error::{QmtError, Result};
use crate::io::read_any;
use crate::plot::{self, ChartFormat, ChartOptions};
use crate::utils::output;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    output::print_header("Plotting Data");

    // 先检查输出格式，避免读取后才失败
    let format = ChartFormat::from_path(&args.output)?;
    if args.width == 0 || args.height == 0 {
        return Err(QmtError::InvalidArgument(format!(
            "figure size must be positive, got {}x{}",
            args.width, args.height
        )));
    }

    let data = read_any(&args.file)?;
    output::print_info(&format!(
        "{} ({}) -> {:?}",
        args.file.display(),
        data.kind(),
        format
    ));

    let opts = ChartOptions {
        title: args.title.clone().unwrap_or_default(),
        width: args.width,
        height: args.height,
    };
    plot::plot_any(&data, &args.output, &opts)?;

    output::print_success(&format!("Chart saved to '{}'", args.output.display()));
    Ok(())
}
