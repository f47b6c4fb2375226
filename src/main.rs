//! # qmtdata 命令行入口
//!
//! ## 子命令
//! - `inspect` - 查看数据文件种类与摘要
//! - `validate` - 并行校验数据文件
//! - `export` - 导出 YAML / CSV
//! - `sample` - 在给定点上取值
//! - `plot` - 一维数据图表
//! - `import-density` - CSV 密度表导入
//!
//! ## 依赖关系
//! - 使用 `qmtdata::cli` 解析参数，`qmtdata::commands` 执行

use clap::Parser;
use qmtdata::cli::Cli;
use qmtdata::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
