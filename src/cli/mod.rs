//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `inspect`: 查看数据文件的种类与摘要
//! - `validate`: 并行校验数据文件
//! - `export`: 批量导出 YAML / CSV
//! - `sample`: 在给定点上取值
//! - `plot`: 绘制一维数据图表
//! - `import-density`: 由 CSV 生成密度数据文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: inspect, validate, export, sample, plot, import_density

pub mod export;
pub mod import_density;
pub mod inspect;
pub mod plot;
pub mod sample;
pub mod validate;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// qmtdata - 量子器件仿真数据工具
#[derive(Parser)]
#[command(name = "qmtdata")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Inspect, validate, export and plot quantum device simulation data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Show the kind and summary of data files
    Inspect(inspect::InspectArgs),

    /// Validate data files in parallel
    Validate(validate::ValidateArgs),

    /// Export data files to YAML or CSV
    Export(export::ExportArgs),

    /// Evaluate a field or density at given points
    Sample(sample::SampleArgs),

    /// Plot density, band diagram or mobility data
    Plot(plot::PlotArgs),

    /// Convert a density CSV table into a data file
    ImportDensity(import_density::ImportDensityArgs),
}

/// 批量输入参数（文件或目录）
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input: data file or directory containing data files
    pub input: PathBuf,

    /// Glob pattern for input files, comma separated (directory input)
    #[arg(long, default_value = "*.qmt")]
    pub pattern: String,

    /// Recurse into subdirectories (directory input)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from([
            "qmtdata", "export", "runs", "--format", "csv", "-o", "out", "--recursive",
        ])
        .unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.format, export::ExportFormat::Csv);
                assert!(args.input.recursive);
                assert_eq!(args.input.pattern, "*.qmt");
                assert_eq!(args.output, PathBuf::from("out"));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_parse_sample_points() {
        let cli = Cli::try_parse_from([
            "qmtdata", "sample", "tf.qmt", "--point", "0.1,0.2,0.3", "--point", "1,1,1",
        ])
        .unwrap();
        match cli.command {
            Commands::Sample(args) => {
                assert_eq!(args.points.len(), 2);
                assert_eq!(args.points[0].0, vec![0.1, 0.2, 0.3]);
            }
            _ => panic!("expected sample"),
        }
    }

    #[test]
    fn test_parse_import_density() {
        let cli = Cli::try_parse_from(["qmtdata", "import-density", "n.csv", "-o", "n.qmt"]).unwrap();
        assert!(matches!(cli.command, Commands::ImportDensity(_)));
    }
}
