//! # export 命令实现
//!
//! 批量导出数据文件为 YAML 或 CSV。
//!
//! ## 功能
//! - YAML 适用于所有数据种类
//! - CSV 只适用于一维数据，其他种类跳过并给出原因
//! - 已存在的输出默认跳过，`--overwrite` 覆盖
//! - 输出目录镜像输入目录结构，递归时同名文件互不覆盖
//!
//! ## 依赖关系
//! - 使用 `cli/export.rs` 定义的参数
//! - 使用 `batch/` 并行处理
//! - 使用 `io/` 的 YAML 与 CSV 写出

use super::collect_inputs;
use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::export::{ExportArgs, ExportFormat};
use crate::error::{QmtError, Result};
use crate::io::{self, read_any};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 export 命令
pub fn execute(args: ExportArgs) -> Result<()> {
    output::print_header(&format!("Exporting to {}", args.format));

    let files = collect_inputs(&args.input)?;
    output::print_info(&format!("Found {} data files", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| QmtError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs).with_message("Exporting");
    let result = runner.run(files, |file| {
        export_file(file, &args.input.input, &args.output, args.format, args.overwrite)
    })?;
    result.report(10);

    if result.failed > 0 {
        return Err(QmtError::Other(format!(
            "{} of {} files failed to export",
            result.failed,
            result.total()
        )));
    }
    output::print_done(&format!(
        "Exported {} file(s) to '{}'",
        result.success,
        args.output.display()
    ));
    Ok(())
}

/// 输出路径: `<dir>/<相对 base 的路径>.<ext>`；输入就是 `base` 时只取文件名
pub(crate) fn output_path(
    input: &Path,
    base: &Path,
    output_dir: &Path,
    format: ExportFormat,
) -> PathBuf {
    let relative = input
        .strip_prefix(base)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| input.file_name().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));
    output_dir.join(relative).with_extension(format.extension())
}

/// 导出单个文件
pub(crate) fn export_file(
    input: &Path,
    base: &Path,
    output_dir: &Path,
    format: ExportFormat,
    overwrite: bool,
) -> ProcessResult {
    let target = output_path(input, base, output_dir, format);
    if target.exists() && !overwrite {
        return ProcessResult::Skipped(format!("{}: output exists", target.display()));
    }

    let data = match read_any(input) {
        Ok(data) => data,
        Err(e) => return ProcessResult::Failed(input.display().to_string(), e.to_string()),
    };

    if format == ExportFormat::Csv && !data.kind().is_tabular() {
        return ProcessResult::Skipped(format!(
            "{}: {} data has no CSV form",
            input.display(),
            data.kind()
        ));
    }

    if let Some(parent) = target.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return ProcessResult::Failed(
                input.display().to_string(),
                format!("cannot create {}: {}", parent.display(), e),
            );
        }
    }

    let written = match format {
        ExportFormat::Yaml => data
            .to_yaml_string()
            .and_then(|text| {
                fs::write(&target, text).map_err(|e| QmtError::FileWriteError {
                    path: target.display().to_string(),
                    source: e,
                })
            }),
        ExportFormat::Csv => io::csv::write_table(&data, &target),
    };

    match written {
        Ok(()) => {
            log::debug!("exported {} -> {}", input.display(), target.display());
            ProcessResult::Success(target.display().to_string())
        }
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::Geo1DData;
    use crate::data::template::Data;
    use crate::data::Density1DData;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qmtdata_export_{}_{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_output_path() {
        let p = output_path(
            Path::new("runs/well.qmt"),
            Path::new("runs"),
            Path::new("out"),
            ExportFormat::Yaml,
        );
        assert_eq!(p, PathBuf::from("out/well.yaml"));

        let single = Path::new("runs/well.qmt");
        assert_eq!(
            output_path(single, single, Path::new("out"), ExportFormat::Csv),
            PathBuf::from("out/well.csv")
        );
    }

    #[test]
    fn test_output_path_mirrors_subdirectories() {
        let base = Path::new("runs");
        let a = output_path(Path::new("runs/a/well.qmt"), base, Path::new("out"), ExportFormat::Yaml);
        let b = output_path(Path::new("runs/b/well.qmt"), base, Path::new("out"), ExportFormat::Yaml);
        assert_eq!(a, PathBuf::from("out/a/well.yaml"));
        assert_eq!(b, PathBuf::from("out/b/well.yaml"));
    }

    #[test]
    fn test_export_same_stem_in_two_directories() {
        let dir = scratch_dir("same_stem");
        let data = Density1DData::new(vec![0.0, 1.0], vec![1e17, 2e17]).unwrap();
        for sub in ["a", "b"] {
            fs::create_dir_all(dir.join(sub)).unwrap();
            fs::write(dir.join(sub).join("well.qmt"), data.to_bytes().unwrap()).unwrap();
        }

        let out = dir.join("out");
        for sub in ["a", "b"] {
            let input = dir.join(sub).join("well.qmt");
            assert!(matches!(
                export_file(&input, &dir, &out, ExportFormat::Yaml, false),
                ProcessResult::Success(_)
            ));
        }
        assert!(out.join("a").join("well.yaml").exists());
        assert!(out.join("b").join("well.yaml").exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_density_csv_then_skip() {
        let dir = scratch_dir("density");
        let input = dir.join("n.qmt");
        let data = Density1DData::new(vec![0.0, 1.0], vec![1e17, 2e17]).unwrap();
        fs::write(&input, data.to_bytes().unwrap()).unwrap();

        let out = dir.join("out");
        fs::create_dir_all(&out).unwrap();
        assert!(matches!(
            export_file(&input, &input, &out, ExportFormat::Csv, false),
            ProcessResult::Success(_)
        ));
        assert!(out.join("n.csv").exists());
        assert!(matches!(
            export_file(&input, &input, &out, ExportFormat::Csv, false),
            ProcessResult::Skipped(_)
        ));
        assert!(matches!(
            export_file(&input, &input, &out, ExportFormat::Csv, true),
            ProcessResult::Success(_)
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_geometry_csv_is_skipped_yaml_is_written() {
        let dir = scratch_dir("geo");
        let input = dir.join("stack.qmt");
        let mut geo = Geo1DData::new();
        geo.add_part("barrier", 0.0, 10.0, false).unwrap();
        fs::write(&input, geo.to_bytes().unwrap()).unwrap();

        match export_file(&input, &dir, &dir, ExportFormat::Csv, false) {
            ProcessResult::Skipped(reason) => assert!(reason.contains("geo1d")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            export_file(&input, &dir, &dir, ExportFormat::Yaml, false),
            ProcessResult::Success(_)
        ));
        let text = fs::read_to_string(dir.join("stack.yaml")).unwrap();
        assert!(text.contains("barrier"));
        fs::remove_dir_all(&dir).ok();
    }
}
