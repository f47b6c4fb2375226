//! # inspect 命令实现
//!
//! 读取数据文件，打印种类总览表和每个文件的摘要。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `io/store.rs` 的 `read_any`
//! - 使用 `utils/output.rs`，`tabled` 生成表格

use super::collect_inputs;
use crate::cli::inspect::InspectArgs;
use crate::error::Result;
use crate::io::{read_any, AnyData};
use crate::utils::output;

use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 总览表行
#[derive(Debug, Clone, Tabled)]
struct OverviewRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Inspecting Data Files");

    let files = collect_inputs(&args.input)?;
    output::print_info(&format!("Found {} data files", files.len()));

    let loaded: Vec<(PathBuf, Result<AnyData>)> = files
        .into_iter()
        .map(|f| {
            let data = read_any(&f);
            (f, data)
        })
        .collect();

    let rows: Vec<OverviewRow> = loaded
        .iter()
        .map(|(path, data)| overview_row(path, data))
        .collect();
    println!("{}", Table::new(&rows));

    if !args.brief {
        for (path, data) in &loaded {
            if let Ok(data) = data {
                output::print_header(&format!("{} ({})", path.display(), data.kind()));
                output::print_summary(&data.summary());
            }
        }
    }

    let failed = loaded.iter().filter(|(_, d)| d.is_err()).count();
    if failed > 0 {
        output::print_warning(&format!("{} of {} files could not be read", failed, loaded.len()));
    } else {
        output::print_done(&format!("Inspected {} files", loaded.len()));
    }
    Ok(())
}

fn overview_row(path: &Path, data: &Result<AnyData>) -> OverviewRow {
    let size = std::fs::metadata(path)
        .map(|m| format_size(m.len()))
        .unwrap_or_else(|_| "-".to_string());
    match data {
        Ok(d) => OverviewRow {
            file: path.display().to_string(),
            kind: d.kind().to_string(),
            size,
            status: "ok".to_string(),
        },
        Err(e) => OverviewRow {
            file: path.display().to_string(),
            kind: "-".to_string(),
            size,
            status: e.to_string(),
        },
    }
}

/// 文件大小的可读形式
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
