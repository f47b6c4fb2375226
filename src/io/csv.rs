//! # 一维数据 CSV 表格
//!
//! ## 支持格式
//! - 密度分布: `x (nm), density (cm^-3)`，可导入导出
//! - Schrödinger-Poisson: `z (nm), band_edge (eV), density (cm^-3), psi_0, ...`
//! - 迁移率: `density (cm^-2), <机制> (cm^2/Vs) ..., total (cm^2/Vs)`
//!
//! 表头单元格形如 `name (unit)`，导入时用正则取回单位。
//! 数值按最短可往返表示写出，导出再导入不丢精度。
//!
//! ## 依赖关系
//! - 被 `commands/export.rs`, `commands/import_density.rs` 调用
//! - 使用 `csv` 读写，`regex` 解析表头

use crate::data::template::Data;
use crate::data::{Density1DData, MobilityData, SchrodingerPoissonData};
use crate::error::{QmtError, Result};
use crate::io::store::AnyData;

use regex::Regex;
use std::path::Path;

/// 表头单元格：`name (unit)` 或 `name`
fn header_regex() -> Result<Regex> {
    Regex::new(r"^\s*([^()]*?)\s*(?:\(([^()]*)\))?\s*$")
        .map_err(|e| QmtError::Other(format!("header regex: {}", e)))
}

/// 解析表头单元格，返回 (名称, 单位)
pub fn parse_header(re: &Regex, cell: &str) -> Option<(String, Option<String>)> {
    let caps = re.captures(cell)?;
    let name = caps.get(1)?.as_str().to_string();
    if name.is_empty() {
        return None;
    }
    let unit = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty());
    Some((name, unit))
}

fn header(name: &str, unit: &str) -> String {
    format!("{} ({})", name, unit)
}

fn flush(mut wtr: csv::Writer<std::fs::File>, path: &Path) -> Result<()> {
    wtr.flush().map_err(|e| QmtError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

// ─────────────────────────────────────────────────────────────
// 导出
// ─────────────────────────────────────────────────────────────

/// 导出密度分布
pub fn write_density_csv(data: &Density1DData, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        header("x", &data.length_unit),
        header("density", &data.density_unit),
    ])?;
    for (x, n) in data.mesh.iter().zip(&data.density) {
        wtr.write_record([x.to_string(), n.to_string()])?;
    }
    flush(wtr, path)
}

/// 导出能带、电子密度与各子带波函数
pub fn write_schrodinger_poisson_csv(data: &SchrodingerPoissonData, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut head = vec![
        header("z", "nm"),
        header("band_edge", "eV"),
        header("density", "cm^-3"),
    ];
    head.extend((0..data.num_states()).map(|i| format!("psi_{}", i)));
    wtr.write_record(&head)?;

    let density = data.electron_density();
    for (j, z) in data.z.iter().enumerate() {
        let mut row = vec![
            z.to_string(),
            data.band_edge[j].to_string(),
            density[j].to_string(),
        ];
        row.extend(
            data.wavefunctions
                .column(j)
                .iter()
                .map(|psi| psi.to_string()),
        );
        wtr.write_record(&row)?;
    }
    flush(wtr, path)
}

/// 导出迁移率表，末列为总迁移率
pub fn write_mobility_csv(data: &MobilityData, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut head = vec![header("density", "cm^-2")];
    head.extend(data.mechanisms.keys().map(|name| header(name, "cm^2/Vs")));
    let total = data.total_mobility();
    if !total.is_empty() {
        head.push(header("total", "cm^2/Vs"));
    }
    wtr.write_record(&head)?;

    for (i, n) in data.densities.iter().enumerate() {
        let mut row = vec![n.to_string()];
        row.extend(data.mechanisms.values().map(|mu| mu[i].to_string()));
        if let Some(t) = total.get(i) {
            row.push(t.to_string());
        }
        wtr.write_record(&row)?;
    }
    flush(wtr, path)
}

/// 按种类导出；非一维数据返回 `UnsupportedFormat`
pub fn write_table(data: &AnyData, path: &Path) -> Result<()> {
    match data {
        AnyData::Density1D(d) => write_density_csv(d, path),
        AnyData::SchrodingerPoisson(d) => write_schrodinger_poisson_csv(d, path),
        AnyData::Mobility(d) => write_mobility_csv(d, path),
        other => Err(QmtError::UnsupportedFormat(format!(
            "csv export is only available for 1D data, not {}",
            other.kind()
        ))),
    }
}

// ─────────────────────────────────────────────────────────────
// 导入
// ─────────────────────────────────────────────────────────────

/// 从 CSV 导入密度分布：取前两列，表头中的单位随数据带回
pub fn read_density_csv(path: &Path) -> Result<Density1DData> {
    if !path.exists() {
        return Err(QmtError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let parse_error = |reason: String| QmtError::ParseError {
        format: "csv".to_string(),
        path: path.display().to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(parse_error(format!(
            "expected at least 2 columns, found {}",
            headers.len()
        )));
    }

    let re = header_regex()?;
    let (_, length_unit) = parse_header(&re, &headers[0])
        .ok_or_else(|| parse_error(format!("bad header cell '{}'", &headers[0])))?;
    let (_, density_unit) = parse_header(&re, &headers[1])
        .ok_or_else(|| parse_error(format!("bad header cell '{}'", &headers[1])))?;

    let mut mesh = Vec::new();
    let mut density = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = |col: usize| -> Result<f64> {
            let text = record.get(col).unwrap_or("");
            text.parse::<f64>().map_err(|_| {
                parse_error(format!("row {}: '{}' is not a number", line + 2, text))
            })
        };
        mesh.push(cell(0)?);
        density.push(cell(1)?);
    }
    log::debug!("read {} density samples from {}", mesh.len(), path.display());

    let mut data = Density1DData::new(mesh, density)?;
    if let Some(unit) = length_unit {
        data.length_unit = unit;
    }
    if let Some(unit) = density_unit {
        data.density_unit = unit;
    }
    data.validate()?;
    Ok(data)
}
