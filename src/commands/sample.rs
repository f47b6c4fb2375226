//! # sample 命令实现
//!
//! 在给定点上对场或密度取值：
//! - `scalar3d`: 三线性插值
//! - `fenics_potential3d`: P1 求值
//! - `thomas_fermi`: 电势与密度
//! - `density1d`: 线性插值
//!
//! ## 依赖关系
//! - 使用 `cli/sample.rs` 定义的参数
//! - 使用 `io/store.rs` 的 `AnyData`

use crate::cli::sample::{SampleArgs, SamplePoint};
use crate::error::{QmtError, Result};
use crate::io::{read_any, AnyData};
use crate::utils::output;

use tabled::{builder::Builder, settings::Style};

/// 执行 sample 命令
pub fn execute(args: SampleArgs) -> Result<()> {
    output::print_header("Sampling Data");

    let data = read_any(&args.file)?;
    output::print_info(&format!("{} ({})", args.file.display(), data.kind()));

    let mut builder = Builder::default();
    let mut header = vec!["point".to_string()];
    header.extend(value_names(&data)?.iter().map(|s| s.to_string()));
    builder.push_record(header);

    let mut outside = 0;
    for point in &args.points {
        let values = sample_point(&data, point)?;
        if values.iter().any(Option::is_none) {
            outside += 1;
        }
        let mut row = vec![point.to_string()];
        row.extend(values.into_iter().map(|v| match v {
            Some(v) => format!("{:.6e}", v),
            None => "outside".to_string(),
        }));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);

    if outside > 0 {
        output::print_warning(&format!(
            "{} of {} points lie outside the data domain",
            outside,
            args.points.len()
        ));
    }
    Ok(())
}

/// 可取值的量的名称
pub(crate) fn value_names(data: &AnyData) -> Result<Vec<&'static str>> {
    match data {
        AnyData::Density1D(_) => Ok(vec!["density"]),
        AnyData::Scalar3D(_) => Ok(vec!["value"]),
        AnyData::FenicsPotential3D(_) => Ok(vec!["potential"]),
        AnyData::ThomasFermi(_) => Ok(vec!["potential", "density"]),
        other => Err(QmtError::UnsupportedFormat(format!(
            "{} data cannot be sampled at points",
            other.kind()
        ))),
    }
}

fn point_3d(point: &SamplePoint) -> Result<[f64; 3]> {
    match point.0.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(QmtError::InvalidArgument(format!(
            "3D data needs points as x,y,z, got {}",
            point
        ))),
    }
}

fn point_1d(point: &SamplePoint) -> Result<f64> {
    match point.0.as_slice() {
        &[x] => Ok(x),
        _ => Err(QmtError::InvalidArgument(format!(
            "1D data needs a single coordinate, got {}",
            point
        ))),
    }
}

/// 在单点取值，顺序与 `value_names` 一致；域外为 `None`
pub(crate) fn sample_point(data: &AnyData, point: &SamplePoint) -> Result<Vec<Option<f64>>> {
    match data {
        AnyData::Density1D(d) => Ok(vec![d.interpolate(point_1d(point)?)]),
        AnyData::Scalar3D(d) => Ok(vec![d.interpolate(point_3d(point)?)]),
        AnyData::FenicsPotential3D(d) => Ok(vec![d.evaluate(point_3d(point)?)]),
        AnyData::ThomasFermi(d) => {
            let p = point_3d(point)?;
            Ok(vec![d.potential_at(p), d.density_at(p)])
        }
        other => Err(QmtError::UnsupportedFormat(format!(
            "{} data cannot be sampled at points",
            other.kind()
        ))),
    }
}
