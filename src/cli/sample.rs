//! # sample 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sample.rs`

use clap::Args;
use std::path::PathBuf;

/// 采样点：一维数据给 1 个坐标，三维数据给 3 个
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint(pub Vec<f64>);

impl std::fmt::Display for SamplePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coords: Vec<String> = self.0.iter().map(|c| format!("{}", c)).collect();
        write!(f, "({})", coords.join(", "))
    }
}

/// 解析 "x" 或 "x,y,z"
pub fn parse_point(s: &str) -> Result<SamplePoint, String> {
    let coords = s
        .split(',')
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid coordinate '{}' in point '{}'", c.trim(), s))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    match coords.len() {
        1 | 3 => Ok(SamplePoint(coords)),
        n => Err(format!("A point needs 1 or 3 coordinates, got {} in '{}'", n, s)),
    }
}

/// sample 子命令参数
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Data file to sample
    pub file: PathBuf,

    /// Point to evaluate at: "x" for 1D data, "x,y,z" for 3D data (repeatable)
    #[arg(short, long = "point", value_parser = parse_point, required = true)]
    pub points: Vec<SamplePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1.5").unwrap().0, vec![1.5]);
        assert_eq!(parse_point(" 0, 1e-3 ,2").unwrap().0, vec![0.0, 1e-3, 2.0]);
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,a,2").is_err());
        assert_eq!(parse_point("1,2,3").unwrap().to_string(), "(1, 2, 3)");
    }
}
