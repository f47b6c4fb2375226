//! # 几何数据
//!
//! 一维（区间）、二维（多边形与折线）和三维（部件 + 网格 + 截面）器件几何。
//! 所有容器保持插入顺序，即 CAD 构建顺序。
//!
//! ## 依赖关系
//! - 使用 `data/part.rs` 的 `Part3DData`
//! - 使用 `data/mesh.rs` 的 `TetMesh`
//! - 实现 `data/template.rs` 的 `Data`

use crate::data::mesh::TetMesh;
use crate::data::part::{DomainType, Part3DData};
use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn duplicate(name: &str, container: &str) -> QmtError {
    QmtError::DuplicateName {
        name: name.to_string(),
        container: container.to_string(),
    }
}

fn not_found(name: &str, container: &str) -> QmtError {
    QmtError::NotFound {
        name: name.to_string(),
        container: container.to_string(),
    }
}

/// 构建顺序必须恰好是部件集合的一个排列
fn check_build_order<V>(
    kind: DataKind,
    order: &[String],
    parts: &IndexMap<String, V>,
) -> Result<()> {
    let mut seen = HashSet::with_capacity(order.len());
    for name in order {
        if !parts.contains_key(name) {
            return Err(QmtError::invalid(
                kind,
                format!("build order names unknown part '{}'", name),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(QmtError::invalid(
                kind,
                format!("build order lists '{}' twice", name),
            ));
        }
    }
    if seen.len() != parts.len() {
        return Err(QmtError::invalid(
            kind,
            format!(
                "build order covers {} of {} parts",
                seen.len(),
                parts.len()
            ),
        ));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// Geo1DData
// ─────────────────────────────────────────────────────────────

/// 闭区间，保证 `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(a: f64, b: f64) -> Self {
        Interval {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }
}

/// 一维几何：命名区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo1DData {
    pub parts: IndexMap<String, Interval>,
    pub lunit: String,
}

impl Default for Geo1DData {
    fn default() -> Self {
        Geo1DData {
            parts: IndexMap::new(),
            lunit: "nm".to_string(),
        }
    }
}

impl Geo1DData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加区间；端点顺序可任意
    pub fn add_part(&mut self, name: &str, start: f64, end: f64, overwrite: bool) -> Result<()> {
        if !(start.is_finite() && end.is_finite()) {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("part '{}' has non-finite endpoints", name),
            ));
        }
        if self.parts.contains_key(name) && !overwrite {
            return Err(duplicate(name, "geo1d parts"));
        }
        self.parts.insert(name.to_string(), Interval::new(start, end));
        Ok(())
    }

    pub fn remove_part(&mut self, name: &str) -> Result<Interval> {
        self.parts
            .shift_remove(name)
            .ok_or_else(|| not_found(name, "geo1d parts"))
    }

    pub fn get_part(&self, name: &str) -> Result<&Interval> {
        self.parts
            .get(name)
            .ok_or_else(|| not_found(name, "geo1d parts"))
    }

    /// 所有区间的包络
    pub fn bounding_box(&self) -> Option<(f64, f64)> {
        self.parts.values().fold(None, |acc, iv| match acc {
            None => Some((iv.start, iv.end)),
            Some((lo, hi)) => Some((lo.min(iv.start), hi.max(iv.end))),
        })
    }

    /// 包含 `x` 的部件名
    pub fn parts_at(&self, x: f64) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(_, iv)| iv.contains(x))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl Data for Geo1DData {
    const KIND: DataKind = DataKind::Geo1D;

    fn validate(&self) -> Result<()> {
        for (name, iv) in &self.parts {
            if !(iv.start.is_finite() && iv.end.is_finite()) || iv.start > iv.end {
                return Err(QmtError::invalid(
                    Self::KIND,
                    format!("part '{}' has an invalid interval", name),
                ));
            }
        }
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![("parts".to_string(), self.parts.len().to_string())];
        if let Some((lo, hi)) = self.bounding_box() {
            lines.push((
                "extent".to_string(),
                format!("{:.4} .. {:.4} {}", lo, hi, self.lunit),
            ));
        }
        for (name, iv) in &self.parts {
            lines.push((
                format!("  {}", name),
                format!("[{:.4}, {:.4}]", iv.start, iv.end),
            ));
        }
        lines
    }
}

// ─────────────────────────────────────────────────────────────
// Geo2DData
// ─────────────────────────────────────────────────────────────

/// 二维几何：命名多边形与折线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo2DData {
    /// 多边形部件（顶点按顺序，不重复首点）
    pub parts: IndexMap<String, Vec<[f64; 2]>>,

    /// 折线边
    pub edges: IndexMap<String, Vec<[f64; 2]>>,

    /// 部件添加顺序
    pub build_order: Vec<String>,

    pub lunit: String,
}

impl Default for Geo2DData {
    fn default() -> Self {
        Geo2DData {
            parts: IndexMap::new(),
            edges: IndexMap::new(),
            build_order: Vec::new(),
            lunit: "nm".to_string(),
        }
    }
}

impl Geo2DData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, name: &str, vertices: Vec<[f64; 2]>, overwrite: bool) -> Result<()> {
        if self.parts.contains_key(name) && !overwrite {
            return Err(duplicate(name, "geo2d parts"));
        }
        check_polygon(name, &vertices)?;
        if self.parts.insert(name.to_string(), vertices).is_none() {
            self.build_order.push(name.to_string());
        }
        Ok(())
    }

    pub fn add_edge(&mut self, name: &str, points: Vec<[f64; 2]>, overwrite: bool) -> Result<()> {
        if self.edges.contains_key(name) && !overwrite {
            return Err(duplicate(name, "geo2d edges"));
        }
        if points.len() < 2 {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("edge '{}' needs at least 2 points", name),
            ));
        }
        check_finite_points(name, &points)?;
        self.edges.insert(name.to_string(), points);
        Ok(())
    }

    pub fn remove_part(&mut self, name: &str) -> Result<Vec<[f64; 2]>> {
        let removed = self
            .parts
            .shift_remove(name)
            .ok_or_else(|| not_found(name, "geo2d parts"))?;
        self.build_order.retain(|n| n != name);
        Ok(removed)
    }

    pub fn remove_edge(&mut self, name: &str) -> Result<Vec<[f64; 2]>> {
        self.edges
            .shift_remove(name)
            .ok_or_else(|| not_found(name, "geo2d edges"))
    }

    pub fn get_part(&self, name: &str) -> Result<&[[f64; 2]]> {
        self.parts
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| not_found(name, "geo2d parts"))
    }

    pub fn get_edge(&self, name: &str) -> Result<&[[f64; 2]]> {
        self.edges
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| not_found(name, "geo2d edges"))
    }

    /// 多边形面积（鞋带公式）
    pub fn part_area(&self, name: &str) -> Result<f64> {
        Ok(polygon_area(self.get_part(name)?).abs())
    }

    pub fn edge_length(&self, name: &str) -> Result<f64> {
        Ok(self
            .get_edge(name)?
            .windows(2)
            .map(|w| ((w[1][0] - w[0][0]).powi(2) + (w[1][1] - w[0][1]).powi(2)).sqrt())
            .sum())
    }

    /// 所有部件与边的包围盒 (min, max)
    pub fn bounding_box(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self.parts.values().chain(self.edges.values()).flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        }))
    }

    /// 包含 `point` 的部件名（奇偶规则）
    pub fn parts_at(&self, point: [f64; 2]) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(_, poly)| point_in_polygon(poly, point))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl Data for Geo2DData {
    const KIND: DataKind = DataKind::Geo2D;

    fn validate(&self) -> Result<()> {
        for (name, poly) in &self.parts {
            check_polygon(name, poly)?;
        }
        for (name, edge) in &self.edges {
            if edge.len() < 2 {
                return Err(QmtError::invalid(
                    Self::KIND,
                    format!("edge '{}' needs at least 2 points", name),
                ));
            }
            check_finite_points(name, edge)?;
        }
        check_build_order(Self::KIND, &self.build_order, &self.parts)?;
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("parts".to_string(), self.parts.len().to_string()),
            ("edges".to_string(), self.edges.len().to_string()),
        ];
        if let Some((lo, hi)) = self.bounding_box() {
            lines.push((
                "bbox".to_string(),
                format!(
                    "({:.3}, {:.3}) .. ({:.3}, {:.3}) {}",
                    lo[0], lo[1], hi[0], hi[1], self.lunit
                ),
            ));
        }
        for name in &self.build_order {
            if let Ok(area) = self.part_area(name) {
                lines.push((format!("  {}", name), format!("area {:.4}", area)));
            }
        }
        lines
    }
}

fn check_finite_points(name: &str, points: &[[f64; 2]]) -> Result<()> {
    if points.iter().flatten().any(|c| !c.is_finite()) {
        return Err(QmtError::invalid(
            DataKind::Geo2D,
            format!("'{}' has non-finite coordinates", name),
        ));
    }
    Ok(())
}

fn check_polygon(name: &str, vertices: &[[f64; 2]]) -> Result<()> {
    if vertices.len() < 3 {
        return Err(QmtError::invalid(
            DataKind::Geo2D,
            format!("polygon '{}' needs at least 3 vertices", name),
        ));
    }
    check_finite_points(name, vertices)?;
    if polygon_area(vertices).abs() < f64::EPSILON {
        return Err(QmtError::invalid(
            DataKind::Geo2D,
            format!("polygon '{}' has zero area", name),
        ));
    }
    Ok(())
}

/// 有向面积（逆时针为正）
fn polygon_area(vertices: &[[f64; 2]]) -> f64 {
    let n = vertices.len();
    0.5 * (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
}

fn point_in_polygon(vertices: &[[f64; 2]], p: [f64; 2]) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x_cross = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// ─────────────────────────────────────────────────────────────
// Geo3DData
// ─────────────────────────────────────────────────────────────

/// 坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// 截面：沿某轴在给定位置切出的二维几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub axis: Axis,
    pub offset: f64,
    pub slice: Geo2DData,
}

/// 三维器件几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo3DData {
    /// 部件构建顺序
    pub build_order: Vec<String>,

    /// 标签 -> 部件
    pub parts: IndexMap<String, Part3DData>,

    /// 序列化的 CAD 文档（不解析）
    pub serial_cad_doc: Option<Vec<u8>>,

    /// 体网格
    pub mesh: Option<TetMesh>,

    /// 命名截面
    pub xsecs: IndexMap<String, CrossSection>,

    pub lunit: String,
}

impl Default for Geo3DData {
    fn default() -> Self {
        Geo3DData {
            build_order: Vec::new(),
            parts: IndexMap::new(),
            serial_cad_doc: None,
            mesh: None,
            xsecs: IndexMap::new(),
            lunit: "nm".to_string(),
        }
    }
}

impl Geo3DData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加部件，以 `part.label` 为键
    pub fn add_part(&mut self, part: Part3DData, overwrite: bool) -> Result<()> {
        if self.parts.contains_key(&part.label) && !overwrite {
            return Err(duplicate(&part.label, "geo3d parts"));
        }
        part.validate()?;
        let label = part.label.clone();
        if self.parts.insert(label.clone(), part).is_none() {
            self.build_order.push(label);
        }
        Ok(())
    }

    pub fn get_part(&self, label: &str) -> Result<&Part3DData> {
        self.parts
            .get(label)
            .ok_or_else(|| not_found(label, "geo3d parts"))
    }

    /// 移除部件；仍被网格区域引用的部件不能移除
    pub fn remove_part(&mut self, label: &str) -> Result<Part3DData> {
        if !self.parts.contains_key(label) {
            return Err(not_found(label, "geo3d parts"));
        }
        if let Some(mesh) = &self.mesh {
            if mesh.region_names.values().any(|name| name == label) {
                return Err(QmtError::InvalidArgument(format!(
                    "part '{}' is a region of the attached mesh; clear the mesh first",
                    label
                )));
            }
        }
        let removed = self
            .parts
            .shift_remove(label)
            .ok_or_else(|| not_found(label, "geo3d parts"))?;
        self.build_order.retain(|n| n != label);
        Ok(removed)
    }

    /// 移除体网格
    pub fn clear_mesh(&mut self) -> Option<TetMesh> {
        self.mesh.take()
    }

    /// 按构建顺序返回指定域类型的部件
    pub fn parts_by_domain(&self, domain: DomainType) -> Vec<&Part3DData> {
        self.build_order
            .iter()
            .filter_map(|label| self.parts.get(label))
            .filter(|p| p.domain_type == domain)
            .collect()
    }

    /// 设置体网格；网格区域必须对应已有部件
    pub fn set_mesh(&mut self, mesh: TetMesh) -> Result<()> {
        mesh.validate()?;
        self.check_regions(&mesh)?;
        log::debug!(
            "geo3d mesh set: {} vertices, {} tetrahedra",
            mesh.num_vertices(),
            mesh.num_tets()
        );
        self.mesh = Some(mesh);
        Ok(())
    }

    /// 各区域体积
    pub fn region_volumes(&self) -> Option<IndexMap<String, f64>> {
        let mesh = self.mesh.as_ref()?;
        let per_tet: Vec<f64> = (0..mesh.num_tets()).map(|i| mesh.tet_volume(i)).collect();
        Some(mesh.sum_by_region(&per_tet))
    }

    pub fn bounding_box(&self) -> Option<([f64; 3], [f64; 3])> {
        self.mesh.as_ref()?.bounding_box()
    }

    pub fn add_xsec(&mut self, name: &str, xsec: CrossSection, overwrite: bool) -> Result<()> {
        if self.xsecs.contains_key(name) && !overwrite {
            return Err(duplicate(name, "geo3d cross sections"));
        }
        xsec.slice.validate()?;
        self.xsecs.insert(name.to_string(), xsec);
        Ok(())
    }

    pub fn set_cad_doc(&mut self, bytes: Vec<u8>) {
        self.serial_cad_doc = Some(bytes);
    }

    pub fn cad_doc(&self) -> Option<&[u8]> {
        self.serial_cad_doc.as_deref()
    }

    fn check_regions(&self, mesh: &TetMesh) -> Result<()> {
        if let Some(name) = mesh
            .region_names
            .values()
            .find(|name| !self.parts.contains_key(name.as_str()))
        {
            return Err(QmtError::UnknownRegion(name.clone()));
        }
        Ok(())
    }
}

impl Data for Geo3DData {
    const KIND: DataKind = DataKind::Geo3D;

    fn validate(&self) -> Result<()> {
        for (label, part) in &self.parts {
            if label != &part.label {
                return Err(QmtError::invalid(
                    Self::KIND,
                    format!("part stored under '{}' is labelled '{}'", label, part.label),
                ));
            }
            part.validate()?;
        }
        check_build_order(Self::KIND, &self.build_order, &self.parts)?;
        if let Some(mesh) = &self.mesh {
            mesh.validate()?;
            self.check_regions(mesh)?;
        }
        for xsec in self.xsecs.values() {
            xsec.slice.validate()?;
        }
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("parts".to_string(), self.parts.len().to_string()),
            ("cross sections".to_string(), self.xsecs.len().to_string()),
            (
                "cad document".to_string(),
                match &self.serial_cad_doc {
                    Some(doc) => format!("{} bytes", doc.len()),
                    None => "-".to_string(),
                },
            ),
        ];
        match &self.mesh {
            Some(mesh) => lines.push((
                "mesh".to_string(),
                format!("{} vertices, {} tets", mesh.num_vertices(), mesh.num_tets()),
            )),
            None => lines.push(("mesh".to_string(), "-".to_string())),
        }
        for label in &self.build_order {
            if let Some(part) = self.parts.get(label) {
                lines.push((
                    format!("  {}", label),
                    format!("{} / {}", part.directive.name(), part.domain_type),
                ));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mesh::unit_cube_mesh;
    use crate::data::part::Directive;
    use approx::assert_abs_diff_eq;

    fn square(size: f64) -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [size, 0.0], [size, size], [0.0, size]]
    }

    // ── Geo1DData ──

    #[test]
    fn test_geo1d_add_and_duplicate() {
        let mut geo = Geo1DData::new();
        geo.add_part("barrier", 10.0, 0.0, false).unwrap();
        assert_eq!(geo.get_part("barrier").unwrap(), &Interval { start: 0.0, end: 10.0 });

        let err = geo.add_part("barrier", 0.0, 5.0, false).unwrap_err();
        assert!(matches!(err, QmtError::DuplicateName { .. }));

        geo.add_part("barrier", 0.0, 5.0, true).unwrap();
        assert_eq!(geo.get_part("barrier").unwrap().end, 5.0);
    }

    #[test]
    fn test_geo1d_parts_at_and_bbox() {
        let mut geo = Geo1DData::new();
        geo.add_part("a", 0.0, 10.0, false).unwrap();
        geo.add_part("b", 10.0, 20.0, false).unwrap();
        assert_eq!(geo.parts_at(10.0), vec!["a", "b"]);
        assert_eq!(geo.parts_at(15.0), vec!["b"]);
        assert!(geo.parts_at(25.0).is_empty());
        assert_eq!(geo.bounding_box(), Some((0.0, 20.0)));
    }

    #[test]
    fn test_geo1d_remove_missing() {
        let mut geo = Geo1DData::new();
        assert!(matches!(geo.remove_part("x"), Err(QmtError::NotFound { .. })));
        assert!(geo.add_part("x", f64::NAN, 1.0, false).is_err());
        assert!(geo.bounding_box().is_none());
    }

    // ── Geo2DData ──

    #[test]
    fn test_geo2d_area_and_contains() {
        let mut geo = Geo2DData::new();
        geo.add_part("gate", square(2.0), false).unwrap();
        assert_abs_diff_eq!(geo.part_area("gate").unwrap(), 4.0, epsilon = 1e-12);
        assert_eq!(geo.parts_at([1.0, 1.0]), vec!["gate"]);
        assert!(geo.parts_at([3.0, 1.0]).is_empty());
    }

    #[test]
    fn test_geo2d_clockwise_area_is_positive() {
        let mut geo = Geo2DData::new();
        let mut cw = square(3.0);
        cw.reverse();
        geo.add_part("cw", cw, false).unwrap();
        assert_abs_diff_eq!(geo.part_area("cw").unwrap(), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_geo2d_rejects_degenerate() {
        let mut geo = Geo2DData::new();
        assert!(geo.add_part("line", vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]], false).is_err());
        assert!(geo.add_part("two", vec![[0.0, 0.0], [1.0, 1.0]], false).is_err());
        assert!(geo.add_edge("dot", vec![[0.0, 0.0]], false).is_err());
    }

    #[test]
    fn test_geo2d_build_order_and_remove() {
        let mut geo = Geo2DData::new();
        geo.add_part("b", square(1.0), false).unwrap();
        geo.add_part("a", square(2.0), false).unwrap();
        geo.add_part("b", square(3.0), true).unwrap();
        assert_eq!(geo.build_order, vec!["b", "a"]);
        geo.remove_part("b").unwrap();
        assert_eq!(geo.build_order, vec!["a"]);
        geo.validate().unwrap();
    }

    #[test]
    fn test_geo2d_build_order_must_be_permutation() {
        let mut geo = Geo2DData::new();
        geo.add_part("a", square(1.0), false).unwrap();
        geo.add_part("b", square(2.0), false).unwrap();
        geo.build_order = vec!["a".to_string(), "a".to_string()];
        assert!(matches!(geo.validate(), Err(QmtError::InvalidData { .. })));
        geo.build_order = vec!["a".to_string(), "c".to_string()];
        assert!(geo.validate().is_err());
        geo.build_order = vec!["b".to_string(), "a".to_string()];
        geo.validate().unwrap();
    }

    #[test]
    fn test_geo2d_edges_and_bbox() {
        let mut geo = Geo2DData::new();
        geo.add_part("p", square(1.0), false).unwrap();
        geo.add_edge("e", vec![[0.0, 0.0], [3.0, 4.0], [3.0, 5.0]], false).unwrap();
        assert_abs_diff_eq!(geo.edge_length("e").unwrap(), 6.0, epsilon = 1e-12);
        assert_eq!(geo.bounding_box(), Some(([0.0, 0.0], [3.0, 5.0])));
        geo.remove_edge("e").unwrap();
        assert!(geo.get_edge("e").is_err());
    }

    // ── Geo3DData ──

    fn device() -> Geo3DData {
        let mut geo = Geo3DData::new();
        geo.add_part(
            Part3DData::new("substrate", "Box", Directive::Shape3D, DomainType::Semiconductor)
                .with_material("InAs"),
            false,
        )
        .unwrap();
        geo.add_part(
            Part3DData::new("gate", "Sketch", Directive::Extrude { thickness: 0.5 }, DomainType::MetalGate)
                .with_z0(0.5),
            false,
        )
        .unwrap();
        geo
    }

    #[test]
    fn test_geo3d_parts_by_domain() {
        let geo = device();
        let gates = geo.parts_by_domain(DomainType::MetalGate);
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].label, "gate");
        assert!(geo.parts_by_domain(DomainType::Dielectric).is_empty());
    }

    #[test]
    fn test_geo3d_rejects_invalid_part() {
        let mut geo = Geo3DData::new();
        let bad = Part3DData::new("s", "S", Directive::Shape3D, DomainType::Semiconductor);
        assert!(geo.add_part(bad, false).is_err());
        assert!(geo.parts.is_empty());
    }

    #[test]
    fn test_geo3d_mesh_regions() {
        let mut geo = device();
        geo.set_mesh(unit_cube_mesh()).unwrap();
        let volumes = geo.region_volumes().unwrap();
        assert_abs_diff_eq!(volumes["substrate"], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(volumes["gate"], 0.5, epsilon = 1e-12);
        assert_eq!(geo.bounding_box(), Some(([0.0; 3], [1.0; 3])));
        geo.validate().unwrap();
    }

    #[test]
    fn test_geo3d_mesh_unknown_region() {
        let mut geo = device();
        geo.remove_part("gate").unwrap();
        let err = geo.set_mesh(unit_cube_mesh()).unwrap_err();
        assert!(matches!(err, QmtError::UnknownRegion(name) if name == "gate"));
    }

    #[test]
    fn test_geo3d_xsec_and_cad_doc() {
        let mut geo = device();
        let mut slice = Geo2DData::new();
        slice.add_part("substrate", square(1.0), false).unwrap();
        geo.add_xsec("mid", CrossSection { axis: Axis::Z, offset: 0.25, slice }, false)
            .unwrap();
        assert_eq!(geo.xsecs["mid"].axis, Axis::Z);

        geo.set_cad_doc(vec![1, 2, 3]);
        assert_eq!(geo.cad_doc(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_geo3d_remove_updates_build_order() {
        let mut geo = device();
        geo.remove_part("substrate").unwrap();
        assert_eq!(geo.build_order, vec!["gate"]);
        assert!(geo.get_part("substrate").is_err());
    }

    #[test]
    fn test_geo3d_remove_meshed_part() {
        let mut geo = device();
        geo.set_mesh(unit_cube_mesh()).unwrap();
        let err = geo.remove_part("gate").unwrap_err();
        assert!(matches!(err, QmtError::InvalidArgument(_)));
        assert!(geo.get_part("gate").is_ok());
        geo.validate().unwrap();
        assert!(geo.to_bytes().is_ok());

        assert!(geo.clear_mesh().is_some());
        geo.remove_part("gate").unwrap();
        geo.validate().unwrap();
    }

    #[test]
    fn test_geo3d_duplicate_build_order() {
        let mut geo = device();
        geo.build_order = vec!["gate".to_string(), "gate".to_string()];
        assert!(geo.validate().is_err());
    }
}
