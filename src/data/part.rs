//! # 三维部件数据
//!
//! 器件中单个部件的构建指令、物理域类型、材料与边界条件。
//!
//! ## 依赖关系
//! - 被 `data/geo.rs` 的 `Geo3DData` 使用
//! - 实现 `data/template.rs` 的 `Data`

use crate::data::template::{Data, DataKind};
use crate::error::{QmtError, Result};

use serde::{Deserialize, Serialize};

/// 部件实体的构建方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// 从草图沿 z 拉伸
    Extrude { thickness: f64 },
    /// 沿草图生成纳米线
    Wire { thickness: f64 },
    /// 包裹目标纳米线的壳层
    WireShell { target_wire: String, thickness: f64 },
    /// 选择性区域生长
    Sag {
        z_middle: f64,
        z_top: f64,
        t_in: f64,
        t_out: f64,
    },
    /// 光刻：在若干基底部件上按层沉积
    Lithography { layer_num: u32, base_parts: Vec<String> },
    /// 直接给定的三维实体
    Shape3D,
}

impl Directive {
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Extrude { .. } => "extrude",
            Directive::Wire { .. } => "wire",
            Directive::WireShell { .. } => "wire_shell",
            Directive::Sag { .. } => "sag",
            Directive::Lithography { .. } => "lithography",
            Directive::Shape3D => "3d_shape",
        }
    }
}

/// 物理域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainType {
    Semiconductor,
    Dielectric,
    MetalGate,
    Virtual,
}

impl std::fmt::Display for DomainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainType::Semiconductor => write!(f, "semiconductor"),
            DomainType::Dielectric => write!(f, "dielectric"),
            DomainType::MetalGate => write!(f, "metal_gate"),
            DomainType::Virtual => write!(f, "virtual"),
        }
    }
}

/// 金属栅边界条件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundaryCondition {
    /// 栅压 (V)
    Voltage(f64),
    /// 功函数 (eV)
    WorkFunction(f64),
}

/// 三维部件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part3DData {
    /// 部件标签（在器件中唯一）
    pub label: String,

    /// CAD 文档中的对象名
    pub cad_name: String,

    /// 构建指令
    pub directive: Directive,

    /// 物理域类型
    pub domain_type: DomainType,

    /// 材料名
    pub material: Option<String>,

    /// 起始高度
    pub z0: f64,

    /// 边界条件（仅金属栅）
    pub boundary_condition: Option<BoundaryCondition>,

    /// 网格最大单元尺寸
    pub mesh_max_size: Option<f64>,
}

impl Part3DData {
    pub fn new(
        label: impl Into<String>,
        cad_name: impl Into<String>,
        directive: Directive,
        domain_type: DomainType,
    ) -> Self {
        Part3DData {
            label: label.into(),
            cad_name: cad_name.into(),
            directive,
            domain_type,
            material: None,
            z0: 0.0,
            boundary_condition: None,
            mesh_max_size: None,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_z0(mut self, z0: f64) -> Self {
        self.z0 = z0;
        self
    }

    pub fn with_boundary_condition(mut self, bc: BoundaryCondition) -> Self {
        self.boundary_condition = Some(bc);
        self
    }

    pub fn with_mesh_max_size(mut self, size: f64) -> Self {
        self.mesh_max_size = Some(size);
        self
    }

    /// 由构建指令确定的 z 范围 (底, 顶)
    pub fn z_extent(&self) -> Option<(f64, f64)> {
        match &self.directive {
            Directive::Extrude { thickness } | Directive::Wire { thickness } => {
                Some((self.z0, self.z0 + thickness))
            }
            Directive::Sag { z_top, .. } => Some((self.z0, *z_top)),
            _ => None,
        }
    }

    fn check_positive(&self, name: &str, value: f64) -> Result<()> {
        if !(value.is_finite() && value > 0.0) {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("part '{}': {} must be positive, got {}", self.label, name, value),
            ));
        }
        Ok(())
    }

    fn check_directive(&self) -> Result<()> {
        match &self.directive {
            Directive::Extrude { thickness } | Directive::Wire { thickness } => {
                self.check_positive("thickness", *thickness)
            }
            Directive::WireShell {
                target_wire,
                thickness,
            } => {
                if target_wire.trim().is_empty() {
                    return Err(QmtError::invalid(
                        Self::KIND,
                        format!("part '{}': wire shell needs a target wire", self.label),
                    ));
                }
                self.check_positive("thickness", *thickness)
            }
            Directive::Sag {
                z_middle,
                z_top,
                t_in,
                t_out,
            } => {
                self.check_positive("t_in", *t_in)?;
                self.check_positive("t_out", *t_out)?;
                if !(z_top > z_middle) {
                    return Err(QmtError::invalid(
                        Self::KIND,
                        format!(
                            "part '{}': z_top ({}) must be above z_middle ({})",
                            self.label, z_top, z_middle
                        ),
                    ));
                }
                Ok(())
            }
            Directive::Lithography { base_parts, .. } => {
                if base_parts.is_empty() {
                    return Err(QmtError::invalid(
                        Self::KIND,
                        format!("part '{}': lithography needs at least one base part", self.label),
                    ));
                }
                Ok(())
            }
            Directive::Shape3D => Ok(()),
        }
    }

    fn check_domain(&self) -> Result<()> {
        match (self.domain_type, &self.material) {
            (DomainType::Semiconductor | DomainType::Dielectric, None) => {
                return Err(QmtError::invalid(
                    Self::KIND,
                    format!("part '{}': {} domain needs a material", self.label, self.domain_type),
                ));
            }
            (DomainType::Virtual, Some(m)) => {
                return Err(QmtError::invalid(
                    Self::KIND,
                    format!("part '{}': virtual domain cannot carry material '{}'", self.label, m),
                ));
            }
            _ => {}
        }

        if self.boundary_condition.is_some() && self.domain_type != DomainType::MetalGate {
            return Err(QmtError::invalid(
                Self::KIND,
                format!(
                    "part '{}': boundary conditions only apply to metal gates, not {}",
                    self.label, self.domain_type
                ),
            ));
        }
        Ok(())
    }
}

impl Data for Part3DData {
    const KIND: DataKind = DataKind::Part3D;

    fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(QmtError::invalid(Self::KIND, "label is empty"));
        }
        if !self.z0.is_finite() {
            return Err(QmtError::invalid(
                Self::KIND,
                format!("part '{}': z0 is not finite", self.label),
            ));
        }
        self.check_directive()?;
        self.check_domain()?;
        if let Some(size) = self.mesh_max_size {
            self.check_positive("mesh_max_size", size)?;
        }
        Ok(())
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("label".to_string(), self.label.clone()),
            ("cad_name".to_string(), self.cad_name.clone()),
            ("directive".to_string(), self.directive.name().to_string()),
            ("domain".to_string(), self.domain_type.to_string()),
            (
                "material".to_string(),
                self.material.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];
        if let Some(bc) = self.boundary_condition {
            let text = match bc {
                BoundaryCondition::Voltage(v) => format!("V = {} V", v),
                BoundaryCondition::WorkFunction(w) => format!("W = {} eV", w),
            };
            lines.push(("boundary".to_string(), text));
        }
        lines
    }
}
