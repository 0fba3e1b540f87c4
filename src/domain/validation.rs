// ==========================================
// WPS 参数推荐系统 - 草稿一致性校验
// ==========================================
// 职责: 检查草稿不变量，输出问题清单（不阻断计算）
// 覆盖: 坡口/接头兼容、坡口厚度范围、直径允许集合、保护气允许集合、送丝速度适用性
// ==========================================

use crate::domain::draft::Draft;
use crate::domain::types::{GrooveType, JointType, ShieldingGas, WeldProcess};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 草稿问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftIssue {
    NonPositiveThickness { thickness_mm: f64 },
    GrooveJointMismatch { groove: GrooveType, joint: JointType },
    ThicknessOutsideGrooveRange { groove: GrooveType, thickness_mm: f64, min_mm: f64, max_mm: f64 },
    DiameterNotAllowed { process: WeldProcess, diameter_mm: f64 },
    GasNotAllowed { process: WeldProcess, gas: ShieldingGas },
    WireFeedNotApplicable { process: WeldProcess },
}

impl fmt::Display for DraftIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftIssue::NonPositiveThickness { thickness_mm } => {
                write!(f, "板厚必须大于 0: {}", thickness_mm)
            }
            DraftIssue::GrooveJointMismatch { groove, joint } => {
                write!(f, "坡口 {} 不适用于接头 {}", groove, joint)
            }
            DraftIssue::ThicknessOutsideGrooveRange {
                groove,
                thickness_mm,
                min_mm,
                max_mm,
            } => write!(
                f,
                "板厚 {}mm 超出坡口 {} 适用范围 [{}, {}]",
                thickness_mm, groove, min_mm, max_mm
            ),
            DraftIssue::DiameterNotAllowed { process, diameter_mm } => {
                write!(f, "{} 不允许直径 {}mm", process, diameter_mm)
            }
            DraftIssue::GasNotAllowed { process, gas } => {
                write!(f, "{} 不允许保护气 {}", process, gas)
            }
            DraftIssue::WireFeedNotApplicable { process } => {
                write!(f, "{} 无送丝速度参数", process)
            }
        }
    }
}

/// 校验草稿，返回全部问题（顺序稳定）
pub fn validate_draft(draft: &Draft) -> Vec<DraftIssue> {
    let mut issues = Vec::new();
    let joint = &draft.joint;

    if let Some(t) = joint.thickness_mm {
        if t <= 0.0 {
            issues.push(DraftIssue::NonPositiveThickness { thickness_mm: t });
        }
    }

    if let Some(groove) = joint.groove_type {
        let spec = groove.spec();
        if let Some(jt) = joint.joint_type {
            if !spec.allows_joint(jt) {
                issues.push(DraftIssue::GrooveJointMismatch { groove, joint: jt });
            }
        }
        if let Some(t) = joint.positive_thickness() {
            if !spec.covers_thickness(t) {
                issues.push(DraftIssue::ThicknessOutsideGrooveRange {
                    groove,
                    thickness_mm: t,
                    min_mm: spec.min_thickness_mm,
                    max_mm: spec.max_thickness_mm,
                });
            }
        }
    }

    if let Some(process) = draft.process.process {
        if let Some(d) = draft.process.wire_diameter_mm {
            if !process.allows_diameter(d) {
                issues.push(DraftIssue::DiameterNotAllowed { process, diameter_mm: d });
            }
        }
        if let Some(gas) = draft.process.shielding_gas {
            if !process.allows_gas(gas) {
                issues.push(DraftIssue::GasNotAllowed { process, gas });
            }
        }
        if !process.has_wire_feed() && draft.parameters.wire_feed_speed_m_min.is_some() {
            issues.push(DraftIssue::WireFeedNotApplicable { process });
        }
    }

    issues
}
