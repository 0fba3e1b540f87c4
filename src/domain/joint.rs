// ==========================================
// WPS 参数推荐系统 - 接头与坡口
// ==========================================
// 职责: 接头规格实体 + 坡口目录（适用接头/厚度范围/名义角度）
// ==========================================

use crate::domain::types::{GrooveType, JointType, MaterialFamily, WeldPosition};
use serde::{Deserialize, Serialize};

/// 接头规格（草稿中由用户录入的部分）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeldJointSpec {
    pub material_family: Option<MaterialFamily>,
    pub material_grade: Option<String>,
    /// 板厚 (mm, >0)
    pub thickness_mm: Option<f64>,
    pub joint_type: Option<JointType>,
    pub groove_type: Option<GrooveType>,
    /// 坡口角度 (°)
    pub groove_angle_deg: Option<f64>,
    /// 根部间隙 (mm)
    pub root_opening_mm: Option<f64>,
    pub position: Option<WeldPosition>,
    /// 焊缝长度 (mm)，仅用于焊材估算
    #[serde(default)]
    pub weld_length_mm: Option<f64>,
}

impl WeldJointSpec {
    /// 板厚（仅当 > 0 时视为已录入）
    pub fn positive_thickness(&self) -> Option<f64> {
        self.thickness_mm.filter(|t| *t > 0.0)
    }
}

/// 坡口目录项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrooveSpec {
    pub groove: GrooveType,
    pub allowed_joints: &'static [JointType],
    pub min_thickness_mm: f64,
    pub max_thickness_mm: f64,
    /// 名义坡口角度，无角度的坡口为 None
    pub nominal_angle_deg: Option<f64>,
}

impl GrooveSpec {
    pub fn allows_joint(&self, joint: JointType) -> bool {
        self.allowed_joints.contains(&joint)
    }

    pub fn covers_thickness(&self, thickness_mm: f64) -> bool {
        thickness_mm >= self.min_thickness_mm && thickness_mm <= self.max_thickness_mm
    }
}

impl GrooveType {
    /// 坡口目录
    pub fn spec(&self) -> GrooveSpec {
        use JointType::*;
        let (allowed_joints, min_t, max_t, angle): (&'static [JointType], f64, f64, Option<f64>) =
            match self {
                GrooveType::I => (&[Butt], 0.5, 6.0, None),
                GrooveType::IHeavy => (&[Butt], 6.0, 25.0, None),
                GrooveType::V => (&[Butt], 3.0, 25.0, Some(60.0)),
                GrooveType::Y => (&[Butt], 8.0, 30.0, Some(60.0)),
                GrooveType::Bevel => (&[Butt, Fillet], 3.0, 25.0, Some(45.0)),
                GrooveType::U => (&[Butt], 12.0, 60.0, Some(20.0)),
                GrooveType::J => (&[Butt, Fillet], 12.0, 50.0, Some(20.0)),
                GrooveType::X => (&[Butt], 12.0, 60.0, Some(60.0)),
                GrooveType::DoubleV => (&[Butt], 12.0, 60.0, Some(60.0)),
                GrooveType::K => (&[Butt, Fillet], 12.0, 50.0, Some(45.0)),
                GrooveType::DoubleU => (&[Butt], 25.0, 200.0, Some(20.0)),
                GrooveType::Fillet => (&[Fillet, Lap], 2.0, 50.0, None),
            };

        GrooveSpec {
            groove: *self,
            allowed_joints,
            min_thickness_mm: min_t,
            max_thickness_mm: max_t,
            nominal_angle_deg: angle,
        }
    }
}

/// 给定接头形式（及可选板厚）下允许的坡口类型，按目录顺序
pub fn compatible_grooves(joint: JointType, thickness_mm: Option<f64>) -> Vec<GrooveType> {
    GrooveType::ALL
        .iter()
        .copied()
        .filter(|g| {
            let spec = g.spec();
            spec.allows_joint(joint) && thickness_mm.map_or(true, |t| spec.covers_thickness(t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatible_grooves_for_thin_butt() {
        let grooves = compatible_grooves(JointType::Butt, Some(3.0));
        assert!(grooves.contains(&GrooveType::I));
        assert!(grooves.contains(&GrooveType::V));
        assert!(!grooves.contains(&GrooveType::X));
        assert!(!grooves.contains(&GrooveType::Fillet));
    }

    #[test]
    fn test_compatible_grooves_for_lap_ignores_thickness_when_unknown() {
        let grooves = compatible_grooves(JointType::Lap, None);
        assert_eq!(grooves, vec![GrooveType::Fillet]);
    }

    #[test]
    fn test_positive_thickness_filters_non_positive() {
        let mut joint = WeldJointSpec::default();
        joint.thickness_mm = Some(0.0);
        assert_eq!(joint.positive_thickness(), None);
        joint.thickness_mm = Some(4.5);
        assert_eq!(joint.positive_thickness(), Some(4.5));
    }

    #[test]
    fn test_angled_grooves_have_nominal_angle() {
        for groove in GrooveType::ALL {
            if groove.is_angled() {
                assert!(groove.spec().nominal_angle_deg.is_some(), "{} 缺少名义角度", groove);
            }
        }
    }
}
