// ==========================================
// WPS 参数推荐系统 - 推荐规则引擎
// ==========================================
// 职责: 对草稿快照逐条执行规则目录，输出面向字段的推荐
// 输入: Draft 快照（只读）
// 输出: Vec<Recommendation>（顺序稳定）
// ==========================================
// 红线: 纯函数，不修改草稿；所有规则每次都执行（互不排斥）
// 红线: 每条推荐必须输出 rationale
// 红线: 缺少必要输入时跳过该规则，不报错
// ==========================================

use crate::domain::draft::Draft;
use crate::domain::joint::compatible_grooves;
use crate::domain::recommendation::{
    Recommendation, RuleId, SuggestedValue, TargetField, ValueRange,
};
use crate::domain::types::{
    Confidence, GrooveType, JointType, MaterialFamily, ShieldingGas, WeldPosition, WeldProcess,
};
use crate::engine::parameter_table::{
    base_travel_speed_mm_min, gas_flow_l_min, preheat_temp_c, wire_feed_speed_m_min,
    ParameterTableResolver, ResolutionBasis,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// 规则目录（执行顺序即输出顺序）
pub const RULE_CATALOG: [RuleId; 6] = [
    RuleId::ProcessFromMaterial,
    RuleId::PositionFromJoint,
    RuleId::DiameterFromThickness,
    RuleId::GrooveFromThickness,
    RuleId::GasFromMaterial,
    RuleId::ParameterFromTable,
];

// 参数容差
const CURRENT_TOLERANCE: f64 = 0.20;
const VOLTAGE_TOLERANCE: f64 = 0.10;
const GMAW_GAS_TOLERANCE: f64 = 0.20;
const GTAW_GAS_TOLERANCE: f64 = 0.40;
const WIRE_FEED_TOLERANCE: f64 = 0.20;
const TRAVEL_TOLERANCE: f64 = 0.30;
const PREHEAT_DELTA_C: f64 = 25.0;

// ==========================================
// RecommendationEngine - 推荐规则引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    resolver: Arc<ParameterTableResolver>,
}

impl RecommendationEngine {
    pub fn new(resolver: Arc<ParameterTableResolver>) -> Self {
        Self { resolver }
    }

    /// 执行全部规则
    #[instrument(skip(self, draft), fields(rules = RULE_CATALOG.len()))]
    pub fn recommend(&self, draft: &Draft) -> Vec<Recommendation> {
        let mut out = Vec::new();
        for rule in RULE_CATALOG {
            let produced = self.evaluate(rule, draft);
            if produced.is_empty() {
                debug!(rule = ?rule, "规则未产生推荐（输入不足或不适用）");
            }
            out.extend(produced);
        }
        out
    }

    /// 执行单条规则
    pub fn evaluate(&self, rule: RuleId, draft: &Draft) -> Vec<Recommendation> {
        match rule {
            RuleId::ProcessFromMaterial => suggest_process(draft).into_iter().collect(),
            RuleId::PositionFromJoint => suggest_position(draft).into_iter().collect(),
            RuleId::DiameterFromThickness => suggest_diameter(draft).into_iter().collect(),
            RuleId::GrooveFromThickness => suggest_groove(draft).into_iter().collect(),
            RuleId::GasFromMaterial => suggest_gas(draft).into_iter().collect(),
            RuleId::ParameterFromTable => self.suggest_parameters(draft),
        }
    }

    // ==========================================
    // 规则 6: 工艺参数
    // ==========================================

    /// 电流/电压/气流量/送丝速度/焊接速度/预热
    ///
    /// 前置条件: 直径、板厚、焊接方法、焊接位置均已录入。
    /// 直径不在允许集合内时，仅跳过依赖直径的四项（电流/电压/气流量/送丝速度）。
    fn suggest_parameters(&self, draft: &Draft) -> Vec<Recommendation> {
        let (Some(process), Some(t), Some(position), Some(d)) = (
            draft.process.process,
            draft.joint.positive_thickness(),
            draft.joint.position,
            draft.process.wire_diameter_mm,
        ) else {
            return Vec::new();
        };

        let material = draft.joint.material_family;
        let multiplier = position.multiplier();
        let voltage_multiplier = 1.0 + (multiplier - 1.0) * 0.5;
        let corrected = multiplier != 1.0;
        let mut out = Vec::new();

        if let Some(d) = draft.process.valid_diameter() {
            let resolved = self.resolver.resolve(process, t, d);
            let exact = resolved.basis.is_exact() && !corrected;
            let basis_text = match resolved.basis {
                ResolutionBasis::TableRow { .. } => "参数表",
                ResolutionBasis::DirectFormula => "确定性公式",
                ResolutionBasis::RowInterpolation { .. } => "相邻表行插值",
                ResolutionBasis::FallbackFormula => "分段经验公式",
            };

            let current = resolved.current_a * multiplier;
            out.push(parameter(
                TargetField::Current,
                current,
                ValueRange::relative(current, CURRENT_TOLERANCE),
                if exact { Confidence::High } else { Confidence::Medium },
                format!(
                    "{} {:.1}mm 板厚 / {:.1}mm 直径按{}得 {:.0}A，{}位置系数 {:.2}",
                    process, t, d, basis_text, resolved.current_a, position.code(), multiplier
                ),
            ));

            let voltage = resolved.voltage_v * voltage_multiplier;
            out.push(parameter(
                TargetField::Voltage,
                voltage,
                ValueRange::relative(voltage, VOLTAGE_TOLERANCE),
                if exact { Confidence::High } else { Confidence::Medium },
                format!(
                    "{}基准电压 {:.1}V，{}位置修正 {:.2}",
                    basis_text, resolved.voltage_v, position.code(), voltage_multiplier
                ),
            ));

            if let Some(flow) = gas_flow_l_min(process, d, material) {
                let tolerance = if process == WeldProcess::Gtaw {
                    GTAW_GAS_TOLERANCE
                } else {
                    GMAW_GAS_TOLERANCE
                };
                out.push(parameter(
                    TargetField::GasFlow,
                    flow,
                    ValueRange::relative(flow, tolerance),
                    Confidence::High,
                    format!("{} {:.1}mm 直径对应保护气流量 {:.1}L/min", process, d, flow),
                ));
            }

            if process.has_wire_feed() {
                let wfs = wire_feed_speed_m_min(current, d);
                out.push(parameter(
                    TargetField::WireFeedSpeed,
                    wfs,
                    ValueRange::relative(wfs, WIRE_FEED_TOLERANCE),
                    Confidence::Medium,
                    format!("由 {:.0}A 电流按 {:.1}mm 焊丝截面反推送丝速度", current, d),
                ));
            }
        } else {
            debug!(process = %process, diameter_mm = d, "直径不在允许集合内，跳过依赖直径的参数推荐");
        }

        let travel = base_travel_speed_mm_min(process, t) * multiplier;
        out.push(parameter(
            TargetField::TravelSpeed,
            travel,
            ValueRange::relative(travel, TRAVEL_TOLERANCE),
            Confidence::Medium,
            format!(
                "{} 焊接速度随板厚递减，{:.1}mm 板厚，{}位置系数 {:.2}",
                process, t, position.code(), multiplier
            ),
        ));

        let preheat = preheat_temp_c(material, t);
        out.push(parameter(
            TargetField::PreheatTemp,
            preheat,
            ValueRange::new((preheat - PREHEAT_DELTA_C).max(0.0), preheat + PREHEAT_DELTA_C),
            Confidence::High,
            format!(
                "{} {:.1}mm 板厚预热 {:.0}°C",
                material.map_or_else(|| "未指定材料".to_string(), |m| m.to_string()),
                t,
                preheat
            ),
        ));

        out
    }
}

fn parameter(
    target: TargetField,
    value: f64,
    range: ValueRange,
    confidence: Confidence,
    rationale: String,
) -> Recommendation {
    Recommendation {
        target,
        value: SuggestedValue::Number(value),
        range: Some(range),
        confidence,
        rationale,
        rule: RuleId::ParameterFromTable,
    }
}

// ==========================================
// 规则 1: 焊接方法 ← 材料类别
// ==========================================
fn suggest_process(draft: &Draft) -> Option<Recommendation> {
    let material = draft.joint.material_family?;
    let thickness = draft.joint.positive_thickness();

    let (process, rationale) = match material {
        MaterialFamily::Aluminum => (WeldProcess::Gtaw, "铝合金推荐 GTAW，交流钨极氩弧可清理氧化膜".to_string()),
        MaterialFamily::StainlessSteel => (WeldProcess::Gtaw, "不锈钢推荐 GTAW，热输入可控、焊缝洁净".to_string()),
        MaterialFamily::CarbonSteel | MaterialFamily::LowAlloySteel => match thickness {
            Some(t) if t >= 6.0 => (
                WeldProcess::Gmaw,
                format!("{} {:.1}mm 中厚板强烈推荐 GMAW，熔敷效率高", material, t),
            ),
            _ => (WeldProcess::Gmaw, format!("{} 推荐 GMAW", material)),
        },
    };

    Some(Recommendation {
        target: TargetField::Process,
        value: SuggestedValue::Process(process),
        range: None,
        confidence: Confidence::High,
        rationale,
        rule: RuleId::ProcessFromMaterial,
    })
}

// ==========================================
// 规则 2: 焊接位置 ← 接头形式
// ==========================================
fn suggest_position(draft: &Draft) -> Option<Recommendation> {
    let joint = draft.joint.joint_type?;
    let (position, rationale) = match joint {
        JointType::Butt => (WeldPosition::Flat, "对接接头优先平焊 (1G)"),
        JointType::Fillet => (WeldPosition::Horizontal, "角接接头优先平角焊 (2F)"),
        JointType::Lap => (WeldPosition::Horizontal, "搭接接头按角焊缝横焊 (2F)"),
    };

    Some(Recommendation {
        target: TargetField::Position,
        value: SuggestedValue::Position(position),
        range: None,
        confidence: Confidence::High,
        rationale: rationale.to_string(),
        rule: RuleId::PositionFromJoint,
    })
}

// ==========================================
// 规则 3: 焊丝/电极直径 ← (焊接方法, 板厚)
// ==========================================

/// 按板厚分档推荐直径
pub fn diameter_for_thickness(process: WeldProcess, thickness_mm: f64) -> f64 {
    let t = thickness_mm;
    match process {
        WeldProcess::Gmaw => {
            if t <= 1.5 {
                0.8
            } else if t <= 3.0 {
                1.0
            } else if t <= 8.0 {
                1.2
            } else {
                1.6
            }
        }
        WeldProcess::Gtaw => {
            if t <= 1.5 {
                1.0
            } else if t <= 3.0 {
                1.6
            } else if t <= 6.0 {
                2.4
            } else if t <= 10.0 {
                3.2
            } else {
                4.0
            }
        }
        WeldProcess::Smaw => {
            if t <= 2.0 {
                2.0
            } else if t <= 3.0 {
                2.5
            } else if t <= 6.0 {
                3.2
            } else if t <= 12.0 {
                4.0
            } else {
                5.0
            }
        }
    }
}

fn suggest_diameter(draft: &Draft) -> Option<Recommendation> {
    let process = draft.process.process?;
    let t = draft.joint.positive_thickness()?;
    let d = diameter_for_thickness(process, t);
    let label = match process {
        WeldProcess::Gmaw => "焊丝",
        WeldProcess::Gtaw => "钨极",
        WeldProcess::Smaw => "焊条",
    };

    Some(Recommendation {
        target: TargetField::WireDiameter,
        value: SuggestedValue::Number(d),
        range: Some(ValueRange::point(d)),
        confidence: Confidence::High,
        rationale: format!("{} {:.1}mm 板厚对应{}直径 {:.1}mm", process, t, label, d),
        rule: RuleId::DiameterFromThickness,
    })
}

// ==========================================
// 规则 4: 坡口形式 ← (接头形式, 板厚)
// ==========================================

/// 按板厚分档推荐坡口
///
/// 分档结果必须在坡口目录中适用于该接头与板厚，否则不推荐
pub fn groove_for_thickness(joint: JointType, thickness_mm: f64) -> Option<GrooveType> {
    let banded = match joint {
        JointType::Butt => {
            if thickness_mm <= 3.0 {
                GrooveType::I
            } else if thickness_mm <= 16.0 {
                GrooveType::V
            } else if thickness_mm <= 30.0 {
                GrooveType::X
            } else {
                GrooveType::DoubleU
            }
        }
        JointType::Fillet | JointType::Lap => GrooveType::Fillet,
    };

    compatible_grooves(joint, Some(thickness_mm))
        .contains(&banded)
        .then_some(banded)
}

fn suggest_groove(draft: &Draft) -> Option<Recommendation> {
    let joint = draft.joint.joint_type?;
    let t = draft.joint.positive_thickness()?;
    let Some(groove) = groove_for_thickness(joint, t) else {
        debug!(joint = %joint, thickness_mm = t, "板厚超出坡口目录范围，不推荐坡口");
        return None;
    };

    Some(Recommendation {
        target: TargetField::GrooveType,
        value: SuggestedValue::Groove(groove),
        range: None,
        confidence: Confidence::High,
        rationale: format!("{} 接头 {:.1}mm 板厚推荐 {} 坡口", joint, t, groove),
        rule: RuleId::GrooveFromThickness,
    })
}

// ==========================================
// 规则 5: 保护气 ← (材料类别, 焊接方法)
// ==========================================

/// 推荐保护气，SMAW 返回 None
pub fn gas_for(material: MaterialFamily, process: WeldProcess, thickness_mm: Option<f64>) -> Option<ShieldingGas> {
    match process {
        WeldProcess::Smaw => None,
        WeldProcess::Gmaw => Some(match material {
            MaterialFamily::CarbonSteel | MaterialFamily::LowAlloySteel => ShieldingGas::ArgonCo2_18,
            MaterialFamily::StainlessSteel => ShieldingGas::ArgonCo2_2,
            MaterialFamily::Aluminum => ShieldingGas::Argon,
        }),
        WeldProcess::Gtaw => match (material, thickness_mm) {
            (MaterialFamily::Aluminum, Some(t)) if t > 10.0 => Some(ShieldingGas::ArgonHelium),
            _ => Some(ShieldingGas::Argon),
        },
    }
}

fn suggest_gas(draft: &Draft) -> Option<Recommendation> {
    let material = draft.joint.material_family?;
    let process = draft.process.process?;
    let gas = gas_for(material, process, draft.joint.positive_thickness())?;

    Some(Recommendation {
        target: TargetField::ShieldingGas,
        value: SuggestedValue::Gas(gas),
        range: None,
        confidence: Confidence::High,
        rationale: format!("{} + {} 推荐保护气 {}", material, process, gas),
        rule: RuleId::GasFromMaterial,
    })
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(ParameterTableResolver::default()))
    }

    fn full_draft() -> Draft {
        let mut draft = Draft::new();
        draft.joint.material_family = Some(MaterialFamily::CarbonSteel);
        draft.joint.thickness_mm = Some(3.0);
        draft.joint.joint_type = Some(JointType::Butt);
        draft.joint.position = Some(WeldPosition::Flat);
        draft.process.process = Some(WeldProcess::Gmaw);
        draft.process.wire_diameter_mm = Some(1.0);
        draft
    }

    fn find(recs: &[Recommendation], target: TargetField) -> Option<&Recommendation> {
        recs.iter().find(|r| r.target == target)
    }

    #[test]
    fn test_empty_draft_yields_no_recommendations() {
        assert!(engine().recommend(&Draft::new()).is_empty());
    }

    #[test]
    fn test_full_draft_fires_every_rule_in_catalog_order() {
        let recs = engine().recommend(&full_draft());
        let targets: Vec<TargetField> = recs.iter().map(|r| r.target).collect();
        assert_eq!(
            targets,
            vec![
                TargetField::Process,
                TargetField::Position,
                TargetField::WireDiameter,
                TargetField::GrooveType,
                TargetField::ShieldingGas,
                TargetField::Current,
                TargetField::Voltage,
                TargetField::GasFlow,
                TargetField::WireFeedSpeed,
                TargetField::TravelSpeed,
                TargetField::PreheatTemp,
            ]
        );
    }

    #[test]
    fn test_current_from_table_is_high_confidence_on_flat() {
        let recs = engine().recommend(&full_draft());
        let current = find(&recs, TargetField::Current).unwrap();
        assert_eq!(current.value, SuggestedValue::Number(105.0));
        assert_eq!(current.confidence, Confidence::High);
        let range = current.range.unwrap();
        assert!((range.min - 84.0).abs() < 1e-9);
        assert!((range.max - 126.0).abs() < 1e-9);

        let voltage = find(&recs, TargetField::Voltage).unwrap();
        assert_eq!(voltage.value, SuggestedValue::Number(21.0));
    }

    #[test]
    fn test_position_correction_lowers_confidence() {
        let mut draft = full_draft();
        draft.joint.position = Some(WeldPosition::VerticalUp);
        let recs = engine().recommend(&draft);
        let current = find(&recs, TargetField::Current).unwrap();
        assert_eq!(current.confidence, Confidence::Medium);
        assert!((current.value.as_number().unwrap() - 84.0).abs() < 1e-9);
    }

    #[test]
    fn test_stainless_and_aluminum_suggest_gtaw() {
        for material in [MaterialFamily::StainlessSteel, MaterialFamily::Aluminum] {
            let mut draft = Draft::new();
            draft.joint.material_family = Some(material);
            let recs = engine().recommend(&draft);
            assert_eq!(recs.len(), 1);
            assert_eq!(recs[0].value, SuggestedValue::Process(WeldProcess::Gtaw));
            assert_eq!(recs[0].confidence, Confidence::High);
        }
    }

    #[test]
    fn test_thick_carbon_steel_rationale_is_stronger() {
        let mut draft = Draft::new();
        draft.joint.material_family = Some(MaterialFamily::CarbonSteel);
        draft.joint.thickness_mm = Some(12.0);
        let recs = engine().recommend(&draft);
        let process = find(&recs, TargetField::Process).unwrap();
        assert_eq!(process.value, SuggestedValue::Process(WeldProcess::Gmaw));
        assert!(process.rationale.contains("强烈推荐"));
    }

    #[test]
    fn test_smaw_gets_no_gas_no_wire_feed() {
        let mut draft = full_draft();
        draft.process.process = Some(WeldProcess::Smaw);
        draft.process.wire_diameter_mm = Some(3.2);
        let recs = engine().recommend(&draft);
        assert!(find(&recs, TargetField::ShieldingGas).is_none());
        assert!(find(&recs, TargetField::GasFlow).is_none());
        assert!(find(&recs, TargetField::WireFeedSpeed).is_none());
        assert!(find(&recs, TargetField::Current).is_some());
    }

    #[test]
    fn test_disallowed_diameter_skips_only_diameter_dependent_parameters() {
        let mut draft = full_draft();
        draft.process.wire_diameter_mm = Some(2.4);
        let recs = engine().recommend(&draft);
        for target in [
            TargetField::Current,
            TargetField::Voltage,
            TargetField::GasFlow,
            TargetField::WireFeedSpeed,
        ] {
            assert!(find(&recs, target).is_none(), "{} 不应推荐", target);
        }
        for target in [
            TargetField::Process,
            TargetField::Position,
            TargetField::GrooveType,
            TargetField::ShieldingGas,
            TargetField::TravelSpeed,
            TargetField::PreheatTemp,
        ] {
            assert!(find(&recs, target).is_some(), "{} 应推荐", target);
        }
    }

    #[test]
    fn test_parameters_require_position() {
        let mut draft = full_draft();
        draft.joint.position = None;
        let recs = engine().recommend(&draft);
        assert!(recs.iter().all(|r| r.rule != RuleId::ParameterFromTable));
    }

    #[test]
    fn test_diameter_bands() {
        assert_eq!(diameter_for_thickness(WeldProcess::Gmaw, 1.0), 0.8);
        assert_eq!(diameter_for_thickness(WeldProcess::Gmaw, 10.0), 1.6);
        assert_eq!(diameter_for_thickness(WeldProcess::Gtaw, 5.0), 2.4);
        assert_eq!(diameter_for_thickness(WeldProcess::Smaw, 8.0), 4.0);
        for process in [WeldProcess::Gmaw, WeldProcess::Gtaw, WeldProcess::Smaw] {
            for t in [0.5, 1.5, 2.5, 4.0, 7.0, 11.0, 20.0, 60.0] {
                assert!(process.allows_diameter(diameter_for_thickness(process, t)));
            }
        }
    }

    #[test]
    fn test_groove_suggestion_respects_catalog() {
        for joint in [JointType::Butt, JointType::Fillet, JointType::Lap] {
            for t in [0.3, 0.5, 1.0, 1.9, 2.0, 3.0, 8.0, 16.0, 20.0, 30.0, 45.0, 50.0, 51.0, 200.0, 250.0] {
                if let Some(groove) = groove_for_thickness(joint, t) {
                    let spec = groove.spec();
                    assert!(spec.allows_joint(joint), "{} 不适用于 {} 接头", groove, joint);
                    assert!(spec.covers_thickness(t), "{}mm 不在 {} 范围内", t, groove);
                }
            }
        }
        assert_eq!(groove_for_thickness(JointType::Lap, 5.0), Some(GrooveType::Fillet));
        assert_eq!(groove_for_thickness(JointType::Butt, 45.0), Some(GrooveType::DoubleU));
    }

    #[test]
    fn test_no_groove_outside_catalog_thickness() {
        assert_eq!(groove_for_thickness(JointType::Fillet, 1.0), None);
        assert_eq!(groove_for_thickness(JointType::Lap, 60.0), None);
        assert_eq!(groove_for_thickness(JointType::Butt, 0.3), None);
        assert_eq!(groove_for_thickness(JointType::Butt, 250.0), None);

        let mut draft = Draft::new();
        draft.joint.joint_type = Some(JointType::Fillet);
        draft.joint.thickness_mm = Some(1.0);
        let recs = engine().recommend(&draft);
        assert!(find(&recs, TargetField::GrooveType).is_none());
    }

    #[test]
    fn test_gas_rules() {
        assert_eq!(
            gas_for(MaterialFamily::StainlessSteel, WeldProcess::Gmaw, None),
            Some(ShieldingGas::ArgonCo2_2)
        );
        assert_eq!(
            gas_for(MaterialFamily::Aluminum, WeldProcess::Gtaw, Some(12.0)),
            Some(ShieldingGas::ArgonHelium)
        );
        assert_eq!(gas_for(MaterialFamily::CarbonSteel, WeldProcess::Smaw, None), None);
    }

    #[test]
    fn test_range_present_only_for_numeric_values() {
        let mut gap = full_draft();
        gap.joint.thickness_mm = Some(7.0);
        gap.process.wire_diameter_mm = Some(1.2);

        for draft in [full_draft(), gap] {
            for r in engine().recommend(&draft) {
                match (r.value, r.range) {
                    (SuggestedValue::Number(v), Some(range)) => {
                        assert!(range.contains(v), "{} 推荐值 {} 不在区间内", r.target, v)
                    }
                    (SuggestedValue::Number(_), None) => panic!("{} 缺少区间", r.target),
                    (_, range) => assert!(range.is_none(), "{} 不应输出区间", r.target),
                }
            }
        }
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let draft = full_draft();
        assert_eq!(engine().recommend(&draft), engine().recommend(&draft));
    }
}
