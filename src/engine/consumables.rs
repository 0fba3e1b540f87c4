// ==========================================
// WPS 参数推荐系统 - 焊材消耗估算
// ==========================================
// 职责: 坡口截面积 → 熔敷金属量 → 焊丝/焊条消耗、燃弧时间、保护气用量
// 输入: Draft + 已分解的 PassPlan
// 输出: Option<ConsumableEstimate>（输入不足时为 None）
// ==========================================
// 焊丝消耗取"送丝量"与"熔敷量/熔敷效率"两者的较大值
// ==========================================

use crate::domain::draft::Draft;
use crate::domain::parameters::is_unset;
use crate::domain::pass_plan::PassPlan;
use crate::domain::types::{GrooveType, MaterialFamily};
use crate::engine::parameter_table::{clamp_thickness, gas_flow_l_min, wire_area_mm2};
use crate::engine::pass_decomposition::effective_angle;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 余高系数
const REINFORCEMENT_FACTOR: f64 = 1.10;

/// U/J 坡口根部半径 (mm)
const U_ROOT_RADIUS_MM: f64 = 6.0;

/// Y 坡口钝边 (mm)
const Y_LAND_MM: f64 = 2.0;

/// I 坡口最小熔透宽度 (mm)
const MIN_SQUARE_GAP_MM: f64 = 1.0;

/// 角焊缝焊脚上限 (mm)
const MAX_FILLET_LEG_MM: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableEstimate {
    /// 坡口截面积（含余高）(mm²)
    pub groove_area_mm2: f64,
    /// 熔敷金属 (kg)
    pub deposited_kg: f64,
    /// 按熔敷效率折算的焊材 (kg)
    pub wire_kg_by_deposition: f64,
    /// 按送丝速度累计的焊丝 (kg)，仅 GMAW
    pub wire_kg_by_feed: Option<f64>,
    /// 焊材消耗 (kg) = max(上两项)
    pub wire_kg: f64,
    /// 累计燃弧时间 (min)
    pub arc_time_min: f64,
    /// 保护气用量 (L)，SMAW 为 None
    pub gas_liters: Option<f64>,
    /// 最大单道热输入 (kJ/mm)
    pub max_heat_input_kj_mm: Option<f64>,
}

/// 估算焊材消耗
///
/// 前置条件: 焊缝长度、板厚、坡口、焊接方法、直径均已录入，且焊道计划非空
pub fn estimate(draft: &Draft, plan: &PassPlan) -> Option<ConsumableEstimate> {
    let length = draft.joint.weld_length_mm.filter(|l| *l > 0.0)?;
    let thickness = draft.joint.thickness_mm?;
    let groove = draft.joint.groove_type?;
    let process = draft.process.process?;
    let diameter = draft.process.wire_diameter_mm.filter(|d| *d > 0.0)?;
    if plan.is_empty() {
        debug!("焊道计划为空，跳过焊材估算");
        return None;
    }

    let t = clamp_thickness(thickness);
    let material = draft.joint.material_family.unwrap_or(MaterialFamily::CarbonSteel);
    let density = material.density_g_cm3();
    let gap = draft.joint.root_opening_mm.filter(|g| *g > 0.0).unwrap_or(0.0);
    let angle = effective_angle(groove, draft.joint.groove_angle_deg);

    let area = groove_area_mm2(groove, t, angle, gap) * REINFORCEMENT_FACTOR;
    // mm² × mm = mm³；× g/cm³ / 1e6 → kg
    let deposited_kg = area * length * density / 1.0e6;
    let wire_kg_by_deposition = deposited_kg / process.deposition_efficiency();

    let arc_time_min: f64 = plan
        .passes
        .iter()
        .filter(|p| p.travel_speed_mm_min > 0.0)
        .map(|p| length / p.travel_speed_mm_min)
        .sum();

    let wire_kg_by_feed = if process.has_wire_feed() {
        // kg/m = mm² × g/cm³ / 1000
        let linear_density = wire_area_mm2(diameter) * density / 1000.0;
        Some(
            plan.passes
                .iter()
                .filter(|p| p.travel_speed_mm_min > 0.0)
                .filter_map(|p| p.wire_feed_speed_m_min.map(|wfs| wfs * (length / p.travel_speed_mm_min)))
                .sum::<f64>()
                * linear_density,
        )
    } else {
        None
    };

    let wire_kg = wire_kg_by_feed.map_or(wire_kg_by_deposition, |feed| feed.max(wire_kg_by_deposition));

    let flow = if is_unset(draft.parameters.gas_flow_l_min) {
        gas_flow_l_min(process, diameter, draft.joint.material_family)
    } else {
        draft.parameters.gas_flow_l_min
    };
    let gas_liters = flow.map(|f| f * arc_time_min);

    Some(ConsumableEstimate {
        groove_area_mm2: area,
        deposited_kg,
        wire_kg_by_deposition,
        wire_kg_by_feed,
        wire_kg,
        arc_time_min,
        gas_liters,
        max_heat_input_kj_mm: plan.max_heat_input(),
    })
}

/// 坡口截面积（不含余高）(mm²)
///
/// `angle_deg`: V/Y/X/双V 为坡口角，Bevel/K 为单边坡口角，U/J 为侧壁角
pub fn groove_area_mm2(groove: GrooveType, t: f64, angle_deg: f64, gap_mm: f64) -> f64 {
    let gap_area = gap_mm * t;
    match groove {
        GrooveType::I | GrooveType::IHeavy => gap_mm.max(MIN_SQUARE_GAP_MM) * t,
        GrooveType::V => vee(t, angle_deg) + gap_area,
        GrooveType::Y => vee((t - Y_LAND_MM).max(0.0), angle_deg) + gap_area,
        GrooveType::Bevel => bevel(t, angle_deg) + gap_area,
        GrooveType::U => u_shape(t, angle_deg) + gap_area,
        GrooveType::J => u_shape(t, angle_deg) / 2.0 + gap_area,
        GrooveType::X => 2.0 * vee(t / 2.0, angle_deg) + gap_area,
        GrooveType::DoubleV => vee(2.0 * t / 3.0, angle_deg) + vee(t / 3.0, angle_deg) + gap_area,
        GrooveType::K => 2.0 * bevel(t / 2.0, angle_deg) + gap_area,
        GrooveType::DoubleU => 2.0 * u_shape(t / 2.0, angle_deg) + gap_area,
        GrooveType::Fillet => {
            let leg = (0.7 * t).min(MAX_FILLET_LEG_MM);
            leg * leg / 2.0
        }
    }
}

fn vee(depth: f64, included_deg: f64) -> f64 {
    depth * depth * (included_deg / 2.0).to_radians().tan()
}

fn bevel(depth: f64, bevel_deg: f64) -> f64 {
    depth * depth * bevel_deg.to_radians().tan() / 2.0
}

fn u_shape(depth: f64, side_deg: f64) -> f64 {
    let r = U_ROOT_RADIUS_MM.min(depth);
    let straight = (depth - r).max(0.0);
    std::f64::consts::PI * r * r / 2.0 + 2.0 * r * straight + straight * straight * side_deg.to_radians().tan()
}
