use super::count::total_pass_count;
use super::roles::{partition_roles, role_for, RolePartition};
use crate::domain::draft::Draft;
use crate::domain::pass_plan::{Pass, PassPlan};
use crate::domain::types::{GrooveType, PassRole, WeldProcess};
use crate::engine::parameter_table::{
    base_travel_speed_mm_min, clamp_thickness, wire_feed_speed_m_min, ParameterTableResolver,
    ResolvedParameters,
};
use std::sync::Arc;
use tracing::{debug, instrument};

const MIN_CURRENT_A: f64 = 50.0;
const MIN_VOLTAGE_V: f64 = 10.0;

// ==========================================
// PassDecompositionEngine - 多道焊分解引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct PassDecompositionEngine {
    resolver: Arc<ParameterTableResolver>,
}

impl PassDecompositionEngine {
    pub fn new(resolver: Arc<ParameterTableResolver>) -> Self {
        Self { resolver }
    }

    /// 从草稿分解焊道
    ///
    /// 缺少坡口/板厚/焊接方法时返回空计划（正常状态，不是错误）
    pub fn decompose_draft(&self, draft: &Draft) -> PassPlan {
        let (Some(groove), Some(thickness), Some(process)) = (
            draft.joint.groove_type,
            draft.joint.thickness_mm,
            draft.process.process,
        ) else {
            debug!("坡口/板厚/焊接方法未齐全，焊道计划为空");
            return PassPlan::empty();
        };

        self.decompose(
            groove,
            thickness,
            draft.process.effective_diameter(),
            draft.joint.groove_angle_deg,
            process,
        )
    }

    /// 分解焊道
    ///
    /// # 参数
    /// - `groove`: 坡口类型
    /// - `thickness_mm`: 板厚，钳位到 [0.5, 200]mm
    /// - `wire_diameter_mm`: 焊丝/电极直径，None 或非正值时取方法默认直径
    /// - `groove_angle_deg`: 坡口角度，None 时取坡口名义角度
    /// - `process`: 焊接方法
    #[instrument(skip(self))]
    pub fn decompose(
        &self,
        groove: GrooveType,
        thickness_mm: f64,
        wire_diameter_mm: Option<f64>,
        groove_angle_deg: Option<f64>,
        process: WeldProcess,
    ) -> PassPlan {
        let t = clamp_thickness(thickness_mm);
        let d = process.diameter_or_default(wire_diameter_mm);

        // 1-3. 总道数
        let breakdown = total_pass_count(groove, t, d, groove_angle_deg);
        let total = breakdown.total;

        // 4. 角色划分
        let partition = partition_roles(groove, t, total);

        // 5. 逐道参数
        let base = self.resolver.resolve(process, t, d);
        let travel_base = base_travel_speed_mm_min(process, t);
        let passes = (1..=total)
            .map(|number| build_pass(number, total, partition, &base, travel_base, d, process))
            .collect::<Vec<_>>();

        let plan = PassPlan {
            passes,
            root_pass_count: partition.root,
            cap_pass_count: partition.cap,
        };

        debug!(
            groove = %groove,
            base_count = breakdown.base,
            total,
            root = plan.root_pass_count,
            fill = plan.fill_pass_count(),
            cap = plan.cap_pass_count,
            "焊道分解完成"
        );

        plan
    }
}

/// 角色修正系数 (电流, 电压, 送丝, 焊速)
fn role_factors(role: PassRole, number: u32) -> (f64, f64, f64, f64) {
    match role {
        PassRole::Root => (0.7 + 0.1 * (number - 1) as f64, 0.9, 0.8, 0.55),
        PassRole::Fill => (1.0, 1.0, 1.0, 1.0),
        PassRole::Cap => (0.85, 1.1, 0.9, 0.75),
    }
}

fn build_pass(
    number: u32,
    total: u32,
    partition: RolePartition,
    base: &ResolvedParameters,
    travel_base: f64,
    wire_diameter_mm: f64,
    process: WeldProcess,
) -> Pass {
    let role = role_for(number, total, partition);
    let (current_factor, voltage_factor, feed_factor, travel_factor) = role_factors(role, number);

    let current_a = (base.current_a * current_factor).max(MIN_CURRENT_A);
    let voltage_v = (base.voltage_v * voltage_factor).max(MIN_VOLTAGE_V);
    let wire_feed_speed_m_min = if process.has_wire_feed() {
        Some(wire_feed_speed_m_min(current_a, wire_diameter_mm) * feed_factor)
    } else {
        None
    };
    let travel_speed_mm_min = travel_base * travel_factor;

    Pass {
        number,
        role,
        current_a,
        voltage_v,
        wire_feed_speed_m_min,
        travel_speed_mm_min,
        heat_input_kj_mm: heat_input_kj_mm(process, voltage_v, current_a, travel_speed_mm_min),
    }
}

/// 热输入 (kJ/mm) = η × U × I × 60 / (1000 × v)
fn heat_input_kj_mm(process: WeldProcess, voltage_v: f64, current_a: f64, travel_mm_min: f64) -> f64 {
    if travel_mm_min <= 0.0 {
        return 0.0;
    }
    process.arc_efficiency() * voltage_v * current_a * 60.0 / (1000.0 * travel_mm_min)
}
