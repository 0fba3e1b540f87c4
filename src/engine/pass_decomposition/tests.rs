use super::*;
use crate::domain::draft::Draft;
use crate::domain::pass_plan::PassPlan;
use crate::domain::types::{GrooveType, PassRole, WeldProcess};
use crate::engine::parameter_table::{clamp_thickness, ParameterTableResolver, MAX_THICKNESS_MM};
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

fn engine() -> PassDecompositionEngine {
    PassDecompositionEngine::new(Arc::new(ParameterTableResolver::default()))
}

fn gmaw(groove: GrooveType, t: f64, d: f64, angle: Option<f64>) -> PassPlan {
    engine().decompose(groove, t, Some(d), angle, WeldProcess::Gmaw)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ==========================================
// 第一部分：典型算例
// ==========================================

#[test]
fn test_v_groove_10mm_60deg() {
    let plan = gmaw(GrooveType::V, 10.0, 1.2, Some(60.0));

    assert_eq!(plan.total(), 3);
    assert_eq!(plan.root_pass_count, 1);
    assert_eq!(plan.cap_pass_count, 2);
    assert_eq!(plan.roles(), vec![PassRole::Root, PassRole::Cap, PassRole::Cap]);

    // 基准: 8~10mm / 1.2mm 行 → 230A / 27V
    let root = &plan.passes[0];
    assert!(approx(root.current_a, 161.0));
    assert!(approx(root.voltage_v, 24.3));
    assert!(approx(root.travel_speed_mm_min, 165.0));

    let cap = &plan.passes[2];
    assert!(approx(cap.current_a, 195.5));
    assert!(approx(cap.voltage_v, 29.7));
    assert!(approx(cap.travel_speed_mm_min, 225.0));
}

#[test]
fn test_v_groove_breakdown() {
    let b = total_pass_count(GrooveType::V, 10.0, 1.2, Some(60.0));
    assert!(approx(b.angle_factor, 1.0));
    assert_eq!(b.base, 3);
    assert_eq!(b.after_wire, 3);
    assert_eq!(b.total, 3);
}

#[test]
fn test_x_groove_20mm_doubled_count_and_double_sided_roles() {
    let plan = gmaw(GrooveType::X, 20.0, 1.6, None);
    // 2 × ceil(10/4) = 6 ≥ 4
    assert_eq!(plan.total(), 6);
    assert!(plan.root_pass_count >= 2);
    assert!(plan.cap_pass_count >= 2);
    assert_eq!(
        plan.roles(),
        vec![
            PassRole::Root,
            PassRole::Root,
            PassRole::Fill,
            PassRole::Cap,
            PassRole::Cap,
            PassRole::Cap
        ]
    );

    // 细丝加一道
    assert_eq!(gmaw(GrooveType::X, 20.0, 1.2, None).total(), 7);
}

#[test]
fn test_x_groove_reproportion_is_deterministic() {
    // 2×ceil(6/4)=4，粗焊条 -1 → 3；双面坡口 2/2 超出 → 1/2
    let first = engine().decompose(GrooveType::X, 12.0, Some(2.5), None, WeldProcess::Smaw);
    let second = engine().decompose(GrooveType::X, 12.0, Some(2.5), None, WeldProcess::Smaw);

    assert_eq!(first.total(), 3);
    assert_eq!(first.root_pass_count, 1);
    assert_eq!(first.cap_pass_count, 2);
    assert_eq!(first, second);
}

// ==========================================
// 第二部分：修正规则
// ==========================================

#[test]
fn test_wire_corrections() {
    // 细丝 ≤1.0 焊 >6mm: +ceil(10/10)
    assert_eq!(gmaw(GrooveType::V, 10.0, 1.0, Some(60.0)).total(), 4);
    // ≤1.2 焊 >10mm: +1
    assert_eq!(gmaw(GrooveType::V, 12.0, 1.2, Some(60.0)).total(), 4);
    // 粗焊条 ≥2.0 焊 >8mm: -1
    let plan = engine().decompose(GrooveType::V, 12.0, Some(3.2), Some(60.0), WeldProcess::Smaw);
    assert_eq!(plan.total(), 2);
}

#[test]
fn test_angle_corrections_only_for_angled_families() {
    // af=1.5 → ceil(15/4)=4，>80° 再 +1
    assert_eq!(gmaw(GrooveType::V, 10.0, 1.2, Some(90.0)).total(), 5);
    // af=0.5 → ceil(1.25)=2，下限 2，<40° 再 -1
    assert_eq!(gmaw(GrooveType::V, 10.0, 1.2, Some(30.0)).total(), 1);
    // X 不属于角度修正族: 2×ceil(3.75)=8
    assert_eq!(gmaw(GrooveType::X, 20.0, 1.6, Some(90.0)).total(), 8);
}

#[test]
fn test_family_floors() {
    // K: 2×ceil(6×0.75/4)=4，下限 5
    assert_eq!(gmaw(GrooveType::K, 12.0, 1.6, None).total(), 5);
    // V 薄板: ceil(4/4)=1，下限 2
    assert_eq!(gmaw(GrooveType::V, 4.0, 1.2, Some(60.0)).total(), 2);
    assert_eq!(family_floor(GrooveType::DoubleU), 4);
    assert_eq!(family_floor(GrooveType::Fillet), 1);
}

#[test]
fn test_fillet_leg_length() {
    // 焊脚 7mm → 2 道；角色 1/2 超出 → 1/1
    let plan = gmaw(GrooveType::Fillet, 10.0, 1.2, None);
    assert_eq!(plan.roles(), vec![PassRole::Root, PassRole::Cap]);

    // 焊脚封顶 12mm → 3 道
    let b = total_pass_count(GrooveType::Fillet, 40.0, 1.6, None);
    assert_eq!(b.base, 3);
}

#[test]
fn test_single_pass_square_groove() {
    let plan = gmaw(GrooveType::I, 2.0, 0.8, None);
    assert_eq!(plan.total(), 1);
    assert_eq!(plan.root_pass_count, 1);
    assert_eq!(plan.cap_pass_count, 0);
    assert_eq!(plan.roles(), vec![PassRole::Root]);
}

#[test]
fn test_u_groove_root_factors_and_cap_reduction() {
    let plan = gmaw(GrooveType::U, 30.0, 1.6, None);
    // ceil(30/6)+1 = 6；3/3 档，U 族盖面 -1 → 3/2
    assert_eq!(plan.total(), 6);
    assert_eq!(plan.root_pass_count, 3);
    assert_eq!(plan.cap_pass_count, 2);

    // 基准 22~30mm / 1.6mm 行 → 360A
    assert!(approx(plan.passes[0].current_a, 252.0));
    assert!(approx(plan.passes[1].current_a, 288.0));
    assert!(approx(plan.passes[2].current_a, 324.0));
    assert!(approx(plan.passes[3].current_a, 360.0));
    assert!(approx(plan.passes[5].current_a, 306.0));
}

// ==========================================
// 第三部分：角色重新分配
// ==========================================

#[test]
fn test_reproportion_rules() {
    let wide = RolePartition { root: 3, cap: 4 };
    assert_eq!(reproportion(wide, 1), RolePartition { root: 1, cap: 0 });
    assert_eq!(reproportion(wide, 2), RolePartition { root: 1, cap: 1 });
    assert_eq!(reproportion(wide, 4), RolePartition { root: 1, cap: 2 });
    // 缩放到 total-1=4: floor(3×4/7)=1, floor(4×4/7)=2
    assert_eq!(reproportion(wide, 5), RolePartition { root: 1, cap: 2 });
    // 不超出时保持原值
    assert_eq!(reproportion(wide, 7), wide);
}

#[test]
fn test_role_assignment() {
    let p = RolePartition { root: 2, cap: 2 };
    let roles: Vec<PassRole> = (1..=5).map(|i| role_for(i, 5, p)).collect();
    assert_eq!(
        roles,
        vec![PassRole::Root, PassRole::Root, PassRole::Fill, PassRole::Cap, PassRole::Cap]
    );
}

#[test]
fn test_role_band_breakpoints() {
    assert_eq!(role_band(3.0), RolePartition { root: 1, cap: 1 });
    assert_eq!(role_band(10.0), RolePartition { root: 1, cap: 2 });
    assert_eq!(role_band(15.0), RolePartition { root: 2, cap: 2 });
    assert_eq!(role_band(25.0), RolePartition { root: 2, cap: 3 });
    assert_eq!(role_band(40.0), RolePartition { root: 3, cap: 3 });
    assert_eq!(role_band(41.0), RolePartition { root: 3, cap: 4 });
}

// ==========================================
// 第四部分：不变量与边界
// ==========================================

#[test]
fn test_totality_and_role_invariant_across_inputs() {
    let thicknesses = [
        0.5, 1.0, 2.0, 3.0, 5.0, 6.0, 8.0, 10.0, 12.0, 15.0, 18.0, 20.0, 25.0, 30.0, 40.0, 60.0, 100.0, 200.0, 1.0e6,
        1.0e11,
    ];
    let diameters = [0.8, 1.0, 1.2, 1.6, 2.4, 4.0];
    let angles = [None, Some(30.0), Some(60.0), Some(90.0)];

    for groove in GrooveType::ALL {
        for &t in &thicknesses {
            for &d in &diameters {
                for &angle in &angles {
                    let b = total_pass_count(groove, clamp_thickness(t), d, angle);
                    let plan = gmaw(groove, t, d, angle);
                    assert!(plan.total() >= 1, "{} {}mm 空计划", groove, t);
                    assert_eq!(plan.total(), b.total);
                    assert!(plan.root_pass_count + plan.cap_pass_count <= plan.total());
                    assert_eq!(
                        plan.root_pass_count + plan.fill_pass_count() + plan.cap_pass_count,
                        plan.total()
                    );

                    let roots = plan.passes.iter().filter(|p| p.role == PassRole::Root).count() as u32;
                    let caps = plan.passes.iter().filter(|p| p.role == PassRole::Cap).count() as u32;
                    assert_eq!(roots, plan.root_pass_count);
                    assert_eq!(caps, plan.cap_pass_count);

                    for (i, pass) in plan.passes.iter().enumerate() {
                        assert_eq!(pass.number, i as u32 + 1);
                        assert!(pass.current_a >= 50.0);
                        assert!(pass.voltage_v >= 10.0);
                    }
                }
            }
        }
    }
}

#[test]
fn test_non_positive_thickness_is_clamped() {
    let plan = gmaw(GrooveType::V, -5.0, 1.2, None);
    assert_eq!(plan.total(), 2);
}

#[test]
fn test_huge_thickness_is_clamped_to_ceiling() {
    let ceiling = gmaw(GrooveType::V, MAX_THICKNESS_MM, 0.8, Some(90.0));
    for t in [4.0e6, 1.0e11, f64::INFINITY] {
        assert_eq!(gmaw(GrooveType::V, t, 0.8, Some(90.0)), ceiling);
    }
    // 200mm: ceil(200×1.5/4)=75，细丝 +20，大角度 +1
    assert_eq!(ceiling.total(), 96);
}

#[test]
fn test_pass_count_corrections_saturate() {
    let b = total_pass_count(GrooveType::V, 1.0e11, 0.8, Some(90.0));
    assert_eq!(b.base, u32::MAX);
    assert_eq!(b.total, u32::MAX);
}

#[test]
fn test_gtaw_minimum_current_and_no_wire_feed() {
    // 2mm / 1.6mm 钨极: 基准 70A，打底 ×0.7 = 49A → 钳位 50A
    let plan = engine().decompose(GrooveType::I, 2.0, Some(1.6), None, WeldProcess::Gtaw);
    assert_eq!(plan.total(), 1);
    assert!(approx(plan.passes[0].current_a, 50.0));
    assert!(plan.passes[0].wire_feed_speed_m_min.is_none());
}

#[test]
fn test_gmaw_wire_feed_follows_role() {
    let plan = gmaw(GrooveType::V, 10.0, 1.2, Some(60.0));
    let area = std::f64::consts::PI * 1.2 * 1.2 / 4.0;
    let root = &plan.passes[0];
    let expected = 0.045 * root.current_a / area * 0.8;
    assert!(approx(root.wire_feed_speed_m_min.unwrap(), expected));
}

#[test]
fn test_heat_input_per_pass() {
    let plan = gmaw(GrooveType::V, 10.0, 1.2, Some(60.0));
    let p = &plan.passes[1];
    let expected = 0.8 * p.voltage_v * p.current_a * 60.0 / (1000.0 * p.travel_speed_mm_min);
    assert!(approx(p.heat_input_kj_mm, expected));
    assert!(plan.max_heat_input().unwrap() >= p.heat_input_kj_mm);
}

#[test]
fn test_missing_inputs_yield_empty_plan() {
    let mut draft = Draft::new();
    draft.joint.thickness_mm = Some(10.0);
    draft.process.process = Some(WeldProcess::Gmaw);
    assert!(engine().decompose_draft(&draft).is_empty());

    draft.joint.groove_type = Some(GrooveType::V);
    assert_eq!(engine().decompose_draft(&draft).total(), 3);
}

#[test]
fn test_effective_angle_defaults_and_clamp() {
    assert!(approx(effective_angle(GrooveType::V, None), 60.0));
    assert!(approx(effective_angle(GrooveType::K, None), 45.0));
    assert!(approx(effective_angle(GrooveType::V, Some(170.0)), 120.0));
    assert!(approx(effective_angle(GrooveType::Fillet, None), 60.0));
}
