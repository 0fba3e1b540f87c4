// ==========================================
// 总道数计算
// ==========================================
// 步骤: 坡口基础道数(含族下限) → 焊丝直径修正 → 坡口角度修正
// ==========================================

use crate::domain::types::GrooveType;
use serde::{Deserialize, Serialize};

/// 角度系数的基准角度
const REFERENCE_ANGLE_DEG: f64 = 60.0;

/// 坡口角度钳位范围
const MIN_ANGLE_DEG: f64 = 20.0;
const MAX_ANGLE_DEG: f64 = 120.0;

/// 角焊缝焊脚上限 (mm)
const MAX_FILLET_LEG_MM: f64 = 12.0;

/// 总道数计算明细（便于解释与审计）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassCountBreakdown {
    pub angle_deg: f64,
    pub angle_factor: f64,
    /// 坡口公式 + 族下限
    pub base: u32,
    /// 焊丝直径修正后
    pub after_wire: u32,
    /// 角度修正后（最终总道数）
    pub total: u32,
}

fn ceil_count(x: f64) -> u32 {
    if x.is_finite() && x > 0.0 {
        x.ceil() as u32
    } else {
        0
    }
}

/// 实际使用的坡口角度：录入值优先，否则取名义角度，再钳位
pub fn effective_angle(groove: GrooveType, groove_angle_deg: Option<f64>) -> f64 {
    groove_angle_deg
        .filter(|a| a.is_finite() && *a > 0.0)
        .or(groove.spec().nominal_angle_deg)
        .unwrap_or(REFERENCE_ANGLE_DEG)
        .clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG)
}

/// 各坡口族的最少道数
pub fn family_floor(groove: GrooveType) -> u32 {
    match groove {
        GrooveType::I => 1,
        GrooveType::IHeavy => 2,
        GrooveType::V => 2,
        GrooveType::Y => 2,
        GrooveType::Bevel => 1,
        GrooveType::U => 2,
        GrooveType::J => 2,
        GrooveType::X => 4,
        GrooveType::DoubleV => 4,
        GrooveType::K => 5,
        GrooveType::DoubleU => 4,
        GrooveType::Fillet => 1,
    }
}

/// 坡口公式（未加族下限）
fn formula_count(groove: GrooveType, t: f64, af: f64) -> u32 {
    match groove {
        GrooveType::I => {
            if t <= 3.0 {
                1
            } else {
                2
            }
        }
        GrooveType::IHeavy => {
            if t <= 18.0 {
                ceil_count(t / 6.0) + 1
            } else {
                ceil_count(t / 5.0) + 1
            }
        }
        GrooveType::V => ceil_count(t * af / 4.0),
        GrooveType::Y => ceil_count((t - 2.0).max(1.0) * af / 4.0),
        GrooveType::Bevel => ceil_count(t * af / 6.0),
        GrooveType::U => ceil_count(t / 6.0) + 1,
        GrooveType::J => ceil_count(t / 7.0) + 1,
        GrooveType::X => 2 * ceil_count((t / 2.0) * af / 4.0),
        GrooveType::DoubleV => {
            ceil_count((2.0 * t / 3.0) * af / 4.0) + ceil_count((t / 3.0) * af / 4.0)
        }
        GrooveType::K => 2 * ceil_count((t / 2.0) * af / 4.0),
        GrooveType::DoubleU => 2 * (ceil_count((t / 2.0) / 6.0) + 1),
        GrooveType::Fillet => {
            let leg = (0.7 * t).min(MAX_FILLET_LEG_MM);
            ceil_count(leg / 4.0)
        }
    }
}

/// 焊丝直径修正
///
/// - 细丝 (≤1.0mm) 焊 >6mm：+ceil(t/10)
/// - 否则 ≤1.2mm 焊 >10mm：+1
/// - 粗丝 (≥2.0mm) 焊 >8mm：-1（不少于 1）
fn wire_correction(count: u32, t: f64, d: f64) -> u32 {
    if d <= 1.0 && t > 6.0 {
        count.saturating_add(ceil_count(t / 10.0))
    } else if d <= 1.2 && t > 10.0 {
        count.saturating_add(1)
    } else if d >= 2.0 && t > 8.0 {
        count.saturating_sub(1).max(1)
    } else {
        count
    }
}

/// 坡口角度修正（仅 V/K/Y/DOUBLE_V/BEVEL）
fn angle_correction(groove: GrooveType, count: u32, angle: f64) -> u32 {
    if !groove.is_angled() {
        return count;
    }
    if angle > 80.0 {
        count.saturating_add(1)
    } else if angle < 40.0 {
        count.saturating_sub(1).max(1)
    } else {
        count
    }
}

/// 计算总道数（板厚应已钳位到 [0.5, 200]mm）
pub fn total_pass_count(
    groove: GrooveType,
    thickness_mm: f64,
    wire_diameter_mm: f64,
    groove_angle_deg: Option<f64>,
) -> PassCountBreakdown {
    let angle = effective_angle(groove, groove_angle_deg);
    let af = angle / REFERENCE_ANGLE_DEG;

    let base = formula_count(groove, thickness_mm, af).max(family_floor(groove));
    let after_wire = wire_correction(base, thickness_mm, wire_diameter_mm);
    let total = angle_correction(groove, after_wire, angle).max(1);

    PassCountBreakdown {
        angle_deg: angle,
        angle_factor: af,
        base,
        after_wire,
        total,
    }
}
