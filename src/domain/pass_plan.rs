// ==========================================
// WPS 参数推荐系统 - 焊道计划
// ==========================================

use crate::domain::types::PassRole;
use serde::{Deserialize, Serialize};

/// 单道焊参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    /// 道次序号（从 1 开始）
    pub number: u32,
    pub role: PassRole,
    pub current_a: f64,
    pub voltage_v: f64,
    /// 仅 GMAW
    pub wire_feed_speed_m_min: Option<f64>,
    pub travel_speed_mm_min: f64,
    /// 热输入 (kJ/mm)
    pub heat_input_kj_mm: f64,
}

/// 焊道计划（有序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassPlan {
    pub passes: Vec<Pass>,
    pub root_pass_count: u32,
    pub cap_pass_count: u32,
}

impl PassPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.passes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn fill_pass_count(&self) -> u32 {
        self.total()
            .saturating_sub(self.root_pass_count + self.cap_pass_count)
    }

    pub fn roles(&self) -> Vec<PassRole> {
        self.passes.iter().map(|p| p.role).collect()
    }

    /// 最大单道热输入
    pub fn max_heat_input(&self) -> Option<f64> {
        self.passes
            .iter()
            .map(|p| p.heat_input_kj_mm)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}
