// ==========================================
// WPS 参数推荐系统 - 工艺参数集
// ==========================================

use serde::{Deserialize, Serialize};

/// 工艺参数集，每项在录入或计算前为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// 焊接电流 (A)
    pub current_a: Option<f64>,
    /// 电弧电压 (V)
    pub voltage_v: Option<f64>,
    /// 保护气流量 (L/min)
    pub gas_flow_l_min: Option<f64>,
    /// 送丝速度 (m/min)，仅 GMAW
    pub wire_feed_speed_m_min: Option<f64>,
    /// 焊接速度 (mm/min)
    pub travel_speed_mm_min: Option<f64>,
    /// 预热温度 (°C)
    pub preheat_temp_c: Option<f64>,
}

/// 字段为空或为 0 时视为"未填写"
pub fn is_unset(value: Option<f64>) -> bool {
    match value {
        None => true,
        Some(v) => v == 0.0,
    }
}
