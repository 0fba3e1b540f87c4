// ==========================================
// WPS 参数推荐系统 - 推荐项
// ==========================================
// 职责: 推荐目标字段、推荐值、范围、置信度、理由
// 红线: 每条推荐必须输出 rationale（可解释）
// ==========================================

use crate::domain::types::{Confidence, GrooveType, ShieldingGas, WeldPosition, WeldProcess};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 推荐目标字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    Process,
    Position,
    WireDiameter,
    GrooveType,
    ShieldingGas,
    Current,
    Voltage,
    GasFlow,
    WireFeedSpeed,
    TravelSpeed,
    PreheatTemp,
}

impl TargetField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetField::Process => "process",
            TargetField::Position => "position",
            TargetField::WireDiameter => "wire_diameter",
            TargetField::GrooveType => "groove_type",
            TargetField::ShieldingGas => "shielding_gas",
            TargetField::Current => "current",
            TargetField::Voltage => "voltage",
            TargetField::GasFlow => "gas_flow",
            TargetField::WireFeedSpeed => "wire_feed_speed",
            TargetField::TravelSpeed => "travel_speed",
            TargetField::PreheatTemp => "preheat_temp",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 规则编号（与规则目录顺序一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    ProcessFromMaterial,
    PositionFromJoint,
    DiameterFromThickness,
    GrooveFromThickness,
    GasFromMaterial,
    ParameterFromTable,
}

/// 推荐值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SuggestedValue {
    Number(f64),
    Process(WeldProcess),
    Position(WeldPosition),
    Groove(GrooveType),
    Gas(ShieldingGas),
}

impl SuggestedValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SuggestedValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for SuggestedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestedValue::Number(v) => write!(f, "{:.1}", v),
            SuggestedValue::Process(p) => write!(f, "{}", p),
            SuggestedValue::Position(p) => write!(f, "{}", p),
            SuggestedValue::Groove(g) => write!(f, "{}", g),
            SuggestedValue::Gas(g) => write!(f, "{}", g),
        }
    }
}

/// 数值范围 [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// 退化区间 [v, v]
    pub fn point(value: f64) -> Self {
        Self { min: value, max: value }
    }

    /// 按相对容差展开 value×(1±pct)
    pub fn relative(value: f64, pct: f64) -> Self {
        Self::new(value * (1.0 - pct), value * (1.0 + pct))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// 推荐项（由单个草稿快照导出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub target: TargetField,
    pub value: SuggestedValue,
    /// 数值字段的合理区间；焊接方法/位置/坡口/保护气等枚举字段为 None，不输出退化区间
    pub range: Option<ValueRange>,
    pub confidence: Confidence,
    pub rationale: String,
    pub rule: RuleId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_normalizes_order() {
        let r = ValueRange::new(10.0, 5.0);
        assert_eq!(r.min, 5.0);
        assert_eq!(r.max, 10.0);
        assert!(r.contains(7.5));
        assert!(!r.contains(10.5));
    }

    #[test]
    fn test_relative_range() {
        let r = ValueRange::relative(100.0, 0.2);
        assert!((r.min - 80.0).abs() < 1e-9);
        assert!((r.max - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggested_value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&SuggestedValue::Process(WeldProcess::Gtaw)).unwrap();
        assert_eq!(json, r#"{"kind":"process","value":"GTAW"}"#);
    }
}
