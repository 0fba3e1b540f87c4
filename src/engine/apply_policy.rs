// ==========================================
// WPS 参数推荐系统 - 推荐采纳策略
// ==========================================
// 职责: 将推荐写回草稿字段（单条 / 全部 / 仅空字段）
// 输出: 实际写入的目标字段列表
// ==========================================
// 红线: 仅空字段模式不得覆盖已填写字段（None 或 0 视为空）
// 红线: 推荐值类型与目标字段不符时整批拒绝，草稿保持不变
// ==========================================

use crate::domain::draft::Draft;
use crate::domain::parameters::is_unset;
use crate::domain::recommendation::{Recommendation, SuggestedValue, TargetField};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// 采纳模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplyMode {
    /// 覆盖写入
    All,
    /// 仅写入空字段
    EmptyOnly,
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyMode::All => write!(f, "ALL"),
            ApplyMode::EmptyOnly => write!(f, "EMPTY_ONLY"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyError {
    #[error("推荐值类型与目标字段不符 (target: {target}, value: {value})")]
    ValueMismatch {
        target: TargetField,
        value: SuggestedValue,
    },
}

/// 采纳单条推荐（覆盖写入）
pub fn apply_one(draft: &mut Draft, rec: &Recommendation) -> Result<TargetField, ApplyError> {
    check_kind(rec)?;
    write_field(draft, rec.target, rec.value);
    Ok(rec.target)
}

/// 采纳全部推荐（覆盖写入）
pub fn apply_all(draft: &mut Draft, recs: &[Recommendation]) -> Result<Vec<TargetField>, ApplyError> {
    apply(draft, recs, ApplyMode::All)
}

/// 仅采纳目标字段为空的推荐
pub fn apply_empty_only(draft: &mut Draft, recs: &[Recommendation]) -> Result<Vec<TargetField>, ApplyError> {
    apply(draft, recs, ApplyMode::EmptyOnly)
}

/// 按模式批量采纳
pub fn apply(draft: &mut Draft, recs: &[Recommendation], mode: ApplyMode) -> Result<Vec<TargetField>, ApplyError> {
    for rec in recs {
        check_kind(rec)?;
    }

    let mut applied = Vec::new();
    for rec in recs {
        if mode == ApplyMode::EmptyOnly && !is_empty(draft, rec.target) {
            debug!(target_field = %rec.target, "字段已填写，跳过");
            continue;
        }
        write_field(draft, rec.target, rec.value);
        applied.push(rec.target);
    }
    Ok(applied)
}

/// 目标字段当前是否为空
pub fn is_empty(draft: &Draft, target: TargetField) -> bool {
    match target {
        TargetField::Process => draft.process.process.is_none(),
        TargetField::Position => draft.joint.position.is_none(),
        TargetField::WireDiameter => is_unset(draft.process.wire_diameter_mm),
        TargetField::GrooveType => draft.joint.groove_type.is_none(),
        TargetField::ShieldingGas => draft.process.shielding_gas.is_none(),
        TargetField::Current => is_unset(draft.parameters.current_a),
        TargetField::Voltage => is_unset(draft.parameters.voltage_v),
        TargetField::GasFlow => is_unset(draft.parameters.gas_flow_l_min),
        TargetField::WireFeedSpeed => is_unset(draft.parameters.wire_feed_speed_m_min),
        TargetField::TravelSpeed => is_unset(draft.parameters.travel_speed_mm_min),
        TargetField::PreheatTemp => is_unset(draft.parameters.preheat_temp_c),
    }
}

fn check_kind(rec: &Recommendation) -> Result<(), ApplyError> {
    let ok = match rec.target {
        TargetField::Process => matches!(rec.value, SuggestedValue::Process(_)),
        TargetField::Position => matches!(rec.value, SuggestedValue::Position(_)),
        TargetField::GrooveType => matches!(rec.value, SuggestedValue::Groove(_)),
        TargetField::ShieldingGas => matches!(rec.value, SuggestedValue::Gas(_)),
        TargetField::WireDiameter
        | TargetField::Current
        | TargetField::Voltage
        | TargetField::GasFlow
        | TargetField::WireFeedSpeed
        | TargetField::TravelSpeed
        | TargetField::PreheatTemp => matches!(rec.value, SuggestedValue::Number(_)),
    };
    if ok {
        Ok(())
    } else {
        Err(ApplyError::ValueMismatch {
            target: rec.target,
            value: rec.value,
        })
    }
}

// 调用前已通过 check_kind，类型不符的分支不会到达
fn write_field(draft: &mut Draft, target: TargetField, value: SuggestedValue) {
    match (target, value) {
        (TargetField::Process, SuggestedValue::Process(p)) => draft.process.process = Some(p),
        (TargetField::Position, SuggestedValue::Position(p)) => draft.joint.position = Some(p),
        (TargetField::GrooveType, SuggestedValue::Groove(g)) => draft.joint.groove_type = Some(g),
        (TargetField::ShieldingGas, SuggestedValue::Gas(g)) => draft.process.shielding_gas = Some(g),
        (TargetField::WireDiameter, SuggestedValue::Number(v)) => draft.process.wire_diameter_mm = Some(v),
        (TargetField::Current, SuggestedValue::Number(v)) => draft.parameters.current_a = Some(v),
        (TargetField::Voltage, SuggestedValue::Number(v)) => draft.parameters.voltage_v = Some(v),
        (TargetField::GasFlow, SuggestedValue::Number(v)) => draft.parameters.gas_flow_l_min = Some(v),
        (TargetField::WireFeedSpeed, SuggestedValue::Number(v)) => {
            draft.parameters.wire_feed_speed_m_min = Some(v)
        }
        (TargetField::TravelSpeed, SuggestedValue::Number(v)) => draft.parameters.travel_speed_mm_min = Some(v),
        (TargetField::PreheatTemp, SuggestedValue::Number(v)) => draft.parameters.preheat_temp_c = Some(v),
        _ => {}
    }
}
