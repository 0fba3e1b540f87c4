// ==========================================
// WPS 参数推荐系统 - 草稿编辑会话
// ==========================================
// 职责: 独占一份草稿，每次修改后触发且仅触发一次重算
// 红线: 会话以 &mut self 修改草稿，不共享、不加锁
// 红线: 被拒绝的修改不改变草稿、不增加修订号
// ==========================================

use crate::config::EngineSettings;
use crate::domain::draft::Draft;
use crate::domain::parameters::ParameterSet;
use crate::domain::recommendation::{Recommendation, TargetField};
use crate::domain::types::{GrooveType, JointType, MaterialFamily, ShieldingGas, WeldPosition, WeldProcess};
use crate::engine::apply_policy::{self, ApplyError};
use crate::engine::recompute::{RecomputeController, RecomputeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("板厚必须为正数: {0}")]
    NonPositiveThickness(f64),

    #[error("字段 {field} 的值无效: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("当前没有针对 {0} 的推荐")]
    RecommendationNotFound(TargetField),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// 会话快照（对外输出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: RecomputeResult,
}

// ==========================================
// DraftSession - 草稿编辑会话
// ==========================================
pub struct DraftSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
    controller: RecomputeController,
    draft: Draft,
    last: RecomputeResult,
}

impl DraftSession {
    /// 以初始草稿开启会话（立即重算一次）
    pub fn new(controller: RecomputeController, initial: Draft) -> Self {
        let now = Utc::now();
        let last = controller.recompute(&initial);
        let draft = last.to_draft();
        let id = Uuid::new_v4();
        info!(session_id = %id, "草稿会话已创建");
        Self {
            id,
            created_at: now,
            updated_at: now,
            revision: 0,
            controller,
            draft,
            last,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn result(&self) -> &RecomputeResult {
        &self.last
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.last.recommendations
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.to_string(),
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
            result: self.last.clone(),
        }
    }

    /// 切换引擎开关并重算
    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.controller.set_settings(settings);
        self.recompute();
    }

    // ===== 接头 =====

    pub fn set_material_family(&mut self, value: Option<MaterialFamily>) {
        self.edit(|d| d.joint.material_family = value);
    }

    pub fn set_material_grade(&mut self, value: Option<String>) {
        self.edit(|d| d.joint.material_grade = value);
    }

    /// 设置板厚，非正值被拒绝
    pub fn set_thickness(&mut self, value: Option<f64>) -> SessionResult<()> {
        if let Some(t) = value {
            if !t.is_finite() || t <= 0.0 {
                return Err(SessionError::NonPositiveThickness(t));
            }
        }
        self.edit(|d| d.joint.thickness_mm = value);
        Ok(())
    }

    pub fn set_joint_type(&mut self, value: Option<JointType>) {
        self.edit(|d| d.joint.joint_type = value);
    }

    pub fn set_groove_type(&mut self, value: Option<GrooveType>) {
        self.edit(|d| d.joint.groove_type = value);
    }

    pub fn set_groove_angle(&mut self, value: Option<f64>) -> SessionResult<()> {
        check_positive("groove_angle_deg", value)?;
        self.edit(|d| d.joint.groove_angle_deg = value);
        Ok(())
    }

    pub fn set_root_opening(&mut self, value: Option<f64>) -> SessionResult<()> {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(SessionError::InvalidValue {
                    field: "root_opening_mm",
                    value: v,
                });
            }
        }
        self.edit(|d| d.joint.root_opening_mm = value);
        Ok(())
    }

    pub fn set_position(&mut self, value: Option<WeldPosition>) {
        self.edit(|d| d.joint.position = value);
    }

    pub fn set_weld_length(&mut self, value: Option<f64>) -> SessionResult<()> {
        check_positive("weld_length_mm", value)?;
        self.edit(|d| d.joint.weld_length_mm = value);
        Ok(())
    }

    // ===== 焊接方法 =====

    pub fn set_process(&mut self, value: Option<WeldProcess>) {
        self.edit(|d| d.process.process = value);
    }

    pub fn set_wire_diameter(&mut self, value: Option<f64>) -> SessionResult<()> {
        check_positive("wire_diameter_mm", value)?;
        self.edit(|d| d.process.wire_diameter_mm = value);
        Ok(())
    }

    pub fn set_shielding_gas(&mut self, value: Option<ShieldingGas>) {
        self.edit(|d| d.process.shielding_gas = value);
    }

    // ===== 工艺参数 =====

    /// 整体替换工艺参数（0 视为"未填写"）
    pub fn set_parameters(&mut self, value: ParameterSet) {
        self.edit(|d| d.parameters = value);
    }

    pub fn set_current(&mut self, value: Option<f64>) {
        self.edit(|d| d.parameters.current_a = value);
    }

    pub fn set_voltage(&mut self, value: Option<f64>) {
        self.edit(|d| d.parameters.voltage_v = value);
    }

    // ===== 采纳推荐 =====

    /// 采纳当前针对某字段的推荐（覆盖写入）
    pub fn apply_recommendation(&mut self, target: TargetField) -> SessionResult<()> {
        let rec = self
            .last
            .recommendations
            .iter()
            .find(|r| r.target == target)
            .cloned()
            .ok_or(SessionError::RecommendationNotFound(target))?;

        apply_policy::apply_one(&mut self.draft, &rec)?;
        self.recompute();
        Ok(())
    }

    /// 采纳全部当前推荐（覆盖写入）
    pub fn apply_all(&mut self) -> SessionResult<Vec<TargetField>> {
        let recs = self.last.recommendations.clone();
        let applied = apply_policy::apply_all(&mut self.draft, &recs)?;
        self.recompute();
        Ok(applied)
    }

    /// 仅采纳空字段
    pub fn apply_empty_only(&mut self) -> SessionResult<Vec<TargetField>> {
        let recs = self.last.recommendations.clone();
        let applied = apply_policy::apply_empty_only(&mut self.draft, &recs)?;
        self.recompute();
        Ok(applied)
    }

    fn edit<F: FnOnce(&mut Draft)>(&mut self, f: F) {
        f(&mut self.draft);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.last = self.controller.recompute(&self.draft);
        self.draft = self.last.to_draft();
        self.revision += 1;
        self.updated_at = Utc::now();

        info!(
            session_id = %self.id,
            revision = self.revision,
            recommendations = self.last.recommendations.len(),
            passes = self.last.pass_plan.total(),
            auto_applied = self.last.auto_applied.len(),
            issues = self.last.issues.len(),
            "草稿已重算"
        );
    }
}

fn check_positive(field: &'static str, value: Option<f64>) -> SessionResult<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(SessionError::InvalidValue { field, value: v }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(settings: EngineSettings) -> DraftSession {
        let controller = RecomputeController::new(Default::default(), settings);
        DraftSession::new(controller, Draft::new())
    }

    #[test]
    fn test_each_setter_recomputes_once() {
        let mut s = session(EngineSettings::default());
        assert_eq!(s.revision(), 0);
        s.set_material_family(Some(MaterialFamily::CarbonSteel));
        assert_eq!(s.revision(), 1);
        s.set_thickness(Some(10.0)).unwrap();
        assert_eq!(s.revision(), 2);
        assert!(s
            .recommendations()
            .iter()
            .any(|r| r.target == TargetField::Process));
    }

    #[test]
    fn test_non_positive_thickness_rejected_without_recompute() {
        let mut s = session(EngineSettings::default());
        let err = s.set_thickness(Some(0.0)).unwrap_err();
        assert_eq!(err, SessionError::NonPositiveThickness(0.0));
        assert_eq!(s.revision(), 0);
        assert_eq!(s.draft().joint.thickness_mm, None);
    }

    #[test]
    fn test_apply_recommendation_writes_field() {
        let mut s = session(EngineSettings::default());
        s.set_material_family(Some(MaterialFamily::StainlessSteel));
        s.apply_recommendation(TargetField::Process).unwrap();
        assert_eq!(s.draft().process.process, Some(WeldProcess::Gtaw));

        let err = s.apply_recommendation(TargetField::Current).unwrap_err();
        assert_eq!(err, SessionError::RecommendationNotFound(TargetField::Current));
    }

    #[test]
    fn test_apply_empty_only_then_pass_plan_appears() {
        let mut s = session(EngineSettings::default());
        s.set_material_family(Some(MaterialFamily::CarbonSteel));
        s.set_joint_type(Some(JointType::Butt));
        s.set_thickness(Some(10.0)).unwrap();
        assert!(s.result().pass_plan.is_empty());

        let applied = s.apply_empty_only().unwrap();
        assert!(applied.contains(&TargetField::Process));
        assert!(applied.contains(&TargetField::GrooveType));
        assert_eq!(s.draft().joint.groove_type, Some(GrooveType::V));
        assert_eq!(s.result().pass_plan.total(), 3);
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = session(EngineSettings::default());
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        assert!(json.contains(&s.id().to_string()));
    }
}
