// ==========================================
// WPS 参数推荐系统 - 重算控制器
// ==========================================
// 职责: 草稿 → 推荐 + 焊道计划 + 焊材估算 + 校验问题
// 流程:
//   1. recommend(草稿)             (推荐关闭时为空)
//   2. decompose(草稿)
//   3. auto_apply 时: 仅空字段采纳一次 → 再执行一次 1+2（收敛）
// ==========================================
// 红线: 纯函数，输入草稿不被修改；同一输入得到同一结果
// 红线: 自动采纳最多一轮，不覆盖已填写字段，不循环
// ==========================================

use crate::config::EngineSettings;
use crate::domain::draft::Draft;
use crate::domain::joint::WeldJointSpec;
use crate::domain::parameters::ParameterSet;
use crate::domain::pass_plan::PassPlan;
use crate::domain::process::ProcessSpec;
use crate::domain::recommendation::{Recommendation, TargetField};
use crate::domain::validation::{validate_draft, DraftIssue};
use crate::engine::apply_policy::apply_empty_only;
use crate::engine::consumables::{estimate, ConsumableEstimate};
use crate::engine::parameter_table::{ParameterTable, ParameterTableResolver};
use crate::engine::pass_decomposition::PassDecompositionEngine;
use crate::engine::recommendation::RecommendationEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// 单次重算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputeResult {
    pub joint: WeldJointSpec,
    pub process: ProcessSpec,
    pub parameters: ParameterSet,
    pub pass_plan: PassPlan,
    pub recommendations: Vec<Recommendation>,
    /// 自动采纳写入的字段（未开启自动采纳时为空）
    pub auto_applied: Vec<TargetField>,
    /// 是否执行了采纳后的收敛重算
    pub settled: bool,
    pub consumables: Option<ConsumableEstimate>,
    pub issues: Vec<DraftIssue>,
}

impl RecomputeResult {
    /// 转回草稿（派生字段一并带回）
    pub fn to_draft(&self) -> Draft {
        Draft {
            joint: self.joint.clone(),
            process: self.process.clone(),
            parameters: self.parameters.clone(),
            recommendations: self.recommendations.clone(),
            pass_plan: self.pass_plan.clone(),
        }
    }
}

// ==========================================
// RecomputeController - 重算控制器
// ==========================================
#[derive(Debug, Clone)]
pub struct RecomputeController {
    recommender: RecommendationEngine,
    decomposer: PassDecompositionEngine,
    settings: EngineSettings,
}

impl RecomputeController {
    /// 两个引擎共享同一个参数表解析器
    pub fn new(resolver: Arc<ParameterTableResolver>, settings: EngineSettings) -> Self {
        Self {
            recommender: RecommendationEngine::new(resolver.clone()),
            decomposer: PassDecompositionEngine::new(resolver),
            settings,
        }
    }

    pub fn with_table(table: ParameterTable, settings: EngineSettings) -> Self {
        Self::new(Arc::new(ParameterTableResolver::new(table)), settings)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.settings = settings;
    }

    /// 执行一次重算
    #[instrument(skip(self, draft), fields(
        recommendations_enabled = self.settings.recommendations_enabled,
        auto_apply = self.settings.auto_apply
    ))]
    pub fn recompute(&self, draft: &Draft) -> RecomputeResult {
        let mut working = draft.authored();
        let (mut recommendations, mut pass_plan) = self.derive(&working);

        let mut auto_applied = Vec::new();
        let mut settled = false;

        if self.settings.recommendations_enabled && self.settings.auto_apply && !recommendations.is_empty() {
            match apply_empty_only(&mut working, &recommendations) {
                Ok(applied) => auto_applied = applied,
                Err(e) => warn!(error = %e, "自动采纳失败，保留原草稿"),
            }

            if !auto_applied.is_empty() {
                let (settled_recs, settled_plan) = self.derive(&working);
                recommendations = settled_recs;
                pass_plan = settled_plan;
                settled = true;
            }
        }

        let consumables = estimate(&working, &pass_plan);
        let issues = validate_draft(&working);

        debug!(
            recommendations = recommendations.len(),
            passes = pass_plan.total(),
            auto_applied = auto_applied.len(),
            issues = issues.len(),
            "重算完成"
        );

        RecomputeResult {
            joint: working.joint,
            process: working.process,
            parameters: working.parameters,
            pass_plan,
            recommendations,
            auto_applied,
            settled,
            consumables,
            issues,
        }
    }

    fn derive(&self, draft: &Draft) -> (Vec<Recommendation>, PassPlan) {
        let recommendations = if self.settings.recommendations_enabled {
            self.recommender.recommend(draft)
        } else {
            Vec::new()
        };
        (recommendations, self.decomposer.decompose_draft(draft))
    }
}

impl Default for RecomputeController {
    fn default() -> Self {
        Self::new(Arc::new(ParameterTableResolver::default()), EngineSettings::default())
    }
}
