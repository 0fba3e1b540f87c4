// ==========================================
// WPS 参数推荐系统 - 草稿
// ==========================================
// 职责: 单次编辑会话独占的可变聚合
// 红线: recommendations / pass_plan 为派生字段，每次重算整体覆盖
// ==========================================

use crate::domain::joint::WeldJointSpec;
use crate::domain::parameters::ParameterSet;
use crate::domain::pass_plan::PassPlan;
use crate::domain::process::ProcessSpec;
use crate::domain::recommendation::Recommendation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub joint: WeldJointSpec,
    #[serde(default)]
    pub process: ProcessSpec,
    /// 当前工艺参数（用户录入或采纳推荐）
    #[serde(default)]
    pub parameters: ParameterSet,

    // ===== 派生字段 =====
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub pass_plan: PassPlan,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只保留用户录入部分（清空派生字段）
    pub fn authored(&self) -> Draft {
        Draft {
            joint: self.joint.clone(),
            process: self.process.clone(),
            parameters: self.parameters.clone(),
            recommendations: Vec::new(),
            pass_plan: PassPlan::empty(),
        }
    }
}
