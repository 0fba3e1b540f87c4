// ==========================================
// WPS 参数推荐系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、不变量校验
// 红线: 不含推荐/分道计算逻辑，不含持久化逻辑
// ==========================================

pub mod draft;
pub mod joint;
pub mod parameters;
pub mod pass_plan;
pub mod process;
pub mod recommendation;
pub mod types;
pub mod validation;

// 重导出核心类型
pub use draft::Draft;
pub use joint::{compatible_grooves, GrooveSpec, WeldJointSpec};
pub use parameters::ParameterSet;
pub use pass_plan::{Pass, PassPlan};
pub use process::ProcessSpec;
pub use recommendation::{Recommendation, RuleId, SuggestedValue, TargetField, ValueRange};
pub use types::{
    Confidence, GrooveType, JointType, MaterialFamily, PassRole, ShieldingGas, WeldPosition,
    WeldProcess,
};
pub use validation::{validate_draft, DraftIssue};
