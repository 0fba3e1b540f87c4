// ==========================================
// WPS 参数推荐系统 - 引擎层
// ==========================================
// 职责: 参数表解析、推荐规则、多道焊分解、采纳策略、重算控制
// 红线: 引擎不做 I/O，返回值而非 Result；所有推荐必须输出 rationale
// ==========================================

pub mod apply_policy;
pub mod consumables;
pub mod parameter_table;
pub mod pass_decomposition;
pub mod recommendation;
pub mod recompute;

// 重导出核心引擎
pub use apply_policy::{apply_all, apply_empty_only, apply_one, ApplyError, ApplyMode};
pub use consumables::{estimate as estimate_consumables, ConsumableEstimate};
pub use parameter_table::{
    GmawTableRow, ParameterTable, ParameterTableResolver, ResolutionBasis, ResolvedParameters,
};
pub use pass_decomposition::{PassCountBreakdown, PassDecompositionEngine, RolePartition};
pub use recommendation::{RecommendationEngine, RULE_CATALOG};
pub use recompute::{RecomputeController, RecomputeResult};
