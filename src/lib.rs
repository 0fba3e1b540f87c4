// ==========================================
// WPS 参数推荐系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统（推荐只供参考，人工最终确认）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 推荐规则与焊道分解
pub mod engine;

// 导入层 - 外部参数表
pub mod importer;

// 配置层 - 引擎开关
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 会话层 - 草稿编辑
pub mod session;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    Confidence, GrooveType, JointType, MaterialFamily, PassRole, ShieldingGas, WeldPosition,
    WeldProcess,
};

// 领域实体
pub use domain::{
    Draft, DraftIssue, ParameterSet, Pass, PassPlan, ProcessSpec, Recommendation, TargetField,
    WeldJointSpec,
};

// 引擎
pub use engine::{
    PassDecompositionEngine, RecommendationEngine, RecomputeController, RecomputeResult,
};

// 配置
pub use config::{ConfigManager, EngineConfigReader, EngineSettings};

// 会话
pub use session::{DraftSession, SessionError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "WPS 参数推荐系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
