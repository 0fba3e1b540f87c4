// ==========================================
// WPS 参数推荐系统 - 配置层
// ==========================================
// 职责: 引擎开关与参数表来源的持久化配置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_settings;
pub mod error;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use engine_settings::{EngineConfigReader, EngineSettings};
pub use error::{ConfigError, ConfigResult};
