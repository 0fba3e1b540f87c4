// ==========================================
// WPS 参数推荐系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::importer::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置快照序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("锁获取失败: {0}")]
    LockPoisoned(String),

    #[error("GMAW 参数表导入失败: {0}")]
    ParameterTable(#[from] ImportError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
