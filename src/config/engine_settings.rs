// ==========================================
// WPS 参数推荐系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义重算控制器所需的配置读取接口
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use serde::{Deserialize, Serialize};

/// 引擎开关（调用方可直接构造，或由 ConfigManager 读取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// 是否生成推荐
    pub recommendations_enabled: bool,
    /// 是否自动采纳推荐（仅空字段）
    pub auto_apply: bool,
    /// 外部 GMAW 参数表 CSV 路径，None 时使用内置表
    pub gmaw_table_csv: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            recommendations_enabled: true,
            auto_apply: false,
            gmaw_table_csv: None,
        }
    }
}

impl EngineSettings {
    pub fn with_auto_apply(mut self, auto_apply: bool) -> Self {
        self.auto_apply = auto_apply;
        self
    }

    pub fn with_recommendations(mut self, enabled: bool) -> Self {
        self.recommendations_enabled = enabled;
        self
    }
}

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv 表）、EngineSettings（内存）
pub trait EngineConfigReader {
    /// 是否生成推荐
    ///
    /// # 默认值
    /// - true
    fn recommendations_enabled(&self) -> ConfigResult<bool>;

    /// 是否自动采纳
    ///
    /// # 默认值
    /// - false
    fn auto_apply(&self) -> ConfigResult<bool>;

    /// 外部 GMAW 参数表路径
    fn gmaw_table_csv(&self) -> ConfigResult<Option<String>>;

    /// 一次读取全部开关
    fn engine_settings(&self) -> ConfigResult<EngineSettings> {
        Ok(EngineSettings {
            recommendations_enabled: self.recommendations_enabled()?,
            auto_apply: self.auto_apply()?,
            gmaw_table_csv: self.gmaw_table_csv()?,
        })
    }
}

impl EngineConfigReader for EngineSettings {
    fn recommendations_enabled(&self) -> ConfigResult<bool> {
        Ok(self.recommendations_enabled)
    }

    fn auto_apply(&self) -> ConfigResult<bool> {
        Ok(self.auto_apply)
    }

    fn gmaw_table_csv(&self) -> ConfigResult<Option<String>> {
        Ok(self.gmaw_table_csv.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert!(settings.recommendations_enabled);
        assert!(!settings.auto_apply);
        assert_eq!(settings.engine_settings().unwrap(), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: EngineSettings = serde_json::from_str(r#"{"auto_apply":true}"#).unwrap();
        assert!(settings.recommendations_enabled);
        assert!(settings.auto_apply);
        assert_eq!(settings.gmaw_table_csv, None);
    }
}
