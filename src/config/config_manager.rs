// ==========================================
// WPS 参数推荐系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入、快照导出/恢复
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_settings::EngineConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::{configure_sqlite_connection, ensure_config_schema, open_sqlite_connection};
use crate::engine::parameter_table::ParameterTable;
use crate::importer::ParameterTableImporter;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

const GLOBAL_SCOPE: &str = "global";

/// 快照中的元信息键前缀，恢复时跳过
const META_KEY_PREFIX: &str = "__meta_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = lock(&conn)?;
            configure_sqlite_connection(&guard)?;
            ensure_config_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        lock(&self.conn)
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn get_bool(&self, key: &str, default: bool) -> ConfigResult<bool> {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match parse_bool(&raw) {
            Some(v) => Ok(v),
            None => {
                warn!(config_key = key, raw_value = %raw, "布尔配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 获取所有 global 配置的快照（JSON 格式，键有序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名 global 配置，`__meta_` 前缀的键不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            if key.starts_with(META_KEY_PREFIX) {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }

        tx.commit()?;
        info!(restored = count, "配置快照已恢复");
        Ok(count)
    }

    /// 加载 GMAW 参数表
    ///
    /// 配置了 gmaw_table_csv 时从文件导入，否则返回内置表
    pub fn load_parameter_table(&self) -> ConfigResult<ParameterTable> {
        match self.gmaw_table_csv()? {
            Some(path) => {
                let table = ParameterTableImporter::new().import_csv(&path)?;
                info!(path = %path, rows = table.len(), "已加载外部 GMAW 参数表");
                Ok(table)
            }
            None => Ok(ParameterTable::builtin()),
        }
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> ConfigResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| ConfigError::LockPoisoned(e.to_string()))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
impl EngineConfigReader for ConfigManager {
    fn recommendations_enabled(&self) -> ConfigResult<bool> {
        self.get_bool(config_keys::RECOMMENDATIONS_ENABLED, true)
    }

    fn auto_apply(&self) -> ConfigResult<bool> {
        self.get_bool(config_keys::AUTO_APPLY, false)
    }

    fn gmaw_table_csv(&self) -> ConfigResult<Option<String>> {
        let value = self.get_config_or_default(config_keys::GMAW_TABLE_CSV, "")?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 推荐开关
    pub const RECOMMENDATIONS_ENABLED: &str = "recommendations_enabled";
    // 自动采纳（仅空字段）
    pub const AUTO_APPLY: &str = "auto_apply";
    // 外部 GMAW 参数表 CSV 路径
    pub const GMAW_TABLE_CSV: &str = "gmaw_table_csv";
}
