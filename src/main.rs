// ==========================================
// WPS 参数推荐系统 - 命令行入口
// ==========================================
// 用法: wps-advisor <draft.json> [db_path]
// 输出: 重算结果（JSON）到 stdout
// ==========================================

use anyhow::{Context, Result};
use std::path::PathBuf;
use wps_advisor::config::{ConfigManager, EngineConfigReader};
use wps_advisor::{logging, Draft, DraftSession, RecomputeController};

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let draft_path = args
        .next()
        .context("用法: wps-advisor <draft.json> [db_path]")?;
    let db_path = args.next().unwrap_or_else(default_db_path);

    tracing::info!("{} v{}", wps_advisor::APP_NAME, wps_advisor::VERSION);
    tracing::info!("使用配置库: {}", db_path);

    let raw = std::fs::read_to_string(&draft_path)
        .with_context(|| format!("读取草稿失败: {}", draft_path))?;
    let draft: Draft =
        serde_json::from_str(&raw).with_context(|| format!("草稿 JSON 解析失败: {}", draft_path))?;

    let config = ConfigManager::new(&db_path).with_context(|| format!("打开配置库失败: {}", db_path))?;
    let settings = config.engine_settings()?;
    let table = config.load_parameter_table()?;

    let session = DraftSession::new(RecomputeController::with_table(table, settings), draft);
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);

    Ok(())
}

/// 默认配置库路径
///
/// 优先级: 环境变量 WPS_ADVISOR_DB_PATH > 用户数据目录 > 当前目录
fn default_db_path() -> String {
    if let Ok(path) = std::env::var("WPS_ADVISOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./wps_advisor.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("wps-advisor");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join("wps_advisor.db"),
            Err(e) => tracing::warn!("无法创建数据目录 {}: {}，回退到当前目录", dir.display(), e),
        }
    }
    path.to_string_lossy().to_string()
}
