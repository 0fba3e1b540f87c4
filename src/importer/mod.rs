// ==========================================
// WPS 参数推荐系统 - 导入层
// ==========================================
// 职责: 外部 GMAW 参数表导入与校验
// 支持: CSV
// ==========================================

pub mod error;
pub mod parameter_table_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use parameter_table_importer::ParameterTableImporter;
