// ==========================================
// WPS 参数推荐系统 - GMAW 参数表导入
// ==========================================
// 格式: CSV，表头
//   min_thickness_mm,max_thickness_mm,wire_diameter_mm,
//   min_voltage_v,max_voltage_v,min_current_a,max_current_a
// 红线: 行顺序即匹配优先顺序，导入时不得重排
// ==========================================

use crate::engine::parameter_table::{GmawTableRow, ParameterTable};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default)]
pub struct ParameterTableImporter;

impl ParameterTableImporter {
    pub fn new() -> Self {
        Self
    }

    /// 从 CSV 文件导入参数表
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_csv(&self, path: impl AsRef<Path>) -> ImportResult<ParameterTable> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(ext.to_string_lossy().to_string()));
            }
        }

        let file = File::open(path)?;
        let table = self.import_reader(file)?;
        if table.is_empty() {
            return Err(ImportError::EmptyTable(path.display().to_string()));
        }
        Ok(table)
    }

    /// 从任意读取源导入（不检查空表）
    pub fn import_reader<R: Read>(&self, reader: R) -> ImportResult<ParameterTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut rows = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头占第 1 行
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            let row = parse_row(&record, &headers, line)?;
            validate_row(&row, line)?;
            rows.push(row);
        }

        debug!(rows = rows.len(), "GMAW 参数表解析完成");
        Ok(ParameterTable::from_rows(rows))
    }
}

fn parse_row(record: &StringRecord, headers: &StringRecord, line: usize) -> ImportResult<GmawTableRow> {
    record
        .deserialize::<GmawTableRow>(Some(headers))
        .map_err(|e| ImportError::TypeConversionError {
            row: line,
            message: e.to_string(),
        })
}

fn validate_row(row: &GmawTableRow, line: usize) -> ImportResult<()> {
    let fields = [
        ("min_thickness_mm", row.min_thickness_mm),
        ("max_thickness_mm", row.max_thickness_mm),
        ("wire_diameter_mm", row.wire_diameter_mm),
        ("min_voltage_v", row.min_voltage_v),
        ("max_voltage_v", row.max_voltage_v),
        ("min_current_a", row.min_current_a),
        ("max_current_a", row.max_current_a),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(ImportError::ValueRangeError {
                row: line,
                field: field.to_string(),
                value,
                message: "必须为正数".to_string(),
            });
        }
    }

    let pairs = [
        ("max_thickness_mm", row.min_thickness_mm, row.max_thickness_mm),
        ("max_voltage_v", row.min_voltage_v, row.max_voltage_v),
        ("max_current_a", row.min_current_a, row.max_current_a),
    ];
    for (field, min, max) in pairs {
        if min > max {
            return Err(ImportError::ValueRangeError {
                row: line,
                field: field.to_string(),
                value: max,
                message: format!("小于下限 {}", min),
            });
        }
    }
    Ok(())
}
