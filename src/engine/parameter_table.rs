// ==========================================
// WPS 参数推荐系统 - 参数表解析器
// ==========================================
// 职责: (焊接方法, 板厚, 焊丝/电极直径) → 电流/电压点估计 + 合理范围
// 红线: 全函数，不返回错误；查表失败回退连续公式
// ==========================================
// GMAW: 有序表格按 |t - 区间中点| + 10×|d - 行直径| 选最优行
// GMAW 未命中: 落在两行之间按相邻行线性插值，表外用分段公式并与最近行衔接
// GTAW/SMAW: 确定性公式
// ==========================================

use crate::domain::types::{MaterialFamily, WeldProcess};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 板厚下限（非正板厚被钳位到此值）
pub const MIN_THICKNESS_MM: f64 = 0.5;

/// 板厚上限（坡口目录最大适用板厚）
pub const MAX_THICKNESS_MM: f64 = 200.0;

/// 直径匹配容差 (mm)
const DIAMETER_MATCH_TOLERANCE: f64 = 0.1;

/// 直径偏差在评分中的权重
const DIAMETER_SCORE_WEIGHT: f64 = 10.0;

/// 浮点比较余量
const EPS: f64 = 1e-9;

/// 送丝熔化系数 (m/min per A/mm²)
const BURN_OFF_COEFFICIENT: f64 = 0.045;

// ==========================================
// GMAW 参数表
// ==========================================

/// GMAW 参数表行
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GmawTableRow {
    pub min_thickness_mm: f64,
    pub max_thickness_mm: f64,
    pub wire_diameter_mm: f64,
    pub min_voltage_v: f64,
    pub max_voltage_v: f64,
    pub min_current_a: f64,
    pub max_current_a: f64,
}

impl GmawTableRow {
    pub fn thickness_midpoint(&self) -> f64 {
        (self.min_thickness_mm + self.max_thickness_mm) / 2.0
    }

    /// 行是否命中：直径在 ±0.1 内且板厚落在区间内
    pub fn qualifies(&self, thickness_mm: f64, wire_diameter_mm: f64) -> bool {
        diameter_matches(self, wire_diameter_mm)
            && thickness_mm >= self.min_thickness_mm - EPS
            && thickness_mm <= self.max_thickness_mm + EPS
    }

    /// 匹配评分（越小越好）
    pub fn score(&self, thickness_mm: f64, wire_diameter_mm: f64) -> f64 {
        (thickness_mm - self.thickness_midpoint()).abs()
            + DIAMETER_SCORE_WEIGHT * (wire_diameter_mm - self.wire_diameter_mm).abs()
    }
}

// (min_t, max_t, d, min_v, max_v, min_a, max_a)
// 同一直径下，板厚越大电流区间越高
const BUILTIN_GMAW_ROWS: [(f64, f64, f64, f64, f64, f64, f64); 19] = [
    (0.8, 1.2, 0.8, 15.0, 17.0, 40.0, 60.0),
    (1.4, 1.8, 0.8, 16.0, 18.0, 55.0, 80.0),
    (1.8, 2.2, 0.8, 17.0, 19.0, 70.0, 95.0),
    (1.8, 2.2, 1.0, 18.0, 20.0, 80.0, 105.0),
    (2.3, 2.7, 1.0, 19.0, 21.0, 85.0, 110.0),
    (2.8, 3.2, 1.0, 20.0, 22.0, 90.0, 120.0),
    (2.8, 3.2, 1.2, 20.0, 23.0, 110.0, 140.0),
    (3.5, 4.5, 1.0, 21.0, 23.0, 110.0, 140.0),
    (3.5, 4.5, 1.2, 21.0, 24.0, 130.0, 170.0),
    (5.0, 6.5, 1.2, 23.0, 26.0, 160.0, 210.0),
    (5.0, 6.5, 1.6, 24.0, 27.0, 200.0, 250.0),
    (8.0, 10.0, 1.2, 25.0, 29.0, 200.0, 260.0),
    (8.0, 10.0, 1.6, 26.0, 30.0, 240.0, 300.0),
    (11.0, 14.0, 1.2, 27.0, 31.0, 230.0, 290.0),
    (11.0, 14.0, 1.6, 28.0, 32.0, 270.0, 340.0),
    (15.0, 20.0, 1.2, 28.0, 32.0, 250.0, 310.0),
    (15.0, 20.0, 1.6, 29.0, 34.0, 300.0, 380.0),
    (22.0, 30.0, 1.6, 30.0, 35.0, 320.0, 400.0),
    (32.0, 50.0, 1.6, 31.0, 36.0, 340.0, 420.0),
];

/// 有序 GMAW 参数表
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    rows: Vec<GmawTableRow>,
}

impl ParameterTable {
    /// 内置参数表
    pub fn builtin() -> Self {
        let rows = BUILTIN_GMAW_ROWS
            .iter()
            .map(|&(min_t, max_t, d, min_v, max_v, min_a, max_a)| GmawTableRow {
                min_thickness_mm: min_t,
                max_thickness_mm: max_t,
                wire_diameter_mm: d,
                min_voltage_v: min_v,
                max_voltage_v: max_v,
                min_current_a: min_a,
                max_current_a: max_a,
            })
            .collect();
        Self { rows }
    }

    /// 使用外部导入的行（保持原顺序）
    pub fn from_rows(rows: Vec<GmawTableRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[GmawTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 查找最优命中行，评分相同时保留靠前的行
    pub fn best_match(&self, thickness_mm: f64, wire_diameter_mm: f64) -> Option<(usize, &GmawTableRow)> {
        let mut best: Option<(usize, &GmawTableRow, f64)> = None;
        for (index, row) in self.rows.iter().enumerate() {
            if !row.qualifies(thickness_mm, wire_diameter_mm) {
                continue;
            }
            let score = row.score(thickness_mm, wire_diameter_mm);
            match best {
                Some((_, _, best_score)) if score >= best_score - EPS => {}
                _ => best = Some((index, row, score)),
            }
        }
        best.map(|(index, row, _)| (index, row))
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ==========================================
// 解析结果
// ==========================================

/// 解析依据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionBasis {
    /// GMAW 表格命中
    TableRow { index: usize },
    /// GMAW 落在两行之间，按相邻行插值
    RowInterpolation { lower: usize, upper: usize },
    /// GMAW 分段连续公式（表格未命中）
    FallbackFormula,
    /// GTAW/SMAW 确定性公式
    DirectFormula,
}

impl ResolutionBasis {
    /// 是否为表格命中或确定性公式
    pub fn is_exact(&self) -> bool {
        matches!(self, ResolutionBasis::TableRow { .. } | ResolutionBasis::DirectFormula)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParameters {
    pub current_a: f64,
    pub voltage_v: f64,
    pub min_current_a: f64,
    pub max_current_a: f64,
    pub min_voltage_v: f64,
    pub max_voltage_v: f64,
    pub basis: ResolutionBasis,
}

impl ResolvedParameters {
    fn around(current_a: f64, voltage_v: f64, current_pct: f64, voltage_delta: f64, basis: ResolutionBasis) -> Self {
        Self {
            current_a,
            voltage_v,
            min_current_a: current_a * (1.0 - current_pct),
            max_current_a: current_a * (1.0 + current_pct),
            min_voltage_v: voltage_v - voltage_delta,
            max_voltage_v: voltage_v + voltage_delta,
            basis,
        }
    }
}

// ==========================================
// ParameterTableResolver - 参数表解析器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParameterTableResolver {
    table: ParameterTable,
}

impl ParameterTableResolver {
    pub fn new(table: ParameterTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    /// 解析基准参数
    ///
    /// # 参数
    /// - `process`: 焊接方法
    /// - `thickness_mm`: 板厚，钳位到 [0.5, 200]mm
    /// - `wire_diameter_mm`: 焊丝/电极直径，非正值取方法默认直径
    pub fn resolve(&self, process: WeldProcess, thickness_mm: f64, wire_diameter_mm: f64) -> ResolvedParameters {
        let t = clamp_thickness(thickness_mm);
        let d = process.diameter_or_default(Some(wire_diameter_mm));

        match process {
            WeldProcess::Gmaw => self.resolve_gmaw(t, d),
            WeldProcess::Gtaw => resolve_gtaw(t, d),
            WeldProcess::Smaw => resolve_smaw(t, d),
        }
    }

    fn resolve_gmaw(&self, t: f64, d: f64) -> ResolvedParameters {
        if let Some((index, row)) = self.table.best_match(t, d) {
            return ResolvedParameters {
                current_a: (row.min_current_a + row.max_current_a) / 2.0,
                voltage_v: (row.min_voltage_v + row.max_voltage_v) / 2.0,
                min_current_a: row.min_current_a,
                max_current_a: row.max_current_a,
                min_voltage_v: row.min_voltage_v,
                max_voltage_v: row.max_voltage_v,
                basis: ResolutionBasis::TableRow { index },
            };
        }

        let lower = self.anchor_below(t, d);
        let upper = self.anchor_above(t, d);

        // 两侧均有同直径行：按行边界处的查表结果线性插值
        if let (Some(lo), Some(hi)) = (lower, upper) {
            let w = if hi.thickness_mm > lo.thickness_mm {
                (t - lo.thickness_mm) / (hi.thickness_mm - lo.thickness_mm)
            } else {
                0.0
            };
            debug!(thickness_mm = t, wire_diameter_mm = d, lower = lo.index, upper = hi.index, "GMAW 参数表间隙，相邻行插值");
            return ResolvedParameters::around(
                lo.current_a + (hi.current_a - lo.current_a) * w,
                lo.voltage_v + (hi.voltage_v - lo.voltage_v) * w,
                0.15,
                1.5,
                ResolutionBasis::RowInterpolation { lower: lo.index, upper: hi.index },
            );
        }

        debug!(thickness_mm = t, wire_diameter_mm = d, "GMAW 参数表未命中，回退连续公式");
        let formula_current = gmaw_fallback_current(t, d);
        // 表外: 公式值不越过最近行
        let (current, voltage) = match (lower, upper) {
            (Some(lo), None) if lo.current_a > formula_current => (lo.current_a, lo.voltage_v),
            (None, Some(hi)) if hi.current_a < formula_current => (hi.current_a, hi.voltage_v),
            _ => (formula_current, 14.0 + 0.05 * formula_current),
        };
        ResolvedParameters::around(current, voltage, 0.15, 1.5, ResolutionBasis::FallbackFormula)
    }

    /// 板厚以下最近的同直径行边界
    fn anchor_below(&self, t: f64, d: f64) -> Option<RowAnchor> {
        let edge = self
            .table
            .rows()
            .iter()
            .filter(|r| diameter_matches(r, d) && r.max_thickness_mm < t)
            .map(|r| r.max_thickness_mm)
            .reduce(f64::max)?;
        self.anchor_at(edge, d)
    }

    /// 板厚以上最近的同直径行边界
    fn anchor_above(&self, t: f64, d: f64) -> Option<RowAnchor> {
        let edge = self
            .table
            .rows()
            .iter()
            .filter(|r| diameter_matches(r, d) && r.min_thickness_mm > t)
            .map(|r| r.min_thickness_mm)
            .reduce(f64::min)?;
        self.anchor_at(edge, d)
    }

    fn anchor_at(&self, thickness_mm: f64, d: f64) -> Option<RowAnchor> {
        let (index, row) = self.table.best_match(thickness_mm, d)?;
        Some(RowAnchor {
            thickness_mm,
            index,
            current_a: (row.min_current_a + row.max_current_a) / 2.0,
            voltage_v: (row.min_voltage_v + row.max_voltage_v) / 2.0,
        })
    }
}

/// 行边界处的查表结果
#[derive(Debug, Clone, Copy)]
struct RowAnchor {
    thickness_mm: f64,
    index: usize,
    current_a: f64,
    voltage_v: f64,
}

fn diameter_matches(row: &GmawTableRow, d: f64) -> bool {
    (d - row.wire_diameter_mm).abs() <= DIAMETER_MATCH_TOLERANCE + EPS
}

/// 板厚钳位到 [0.5, 200] mm，NaN 取下限
pub fn clamp_thickness(thickness_mm: f64) -> f64 {
    if thickness_mm.is_nan() {
        MIN_THICKNESS_MM
    } else {
        thickness_mm.clamp(MIN_THICKNESS_MM, MAX_THICKNESS_MM)
    }
}

// 分段线性电流曲线的断点 (板厚 mm, 电流 A)，以 1.2mm 焊丝为基准
const GMAW_FALLBACK_POINTS: [(f64, f64); 6] = [
    (0.0, 35.0),
    (1.0, 55.0),
    (3.0, 105.0),
    (6.0, 170.0),
    (12.0, 260.0),
    (20.0, 330.0),
];

/// GMAW 回退公式：分段线性 + 焊丝直径修正
fn gmaw_fallback_current(t: f64, d: f64) -> f64 {
    let base = {
        let last = GMAW_FALLBACK_POINTS[GMAW_FALLBACK_POINTS.len() - 1];
        if t >= last.0 {
            (last.1 + 5.0 * (t - last.0)).min(450.0)
        } else {
            GMAW_FALLBACK_POINTS
                .windows(2)
                .find(|w| t <= w[1].0)
                .map(|w| {
                    let (t0, a0) = w[0];
                    let (t1, a1) = w[1];
                    a0 + (a1 - a0) * (t - t0) / (t1 - t0)
                })
                .unwrap_or(last.1)
        }
    };

    let wire_factor = (d / 1.2).sqrt().clamp(0.7, 1.3);
    base * wire_factor
}

fn resolve_gtaw(t: f64, d: f64) -> ResolvedParameters {
    let ceiling = (80.0 * d).max(15.0);
    let current = (30.0 * t + 10.0).clamp(15.0, ceiling);
    let voltage = 10.0 + 0.04 * current;
    ResolvedParameters::around(current, voltage, 0.15, 1.0, ResolutionBasis::DirectFormula)
}

fn resolve_smaw(t: f64, d: f64) -> ResolvedParameters {
    let current = 40.0 * d * (0.9 + 0.02 * t.min(10.0));
    let voltage = 20.0 + 0.04 * current;
    ResolvedParameters::around(current, voltage, 0.15, 2.0, ResolutionBasis::DirectFormula)
}

// ==========================================
// 派生参数公式
// ==========================================

/// 保护气流量 (L/min)，SMAW 为 None
pub fn gas_flow_l_min(process: WeldProcess, wire_diameter_mm: f64, material: Option<MaterialFamily>) -> Option<f64> {
    match process {
        WeldProcess::Gmaw => {
            let base = 8.0 + 6.0 * wire_diameter_mm;
            if material == Some(MaterialFamily::Aluminum) {
                Some(base * 1.2)
            } else {
                Some(base)
            }
        }
        WeldProcess::Gtaw => Some(6.0 + 1.5 * wire_diameter_mm),
        WeldProcess::Smaw => None,
    }
}

/// 焊丝截面积 (mm²)
pub fn wire_area_mm2(wire_diameter_mm: f64) -> f64 {
    std::f64::consts::PI * wire_diameter_mm * wire_diameter_mm / 4.0
}

/// 由电流反推送丝速度 (m/min)
pub fn wire_feed_speed_m_min(current_a: f64, wire_diameter_mm: f64) -> f64 {
    let area = wire_area_mm2(wire_diameter_mm.max(0.1));
    BURN_OFF_COEFFICIENT * current_a / area
}

/// 基准焊接速度 (mm/min)，随板厚递减
pub fn base_travel_speed_mm_min(process: WeldProcess, thickness_mm: f64) -> f64 {
    let t = clamp_thickness(thickness_mm);
    match process {
        WeldProcess::Gmaw => (450.0 - 15.0 * t).max(150.0),
        WeldProcess::Gtaw => (200.0 - 10.0 * t).max(60.0),
        WeldProcess::Smaw => (250.0 - 8.0 * t).max(80.0),
    }
}

/// 推荐预热温度 (°C)
pub fn preheat_temp_c(material: Option<MaterialFamily>, thickness_mm: f64) -> f64 {
    let t = clamp_thickness(thickness_mm);
    match material {
        Some(MaterialFamily::CarbonSteel) | None => {
            if t < 25.0 {
                20.0
            } else if t < 50.0 {
                100.0
            } else {
                150.0
            }
        }
        Some(MaterialFamily::LowAlloySteel) => {
            if t < 12.0 {
                50.0
            } else if t < 25.0 {
                100.0
            } else {
                150.0
            }
        }
        Some(MaterialFamily::StainlessSteel) => 20.0,
        Some(MaterialFamily::Aluminum) => {
            if t <= 10.0 {
                20.0
            } else {
                80.0
            }
        }
    }
}
