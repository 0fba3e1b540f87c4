// ==========================================
// WPS 参数推荐系统 - 领域类型定义
// ==========================================
// 职责: 材料/接头/坡口/工艺/位置/保护气等枚举
// 红线: 枚举封闭，新增坡口类型必须在所有 match 中显式处理
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 材料类别 (Material Family)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialFamily {
    CarbonSteel,    // 碳钢
    LowAlloySteel,  // 低合金钢
    StainlessSteel, // 不锈钢
    Aluminum,       // 铝及铝合金
}

impl MaterialFamily {
    /// 密度 (g/cm³)，用于熔敷金属质量估算
    pub fn density_g_cm3(&self) -> f64 {
        match self {
            MaterialFamily::CarbonSteel | MaterialFamily::LowAlloySteel => 7.85,
            MaterialFamily::StainlessSteel => 7.9,
            MaterialFamily::Aluminum => 2.7,
        }
    }
}

impl fmt::Display for MaterialFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialFamily::CarbonSteel => write!(f, "CARBON_STEEL"),
            MaterialFamily::LowAlloySteel => write!(f, "LOW_ALLOY_STEEL"),
            MaterialFamily::StainlessSteel => write!(f, "STAINLESS_STEEL"),
            MaterialFamily::Aluminum => write!(f, "ALUMINUM"),
        }
    }
}

impl FromStr for MaterialFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "CARBON_STEEL" | "CARBON" => Ok(MaterialFamily::CarbonSteel),
            "LOW_ALLOY_STEEL" | "LOW_ALLOY" => Ok(MaterialFamily::LowAlloySteel),
            "STAINLESS_STEEL" | "STAINLESS" => Ok(MaterialFamily::StainlessSteel),
            "ALUMINUM" | "ALUMINIUM" => Ok(MaterialFamily::Aluminum),
            other => Err(format!("未知材料类别: {}", other)),
        }
    }
}

// ==========================================
// 接头形式 (Joint Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JointType {
    Butt,   // 对接
    Fillet, // 角接 (T 型)
    Lap,    // 搭接
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointType::Butt => write!(f, "BUTT"),
            JointType::Fillet => write!(f, "FILLET"),
            JointType::Lap => write!(f, "LAP"),
        }
    }
}

// ==========================================
// 坡口形式 (Groove Type)
// ==========================================
// 目录（适用接头/厚度范围/名义角度）见 domain::joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrooveType {
    I,       // I 形（薄板不开坡口）
    IHeavy,  // I 形（中厚板不开坡口）
    V,       // V 形
    Y,       // Y 形（带钝边 V）
    Bevel,   // 单边 V
    U,       // U 形
    J,       // J 形
    X,       // X 形（对称双 V）
    DoubleV, // 非对称双 V
    K,       // K 形（双单边 V）
    DoubleU, // 双 U
    Fillet,  // 角焊缝
}

impl GrooveType {
    pub const ALL: [GrooveType; 12] = [
        GrooveType::I,
        GrooveType::IHeavy,
        GrooveType::V,
        GrooveType::Y,
        GrooveType::Bevel,
        GrooveType::U,
        GrooveType::J,
        GrooveType::X,
        GrooveType::DoubleV,
        GrooveType::K,
        GrooveType::DoubleU,
        GrooveType::Fillet,
    ];

    /// 是否为带坡口角度的类型（角度修正仅作用于这些类型）
    pub fn is_angled(&self) -> bool {
        matches!(
            self,
            GrooveType::V | GrooveType::K | GrooveType::Y | GrooveType::DoubleV | GrooveType::Bevel
        )
    }

    /// 是否为双面焊坡口
    pub fn is_double_sided(&self) -> bool {
        matches!(
            self,
            GrooveType::X | GrooveType::K | GrooveType::DoubleV | GrooveType::DoubleU
        )
    }

    /// 是否为 U/J 族
    pub fn is_u_family(&self) -> bool {
        matches!(self, GrooveType::U | GrooveType::J)
    }
}

impl fmt::Display for GrooveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrooveType::I => "I",
            GrooveType::IHeavy => "I_HEAVY",
            GrooveType::V => "V",
            GrooveType::Y => "Y",
            GrooveType::Bevel => "BEVEL",
            GrooveType::U => "U",
            GrooveType::J => "J",
            GrooveType::X => "X",
            GrooveType::DoubleV => "DOUBLE_V",
            GrooveType::K => "K",
            GrooveType::DoubleU => "DOUBLE_U",
            GrooveType::Fillet => "FILLET",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for GrooveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase().replace('-', "_");
        GrooveType::ALL
            .iter()
            .copied()
            .find(|g| g.to_string() == key)
            .ok_or_else(|| format!("未知坡口类型: {}", s))
    }
}

// ==========================================
// 焊接方法 (Welding Process)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeldProcess {
    Gmaw, // 熔化极气体保护焊 (MIG/MAG)
    Gtaw, // 钨极氩弧焊 (TIG)
    Smaw, // 焊条电弧焊 (MMA)
}

impl WeldProcess {
    /// 允许的焊丝/电极直径 (mm)
    pub fn allowed_diameters(&self) -> &'static [f64] {
        match self {
            WeldProcess::Gmaw => &[0.6, 0.8, 0.9, 1.0, 1.2, 1.4, 1.6],
            WeldProcess::Gtaw => &[1.0, 1.6, 2.0, 2.4, 3.2, 4.0],
            WeldProcess::Smaw => &[2.0, 2.5, 3.2, 4.0, 5.0],
        }
    }

    /// 允许的保护气（SMAW 为空集）
    pub fn allowed_gases(&self) -> &'static [ShieldingGas] {
        match self {
            WeldProcess::Gmaw => &[
                ShieldingGas::Argon,
                ShieldingGas::ArgonCo2_18,
                ShieldingGas::ArgonCo2_2,
                ShieldingGas::Co2,
                ShieldingGas::ArgonHelium,
            ],
            WeldProcess::Gtaw => &[ShieldingGas::Argon, ShieldingGas::ArgonHelium],
            WeldProcess::Smaw => &[],
        }
    }

    /// 直径是否属于该方法的允许集合（容差 0.01mm）
    pub fn allows_diameter(&self, diameter_mm: f64) -> bool {
        self.allowed_diameters()
            .iter()
            .any(|d| (d - diameter_mm).abs() <= 0.01)
    }

    pub fn allows_gas(&self, gas: ShieldingGas) -> bool {
        self.allowed_gases().contains(&gas)
    }

    /// 未指定直径时使用的默认值
    pub fn default_diameter(&self) -> f64 {
        match self {
            WeldProcess::Gmaw => 1.2,
            WeldProcess::Gtaw => 2.4,
            WeldProcess::Smaw => 3.2,
        }
    }

    /// 正的录入直径优先，否则取默认直径
    pub fn diameter_or_default(&self, diameter_mm: Option<f64>) -> f64 {
        diameter_mm
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or_else(|| self.default_diameter())
    }

    /// 热效率系数（热输入计算）
    pub fn arc_efficiency(&self) -> f64 {
        match self {
            WeldProcess::Gmaw => 0.8,
            WeldProcess::Gtaw => 0.6,
            WeldProcess::Smaw => 0.8,
        }
    }

    /// 熔敷效率（焊材消耗估算）
    pub fn deposition_efficiency(&self) -> f64 {
        match self {
            WeldProcess::Gmaw => 0.95,
            WeldProcess::Gtaw => 0.98,
            WeldProcess::Smaw => 0.65,
        }
    }

    /// 是否使用连续送丝
    pub fn has_wire_feed(&self) -> bool {
        matches!(self, WeldProcess::Gmaw)
    }
}

impl fmt::Display for WeldProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeldProcess::Gmaw => write!(f, "GMAW"),
            WeldProcess::Gtaw => write!(f, "GTAW"),
            WeldProcess::Smaw => write!(f, "SMAW"),
        }
    }
}

impl FromStr for WeldProcess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GMAW" | "MIG" | "MAG" | "MIG-MAG" => Ok(WeldProcess::Gmaw),
            "GTAW" | "TIG" => Ok(WeldProcess::Gtaw),
            "SMAW" | "MMA" => Ok(WeldProcess::Smaw),
            other => Err(format!("未知焊接方法: {}", other)),
        }
    }
}

// ==========================================
// 焊接位置 (Welding Position)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeldPosition {
    Flat,         // 平焊 1G/1F
    Horizontal,   // 横焊 2G/2F
    VerticalUp,   // 立向上 3G/3F
    VerticalDown, // 立向下
    Overhead,     // 仰焊 4G/4F
}

impl WeldPosition {
    /// 位置修正系数（作用于电流/送丝速度/焊接速度）
    pub fn multiplier(&self) -> f64 {
        match self {
            WeldPosition::Flat => 1.0,
            WeldPosition::Horizontal => 0.9,
            WeldPosition::VerticalUp => 0.8,
            WeldPosition::VerticalDown => 1.1,
            WeldPosition::Overhead => 1.1,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WeldPosition::Flat => "1G",
            WeldPosition::Horizontal => "2G",
            WeldPosition::VerticalUp => "3G-UP",
            WeldPosition::VerticalDown => "3G-DOWN",
            WeldPosition::Overhead => "4G",
        }
    }
}

impl fmt::Display for WeldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeldPosition::Flat => write!(f, "FLAT"),
            WeldPosition::Horizontal => write!(f, "HORIZONTAL"),
            WeldPosition::VerticalUp => write!(f, "VERTICAL_UP"),
            WeldPosition::VerticalDown => write!(f, "VERTICAL_DOWN"),
            WeldPosition::Overhead => write!(f, "OVERHEAD"),
        }
    }
}

// ==========================================
// 保护气 (Shielding Gas)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShieldingGas {
    Argon,       // 纯氩 (I1)
    ArgonCo2_18, // Ar + 18% CO2 (M21)
    ArgonCo2_2,  // Ar + 2% CO2 (M12)
    Co2,         // 纯 CO2 (C1)
    ArgonHelium, // Ar/He 混合 (I3)
}

impl fmt::Display for ShieldingGas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShieldingGas::Argon => write!(f, "Ar"),
            ShieldingGas::ArgonCo2_18 => write!(f, "Ar+18%CO2"),
            ShieldingGas::ArgonCo2_2 => write!(f, "Ar+2%CO2"),
            ShieldingGas::Co2 => write!(f, "CO2"),
            ShieldingGas::ArgonHelium => write!(f, "Ar/He"),
        }
    }
}

// ==========================================
// 推荐置信度 (Confidence)
// ==========================================
// High: 表格精确/近似命中或确定性公式
// Medium: 带修正系数的经验公式
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 焊道角色 (Pass Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassRole {
    Root, // 打底
    Fill, // 填充
    Cap,  // 盖面
}

impl fmt::Display for PassRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassRole::Root => write!(f, "ROOT"),
            PassRole::Fill => write!(f, "FILL"),
            PassRole::Cap => write!(f, "CAP"),
        }
    }
}
