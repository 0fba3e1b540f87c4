// ==========================================
// WPS 参数推荐系统 - 焊接方法规格
// ==========================================

use crate::domain::types::{ShieldingGas, WeldProcess};
use serde::{Deserialize, Serialize};

/// 焊接方法规格（方法 + 焊丝/电极直径 + 保护气）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub process: Option<WeldProcess>,
    /// 焊丝(GMAW)/钨极(GTAW)/焊条(SMAW)直径 (mm)
    pub wire_diameter_mm: Option<f64>,
    pub shielding_gas: Option<ShieldingGas>,
}

impl ProcessSpec {
    /// 已录入且属于允许集合的直径
    pub fn valid_diameter(&self) -> Option<f64> {
        match (self.process, self.wire_diameter_mm) {
            (Some(p), Some(d)) if p.allows_diameter(d) => Some(d),
            _ => None,
        }
    }

    /// 实际用于计算的直径：已录入值优先，否则取方法默认值
    pub fn effective_diameter(&self) -> Option<f64> {
        self.process
            .map(|process| process.diameter_or_default(self.wire_diameter_mm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_diameter_requires_allowed_set() {
        let spec = ProcessSpec {
            process: Some(WeldProcess::Gmaw),
            wire_diameter_mm: Some(3.2),
            shielding_gas: None,
        };
        assert_eq!(spec.valid_diameter(), None);
        assert_eq!(spec.effective_diameter(), Some(3.2));
    }

    #[test]
    fn test_effective_diameter_falls_back_to_default() {
        let spec = ProcessSpec {
            process: Some(WeldProcess::Smaw),
            wire_diameter_mm: None,
            shielding_gas: None,
        };
        assert_eq!(spec.effective_diameter(), Some(3.2));
        assert_eq!(ProcessSpec::default().effective_diameter(), None);
    }
}
