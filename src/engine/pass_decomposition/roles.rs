// ==========================================
// 焊道角色划分
// ==========================================
// 打底/盖面道数按板厚分档，双面坡口与 U/J 族再修正；
// 超出总道数时按固定规则重新分配
// ==========================================

use crate::domain::types::{GrooveType, PassRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePartition {
    pub root: u32,
    pub cap: u32,
}

impl RolePartition {
    pub fn sum(&self) -> u32 {
        self.root + self.cap
    }
}

/// 板厚分档（断点 3/6/10/15/25/40mm）→ (打底, 盖面)
pub fn role_band(thickness_mm: f64) -> RolePartition {
    // ≤3mm 与 3~6mm 两档取值相同
    let (root, cap) = if thickness_mm <= 6.0 {
        (1, 1)
    } else if thickness_mm <= 10.0 {
        (1, 2)
    } else if thickness_mm <= 15.0 {
        (2, 2)
    } else if thickness_mm <= 25.0 {
        (2, 3)
    } else if thickness_mm <= 40.0 {
        (3, 3)
    } else {
        (3, 4)
    };
    RolePartition { root, cap }
}

/// 打底+盖面超出总道数时重新分配
///
/// - total = 1 → 1/0（单道即打底）
/// - total ≤ 2 → 1/1
/// - total ≤ 4 → 1/2
/// - 其余按比例缩放到 total-1 以内，各自不少于 1
pub fn reproportion(partition: RolePartition, total: u32) -> RolePartition {
    if partition.sum() <= total {
        return partition;
    }
    match total {
        0 => RolePartition { root: 0, cap: 0 },
        1 => RolePartition { root: 1, cap: 0 },
        2 => RolePartition { root: 1, cap: 1 },
        3 | 4 => RolePartition { root: 1, cap: 2 },
        _ => {
            let budget = (total - 1) as f64;
            let scale = budget / partition.sum() as f64;
            RolePartition {
                root: ((partition.root as f64 * scale).floor() as u32).max(1),
                cap: ((partition.cap as f64 * scale).floor() as u32).max(1),
            }
        }
    }
}

/// 计算角色划分
pub fn partition_roles(groove: GrooveType, thickness_mm: f64, total: u32) -> RolePartition {
    let mut partition = role_band(thickness_mm);

    if groove.is_double_sided() {
        partition.root = partition.root.max(2);
        partition.cap = partition.cap.max(2);
    }
    if groove.is_u_family() {
        partition.cap = partition.cap.saturating_sub(1).max(1);
    }

    reproportion(partition, total)
}

/// 第 i 道（从 1 开始）的角色
pub fn role_for(number: u32, total: u32, partition: RolePartition) -> PassRole {
    if number <= partition.root {
        PassRole::Root
    } else if number > total.saturating_sub(partition.cap) {
        PassRole::Cap
    } else {
        PassRole::Fill
    }
}
