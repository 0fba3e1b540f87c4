// ==========================================
// WPS 参数推荐系统 - 多道焊分解引擎
// ==========================================
// 职责: 坡口几何 + 焊接方法 → 总道数 → 打底/填充/盖面划分 → 逐道参数
// 输入: 坡口类型、板厚、焊丝直径、坡口角度、焊接方法
// 输出: PassPlan（有序）
// ==========================================
// 红线: len(PassPlan) == 总道数 ≥ 1
// 红线: 打底道数 + 盖面道数 ≤ 总道数（超出时重新分配）
// 红线: 坡口公式按封闭枚举分派，新增坡口必须显式处理
// ==========================================

mod count;
mod planner;
mod roles;

#[cfg(test)]
mod tests;

pub use count::{effective_angle, family_floor, total_pass_count, PassCountBreakdown};
pub use planner::PassDecompositionEngine;
pub use roles::{partition_roles, reproportion, role_band, role_for, RolePartition};
