// ==========================================
// 土方工程量估算 - 深度分配引擎
// ==========================================
// 红线: 按地层顺序（由浅至深）分配，分配值恒 >= 0
// 红线: 非吸收层的分配合计不超过该层层厚
// 红线: 吸收层（布局中最深的岩层）承担全部剩余深度
// ==========================================
// 职责: 将开挖深度拆分到各清单行
// 输入: 层厚剖面 + 开挖深度列表（每阶段一个）+ 行布局 + 首行覆写
// 输出: 每行分配层厚 + 各阶段分配情况
// ==========================================
// 注: 单阶段即长度为 1 的深度列表，不设单独路径
// ==========================================

mod core;
mod report;

#[cfg(test)]
mod tests;

pub use core::DepthAllocator;
pub use report::{AllocationOutcome, PhaseAllocation};
