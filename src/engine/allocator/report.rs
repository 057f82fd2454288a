use serde::{Deserialize, Serialize};

// ==========================================
// PhaseAllocation - 单阶段分配情况
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseAllocation {
    /// 阶段序号（0 起）
    pub phase: usize,

    /// 该阶段开挖深度
    pub target_m: f64,

    /// 该阶段可分配深度 = max(0, 开挖深度 - 之前阶段累计分配)
    pub budget_m: f64,

    /// 该阶段实际分配合计
    pub allocated_m: f64,

    /// 未分配深度（该阶段没有吸收层行时可能 > 0）
    pub unallocated_m: f64,
}

// ==========================================
// AllocationOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// 与行布局一一对应的分配层厚
    pub thicknesses: Vec<f64>,

    /// 各阶段分配情况
    pub phases: Vec<PhaseAllocation>,
}

impl AllocationOutcome {
    /// 全部行分配合计
    pub fn total_m(&self) -> f64 {
        self.thicknesses.iter().sum()
    }
}
