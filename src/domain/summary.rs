// ==========================================
// 土方工程量估算 - 工程量汇总模型
// ==========================================
// 职责: 按 (岩层, 作业方式, 项目) 分组的工程量汇总表
// 红线: 分组面积 = 贡献区段的区段面积之和（同一区段只计一次）
// ==========================================

use crate::domain::types::{ItemKind, RockLayer, TerrainType, WorkType};
use serde::{Deserialize, Serialize};

// ==========================================
// SummaryKey - 汇总分组键
// ==========================================
// 派生 Ord 的字段顺序即汇总表排序: 岩层 -> 직/크 -> 마사토/일반
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    pub layer: RockLayer,
    pub work_type: WorkType,
    pub item: ItemKind,
}

impl SummaryKey {
    /// 汇总表显示名称，例如 "매립토 (직) 일반"
    pub fn display_name(&self) -> String {
        format!("{} ({}) {}", self.layer, self.work_type, self.item)
    }
}

/// 单个分组的汇总结果（K 为分组键）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry<K> {
    pub key: K,
    pub area_m2: f64,
    pub volume_m3: i64,
    pub row_count: usize,
}

// ==========================================
// TerrainSummary - 单地形汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSummary {
    pub terrain: TerrainType,
    pub section_count: usize,
    pub total_area_m2: f64, // 含有清单行的区段面积合计
    pub entries: Vec<SummaryEntry<SummaryKey>>,
    pub total_volume_m3: i64,
}

impl TerrainSummary {
    pub fn empty(terrain: TerrainType) -> Self {
        Self {
            terrain,
            section_count: 0,
            total_area_m2: 0.0,
            entries: Vec::new(),
            total_volume_m3: 0,
        }
    }

    pub fn entry(&self, key: &SummaryKey) -> Option<&SummaryEntry<SummaryKey>> {
        self.entries.iter().find(|entry| entry.key == *key)
    }
}

// ==========================================
// EstimateSummary - 全部区段汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub plane: TerrainSummary,
    pub slope: TerrainSummary,
    pub grand_total_volume_m3: i64, // 총계
}

impl EstimateSummary {
    pub fn terrain(&self, terrain: TerrainType) -> &TerrainSummary {
        match terrain {
            TerrainType::Plane => &self.plane,
            TerrainType::Slope => &self.slope,
        }
    }
}
