// ==========================================
// 土方工程量估算 - 领域类型定义
// ==========================================
// 红线: 岩层顺序固定（由浅至深），分配必须按此顺序进行
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 岩层 (Rock Layer)
// ==========================================
// 顺序: Landfill < WeatheredRock < SoftRock < HardRock（由浅至深）
// 派生 Ord 依赖变体声明顺序，不可随意调整
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RockLayer {
    Landfill,      // 매립토（含风化土）
    WeatheredRock, // 풍화암
    SoftRock,      // 연암
    HardRock,      // 경암（可选第四层）
}

impl RockLayer {
    /// 全部岩层，按地层顺序（由浅至深）
    pub const STRATIGRAPHIC_ORDER: [RockLayer; 4] = [
        RockLayer::Landfill,
        RockLayer::WeatheredRock,
        RockLayer::SoftRock,
        RockLayer::HardRock,
    ];

    /// 地层序号（0 = 最浅）
    pub fn depth_index(self) -> usize {
        match self {
            RockLayer::Landfill => 0,
            RockLayer::WeatheredRock => 1,
            RockLayer::SoftRock => 2,
            RockLayer::HardRock => 3,
        }
    }

    /// 工程量清单上使用的韩文名称
    pub fn label(self) -> &'static str {
        match self {
            RockLayer::Landfill => "매립토",
            RockLayer::WeatheredRock => "풍화암",
            RockLayer::SoftRock => "연암",
            RockLayer::HardRock => "경암",
        }
    }

    /// 从清单名称解析岩层（兼容英文标识）
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "매립토" | "landfill" => Some(RockLayer::Landfill),
            "풍화암" | "weatheredRock" => Some(RockLayer::WeatheredRock),
            "연암" | "softRock" => Some(RockLayer::SoftRock),
            "경암" | "hardRock" => Some(RockLayer::HardRock),
            _ => None,
        }
    }
}

impl fmt::Display for RockLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 地形类型 (Terrain Type)
// ==========================================
// 平面: 单一开挖深度; 斜面: 两级开挖深度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerrainType {
    Plane, // 평면
    Slope, // 사면
}

impl TerrainType {
    /// 区段名称前缀（p-1 / s-1）
    pub fn name_prefix(self) -> &'static str {
        match self {
            TerrainType::Plane => "p",
            TerrainType::Slope => "s",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TerrainType::Plane => "평면",
            TerrainType::Slope => "사면",
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainType::Plane => write!(f, "PLANE"),
            TerrainType::Slope => write!(f, "SLOPE"),
        }
    }
}

// ==========================================
// 作业方式 (Work Type)
// ==========================================
// 排序: 直接装车在前
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    Direct,    // 직（直接装车）
    Clamshell, // 크（抓斗装车）
}

impl WorkType {
    pub fn label(self) -> &'static str {
        match self {
            WorkType::Direct => "직",
            WorkType::Clamshell => "크",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 清单项目 (Item)
// ==========================================
// 排序: 마사토 在前（与汇总表一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    DecomposedGranite, // 마사토
    General,           // 일반
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::DecomposedGranite => "마사토",
            ItemKind::General => "일반",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 计算类型 (Calculation Type)
// ==========================================
// TYPE1: 매립층/풍화토 分列; TYPE2: 合并为 토사
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationType {
    #[serde(rename = "TYPE1")]
    Type1,
    #[serde(rename = "TYPE2")]
    Type2,
}

impl CalculationType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "TYPE1" | "1" => Some(CalculationType::Type1),
            "TYPE2" | "2" => Some(CalculationType::Type2),
            _ => None,
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationType::Type1 => write!(f, "TYPE1"),
            CalculationType::Type2 => write!(f, "TYPE2"),
        }
    }
}

// ==========================================
// 校验模式 (Validation Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
    /// 仅校验: 分配总厚度 = 开挖深度
    TotalOnly,
    /// 同时校验: 各岩层分配合计 = 修正层厚
    TotalAndPerLayer,
}

impl ValidationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "TOTAL_ONLY" | "TOTAL-ONLY" => Some(ValidationMode::TotalOnly),
            "TOTAL_AND_PER_LAYER" | "TOTAL-AND-PER-LAYER" => {
                Some(ValidationMode::TotalAndPerLayer)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::TotalOnly => write!(f, "TOTAL_ONLY"),
            ValidationMode::TotalAndPerLayer => write!(f, "TOTAL_AND_PER_LAYER"),
        }
    }
}
