// ==========================================
// 土方工程量估算 - 修正层厚剖面
// ==========================================
// 红线: 各岩层层厚 >= 0，且按地层顺序（由浅至深）排列
// ==========================================

use crate::domain::error::{is_non_negative_finite, EstimateError, EstimateResult};
use crate::domain::types::RockLayer;
use serde::{Deserialize, Serialize};

// ==========================================
// LayerThickness - 单岩层可用层厚
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerThickness {
    pub layer: RockLayer,
    pub thickness_m: f64,
}

// ==========================================
// ThicknessProfile - 层厚剖面
// ==========================================
// 用途: 深度分配的输入（每个岩层的可用总厚度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayerThickness>", into = "Vec<LayerThickness>")]
pub struct ThicknessProfile {
    layers: Vec<LayerThickness>,
}

impl ThicknessProfile {
    /// 构造层厚剖面
    ///
    /// # 参数
    /// - `layers`: 岩层与层厚，顺序任意（内部按地层顺序排序）
    ///
    /// # 返回
    /// - `Err(InvalidProfileThickness)`: 层厚为负或非有限值
    /// - `Err(DuplicateLayer)`: 同一岩层出现两次
    pub fn new(mut layers: Vec<LayerThickness>) -> EstimateResult<Self> {
        for entry in &layers {
            if !is_non_negative_finite(entry.thickness_m) {
                return Err(EstimateError::InvalidProfileThickness {
                    layer: entry.layer,
                    value: entry.thickness_m,
                });
            }
        }

        layers.sort_by_key(|entry| entry.layer);
        for pair in layers.windows(2) {
            if pair[0].layer == pair[1].layer {
                return Err(EstimateError::DuplicateLayer(pair[0].layer));
            }
        }

        Ok(Self { layers })
    }

    /// 常见三层剖面（매립토 / 풍화암 / 연암）
    pub fn three_layer(
        landfill_m: f64,
        weathered_rock_m: f64,
        soft_rock_m: f64,
    ) -> EstimateResult<Self> {
        Self::new(vec![
            LayerThickness {
                layer: RockLayer::Landfill,
                thickness_m: landfill_m,
            },
            LayerThickness {
                layer: RockLayer::WeatheredRock,
                thickness_m: weathered_rock_m,
            },
            LayerThickness {
                layer: RockLayer::SoftRock,
                thickness_m: soft_rock_m,
            },
        ])
    }

    pub fn layers(&self) -> &[LayerThickness] {
        &self.layers
    }

    /// 某岩层的可用层厚；剖面中不存在的岩层为 0
    pub fn thickness(&self, layer: RockLayer) -> f64 {
        self.layers
            .iter()
            .find(|entry| entry.layer == layer)
            .map(|entry| entry.thickness_m)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, layer: RockLayer) -> bool {
        self.layers.iter().any(|entry| entry.layer == layer)
    }

    /// 剖面中最深的岩层
    pub fn deepest_layer(&self) -> Option<RockLayer> {
        self.layers.last().map(|entry| entry.layer)
    }

    pub fn total_m(&self) -> f64 {
        self.layers.iter().map(|entry| entry.thickness_m).sum()
    }

    /// 累计层厚（누계）: 每层底面距地面的深度
    pub fn cumulative(&self) -> Vec<LayerThickness> {
        let mut depth = 0.0;
        self.layers
            .iter()
            .map(|entry| {
                depth += entry.thickness_m;
                LayerThickness {
                    layer: entry.layer,
                    thickness_m: depth,
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<LayerThickness>> for ThicknessProfile {
    type Error = EstimateError;

    fn try_from(layers: Vec<LayerThickness>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<ThicknessProfile> for Vec<LayerThickness> {
    fn from(profile: ThicknessProfile) -> Self {
        profile.layers
    }
}

// ==========================================
// ModifiedThicknessReport - 修正层厚对照表
// ==========================================
// 左: 柱状图平均层厚（钻孔地面高程）
// 右: 修正层厚（场地平均地面高程）+ 累计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedThicknessReport {
    pub borehole_ground_level_m: f64, // 주상도 평균 지반고
    pub site_ground_level_m: f64,     // 평균지반고
    pub original: Vec<LayerThickness>,
    pub modified: ThicknessProfile,
    pub cumulative: Vec<LayerThickness>,
}

impl ModifiedThicknessReport {
    /// 地面高程修正量（场地 - 钻孔），加到填土层上
    pub fn ground_level_offset_m(&self) -> f64 {
        self.site_ground_level_m - self.borehole_ground_level_m
    }
}
