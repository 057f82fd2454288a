// ==========================================
// 土方工程量估算 - 体积计算引擎
// ==========================================
// 职责: 行体积、区段小计、按分组键汇总
// 公式: 体积 = round(面积 × 层厚 × 适用率 / 100)
// 取整: 四舍五入（.5 远离零），结果为整数立方米
// ==========================================
// 红线: 体积恒 >= 0
// 红线: 分组面积按区段计，同一区段的多行只计一次
// ==========================================

use crate::domain::section::{AllocationRow, Section};
use crate::domain::summary::{EstimateSummary, SummaryEntry, SummaryKey, TerrainSummary};
use crate::domain::types::TerrainType;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

// ==========================================
// VolumeCalculator - 体积计算引擎
// ==========================================
pub struct VolumeCalculator {
    // 无状态引擎
}

impl VolumeCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 单行体积（m³，整数）
    ///
    /// # 参数
    /// - `area_m2`: 面积
    /// - `thickness_m`: 分配层厚
    /// - `application_rate_pct`: 适用率（0-100）
    ///
    /// # 返回
    /// 四舍五入后的体积；非有限或非正结果按 0 计
    pub fn volume_m3(area_m2: f64, thickness_m: f64, application_rate_pct: f64) -> i64 {
        let raw = area_m2 * thickness_m * application_rate_pct / 100.0;
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }
        raw.round() as i64
    }

    /// 重算行体积（不累加，重复调用结果相同）
    pub fn compute_volumes(&self, rows: &[AllocationRow]) -> Vec<AllocationRow> {
        rows.iter()
            .map(|row| {
                let mut row = row.clone();
                row.volume_m3 =
                    Self::volume_m3(row.area_m2, row.thickness_m, row.application_rate_pct);
                row
            })
            .collect()
    }

    /// 重算区段全部行体积
    pub fn apply_to_section(&self, section: &Section) -> Section {
        let rows = self.compute_volumes(&section.rows);
        let updated = Section {
            rows,
            ..section.clone()
        };
        debug!(
            section = %updated.name,
            subtotal_m3 = updated.subtotal_m3(),
            "区段体积重算完成"
        );
        updated
    }

    /// 区段小计（소계）
    pub fn section_subtotal(&self, section: &Section) -> i64 {
        section.subtotal_m3()
    }

    // ==========================================
    // 分组汇总
    // ==========================================

    /// 按分组键汇总多个区段的行
    ///
    /// # 参数
    /// - `sections`: 参与汇总的区段
    /// - `key_fn`: 行 -> 分组键
    ///
    /// # 返回
    /// 按分组键排序的汇总；分组面积为贡献区段面积之和
    pub fn aggregate_by_key<'a, K, F, I>(&self, sections: I, key_fn: F) -> Vec<SummaryEntry<K>>
    where
        K: Ord + Clone,
        F: Fn(&AllocationRow) -> K,
        I: IntoIterator<Item = &'a Section>,
    {
        struct Group {
            section_ids: BTreeSet<usize>,
            area_m2: f64,
            volume_m3: i64,
            row_count: usize,
        }

        let mut groups: BTreeMap<K, Group> = BTreeMap::new();

        for (section_idx, section) in sections.into_iter().enumerate() {
            for row in &section.rows {
                let group = groups.entry(key_fn(row)).or_insert_with(|| Group {
                    section_ids: BTreeSet::new(),
                    area_m2: 0.0,
                    volume_m3: 0,
                    row_count: 0,
                });

                if group.section_ids.insert(section_idx) {
                    group.area_m2 += section.area_m2;
                }
                group.volume_m3 += row.volume_m3;
                group.row_count += 1;
            }
        }

        groups
            .into_iter()
            .map(|(key, group)| SummaryEntry {
                key,
                area_m2: group.area_m2,
                volume_m3: group.volume_m3,
                row_count: group.row_count,
            })
            .collect()
    }

    /// 单地形汇总表（按 岩层 / 作业方式 / 项目 分组）
    pub fn summarize_terrain(&self, sections: &[Section], terrain: TerrainType) -> TerrainSummary {
        let matched: Vec<&Section> = sections.iter().filter(|s| s.terrain == terrain).collect();

        let entries = self.aggregate_by_key(matched.iter().copied(), |row| SummaryKey {
            layer: row.layer,
            work_type: row.work_type,
            item: row.item,
        });

        let total_area_m2 = matched
            .iter()
            .filter(|s| !s.rows.is_empty())
            .map(|s| s.area_m2)
            .sum();
        let total_volume_m3 = entries.iter().map(|e| e.volume_m3).sum();

        TerrainSummary {
            terrain,
            section_count: matched.len(),
            total_area_m2,
            entries,
            total_volume_m3,
        }
    }

    /// 平面 + 斜面汇总及总计
    #[instrument(skip_all, fields(section_count = sections.len()))]
    pub fn summarize(&self, sections: &[Section]) -> EstimateSummary {
        let plane = self.summarize_terrain(sections, TerrainType::Plane);
        let slope = self.summarize_terrain(sections, TerrainType::Slope);
        let grand_total_volume_m3 = plane.total_volume_m3 + slope.total_volume_m3;

        info!(
            plane_volume_m3 = plane.total_volume_m3,
            slope_volume_m3 = slope.total_volume_m3,
            grand_total_volume_m3,
            "工程量汇总完成"
        );

        EstimateSummary {
            plane,
            slope,
            grand_total_volume_m3,
        }
    }
}

impl Default for VolumeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::section::{LayoutDefaults, RowTemplate};
    use crate::domain::types::RockLayer;

    fn section_with_thickness(name: &str, terrain: TerrainType, area: f64, thk: &[f64]) -> Section {
        let layout = RowTemplate::default_layout(terrain, &LayoutDefaults::default());
        let mut section = Section::new(name, terrain, area, 28.05, vec![0.56, 1.76], &layout).unwrap();
        for (row, t) in section.rows.iter_mut().zip(thk) {
            row.thickness_m = *t;
        }
        VolumeCalculator::new().apply_to_section(&section)
    }

    #[test]
    fn test_volume_rounding() {
        assert_eq!(VolumeCalculator::volume_m3(213.23, 5.0, 100.0), 1066);
        assert_eq!(VolumeCalculator::volume_m3(18.01, 0.75, 100.0), 14);
        assert_eq!(VolumeCalculator::volume_m3(1.0, 2.5, 100.0), 3);
        assert_eq!(VolumeCalculator::volume_m3(10.0, 1.0, 50.0), 5);
    }

    #[test]
    fn test_volume_never_negative() {
        assert_eq!(VolumeCalculator::volume_m3(-10.0, 1.0, 100.0), 0);
        assert_eq!(VolumeCalculator::volume_m3(10.0, f64::NAN, 100.0), 0);
    }

    #[test]
    fn test_compute_volumes_is_not_cumulative() {
        let calc = VolumeCalculator::new();
        let section = section_with_thickness("p-1", TerrainType::Plane, 213.23, &[5.0, 16.475, 0.75, 5.775]);
        let again = calc.compute_volumes(&section.rows);
        assert_eq!(again, section.rows);
        assert_eq!(section.rows[0].volume_m3, 1066);
        assert_eq!(calc.section_subtotal(&section), section.rows.iter().map(|r| r.volume_m3).sum::<i64>());
    }

    #[test]
    fn test_group_area_counts_each_section_once() {
        let calc = VolumeCalculator::new();
        let a = section_with_thickness("p-1", TerrainType::Plane, 100.0, &[5.0, 1.0, 1.0, 1.0]);
        let b = section_with_thickness("p-2", TerrainType::Plane, 50.0, &[5.0, 1.0, 1.0, 1.0]);

        // 按岩层分组：填土两行来自同一区段，面积只计一次
        let by_layer = calc.aggregate_by_key([&a, &b], |row| row.layer);
        let landfill = by_layer.iter().find(|e| e.key == RockLayer::Landfill).unwrap();
        assert_eq!(landfill.area_m2, 150.0);
        assert_eq!(landfill.row_count, 4);
        assert_eq!(landfill.volume_m3, 500 + 100 + 250 + 50);
    }

    #[test]
    fn test_summarize_by_terrain() {
        let calc = VolumeCalculator::new();
        let sections = vec![
            section_with_thickness("p-1", TerrainType::Plane, 213.23, &[5.0, 16.475, 0.75, 5.775]),
            section_with_thickness("s-2", TerrainType::Slope, 18.01, &[5.0, 16.475, 0.75, 6.385, 1.2]),
        ];

        let summary = calc.summarize(&sections);

        assert_eq!(summary.plane.section_count, 1);
        assert_eq!(summary.plane.entries.len(), 4);
        assert_eq!(summary.slope.entries.len(), 5);
        assert_eq!(summary.plane.total_area_m2, 213.23);
        assert_eq!(
            summary.grand_total_volume_m3,
            sections[0].subtotal_m3() + sections[1].subtotal_m3()
        );
        // 排序: 매립토(직) 在首位
        assert_eq!(summary.slope.entries[0].key.display_name(), "매립토 (직) 일반");
        assert_eq!(summary.terrain(TerrainType::Slope).total_area_m2, 18.01);
    }
}
