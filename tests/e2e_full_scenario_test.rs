// ==========================================
// 完整估算流程端到端测试
// ==========================================
// 场景: 柱状图文件 + 平均地面高程文件 -> 修正层厚 -> 平面/斜面区段 -> 汇总 -> 校验
// ==========================================

mod test_helpers;

use earthwork_estimator::config::{config_keys, ConfigManager};
use earthwork_estimator::domain::geology::GroundLevelSurvey;
use earthwork_estimator::domain::types::{RockLayer, TerrainType, ValidationMode};
use earthwork_estimator::engine::{EarthworkEstimator, EstimateInput, SectionChange, SectionInput};
use earthwork_estimator::importer::BoreholeImporter;
use earthwork_estimator::{logging, EstimateError, EstimateSettings};
use test_helpers::{scenario_boreholes, scenario_profile, write_temp_csv};

fn scenario_input() -> EstimateInput {
    EstimateInput {
        boreholes: scenario_boreholes(),
        ground_levels: GroundLevelSurvey::from_values(vec![27.5, 28.5]),
        sections: vec![
            SectionInput {
                original_ground_level_m: Some(27.44),
                area_m2: Some(213.23),
                ..SectionInput::plane()
            },
            SectionInput {
                label: "북측".to_string(),
                ..SectionInput::slope()
            },
        ],
        ..Default::default()
    }
}

#[test]
fn test_full_pipeline() {
    logging::init_test();
    let estimator = EarthworkEstimator::default();

    let report = estimator.run(&scenario_input()).unwrap();

    // 修正层厚（场地平均地面高程 28.0 = 钻孔平均）
    assert!((report.site_ground_level_m - 28.0).abs() < 1e-9);
    assert!(report.thickness.ground_level_offset_m().abs() < 1e-9);
    assert!((report.thickness.modified.thickness(RockLayer::Landfill) - 21.475).abs() < 1e-9);

    // 区段命名: 平面与斜面共用编号
    let names: Vec<&str> = report.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["p-1", "s-2"]);
    assert_eq!(report.sections[1].title(), "S-북측");

    // 平面区段
    let plane = &report.sections[0];
    let volumes: Vec<i64> = plane.rows.iter().map(|r| r.volume_m3).collect();
    assert_eq!(volumes, vec![1066, 3513, 160, 1231]);

    // 斜面区段使用默认值（面积 18.01，开挖底高程 0.56 / 1.76）
    let slope = &report.sections[1];
    assert_eq!(slope.area_m2, 18.01);
    assert_eq!(slope.excavation_levels_m, vec![0.56, 1.76]);
    assert!((slope.rows[4].thickness_m - 1.2).abs() < 1e-6);

    // 汇总
    assert_eq!(report.summary.plane.total_volume_m3, plane.subtotal_m3());
    assert_eq!(report.summary.slope.total_volume_m3, slope.subtotal_m3());
    assert_eq!(
        report.summary.grand_total_volume_m3,
        plane.subtotal_m3() + slope.subtotal_m3()
    );

    // 校验
    assert_eq!(report.validations.len(), 2);
    assert!(report.all_valid());
    assert_eq!(report.validations[1].phases.len(), 2);
}

#[test]
fn test_pipeline_from_files() {
    let boreholes = write_temp_csv(
        "구분,지반고,매립층,풍화토,풍화암,연암\nBH-1,28.0,20.0,1.475,0.75,7.8\n",
    )
    .unwrap();
    let ground_levels = write_temp_csv("27.0,29.0\n28.0\n").unwrap();

    let importer = BoreholeImporter::new();
    let borehole_import = importer.import_boreholes(boreholes.path()).unwrap();
    let ground_import = importer.import_ground_levels(ground_levels.path()).unwrap();

    let input = EstimateInput {
        boreholes: borehole_import.records,
        ground_levels: ground_import.survey,
        sections: vec![SectionInput::plane()],
        ..Default::default()
    };
    let report = EarthworkEstimator::default().run(&input).unwrap();

    assert!((report.site_ground_level_m - 28.0).abs() < 1e-9);
    // 默认平面区段: 28.05 + 0.56 = 28.61
    let total: f64 = report.sections[0].rows.iter().map(|r| r.thickness_m).sum();
    assert!((total - 28.61).abs() < 1e-6);
}

#[test]
fn test_empty_survey_falls_back_to_borehole_level() {
    let input = EstimateInput {
        boreholes: scenario_boreholes(),
        ground_levels: GroundLevelSurvey::default(),
        ..Default::default()
    };

    let report = EarthworkEstimator::default().run(&input).unwrap();

    assert_eq!(report.site_ground_level_m, 28.0);
    let expected = scenario_profile();
    for layer in [RockLayer::Landfill, RockLayer::WeatheredRock, RockLayer::SoftRock] {
        assert!((report.thickness.modified.thickness(layer) - expected.thickness(layer)).abs() < 1e-9);
    }
    assert!(report.sections.is_empty());
    assert_eq!(report.summary.grand_total_volume_m3, 0);
}

#[test]
fn test_no_boreholes_does_not_fail() {
    let input = EstimateInput {
        sections: vec![SectionInput::plane()],
        ..Default::default()
    };

    let report = EarthworkEstimator::default().run(&input).unwrap();

    assert_eq!(report.geology.averages.borehole_count, 0);
    assert_eq!(report.thickness.modified.total_m(), 0.0);
    // 剖面合计为 0 时연암吸收首行以外的全部深度
    let rows = &report.sections[0].rows;
    assert!((rows.iter().map(|r| r.thickness_m).sum::<f64>() - 28.61).abs() < 1e-6);
}

#[test]
fn test_invalid_section_input_rejected() {
    let input = EstimateInput {
        boreholes: scenario_boreholes(),
        sections: vec![SectionInput {
            area_m2: Some(-5.0),
            ..SectionInput::plane()
        }],
        ..Default::default()
    };

    let result = EarthworkEstimator::default().run(&input);
    assert!(matches!(result, Err(EstimateError::InvalidArea { .. })));
}

#[test]
fn test_first_row_override() {
    let estimator = EarthworkEstimator::default();
    let input = SectionInput {
        original_ground_level_m: Some(27.44),
        first_row_thickness_m: Some(8.0),
        ..SectionInput::plane()
    };

    let section = estimator
        .create_section(&[], &input, &scenario_profile())
        .unwrap();

    assert_eq!(section.rows[0].thickness_m, 8.0);
    assert!(section.rows[0].split.is_manual());
    assert!((section.rows[1].thickness_m - 13.475).abs() < 1e-6);
}

#[test]
fn test_settings_from_config() {
    let config = ConfigManager::new();
    config.set_config_value(config_keys::PLANE_AREA_M2, "100");
    config.set_config_value(config_keys::VALIDATION_MODE, "TOTAL_AND_PER_LAYER");
    config.set_config_value(config_keys::FIRST_ROW_THICKNESS_M, "3.0");

    let estimator = EarthworkEstimator::from_config(&config);
    assert_eq!(estimator.settings().validation_mode, ValidationMode::TotalAndPerLayer);

    let report = estimator
        .run(&EstimateInput {
            boreholes: scenario_boreholes(),
            ground_levels: GroundLevelSurvey::from_values(vec![28.0]),
            sections: vec![SectionInput::plane()],
            ..Default::default()
        })
        .unwrap();

    let section = &report.sections[0];
    assert_eq!(section.area_m2, 100.0);
    assert_eq!(section.rows[0].thickness_m, 3.0);
    // 开挖深度 28.61 小于剖面合计 30.025，연암未挖完，严格模式不通过
    assert!(!report.all_valid());
}

#[test]
fn test_recompute_through_estimator() {
    let estimator = EarthworkEstimator::new(EstimateSettings::default());
    let profile = scenario_profile();
    let section = estimator
        .create_section(&[], &SectionInput::plane(), &profile)
        .unwrap();

    let next = estimator
        .recompute(
            &section,
            &profile,
            SectionChange::Terrain {
                terrain: TerrainType::Slope,
                defaults: estimator.settings().layout_defaults(),
            },
        )
        .unwrap();
    assert_eq!(next.rows.len(), 5);

    let validation = estimator.validate_section(&next, &profile);
    assert!(validation.pass);
}

#[test]
fn test_report_serializes_to_json() {
    let report = EarthworkEstimator::default().run(&scenario_input()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sections"][0]["name"], "p-1");
    assert_eq!(json["sections"][0]["rows"][0]["split"]["mode"], "MANUAL");
    assert!(json["generated_at"].is_string());
}
