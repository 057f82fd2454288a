// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成柱状图与平均地面高程测试数据集
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 柱状图表头（TYPE1 列名）
const BOREHOLE_HEADER: &[&str] = &["구분", "지반고", "매립층", "풍화토", "풍화암", "연암"];
const BOREHOLE_HEADER_WITH_HARD_ROCK: &[&str] =
    &["구분", "지반고", "매립층", "풍화토", "풍화암", "연암", "경암"];

// 钻孔记录
struct BoreholeRow {
    name: String,
    ground_level: String,
    landfill: String,
    weathered_soil: String,
    weathered_rock: String,
    soft_rock: String,
    hard_rock: Option<String>,
}

impl BoreholeRow {
    fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.name.clone(),
            self.ground_level.clone(),
            self.landfill.clone(),
            self.weathered_soil.clone(),
            self.weathered_rock.clone(),
            self.soft_rock.clone(),
        ];
        if let Some(hard_rock) = &self.hard_rock {
            row.push(hard_rock.clone());
        }
        row
    }
}

// 生成正常钻孔记录（地面高程在 27.0 ~ 29.0 之间波动）
fn generate_normal_borehole(index: usize) -> BoreholeRow {
    BoreholeRow {
        name: format!("BH-{}", index + 1),
        ground_level: format!("{:.2}", 27.0 + (index % 5) as f64 * 0.5),
        landfill: format!("{:.2}", 18.0 + (index % 4) as f64 * 0.8),
        weathered_soil: format!("{:.2}", 1.0 + (index % 3) as f64 * 0.4),
        weathered_rock: format!("{:.2}", 0.5 + (index % 2) as f64 * 0.5),
        soft_rock: format!("{:.2}", 7.0 + (index % 6) as f64 * 0.3),
        hard_rock: None,
    }
}

fn create_writer(file_name: &str) -> Result<Writer<File>> {
    let path = format!("{}/{}", OUTPUT_DIR, file_name);
    let file = File::create(&path).with_context(|| format!("无法创建 {}", path))?;
    Ok(Writer::from_writer(file))
}

fn main() -> Result<()> {
    println!("开始生成测试数据集...");

    fs::create_dir_all(OUTPUT_DIR).with_context(|| format!("无法创建目录 {}", OUTPUT_DIR))?;

    // 1. 正常柱状图 (20个钻孔)
    generate_normal_boreholes()?;

    // 2. 含경암列的柱状图
    generate_hard_rock_boreholes()?;

    // 3. 含无法解析数值/空编号的柱状图
    generate_dirty_boreholes()?;

    // 4. 平均地面高程（无表头网格）
    generate_ground_levels()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_normal_boreholes() -> Result<()> {
    let mut wtr = create_writer("01_boreholes_normal.csv")?;
    wtr.write_record(BOREHOLE_HEADER)?;

    for i in 0..20 {
        wtr.write_record(&generate_normal_borehole(i).to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_boreholes_normal.csv (20条)");
    Ok(())
}

fn generate_hard_rock_boreholes() -> Result<()> {
    let mut wtr = create_writer("02_boreholes_hard_rock.csv")?;
    wtr.write_record(BOREHOLE_HEADER_WITH_HARD_ROCK)?;

    for i in 0..10 {
        let mut row = generate_normal_borehole(i + 100);
        // 半数钻孔未钻到경암
        row.hard_rock = Some(if i % 2 == 0 {
            format!("{:.2}", 2.0 + i as f64 * 0.1)
        } else {
            String::new()
        });
        wtr.write_record(&row.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 02_boreholes_hard_rock.csv (10条)");
    Ok(())
}

fn generate_dirty_boreholes() -> Result<()> {
    let mut wtr = create_writer("03_boreholes_dirty.csv")?;
    wtr.write_record(BOREHOLE_HEADER)?;

    let rows = vec![
        generate_normal_borehole(0).to_row(),
        // 带单位的数值（仅解析前导数值）
        vec!["BH-2", "28.1m", "19.5", "1.2", "0.8", "7.4"]
            .into_iter()
            .map(String::from)
            .collect(),
        // 无法解析的数值
        vec!["BH-3", "27.6", "N/A", "1.0", "-", "7.9"]
            .into_iter()
            .map(String::from)
            .collect(),
        // 空编号
        vec!["", "28.3", "20.1", "1.1", "0.6", "7.2"]
            .into_iter()
            .map(String::from)
            .collect(),
    ];
    for row in &rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    println!("✓ 生成 03_boreholes_dirty.csv ({}条)", rows.len());
    Ok(())
}

fn generate_ground_levels() -> Result<()> {
    let path = format!("{}/04_ground_levels.csv", OUTPUT_DIR);
    let file = File::create(&path).with_context(|| format!("无法创建 {}", path))?;
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(file);

    let mut count = 0;
    for line in 0..6 {
        let width = 3 + line % 3;
        let row: Vec<String> = (0..width)
            .map(|col| format!("{:.2}", 27.5 + ((line * 7 + col * 3) % 10) as f64 * 0.1))
            .collect();
        count += row.len();
        wtr.write_record(&row)?;
    }
    // 非数值单元格（导入时跳过）
    wtr.write_record(["비고", ""])?;

    wtr.flush()?;
    println!("✓ 生成 04_ground_levels.csv ({}个测点)", count);
    Ok(())
}
