// ==========================================
// 多文件合并端到端测试
// ==========================================
// 测试目标: 上传 → 批处理 → 输出字节 → 回读校验
//   - 总表: 重复时刻首个文件优先, 升序
//   - 总表 + 分表: sheet 数量与名称长度
// ==========================================


use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use historian_cleaner::exporter::{parse_cleaned_csv, MAX_SHEET_NAME_LEN};
use historian_cleaner::{
    BatchContext, BatchError, Cell, CleanerConfig, OutputBundle, OutputFormat, OutputMode,
};
use std::io::Cursor;
use test_helpers::{at, ExportBuilder};

fn config(format: OutputFormat, mode: OutputMode) -> CleanerConfig {
    CleanerConfig {
        format,
        mode,
        ..CleanerConfig::default()
    }
}

fn single_bytes(bundle: OutputBundle) -> Vec<u8> {
    match bundle {
        OutputBundle::Single(file) => file.bytes,
        OutputBundle::Multiple(files) => panic!("期望单个输出, 实际 {} 个", files.len()),
    }
}

#[test]
fn test_master_sheet_first_file_wins_on_shared_timestamps() {
    historian_cleaner::logging::init_test();

    let first = ExportBuilder::new()
        .group(
            "Site.Points.FIC101.Value",
            &[
                ("2024-01-15 09:00", "1"),
                ("2024-01-15 09:15", "2"),
                ("2024-01-15 09:30", "3"),
                ("2024-01-15 09:45", "4"),
            ],
        )
        .upload("line1.csv");
    let second = ExportBuilder::new()
        .group(
            "Site.Points.FIC101.Value",
            &[
                ("2024-01-15 09:00", "10"),
                ("2024-01-15 09:15", "20"),
                ("2024-01-15 09:30", "30"),
                ("2024-01-15 10:00", "50"),
            ],
        )
        .upload("line2.csv");

    let mut ctx = BatchContext::new(config(OutputFormat::Csv, OutputMode::CombinedMasterSheet));
    let bundle = ctx.run(&[first, second]).unwrap();
    assert_eq!(bundle.file_names(), vec!["Combined_File.csv"]);

    let master = parse_cleaned_csv(&single_bytes(bundle)).unwrap();
    assert_eq!(master.header(), vec!["datetime", "FIC101"]);
    assert_eq!(
        master.datetimes(),
        vec![
            at(15, 9, 0),
            at(15, 9, 15),
            at(15, 9, 30),
            at(15, 9, 45),
            at(15, 10, 0)
        ]
    );
    assert_eq!(master.value(at(15, 9, 0), "FIC101"), Some(&Cell::Number(1.0)));
    assert_eq!(master.value(at(15, 9, 15), "FIC101"), Some(&Cell::Number(2.0)));
    assert_eq!(master.value(at(15, 9, 30), "FIC101"), Some(&Cell::Number(3.0)));
    assert_eq!(master.value(at(15, 9, 45), "FIC101"), Some(&Cell::Number(4.0)));
    assert_eq!(master.value(at(15, 10, 0), "FIC101"), Some(&Cell::Number(50.0)));
}

/// 跨文件同一时刻的冲突: 整行取首个文件, 后续文件同一时刻的其他列不补入
#[test]
fn test_conflicting_timestamp_keeps_first_row_whole() {
    let first = ExportBuilder::new()
        .group("Site.Points.FIC101.Value", &[("2024-01-15 09:00", "1")])
        .upload("a.csv");
    let second = ExportBuilder::new()
        .group("Site.Points.FIC101.Value", &[("2024-01-15 09:00", "99")])
        .group("Site.Points.TIC200.Value", &[("2024-01-15 09:00", "42")])
        .upload("b.csv");

    let mut ctx = BatchContext::new(config(OutputFormat::Csv, OutputMode::CombinedMasterSheet));
    let master = parse_cleaned_csv(&single_bytes(ctx.run(&[first, second]).unwrap())).unwrap();

    assert_eq!(master.header(), vec!["datetime", "FIC101", "TIC200"]);
    assert_eq!(master.len(), 1);
    assert_eq!(master.value(at(15, 9, 0), "FIC101"), Some(&Cell::Number(1.0)));
    assert_eq!(master.value(at(15, 9, 0), "TIC200"), Some(&Cell::Missing));
}

#[test]
fn test_master_and_sheets_workbook_layout() {
    let long_a = "Historian_Export_Compressor_Station_North_2024.csv";
    let long_b = "Historian_Export_Compressor_Station_South_2024.csv";
    let first = ExportBuilder::new()
        .group("Site.Points.FIC101.Value", &[("2024-01-15 09:00", "1")])
        .upload(long_a);
    let second = ExportBuilder::new()
        .group("Site.Points.TIC200.Value", &[("2024-01-15 09:15", "2")])
        .upload(long_b);

    let mut ctx = BatchContext::new(config(
        OutputFormat::Xlsx,
        OutputMode::CombinedMasterAndSheets,
    ));
    let bundle = ctx.run(&[first, second]).unwrap();
    assert_eq!(bundle.file_names(), vec!["Combined_File.xlsx"]);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(single_bytes(bundle))).unwrap();
    let names = workbook.sheet_names();

    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "Master Sheet");
    assert!(names.iter().all(|n| n.chars().count() <= MAX_SHEET_NAME_LEN));
    assert_ne!(names[1], names[2]);

    let master = workbook.worksheet_range("Master Sheet").unwrap();
    assert_eq!(master.height(), 3);
    assert_eq!(master.get_value((0, 0)), Some(&Data::String("datetime".to_string())));
    assert_eq!(master.get_value((0, 2)), Some(&Data::String("TIC200".to_string())));
    assert_eq!(master.get_value((1, 1)), Some(&Data::Float(1.0)));
}

#[test]
fn test_separate_sheets_mode_one_sheet_per_file() {
    let first = ExportBuilder::new()
        .group("Site.Points.FIC101.Value", &[("2024-01-15 09:00", "1")])
        .upload("a.csv");
    let second = ExportBuilder::new()
        .group("Site.Points.TIC200.Value", &[("2024-01-15 09:00", "2")])
        .upload("b.csv");

    let mut ctx = BatchContext::new(config(
        OutputFormat::Xlsx,
        OutputMode::CombinedSeparateSheets,
    ));
    let bytes = single_bytes(ctx.run(&[first, second]).unwrap());

    let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["a.csv".to_string(), "b.csv".to_string()]);
}

#[test]
fn test_no_cleaned_file_is_batch_failure() {
    let bad = ExportBuilder::new()
        .group("Site.Points.FIC101.Value", &[("garbage", "1")])
        .upload("bad.csv");

    let mut ctx = BatchContext::new(config(OutputFormat::Xlsx, OutputMode::CombinedMasterSheet));
    let err = ctx.run(&[bad]).unwrap_err();

    assert!(matches!(err, BatchError::Aggregate(_)));
    assert!(ctx.processed().is_empty());
}
