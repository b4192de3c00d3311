// ==========================================
// 历史库 CSV 批量清洗工具 - 命令行入口
// ==========================================
// 用法: historian-cleaner [选项] <文件>...
// 输出: 批次日志打印到 stdout, 清洗结果写入输出目录
// ==========================================

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use historian_cleaner::logging::{self, LogFormat};
use historian_cleaner::{
    BatchContext, CleanerConfig, Interval, OutputBundle, OutputFormat, OutputMode, UploadedFile,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "历史库 CSV 批量清洗工具", long_about = None)]
struct Cli {
    /// 历史库导出的原始 CSV 文件
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// 输出格式: csv / xlsx
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// 输出模式: separate / combined-separate-sheets / combined-master-sheet / combined-master-and-sheets
    #[arg(short, long)]
    mode: Option<OutputMode>,

    /// 时间粒度: 15-minute / 1-minute
    #[arg(short, long)]
    interval: Option<Interval>,

    /// 合并模式输出名（不含扩展名）
    #[arg(short, long)]
    name: Option<String>,

    /// 输出目录
    #[arg(short, long, default_value = ".", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// JSON 配置文件
    #[arg(short, long, env = "HISTORIAN_CLEANER_CONFIG", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// 多个输出文件时打包为 ZIP
    #[arg(long, action = ArgAction::SetTrue)]
    zip: bool,

    /// 以 JSON 格式输出诊断日志
    #[arg(long, action = ArgAction::SetTrue)]
    log_json: bool,
}

impl Cli {
    /// 默认值 < 配置文件 < 命令行
    fn resolve_config(&self) -> Result<CleanerConfig> {
        let mut config = match &self.config {
            Some(path) => CleanerConfig::from_json_file(path)
                .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
            None => CleanerConfig::default(),
        };
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(interval) = self.interval {
            config.interval = interval;
        }
        if let Some(name) = &self.name {
            config.base_name = name.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init_with(log_format, "info");

    info!("{} v{}", historian_cleaner::APP_NAME, historian_cleaner::VERSION);

    let config = cli.resolve_config()?;
    info!(
        format = %config.format,
        mode = %config.mode,
        interval = %config.interval,
        "配置加载完成"
    );

    let mut uploads = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match UploadedFile::from_path(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                error!(path = %path.display(), error = %e, "文件读取失败, 已跳过");
                println!("❌ {}: {}", path.display(), e);
            }
        }
    }

    let archive_name = config.archive_name.clone();
    let mut ctx = BatchContext::new(config);
    let result = ctx.run(&uploads);

    for line in ctx.log().lines() {
        println!("{}", line);
    }

    let bundle = result.context("批处理失败")?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("无法创建输出目录 {}", cli.out_dir.display()))?;

    let outputs = if cli.zip && matches!(bundle, OutputBundle::Multiple(_)) {
        vec![bundle.into_deliverable(&archive_name)?]
    } else {
        bundle.files().to_vec()
    };
    for output in &outputs {
        let path = output
            .write_to_dir(&cli.out_dir)
            .with_context(|| format!("写出 {} 失败", output.file_name))?;
        println!("📄 {}", path.display());
    }

    Ok(())
}
