//! 팩터/지역 ETF 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 기간 (설정 파일의 시작일 ~ 오늘)
//! factor
//!
//! # 기간 지정 (DD/MM/YYYY)
//! factor --start-date 01/01/2015
//! factor -s 15/06/2018 -e 15/06/2023
//!
//! # 설정 파일과 출력 디렉터리 지정, JSON 로그
//! factor -c config/default.toml -o output --log-format json
//! ```
//!
//! 모든 수익률은 EUR 기준입니다.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use factor_cli::commands::analyze::{resolve_period, run_analysis, AnalyzeOptions};
use factor_cli::commands::report::{
    format_correlation, format_diversification_ratio, format_generated_files,
    format_geographic_summary, format_header, format_performance_summary, format_performers,
    format_section,
};
use factor_core::{init_logging, AppConfig, LogConfig, LogFormat, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "factor")]
#[command(about = "Factor Investing Analyzer - 팩터/지역 ETF 성과 분석 (EUR 기준)", long_about = None)]
#[command(version)]
struct Cli {
    /// 분석 시작일 (DD/MM/YYYY, 기본: 설정 파일)
    #[arg(short, long, value_name = "DD/MM/YYYY")]
    start_date: Option<String>,

    /// 분석 종료일 (DD/MM/YYYY, 기본: 오늘)
    #[arg(short, long, value_name = "DD/MM/YYYY")]
    end_date: Option<String>,

    /// 설정 파일 경로
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 출력 디렉터리 (기본: 설정 파일의 output.dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 네트워크 없이 합성 데이터만 사용
    #[arg(long)]
    offline: bool,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => AppConfig::load_default()
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_PATH))?,
    };
    if cli.offline {
        config.data.offline = true;
    }
    if let Some(dir) = &cli.output {
        config.output.dir = dir.display().to_string();
    }
    Ok(config)
}

fn log_format_override(cli: &Cli) -> Result<Option<LogFormat>> {
    cli.log_format
        .as_deref()
        .map(|f| f.parse::<LogFormat>().map_err(|e| anyhow!(e)))
        .transpose()
}

fn init_tracing(cli: &Cli, config: &AppConfig) -> Result<()> {
    let mut log_config =
        LogConfig::from_config(&config.logging).context("Invalid [logging] section")?;
    if let Some(format) = log_format_override(cli)? {
        log_config = log_config.with_format(format);
    }
    init_logging(log_config).context("Failed to initialize logging")
}

async fn run(cli: Cli) -> Result<()> {
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            // 설정 없이도 실패 원인을 기록할 수 있도록 환경 변수 기반 로깅을 설치
            let mut log_config = LogConfig::from_env();
            if let Ok(Some(format)) = log_format_override(&cli) {
                log_config = log_config.with_format(format);
            }
            let _ = init_logging(log_config);
            return Err(e);
        }
    };
    init_tracing(&cli, &config)?;

    let today = Local::now().date_naive();
    let period = resolve_period(
        &config,
        cli.start_date.as_deref(),
        cli.end_date.as_deref(),
        today,
    )?;
    let options = AnalyzeOptions {
        period,
        output_dir: PathBuf::from(&config.output.dir),
        show_progress: true,
    };

    println!("{}", format_header(&period, config.analysis.risk_free_rate));

    let outcome = run_analysis(&config, &options).await?;

    println!("{}", format_section("FACTOR ANALYSIS"));
    println!("\n--- Factor Performance Summary ---");
    println!("{}", format_performance_summary(&outcome.factors.summary));
    println!("\n--- Factor Correlation Matrix ---");
    println!("{}", format_correlation(&outcome.factors.correlation));

    let geography = &outcome.geography;
    println!("{}", format_section("GEOGRAPHIC ANALYSIS"));
    println!("\n--- Geographic Performance Summary ---");
    println!("{}", format_geographic_summary(&geography.summary));
    println!(
        "\n{}",
        format_performers(geography.best.as_ref(), geography.worst.as_ref())
    );
    println!("\n--- Regional Correlation Matrix ---");
    println!("{}", format_correlation(&geography.correlation));
    println!("\n{}", format_diversification_ratio(geography.diversification_ratio));

    println!("{}", format_section("ANALYSIS COMPLETE"));
    println!("\nAll outputs saved to: {}", options.output_dir.display());
    if outcome.degraded {
        println!("(일부 결과는 합성 데이터 또는 고정 환율 기반입니다)");
    }
    println!("\n{}", format_generated_files(&outcome.files));

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("분석 실패: {:#}", e);
            eprintln!("\nERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
