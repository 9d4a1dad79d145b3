//! 오프라인(합성 데이터) 모드로 전체 분석 명령을 실행합니다.

use chrono::NaiveDate;

use factor_cli::commands::analyze::{resolve_period, run_analysis, AnalyzeOptions};
use factor_core::AppConfig;

fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.data.offline = true;
    config.analysis.rolling_window = 63;
    config
}

#[tokio::test]
async fn test_offline_analysis_writes_all_charts() {
    let config = offline_config();
    let dir = tempfile::tempdir().unwrap();
    let period = resolve_period(
        &config,
        Some("01/01/2021"),
        Some("31/12/2022"),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    )
    .unwrap();
    let options = AnalyzeOptions {
        period,
        output_dir: dir.path().to_path_buf(),
        show_progress: false,
    };

    let outcome = run_analysis(&config, &options).await.unwrap();

    let mut stems: Vec<String> = outcome
        .files
        .iter()
        .map(|p| p.file_stem().unwrap().to_string_lossy().to_string())
        .collect();
    stems.sort();
    assert_eq!(
        stems,
        vec![
            "factor_correlation_matrix",
            "factor_cumulative_returns",
            "factor_drawdowns",
            "factor_performance_summary",
            "factor_rolling_volatility",
            "factor_sharpe_comparison",
            "geography_allocation_pie",
            "geography_correlation_matrix",
            "geography_performance",
            "geography_sharpe_comparison",
        ]
    );
    assert!(outcome.files.iter().all(|p| p.exists()));

    // 오프라인 모드는 전부 합성 데이터
    assert!(outcome.degraded);
    assert_eq!(outcome.factors.summary.rows.len(), 4);
    assert_eq!(outcome.geography.summary.len(), 3);
    assert!(outcome.geography.best.is_some());
}

#[tokio::test]
async fn test_offline_analysis_is_reproducible() {
    let config = offline_config();
    let period = resolve_period(
        &config,
        Some("01/06/2022"),
        Some("31/12/2022"),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    )
    .unwrap();

    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let run = |dir: &tempfile::TempDir| AnalyzeOptions {
        period,
        output_dir: dir.path().to_path_buf(),
        show_progress: false,
    };

    let first = run_analysis(&config, &run(&first_dir)).await.unwrap();
    let second = run_analysis(&config, &run(&second_dir)).await.unwrap();

    assert_eq!(first.factors.summary, second.factors.summary);
    assert_eq!(first.geography.summary, second.geography.summary);
}
