//! 합성 데이터로 로드부터 차트 출력까지 전체 분석 파이프라인을 검증합니다.

use chrono::NaiveDate;
use proptest::prelude::*;
use std::sync::Arc;

use factor_analytics::portfolio::{
    factor_correlation_matrix, factor_cumulative_returns, factor_drawdowns,
    factor_performance_summary, factor_rolling_volatility, factor_sharpe_comparison,
    geography_allocation_pie, geography_correlation_matrix, geography_performance,
    geography_sharpe_comparison,
};
use factor_analytics::performance::metrics::drawdown_series;
use factor_analytics::{ChartRenderer, FactorAnalyzer, GeographyAnalyzer, JsonChartWriter};
use factor_core::{AnalysisPeriod, AppConfig, AssetGroup, PriceTable};
use factor_data::{DataLoader, SyntheticSource};

fn period() -> AnalysisPeriod {
    AnalysisPeriod::new(
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .unwrap()
}

async fn load(config: &AppConfig, group: AssetGroup) -> PriceTable {
    let source = SyntheticSource::new(config.data.synthetic).unwrap();
    DataLoader::new(Arc::new(source), config.currency.clone())
        .load_prices(config.universe.assets(group), &period())
        .await
        .unwrap()
        .prices
}

#[tokio::test]
async fn test_factor_pipeline_writes_charts() {
    let config = AppConfig::default();
    let prices = load(&config, AssetGroup::Factors).await;
    assert_eq!(prices.n_cols(), 4);

    let analyzer = FactorAnalyzer::new(
        prices,
        config.analysis.risk_free_rate,
        config.analysis.trading_days_per_year,
    )
    .unwrap();
    let report = analyzer.report();
    assert_eq!(
        report.summary.assets(),
        vec!["Value", "Momentum", "Quality", "Low Volatility"]
    );
    assert!(report.summary.rows.iter().all(|r| r.max_drawdown <= 0.0));
    assert!(report.summary.rows.iter().all(|r| r.sharpe_ratio.is_finite()));
    assert!(report.diversification_ratio > 1.0);

    let performance = analyzer.performance();
    let charts = vec![
        factor_cumulative_returns(performance).unwrap(),
        factor_drawdowns(performance).unwrap(),
        factor_correlation_matrix(&report.correlation),
        factor_performance_summary(&report.summary),
        factor_sharpe_comparison(&report.summary),
        factor_rolling_volatility(performance, config.analysis.rolling_window).unwrap(),
    ];

    let dir = tempfile::tempdir().unwrap();
    let writer = JsonChartWriter::new(dir.path());
    for chart in &charts {
        let path = writer.render(chart).unwrap();
        assert!(path.exists());
    }
    assert!(dir.path().join("factor_rolling_volatility.json").exists());
    assert!(dir.path().join("factor_correlation_matrix.json").exists());
}

#[tokio::test]
async fn test_geography_pipeline() {
    let config = AppConfig::default();
    let prices = load(&config, AssetGroup::Geography).await;
    let analyzer = GeographyAnalyzer::new(
        prices,
        config.analysis.risk_free_rate,
        config.analysis.trading_days_per_year,
    )
    .unwrap();

    let summary = analyzer.geographic_summary();
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|r| r.max_drawdown_pct <= 0.0));

    let shares: f64 = analyzer.regional_contribution().iter().map(|(_, v)| v).sum();
    assert!((shares - 100.0).abs() < 1e-9);

    let (best, worst) = analyzer.best_and_worst().unwrap();
    assert!(best.period_return >= worst.period_return);

    let correlations = analyzer.regional_correlations();
    for region in &correlations.assets {
        assert_eq!(correlations.get(region, region), Some(1.0));
    }

    let dir = tempfile::tempdir().unwrap();
    let writer = JsonChartWriter::new(dir.path());
    writer.render(&geography_performance(&analyzer).unwrap()).unwrap();
    writer.render(&geography_allocation_pie(&analyzer)).unwrap();
    writer.render(&geography_correlation_matrix(&correlations)).unwrap();
    writer
        .render(&geography_sharpe_comparison(&analyzer.risk_adjusted_returns()))
        .unwrap();

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 4);
}

#[tokio::test]
async fn test_reruns_are_identical() {
    let config = AppConfig::default();
    let first = load(&config, AssetGroup::Geography).await;
    let second = load(&config, AssetGroup::Geography).await;
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn prop_drawdown_never_positive(prices in prop::collection::vec(1.0f64..1000.0, 1..200)) {
        let dd = drawdown_series(&prices);
        let mut peak = f64::NEG_INFINITY;
        for (p, d) in prices.iter().zip(dd.iter()) {
            prop_assert!(*d <= 0.0);
            peak = peak.max(*p);
            if *p == peak {
                prop_assert_eq!(*d, 0.0);
            }
        }
    }
}
