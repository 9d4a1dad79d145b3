//! 분석 명령어.
//!
//! 팩터와 지역 ETF의 가격을 로드하고 통계를 계산한 뒤 차트 데이터를 출력 디렉터리에 기록합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 설정 파일의 기본 기간으로 분석
//! factor
//!
//! # 기간 지정 (일/월/연도)
//! factor -s 01/01/2015 -e 31/12/2020
//!
//! # 네트워크 없이 합성 데이터로 분석
//! factor --offline -o /tmp/factor-output
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Instrument};

use factor_analytics::portfolio::{
    factor_correlation_matrix, factor_cumulative_returns, factor_drawdowns,
    factor_performance_summary, factor_rolling_volatility, factor_sharpe_comparison,
    geography_allocation_pie, geography_correlation_matrix, geography_performance,
    geography_sharpe_comparison,
};
use factor_analytics::{
    Chart, ChartRenderer, CorrelationMatrix, FactorAnalyzer, FactorReport, GeographicRow,
    GeographyAnalyzer, JsonChartWriter, Performer,
};
use factor_core::{
    analysis_span, parse_day_month_year, AnalysisPeriod, AppConfig, AssetGroup, PeriodConfig,
};
use factor_data::{select_source, DataLoader, LoadedPrices};

/// 명령행 날짜를 파싱합니다. 실패하면 파라미터 이름과 기대 형식을 알려줍니다.
pub fn parse_cli_date(value: &str, parameter: &str) -> Result<NaiveDate> {
    parse_day_month_year(value)
        .with_context(|| format!("Invalid {}: '{}'. Expected DD/MM/YYYY", parameter, value))
}

/// 명령행 인자와 설정으로 분석 기간을 확정합니다.
///
/// 시작일이 없으면 설정값, 종료일이 없으면 설정값 또는 `today`를 사용합니다.
pub fn resolve_period(
    config: &AppConfig,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<AnalysisPeriod> {
    let period = PeriodConfig {
        start_date: match start {
            Some(s) => parse_cli_date(s, "--start-date")?,
            None => config.period.start_date,
        },
        end_date: match end {
            Some(s) => Some(parse_cli_date(s, "--end-date")?),
            None => config.period.end_date,
        },
    };
    period
        .resolve(today)
        .context("Start date must be before end date")
}

/// 분석 실행 옵션.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub period: AnalysisPeriod,
    pub output_dir: PathBuf,
    /// 로드 중 스피너 표시 여부
    pub show_progress: bool,
}

/// 지역 분석 결과.
#[derive(Debug, Clone)]
pub struct GeographyOutcome {
    pub summary: Vec<GeographicRow>,
    pub best: Option<Performer>,
    pub worst: Option<Performer>,
    pub correlation: CorrelationMatrix,
    pub diversification_ratio: f64,
}

/// 전체 분석 결과.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub factors: FactorReport,
    pub geography: GeographyOutcome,
    /// 생성된 차트 파일
    pub files: Vec<PathBuf>,
    /// 합성 데이터나 고정 환율을 사용했는지 여부
    pub degraded: bool,
}

/// 분석 파이프라인을 실행합니다.
pub async fn run_analysis(config: &AppConfig, options: &AnalyzeOptions) -> Result<AnalysisOutcome> {
    let source = select_source(&config.data).context("Failed to build price source")?;
    let loader = DataLoader::new(source, config.currency.clone())
        .with_parallel_fetch(config.data.parallel_fetch);
    let writer = JsonChartWriter::new(options.output_dir.clone());
    let rf = config.analysis.risk_free_rate;
    let trading_days = config.analysis.trading_days_per_year;

    let mut files = Vec::new();

    // ==================== 팩터 ====================
    let factor_prices = load_group(&loader, config, AssetGroup::Factors, options).await?;
    let factor_analyzer = FactorAnalyzer::new(factor_prices.prices.clone(), rf, trading_days)
        .context("Cannot analyze factors")?;
    let factors = factor_analyzer.report();

    let performance = factor_analyzer.performance();
    let factor_charts = vec![
        factor_cumulative_returns(performance)?,
        factor_drawdowns(performance)?,
        factor_correlation_matrix(&factors.correlation),
        factor_performance_summary(&factors.summary),
        factor_sharpe_comparison(&factors.summary),
        factor_rolling_volatility(performance, config.analysis.rolling_window)?,
    ];
    files.extend(render_all(&writer, &factor_charts)?);

    // ==================== 지역 ====================
    let geo_prices = load_group(&loader, config, AssetGroup::Geography, options).await?;
    let geo_analyzer = GeographyAnalyzer::new(geo_prices.prices.clone(), rf, trading_days)
        .context("Cannot analyze geography")?;
    let (best, worst) = match geo_analyzer.best_and_worst() {
        Some((best, worst)) => (Some(best), Some(worst)),
        None => (None, None),
    };
    let geography = GeographyOutcome {
        summary: geo_analyzer.geographic_summary(),
        best,
        worst,
        correlation: geo_analyzer.regional_correlations(),
        diversification_ratio: geo_analyzer.diversification_ratio(),
    };

    let geo_charts = vec![
        geography_performance(&geo_analyzer)?,
        geography_allocation_pie(&geo_analyzer),
        geography_correlation_matrix(&geography.correlation),
        geography_sharpe_comparison(&geo_analyzer.risk_adjusted_returns()),
    ];
    files.extend(render_all(&writer, &geo_charts)?);

    let degraded = factor_prices.is_degraded() || geo_prices.is_degraded();
    if degraded {
        warn!(
            synthetic_factors = factor_prices.synthetic_count(),
            synthetic_regions = geo_prices.synthetic_count(),
            factor_fx = %factor_prices.fx,
            geography_fx = %geo_prices.fx,
            "일부 결과가 합성 데이터 또는 고정 환율에 기반합니다"
        );
    }
    info!(files = files.len(), dir = %options.output_dir.display(), "분석 완료");

    Ok(AnalysisOutcome {
        factors,
        geography,
        files,
        degraded,
    })
}

async fn load_group(
    loader: &DataLoader,
    config: &AppConfig,
    group: AssetGroup,
    options: &AnalyzeOptions,
) -> Result<LoadedPrices> {
    let assets = config.universe.assets(group);
    let progress = options.show_progress.then(|| spinner(group, assets.len()));

    let result = loader
        .load_prices(assets, &options.period)
        .instrument(analysis_span!("load_group", group, assets.len()))
        .await
        .with_context(|| format!("Failed to load {} prices", group));

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let loaded = result?;

    for record in &loaded.provenance {
        if record.provenance.is_synthetic() {
            warn!(asset = %record.asset, provenance = %record.provenance, "합성 데이터 사용");
        }
    }
    info!(
        group = %group,
        assets = loaded.prices.n_cols(),
        rows = loaded.prices.n_rows(),
        fx = %loaded.fx,
        "가격 로드 완료"
    );
    Ok(loaded)
}

fn spinner(group: AssetGroup, assets: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Loading {} {} prices...", assets, group));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn render_all(writer: &JsonChartWriter, charts: &[Chart]) -> Result<Vec<PathBuf>> {
    charts
        .iter()
        .map(|chart| {
            writer
                .render(chart)
                .with_context(|| format!("Failed to write chart '{}'", chart.stem))
        })
        .collect()
}
