//! 수익률 테이블 단위의 성과 분석기.

use factor_core::{PriceTable, ReturnTable, TimeTable};
use tracing::{debug, instrument};

use super::metrics::{
    annualized_return, annualized_volatility, cumulative_returns, drawdown_series, max_drawdown,
    sharpe_ratio, sortino_ratio, total_return, PerformanceRow, PerformanceSummary,
};
use super::rolling::{rolling_metric, RollingMetric};
use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::error::Result;

/// 정규화 가격의 시작값.
pub const NORMALIZED_BASE: f64 = 100.0;

/// 일간 수익률 테이블에 대한 성과 분석기.
///
/// 가격 기반 지표(낙폭)는 수익률을 100에서부터 복리로 누적한 정규화 가격으로 계산합니다.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    returns: ReturnTable,
    normalized: PriceTable,
    trading_days: u32,
}

impl PerformanceAnalyzer {
    pub fn new(returns: ReturnTable, trading_days: u32) -> Self {
        let normalized = returns.compound_prices(NORMALIZED_BASE);
        Self {
            returns,
            normalized,
            trading_days,
        }
    }

    pub fn returns(&self) -> &ReturnTable {
        &self.returns
    }

    /// 100에서 시작하는 정규화 가격.
    pub fn normalized_prices(&self) -> &PriceTable {
        &self.normalized
    }

    pub fn trading_days(&self) -> u32 {
        self.trading_days
    }

    /// 날짜별 누적 수익률 테이블.
    pub fn cumulative_returns(&self) -> Result<TimeTable> {
        Ok(self.returns.map_columns(cumulative_returns)?)
    }

    /// 날짜별 낙폭 테이블.
    pub fn drawdowns(&self) -> Result<TimeTable> {
        Ok(self.normalized.map_columns(drawdown_series)?)
    }

    /// 자산별 최대 낙폭.
    pub fn max_drawdowns(&self) -> Vec<(String, f64)> {
        self.normalized
            .iter_columns()
            .map(|(name, prices)| (name.to_string(), max_drawdown(prices)))
            .collect()
    }

    /// 자산별 연율화 수익률.
    pub fn annualized_returns(&self) -> Vec<(String, f64)> {
        self.per_asset(|r| annualized_return(r, self.trading_days))
    }

    /// 자산별 연율화 변동성.
    pub fn annualized_volatilities(&self) -> Vec<(String, f64)> {
        self.per_asset(|r| annualized_volatility(r, self.trading_days))
    }

    /// 자산별 샤프 비율. 변동성이 0이면 `NaN`.
    pub fn sharpe_ratios(&self, risk_free_rate: f64) -> Vec<(String, f64)> {
        self.per_asset(|r| sharpe_ratio(r, risk_free_rate, self.trading_days))
    }

    /// 자산별 소르티노 비율. 하방 편차가 0이거나 정의되지 않으면 `NaN`.
    pub fn sortino_ratios(&self, risk_free_rate: f64) -> Vec<(String, f64)> {
        self.per_asset(|r| sortino_ratio(r, risk_free_rate, self.trading_days))
    }

    /// 수익률 상관행렬.
    pub fn correlation_matrix(&self) -> CorrelationMatrix {
        correlation_matrix(&self.returns)
    }

    /// 롤링 지표 테이블.
    pub fn rolling(&self, metric: RollingMetric, window: usize) -> Result<TimeTable> {
        let columns = self
            .returns
            .iter_columns()
            .map(|(name, r)| Ok((name.to_string(), rolling_metric(r, metric, window, self.trading_days)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(TimeTable::new(self.returns.dates().to_vec(), columns)?)
    }

    /// 지표 이름(`volatility`, `return`, `sharpe`)으로 롤링 지표를 계산합니다.
    ///
    /// 그 밖의 이름은 `InvalidMetric`입니다.
    pub fn rolling_by_name(&self, metric: &str, window: usize) -> Result<TimeTable> {
        self.rolling(metric.parse()?, window)
    }

    /// 자산별 성과 요약.
    #[instrument(skip(self), fields(assets = self.returns.n_cols(), rows = self.returns.n_rows()))]
    pub fn performance_summary(&self, risk_free_rate: f64) -> PerformanceSummary {
        let rows = self
            .returns
            .iter_columns()
            .zip(self.normalized.iter_columns())
            .map(|((name, r), (_, prices))| PerformanceRow {
                asset: name.to_string(),
                total_return: total_return(r),
                annualized_return: annualized_return(r, self.trading_days),
                annualized_volatility: annualized_volatility(r, self.trading_days),
                sharpe_ratio: sharpe_ratio(r, risk_free_rate, self.trading_days),
                sortino_ratio: sortino_ratio(r, risk_free_rate, self.trading_days),
                max_drawdown: max_drawdown(prices),
            })
            .collect::<Vec<_>>();

        debug!(rows = rows.len(), "성과 요약 계산 완료");
        PerformanceSummary { rows }
    }

    fn per_asset(&self, f: impl Fn(&[f64]) -> f64) -> Vec<(String, f64)> {
        self.returns
            .iter_columns()
            .map(|(name, r)| (name.to_string(), f(r)))
            .collect()
    }
}
