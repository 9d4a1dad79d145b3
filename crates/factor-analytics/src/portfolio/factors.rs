//! 팩터 ETF 분석기.

use factor_core::PriceTable;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::cross_section::{
    best_and_worst, contribution, diversification_ratio, ensure_price_history, Performer,
};
use crate::correlation::CorrelationMatrix;
use crate::error::Result;
use crate::performance::analyzer::PerformanceAnalyzer;
use crate::performance::metrics::PerformanceSummary;

/// 팩터 분석 보고서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorReport {
    pub summary: PerformanceSummary,
    pub correlation: CorrelationMatrix,
    pub best: Option<Performer>,
    pub worst: Option<Performer>,
    pub diversification_ratio: f64,
    /// 최종 가격 기준 비중 (%)
    pub allocation: Vec<(String, f64)>,
}

/// 성과 분석기에 횡단면 지표를 더한 팩터 분석기.
#[derive(Debug, Clone)]
pub struct FactorAnalyzer {
    prices: PriceTable,
    performance: PerformanceAnalyzer,
    risk_free_rate: f64,
}

impl FactorAnalyzer {
    /// 가격 행이 두 개 미만이면 `InsufficientData`.
    pub fn new(prices: PriceTable, risk_free_rate: f64, trading_days: u32) -> Result<Self> {
        ensure_price_history(&prices)?;
        let performance = PerformanceAnalyzer::new(prices.returns(), trading_days);
        Ok(Self {
            prices,
            performance,
            risk_free_rate,
        })
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn performance(&self) -> &PerformanceAnalyzer {
        &self.performance
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn summary(&self) -> PerformanceSummary {
        self.performance.performance_summary(self.risk_free_rate)
    }

    pub fn best_and_worst(&self) -> Option<(Performer, Performer)> {
        best_and_worst(&self.prices)
    }

    pub fn diversification_ratio(&self) -> f64 {
        diversification_ratio(self.performance.returns(), self.performance.trading_days())
    }

    pub fn allocation(&self) -> Vec<(String, f64)> {
        contribution(&self.prices)
    }

    /// 성과 요약과 횡단면 지표를 하나의 보고서로 묶습니다.
    #[instrument(skip(self), fields(factors = self.prices.n_cols()))]
    pub fn report(&self) -> FactorReport {
        let (best, worst) = match self.best_and_worst() {
            Some((best, worst)) => (Some(best), Some(worst)),
            None => (None, None),
        };
        let report = FactorReport {
            summary: self.summary(),
            correlation: self.performance.correlation_matrix(),
            best,
            worst,
            diversification_ratio: self.diversification_ratio(),
            allocation: self.allocation(),
        };

        info!(
            diversification_ratio = report.diversification_ratio,
            "팩터 분석 완료"
        );
        report
    }
}
