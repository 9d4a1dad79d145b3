//! 지역 ETF 분석기.
//!
//! 원시(통화 변환된) 가격 테이블과 그 수익률 테이블을 함께 보관하고
//! 지역별 성과, 비중, 상관관계, 위험 조정 수익률을 계산합니다.

use factor_core::{PriceTable, ReturnTable, TimeTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::cross_section::{
    best_and_worst, contribution, diversification_ratio, ensure_price_history, period_returns,
    relative_performance, Performer,
};
use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::error::Result;
use crate::performance::metrics::{annualized_volatility, drawdown_series, max_drawdown, safe_ratio};

/// 지역별 위험 조정 수익률.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustedRow {
    pub region: String,
    /// 첫/마지막 가격 기준 연율화 수익률
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    /// 연율화 수익률 / 연율화 변동성 (무위험 수익률 미차감)
    pub return_to_risk: f64,
}

/// 지역별 요약 (퍼센트 단위, 샤프 비율 제외).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicRow {
    pub region: String,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub annualized_volatility_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
}

/// 지역 ETF 분석기.
#[derive(Debug, Clone)]
pub struct GeographyAnalyzer {
    prices: PriceTable,
    returns: ReturnTable,
    risk_free_rate: f64,
    trading_days: u32,
}

impl GeographyAnalyzer {
    /// 가격 행이 두 개 미만이면 `InsufficientData`.
    pub fn new(prices: PriceTable, risk_free_rate: f64, trading_days: u32) -> Result<Self> {
        ensure_price_history(&prices)?;
        let returns = prices.returns();
        Ok(Self {
            prices,
            returns,
            risk_free_rate,
            trading_days,
        })
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn returns(&self) -> &ReturnTable {
        &self.returns
    }

    /// 기준 100으로 재조정한 지역별 가격.
    pub fn relative_performance(&self) -> Result<TimeTable> {
        relative_performance(&self.prices)
    }

    /// 최종 가격 기준 지역 비중 (%).
    pub fn regional_contribution(&self) -> Vec<(String, f64)> {
        contribution(&self.prices)
    }

    pub fn best_and_worst(&self) -> Option<(Performer, Performer)> {
        best_and_worst(&self.prices)
    }

    pub fn regional_correlations(&self) -> CorrelationMatrix {
        correlation_matrix(&self.returns)
    }

    /// 지역별 연율화 변동성.
    pub fn regional_volatility(&self) -> Vec<(String, f64)> {
        self.returns
            .iter_columns()
            .map(|(name, r)| (name.to_string(), annualized_volatility(r, self.trading_days)))
            .collect()
    }

    /// 지역별 위험 조정 수익률.
    ///
    /// 연수는 `유효 수익률 수 / 거래일`, 연율화 수익률은 `(마지막/첫 가격)^(1/연수) - 1`.
    pub fn risk_adjusted_returns(&self) -> Vec<RiskAdjustedRow> {
        period_returns(&self.prices)
            .into_iter()
            .zip(self.returns.iter_columns())
            .map(|((region, total), (_, r))| {
                let observations = r.iter().filter(|v| v.is_finite()).count();
                let years = observations as f64 / self.trading_days as f64;
                let annualized_return = if years > 0.0 {
                    (1.0 + total).powf(1.0 / years) - 1.0
                } else {
                    f64::NAN
                };
                let annualized_volatility = annualized_volatility(r, self.trading_days);

                RiskAdjustedRow {
                    region,
                    annualized_return,
                    annualized_volatility,
                    sharpe_ratio: safe_ratio(annualized_return - self.risk_free_rate, annualized_volatility),
                    return_to_risk: safe_ratio(annualized_return, annualized_volatility),
                }
            })
            .collect()
    }

    /// 원시 가격 기준 지역별 낙폭 테이블.
    pub fn drawdowns(&self) -> Result<TimeTable> {
        Ok(self.prices.map_columns(drawdown_series)?)
    }

    /// 원시 가격 기준 지역별 최대 낙폭.
    pub fn drawdown_by_region(&self) -> Vec<(String, f64)> {
        self.prices
            .iter_columns()
            .map(|(name, p)| (name.to_string(), max_drawdown(p)))
            .collect()
    }

    /// 지역별 요약.
    #[instrument(skip(self), fields(regions = self.prices.n_cols()))]
    pub fn geographic_summary(&self) -> Vec<GeographicRow> {
        let rows: Vec<GeographicRow> = period_returns(&self.prices)
            .into_iter()
            .zip(self.risk_adjusted_returns())
            .zip(self.drawdown_by_region())
            .map(|(((region, total), risk), (_, mdd))| GeographicRow {
                region,
                total_return_pct: total * 100.0,
                annualized_return_pct: risk.annualized_return * 100.0,
                annualized_volatility_pct: risk.annualized_volatility * 100.0,
                sharpe_ratio: risk.sharpe_ratio,
                max_drawdown_pct: mdd * 100.0,
            })
            .collect();

        debug!(rows = rows.len(), "지역 요약 계산 완료");
        rows
    }

    /// 동일 가중 포트폴리오의 분산 비율.
    pub fn diversification_ratio(&self) -> f64 {
        diversification_ratio(&self.returns, self.trading_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn analyzer(columns: Vec<(&str, Vec<f64>)>) -> GeographyAnalyzer {
        let n = columns[0].1.len();
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let dates = (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        let table = TimeTable::new(
            dates,
            columns
                .into_iter()
                .map(|(name, v)| (name.to_string(), v))
                .collect(),
        )
        .unwrap();
        GeographyAnalyzer::new(PriceTable::from_table(table), 0.02, 252).unwrap()
    }

    #[test]
    fn test_summary_percent_units() {
        let geo = analyzer(vec![
            ("US Market", vec![100.0, 110.0, 95.0, 120.0]),
            ("Europe", vec![50.0, 51.0, 52.0, 53.0]),
        ]);
        let summary = geo.geographic_summary();

        let us = &summary[0];
        assert_eq!(us.region, "US Market");
        assert!((us.total_return_pct - 20.0).abs() < 1e-9);
        assert!((us.max_drawdown_pct + 13.636).abs() < 1e-3);

        let europe = &summary[1];
        assert!((europe.total_return_pct - 6.0).abs() < 1e-9);
        assert_eq!(europe.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_risk_adjusted_returns_use_price_span() {
        // 252개 수익률 → 1년, 연율화 수익률 = 기간 수익률
        let prices: Vec<f64> = (0..=252).map(|i| 100.0 + i as f64 * 0.1).collect();
        let geo = analyzer(vec![("US Market", prices)]);
        let row = &geo.risk_adjusted_returns()[0];

        assert!((row.annualized_return - 0.252).abs() < 1e-9);
        assert!(row.annualized_volatility > 0.0);
        assert!(
            (row.sharpe_ratio - (row.annualized_return - 0.02) / row.annualized_volatility).abs()
                < 1e-9
        );
        assert!((row.return_to_risk - row.annualized_return / row.annualized_volatility).abs() < 1e-9);
    }

    #[test]
    fn test_flat_region_has_undefined_sharpe() {
        let geo = analyzer(vec![("Flat", vec![10.0; 5]), ("Up", vec![10.0, 11.0, 10.5, 12.0, 12.5])]);
        let rows = geo.risk_adjusted_returns();

        assert!(rows[0].sharpe_ratio.is_nan());
        assert!(rows[0].return_to_risk.is_nan());
        assert!(rows[1].sharpe_ratio.is_finite());
        assert_eq!(geo.regional_volatility()[0].1, 0.0);
    }

    #[test]
    fn test_contribution_and_performers() {
        let geo = analyzer(vec![
            ("US Market", vec![100.0, 150.0]),
            ("Europe", vec![100.0, 50.0]),
        ]);

        let shares = geo.regional_contribution();
        assert!((shares[0].1 - 75.0).abs() < 1e-12);
        assert!((shares[1].1 - 25.0).abs() < 1e-12);

        let (best, worst) = geo.best_and_worst().unwrap();
        assert_eq!(best.asset, "US Market");
        assert_eq!(worst.asset, "Europe");

        let rel = geo.relative_performance().unwrap();
        assert_eq!(rel.column("Europe").unwrap(), &[100.0, 50.0]);
    }
}
