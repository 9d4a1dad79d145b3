//! 자산 간 횡단면 지표.
//!
//! 상대 성과(기준 100), 최종 가격 비중, 최고/최저 성과 자산, 분산 비율.

use factor_core::TimeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::performance::metrics::{annualized_volatility, mean, safe_ratio};

/// 상대 성과의 기준값.
pub const REBASE_VALUE: f64 = 100.0;

fn first_finite(values: &[f64]) -> Option<f64> {
    values.iter().copied().find(|v| v.is_finite())
}

fn last_finite(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| v.is_finite())
}

/// 수익률을 계산하려면 가격 행이 두 개 이상 필요합니다.
pub fn ensure_price_history(prices: &TimeTable) -> Result<()> {
    if prices.n_rows() < 2 || prices.n_cols() == 0 {
        return Err(AnalyticsError::InsufficientData(format!(
            "{} price rows for {} assets (need at least 2 rows)",
            prices.n_rows(),
            prices.n_cols()
        )));
    }
    Ok(())
}

/// 각 자산의 가격을 첫 관측치가 100이 되도록 재조정합니다.
///
/// 기준은 테이블의 첫 행이 아니라 컬럼의 첫 유한 가격입니다. 늦게 상장했거나
/// 첫 행이 결측인 자산도 자신의 첫 관측치에서 100으로 시작하며, 그 이전 날짜는
/// `NaN`으로 남습니다.
pub fn relative_performance(prices: &TimeTable) -> Result<TimeTable> {
    Ok(prices.map_columns(|column| {
        let base = first_finite(column).unwrap_or(f64::NAN);
        column
            .iter()
            .map(|p| safe_ratio(*p, base) * REBASE_VALUE)
            .collect()
    })?)
}

/// 자산별 최종 가격이 전체 최종 가격 합에서 차지하는 비율 (%).
///
/// 수익률 가중이 아니라 가격 수준 기준의 스냅샷입니다. 최종 가격은 테이블의
/// 마지막 행이 아니라 컬럼의 마지막 유한 가격이므로, 마지막 날짜에 결측인
/// 자산도 직전 가격으로 비중에 포함됩니다.
pub fn contribution(prices: &TimeTable) -> Vec<(String, f64)> {
    let finals: Vec<(String, f64)> = prices
        .iter_columns()
        .map(|(name, column)| (name.to_string(), last_finite(column).unwrap_or(f64::NAN)))
        .collect();
    let total: f64 = finals
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .sum();

    finals
        .into_iter()
        .map(|(name, v)| (name, safe_ratio(v, total) * 100.0))
        .collect()
}

/// 자산별 기간 수익률: `마지막 가격 / 첫 가격 - 1`.
pub fn period_returns(prices: &TimeTable) -> Vec<(String, f64)> {
    prices
        .iter_columns()
        .map(|(name, column)| {
            let ret = match (first_finite(column), last_finite(column)) {
                (Some(first), Some(last)) => safe_ratio(last, first) - 1.0,
                _ => f64::NAN,
            };
            (name.to_string(), ret)
        })
        .collect()
}

/// 기간 수익률 기준 최고/최저 자산.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub asset: String,
    pub period_return: f64,
}

/// 기간 수익률이 가장 높은 자산과 가장 낮은 자산.
///
/// 수익률을 계산할 수 있는 자산이 없으면 `None`.
pub fn best_and_worst(prices: &TimeTable) -> Option<(Performer, Performer)> {
    let returns: Vec<Performer> = period_returns(prices)
        .into_iter()
        .filter(|(_, r)| r.is_finite())
        .map(|(asset, period_return)| Performer {
            asset,
            period_return,
        })
        .collect();

    let best = returns
        .iter()
        .max_by(|a, b| a.period_return.total_cmp(&b.period_return))?
        .clone();
    let worst = returns
        .iter()
        .min_by(|a, b| a.period_return.total_cmp(&b.period_return))?
        .clone();
    Some((best, worst))
}

/// 동일 가중 포트폴리오의 일간 수익률.
///
/// 날짜마다 유한한 수익률의 합을 전체 자산 수로 나눕니다 (결측 자산의 기여는 0).
pub fn equal_weight_portfolio_returns(returns: &TimeTable) -> Vec<f64> {
    let n = returns.n_cols();
    if n == 0 {
        return Vec::new();
    }
    (0..returns.n_rows())
        .map(|i| {
            let sum: f64 = returns
                .row(i)
                .into_iter()
                .filter(|r| r.is_finite())
                .sum();
            sum / n as f64
        })
        .collect()
}

/// 분산 비율: 개별 자산 연율화 변동성의 동일 가중 평균 / 동일 가중 포트폴리오의 연율화 변동성.
///
/// 1보다 크면 분산 효과가 있습니다. 포트폴리오 변동성이 0이면 `NaN`.
pub fn diversification_ratio(returns: &TimeTable, trading_days: u32) -> f64 {
    let individual: Vec<f64> = returns
        .iter_columns()
        .map(|(_, r)| annualized_volatility(r, trading_days))
        .collect();
    let portfolio = annualized_volatility(&equal_weight_portfolio_returns(returns), trading_days);
    safe_ratio(mean(&individual), portfolio)
}
