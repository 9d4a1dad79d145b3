//! 성과 지표 계산 모듈
//!
//! 일간 수익률 시계열에 대한 순수 함수들을 제공합니다:
//! - 누적 수익률, 총 수익률, 연율화 수익률
//! - 연율화 변동성, 하방 편차
//! - 샤프 비율 (Sharpe Ratio): 위험 대비 수익률
//! - 소르티노 비율 (Sortino Ratio): 하방 위험 대비 수익률
//! - 낙폭 (Drawdown), 최대 낙폭 (Maximum Drawdown)
//!
//! 결측값(`NaN`)은 계산에서 제외합니다. 분모가 0에 가까운 비율은 `NaN`입니다.
//!
//! # 사용 예시
//!
//! ```rust
//! use factor_analytics::performance::metrics::{sharpe_ratio, total_return};
//!
//! let returns = [0.01, -0.02, 0.03];
//! assert!((total_return(&returns) - 0.019494).abs() < 1e-6);
//!
//! let flat = [0.001; 10];
//! assert!(sharpe_ratio(&flat, 0.02, 252).is_nan());
//! ```

use serde::{Deserialize, Serialize};

/// 연간 거래일 수 (연율화 계산에 사용)
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 기본 무위험 이자율 (연간, 0.02 = 2%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// 이 값보다 작은 변동성은 0으로 보고, 그 변동성으로 나눈 비율은 `NaN`입니다.
pub const ZERO_VOLATILITY_EPSILON: f64 = 1e-12;

fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// 분모가 0에 가깝거나 유한하지 않으면 `NaN`.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if !denominator.is_finite() || denominator.abs() < ZERO_VOLATILITY_EPSILON {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// 유한한 값의 평균. 값이 없으면 `NaN`.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = finite(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// 유한한 값의 표본 표준편차 (n - 1). 값이 2개 미만이면 `NaN`.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = finite(values).count();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = finite(values).map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// 날짜별 누적 수익률: `Π(1 + r) - 1`.
///
/// 결측 수익률은 직전 누적값을 유지합니다.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut growth = 1.0;
    returns
        .iter()
        .map(|r| {
            if r.is_finite() {
                growth *= 1.0 + r;
            }
            growth - 1.0
        })
        .collect()
}

/// 전체 기간 수익률. 유한한 수익률이 없으면 `NaN`.
pub fn total_return(returns: &[f64]) -> f64 {
    if finite(returns).next().is_none() {
        return f64::NAN;
    }
    finite(returns).fold(1.0, |g, r| g * (1.0 + r)) - 1.0
}

/// 연율화 수익률: `(1 + total)^(trading_days / n) - 1`.
pub fn annualized_return(returns: &[f64], trading_days: u32) -> f64 {
    let n = finite(returns).count();
    if n == 0 {
        return f64::NAN;
    }
    (1.0 + total_return(returns)).powf(trading_days as f64 / n as f64) - 1.0
}

/// 연율화 변동성: `std(r) * √trading_days`.
pub fn annualized_volatility(returns: &[f64], trading_days: u32) -> f64 {
    sample_std(returns) * (trading_days as f64).sqrt()
}

/// 연율화 하방 편차: 음의 수익률만의 표본 표준편차 × √trading_days.
pub fn downside_deviation(returns: &[f64], trading_days: u32) -> f64 {
    let negative: Vec<f64> = finite(returns).filter(|r| *r < 0.0).collect();
    sample_std(&negative) * (trading_days as f64).sqrt()
}

/// 샤프 비율: `(연율화 수익률 - 무위험 수익률) / 연율화 변동성`.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, trading_days: u32) -> f64 {
    safe_ratio(
        annualized_return(returns, trading_days) - risk_free_rate,
        annualized_volatility(returns, trading_days),
    )
}

/// 소르티노 비율: `(연율화 수익률 - 무위험 수익률) / 하방 편차`.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64, trading_days: u32) -> f64 {
    safe_ratio(
        annualized_return(returns, trading_days) - risk_free_rate,
        downside_deviation(returns, trading_days),
    )
}

/// 낙폭 시계열: `(가격 - 누적 고점) / 누적 고점`.
///
/// 누적 고점은 현재까지(현재 포함)의 유한한 가격 중 최댓값입니다.
/// 결측 가격의 낙폭은 `NaN`입니다.
pub fn drawdown_series(prices: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    prices
        .iter()
        .map(|p| {
            if !p.is_finite() {
                return f64::NAN;
            }
            peak = peak.max(*p);
            safe_ratio(p - peak, peak)
        })
        .collect()
}

/// 최대 낙폭 (가장 작은 낙폭 값). 유한한 가격이 없으면 `NaN`.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    drawdown_series(prices)
        .into_iter()
        .filter(|d| d.is_finite())
        .reduce(f64::min)
        .unwrap_or(f64::NAN)
}

/// 자산 하나의 성과 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub asset: String,
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
}

/// 자산별 성과 요약 테이블 (읽기 전용 파생값).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub rows: Vec<PerformanceRow>,
}

impl PerformanceSummary {
    pub fn get(&self, asset: &str) -> Option<&PerformanceRow> {
        self.rows.iter().find(|r| r.asset == asset)
    }

    pub fn assets(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.asset.as_str()).collect()
    }

    /// (자산, 샤프 비율) 목록.
    pub fn sharpe_ratios(&self) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .map(|r| (r.asset.clone(), r.sharpe_ratio))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_return_scenario() {
        let returns = [0.01, -0.02, 0.03];
        let cumulative = cumulative_returns(&returns);
        let expected = 1.01 * 0.98 * 1.03 - 1.0;

        assert!((cumulative[2] - expected).abs() < 1e-12);
        assert!((cumulative[2] - 0.0194).abs() < 1e-4);
        assert!((total_return(&returns) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_returns_skip_missing() {
        let cumulative = cumulative_returns(&[0.1, f64::NAN, 0.1]);
        assert!((cumulative[1] - 0.1).abs() < 1e-12);
        assert!((cumulative[2] - 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_max_drawdown_scenario() {
        let prices = [100.0, 110.0, 95.0, 120.0];
        let dd = drawdown_series(&prices);

        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert!((dd[2] - (95.0 - 110.0) / 110.0).abs() < 1e-12);
        assert_eq!(dd[3], 0.0);
        assert!((max_drawdown(&prices) + 0.1364).abs() < 1e-4);
    }

    #[test]
    fn test_drawdown_with_missing_price() {
        let dd = drawdown_series(&[100.0, f64::NAN, 90.0]);
        assert!(dd[1].is_nan());
        assert!((dd[2] + 0.1).abs() < 1e-12);
        assert!(max_drawdown(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_annualized_return() {
        // 하루 1% 수익이 252일 계속되면 1.01^252 - 1
        let returns = vec![0.01; 252];
        let expected = 1.01f64.powi(252) - 1.0;
        assert!((annualized_return(&returns, 252) - expected).abs() < 1e-9);

        // 관측치가 거래일 수의 절반이면 제곱으로 연율화
        let half = vec![0.01; 126];
        let expected = 1.01f64.powi(126).powi(2) - 1.0;
        assert!((annualized_return(&half, 252) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_volatility_and_std() {
        let returns = [0.01, -0.01, 0.01, -0.01];
        let std = sample_std(&returns);
        assert!((std - (0.0004f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((annualized_volatility(&returns, 252) - std * 252f64.sqrt()).abs() < 1e-12);
        assert!(sample_std(&[0.01]).is_nan());
    }

    #[test]
    fn test_zero_volatility_sharpe_is_nan() {
        let returns = vec![0.0; 30];
        assert!(sharpe_ratio(&returns, 0.02, 252).is_nan());
        assert!(sortino_ratio(&returns, 0.02, 252).is_nan());

        let constant = vec![0.0005; 30];
        assert!(sharpe_ratio(&constant, 0.02, 252).is_nan());
    }

    #[test]
    fn test_sortino_uses_negative_returns_only() {
        let returns = [0.02, -0.01, 0.03, -0.03, 0.01];
        let downside = sample_std(&[-0.01, -0.03]) * 252f64.sqrt();
        assert!((downside_deviation(&returns, 252) - downside).abs() < 1e-12);

        let expected = (annualized_return(&returns, 252) - 0.02) / downside;
        assert!((sortino_ratio(&returns, 0.02, 252) - expected).abs() < 1e-9);

        // 음의 수익률이 하나뿐이면 하방 편차를 정의할 수 없음
        assert!(sortino_ratio(&[0.01, -0.01, 0.02], 0.02, 252).is_nan());
    }

    #[test]
    fn test_sharpe_ratio_value() {
        let returns = [0.01, -0.005, 0.007, 0.002, -0.003];
        let expected = (annualized_return(&returns, 252) - 0.02) / annualized_volatility(&returns, 252);
        assert!((sharpe_ratio(&returns, 0.02, 252) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_is_nan() {
        assert!(total_return(&[]).is_nan());
        assert!(annualized_return(&[f64::NAN], 252).is_nan());
        assert!(mean(&[]).is_nan());
    }
}
