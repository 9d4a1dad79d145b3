//! 롤링 윈도우 지표.
//!
//! 최근 `window`개 관측치로 계산한 변동성/수익률/샤프 비율 시계열입니다.
//! 앞쪽 `window - 1`개 값과 결측값이 포함된 윈도우의 값은 `NaN`입니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::metrics::{mean, safe_ratio, sample_std};
use crate::error::{AnalyticsError, Result};

/// 롤링 지표 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollingMetric {
    /// 윈도우 표본 표준편차 × √거래일
    Volatility,
    /// 윈도우 평균 × 거래일
    Return,
    /// 롤링 수익률 / 롤링 변동성 (무위험 수익률 미차감)
    Sharpe,
}

impl RollingMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            RollingMetric::Volatility => "volatility",
            RollingMetric::Return => "return",
            RollingMetric::Sharpe => "sharpe",
        }
    }
}

impl fmt::Display for RollingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RollingMetric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "volatility" => Ok(RollingMetric::Volatility),
            "return" => Ok(RollingMetric::Return),
            "sharpe" => Ok(RollingMetric::Sharpe),
            other => Err(AnalyticsError::InvalidMetric(other.to_string())),
        }
    }
}

/// 윈도우마다 `f`를 적용합니다. 결측이 포함된 윈도우는 `NaN`입니다.
fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow(window));
    }
    let mut out = vec![f64::NAN; values.len()];
    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().all(|v| v.is_finite()) {
            out[end - 1] = f(slice);
        }
    }
    Ok(out)
}

/// 일간 수익률 하나의 롤링 지표.
pub fn rolling_metric(
    returns: &[f64],
    metric: RollingMetric,
    window: usize,
    trading_days: u32,
) -> Result<Vec<f64>> {
    let days = trading_days as f64;
    match metric {
        RollingMetric::Volatility => {
            rolling_apply(returns, window, |w| sample_std(w) * days.sqrt())
        }
        RollingMetric::Return => rolling_apply(returns, window, |w| mean(w) * days),
        RollingMetric::Sharpe => rolling_apply(returns, window, |w| {
            safe_ratio(mean(w) * days, sample_std(w) * days.sqrt())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric() {
        assert_eq!("volatility".parse::<RollingMetric>().unwrap(), RollingMetric::Volatility);
        assert_eq!("sharpe".parse::<RollingMetric>().unwrap(), RollingMetric::Sharpe);

        let err = "unknown".parse::<RollingMetric>().unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidMetric(name) if name == "unknown"));
    }

    #[test]
    fn test_leading_values_undefined() {
        let returns = [0.01, 0.02, 0.03, 0.04];
        let out = rolling_metric(&returns, RollingMetric::Return, 3, 252).unwrap();

        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!((out[2] - 0.02 * 252.0).abs() < 1e-9);
        assert!((out[3] - 0.03 * 252.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_volatility_and_sharpe() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        let vol = rolling_metric(&returns, RollingMetric::Volatility, 2, 252).unwrap();
        let expected = sample_std(&[0.01, -0.01]) * 252f64.sqrt();
        assert!((vol[1] - expected).abs() < 1e-12);

        let sharpe = rolling_metric(&returns, RollingMetric::Sharpe, 2, 252).unwrap();
        let expected = (mean(&[0.02, 0.0]) * 252.0) / (sample_std(&[0.02, 0.0]) * 252f64.sqrt());
        assert!((sharpe[3] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_window_with_missing_value() {
        let returns = [0.01, f64::NAN, 0.02, 0.03];
        let out = rolling_metric(&returns, RollingMetric::Return, 2, 252).unwrap();
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(out[3].is_finite());
    }

    #[test]
    fn test_invalid_window() {
        assert!(matches!(
            rolling_metric(&[0.01], RollingMetric::Return, 0, 252),
            Err(AnalyticsError::InvalidWindow(0))
        ));
        // 윈도우가 데이터보다 길면 전부 정의되지 않음
        let out = rolling_metric(&[0.01, 0.02], RollingMetric::Return, 5, 252).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
