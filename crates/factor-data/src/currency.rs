//! 통화 변환.
//!
//! EUR/USD 호가(1 EUR당 USD)를 뒤집어 1 USD당 EUR 환율을 만들고,
//! USD 표시 가격에 곱해 EUR 기준 가격으로 바꿉니다. 환율은 자산의 날짜
//! 인덱스 위로 forward-fill 합니다. 환율 시계열이 없으면 고정 환율을 씁니다.

use factor_core::{AlignedSeries, CurrencyConfig};
use std::fmt;

use crate::error::{DataError, Result};

/// 변환에 사용한 환율의 상태.
#[derive(Debug, Clone, PartialEq)]
pub enum FxStatus {
    /// 변환이 필요한 외부 시세가 없었음
    NotRequired,
    /// 외부 환율 시계열 사용
    Live { pair: String, observations: usize },
    /// 고정 환율 사용 (품질 저하)
    Fallback {
        pair: String,
        rate: f64,
        reason: String,
    },
}

impl FxStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FxStatus::Fallback { .. })
    }
}

impl fmt::Display for FxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxStatus::NotRequired => write!(f, "not required"),
            FxStatus::Live { pair, observations } => {
                write!(f, "{} ({} quotes)", pair, observations)
            }
            FxStatus::Fallback { pair, rate, reason } => {
                write!(f, "{} unavailable, fixed rate {} ({})", pair, rate, reason)
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Rate {
    Series(AlignedSeries),
    Constant(f64),
}

/// USD → EUR 가격 변환기.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    rate: Rate,
    status: FxStatus,
}

impl CurrencyConverter {
    /// 호가 시계열(1 EUR당 USD)을 뒤집어 변환기를 만듭니다.
    ///
    /// 0이거나 결측인 호가는 결측으로 처리하며, 유한한 값이 없으면 에러입니다.
    pub fn from_quoted(pair: &str, quoted: &AlignedSeries) -> Result<Self> {
        let inverted = quoted.map(|q| if q.is_finite() && q != 0.0 { 1.0 / q } else { f64::NAN });
        let observations = inverted.count_valid();
        if observations == 0 {
            return Err(DataError::CurrencyRateUnavailable {
                pair: pair.to_string(),
                reason: "no usable quotes".to_string(),
            });
        }
        Ok(Self {
            rate: Rate::Series(inverted),
            status: FxStatus::Live {
                pair: pair.to_string(),
                observations,
            },
        })
    }

    /// 고정 환율 변환기.
    pub fn fallback(config: &CurrencyConfig, reason: impl Into<String>) -> Self {
        Self {
            rate: Rate::Constant(config.fallback_rate),
            status: FxStatus::Fallback {
                pair: config.pair.clone(),
                rate: config.fallback_rate,
                reason: reason.into(),
            },
        }
    }

    pub fn status(&self) -> &FxStatus {
        &self.status
    }

    /// 자산 가격을 자산 자신의 날짜 인덱스 위에서 변환합니다.
    pub fn convert(&self, prices: &AlignedSeries) -> Result<AlignedSeries> {
        match &self.rate {
            Rate::Series(rate) => {
                let aligned = rate.reindex_forward_fill(prices.dates());
                Ok(prices.mul(&aligned)?)
            }
            Rate::Constant(rate) => Ok(prices.scale(*rate)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(name: &str, days: &[u32], values: &[f64]) -> AlignedSeries {
        AlignedSeries::new(name, days.iter().map(|x| d(*x)).collect(), values.to_vec()).unwrap()
    }

    #[test]
    fn test_convert_on_asset_index() {
        let quoted = series("EURUSD=X", &[2, 4], &[1.25, 1.0]);
        let converter = CurrencyConverter::from_quoted("EURUSD=X", &quoted).unwrap();

        let prices = series("SPY", &[1, 2, 3, 4, 5], &[100.0, 100.0, 100.0, 100.0, 100.0]);
        let converted = converter.convert(&prices).unwrap();

        assert_eq!(converted.dates(), prices.dates());
        assert!(converted.values()[0].is_nan());
        assert!((converted.values()[1] - 80.0).abs() < 1e-9);
        assert!((converted.values()[2] - 80.0).abs() < 1e-9);
        assert!((converted.values()[3] - 100.0).abs() < 1e-9);
        assert!((converted.values()[4] - 100.0).abs() < 1e-9);
        assert!(matches!(converter.status(), FxStatus::Live { observations: 2, .. }));
    }

    #[test]
    fn test_fallback_rate_round_trip() {
        let config = CurrencyConfig::default();
        let converter = CurrencyConverter::fallback(&config, "offline");
        assert!(converter.status().is_degraded());

        let prices = series("SPY", &[1, 2, 3], &[470.1, 472.3, 468.9]);
        let converted = converter.convert(&prices).unwrap();
        let restored = converted.scale(1.0 / config.fallback_rate);
        for (a, b) in restored.values().iter().zip(prices.values()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_quoted_rate_round_trip(
            quote in 0.5f64..2.0,
            prices in prop::collection::vec(1.0f64..1000.0, 1..28)
        ) {
            let days: Vec<u32> = (1..=prices.len() as u32).collect();
            let quoted = series("EURUSD=X", &days, &vec![quote; prices.len()]);
            let converter = CurrencyConverter::from_quoted("EURUSD=X", &quoted).unwrap();

            let original = series("SPY", &days, &prices);
            let restored = converter.convert(&original).unwrap().scale(quote);
            for (a, b) in restored.values().iter().zip(original.values()) {
                prop_assert!((a - b).abs() < 1e-9 * b.max(1.0));
            }
        }
    }

    #[test]
    fn test_unusable_quotes() {
        let quoted = series("EURUSD=X", &[1, 2], &[0.0, f64::NAN]);
        assert!(matches!(
            CurrencyConverter::from_quoted("EURUSD=X", &quoted),
            Err(DataError::CurrencyRateUnavailable { .. })
        ));
    }
}
