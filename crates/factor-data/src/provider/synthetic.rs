//! 합성 가격 경로.
//!
//! 외부 시세를 쓸 수 없을 때 사용하는 기하 브라운 운동 경로입니다.
//! 자산 이름의 SHA-256 해시로 시드를 정하므로 같은 이름과 기간이면
//! 항상 같은 경로가 나옵니다. 생성기는 호출마다 새로 만들며 공유하지 않습니다.

use async_trait::async_trait;
use factor_core::{AlignedSeries, AnalysisPeriod, AssetSpec, SyntheticConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{PriceSource, Provenance, SourceKind, SourcedSeries};
use crate::error::{DataError, Result};

/// 자산 이름에서 난수 시드를 만듭니다 (SHA-256 앞 8바이트).
pub fn seed_from_name(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// 결정적 합성 가격 소스.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    params: SyntheticConfig,
    increments: Normal<f64>,
}

impl SyntheticSource {
    /// 파라미터를 검증하고 소스를 생성합니다.
    pub fn new(params: SyntheticConfig) -> Result<Self> {
        if !(params.initial_price.is_finite() && params.initial_price > 0.0) {
            return Err(DataError::InvalidParameter(format!(
                "initial price must be positive, got {}",
                params.initial_price
            )));
        }
        if !params.daily_drift.is_finite() {
            return Err(DataError::InvalidParameter(format!(
                "daily drift must be finite, got {}",
                params.daily_drift
            )));
        }
        if !(params.daily_volatility.is_finite() && params.daily_volatility >= 0.0) {
            return Err(DataError::InvalidParameter(format!(
                "daily volatility must be non-negative, got {}",
                params.daily_volatility
            )));
        }
        let increments = Normal::new(params.daily_drift, params.daily_volatility).map_err(|e| {
            DataError::InvalidParameter(format!(
                "drift {} / volatility {}: {}",
                params.daily_drift, params.daily_volatility, e
            ))
        })?;
        Ok(Self { params, increments })
    }

    pub fn params(&self) -> &SyntheticConfig {
        &self.params
    }

    /// 기간 내 영업일마다 `initial * exp(누적 로그 수익률)` 가격을 만듭니다.
    ///
    /// 기간에 영업일이 없으면 `NoData`입니다.
    pub fn generate(&self, name: &str, period: &AnalysisPeriod) -> Result<AlignedSeries> {
        let dates = period.business_days();
        if dates.is_empty() {
            return Err(DataError::NoData(format!("{} ({}: no business days)", name, period)));
        }

        let mut rng = StdRng::seed_from_u64(seed_from_name(name));
        let mut log_level = 0.0;
        let values = dates
            .iter()
            .map(|_| {
                log_level += self.increments.sample(&mut rng);
                self.params.initial_price * f64::exp(log_level)
            })
            .collect();

        debug!(asset = name, points = dates.len(), "합성 가격 경로 생성");
        Ok(AlignedSeries::new(name, dates, values)?)
    }
}

#[async_trait]
impl PriceSource for SyntheticSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    async fn price_series(&self, asset: &AssetSpec, period: &AnalysisPeriod) -> Result<SourcedSeries> {
        Ok(SourcedSeries {
            series: self.generate(&asset.name, period)?,
            provenance: Provenance::Synthetic { reason: None },
        })
    }

    async fn quoted_rate(&self, pair: &str, _period: &AnalysisPeriod) -> Result<AlignedSeries> {
        Err(DataError::CurrencyRateUnavailable {
            pair: pair.to_string(),
            reason: "synthetic source has no exchange rates".to_string(),
        })
    }
}
