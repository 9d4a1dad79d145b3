//! 외부 시세 기반 가격 소스.

use async_trait::async_trait;
use factor_core::{AlignedSeries, AnalysisPeriod, AssetSpec};
use tracing::{debug, warn};

use super::{
    rows_to_price_series, rows_to_series, MarketDataClient, PriceSource, Provenance, SourceKind,
    SourcedSeries, SyntheticSource,
};
use crate::error::{DataError, Result};

/// 외부 시세 소스.
///
/// 티커 조회나 변환이 어떤 이유로든 실패하면 그 티커만 합성 데이터로
/// 대체하고 배치는 계속 진행합니다. 합성 생성 자체의 실패만 전파됩니다.
pub struct LiveSource<C> {
    client: C,
    fallback: SyntheticSource,
}

impl<C: MarketDataClient> LiveSource<C> {
    pub fn new(client: C, fallback: SyntheticSource) -> Self {
        Self { client, fallback }
    }

    async fn fetch_live(&self, asset: &AssetSpec, period: &AnalysisPeriod) -> Result<AlignedSeries> {
        let rows = self.client.fetch(&asset.ticker, period.start, period.end).await?;
        rows_to_price_series(&asset.name, &asset.ticker, &rows)
    }
}

#[async_trait]
impl<C: MarketDataClient> PriceSource for LiveSource<C> {
    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    async fn price_series(&self, asset: &AssetSpec, period: &AnalysisPeriod) -> Result<SourcedSeries> {
        match self.fetch_live(asset, period).await {
            Ok(series) => {
                debug!(
                    asset = %asset.name,
                    ticker = %asset.ticker,
                    source = self.client.name(),
                    points = series.len(),
                    "시세 조회 성공"
                );
                Ok(SourcedSeries {
                    series,
                    provenance: Provenance::Live,
                })
            }
            Err(e) => {
                warn!(
                    asset = %asset.name,
                    ticker = %asset.ticker,
                    reason = %e,
                    recoverable = e.is_recoverable(),
                    "시세 조회 실패, 합성 데이터로 대체"
                );
                Ok(SourcedSeries {
                    series: self.fallback.generate(&asset.name, period)?,
                    provenance: Provenance::Synthetic {
                        reason: Some(e.to_string()),
                    },
                })
            }
        }
    }

    async fn quoted_rate(&self, pair: &str, period: &AnalysisPeriod) -> Result<AlignedSeries> {
        let rows = self
            .client
            .fetch(pair, period.start, period.end)
            .await
            .map_err(|e| DataError::CurrencyRateUnavailable {
                pair: pair.to_string(),
                reason: e.to_string(),
            })?;

        // 환율은 종가를 사용합니다.
        let series = rows_to_series(pair, &rows, |r| r.close)?;

        if series.count_valid() == 0 {
            return Err(DataError::CurrencyRateUnavailable {
                pair: pair.to_string(),
                reason: "no finite quotes".to_string(),
            });
        }
        Ok(series)
    }
}
