//! 가격 테이블 로더.
//!
//! 자산 목록(표시 이름 → 티커)을 받아 기간 내 가격을 모으고, 필요한 자산은
//! EUR로 변환한 뒤 하나의 정렬된 `PriceTable`로 조립합니다.
//! 티커 하나의 실패는 배치를 중단시키지 않습니다.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use factor_core::{
    AlignedSeries, AnalysisPeriod, AssetSpec, CurrencyConfig, DataConfig, PriceTable, ReturnTable,
};

use crate::currency::{CurrencyConverter, FxStatus};
use crate::error::{DataError, Result};
use crate::provider::{
    LiveSource, PriceSource, Provenance, SourcedSeries, SyntheticSource, YahooClient,
};

/// 자산 하나의 로드 결과 기록.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetProvenance {
    pub asset: AssetSpec,
    pub provenance: Provenance,
    /// EUR로 변환했는지 여부
    pub converted: bool,
}

/// 로드된 가격 테이블과 데이터 출처 정보.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub prices: PriceTable,
    /// 테이블에 포함된 자산의 출처 (설정 순서)
    pub provenance: Vec<AssetProvenance>,
    pub fx: FxStatus,
}

impl LoadedPrices {
    /// 일간 수익률 테이블.
    pub fn returns(&self) -> ReturnTable {
        self.prices.returns()
    }

    /// 합성 데이터로 대체된 자산 수.
    pub fn synthetic_count(&self) -> usize {
        self.provenance
            .iter()
            .filter(|p| p.provenance.is_synthetic())
            .count()
    }

    /// 데이터 품질이 저하되었는지 (합성 데이터 또는 고정 환율 사용).
    pub fn is_degraded(&self) -> bool {
        self.synthetic_count() > 0 || self.fx.is_degraded()
    }
}

/// 설정에 따라 가격 소스를 선택합니다.
///
/// 오프라인 모드이거나 Yahoo 커넥터를 만들 수 없으면 합성 소스를 사용합니다.
pub fn select_source(config: &DataConfig) -> Result<Arc<dyn PriceSource>> {
    let synthetic = SyntheticSource::new(config.synthetic)?;

    if config.offline {
        warn!("오프라인 모드: 모든 자산에 합성 데이터를 사용합니다");
        return Ok(Arc::new(synthetic));
    }

    match YahooClient::new() {
        Ok(client) => {
            info!("Yahoo Finance 시세 소스 사용");
            Ok(Arc::new(LiveSource::new(client, synthetic)))
        }
        Err(e) => {
            warn!(error = %e, "시세 소스를 사용할 수 없어 합성 데이터로 대체합니다");
            Ok(Arc::new(synthetic))
        }
    }
}

/// 가격 테이블 로더.
pub struct DataLoader {
    source: Arc<dyn PriceSource>,
    currency: CurrencyConfig,
    parallel_fetch: bool,
}

impl DataLoader {
    pub fn new(source: Arc<dyn PriceSource>, currency: CurrencyConfig) -> Self {
        Self {
            source,
            currency,
            parallel_fetch: false,
        }
    }

    /// 티커별 조회를 동시에 실행할지 설정합니다. 결과 순서는 같습니다.
    pub fn with_parallel_fetch(mut self, enabled: bool) -> Self {
        self.parallel_fetch = enabled;
        self
    }

    /// 자산 목록의 가격 테이블을 로드합니다.
    ///
    /// 사용할 수 있는 시계열이 하나도 없을 때만 `DataUnavailable`로 실패합니다.
    #[instrument(
        skip(self, assets),
        fields(source = ?self.source.kind(), assets = assets.len(), period = %period)
    )]
    pub async fn load_prices(
        &self,
        assets: &[AssetSpec],
        period: &AnalysisPeriod,
    ) -> Result<LoadedPrices> {
        let fetched = self.fetch_all(assets, period).await;

        let mut collected: Vec<(AssetSpec, SourcedSeries)> = Vec::with_capacity(assets.len());
        for (asset, result) in assets.iter().zip(fetched) {
            match result {
                Ok(sourced) if !sourced.series.is_empty() => {
                    collected.push((asset.clone(), sourced))
                }
                Ok(_) => warn!(asset = %asset, "빈 시계열, 제외합니다"),
                Err(e) => warn!(asset = %asset, error = %e, "자산 로드 실패, 제외합니다"),
            }
        }

        if collected.is_empty() {
            return Err(DataError::DataUnavailable(format!(
                "no usable series among {} assets for {}",
                assets.len(),
                period
            )));
        }

        let needs_fx = collected.iter().any(|(asset, sourced)| {
            sourced.provenance == Provenance::Live
                && asset.needs_conversion(&self.currency.convert_tickers)
        });
        let converter = if needs_fx {
            Some(self.converter(period).await)
        } else {
            None
        };

        let mut series: Vec<AlignedSeries> = Vec::with_capacity(collected.len());
        let mut provenance = Vec::with_capacity(collected.len());
        for (asset, sourced) in collected {
            // 합성 데이터는 이미 기준 통화로 간주합니다.
            let convert = sourced.provenance == Provenance::Live
                && asset.needs_conversion(&self.currency.convert_tickers);
            let prices = match (&converter, convert) {
                (Some(c), true) => c.convert(&sourced.series)?,
                _ => sourced.series,
            };
            debug!(asset = %asset, points = prices.len(), converted = convert, "가격 시계열 준비");
            series.push(prices);
            provenance.push(AssetProvenance {
                asset,
                provenance: sourced.provenance,
                converted: convert,
            });
        }

        let prices = PriceTable::assemble(series)?;
        let fx = converter
            .map(|c| c.status().clone())
            .unwrap_or(FxStatus::NotRequired);

        info!(
            rows = prices.n_rows(),
            columns = prices.n_cols(),
            synthetic = provenance.iter().filter(|p| p.provenance.is_synthetic()).count(),
            fx = %fx,
            "가격 테이블 조립 완료"
        );

        Ok(LoadedPrices {
            prices,
            provenance,
            fx,
        })
    }

    async fn fetch_all(
        &self,
        assets: &[AssetSpec],
        period: &AnalysisPeriod,
    ) -> Vec<Result<SourcedSeries>> {
        if self.parallel_fetch {
            join_all(assets.iter().map(|a| self.source.price_series(a, period))).await
        } else {
            let mut results = Vec::with_capacity(assets.len());
            for asset in assets {
                results.push(self.source.price_series(asset, period).await);
            }
            results
        }
    }

    async fn converter(&self, period: &AnalysisPeriod) -> CurrencyConverter {
        let pair = &self.currency.pair;
        let quoted = self.source.quoted_rate(pair, period).await;
        match quoted.and_then(|q| CurrencyConverter::from_quoted(pair, &q)) {
            Ok(converter) => converter,
            Err(e) => {
                warn!(
                    pair = %pair,
                    fallback_rate = self.currency.fallback_rate,
                    reason = %e,
                    "환율 시계열을 사용할 수 없어 고정 환율로 변환합니다"
                );
                CurrencyConverter::fallback(&self.currency, e.to_string())
            }
        }
    }
}
