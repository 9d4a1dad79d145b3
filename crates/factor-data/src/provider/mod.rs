//! 가격 데이터 Provider 모듈.
//!
//! ## 외부 시세 클라이언트
//! - `MarketDataClient`: `fetch(ticker, start, end)` 계약
//! - `YahooClient`: Yahoo Finance 구현
//!
//! ## 가격 소스 전략
//! - `PriceSource`: 자산 하나의 가격 시계열을 돌려주는 전략
//! - `LiveSource`: 외부 시세를 사용하고, 실패한 티커는 합성 데이터로 대체
//! - `SyntheticSource`: 자산 이름으로 시드를 정한 기하 브라운 운동 경로

pub mod live;
pub mod synthetic;
pub mod yahoo;

pub use live::LiveSource;
pub use synthetic::{seed_from_name, SyntheticSource};
pub use yahoo::YahooClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use factor_core::{AlignedSeries, AnalysisPeriod, AssetSpec};
use std::fmt;

use crate::error::{DataError, Result};

/// 일봉 OHLCV 한 행.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// 배당/분할 조정 종가 (소스가 제공하지 않으면 `None`)
    pub adj_close: Option<f64>,
    pub volume: u64,
}

impl OhlcvRow {
    /// 분석에 사용할 가격. 조정 종가가 유한하면 조정 종가, 아니면 종가.
    pub fn price(&self) -> Option<f64> {
        self.adj_close
            .filter(|p| p.is_finite())
            .or(Some(self.close).filter(|p| p.is_finite()))
    }
}

/// 외부 시세 소스 계약.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// 소스 이름 (로그용).
    fn name(&self) -> &str;

    /// `[start, end]` 구간의 일봉을 조회합니다.
    async fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<OhlcvRow>>;
}

/// 일봉 행을 가격 시계열로 변환합니다.
///
/// 같은 날짜가 여러 번 나오면 마지막 행을 사용합니다.
/// 유한한 가격이 하나도 없으면 `UnsupportedSchema`, 행이 없으면 `NoData`입니다.
pub fn rows_to_price_series(name: &str, ticker: &str, rows: &[OhlcvRow]) -> Result<AlignedSeries> {
    if rows.is_empty() {
        return Err(DataError::NoData(ticker.to_string()));
    }

    let series = rows_to_series(name, rows, |r| r.price().unwrap_or(f64::NAN))?;
    if series.count_valid() == 0 {
        return Err(DataError::UnsupportedSchema {
            ticker: ticker.to_string(),
            reason: "neither adjusted close nor close has a finite value".to_string(),
        });
    }
    Ok(series)
}

/// 날짜순으로 정렬하고 날짜당 마지막 행만 남겨 시계열을 만듭니다.
pub(crate) fn rows_to_series(
    name: &str,
    rows: &[OhlcvRow],
    value: impl Fn(&OhlcvRow) -> f64,
) -> Result<AlignedSeries> {
    let mut pairs: Vec<(NaiveDate, f64)> = rows.iter().map(|r| (r.date, value(r))).collect();
    pairs.sort_by_key(|(d, _)| *d);
    pairs.reverse();
    pairs.dedup_by_key(|(d, _)| *d);
    pairs.reverse();
    Ok(AlignedSeries::from_pairs(name, pairs)?)
}

/// 자산 하나의 데이터 출처.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// 외부 시세
    Live,
    /// 합성 데이터. 외부 조회 실패로 대체된 경우 그 사유를 담습니다.
    Synthetic { reason: Option<String> },
}

impl Provenance {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Provenance::Synthetic { .. })
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Synthetic { reason: None } => write!(f, "synthetic"),
            Provenance::Synthetic { reason: Some(r) } => write!(f, "synthetic ({})", r),
        }
    }
}

/// 출처가 붙은 가격 시계열.
#[derive(Debug, Clone)]
pub struct SourcedSeries {
    pub series: AlignedSeries,
    pub provenance: Provenance,
}

/// 가격 소스 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Synthetic,
}

/// 자산 하나의 가격 시계열을 돌려주는 전략.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// 기간 내 자산 가격. 시계열 이름은 `asset.name`입니다.
    async fn price_series(&self, asset: &AssetSpec, period: &AnalysisPeriod) -> Result<SourcedSeries>;

    /// 환율 시세(호가 그대로) 시계열.
    async fn quoted_rate(&self, pair: &str, period: &AnalysisPeriod) -> Result<AlignedSeries>;
}
