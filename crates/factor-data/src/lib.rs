//! 가격 데이터 로드.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 시세 클라이언트 계약과 Yahoo Finance 구현
//! - 외부 시세 / 합성 데이터 가격 소스 전략
//! - USD → EUR 통화 변환 (고정 환율 대체 포함)
//! - 정렬된 가격 테이블 조립

pub mod currency;
pub mod error;
pub mod loader;
pub mod provider;

pub use currency::{CurrencyConverter, FxStatus};
pub use error::{DataError, Result};
pub use loader::{select_source, AssetProvenance, DataLoader, LoadedPrices};
pub use provider::{
    rows_to_price_series, LiveSource, MarketDataClient, OhlcvRow, PriceSource, Provenance,
    SourceKind, SourcedSeries, SyntheticSource, YahooClient,
};
