//! # Factor Core
//!
//! 팩터/지역 ETF 분석기의 핵심 데이터 모델을 제공합니다.
//!
//! - 날짜 인덱스 시계열(`AlignedSeries`)과 명시적 조인
//! - 가격/수익률 테이블(`PriceTable`, `ReturnTable`)
//! - 자산 유니버스와 분석 기간
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
