//! 성과 분석 모듈
//!
//! # 모듈 구성
//!
//! - [`metrics`]: 일간 수익률에 대한 순수 지표 함수
//! - [`rolling`]: 롤링 윈도우 지표
//! - [`analyzer`]: 수익률 테이블 단위의 분석기

pub mod analyzer;
pub mod metrics;
pub mod rolling;

pub use analyzer::*;
pub use metrics::*;
pub use rolling::*;
