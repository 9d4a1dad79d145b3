//! 포트폴리오 분석 모듈
//!
//! 가격/수익률 테이블 위에 자산 간 횡단면 지표를 더합니다.
//!
//! # 모듈 구성
//!
//! - [`cross_section`]: 상대 성과, 비중, 최고/최저 자산, 분산 비율
//! - [`factors`]: 팩터 ETF 분석기
//! - [`geography`]: 지역 ETF 분석기
//! - [`charts`]: 렌더링 계층에 넘길 차트 데이터
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use factor_analytics::portfolio::{
//!     geography_allocation_pie, ChartRenderer, GeographyAnalyzer, JsonChartWriter,
//! };
//!
//! let geo = GeographyAnalyzer::new(prices, 0.02, 252)?;
//! let writer = JsonChartWriter::new("output");
//! writer.render(&geography_allocation_pie(&geo))?;
//! println!("분산 비율: {:.2}", geo.diversification_ratio());
//! ```

pub mod charts;
pub mod cross_section;
pub mod factors;
pub mod geography;

pub use charts::*;
pub use cross_section::*;
pub use factors::*;
pub use geography::*;
