//! 성과 통계 및 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 수익률 기반 성과 지표 (누적 수익률, 낙폭, 샤프/소르티노 비율)
//! - 상관행렬과 롤링 지표
//! - 팩터/지역 분석기 (비중, 최고/최저 자산, 분산 비율)
//! - 렌더링 계층에 넘길 차트 데이터
//!
//! # Re-exports
//!
//! - [`performance`]: 성과 지표 계산 (PerformanceAnalyzer, RollingMetric 등)
//! - [`portfolio`]: 횡단면 분석과 차트 (FactorAnalyzer, GeographyAnalyzer, Chart 등)

pub mod correlation;
pub mod error;
pub mod performance;
pub mod portfolio;

pub use correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use error::{AnalyticsError, Result};

// Performance 모듈 re-exports
pub use performance::analyzer::{PerformanceAnalyzer, NORMALIZED_BASE};
pub use performance::metrics::{
    PerformanceRow, PerformanceSummary, DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR,
    ZERO_VOLATILITY_EPSILON,
};
pub use performance::rolling::{rolling_metric, RollingMetric};

// Portfolio 모듈 re-exports
pub use portfolio::charts::{Chart, ChartPayload, ChartRenderer, JsonChartWriter};
pub use portfolio::cross_section::Performer;
pub use portfolio::factors::{FactorAnalyzer, FactorReport};
pub use portfolio::geography::{GeographicRow, GeographyAnalyzer, RiskAdjustedRow};
