//! 분석 모듈 오류 타입.

use factor_core::CoreError;
use thiserror::Error;

/// 통계 계산 및 출력 오류.
///
/// 변동성이 0이라 비율을 정의할 수 없는 경우는 오류가 아니라 `f64::NAN` 값으로 나타냅니다.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 알 수 없는 롤링 지표 이름
    #[error("Invalid rolling metric '{0}' (expected volatility, return or sharpe)")]
    InvalidMetric(String),

    /// 윈도우 크기 오류
    #[error("Invalid rolling window: {0}")]
    InvalidWindow(usize),

    /// 계산에 필요한 데이터 부족
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// 출력 파일 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 시계열 코어 오류
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
