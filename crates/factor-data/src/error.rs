//! 데이터 모듈 오류 타입.

use factor_core::CoreError;
use thiserror::Error;

/// 가격 데이터 로드 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 소스 조회 실패 (티커 단위, 합성 데이터로 대체)
    #[error("Fetch failed for {ticker}: {reason}")]
    FetchFailure { ticker: String, reason: String },

    /// 조회는 성공했지만 데이터가 없음
    #[error("No data returned for {0}")]
    NoData(String),

    /// 응답에서 사용할 수 있는 가격 컬럼을 찾지 못함
    #[error("Unsupported schema for {ticker}: {reason}")]
    UnsupportedSchema { ticker: String, reason: String },

    /// 환율 시계열을 얻지 못함 (고정 환율로 대체)
    #[error("Currency rate unavailable for {pair}: {reason}")]
    CurrencyRateUnavailable { pair: String, reason: String },

    /// 배치 전체에서 사용할 수 있는 시계열이 하나도 없음
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// 외부 소스 연결 오류
    #[error("Connection error: {0}")]
    Connection(String),

    /// 잘못된 파라미터
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// 시계열 코어 오류
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DataError {
    /// 티커 단위로 대체 데이터를 써서 계속 진행할 수 있는 오류인지 확인합니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DataError::FetchFailure { .. }
                | DataError::NoData(_)
                | DataError::UnsupportedSchema { .. }
                | DataError::CurrencyRateUnavailable { .. }
                | DataError::Connection(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
