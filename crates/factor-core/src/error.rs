//! 시계열 코어의 에러 타입.
//!
//! 시계열 생성, 정렬(join), 테이블 조립 과정에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 시계열 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 빈 시계열
    #[error("빈 시계열: {0}")]
    Empty(String),

    /// 날짜와 값의 길이 불일치
    #[error("길이 불일치: 날짜 {dates}개, 값 {values}개")]
    LengthMismatch { dates: usize, values: usize },

    /// 날짜 인덱스가 증가 순서가 아니거나 중복됨
    #[error("정렬되지 않은 날짜 인덱스: {0}")]
    UnsortedIndex(String),

    /// 두 시계열의 날짜 인덱스가 달라 원소별 연산을 할 수 없음
    #[error("날짜 인덱스 불일치: {0}")]
    IndexMismatch(String),

    /// 같은 테이블에 같은 이름의 컬럼이 두 번 들어옴
    #[error("중복 컬럼: {0}")]
    DuplicateColumn(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 로깅 초기화 에러
    #[error("로깅 초기화 실패: {0}")]
    Logging(String),
}

/// 코어 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
