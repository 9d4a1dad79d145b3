//! 팩터/지역 ETF 분석 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 명령행 날짜 검증
//! - 분석 파이프라인 실행 (로드 → 통계 → 차트)
//! - 콘솔 보고서 출력

pub mod commands;

pub use commands::*;
