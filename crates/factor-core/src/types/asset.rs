//! 분석 대상 자산 정의.
//!
//! - `AssetGroup` - 자산 그룹 (팩터 ETF, 지역 ETF)
//! - `AssetSpec` - 표시 이름과 티커 심볼의 쌍

use serde::{Deserialize, Serialize};
use std::fmt;

/// 자산 그룹 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetGroup {
    /// 팩터 ETF (Value, Momentum, Quality, Low Volatility)
    Factors,
    /// 지역 ETF (미국, 유럽, 신흥국)
    Geography,
}

impl fmt::Display for AssetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetGroup::Factors => write!(f, "factors"),
            AssetGroup::Geography => write!(f, "geography"),
        }
    }
}

/// 표시 이름 → 티커 매핑 한 건.
///
/// 테이블의 컬럼 이름은 `name`, 외부 데이터 조회에는 `ticker`를 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetSpec {
    /// 표시 이름 (예: "Low Volatility")
    pub name: String,
    /// 티커 심볼 (예: "USMV", "EXSA.DE")
    pub ticker: String,
}

impl AssetSpec {
    /// 새 자산 정의를 생성합니다.
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
        }
    }

    /// 통화 변환 대상인지 확인합니다.
    pub fn needs_conversion(&self, convert_tickers: &[String]) -> bool {
        convert_tickers
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&self.ticker))
    }
}

impl fmt::Display for AssetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_conversion_ignores_case() {
        let spec = AssetSpec::new("US Market", "SPY");
        assert!(spec.needs_conversion(&["spy".to_string()]));
        assert!(!spec.needs_conversion(&["EEM".to_string()]));
    }

    #[test]
    fn test_display() {
        let spec = AssetSpec::new("Europe", "EXSA.DE");
        assert_eq!(spec.to_string(), "Europe (EXSA.DE)");
        assert_eq!(AssetGroup::Geography.to_string(), "geography");
    }
}
