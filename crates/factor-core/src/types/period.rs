//! 분석 기간과 영업일 달력.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// 명령행에서 받는 날짜 형식 (일/월/연도).
pub const DAY_MONTH_YEAR_FORMAT: &str = "%d/%m/%Y";

/// 분석 기간 (양 끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisPeriod {
    /// 기간을 생성합니다. 시작일은 종료일보다 앞서야 합니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::Config(format!(
                "start date {} must be before end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// 기간 내 영업일(월~금) 목록.
    ///
    /// 공휴일은 고려하지 않습니다.
    pub fn business_days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| is_business_day(*d))
            .collect()
    }
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// 토요일/일요일이 아니면 영업일로 봅니다.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `DD/MM/YYYY` 형식의 날짜를 파싱합니다.
pub fn parse_day_month_year(s: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_MONTH_YEAR_FORMAT).map_err(|e| {
        CoreError::Config(format!("invalid date '{}' (expected DD/MM/YYYY): {}", s, e))
    })
}
