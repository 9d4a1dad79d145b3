//! Yahoo Finance 일봉 클라이언트.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::{MarketDataClient, OhlcvRow};
use crate::error::{DataError, Result};

/// `yahoo_finance_api` 기반 시세 클라이언트.
pub struct YahooClient {
    connector: yahoo::YahooConnector,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::Connection(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl MarketDataClient for YahooClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<OhlcvRow>> {
        let from = naive_date_to_offset_datetime(start)?;
        // Yahoo의 종료 시각은 배타적이므로 하루를 더합니다.
        let to = naive_date_to_offset_datetime(end + Duration::days(1))?;

        debug!(ticker, start = %start, end = %end, "Yahoo Finance 일봉 조회");

        let response = self
            .connector
            .get_quote_history_interval(ticker, from, to, "1d")
            .await
            .map_err(|e| DataError::FetchFailure {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })?;

        let quotes = response.quotes().map_err(|e| DataError::UnsupportedSchema {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })?;

        let rows: Vec<OhlcvRow> = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(OhlcvRow {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    adj_close: Some(q.adjclose),
                    volume: q.volume,
                })
            })
            .filter(|r| r.date >= start && r.date <= end)
            .collect();

        debug!(ticker, rows = rows.len(), "Yahoo Finance 응답 수신");
        Ok(rows)
    }
}

/// NaiveDate를 UTC 자정의 OffsetDateTime으로 변환.
fn naive_date_to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let invalid = |e: String| DataError::InvalidParameter(format!("date {}: {}", date, e));
    let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(e.to_string()))?;
    let day = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| invalid(e.to_string()))?;
    Ok(day.midnight().assume_utc())
}
