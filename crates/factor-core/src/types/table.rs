//! 공통 날짜 인덱스를 공유하는 다중 컬럼 테이블.
//!
//! - `TimeTable` - 컬럼 우선(column-major) 저장 테이블
//! - `PriceTable` - 자산별 가격 테이블
//! - `ReturnTable` - 가격 테이블에서 파생된 일간 수익률 테이블

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Deref;

use super::series::{fractional_change, AlignedSeries};
use crate::error::{CoreError, CoreResult};

/// 날짜 인덱스 하나와 이름 붙은 컬럼들.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl TimeTable {
    /// 날짜 인덱스와 (이름, 값) 컬럼 목록으로 테이블을 생성합니다.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<f64>)>) -> CoreResult<Self> {
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::UnsortedIndex(format!("{} 다음에 {}", w[0], w[1])));
        }

        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if names.contains(&name) {
                return Err(CoreError::DuplicateColumn(name));
            }
            if values.len() != dates.len() {
                return Err(CoreError::LengthMismatch {
                    dates: dates.len(),
                    values: values.len(),
                });
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            dates,
            columns: names,
            data,
        })
    }

    /// 여러 시계열을 합집합 날짜 인덱스로 외부 조인합니다.
    pub fn from_series(series: Vec<AlignedSeries>) -> CoreResult<Self> {
        let index: BTreeSet<NaiveDate> = series
            .iter()
            .flat_map(|s| s.dates().iter().copied())
            .collect();
        let dates: Vec<NaiveDate> = index.into_iter().collect();

        let columns = series
            .iter()
            .map(|s| (s.name().to_string(), s.reindex(&dates).values().to_vec()))
            .collect();
        Self::new(dates, columns)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    /// 이름으로 컬럼 값을 조회합니다.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    /// 위치로 컬럼 값을 조회합니다.
    pub fn column_at(&self, index: usize) -> &[f64] {
        &self.data[index]
    }

    /// (이름, 값) 순회.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().map(Vec::as_slice))
    }

    /// 컬럼 하나를 시계열로 꺼냅니다.
    pub fn series(&self, name: &str) -> Option<AlignedSeries> {
        let values = self.column(name)?.to_vec();
        AlignedSeries::new(name, self.dates.clone(), values).ok()
    }

    /// 한 행의 값들 (컬럼 순서).
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.data.iter().map(|c| c[index]).collect()
    }

    /// 모든 컬럼이 결측인 행을 제거합니다.
    pub fn drop_all_missing_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&i| self.data.iter().any(|c| c[i].is_finite()))
            .collect();
        self.take_rows(&keep)
    }

    /// 각 컬럼에 같은 변환을 적용한 새 테이블.
    ///
    /// 변환 결과의 길이가 달라지면 에러를 반환합니다.
    pub fn map_columns(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> CoreResult<Self> {
        let columns = self
            .iter_columns()
            .map(|(name, values)| (name.to_string(), f(values)))
            .collect();
        Self::new(self.dates.clone(), columns)
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            columns: self.columns.clone(),
            data: self
                .data
                .iter()
                .map(|c| rows.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }
}

/// 자산별 가격 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable(TimeTable);

impl PriceTable {
    /// 자산별 가격 시계열을 외부 조인하고, 모든 자산이 결측인 행을 제거합니다.
    pub fn assemble(series: Vec<AlignedSeries>) -> CoreResult<Self> {
        if series.is_empty() {
            return Err(CoreError::Empty("조립할 가격 시계열이 없습니다".to_string()));
        }
        let table = TimeTable::from_series(series)?;
        Ok(Self(table.drop_all_missing_rows()))
    }

    pub fn from_table(table: TimeTable) -> Self {
        Self(table)
    }

    /// 일간 변화율 테이블. 첫 행은 제거되므로 행 수는 하나 줄어듭니다.
    pub fn returns(&self) -> ReturnTable {
        let dates = self.0.dates.iter().skip(1).copied().collect();
        let data = self
            .0
            .data
            .iter()
            .map(|c| c.windows(2).map(|w| fractional_change(w[0], w[1])).collect())
            .collect();
        ReturnTable(TimeTable {
            dates,
            columns: self.0.columns.clone(),
            data,
        })
    }
}

impl Deref for PriceTable {
    type Target = TimeTable;

    fn deref(&self) -> &TimeTable {
        &self.0
    }
}

/// 일간 수익률 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnTable(TimeTable);

impl ReturnTable {
    pub fn from_table(table: TimeTable) -> Self {
        Self(table)
    }

    /// 초기값에서 복리로 누적한 정규화 가격 테이블.
    ///
    /// 결측 수익률은 0으로 보고 직전 가격을 유지합니다.
    pub fn compound_prices(&self, initial: f64) -> PriceTable {
        let data = self
            .0
            .data
            .iter()
            .map(|c| {
                let mut level = initial;
                c.iter()
                    .map(|r| {
                        if r.is_finite() {
                            level *= 1.0 + r;
                        }
                        level
                    })
                    .collect()
            })
            .collect();
        PriceTable(TimeTable {
            dates: self.0.dates.clone(),
            columns: self.0.columns.clone(),
            data,
        })
    }
}

impl Deref for ReturnTable {
    type Target = TimeTable;

    fn deref(&self) -> &TimeTable {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn series(name: &str, days: &[u32], values: &[f64]) -> AlignedSeries {
        AlignedSeries::new(name, days.iter().map(|x| d(*x)).collect(), values.to_vec()).unwrap()
    }

    #[test]
    fn test_from_series_outer_joins() {
        let table = TimeTable::from_series(vec![
            series("A", &[1, 2], &[1.0, 2.0]),
            series("B", &[2, 3], &[20.0, 30.0]),
        ])
        .unwrap();

        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
        assert!(table.column("A").unwrap()[2].is_nan());
        assert!(table.column("B").unwrap()[0].is_nan());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = TimeTable::from_series(vec![
            series("A", &[1], &[1.0]),
            series("A", &[2], &[2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateColumn(name) if name == "A"));
    }

    #[test]
    fn test_assemble_drops_all_missing_rows() {
        let prices = PriceTable::assemble(vec![
            series("A", &[1, 2, 3], &[1.0, f64::NAN, 3.0]),
            series("B", &[1, 2, 3], &[10.0, f64::NAN, f64::NAN]),
        ])
        .unwrap();

        assert_eq!(prices.dates(), &[d(1), d(3)]);
        assert!(prices.column("B").unwrap()[1].is_nan());
    }

    #[test]
    fn test_assemble_empty_is_error() {
        assert!(matches!(
            PriceTable::assemble(Vec::new()),
            Err(CoreError::Empty(_))
        ));
    }

    #[test]
    fn test_returns_and_compounding() {
        let prices = PriceTable::assemble(vec![series("A", &[1, 2, 3], &[100.0, 110.0, 99.0])]).unwrap();
        let returns = prices.returns();

        assert_eq!(returns.n_rows(), 2);
        assert_eq!(returns.dates()[0], d(2));
        let r = returns.column("A").unwrap();
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] + 0.1).abs() < 1e-12);

        let rebuilt = returns.compound_prices(100.0);
        let p = rebuilt.column("A").unwrap();
        assert!((p[0] - 110.0).abs() < 1e-9);
        assert!((p[1] - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_map_columns_keeps_shape() {
        let table = TimeTable::from_series(vec![series("A", &[1, 2], &[1.0, 2.0])]).unwrap();
        let doubled = table.map_columns(|c| c.iter().map(|v| v * 2.0).collect()).unwrap();
        assert_eq!(doubled.column("A").unwrap(), &[2.0, 4.0]);

        assert!(table.map_columns(|_| vec![1.0]).is_err());
    }

    proptest! {
        #[test]
        fn prop_returns_have_one_fewer_row(
            a in prop::collection::vec(1.0f64..1000.0, 2..60),
            b in prop::collection::vec(1.0f64..1000.0, 2..60),
        ) {
            let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            let dates = |n: usize| -> Vec<NaiveDate> {
                (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect()
            };
            let sa = AlignedSeries::new("A", dates(a.len()), a.clone()).unwrap();
            let sb = AlignedSeries::new("B", dates(b.len()), b.clone()).unwrap();

            let prices = PriceTable::assemble(vec![sa, sb]).unwrap();
            let returns = prices.returns();

            prop_assert_eq!(returns.n_rows(), prices.n_rows() - 1);
            prop_assert_eq!(returns.columns(), prices.columns());
        }
    }
}
