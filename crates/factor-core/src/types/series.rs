//! 날짜 인덱스를 명시적으로 갖는 시계열.
//!
//! 모든 원소별 연산은 인덱스가 같은 시계열끼리만 허용됩니다.
//! 인덱스가 다르면 먼저 [`AlignedSeries::join`] 또는
//! [`AlignedSeries::reindex`]로 정렬해야 합니다.
//!
//! 결측값은 `f64::NAN`으로 표현합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};

/// 두 시계열을 정렬할 때 사용할 인덱스.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinHow {
    /// 합집합 인덱스, 없는 날짜는 NaN
    Outer,
    /// 교집합 인덱스
    Inner,
}

/// 이름이 붙은 (날짜, 값) 시계열.
///
/// 날짜는 항상 엄격하게 증가합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl AlignedSeries {
    /// 날짜와 값 벡터로 시계열을 생성합니다.
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> CoreResult<Self> {
        let name = name.into();
        if dates.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::UnsortedIndex(format!(
                "{}: {} 다음에 {}",
                name, w[0], w[1]
            )));
        }
        Ok(Self { name, dates, values })
    }

    /// 정렬되지 않은 (날짜, 값) 쌍에서 생성합니다. 중복 날짜는 에러입니다.
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> CoreResult<Self> {
        let mut pairs: Vec<_> = pairs.into_iter().collect();
        pairs.sort_by_key(|(d, _)| *d);
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(name, dates, values)
    }

    /// 빈 시계열.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// 해당 날짜의 값. 날짜가 인덱스에 없으면 `None`.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|i| self.values[i])
    }

    /// 유한한 값의 개수.
    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// 첫 번째 유한한 관측치.
    pub fn first_valid(&self) -> Option<(NaiveDate, f64)> {
        self.iter().find(|(_, v)| v.is_finite())
    }

    /// 마지막 유한한 관측치.
    pub fn last_valid(&self) -> Option<(NaiveDate, f64)> {
        self.iter().rev().find(|(_, v)| v.is_finite())
    }

    /// 주어진 인덱스로 재배치합니다. 없는 날짜는 NaN입니다.
    pub fn reindex(&self, dates: &[NaiveDate]) -> Self {
        let values = dates
            .iter()
            .map(|d| self.get(*d).unwrap_or(f64::NAN))
            .collect();
        Self {
            name: self.name.clone(),
            dates: dates.to_vec(),
            values,
        }
    }

    /// 주어진 인덱스로 재배치하면서, 각 날짜에 그 날짜 이전(포함)의
    /// 마지막 유한한 값을 채웁니다.
    ///
    /// 첫 관측치보다 앞선 날짜는 NaN으로 남습니다.
    /// `dates`는 증가 순서여야 합니다.
    pub fn reindex_forward_fill(&self, dates: &[NaiveDate]) -> Self {
        let mut values = Vec::with_capacity(dates.len());
        let mut cursor = 0;
        let mut last = f64::NAN;
        for d in dates {
            while cursor < self.dates.len() && self.dates[cursor] <= *d {
                if self.values[cursor].is_finite() {
                    last = self.values[cursor];
                }
                cursor += 1;
            }
            values.push(last);
        }
        Self {
            name: self.name.clone(),
            dates: dates.to_vec(),
            values,
        }
    }

    /// 결측값을 직전의 유한한 값으로 채웁니다.
    pub fn forward_fill(&self) -> Self {
        let mut last = f64::NAN;
        let values = self
            .values
            .iter()
            .map(|v| {
                if v.is_finite() {
                    last = *v;
                }
                last
            })
            .collect();
        Self {
            name: self.name.clone(),
            dates: self.dates.clone(),
            values,
        }
    }

    /// 두 시계열을 같은 인덱스로 정렬합니다.
    pub fn join(&self, other: &AlignedSeries, how: JoinHow) -> (AlignedSeries, AlignedSeries) {
        let index: Vec<NaiveDate> = match how {
            JoinHow::Outer => {
                let set: BTreeSet<NaiveDate> =
                    self.dates.iter().chain(other.dates.iter()).copied().collect();
                set.into_iter().collect()
            }
            JoinHow::Inner => self
                .dates
                .iter()
                .copied()
                .filter(|d| other.dates.binary_search(d).is_ok())
                .collect(),
        };
        (self.reindex(&index), other.reindex(&index))
    }

    /// 각 값에 함수를 적용합니다.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            name: self.name.clone(),
            dates: self.dates.clone(),
            values: self.values.iter().map(|v| f(*v)).collect(),
        }
    }

    /// 상수배.
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// 같은 인덱스의 시계열과 원소별 곱.
    pub fn mul(&self, other: &AlignedSeries) -> CoreResult<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// 같은 인덱스의 시계열과 원소별 나눗셈.
    pub fn div(&self, other: &AlignedSeries) -> CoreResult<Self> {
        self.zip_with(other, |a, b| a / b)
    }

    fn zip_with(&self, other: &AlignedSeries, f: impl Fn(f64, f64) -> f64) -> CoreResult<Self> {
        if self.dates != other.dates {
            return Err(CoreError::IndexMismatch(format!(
                "{} ({}개) vs {} ({}개)",
                self.name,
                self.len(),
                other.name,
                other.len()
            )));
        }
        Ok(Self {
            name: self.name.clone(),
            dates: self.dates.clone(),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    /// 기간 대비 변화율. 첫 행은 제거됩니다.
    ///
    /// 두 값 중 하나가 결측이거나 직전 값이 0이면 NaN입니다.
    pub fn pct_change(&self) -> Self {
        let values = self
            .values
            .windows(2)
            .map(|w| fractional_change(w[0], w[1]))
            .collect();
        Self {
            name: self.name.clone(),
            dates: self.dates.iter().skip(1).copied().collect(),
            values,
        }
    }
}

/// `prev → curr` 변화율.
pub fn fractional_change(prev: f64, curr: f64) -> f64 {
    if prev.is_finite() && curr.is_finite() && prev != 0.0 {
        curr / prev - 1.0
    } else {
        f64::NAN
    }
}
