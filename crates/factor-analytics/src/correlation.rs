//! 상관계수 계산 모듈.
//!
//! 자산 간 수익률 움직임의 상관관계를 계산합니다.
//!
//! # 주요 기능
//!
//! - **Pearson 상관계수**: 두 자산 간 선형 상관관계 측정
//! - **상관행렬**: 여러 자산 간 상관관계를 N×N 행렬로 표현
//!
//! 결측값이 있으면 두 시계열 모두 유한한 날짜만 사용합니다(pairwise complete).

use factor_core::TimeTable;
use serde::{Deserialize, Serialize};

use crate::performance::metrics::ZERO_VOLATILITY_EPSILON;

/// 상관행렬 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 자산 목록 (행/열 순서)
    pub assets: Vec<String>,
    /// 상관계수 행렬 (N×N, -1.0 ~ 1.0, 정의되지 않으면 NaN)
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// 두 자산 간 상관계수.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.assets.iter().position(|x| x == a)?;
        let j = self.assets.iter().position(|x| x == b)?;
        Some(self.matrix[i][j])
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Pearson 상관계수.
///
/// 두 값이 모두 유한한 관측치가 2개 미만이거나 한쪽 분산이 0이면 `NaN`입니다.
/// 결과는 [-1, 1]로 제한합니다.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let std_x = (var_x / (n - 1.0)).sqrt();
    let std_y = (var_y / (n - 1.0)).sqrt();
    if std_x < ZERO_VOLATILITY_EPSILON || std_y < ZERO_VOLATILITY_EPSILON {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// 테이블의 모든 컬럼 쌍에 대한 상관행렬.
///
/// 대각 원소는 항상 1.0이고 행렬은 대칭입니다.
pub fn correlation_matrix(table: &TimeTable) -> CorrelationMatrix {
    let n = table.n_cols();
    let mut matrix = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let corr = pearson(table.column_at(i), table.column_at(j));
            matrix[i][j] = corr;
            matrix[j][i] = corr;
        }
    }

    CorrelationMatrix {
        assets: table.columns().to_vec(),
        matrix,
    }
}
