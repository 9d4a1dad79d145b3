//! 차트 데이터 구조
//!
//! 분석 결과를 렌더링 계층이 소비하는 차트 데이터로 변환합니다.
//! 렌더링 자체는 [`ChartRenderer`] 구현의 몫이며, 기본 구현인 [`JsonChartWriter`]는
//! 각 차트를 `<출력 디렉터리>/<stem>.json` 파일로 기록합니다.
//!
//! # 제공 차트
//!
//! - 팩터: 누적 수익률, 낙폭, 상관행렬, 성과 지표, 샤프 비율 비교, 롤링 변동성
//! - 지역: 정규화 성과(기준 100), 지역 비중, 상관행렬, 샤프 비율 비교
//!
//! 정의되지 않은 값(`NaN`)은 `null`로 직렬화됩니다.

use chrono::NaiveDate;
use factor_core::TimeTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::geography::{GeographyAnalyzer, RiskAdjustedRow};
use crate::correlation::CorrelationMatrix;
use crate::error::Result;
use crate::performance::analyzer::PerformanceAnalyzer;
use crate::performance::metrics::PerformanceSummary;
use crate::performance::rolling::RollingMetric;

fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn defined_all(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(defined).collect()
}

/// 선 차트의 계열 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// 지표 테이블의 행 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// 차트 종류별 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartPayload {
    /// 날짜 축 선 차트
    Lines {
        dates: Vec<NaiveDate>,
        y_label: String,
        series: Vec<LineSeries>,
    },
    /// 자산 × 자산 히트맵
    Heatmap {
        labels: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    },
    /// 막대 차트
    Bars {
        labels: Vec<String>,
        y_label: String,
        values: Vec<Option<f64>>,
    },
    /// 파이 차트 (퍼센트)
    Pie {
        labels: Vec<String>,
        shares: Vec<Option<f64>>,
    },
    /// 지표 테이블
    Table {
        columns: Vec<String>,
        rows: Vec<TableRow>,
    },
}

/// 렌더링할 차트 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// 출력 파일 이름 (확장자 제외)
    pub stem: String,
    pub title: String,
    pub payload: ChartPayload,
}

impl Chart {
    pub fn new(stem: impl Into<String>, title: impl Into<String>, payload: ChartPayload) -> Self {
        Self {
            stem: stem.into(),
            title: title.into(),
            payload,
        }
    }

    fn lines(stem: &str, title: &str, table: &TimeTable, y_label: &str, scale: f64) -> Self {
        let series = table
            .iter_columns()
            .map(|(name, values)| LineSeries {
                name: name.to_string(),
                values: values.iter().map(|v| defined(v * scale)).collect(),
            })
            .collect();
        Self::new(
            stem,
            title,
            ChartPayload::Lines {
                dates: table.dates().to_vec(),
                y_label: y_label.to_string(),
                series,
            },
        )
    }

    fn heatmap(stem: &str, title: &str, matrix: &CorrelationMatrix) -> Self {
        Self::new(
            stem,
            title,
            ChartPayload::Heatmap {
                labels: matrix.assets.clone(),
                values: matrix.matrix.iter().map(|row| defined_all(row)).collect(),
            },
        )
    }

    fn bars(stem: &str, title: &str, y_label: &str, values: Vec<(String, f64)>) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) = values.into_iter().unzip();
        Self::new(
            stem,
            title,
            ChartPayload::Bars {
                labels,
                y_label: y_label.to_string(),
                values: defined_all(&values),
            },
        )
    }
}

/// 차트를 산출물로 만드는 렌더링 계층.
pub trait ChartRenderer {
    /// 차트를 렌더링하고 생성된 파일 경로를 반환합니다.
    fn render(&self, chart: &Chart) -> Result<PathBuf>;
}

/// 차트 데이터를 JSON 파일로 기록하는 렌더러.
#[derive(Debug, Clone)]
pub struct JsonChartWriter {
    dir: PathBuf,
}

impl JsonChartWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartRenderer for JsonChartWriter {
    fn render(&self, chart: &Chart) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", chart.stem));
        fs::write(&path, serde_json::to_string_pretty(chart)?)?;
        debug!(path = %path.display(), title = %chart.title, "차트 저장");
        Ok(path)
    }
}

// ==================== 팩터 차트 ====================

pub fn factor_cumulative_returns(analyzer: &PerformanceAnalyzer) -> Result<Chart> {
    Ok(Chart::lines(
        "factor_cumulative_returns",
        "Factor Performance - Cumulative Returns",
        &analyzer.cumulative_returns()?,
        "Cumulative Return (%)",
        100.0,
    ))
}

pub fn factor_drawdowns(analyzer: &PerformanceAnalyzer) -> Result<Chart> {
    Ok(Chart::lines(
        "factor_drawdowns",
        "Factor Drawdown Analysis",
        &analyzer.drawdowns()?,
        "Drawdown (%)",
        100.0,
    ))
}

pub fn factor_correlation_matrix(matrix: &CorrelationMatrix) -> Chart {
    Chart::heatmap("factor_correlation_matrix", "Factor Correlation Matrix", matrix)
}

/// 연율화 수익률(%), 연율화 변동성(%), 샤프 비율 테이블.
pub fn factor_performance_summary(summary: &PerformanceSummary) -> Chart {
    let rows = summary
        .rows
        .iter()
        .map(|row| TableRow {
            label: row.asset.clone(),
            values: vec![
                defined(row.annualized_return * 100.0),
                defined(row.annualized_volatility * 100.0),
                defined(row.sharpe_ratio),
            ],
        })
        .collect();
    Chart::new(
        "factor_performance_summary",
        "Factor Performance Metrics",
        ChartPayload::Table {
            columns: vec![
                "Annualized Return (%)".to_string(),
                "Annualized Volatility (%)".to_string(),
                "Sharpe Ratio".to_string(),
            ],
            rows,
        },
    )
}

pub fn factor_sharpe_comparison(summary: &PerformanceSummary) -> Chart {
    Chart::bars(
        "factor_sharpe_comparison",
        "Factor Sharpe Ratios Comparison",
        "Sharpe Ratio",
        summary.sharpe_ratios(),
    )
}

pub fn factor_rolling_volatility(analyzer: &PerformanceAnalyzer, window: usize) -> Result<Chart> {
    Ok(Chart::lines(
        "factor_rolling_volatility",
        &format!("Factor Rolling Volatility ({} days)", window),
        &analyzer.rolling(RollingMetric::Volatility, window)?,
        "Annualized Volatility (%)",
        100.0,
    ))
}

// ==================== 지역 차트 ====================

pub fn geography_performance(analyzer: &GeographyAnalyzer) -> Result<Chart> {
    Ok(Chart::lines(
        "geography_performance",
        "Geographic Performance - Normalized (Base 100)",
        &analyzer.relative_performance()?,
        "Normalized Value",
        1.0,
    ))
}

pub fn geography_allocation_pie(analyzer: &GeographyAnalyzer) -> Chart {
    let (labels, shares): (Vec<String>, Vec<f64>) =
        analyzer.regional_contribution().into_iter().unzip();
    Chart::new(
        "geography_allocation_pie",
        "Regional Allocation",
        ChartPayload::Pie {
            labels,
            shares: defined_all(&shares),
        },
    )
}

pub fn geography_correlation_matrix(matrix: &CorrelationMatrix) -> Chart {
    Chart::heatmap("geography_correlation_matrix", "Regional Correlation Matrix", matrix)
}

pub fn geography_sharpe_comparison(rows: &[RiskAdjustedRow]) -> Chart {
    Chart::bars(
        "geography_sharpe_comparison",
        "Regional Sharpe Ratios",
        "Sharpe Ratio",
        rows.iter()
            .map(|r| (r.region.clone(), r.sharpe_ratio))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::metrics::PerformanceRow;

    fn summary() -> PerformanceSummary {
        PerformanceSummary {
            rows: vec![
                PerformanceRow {
                    asset: "Value".to_string(),
                    total_return: 0.1,
                    annualized_return: 0.05,
                    annualized_volatility: 0.2,
                    sharpe_ratio: 0.15,
                    sortino_ratio: 0.2,
                    max_drawdown: -0.1,
                },
                PerformanceRow {
                    asset: "Flat".to_string(),
                    total_return: 0.0,
                    annualized_return: 0.0,
                    annualized_volatility: 0.0,
                    sharpe_ratio: f64::NAN,
                    sortino_ratio: f64::NAN,
                    max_drawdown: 0.0,
                },
            ],
        }
    }

    #[test]
    fn test_undefined_values_become_null() {
        let chart = factor_sharpe_comparison(&summary());
        match &chart.payload {
            ChartPayload::Bars { labels, values, .. } => {
                assert_eq!(labels, &["Value".to_string(), "Flat".to_string()]);
                assert_eq!(values, &[Some(0.15), None]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["payload"]["kind"], "bars");
        assert!(json["payload"]["values"][1].is_null());
    }

    #[test]
    fn test_summary_table_in_percent() {
        let chart = factor_performance_summary(&summary());
        assert_eq!(chart.title, "Factor Performance Metrics");
        match &chart.payload {
            ChartPayload::Table { columns, rows } => {
                assert_eq!(columns.len(), 3);
                assert!((rows[0].values[0].unwrap() - 5.0).abs() < 1e-9);
                assert!((rows[0].values[1].unwrap() - 20.0).abs() < 1e-9);
                assert_eq!(rows[1].values[2], None);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_json_writer_writes_stem_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonChartWriter::new(dir.path().join("charts"));

        let chart = factor_sharpe_comparison(&summary());
        let path = writer.render(&chart).unwrap();

        assert_eq!(path, dir.path().join("charts").join("factor_sharpe_comparison.json"));
        let written: Chart = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, chart);
    }
}
