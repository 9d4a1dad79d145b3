//! 콘솔 보고서 출력.
//!
//! 정의되지 않은 값(`NaN`)은 `n/a`로 표시합니다.

use std::fmt::Write;
use std::path::PathBuf;

use factor_analytics::{CorrelationMatrix, GeographicRow, PerformanceSummary, Performer};
use factor_core::AnalysisPeriod;

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn cell(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", precision, value)
    } else {
        "n/a".to_string()
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0).max(6)
}

/// 실행 헤더 (기간, 무위험 수익률).
pub fn format_header(period: &AnalysisPeriod, risk_free_rate: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "FACTOR INVESTING ANALYZER");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Analysis Period: {} to {}", period.start, period.end);
    let _ = writeln!(out, "Risk-Free Rate: {:.1}%", risk_free_rate * 100.0);
    let _ = write!(out, "{}", rule());
    out
}

/// 섹션 제목.
pub fn format_section(title: &str) -> String {
    format!("\n{}\n{}\n{}", rule(), title, rule())
}

/// 팩터 성과 요약 테이블.
pub fn format_performance_summary(summary: &PerformanceSummary) -> String {
    let width = label_width(summary.rows.iter().map(|r| r.asset.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$} {:>12} {:>12} {:>12} {:>8} {:>8} {:>12}",
        "",
        "Total Return",
        "Ann. Return",
        "Ann. Vol",
        "Sharpe",
        "Sortino",
        "Max Drawdown",
        width = width
    );
    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:<width$} {:>12} {:>12} {:>12} {:>8} {:>8} {:>12}",
            row.asset,
            cell(row.total_return, 4),
            cell(row.annualized_return, 4),
            cell(row.annualized_volatility, 4),
            cell(row.sharpe_ratio, 2),
            cell(row.sortino_ratio, 2),
            cell(row.max_drawdown, 4),
            width = width
        );
    }
    out.trim_end().to_string()
}

/// 상관행렬.
pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let width = label_width(matrix.assets.iter().map(|a| a.as_str()));
    let col_width = matrix
        .assets
        .iter()
        .map(|a| a.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = String::new();
    let _ = write!(out, "{:<width$}", "", width = width);
    for asset in &matrix.assets {
        let _ = write!(out, " {:>w$}", asset, w = col_width);
    }
    for (asset, row) in matrix.assets.iter().zip(&matrix.matrix) {
        let _ = write!(out, "\n{:<width$}", asset, width = width);
        for value in row {
            let _ = write!(out, " {:>w$}", cell(*value, 4), w = col_width);
        }
    }
    out
}

/// 지역 성과 요약 테이블 (퍼센트 단위).
pub fn format_geographic_summary(rows: &[GeographicRow]) -> String {
    let width = label_width(rows.iter().map(|r| r.region.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$} {:>16} {:>16} {:>16} {:>8} {:>16}",
        "",
        "Total Return (%)",
        "Ann. Return (%)",
        "Ann. Vol (%)",
        "Sharpe",
        "Max Drawdown (%)",
        width = width
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<width$} {:>16} {:>16} {:>16} {:>8} {:>16}",
            row.region,
            cell(row.total_return_pct, 2),
            cell(row.annualized_return_pct, 2),
            cell(row.annualized_volatility_pct, 2),
            cell(row.sharpe_ratio, 2),
            cell(row.max_drawdown_pct, 2),
            width = width
        );
    }
    out.trim_end().to_string()
}

/// 최고/최저 성과 지역 (기간 수익률 %).
pub fn format_performers(best: Option<&Performer>, worst: Option<&Performer>) -> String {
    match (best, worst) {
        (Some(best), Some(worst)) => format!(
            "Best Performer: {} ({:+.2}%)\nWorst Performer: {} ({:+.2}%)",
            best.asset,
            best.period_return * 100.0,
            worst.asset,
            worst.period_return * 100.0
        ),
        _ => "Best/Worst Performer: n/a".to_string(),
    }
}

/// 분산 비율.
pub fn format_diversification_ratio(ratio: f64) -> String {
    format!(
        "Diversification Ratio: {}\n(Higher values indicate better diversification benefits)",
        cell(ratio, 2)
    )
}

/// 생성된 파일 목록.
pub fn format_generated_files(files: &[PathBuf]) -> String {
    let mut out = String::from("Generated Files:");
    for file in files {
        let _ = write!(out, "\n  - {}", file.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use factor_analytics::PerformanceRow;

    #[test]
    fn test_header() {
        let period = AnalysisPeriod::new(
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
        .unwrap();
        let header = format_header(&period, 0.02);

        assert!(header.contains("Analysis Period: 2018-01-01 to 2023-12-31"));
        assert!(header.contains("Risk-Free Rate: 2.0%"));
    }

    #[test]
    fn test_undefined_values_shown_as_na() {
        let summary = PerformanceSummary {
            rows: vec![PerformanceRow {
                asset: "Flat".to_string(),
                total_return: 0.0,
                annualized_return: 0.0,
                annualized_volatility: 0.0,
                sharpe_ratio: f64::NAN,
                sortino_ratio: f64::NAN,
                max_drawdown: 0.0,
            }],
        };
        let table = format_performance_summary(&summary);

        assert!(table.lines().nth(1).unwrap().starts_with("Flat"));
        assert_eq!(table.matches("n/a").count(), 2);
    }

    #[test]
    fn test_performers() {
        let best = Performer {
            asset: "US Market".to_string(),
            period_return: 0.1234,
        };
        let worst = Performer {
            asset: "Europe".to_string(),
            period_return: -0.05,
        };

        let text = format_performers(Some(&best), Some(&worst));
        assert!(text.contains("Best Performer: US Market (+12.34%)"));
        assert!(text.contains("Worst Performer: Europe (-5.00%)"));
        assert!(format_performers(None, None).contains("n/a"));
    }

    #[test]
    fn test_correlation_layout() {
        let matrix = CorrelationMatrix {
            assets: vec!["Value".to_string(), "Momentum".to_string()],
            matrix: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        };
        let text = format_correlation(&matrix);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Value"));
        assert!(lines[1].contains("0.5000"));
        assert!(lines[2].trim_end().ends_with("1.0000"));
    }

    #[test]
    fn test_diversification_ratio_format() {
        assert!(format_diversification_ratio(1.23456).starts_with("Diversification Ratio: 1.23"));
        assert!(format_diversification_ratio(f64::NAN).contains("n/a"));
    }
}
