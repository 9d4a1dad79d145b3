//! 설정 관리.
//!
//! TOML 파일(선택)과 `FACTOR__` 접두사 환경 변수에서 애플리케이션 설정을 읽습니다.
//! 모든 섹션에 기본값이 있으므로 파일이 없어도 내장 설정으로 동작합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::types::{AnalysisPeriod, AssetGroup, AssetSpec};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "FACTOR";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 분석 대상 자산
    pub universe: UniverseConfig,
    /// 통화 변환 설정
    pub currency: CurrencyConfig,
    /// 분석 기간
    pub period: PeriodConfig,
    /// 통계 파라미터
    pub analysis: AnalysisConfig,
    /// 데이터 소스 설정
    pub data: DataConfig,
    /// 출력 설정
    pub output: OutputConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 자산 유니버스.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub factors: Vec<AssetSpec>,
    pub geography: Vec<AssetSpec>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            factors: vec![
                AssetSpec::new("Value", "VLUE"),
                AssetSpec::new("Momentum", "MTUM"),
                AssetSpec::new("Quality", "QUAL"),
                AssetSpec::new("Low Volatility", "USMV"),
            ],
            geography: vec![
                AssetSpec::new("US Market", "SPY"),
                AssetSpec::new("Europe", "EXSA.DE"),
                AssetSpec::new("Emerging Markets", "EEM"),
            ],
        }
    }
}

impl UniverseConfig {
    /// 그룹에 속한 자산 목록.
    pub fn assets(&self, group: AssetGroup) -> &[AssetSpec] {
        match group {
            AssetGroup::Factors => &self.factors,
            AssetGroup::Geography => &self.geography,
        }
    }
}

/// 통화 변환 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// 환율 시세 심볼 (EUR/USD)
    pub pair: String,
    /// 환율 시계열을 받지 못했을 때 사용할 고정 환율
    pub fallback_rate: f64,
    /// 변환이 필요한 티커
    pub convert_tickers: Vec<String>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            pair: "EURUSD=X".to_string(),
            fallback_rate: 0.91,
            convert_tickers: ["VLUE", "MTUM", "QUAL", "USMV", "SPY", "EEM"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// 분석 기간 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PeriodConfig {
    pub start_date: NaiveDate,
    /// 비어 있으면 실행일
    pub end_date: Option<NaiveDate>,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: None,
        }
    }
}

impl PeriodConfig {
    /// 종료일이 없으면 `today`를 사용해 기간을 확정합니다.
    pub fn resolve(&self, today: NaiveDate) -> CoreResult<AnalysisPeriod> {
        AnalysisPeriod::new(self.start_date, self.end_date.unwrap_or(today))
    }
}

/// 통계 파라미터.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 연간 무위험 수익률
    pub risk_free_rate: f64,
    /// 연간 거래일 수
    pub trading_days_per_year: u32,
    /// 롤링 지표 윈도우 (관측치 수)
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            trading_days_per_year: 252,
            rolling_window: 252,
        }
    }
}

/// 데이터 소스 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 네트워크를 쓰지 않고 합성 데이터만 사용
    pub offline: bool,
    /// 티커별 조회를 동시에 실행
    pub parallel_fetch: bool,
    /// 합성 가격 경로 파라미터
    pub synthetic: SyntheticConfig,
}

/// 합성 가격 경로(기하 브라운 운동) 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub initial_price: f64,
    pub daily_drift: f64,
    pub daily_volatility: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            daily_drift: 0.0002,
            daily_volatility: 0.01,
        }
    }
}

/// 출력 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 차트 데이터를 쓸 디렉토리
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 종료 이벤트(소요 시간) 기록
    pub span_events: bool,
    /// 파일명과 줄 번호 기록
    pub source_location: bool,
    pub thread_ids: bool,
    /// 모듈 경로 기록
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
            source_location: false,
            thread_ids: false,
            target: true,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다. 파일은 반드시 존재해야 합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        Self::load_from(path.as_ref(), true)
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    fn load_from(path: &Path, required: bool) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("currency.convert_tickers"),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 값의 범위를 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.analysis.trading_days_per_year == 0 {
            return Err(CoreError::Config(
                "analysis.trading_days_per_year must be positive".to_string(),
            ));
        }
        if self.analysis.rolling_window == 0 {
            return Err(CoreError::Config(
                "analysis.rolling_window must be positive".to_string(),
            ));
        }
        if !(self.currency.fallback_rate.is_finite() && self.currency.fallback_rate > 0.0) {
            return Err(CoreError::Config(format!(
                "currency.fallback_rate must be positive, got {}",
                self.currency.fallback_rate
            )));
        }
        let vol = self.data.synthetic.daily_volatility;
        if vol.is_nan() || vol < 0.0 {
            return Err(CoreError::Config(format!(
                "data.synthetic.daily_volatility must be non-negative, got {}",
                vol
            )));
        }
        if self.universe.factors.is_empty() && self.universe.geography.is_empty() {
            return Err(CoreError::Config("universe is empty".to_string()));
        }
        Ok(())
    }
}
