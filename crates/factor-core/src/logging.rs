//! tracing 기반 로깅 초기화.
//!
//! 설정 파일의 `[logging]` 섹션이 기본이고 `RUST_LOG`, `LOG_FORMAT` 환경 변수가
//! 그 위에 덮어씁니다. 합성 데이터 대체나 고정 환율 사용 같은 품질 저하는
//! `warn`으로, 그룹 로드 span(`analysis_span!`)은 JSON 형식일 때 레코드에
//! 함께 기록됩니다.

use std::fmt;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// 로그 수집기용, 이벤트 필드를 최상위로 펼칩니다
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        };
        f.write_str(name)
    }
}

/// subscriber 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "info", "factor_data=debug")
    pub level: String,
    pub format: LogFormat,
    /// span 종료 시 소요 시간 기록
    pub span_events: bool,
    /// 파일명과 줄 번호
    pub source_location: bool,
    pub thread_ids: bool,
    /// 모듈 경로
    pub target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_section(&LoggingConfig::default(), LogFormat::Pretty)
    }
}

impl LogConfig {
    fn from_section(section: &LoggingConfig, format: LogFormat) -> Self {
        Self {
            level: section.level.clone(),
            format,
            span_events: section.span_events,
            source_location: section.source_location,
            thread_ids: section.thread_ids,
            target: section.target,
        }
    }

    /// `[logging]` 섹션에 환경 변수를 덮어써서 만듭니다.
    ///
    /// 섹션의 형식 문자열을 해석할 수 없으면 `Config` 에러입니다.
    pub fn from_config(section: &LoggingConfig) -> CoreResult<Self> {
        let format = section
            .format
            .parse()
            .map_err(|e| CoreError::Config(format!("logging.format: {}", e)))?;
        Ok(Self::from_section(section, format).with_env_overrides())
    }

    /// 설정 파일 없이 기본값과 환경 변수만으로 만듭니다.
    ///
    /// 설정 로드가 실패했을 때도 에러를 기록할 수 있도록 사용합니다.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("RUST_LOG").ok(),
            std::env::var("LOG_FORMAT").ok(),
        )
    }

    /// 비어 있지 않은 레벨과 해석 가능한 형식만 반영합니다.
    fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.and_then(|f| f.parse().ok()) {
            self.format = format;
        }
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = tracing_subscriber::fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_thread_ids(self.thread_ids)
            .with_target(self.target)
            .with_span_events(self.span_events());

        match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Json => base
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .boxed(),
            LogFormat::Compact => base.compact().boxed(),
        }
    }
}

/// 전역 subscriber를 설치합니다.
///
/// 레벨 지시문이 잘못되었거나 이미 subscriber가 설치되어 있으면 `Logging` 에러입니다.
///
/// ```no_run
/// use factor_core::{init_logging, AppConfig, LogConfig};
///
/// let config = AppConfig::load_default()?;
/// init_logging(LogConfig::from_config(&config.logging)?)?;
/// # Ok::<(), factor_core::CoreError>(())
/// ```
pub fn init_logging(config: LogConfig) -> CoreResult<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| CoreError::Logging(format!("level '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(config.layer())
        .with(filter)
        .try_init()
        .map_err(|e| CoreError::Logging(e.to_string()))?;

    tracing::debug!(format = %config.format, level = %config.level, "로깅 초기화 완료");
    Ok(())
}

/// 분석 단계(그룹 이름, 자산 수)를 필드로 갖는 span을 생성하는 매크로.
#[macro_export]
macro_rules! analysis_span {
    ($name:expr, $group:expr) => {
        tracing::info_span!($name, group = %$group)
    };
    ($name:expr, $group:expr, $assets:expr) => {
        tracing::info_span!($name, group = %$group, assets = $assets)
    };
}
