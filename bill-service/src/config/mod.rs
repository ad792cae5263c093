use serde::Deserialize;
use service_core::config as core_config;
use service_core::config::{Environment, env_or};
use service_core::error::AppError;
use std::env;

/// Model used when ADVISOR_TEXT_MODEL is not set.
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct BillConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub advisor: AdvisorConfig,
    pub google: GoogleConfig,
    pub seed_demo_bills: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    pub provider: ProviderKind,
    pub text_model: String,
    /// Whether the mock provider answers or fails with NotConfigured.
    pub mock_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Mock => "mock",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "mock" => ProviderKind::Mock,
            _ => ProviderKind::Gemini,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
}

impl BillConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let environment = Environment::current();

        Ok(BillConfig {
            common,
            service_name: env_or("SERVICE_NAME", Some("bill-service"), environment)?,
            log_level: env_or("LOG_LEVEL", Some("info"), environment)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            advisor: AdvisorConfig {
                provider: ProviderKind::from_string(&env_or(
                    "ADVISOR_PROVIDER",
                    Some("gemini"),
                    environment,
                )?),
                text_model: env_or("ADVISOR_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL), environment)?,
                mock_enabled: env_or("ADVISOR_MOCK_ENABLED", Some("true"), environment)?
                    .parse()
                    .unwrap_or(true),
            },
            google: GoogleConfig {
                api_key: env_or("GOOGLE_API_KEY", None, environment)?,
            },
            seed_demo_bills: env_or("SEED_DEMO_BILLS", Some("false"), environment)?
                .parse()
                .unwrap_or(false),
        })
    }
}
