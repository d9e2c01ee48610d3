pub mod cache;
pub mod domain;
pub mod predict;
pub mod sample;
pub mod schedule;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub schedule_base_url: Option<String>,
        pub schedule_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                schedule_base_url: std::env::var("SCHEDULE_API_BASE_URL").ok(),
                schedule_api_key: std::env::var("SCHEDULE_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_schedule_base_url(&self) -> anyhow::Result<&str> {
            self.schedule_base_url
                .as_deref()
                .context("SCHEDULE_API_BASE_URL is required")
        }
    }
}
