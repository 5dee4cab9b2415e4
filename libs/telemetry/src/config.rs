use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub log_format: LogFormat,
    /// Fallback filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl TelemetryConfig {
    pub fn from_env(default_service_name: &str, default_service_version: &str) -> Self {
        let service_name =
            env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| default_service_name.to_string());
        let service_version = env::var("OTEL_SERVICE_VERSION")
            .unwrap_or_else(|_| default_service_version.to_string());
        let environment = env::var("OTEL_RESOURCE_ATTRIBUTES")
            .ok()
            .and_then(parse_environment_from_resource)
            .unwrap_or_else(|| env::var("DEPLOYMENT_ENV").unwrap_or_else(|_| "dev".into()));
        let log_format = env::var("LOG_FORMAT")
            .map(|v| parse_log_format(&v))
            .unwrap_or(LogFormat::Json);

        Self {
            service_name,
            service_version,
            environment,
            log_format,
            default_filter: "info".into(),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == LogFormat::Json
    }
}

fn parse_log_format(value: &str) -> LogFormat {
    match value.to_lowercase().as_str() {
        "text" | "pretty" | "plain" => LogFormat::Text,
        _ => LogFormat::Json,
    }
}

fn parse_environment_from_resource(value: String) -> Option<String> {
    for kv in value.split(',') {
        let mut parts = kv.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == "deployment.environment" {
            return Some(val.to_string());
        }
    }
    None
}
