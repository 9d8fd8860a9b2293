use std::net::SocketAddr;

#[derive(Debug, serde::Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(alias = "RPC_URL", default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(alias = "PRICE_API_URL", default = "default_price_api_url")]
    pub price_api_url: String,
    #[serde(alias = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[serde(alias = "API_BIND_ADDR", default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(alias = "WALLET_ADDRESS")]
    pub wallet_address: Option<String>,
    #[serde(alias = "TRACKED_TOKENS", default = "default_tracked_tokens")]
    pub tracked_tokens: String,
    #[serde(alias = "QUOTE_REFRESH_MS", default = "default_quote_refresh_ms")]
    pub quote_refresh_ms: u64,
    #[serde(alias = "DRIFT_REFRESH_MS", default = "default_drift_refresh_ms")]
    pub drift_refresh_ms: u64,
    #[serde(alias = "MOMENTUM_REFRESH_MS", default = "default_momentum_refresh_ms")]
    pub momentum_refresh_ms: u64,
    #[serde(alias = "DRIFT_BANDWIDTH", default = "default_drift_bandwidth")]
    pub drift_bandwidth: f64,
    #[serde(alias = "EXECUTION_VARIANCE", default = "default_execution_variance")]
    pub execution_variance: f64,
    #[serde(alias = "DEFAULT_SIMULATIONS", default = "default_simulations")]
    pub default_simulations: u32,
    #[serde(alias = "MAX_SIMULATIONS", default = "default_max_simulations")]
    pub max_simulations: u32,
}

fn default_rpc_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}
fn default_price_api_url() -> String {
    "https://price.jup.ag/v4".to_string()
}
fn default_api_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_tracked_tokens() -> String {
    sim_core::constants::MAJOR_TOKENS
        .iter()
        .map(|(symbol, _)| *symbol)
        .collect::<Vec<_>>()
        .join(",")
}
fn default_quote_refresh_ms() -> u64 {
    5_000
}
fn default_drift_refresh_ms() -> u64 {
    10_000
}
fn default_momentum_refresh_ms() -> u64 {
    30_000
}
fn default_drift_bandwidth() -> f64 {
    0.01
}
fn default_execution_variance() -> f64 {
    0.3
}
fn default_simulations() -> u32 {
    5_000
}
fn default_max_simulations() -> u32 {
    100_000
}

impl EngineConfig {
    pub fn new() -> Result<Self, String> {
        let s = ::config::Config::builder()
            .add_source(::config::Environment::default())
            .build()
            .map_err(|e| format!("Config Build Error: {}", e))?;

        let config: EngineConfig = s
            .try_deserialize()
            .map_err(|e| format!("Config Deserialize Error: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values at startup (Fail Fast)
    pub fn validate(&self) -> Result<(), String> {
        if !self.rpc_url.starts_with("http") {
            return Err(format!(
                "Invalid RPC_URL: must start with http/https. Got: {}",
                self.rpc_url
            ));
        }
        if !self.price_api_url.starts_with("http") {
            return Err(format!(
                "Invalid PRICE_API_URL: must start with http/https. Got: {}",
                self.price_api_url
            ));
        }
        if self.api_bind_addr.parse::<SocketAddr>().is_err() {
            return Err(format!(
                "Invalid API_BIND_ADDR: expected host:port. Got: {}",
                self.api_bind_addr
            ));
        }

        if self.quote_refresh_ms == 0 || self.drift_refresh_ms == 0 || self.momentum_refresh_ms == 0
        {
            return Err("Refresh periods cannot be 0 ms".into());
        }
        if self.quote_refresh_ms < 100 {
            tracing::warn!(
                "⚠️ QUOTE_REFRESH_MS is very aggressive ({} ms). Public quote APIs will rate-limit.",
                self.quote_refresh_ms
            );
        }

        if self.drift_bandwidth <= 0.0 || self.drift_bandwidth > 0.5 {
            return Err(format!(
                "DRIFT_BANDWIDTH must be in (0.0, 0.5]. Got: {}",
                self.drift_bandwidth
            ));
        }
        if self.execution_variance < 0.0 || self.execution_variance >= 1.0 {
            return Err(format!(
                "EXECUTION_VARIANCE must be in [0.0, 1.0). Got: {}",
                self.execution_variance
            ));
        }

        if self.default_simulations == 0 {
            return Err("DEFAULT_SIMULATIONS cannot be 0".into());
        }
        if self.default_simulations > self.max_simulations {
            return Err(format!(
                "DEFAULT_SIMULATIONS ({}) exceeds MAX_SIMULATIONS ({})",
                self.default_simulations, self.max_simulations
            ));
        }

        if self.tracked().is_empty() {
            return Err("TRACKED_TOKENS resolved to an empty list".into());
        }

        Ok(())
    }

    /// Comma list -> trimmed, de-blanked symbols.
    pub fn tracked(&self) -> Vec<String> {
        self.tracked_tokens
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
