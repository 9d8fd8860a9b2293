use anyhow::{Context, Result};
use std::time::Duration;
use strategy::PriceFeedPort;

/// Jupiter-style quote endpoint adapter:
/// `GET {base}/price?ids=SOL` -> `{"data":{"SOL":{"price":147.2}}}`.
pub struct HttpPriceFeed {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPriceFeed {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client construction is infallible with these options");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl PriceFeedPort for HttpPriceFeed {
    async fn fetch_price(&self, token: &str) -> Result<f64> {
        let url = format!("{}/price?ids={}", self.base_url, token);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("quote request to {url}"))?
            .error_for_status()
            .context("quote endpoint returned error status")?;

        let body: serde_json::Value = response.json().await.context("quote body was not JSON")?;
        parse_quote(&body, token)
    }
}

/// Pulled out of the adapter so the payload shape is testable offline.
fn parse_quote(body: &serde_json::Value, token: &str) -> Result<f64> {
    body["data"][token]["price"]
        .as_f64()
        .or_else(|| body["data"][token]["price"].as_str()?.parse().ok())
        .with_context(|| format!("no price for {token} in quote payload"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_price() {
        let body = json!({"data": {"SOL": {"price": 147.25}}});
        assert_eq!(parse_quote(&body, "SOL").unwrap(), 147.25);
    }

    #[test]
    fn parses_stringified_price() {
        let body = json!({"data": {"BONK": {"price": "0.0000234"}}});
        assert!((parse_quote(&body, "BONK").unwrap() - 0.0000234).abs() < 1e-12);
    }

    #[test]
    fn missing_token_is_an_error() {
        let body = json!({"data": {}});
        assert!(parse_quote(&body, "WIF").is_err());
    }
}
