//! `request_stock_analysis` tool: delegates stock analysis to the remote A2A agent

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use stocklab_core::normalize_symbol;

use crate::client::A2aClient;

/// A named capability an agent can invoke with JSON input
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<String>;
}

/// Tool that requests a stock report from the A2A analysis agent
pub struct StockAnalysisTool {
    client: A2aClient,
    base_url: String,
}

impl StockAnalysisTool {
    pub fn new(client: A2aClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ToolHandler for StockAnalysisTool {
    fn name(&self) -> &str {
        "request_stock_analysis"
    }

    fn description(&self) -> &str {
        "Request detailed stock analysis via the A2A protocol from the stock analysis agent. \
         Provide the stock symbol (e.g. AAPL, TSLA)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol, 1-5 letters or digits"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let symbol = input
            .get("symbol")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing 'symbol' parameter"))?;
        let symbol = normalize_symbol(symbol)?;

        debug!("Delegating analysis of {} to {}", symbol, self.base_url);
        let report = self.client.request_analysis(&self.base_url, &symbol).await?;
        Ok(report.to_markdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> StockAnalysisTool {
        StockAnalysisTool::new(A2aClient::default(), "http://127.0.0.1:1")
    }

    #[test]
    fn test_tool_schema() {
        let tool = tool();
        assert_eq!(tool.name(), "request_stock_analysis");
        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("symbol")));
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let err = tool().execute(serde_json::json!({})).await.unwrap_err();
        assert!(err.to_string().contains("symbol"));
    }

    #[tokio::test]
    async fn test_invalid_symbol_rejected_before_network() {
        let err = tool()
            .execute(serde_json::json!({"symbol": "TOOLONG"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid stock symbol"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let err = tool()
            .execute(serde_json::json!({"symbol": "aapl"}))
            .await
            .unwrap_err();
        let a2a = err.downcast_ref::<crate::A2aError>().unwrap();
        assert_eq!(a2a.kind(), "ConnectionError");
    }
}
