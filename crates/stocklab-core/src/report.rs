//! Stock report schema

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbol::normalize_symbol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
    #[error("invalid symbol in report: {0}")]
    Symbol(#[from] crate::symbol::SymbolError),
}

/// Comprehensive stock analysis report produced by the remote analysis agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub symbol: String,
    pub company_name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_change: Option<f64>,
    #[serde(default)]
    pub price_change_percent: Option<f64>,

    pub executive_summary: String,
    #[serde(default)]
    pub recent_news: Vec<String>,
    #[serde(default)]
    pub financial_highlights: Vec<String>,
    pub market_sentiment: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    pub recommendation: String,

    pub analysis_date: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
}

impl StockReport {
    /// Check the invariants serde cannot express: required text is present
    /// and the symbol is a well-formed ticker.
    pub fn validate(&self) -> Result<(), ReportError> {
        let required = [
            ("symbol", &self.symbol),
            ("company_name", &self.company_name),
            ("executive_summary", &self.executive_summary),
            ("market_sentiment", &self.market_sentiment),
            ("recommendation", &self.recommendation),
            ("analysis_date", &self.analysis_date),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ReportError::EmptyField(name));
            }
        }

        normalize_symbol(&self.symbol)?;
        Ok(())
    }

    /// Render the report as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {} ({})\n\n", self.company_name, self.symbol);

        if let Some(price) = self.current_price {
            out.push_str(&format!("**Price:** ${:.2}", price));
            match (self.price_change, self.price_change_percent) {
                (Some(change), Some(pct)) => {
                    out.push_str(&format!(" ({:+.2}, {:+.2}%)", change, pct))
                }
                (Some(change), None) => out.push_str(&format!(" ({:+.2})", change)),
                (None, Some(pct)) => out.push_str(&format!(" ({:+.2}%)", pct)),
                (None, None) => {}
            }
            out.push_str("\n\n");
        }

        out.push_str(&format!("## Executive Summary\n\n{}\n\n", self.executive_summary));
        push_list(&mut out, "Recent News", &self.recent_news);
        push_list(&mut out, "Financial Highlights", &self.financial_highlights);
        out.push_str(&format!("## Market Sentiment\n\n{}\n\n", self.market_sentiment));
        push_list(&mut out, "Risk Factors", &self.risk_factors);
        out.push_str(&format!("## Recommendation\n\n{}\n\n", self.recommendation));
        push_list(&mut out, "Sources", &self.data_sources);
        out.push_str(&format!("_Analysis date: {}_\n", self.analysis_date));
        out
    }
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("## {}\n\n", title));
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
    out.push('\n');
}
