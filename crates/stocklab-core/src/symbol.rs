//! Stock symbol normalization and reference dates

use thiserror::Error;

/// Longest ticker accepted after normalization
pub const MAX_SYMBOL_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Stock symbol cannot be empty")]
    Empty,
    #[error("Invalid stock symbol format: {0}")]
    InvalidFormat(String),
}

/// Trim and uppercase a ticker, rejecting anything that is not 1-5 ASCII
/// alphanumerics.
pub fn normalize_symbol(symbol: &str) -> Result<String, SymbolError> {
    let normalized = symbol.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(SymbolError::Empty);
    }

    if normalized.len() > MAX_SYMBOL_LEN || !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SymbolError::InvalidFormat(symbol.to_string()));
    }

    Ok(normalized)
}

/// Today's local date as `YYYY-MM-DD`
pub fn current_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uppercases_and_trims() {
        assert_eq!(normalize_symbol("  aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk1").unwrap(), "BRK1");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_symbol(""), Err(SymbolError::Empty));
        assert_eq!(normalize_symbol("   "), Err(SymbolError::Empty));
    }

    #[test]
    fn test_normalize_too_long() {
        let err = normalize_symbol("GOOGLE").unwrap_err();
        assert_eq!(err, SymbolError::InvalidFormat("GOOGLE".to_string()));
    }

    #[test]
    fn test_normalize_rejects_punctuation() {
        assert!(normalize_symbol("BRK.B").is_err());
        assert!(normalize_symbol("A-B").is_err());
        assert!(normalize_symbol("ÄPL").is_err());
    }

    #[test]
    fn test_max_length_accepted() {
        assert_eq!(normalize_symbol("abcde").unwrap(), "ABCDE");
    }

    #[test]
    fn test_current_date_format() {
        let date = current_date();
        assert_eq!(date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }
}
