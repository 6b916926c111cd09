//! MCP Tool Parameter Types
//!
//! This module defines parameter types for MCP tools with JsonSchema support.
//! Deserialization rejects wrong types and unknown enum values; [`Validate`]
//! checks the value constraints the schema cannot express.

use crate::error::ProviderError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum page size accepted by history endpoints
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Maximum leverage accepted by `update_leverage`
pub const MAX_LEVERAGE: u32 = 100;

/// Value checks run before any network or signing work
pub trait Validate {
    fn validate(&self) -> Result<(), ProviderError>;
}

/// Order side
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy
    Bid,
    /// Sell
    Ask,
}

/// Time in force
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// Add liquidity only (post-only)
    Alo,
}

/// Sender identity and caller-supplied signature for mutating tools
///
/// In local signing mode `signature` must be omitted and `account`, if given,
/// must be the server's own address. In pre-signed mode both are required.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Authorized<T> {
    #[serde(flatten)]
    pub params: T,

    /// Sender account address (base58)
    #[serde(default)]
    #[schemars(description = "Sender account address (base58). Required when the server runs in pre-signed mode")]
    pub account: Option<String>,

    /// Base58 Ed25519 signature over the canonical message
    #[serde(default)]
    #[schemars(description = "Base58 signature over the canonical message. Pre-signed mode only")]
    pub signature: Option<String>,
}

impl<T> Authorized<T> {
    /// Wraps parameters with no caller-supplied identity (local signing)
    pub fn local(params: T) -> Self {
        Self {
            params,
            account: None,
            signature: None,
        }
    }
}

// ========== Read-only parameters ==========

/// Parameter for account-scoped read tools
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct AccountParam {
    /// Account to query; defaults to the configured address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Account address to query (defaults to the server's configured address)")]
    pub account: Option<String>,
}

/// Parameters for paginated history tools
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct PaginatedParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Account address to query (defaults to the server's configured address)")]
    pub account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Maximum number of records to return (1-1000)")]
    pub limit: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Number of records to skip")]
    pub offset: Option<u32>,
}

/// Parameters for trade history
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TradeHistoryParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Account address to query (defaults to the server's configured address)")]
    pub account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Restrict to one market symbol (e.g., BTC)")]
    pub symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Range start, milliseconds since Unix epoch")]
    pub start_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Range end, milliseconds since Unix epoch")]
    pub end_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Maximum number of records to return (1-1000)")]
    pub limit: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Number of records to skip")]
    pub offset: Option<u32>,
}

impl Validate for AccountParam {
    fn validate(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

impl Validate for PaginatedParam {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_limit(self.limit)
    }
}

impl Validate for TradeHistoryParam {
    fn validate(&self) -> Result<(), ProviderError> {
        if let Some(symbol) = &self.symbol {
            validate_symbol(symbol)?;
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start > end {
                return Err(ProviderError::Validation(format!(
                    "start_time ({}) must not be after end_time ({})",
                    start, end
                )));
            }
        }
        validate_limit(self.limit)
    }
}

// ========== Signed parameters ==========

/// Parameters for a resting limit order
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateLimitOrderParams {
    #[schemars(description = "Market symbol (e.g., BTC); upper-cased for signing")]
    pub symbol: String,

    #[schemars(description = "Limit price expressed as a tick level")]
    pub tick_level: u64,

    #[schemars(description = "Order size in base units, as a decimal string (e.g., \"0.01\")")]
    pub amount: String,

    #[schemars(description = "Order side: bid (buy) or ask (sell)")]
    pub side: Side,

    #[schemars(description = "Time in force: GTC, IOC or ALO")]
    pub tif: TimeInForce,

    #[serde(default)]
    #[schemars(description = "Only reduce an existing position (default: false)")]
    pub reduce_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Client-assigned order id (not signed)")]
    pub client_order_id: Option<String>,
}

/// Parameters for a market order
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateMarketOrderParams {
    #[schemars(description = "Market symbol (e.g., BTC); upper-cased for signing")]
    pub symbol: String,

    #[schemars(description = "Order size in base units, as a decimal string")]
    pub amount: String,

    #[schemars(description = "Order side: bid (buy) or ask (sell)")]
    pub side: Side,

    #[schemars(description = "Maximum slippage in percent, as a decimal string (e.g., \"0.5\")")]
    pub slippage_percent: String,

    #[serde(default)]
    #[schemars(description = "Only reduce an existing position (default: false)")]
    pub reduce_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Client-assigned order id (not signed)")]
    pub client_order_id: Option<String>,
}

/// Trigger and execution terms of a stop order
///
/// Signed as `stop_price:limit_price:amount`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StopOrder {
    #[schemars(description = "Trigger price, as a decimal string")]
    pub stop_price: String,

    #[schemars(description = "Limit price once triggered, as a decimal string")]
    pub limit_price: String,

    #[schemars(description = "Order size in base units, as a decimal string")]
    pub amount: String,
}

/// Parameters for a stop order
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateStopOrderParams {
    #[schemars(description = "Market symbol (e.g., BTC); upper-cased for signing")]
    pub symbol: String,

    #[schemars(description = "Order side: bid (buy) or ask (sell)")]
    pub side: Side,

    #[serde(default)]
    #[schemars(description = "Only reduce an existing position (default: false)")]
    pub reduce_only: bool,

    #[schemars(description = "Trigger price, limit price and amount")]
    pub stop_order: StopOrder,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Client-assigned order id (not signed)")]
    pub client_order_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CancelOrderParams {
    #[schemars(description = "Market symbol of the order")]
    pub symbol: String,

    #[schemars(description = "Exchange-assigned order id")]
    pub order_id: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CancelAllOrdersParams {
    #[schemars(description = "Market symbol whose open orders are cancelled")]
    pub symbol: String,

    #[serde(default)]
    #[schemars(description = "Keep reduce-only orders open (default: false)")]
    pub exclude_reduce_only: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateLeverageParams {
    #[schemars(description = "Market symbol (e.g., ETH)")]
    pub symbol: String,

    #[schemars(description = "New leverage multiplier (1-100)")]
    pub leverage: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMarginModeParams {
    #[schemars(description = "Market symbol (e.g., ETH)")]
    pub symbol: String,

    #[schemars(description = "true for isolated margin, false for cross margin")]
    pub is_isolated: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct WithdrawalParams {
    #[schemars(description = "Amount of collateral to withdraw, as a decimal string")]
    pub amount: String,
}

impl Validate for CreateLimitOrderParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)?;
        if self.tick_level == 0 {
            return Err(ProviderError::Validation(
                "tick_level must be greater than zero".to_string(),
            ));
        }
        validate_decimal("amount", &self.amount)
    }
}

impl Validate for CreateMarketOrderParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)?;
        validate_decimal("amount", &self.amount)?;
        validate_decimal("slippage_percent", &self.slippage_percent)
    }
}

impl Validate for CreateStopOrderParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)?;
        validate_decimal("stop_order.stop_price", &self.stop_order.stop_price)?;
        validate_decimal("stop_order.limit_price", &self.stop_order.limit_price)?;
        validate_decimal("stop_order.amount", &self.stop_order.amount)
    }
}

impl Validate for CancelOrderParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)
    }
}

impl Validate for CancelAllOrdersParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)
    }
}

impl Validate for UpdateLeverageParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)?;
        if self.leverage == 0 || self.leverage > MAX_LEVERAGE {
            return Err(ProviderError::Validation(format!(
                "leverage must be between 1 and {}, got {}",
                MAX_LEVERAGE, self.leverage
            )));
        }
        Ok(())
    }
}

impl Validate for UpdateMarginModeParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_symbol(&self.symbol)
    }
}

impl Validate for WithdrawalParams {
    fn validate(&self) -> Result<(), ProviderError> {
        validate_decimal("amount", &self.amount)
    }
}

// ========== Helpers ==========

fn validate_symbol(symbol: &str) -> Result<(), ProviderError> {
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ProviderError::Validation(format!(
            "symbol must be a non-empty alphanumeric market name, got '{}'",
            symbol
        )));
    }
    Ok(())
}

/// Plain positive decimal: digits with at most one '.', no sign or exponent
fn validate_decimal(field: &str, value: &str) -> Result<(), ProviderError> {
    let well_formed = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.matches('.').count() <= 1
        && value.chars().any(|c| c.is_ascii_digit());

    let positive = well_formed && value.chars().any(|c| matches!(c, '1'..='9'));

    if !positive {
        return Err(ProviderError::Validation(format!(
            "{} must be a positive decimal string, got '{}'",
            field, value
        )));
    }
    Ok(())
}

fn validate_limit(limit: Option<u32>) -> Result<(), ProviderError> {
    match limit {
        Some(limit) if limit == 0 || limit > MAX_PAGE_LIMIT => Err(ProviderError::Validation(
            format!("limit must be between 1 and {}, got {}", MAX_PAGE_LIMIT, limit),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limit_order_deserialization() {
        let params: CreateLimitOrderParams = serde_json::from_value(json!({
            "symbol": "btc",
            "tick_level": 87000,
            "amount": "0.01",
            "side": "bid",
            "tif": "GTC"
        }))
        .unwrap();

        assert_eq!(params.side, Side::Bid);
        assert_eq!(params.tif, TimeInForce::Gtc);
        assert!(!params.reduce_only);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_unknown_side_rejected() {
        let result: Result<CreateLimitOrderParams, _> = serde_json::from_value(json!({
            "symbol": "btc",
            "tick_level": 1,
            "amount": "1",
            "side": "buy",
            "tif": "GTC"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_authorized_flattens_params() {
        let wrapped: Authorized<UpdateLeverageParams> = serde_json::from_value(json!({
            "symbol": "eth",
            "leverage": 10,
            "account": "acct",
            "signature": "sig"
        }))
        .unwrap();

        assert_eq!(wrapped.params.symbol, "eth");
        assert_eq!(wrapped.params.leverage, 10);
        assert_eq!(wrapped.account.as_deref(), Some("acct"));
        assert_eq!(wrapped.signature.as_deref(), Some("sig"));
    }

    #[test]
    fn test_serialized_record_omits_unset_options() {
        let params = CreateLimitOrderParams {
            symbol: "btc".into(),
            tick_level: 87000,
            amount: "0.01".into(),
            side: Side::Bid,
            tif: TimeInForce::Gtc,
            reduce_only: false,
            client_order_id: None,
        };
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["side"], json!("bid"));
        assert_eq!(value["tif"], json!("GTC"));
        assert!(value.get("client_order_id").is_none());
    }

    #[test]
    fn test_decimal_validation() {
        assert!(validate_decimal("amount", "0.01").is_ok());
        assert!(validate_decimal("amount", "12").is_ok());
        assert!(validate_decimal("amount", "0").is_err());
        assert!(validate_decimal("amount", "0.000").is_err());
        assert!(validate_decimal("amount", "-1").is_err());
        assert!(validate_decimal("amount", "1e5").is_err());
        assert!(validate_decimal("amount", "1.2.3").is_err());
        assert!(validate_decimal("amount", ".").is_err());
        assert!(validate_decimal("amount", "").is_err());
    }

    #[test]
    fn test_leverage_bounds() {
        let mut params = UpdateLeverageParams {
            symbol: "eth".into(),
            leverage: 0,
        };
        assert!(params.validate().is_err());
        params.leverage = 101;
        assert!(params.validate().is_err());
        params.leverage = 20;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_trade_history_range() {
        let params = TradeHistoryParam {
            start_time: Some(2_000),
            end_time: Some(1_000),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_page_limit_bounds() {
        let mut params = PaginatedParam::default();
        assert!(params.validate().is_ok());
        params.limit = Some(0);
        assert!(params.validate().is_err());
        params.limit = Some(1001);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_symbol_validation() {
        assert!(validate_symbol("BTC").is_ok());
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("BTC,ETH").is_err());
    }
}
