//! MCP Tool Router and ServerHandler Implementation
//!
//! This module implements the MCP protocol ServerHandler trait and provides
//! tool routing for exchange operations using rmcp SDK macros. Every tool is
//! named after its entry in [`crate::operations`].

use crate::config::SigningMode;
use crate::mcp::server::ExchangeServer;
use crate::mcp::types::{
    AccountParam, Authorized, CancelAllOrdersParams, CancelOrderParams, CreateLimitOrderParams,
    CreateMarketOrderParams, CreateStopOrderParams, PaginatedParam, TradeHistoryParam,
    UpdateLeverageParams, UpdateMarginModeParams, WithdrawalParams,
};
use crate::operations;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolResult, ErrorData, Implementation, InitializeResult, ProtocolVersion,
    ServerCapabilities, ToolsCapability,
};
use rmcp::{tool, tool_handler, tool_router};

/// MCP Tool Router for exchange operations
///
/// Uses the #[tool_router] macro to automatically generate routing logic
/// and JSON Schema for all tools.
#[tool_router(vis = "pub")]
impl ExchangeServer {
    // ========== Market data (public) ==========

    #[tool(description = "List tradable markets with their tick sizes, lot sizes and leverage limits")]
    pub async fn get_markets(&self) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_MARKETS, &AccountParam::default())?;
        self.execute(request).await
    }

    #[tool(description = "Get current mark, oracle and mid prices for all markets")]
    pub async fn get_prices(&self) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_PRICES, &AccountParam::default())?;
        self.execute(request).await
    }

    // ========== Account state (read-only) ==========

    #[tool(description = "Get account balance, equity, margin usage and fee tier")]
    pub async fn get_account_info(
        &self,
        Parameters(params): Parameters<AccountParam>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_ACCOUNT_INFO, &params)?;
        self.execute(request).await
    }

    #[tool(description = "Get open positions for an account")]
    pub async fn get_positions(
        &self,
        Parameters(params): Parameters<AccountParam>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_POSITIONS, &params)?;
        self.execute(request).await
    }

    #[tool(description = "Get resting orders for an account")]
    pub async fn get_open_orders(
        &self,
        Parameters(params): Parameters<AccountParam>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_OPEN_ORDERS, &params)?;
        self.execute(request).await
    }

    #[tool(description = "Get past orders for an account, newest first (paginated)")]
    pub async fn get_order_history(
        &self,
        Parameters(params): Parameters<PaginatedParam>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_ORDER_HISTORY, &params)?;
        self.execute(request).await
    }

    #[tool(description = "Get fills for an account, optionally filtered by symbol and time range (paginated)")]
    pub async fn get_trade_history(
        &self,
        Parameters(params): Parameters<TradeHistoryParam>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_TRADE_HISTORY, &params)?;
        self.execute(request).await
    }

    #[tool(description = "Get funding payments for an account (paginated)")]
    pub async fn get_funding_history(
        &self,
        Parameters(params): Parameters<PaginatedParam>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_read(&operations::GET_FUNDING_HISTORY, &params)?;
        self.execute(request).await
    }

    // ========== Orders (signed) ==========

    #[tool(description = "Place a limit order at a tick level. Signed over symbol, tick_level, amount, side, tif, reduce_only")]
    pub async fn create_limit_order(
        &self,
        Parameters(params): Parameters<Authorized<CreateLimitOrderParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::CREATE_LIMIT_ORDER, params)?;
        self.execute(request).await
    }

    #[tool(description = "Place a market order with a slippage bound. Signed over symbol, amount, side, slippage_percent, reduce_only")]
    pub async fn create_market_order(
        &self,
        Parameters(params): Parameters<Authorized<CreateMarketOrderParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::CREATE_MARKET_ORDER, params)?;
        self.execute(request).await
    }

    #[tool(description = "Place a stop-limit order. Signed over symbol, side, reduce_only, stop_price:limit_price:amount")]
    pub async fn create_stop_order(
        &self,
        Parameters(params): Parameters<Authorized<CreateStopOrderParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::CREATE_STOP_ORDER, params)?;
        self.execute(request).await
    }

    #[tool(description = "Cancel one order by id. Signed over symbol, order_id")]
    pub async fn cancel_order(
        &self,
        Parameters(params): Parameters<Authorized<CancelOrderParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::CANCEL_ORDER, params)?;
        self.execute(request).await
    }

    #[tool(description = "Cancel all open orders in a market. Signed over symbol, exclude_reduce_only")]
    pub async fn cancel_all_orders(
        &self,
        Parameters(params): Parameters<Authorized<CancelAllOrdersParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::CANCEL_ALL_ORDERS, params)?;
        self.execute(request).await
    }

    // ========== Account settings (signed) ==========

    #[tool(description = "Set leverage for a market. Signed over symbol, leverage")]
    pub async fn update_leverage(
        &self,
        Parameters(params): Parameters<Authorized<UpdateLeverageParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::UPDATE_LEVERAGE, params)?;
        self.execute(request).await
    }

    #[tool(description = "Switch a market between isolated and cross margin. Signed over symbol, is_isolated")]
    pub async fn update_margin_mode(
        &self,
        Parameters(params): Parameters<Authorized<UpdateMarginModeParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::UPDATE_MARGIN_MODE, params)?;
        self.execute(request).await
    }

    #[tool(description = "Request a collateral withdrawal. Signed over amount")]
    pub async fn request_withdrawal(
        &self,
        Parameters(params): Parameters<Authorized<WithdrawalParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = self.prepare_signed(&operations::REQUEST_WITHDRAWAL, params)?;
        self.execute(request).await
    }
}

/// ServerHandler trait implementation
///
/// Uses the #[tool_handler] macro to automatically wire the tool router
/// to the ServerHandler trait.
#[tool_handler(router = self.tool_router)]
impl ServerHandler for ExchangeServer {
    /// Returns server information and capabilities
    fn get_info(&self) -> InitializeResult {
        let signing = match self.config.signing_mode {
            SigningMode::Local => {
                "Mutating tools are signed by this server; omit `signature`."
            }
            SigningMode::PreSigned => {
                "Mutating tools require `account` and a base58 Ed25519 `signature` over the \
                 comma-separated canonical message listed in each tool description."
            }
        };

        InitializeResult {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "perpdex-provider".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Perpetuals Exchange MCP Provider".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(format!(
                "Perpetuals exchange MCP provider. Read-only tools query markets and account \
                 state; order and account-setting tools place signed requests. {}",
                signing
            )),
        }
    }
}
