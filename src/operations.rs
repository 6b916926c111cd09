//! Exchange Operation Table
//!
//! One [`OperationSpec`] per MCP tool. The table is the single source of truth
//! for the HTTP method, the path and, for mutating operations, the exact
//! fields (and their order) that make up the canonical signed message.

use std::fmt;

/// HTTP method used to forward an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Declared rendering rule for one signable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Strings as-is, numbers in JSON textual form, booleans as `true`/`false`
    Verbatim,
    /// String value upper-cased (market symbols)
    Upper,
    /// Object rendered as the listed sub-fields, in order, joined by `:`
    Nested(&'static [SignableField]),
}

/// A parameter that participates in the canonical message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignableField {
    pub name: &'static str,
    pub render: Render,
}

impl SignableField {
    pub const fn verbatim(name: &'static str) -> Self {
        Self {
            name,
            render: Render::Verbatim,
        }
    }

    pub const fn upper(name: &'static str) -> Self {
        Self {
            name,
            render: Render::Upper,
        }
    }

    pub const fn nested(name: &'static str, fields: &'static [SignableField]) -> Self {
        Self {
            name,
            render: Render::Nested(fields),
        }
    }
}

/// Static description of one exchange action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Tool name, identical to the rmcp tool exposing it
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path appended to the configured base URL
    pub path: &'static str,
    /// Fields of the canonical message, in canonical order
    pub signable: &'static [SignableField],
    pub requires_signature: bool,
    /// Whether the sender identity is attached as `account`
    pub account_scoped: bool,
}

impl OperationSpec {
    const fn read(name: &'static str, path: &'static str, account_scoped: bool) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            path,
            signable: &[],
            requires_signature: false,
            account_scoped,
        }
    }

    const fn signed(
        name: &'static str,
        path: &'static str,
        signable: &'static [SignableField],
    ) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            path,
            signable,
            requires_signature: true,
            account_scoped: true,
        }
    }
}

// ========== Read-only operations ==========

pub const GET_MARKETS: OperationSpec = OperationSpec::read("get_markets", "/info", false);
pub const GET_PRICES: OperationSpec = OperationSpec::read("get_prices", "/info/prices", false);
pub const GET_ACCOUNT_INFO: OperationSpec =
    OperationSpec::read("get_account_info", "/account", true);
pub const GET_POSITIONS: OperationSpec = OperationSpec::read("get_positions", "/positions", true);
pub const GET_OPEN_ORDERS: OperationSpec = OperationSpec::read("get_open_orders", "/orders", true);
pub const GET_ORDER_HISTORY: OperationSpec =
    OperationSpec::read("get_order_history", "/orders/history", true);
pub const GET_TRADE_HISTORY: OperationSpec =
    OperationSpec::read("get_trade_history", "/trades/history", true);
pub const GET_FUNDING_HISTORY: OperationSpec =
    OperationSpec::read("get_funding_history", "/funding/history", true);

// ========== Signed operations ==========

pub const CREATE_LIMIT_ORDER: OperationSpec = OperationSpec::signed(
    "create_limit_order",
    "/orders/create",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("tick_level"),
        SignableField::verbatim("amount"),
        SignableField::verbatim("side"),
        SignableField::verbatim("tif"),
        SignableField::verbatim("reduce_only"),
    ],
);

pub const CREATE_MARKET_ORDER: OperationSpec = OperationSpec::signed(
    "create_market_order",
    "/orders/create_market",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("amount"),
        SignableField::verbatim("side"),
        SignableField::verbatim("slippage_percent"),
        SignableField::verbatim("reduce_only"),
    ],
);

/// Sub-field order of the `stop_order` object
pub const STOP_ORDER_FIELDS: &[SignableField] = &[
    SignableField::verbatim("stop_price"),
    SignableField::verbatim("limit_price"),
    SignableField::verbatim("amount"),
];

pub const CREATE_STOP_ORDER: OperationSpec = OperationSpec::signed(
    "create_stop_order",
    "/orders/stop/create",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("side"),
        SignableField::verbatim("reduce_only"),
        SignableField::nested("stop_order", STOP_ORDER_FIELDS),
    ],
);

pub const CANCEL_ORDER: OperationSpec = OperationSpec::signed(
    "cancel_order",
    "/orders/cancel",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("order_id"),
    ],
);

pub const CANCEL_ALL_ORDERS: OperationSpec = OperationSpec::signed(
    "cancel_all_orders",
    "/orders/cancel_all",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("exclude_reduce_only"),
    ],
);

pub const UPDATE_LEVERAGE: OperationSpec = OperationSpec::signed(
    "update_leverage",
    "/account/leverage",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("leverage"),
    ],
);

pub const UPDATE_MARGIN_MODE: OperationSpec = OperationSpec::signed(
    "update_margin_mode",
    "/account/margin",
    &[
        SignableField::upper("symbol"),
        SignableField::verbatim("is_isolated"),
    ],
);

pub const REQUEST_WITHDRAWAL: OperationSpec = OperationSpec::signed(
    "request_withdrawal",
    "/account/withdraw",
    &[SignableField::verbatim("amount")],
);

/// Every operation exposed as a tool
pub const ALL: &[OperationSpec] = &[
    GET_MARKETS,
    GET_PRICES,
    GET_ACCOUNT_INFO,
    GET_POSITIONS,
    GET_OPEN_ORDERS,
    GET_ORDER_HISTORY,
    GET_TRADE_HISTORY,
    GET_FUNDING_HISTORY,
    CREATE_LIMIT_ORDER,
    CREATE_MARKET_ORDER,
    CREATE_STOP_ORDER,
    CANCEL_ORDER,
    CANCEL_ALL_ORDERS,
    UPDATE_LEVERAGE,
    UPDATE_MARGIN_MODE,
    REQUEST_WITHDRAWAL,
];
