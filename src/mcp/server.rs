//! MCP Server Implementation
//!
//! This module contains the ExchangeServer struct which implements the MCP
//! ServerHandler trait, and the request preparation every tool goes through:
//! read-only tools become GET requests, mutating tools become signed POSTs.

use crate::config::{ProviderConfig, SigningMode};
use crate::error::{ConfigError, ProviderError, Result};
use crate::exchange::{ExchangeClient, OutboundRequest};
use crate::mcp::types::{Authorized, Validate};
use crate::operations::OperationSpec;
use crate::signing::{CanonicalSigner, ParameterRecord};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::model::{CallToolResult, Content, ErrorData};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Main exchange MCP server
///
/// Cheap to clone: configuration is shared and never mutated after startup.
#[derive(Clone)]
pub struct ExchangeServer {
    /// Immutable process configuration
    pub config: Arc<ProviderConfig>,

    /// Exchange API client for making requests
    pub client: ExchangeClient,

    /// Canonical message signer shared by all mutating tools
    pub signer: CanonicalSigner,

    /// Tool router for MCP tool routing
    pub tool_router: ToolRouter<Self>,
}

impl ExchangeServer {
    /// Creates a server signing with Ed25519
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Self::with_signer(config, CanonicalSigner::default())
    }

    /// Creates a server with a specific signer
    pub fn with_signer(config: ProviderConfig, signer: CanonicalSigner) -> Result<Self> {
        let client = ExchangeClient::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            signer,
            tool_router: Self::tool_router(),
        })
    }

    /// Builds the GET request for a read-only tool
    ///
    /// Account-scoped operations get `account` set to the caller's value or,
    /// failing that, the configured sender address. Never signs.
    pub fn prepare_read<T>(&self, spec: &'static OperationSpec, params: &T) -> Result<OutboundRequest>
    where
        T: Serialize + Validate,
    {
        params.validate()?;
        let mut record = to_record(params)?;

        if spec.account_scoped {
            let requested = match record.remove("account") {
                Some(Value::String(account)) => Some(account),
                _ => None,
            };
            let account = self.resolve_account(requested)?;
            record.insert("account".to_string(), Value::String(account));
        }

        Ok(OutboundRequest::query(spec, &record))
    }

    /// Builds the signed POST request for a mutating tool
    ///
    /// # Errors
    /// * `Validation` - bad parameters, or `account`/`signature` misuse for
    ///   the current signing mode
    /// * `Configuration(NoIdentityConfigured)` - local mode without a secret
    /// * `Signing` - key rejected, or a pre-signed signature fails verification
    pub fn prepare_signed<T>(
        &self,
        spec: &'static OperationSpec,
        authorized: Authorized<T>,
    ) -> Result<OutboundRequest>
    where
        T: Serialize + Validate,
    {
        let Authorized {
            params,
            account,
            signature,
        } = authorized;

        params.validate()?;
        let record = to_record(&params)?;

        let signed = match self.config.signing_mode {
            SigningMode::Local => {
                if signature.is_some() {
                    return Err(ProviderError::Validation(
                        "signature must be omitted: this server signs requests itself".to_string(),
                    ));
                }
                let identity = self
                    .config
                    .identity
                    .as_ref()
                    .ok_or(ConfigError::NoIdentityConfigured)?;
                if let Some(account) = account {
                    if account != identity.address() {
                        return Err(ProviderError::Validation(format!(
                            "account '{}' does not match the server's signing address",
                            account
                        )));
                    }
                }
                self.signer
                    .build_signed_request(spec, record, Some(identity))?
            }
            SigningMode::PreSigned => {
                let account = account.ok_or_else(|| {
                    ProviderError::Validation(
                        "account is required: this server forwards pre-signed requests"
                            .to_string(),
                    )
                })?;
                let signature = signature.ok_or_else(|| {
                    ProviderError::Validation(
                        "signature is required: this server forwards pre-signed requests"
                            .to_string(),
                    )
                })?;
                self.signer
                    .attach_presigned(spec, record, account, signature)?
            }
        };

        Ok(OutboundRequest::signed(spec, signed))
    }

    /// Sends a prepared request and wraps the JSON body as tool output
    pub async fn execute(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        tracing::info!(
            tool = request.operation,
            method = %request.method,
            path = request.path,
            "Forwarding tool call"
        );

        let body = self.client.send(&request).await.map_err(|e| {
            tracing::warn!(tool = request.operation, error = %e, "Tool call failed");
            ProviderError::from(e)
        })?;

        Ok(CallToolResult::success(vec![Content::text(body)]))
    }

    fn resolve_account(&self, requested: Option<String>) -> Result<String> {
        requested
            .filter(|account| !account.trim().is_empty())
            .or_else(|| self.config.sender_address().map(str::to_string))
            .ok_or_else(|| {
                ProviderError::Validation(
                    "account is required: pass one or set PERPDEX_ADDRESS".to_string(),
                )
            })
    }
}

fn to_record<T: Serialize>(params: &T) -> Result<ParameterRecord> {
    match serde_json::to_value(params)? {
        Value::Object(record) => Ok(record),
        other => Err(ProviderError::Validation(format!(
            "tool parameters must be an object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;
    use crate::error::SigningError;
    use crate::mcp::types::{
        AccountParam, CancelOrderParams, CreateLimitOrderParams, PaginatedParam, Side,
        TimeInForce, UpdateLeverageParams,
    };
    use crate::operations::{self, HttpMethod};
    use crate::signing::{primitive::SigningPrimitive, Identity};
    use serde_json::json;
    use std::time::Duration;

    /// Fails the test if the signing primitive is reached
    struct UnreachablePrimitive;

    impl SigningPrimitive for UnreachablePrimitive {
        fn sign(&self, _: &[u8], _: &[u8]) -> std::result::Result<Vec<u8>, SigningError> {
            panic!("signing primitive must not be called");
        }

        fn verify(&self, _: &[u8], _: &[u8], _: &[u8]) -> std::result::Result<(), SigningError> {
            panic!("signing primitive must not be called");
        }
    }

    fn identity() -> Identity {
        Identity::new(None, SecretString::new(bs58::encode([11u8; 32]).into_string())).unwrap()
    }

    fn config(mode: SigningMode, identity: Option<Identity>) -> ProviderConfig {
        ProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            signing_mode: mode,
            identity,
            address: None,
        }
    }

    fn limit_order() -> CreateLimitOrderParams {
        CreateLimitOrderParams {
            symbol: "btc".into(),
            tick_level: 87000,
            amount: "0.01".into(),
            side: Side::Bid,
            tif: TimeInForce::Gtc,
            reduce_only: false,
            client_order_id: Some("client-7".into()),
        }
    }

    #[test]
    fn test_read_uses_configured_address_without_signing() {
        let id = identity();
        let address = id.address().to_string();
        let server = ExchangeServer::with_signer(
            config(SigningMode::Local, Some(id)),
            CanonicalSigner::new(Arc::new(UnreachablePrimitive)),
        )
        .unwrap();

        let request = server
            .prepare_read(&operations::GET_ACCOUNT_INFO, &AccountParam::default())
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/account");
        assert_eq!(request.query, vec![("account".to_string(), address)]);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_read_without_any_account() {
        let server = ExchangeServer::new(config(SigningMode::Local, None)).unwrap();
        let err = server
            .prepare_read(&operations::GET_POSITIONS, &AccountParam::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[test]
    fn test_read_caller_account_overrides() {
        let server = ExchangeServer::new(config(SigningMode::Local, None)).unwrap();
        let params = PaginatedParam {
            account: Some("someone".into()),
            limit: Some(25),
            offset: None,
        };

        let request = server
            .prepare_read(&operations::GET_ORDER_HISTORY, &params)
            .unwrap();
        assert!(request
            .query
            .contains(&("account".to_string(), "someone".to_string())));
        assert!(request
            .query
            .contains(&("limit".to_string(), "25".to_string())));
    }

    #[test]
    fn test_market_info_not_account_scoped() {
        let server = ExchangeServer::new(config(SigningMode::Local, None)).unwrap();
        let request = server
            .prepare_read(&operations::GET_MARKETS, &AccountParam::default())
            .unwrap();
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_local_signing_body() {
        let id = identity();
        let server =
            ExchangeServer::new(config(SigningMode::Local, Some(id.clone()))).unwrap();

        let request = server
            .prepare_signed(&operations::CREATE_LIMIT_ORDER, Authorized::local(limit_order()))
            .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/orders/create");
        let body = request.body.unwrap();
        assert_eq!(body["account"], json!(id.address()));
        assert_eq!(body["client_order_id"], json!("client-7"));
        assert_eq!(body["tick_level"], json!(87000));

        let signature = body["signature"].as_str().unwrap();
        assert!(server
            .signer
            .verify("BTC,87000,0.01,bid,GTC,false", signature, id.address())
            .is_ok());
    }

    #[test]
    fn test_local_without_identity_never_signs() {
        let server = ExchangeServer::with_signer(
            config(SigningMode::Local, None),
            CanonicalSigner::new(Arc::new(UnreachablePrimitive)),
        )
        .unwrap();

        let err = server
            .prepare_signed(&operations::CREATE_LIMIT_ORDER, Authorized::local(limit_order()))
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration(ConfigError::NoIdentityConfigured)
        ));
    }

    #[test]
    fn test_local_rejects_caller_signature() {
        let server = ExchangeServer::new(config(SigningMode::Local, Some(identity()))).unwrap();
        let mut authorized = Authorized::local(limit_order());
        authorized.signature = Some("abc".into());

        assert!(matches!(
            server.prepare_signed(&operations::CREATE_LIMIT_ORDER, authorized),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_local_rejects_foreign_account() {
        let server = ExchangeServer::new(config(SigningMode::Local, Some(identity()))).unwrap();
        let mut authorized = Authorized::local(UpdateLeverageParams {
            symbol: "eth".into(),
            leverage: 10,
        });
        authorized.account = Some("11111111111111111111111111111111".into());

        assert!(matches!(
            server.prepare_signed(&operations::UPDATE_LEVERAGE, authorized),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_runs_before_signing() {
        let server = ExchangeServer::with_signer(
            config(SigningMode::Local, Some(identity())),
            CanonicalSigner::new(Arc::new(UnreachablePrimitive)),
        )
        .unwrap();
        let mut order = limit_order();
        order.amount = "-1".into();

        assert!(matches!(
            server.prepare_signed(&operations::CREATE_LIMIT_ORDER, Authorized::local(order)),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_presigned_round_trip() {
        let caller = identity();
        let server = ExchangeServer::new(config(SigningMode::PreSigned, None)).unwrap();
        let signature = server.signer.sign("BTC,99", Some(&caller)).unwrap();

        let request = server
            .prepare_signed(
                &operations::CANCEL_ORDER,
                Authorized {
                    params: CancelOrderParams {
                        symbol: "btc".into(),
                        order_id: 99,
                    },
                    account: Some(caller.address().to_string()),
                    signature: Some(signature.clone()),
                },
            )
            .unwrap();

        let body = request.body.unwrap();
        assert_eq!(body["signature"], json!(signature));
        assert_eq!(body["account"], json!(caller.address()));
    }

    #[test]
    fn test_presigned_requires_signature() {
        let server = ExchangeServer::new(config(SigningMode::PreSigned, None)).unwrap();
        let mut authorized = Authorized::local(UpdateLeverageParams {
            symbol: "eth".into(),
            leverage: 10,
        });
        authorized.account = Some(identity().address().to_string());

        assert!(matches!(
            server.prepare_signed(&operations::UPDATE_LEVERAGE, authorized),
            Err(ProviderError::Validation(_))
        ));
    }

    #[test]
    fn test_presigned_requires_account() {
        let caller = identity();
        let server = ExchangeServer::with_signer(
            config(SigningMode::PreSigned, None),
            CanonicalSigner::new(Arc::new(UnreachablePrimitive)),
        )
        .unwrap();
        let signature = CanonicalSigner::default()
            .sign("ETH,10", Some(&caller))
            .unwrap();

        let err = server
            .prepare_signed(
                &operations::UPDATE_LEVERAGE,
                Authorized {
                    params: UpdateLeverageParams {
                        symbol: "eth".into(),
                        leverage: 10,
                    },
                    account: None,
                    signature: Some(signature),
                },
            )
            .unwrap_err();
        match err {
            ProviderError::Validation(msg) => assert!(msg.contains("account")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_presigned_tampered_params_rejected() {
        let caller = identity();
        let server = ExchangeServer::new(config(SigningMode::PreSigned, None)).unwrap();
        let signature = server.signer.sign("ETH,10", Some(&caller)).unwrap();

        let err = server
            .prepare_signed(
                &operations::UPDATE_LEVERAGE,
                Authorized {
                    params: UpdateLeverageParams {
                        symbol: "eth".into(),
                        leverage: 50,
                    },
                    account: Some(caller.address().to_string()),
                    signature: Some(signature),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Signing(SigningError::VerificationFailed)
        ));
    }
}
