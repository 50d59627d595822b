//! API Server Module
//!
//! This module implements a JSON-RPC server exposing the distribution entry
//! points. Every request locks the shared world for its whole duration, so
//! calls execute strictly one after another.

use crate::{
    config::Config,
    distributor::BatchDistributor,
    error::DisperseError,
    ledger::Ledger,
    state::World,
};
use axum::{Router, extract::State, routing::post, Json};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Shared application state that is accessible across all request handlers
///
/// - `world`: native balances and token ledgers, behind one lock
/// - `distributor`: the batch distributor every call goes through
#[derive(Clone)]
pub struct AppState {
    world: Arc<Mutex<World>>,
    distributor: Arc<BatchDistributor>,
}

/// The main API server struct
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, distributor address)
    /// * `world` - Initial native balances and token ledgers
    pub fn new(config: Config, world: World) -> Self {
        // One distributor serves every request, so its guard is shared too
        let distributor = Arc::new(BatchDistributor::new(config.distributor.address));

        // The world sits behind a single lock held for a whole call
        let state = AppState {
            world: Arc::new(Mutex::new(world)),
            distributor,
        };

        Self { config, state }
    }

    /// Router with a single POST endpoint at "/" handling JSON-RPC requests.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_rpc))
            .with_state(self.state.clone())
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` if the server runs to completion, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = self.router();

        // Bind to the configured host and port
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        // Serve until the process is stopped
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Value,
}

/// JSON-RPC 2.0 response structure
///
/// Either `result` or `error` is populated, never both.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct JsonRpcResponse {
    pub(crate) jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<JsonRpcError>,
    pub(crate) id: Value,
}

/// JSON-RPC error object
///
/// - `code`: -32601 method not found, -32602 invalid params, -32000 distribution failed
/// - `data`: for distribution failures, `{"kind": <error variant>}`
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct JsonRpcError {
    pub(crate) code: i32,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<Value>,
}

impl JsonRpcError {
    fn method_not_found() -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: None,
        }
    }

    fn invalid_params(message: impl std::fmt::Display) -> Self {
        Self {
            code: -32602,
            message: format!("Invalid params: {}", message),
            data: None,
        }
    }
}

impl From<DisperseError> for JsonRpcError {
    fn from(err: DisperseError) -> Self {
        Self {
            code: -32000,
            message: err.to_string(),
            data: Some(json!({ "kind": err.kind() })),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DisperseNativeParams {
    from: Address,
    recipients: Vec<Address>,
    values: Vec<U256>,
    value: U256,
}

#[derive(Debug, Deserialize)]
struct DisperseTokenParams {
    from: Address,
    token: Address,
    recipients: Vec<Address>,
    values: Vec<U256>,
}

#[derive(Debug, Deserialize)]
struct ApproveParams {
    from: Address,
    token: Address,
    spender: Address,
    amount: U256,
}

#[derive(Debug, Deserialize)]
struct BalanceParams {
    account: Address,
}

#[derive(Debug, Deserialize)]
struct TokenBalanceParams {
    token: Address,
    account: Address,
}

type RpcResult = Result<Value, JsonRpcError>;

/// Main RPC request handler
///
/// Routes the request to the handler for its method and wraps the outcome
/// in a JSON-RPC response.
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    info!("Received RPC request: {}", request.method);

    let outcome = match request.method.as_str() {
        "disperseEther" => handle_disperse_ether(&state, request.params).await,
        "disperseToken" => handle_disperse_token(&state, request.params, false).await,
        "disperseTokenSimple" => handle_disperse_token(&state, request.params, true).await,
        "approve" => handle_approve(&state, request.params).await,
        "getBalance" => handle_get_balance(&state, request.params).await,
        "balanceOf" => handle_balance_of(&state, request.params).await,
        _ => Err(JsonRpcError::method_not_found()),
    };

    let (result, error) = match outcome {
        Ok(value) => (Some(value), None),
        Err(err) => (None, Some(err)),
    };

    Json(JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result,
        error,
        id: request.id,
    })
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(params).map_err(|e| {
        error!("Failed to deserialize params: {}", e);
        JsonRpcError::invalid_params(e)
    })
}

fn to_result<T: Serialize>(value: T) -> RpcResult {
    serde_json::to_value(value).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {}", e),
        data: None,
    })
}

/// Handles "disperseEther": native distribution with attached `value`.
async fn handle_disperse_ether(state: &AppState, params: Value) -> RpcResult {
    let params: DisperseNativeParams = parse_params(params)?;

    let mut world = state.world.lock().await;
    let receipt = state
        .distributor
        .distribute_native(
            &mut world.bank,
            params.from,
            &params.recipients,
            &params.values,
            params.value,
        )
        .map_err(|e| {
            warn!("disperseEther from {:?} rejected: {}", params.from, e);
            JsonRpcError::from(e)
        })?;

    to_result(receipt)
}

/// Handles "disperseToken" (pooled) and "disperseTokenSimple" (direct).
async fn handle_disperse_token(state: &AppState, params: Value, direct: bool) -> RpcResult {
    let params: DisperseTokenParams = parse_params(params)?;

    let mut world = state.world.lock().await;
    let ledger = world
        .token_mut(&params.token)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("unknown token {:?}", params.token)))?;

    let outcome = if direct {
        state
            .distributor
            .distribute_token_direct(ledger, params.from, &params.recipients, &params.values)
    } else {
        state
            .distributor
            .distribute_token_pooled(ledger, params.from, &params.recipients, &params.values)
    };

    let receipt = outcome.map_err(|e| {
        warn!("Token distribution from {:?} rejected: {}", params.from, e);
        JsonRpcError::from(e)
    })?;

    to_result(receipt)
}

/// Handles "approve": `from` lets `spender` move up to `amount` of `token`.
async fn handle_approve(state: &AppState, params: Value) -> RpcResult {
    let params: ApproveParams = parse_params(params)?;

    let mut world = state.world.lock().await;
    let ledger = world
        .token_mut(&params.token)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("unknown token {:?}", params.token)))?;
    ledger.approve(params.from, params.spender, params.amount);
    info!(
        "{:?} approved {:?} for {} of {}",
        params.from,
        params.spender,
        params.amount,
        ledger.symbol()
    );

    Ok(Value::Bool(true))
}

/// Handles "getBalance": native balance of `account`.
async fn handle_get_balance(state: &AppState, params: Value) -> RpcResult {
    let params: BalanceParams = parse_params(params)?;
    let world = state.world.lock().await;
    to_result(world.bank.balance_of(params.account))
}

/// Handles "balanceOf": token balance of `account`.
async fn handle_balance_of(state: &AppState, params: Value) -> RpcResult {
    let params: TokenBalanceParams = parse_params(params)?;
    let world = state.world.lock().await;
    let ledger = world
        .token(&params.token)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("unknown token {:?}", params.token)))?;
    to_result(ledger.balance_of(params.account))
}
