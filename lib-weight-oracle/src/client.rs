//! HTTP/JSON client to the weight daemon (spec §4.1, §6).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{TotalWeightCache, WeightCache};
use crate::error::{DaemonError, DaemonErrorCode, OracleError};
use crate::identity::DaemonIdentity;
use crate::ids::{Address, GenesisHash, Round, SelectionId};
use crate::wire::{
    EmptyRequest, ErrorBody, IdentityResponse, PingResponse, TotalWeightRequest,
    TotalWeightResponse, WeightRequest, WeightResponse,
};

/// Default per-request deadline (spec §4.1: "default 10 s").
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

const IDLE_CONNECTIONS_PER_HOST: usize = 10;
const IDLE_CONNECTION_LIFETIME: Duration = Duration::from_secs(90);

/// The capability the rest of the node queries: four operations, no retries,
/// safe to call concurrently from any number of tasks (spec §4.1, §5).
#[async_trait]
pub trait WeightOracle: Send + Sync {
    async fn ping(&self) -> Result<(), OracleError>;
    async fn identity(&self) -> Result<DaemonIdentity, OracleError>;
    async fn weight(
        &self,
        balance_round: Round,
        addr: Address,
        selection_id: SelectionId,
    ) -> Result<u64, OracleError>;
    async fn total_weight(
        &self,
        balance_round: Round,
        vote_round: Round,
    ) -> Result<u64, OracleError>;
}

#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub port: u16,
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// The production `WeightOracle`: HTTP to `127.0.0.1:<port>`, two bounded
/// LRU caches, one shared connection pool.
pub struct OracleClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    weight_cache: WeightCache,
    total_weight_cache: TotalWeightCache,
}

impl OracleClient {
    pub fn new(config: OracleConfig) -> Self {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(IDLE_CONNECTIONS_PER_HOST)
            .pool_idle_timeout(IDLE_CONNECTION_LIFETIME)
            .timeout(config.timeout)
            .build()
            .expect("reqwest client configuration is valid");

        Self {
            http,
            base_url: format!("http://127.0.0.1:{}", config.port),
            timeout: config.timeout,
            weight_cache: WeightCache::new(),
            total_weight_cache: TotalWeightCache::new(),
        }
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, OracleError>
    where
        Req: serde::Serialize + ?Sized,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let send = self.http.post(&url).json(body).send();

        let response = match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => return Err(OracleError::Transport(format!("{path}: {e}"))),
            Err(_) => return Err(OracleError::Timeout(self.timeout)),
        };

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| OracleError::Transport(format!("{path}: failed to read body: {e}")))?;

        if status.is_success() {
            return serde_json::from_slice::<Resp>(&bytes).map_err(|e| {
                OracleError::Transport(format!("{path}: malformed success body: {e}"))
            });
        }

        if let Ok(err_body) = serde_json::from_slice::<ErrorBody>(&bytes) {
            let code = parse_error_code(&err_body.code);
            return Err(OracleError::Daemon(DaemonError {
                code,
                msg: err_body.error,
            }));
        }

        Err(OracleError::Transport(format!(
            "{path}: http {status}: {}",
            String::from_utf8_lossy(&bytes)
        )))
    }
}

fn parse_error_code(code: &str) -> DaemonErrorCode {
    match code {
        "not_found" => DaemonErrorCode::NotFound,
        "bad_request" => DaemonErrorCode::BadRequest,
        "internal" => DaemonErrorCode::Internal,
        // Any code we don't recognize is treated the same as "unsupported":
        // the daemon understood the request shape but refused it for a
        // reason the node has no specific handling for.
        _ => DaemonErrorCode::Unsupported,
    }
}

#[async_trait]
impl WeightOracle for OracleClient {
    async fn ping(&self) -> Result<(), OracleError> {
        let resp: PingResponse = self.post("/ping", &EmptyRequest {}).await?;
        if !resp.pong {
            return Err(OracleError::Transport(
                "ping response missing pong=true".into(),
            ));
        }
        Ok(())
    }

    async fn identity(&self) -> Result<DaemonIdentity, OracleError> {
        let resp: IdentityResponse = self.post("/identity", &EmptyRequest {}).await?;
        let genesis_hash = GenesisHash::from_wire(&resp.genesis_hash)?;
        Ok(DaemonIdentity {
            genesis_hash,
            protocol_version: resp.protocol_version,
            algorithm_version: resp.algorithm_version,
        })
    }

    async fn weight(
        &self,
        balance_round: Round,
        addr: Address,
        selection_id: SelectionId,
    ) -> Result<u64, OracleError> {
        let key = (balance_round.0, addr, selection_id);
        if let Some(cached) = self.weight_cache.get(&key) {
            debug!(balance_round = balance_round.0, %addr, "weight cache hit");
            return Ok(cached);
        }

        let req = WeightRequest {
            address: addr.to_wire(),
            selection_id: selection_id.to_wire(),
            balance_round: balance_round.0,
        };
        let resp: WeightResponse = self.post("/weight", &req).await?;
        self.weight_cache.put(key, resp.weight);
        Ok(resp.weight)
    }

    async fn total_weight(
        &self,
        balance_round: Round,
        vote_round: Round,
    ) -> Result<u64, OracleError> {
        let key = (balance_round.0, vote_round.0);
        if let Some(cached) = self.total_weight_cache.get(&key) {
            debug!(balance_round = balance_round.0, vote_round = vote_round.0, "total_weight cache hit");
            return Ok(cached);
        }

        let req = TotalWeightRequest {
            balance_round: balance_round.0,
            vote_round: vote_round.0,
        };
        let resp: TotalWeightResponse = self.post("/total_weight", &req).await?;
        self.total_weight_cache.put(key, resp.total_weight);
        Ok(resp.total_weight)
    }
}
