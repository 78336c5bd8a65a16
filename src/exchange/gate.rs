use async_trait::async_trait;
use hmac::{ Hmac, Mac };
use reqwest::{ Client as HttpClient, Url };
use serde::{ Deserialize, Serialize };
use sha2::{ Digest, Sha512 };
use std::time::{ Duration, Instant };
use tracing::{ debug, error, info };

use crate::enums::side::OrderSide;
use crate::models::order::{ OrderAck, OrderRequest };
use crate::models::symbol::{ Symbol, SYMBOL_DELIMITER };
use super::client::ExchangeClient;
use super::error::{ ExchangeError, Result };

type HmacSha512 = Hmac<Sha512>;

const LIVE_URL: &str = "https://api.gateio.ws/api/v4/";
const TESTNET_URL: &str = "https://api-testnet.gateapi.io/api/v4/";

/// Gate separates pair assets with `_` ("ETH_USDT")
const GATE_DELIMITER: char = '_';

// Shared singleton client for connection pooling
lazy_static::lazy_static! {
    static ref HTTP_CLIENT: HttpClient = HttpClient::builder()
        .timeout(Duration::from_secs(10))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .build()
        .unwrap_or_else(|_| HttpClient::new());
}

pub struct GateClient {
    /// Base URL for API requests
    base_url: Url,

    /// API key for authenticated requests
    api_key: String,

    /// API secret for request signing
    api_secret: String,

    /// Whether to use the testnet
    sandbox: bool,
}

#[derive(Debug, Deserialize)]
struct GateCurrencyPair {
    id: String,
    #[serde(default)]
    trade_status: String,
}

#[derive(Debug, Deserialize)]
struct GateTicker {
    #[serde(default)]
    last: String,
}

#[derive(Debug, Serialize)]
struct GateOrderBody<'a> {
    text: String,
    currency_pair: String,
    #[serde(rename = "type")]
    order_type: &'a str,
    account: &'a str,
    side: OrderSide,
    amount: String,
    price: String,
    time_in_force: &'a str,
}

#[derive(Debug, Deserialize)]
struct GateOrder {
    id: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GateApiError {
    #[serde(default)]
    label: String,
    #[serde(default)]
    message: String,
}

impl GateClient {
    /// Create a new Gate client
    pub fn new(api_key: String, api_secret: String, sandbox: bool) -> Result<Self> {
        let base_url = Url::parse(if sandbox { TESTNET_URL } else { LIVE_URL })?;

        Ok(Self {
            base_url,
            api_key,
            api_secret,
            sandbox,
        })
    }

    /// "ETH_USDT" -> "ETH/USDT"
    fn to_unified(pair_id: &str) -> String {
        pair_id.replacen(GATE_DELIMITER, &SYMBOL_DELIMITER.to_string(), 1)
    }

    /// "ETH/USDT" -> "ETH_USDT"
    fn to_pair_id(symbol: &str) -> Result<String> {
        let symbol = Symbol::parse(symbol).map_err(|e| ExchangeError::Parse(e.to_string()))?;
        Ok(format!("{}{}{}", symbol.base_asset, GATE_DELIMITER, symbol.quote_asset))
    }

    /// Hex HMAC-SHA512 over `METHOD\nPATH\nQUERY\nSHA512(body)\nTIMESTAMP`
    fn sign(
        secret: &str,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
        timestamp: i64
    ) -> Result<String> {
        let body_hash = hex::encode(Sha512::digest(body.as_bytes()));
        let payload = format!("{}\n{}\n{}\n{}\n{}", method, path, query, body_hash, timestamp);

        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).map_err(|e|
            ExchangeError::Auth(format!("Invalid secret key: {}", e))
        )?;
        mac.update(payload.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Unified names of the pairs that are open for trading
    fn tradable_symbols(pairs: Vec<GateCurrencyPair>) -> Vec<String> {
        pairs
            .into_iter()
            .filter(|pair| pair.trade_status == "tradable")
            .map(|pair| Self::to_unified(&pair.id))
            .collect()
    }

    /// Last traded price, `None` when the ticker is missing, blank or not a finite number
    fn last_price(tickers: &[GateTicker]) -> Option<f64> {
        tickers
            .first()
            .and_then(|ticker| ticker.last.trim().parse::<f64>().ok())
            .filter(|price| price.is_finite())
    }

    /// Turn a non-2xx response into an error, keeping Gate's label when present
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        error!("Gate API error: {} - {}", status, text);

        let body = match serde_json::from_str::<GateApiError>(&text) {
            Ok(api_error) => format!("{}: {}", api_error.label, api_error.message),
            Err(_) => text,
        };

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ExchangeError::Auth(body));
        }

        Err(ExchangeError::Api { status: status.as_u16(), body })
    }
}

#[async_trait]
impl ExchangeClient for GateClient {
    fn name(&self) -> &str {
        if self.sandbox { "Gate Testnet" } else { "Gate" }
    }

    async fn list_symbols(&self) -> Result<Vec<String>> {
        let start = Instant::now();
        debug!("Fetching currency pairs from Gate");

        let url = self.base_url.join("spot/currency_pairs")?;
        let response = Self::check_status(HTTP_CLIENT.get(url).send().await?).await?;

        let pairs: Vec<GateCurrencyPair> = response
            .json().await
            .map_err(|e| ExchangeError::Parse(format!("currency pairs: {}", e)))?;

        let symbols = Self::tradable_symbols(pairs);

        info!("Fetched {} tradable symbols from Gate in {:.2?}", symbols.len(), start.elapsed());

        Ok(symbols)
    }

    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>> {
        let mut url = self.base_url.join("spot/tickers")?;
        url.query_pairs_mut().append_pair("currency_pair", &Self::to_pair_id(symbol)?);

        let response = Self::check_status(HTTP_CLIENT.get(url).send().await?).await?;

        let tickers: Vec<GateTicker> = response
            .json().await
            .map_err(|e| ExchangeError::Parse(format!("ticker {}: {}", symbol, e)))?;

        let price = Self::last_price(&tickers);

        debug!(symbol, ?price, "Fetched ticker");

        Ok(price)
    }

    async fn place_limit_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(ExchangeError::Auth("API key and secret are required to trade".into()));
        }

        let url = self.base_url.join("spot/orders")?;

        // Gate limits custom order text to 28 characters including the `t-` prefix
        let mut text = format!("t-{}", uuid::Uuid::new_v4().simple());
        text.truncate(28);

        let body = serde_json
            ::to_string(
                &(GateOrderBody {
                    text,
                    currency_pair: Self::to_pair_id(&order.symbol)?,
                    order_type: "limit",
                    account: "spot",
                    side: order.side,
                    amount: order.quantity.to_string(),
                    price: order.limit_price.to_string(),
                    time_in_force: "gtc",
                })
            )
            .map_err(|e| ExchangeError::Parse(e.to_string()))?;

        let timestamp = chrono::Utc::now().timestamp();
        let signature = Self::sign(&self.api_secret, "POST", url.path(), "", &body, timestamp)?;

        let response = HTTP_CLIENT.post(url)
            .header("KEY", &self.api_key)
            .header("Timestamp", timestamp.to_string())
            .header("SIGN", signature)
            .header("Content-Type", "application/json")
            .body(body)
            .send().await?;

        let placed: GateOrder = Self::check_status(response).await?
            .json().await
            .map_err(|e| ExchangeError::Parse(format!("order response: {}", e)))?;

        if placed.status == "cancelled" {
            return Err(
                ExchangeError::Rejected(format!("order {} on {} was cancelled", placed.id, order.symbol))
            );
        }

        info!(
            order_id = %placed.id,
            symbol = %order.symbol,
            side = %order.side,
            quantity = order.quantity,
            price = order.limit_price,
            "Limit order placed"
        );

        Ok(OrderAck {
            order_id: placed.id,
            symbol: order.symbol.clone(),
            side: order.side,
            status: placed.status,
        })
    }
}
