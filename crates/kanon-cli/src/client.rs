//! HTTP client for the node API.

use clap::Args;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use kanon_registry::Call;

/// Header carrying the caller identity.
const CALLER_HEADER: &str = "x-kanon-caller";

/// Connection options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct NodeArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:8545")]
    pub endpoint: String,

    /// Identity to submit calls as.
    #[arg(long)]
    pub caller: Option<String>,
}

/// A successful call as reported by the node.
#[derive(Debug, Deserialize)]
pub struct Receipt {
    pub op: String,
    pub seq: Option<u64>,
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    kind: String,
    error: String,
}

impl NodeArgs {
    /// Endpoint URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("endpoint {} cannot take a path", self.endpoint))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST a call to the node.
    pub async fn submit(&self, call: &Call) -> anyhow::Result<Receipt> {
        let url = self.url(&["api", "v1", "calls"])?;
        tracing::debug!(%url, op = call.op(), "submitting call");

        let mut req = reqwest::Client::new().post(url).json(call);
        if let Some(ref caller) = self.caller {
            req = req.header(CALLER_HEADER, caller);
        }
        let resp = req.send().await.map_err(|e| self.unreachable(e))?;
        decode(call.op(), resp).await
    }

    /// GET a read endpoint under `/api/v1` and decode its body.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> anyhow::Result<T> {
        let mut path = vec!["api", "v1"];
        path.extend_from_slice(segments);
        let url = self.url(&path)?;
        tracing::debug!(%url, "querying node");

        let resp = reqwest::get(url).await.map_err(|e| self.unreachable(e))?;
        decode(&segments.join("/"), resp).await
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow::anyhow!(
            "could not reach node at {}: {}\nIs the node running? Start it with: kanon-node",
            self.endpoint,
            e
        )
    }
}

async fn decode<T: DeserializeOwned>(what: &str, resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{} failed (HTTP {}, {}): {}", what, status, err.kind, err.error),
        Err(_) => anyhow::bail!("{} failed (HTTP {})", what, status),
    }
}

/// Print the outcome of a write.
pub fn print_receipt(receipt: &Receipt) {
    match receipt.seq {
        Some(seq) => println!("{} committed at seq {}", receipt.op, seq),
        None => println!("{} ok", receipt.op),
    }
}
