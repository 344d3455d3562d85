use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::IspError;

pub const UNKNOWN: &str = "unknown";

/// Public address and a human readable name for the network it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IspInfo {
    pub ip: String,
    pub label: String,
}

// subset of the ipinfo.io schema
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    ip: Option<String>,
    hostname: Option<String>,
    org: Option<String>,
}

impl TryFrom<IpInfoResponse> for IspInfo {
    type Error = IspError;

    fn try_from(r: IpInfoResponse) -> Result<Self, IspError> {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        let ip = non_empty(r.ip).ok_or(IspError::MissingField("ip"))?;
        let label = non_empty(r.org)
            .or_else(|| non_empty(r.hostname))
            .unwrap_or_else(|| ip.clone());
        Ok(Self { ip, label })
    }
}

pub async fn lookup(url: &str, timeout: Duration) -> Result<IspInfo, IspError> {
    let url = Url::parse(url)?;
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let body: IpInfoResponse = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let info = IspInfo::try_from(body)?;
    tracing::info!(ip = %info.ip, isp = %info.label, "network identity");
    Ok(info)
}

/// Label to tag a run with. Lookup failures fall back to [`UNKNOWN`].
pub async fn label_for(url: Option<&str>, timeout: Duration) -> String {
    let Some(url) = url else {
        return UNKNOWN.into();
    };
    match lookup(url, timeout).await {
        Ok(info) => info.label,
        Err(e) => {
            tracing::warn!(error = %e, "error fetching IP information");
            UNKNOWN.into()
        }
    }
}
