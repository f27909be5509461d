use std::time::Duration;

use crate::config::Settings;

const IP_ECHO_URL: &str = "https://api.ipify.org/";

/// Shared HTTP client for portal scraping and metadata calls, carrying the
/// configured user agent, per-request timeout and optional proxy.
pub fn build_http_client(settings: &Settings) -> crate::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.request_timeout_secs));

    if let Some(proxy) = &settings.proxy {
        let mut proxy_config = reqwest::Proxy::all(&proxy.address)?;
        if let (Some(username), Some(password)) = (&proxy.username, &proxy.password) {
            proxy_config = proxy_config.basic_auth(username, password);
        }
        builder = builder.proxy(proxy_config);
    }

    Ok(builder.build()?)
}

/// The public IP outbound requests originate from, as seen by an external
/// echo service. Used at startup to verify proxy routing.
pub async fn egress_ip(client: &reqwest::Client) -> Option<String> {
    let response = match client.get(IP_ECHO_URL).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(error = %e, "egress ip check failed");
            return None;
        }
    };
    if !response.status().is_success() {
        return None;
    }
    let ip = response.text().await.ok()?.trim().to_string();
    if ip.is_empty() {
        return None;
    }
    Some(ip)
}
