use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::events::Event;

type HmacSha256 = Hmac<Sha256>;

/// HMAC signature generator for webhook authentication
pub struct SignatureGenerator {
    secret: String,
}

impl SignatureGenerator {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Signs `"{timestamp}.{body}"` with HMAC-SHA256, hex-encoded.
    pub fn sign_payload(&self, timestamp: &str, body: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, body);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Verifies an inbound webhook signature against `x-timestamp` and
/// `x-signature` header values, rejecting stale timestamps.
pub fn verify_signature(
    timestamp: &str,
    signature: &str,
    body: &[u8],
    secret: &str,
    tolerance_secs: u64,
) -> bool {
    let Ok(ts) = timestamp.parse::<i64>() else {
        return false;
    };
    let now = chrono::Utc::now().timestamp();
    if (now - ts).unsigned_abs() > tolerance_secs {
        warn!("Webhook timestamp outside tolerance window");
        return false;
    }

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    // Constant-time comparison over the hex digests
    expected.len() == signature.len()
        && expected
            .bytes()
            .zip(signature.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b.to_ascii_lowercase()))
            == 0
}

/// Delivers domain events to a configured outbound webhook endpoint.
pub struct EventWebhookService {
    client: reqwest::Client,
    signature_generator: Option<Arc<SignatureGenerator>>,
}

impl EventWebhookService {
    pub fn new(webhook_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            signature_generator: webhook_secret
                .map(|secret| Arc::new(SignatureGenerator::new(secret))),
        }
    }

    /// POSTs the event envelope to `url`, signing when configured.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub async fn deliver(&self, url: &str, event: &Event) -> Result<(), ServiceError> {
        let body = json!({
            "type": event.name(),
            "occurred_at": chrono::Utc::now().to_rfc3339(),
            "data": event,
        });
        let body_text = serde_json::to_string(&body)
            .map_err(|e| ServiceError::EventError(format!("serialize webhook body: {e}")))?;

        let mut request = self
            .client
            .post(url)
            .header("content-type", "application/json");

        if let Some(signer) = &self.signature_generator {
            let timestamp = chrono::Utc::now().timestamp().to_string();
            let signature = signer.sign_payload(&timestamp, &body_text);
            request = request
                .header("x-timestamp", timestamp)
                .header("x-signature", signature);
        }

        let response = request
            .body(body_text)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("webhook delivery: {e}")))?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "webhook endpoint returned {}",
                response.status()
            )));
        }

        info!(url, "Event delivered to webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip_verifies() {
        let signer = SignatureGenerator::new("shared-secret".into());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let body = br#"{"order_id":"SO-42"}"#;
        let signature = signer.sign_payload(&timestamp, std::str::from_utf8(body).unwrap());

        assert!(verify_signature(
            &timestamp,
            &signature,
            body,
            "shared-secret",
            300
        ));
        assert!(!verify_signature(
            &timestamp,
            &signature,
            body,
            "other-secret",
            300
        ));
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let signer = SignatureGenerator::new("shared-secret".into());
        let stale = (chrono::Utc::now().timestamp() - 3600).to_string();
        let body = b"{}";
        let signature = signer.sign_payload(&stale, "{}");

        assert!(!verify_signature(
            &stale,
            &signature,
            body,
            "shared-secret",
            300
        ));
    }

    #[test]
    fn tampered_body_fails_verification() {
        let signer = SignatureGenerator::new("shared-secret".into());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = signer.sign_payload(&timestamp, r#"{"amount":100}"#);

        assert!(!verify_signature(
            &timestamp,
            &signature,
            br#"{"amount":999}"#,
            "shared-secret",
            300
        ));
    }
}
