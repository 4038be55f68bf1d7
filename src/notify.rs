use std::path::{Path, PathBuf};

use crate::config::{AppConfig, RelaySettings};
use crate::models::Transaction;

#[derive(Debug, Clone)]
struct RelayConfig {
    url: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

/// Best-effort purchase receipt delivery. Tries the templated mail relay
/// when one is configured; otherwise (or on any relay failure) writes a
/// plain-text receipt file the storefront can offer for download. The
/// return value only says whether the out-of-band email went out; the
/// transaction it describes is already committed either way.
#[derive(Clone)]
pub struct ReceiptNotifier {
    http: reqwest::Client,
    relay: Option<RelayConfig>,
    receipt_dir: PathBuf,
}

impl ReceiptNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_settings(&config.relay, config.receipt_dir.clone())
    }

    pub fn with_settings(relay: &RelaySettings, receipt_dir: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay: resolve_relay(relay),
            receipt_dir,
        }
    }

    /// Returns `true` only when the relay accepted the send. Any other
    /// outcome falls back to the local receipt file and returns `false`.
    pub async fn send_receipt(&self, transaction: &Transaction) -> bool {
        if let Some(relay) = &self.relay {
            match self.relay_send(relay, transaction).await {
                Ok(()) => return true,
                Err(err) => {
                    tracing::warn!(
                        reference = %transaction.reference,
                        error = %err,
                        "receipt relay failed, writing local fallback"
                    );
                }
            }
        }

        self.write_fallback(transaction).await;
        false
    }

    async fn relay_send(&self, relay: &RelayConfig, transaction: &Transaction) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "service_id": relay.service_id,
            "template_id": relay.template_id,
            "user_id": relay.public_key,
            "template_params": {
                "to_email": transaction.payer_email,
                "customer_name": transaction.customer_name,
                "order_items": transaction.courses.join(", "),
                "total_amount": transaction.total_amount.to_string(),
                "reference": transaction.reference,
                "order_date": transaction.created_at.to_rfc3339(),
            },
        });

        let response = self.http.post(&relay.url).json(&body).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("relay returned {}", response.status());
        }
        Ok(())
    }

    async fn write_fallback(&self, transaction: &Transaction) {
        let path = self.receipt_path(&transaction.reference);
        let contents = render_receipt(transaction);

        if let Err(err) = tokio::fs::create_dir_all(&self.receipt_dir).await {
            tracing::warn!(error = %err, "could not create receipt directory");
            return;
        }
        if let Err(err) = tokio::fs::write(&path, contents).await {
            tracing::warn!(path = %path.display(), error = %err, "could not write receipt file");
        } else {
            tracing::info!(path = %path.display(), "receipt written locally");
        }
    }

    pub fn receipt_path(&self, reference: &str) -> PathBuf {
        self.receipt_dir.join(format!("receipt-{reference}.txt"))
    }

    pub fn receipt_dir(&self) -> &Path {
        &self.receipt_dir
    }
}

fn resolve_relay(settings: &RelaySettings) -> Option<RelayConfig> {
    let service_id = settings.service_id.as_deref().filter(|v| !is_placeholder(v))?;
    let template_id = settings.template_id.as_deref().filter(|v| !is_placeholder(v))?;
    let public_key = settings.public_key.as_deref().filter(|v| !is_placeholder(v))?;
    Some(RelayConfig {
        url: settings.url.clone(),
        service_id: service_id.to_string(),
        template_id: template_id.to_string(),
        public_key: public_key.to_string(),
    })
}

// Scaffolded deployments ship `YOUR_SERVICE_ID`-style values; treat them
// the same as unset.
fn is_placeholder(value: &str) -> bool {
    value.trim().is_empty() || value.trim().starts_with("YOUR_")
}

fn render_receipt(transaction: &Transaction) -> String {
    let mut out = String::new();
    out.push_str("Course Store - Purchase Receipt\n");
    out.push_str("================================\n\n");
    out.push_str(&format!("Customer : {}\n", transaction.customer_name));
    out.push_str(&format!("Email    : {}\n", transaction.payer_email));
    out.push_str(&format!("Reference: {}\n", transaction.reference));
    out.push_str(&format!(
        "Date     : {}\n\n",
        transaction.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str("Items\n-----\n");
    for course in &transaction.courses {
        out.push_str(&format!("  - {course}\n"));
    }
    out.push_str(&format!("\nTotal    : {}\n", transaction.total_amount));
    out.push_str(&format!("Status   : {}\n", transaction.status));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_CONFIRMED;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_transaction(reference: &str) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: None,
            customer_name: "Ada Lovelace".into(),
            payer_email: "ada@example.com".into(),
            reference: reference.into(),
            courses: vec!["Intro to Go".into(), "Advanced Rust".into()],
            total_amount: 999,
            status: STATUS_CONFIRMED.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rendered_receipt_carries_order_details() {
        let tx = sample_transaction("TXN-RENDER");
        let text = render_receipt(&tx);
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("ada@example.com"));
        assert!(text.contains("TXN-RENDER"));
        assert!(text.contains("  - Intro to Go"));
        assert!(text.contains("  - Advanced Rust"));
        assert!(text.contains("Total    : 999"));
    }

    #[test]
    fn placeholder_relay_values_are_not_configured() {
        let settings = RelaySettings {
            url: "https://relay.example.com/send".into(),
            service_id: Some("YOUR_SERVICE_ID".into()),
            template_id: Some("template_1".into()),
            public_key: Some("key_1".into()),
        };
        assert!(resolve_relay(&settings).is_none());

        let settings = RelaySettings {
            url: "https://relay.example.com/send".into(),
            service_id: Some("service_1".into()),
            template_id: Some("template_1".into()),
            public_key: Some("key_1".into()),
        };
        assert!(resolve_relay(&settings).is_some());
    }

    #[tokio::test]
    async fn unconfigured_relay_falls_back_to_local_receipt() {
        let dir = std::env::temp_dir().join(format!("receipts-{}", Uuid::new_v4()));
        let notifier = ReceiptNotifier::with_settings(
            &RelaySettings {
                url: "https://relay.example.com/send".into(),
                service_id: None,
                template_id: None,
                public_key: None,
            },
            dir.clone(),
        );

        let tx = sample_transaction("TXN-FALLBACK");
        let delivered = notifier.send_receipt(&tx).await;

        assert!(!delivered);
        let written = tokio::fs::read_to_string(notifier.receipt_path("TXN-FALLBACK"))
            .await
            .expect("fallback receipt file");
        assert!(written.contains("TXN-FALLBACK"));

        tokio::fs::remove_dir_all(dir).await.ok();
    }
}
