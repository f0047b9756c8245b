// webhook.rs

pub const WEBHOOK_BODY_MAX: usize = 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Best-effort JSON POST of each changed reading.
pub trait Webhook {
    fn post_json(&mut self, body: &[u8]) -> anyhow::Result<WebhookResponse>;
}

#[cfg(target_os = "espidf")]
pub use esp::EspWebhook;

#[cfg(target_os = "espidf")]
mod esp {
    use embedded_svc::{
        http::client::Client as HttpClient,
        io::Write,
        utils::io,
    };
    use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
    use log::*;

    use crate::*;

    pub struct EspWebhook {
        url: String,
        timeout: Duration,
    }

    impl EspWebhook {
        pub fn new(config: &ReporterConfig) -> Self {
            EspWebhook {
                url: config.webhook_url.clone(),
                timeout: config.webhook_timeout,
            }
        }
    }

    impl Webhook for EspWebhook {
        // A fresh connection per POST; it is closed again when the response drops.
        fn post_json(&mut self, body: &[u8]) -> anyhow::Result<WebhookResponse> {
            let conn = EspHttpConnection::new(&HttpConfiguration {
                timeout: Some(self.timeout),
                crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
                ..Default::default()
            })?;
            let mut client = HttpClient::wrap(conn);

            let content_length = body.len().to_string();
            let headers = [
                ("content-type", "application/json"),
                ("content-length", content_length.as_str()),
            ];

            info!("-> POST {}", self.url);
            let mut request = client.post(&self.url, &headers)?;
            request.write_all(body)?;
            request.flush()?;
            let mut response = request.submit()?;

            let status = response.status();
            let mut buf = [0u8; WEBHOOK_BODY_MAX];
            let n = io::try_read_full(&mut response, &mut buf).map_err(|e| e.0)?;
            info!("<- {status}, {n} bytes");

            Ok(WebhookResponse {
                status,
                body: String::from_utf8_lossy(&buf[..n]).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2xx_is_success() {
        let resp = |status| WebhookResponse {
            status,
            body: String::new(),
        };
        assert!(resp(200).is_success());
        assert!(resp(204).is_success());
        assert!(!resp(301).is_success());
        assert!(!resp(404).is_success());
        assert!(!resp(500).is_success());
    }
}

// EOF
