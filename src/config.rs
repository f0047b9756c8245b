// config.rs

use std::fmt;

use crate::*;

const DEFAULT_POLL_DELAY: u64 = 5;
const DEFAULT_SENSOR_PIN: i32 = 15;
const DEFAULT_SENSOR_RETRIES: u32 = 4;
const DEFAULT_BRINGUP_ATTEMPTS: u32 = 3;

/// Everything the firmware needs to know, fixed at build time.
///
/// `build.rs` forwards the `WIFI_*`, `MQTT_*`, `WEBHOOK_URL`, `SENSOR_PIN` and
/// `POLL_DELAY` environment variables; anything missing falls back to the
/// defaults below.
#[derive(Clone)]
pub struct ReporterConfig {
    pub wifi_ssid: String,
    pub wifi_pass: String,
    pub wifi_poll: Duration,
    pub wifi_timeout: Duration,

    pub mqtt_url: String,
    pub mqtt_client_id: String,
    pub mqtt_user: Option<String>,
    pub mqtt_pass: Option<String>,
    pub mqtt_topic: String,
    pub mqtt_timeout: Duration,

    pub webhook_url: String,
    pub webhook_timeout: Duration,

    pub sensor_pin: i32,
    pub sensor_retries: u32,
    pub sensor_retry_delay: Duration,

    pub delay: Duration,

    pub bringup_attempts: u32,
    pub bringup_pause: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: option_env!("WIFI_SSID").unwrap_or("Wokwi-GUEST").into(),
            wifi_pass: option_env!("WIFI_PASS").unwrap_or("").into(),
            wifi_poll: Duration::from_millis(100),
            wifi_timeout: Duration::from_secs(30),

            mqtt_url: option_env!("MQTT_URL")
                .unwrap_or("mqtt://broker.mqttdashboard.com:1883")
                .into(),
            mqtt_client_id: option_env!("MQTT_CLIENT_ID")
                .unwrap_or("climate-controller")
                .into(),
            mqtt_user: non_empty(option_env!("MQTT_USER")),
            mqtt_pass: non_empty(option_env!("MQTT_PASS")),
            mqtt_topic: option_env!("MQTT_TOPIC").unwrap_or("climate").into(),
            mqtt_timeout: Duration::from_secs(15),

            webhook_url: option_env!("WEBHOOK_URL")
                .unwrap_or("https://webhook.site/5454912f-98ae-41af-b4c7-2d4f9a0abf18")
                .into(),
            webhook_timeout: Duration::from_secs(10),

            sensor_pin: parse_or(option_env!("SENSOR_PIN"), DEFAULT_SENSOR_PIN),
            sensor_retries: DEFAULT_SENSOR_RETRIES,
            sensor_retry_delay: Duration::from_secs(2),

            delay: Duration::from_secs(parse_or(option_env!("POLL_DELAY"), DEFAULT_POLL_DELAY)),

            bringup_attempts: DEFAULT_BRINGUP_ATTEMPTS,
            bringup_pause: Duration::from_secs(5),
        }
    }
}

// Passwords stay out of the startup log.
impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_pass", &mask(Some(&self.wifi_pass)))
            .field("wifi_poll", &self.wifi_poll)
            .field("wifi_timeout", &self.wifi_timeout)
            .field("mqtt_url", &self.mqtt_url)
            .field("mqtt_client_id", &self.mqtt_client_id)
            .field("mqtt_user", &self.mqtt_user)
            .field("mqtt_pass", &mask(self.mqtt_pass.as_deref()))
            .field("mqtt_topic", &self.mqtt_topic)
            .field("mqtt_timeout", &self.mqtt_timeout)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_timeout", &self.webhook_timeout)
            .field("sensor_pin", &self.sensor_pin)
            .field("sensor_retries", &self.sensor_retries)
            .field("sensor_retry_delay", &self.sensor_retry_delay)
            .field("delay", &self.delay)
            .field("bringup_attempts", &self.bringup_attempts)
            .field("bringup_pause", &self.bringup_pause)
            .finish()
    }
}

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "********",
        _ => "-",
    }
}

/// Empty build-time values mean "not set".
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn parse_or<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}


// EOF
