// build.rs

use std::env;

const BUILD_ENV: [(&str, &str); 10] = [
    ("WIFI_SSID", "Wokwi-GUEST"),
    ("WIFI_PASS", ""),
    ("MQTT_URL", "mqtt://broker.mqttdashboard.com:1883"),
    ("MQTT_CLIENT_ID", "climate-controller"),
    ("MQTT_USER", ""),
    ("MQTT_PASS", ""),
    ("MQTT_TOPIC", "climate"),
    ("WEBHOOK_URL", "https://webhook.site/5454912f-98ae-41af-b4c7-2d4f9a0abf18"),
    ("SENSOR_PIN", "15"),
    ("POLL_DELAY", "5"),
];

fn main() -> anyhow::Result<()> {
    // Necessary because of this issue: https://github.com/rust-lang/cargo/issues/9641
    // see also https://github.com/rust-lang/cargo/issues/9554
    // Host builds (unit tests) have no ESP-IDF to propagate.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::build::CfgArgs::output_propagated("ESP_IDF")?;
        embuild::build::LinkArgs::output_propagated("ESP_IDF")?;
    }

    for (key, default) in BUILD_ENV {
        let value = env::var(key).unwrap_or_else(|_| default.into());
        println!("cargo:rustc-env={key}={value}");
        println!("cargo:rerun-if-env-changed={key}");
    }

    Ok(())
}

// EOF
