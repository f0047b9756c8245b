// wifi.rs

use std::net::Ipv4Addr;

use anyhow::anyhow;
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::*;

use crate::*;

/// Join the configured access point and wait for an address.
///
/// Each attempt requests association and then polls the station interface
/// until it is up or `wifi_timeout` passes.
pub fn connect_wifi(wifi: &mut BlockingWifi<EspWifi<'static>>, config: &ReporterConfig) -> anyhow::Result<Ipv4Addr> {
    info!("WiFi setting credentials...");
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: config
            .wifi_ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("wifi ssid too long"))?,
        password: config
            .wifi_pass
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("wifi password too long"))?,
        auth_method: if config.wifi_pass.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        },
        ..Default::default()
    }))?;

    info!("WiFi driver starting...");
    wifi.start()?;

    retry(
        "WiFi association",
        config.bringup_attempts,
        config.bringup_pause,
        |attempt| -> anyhow::Result<()> {
            info!("WiFi connecting to {} (attempt {attempt})...", config.wifi_ssid);
            wifi.wifi_mut().connect()?;

            info!("WiFi waiting for association...");
            let waited = wait_until("WiFi link", config.wifi_poll, config.wifi_timeout, || {
                Ok(wifi.is_up()?)
            });
            if waited.is_err() {
                // drop the pending association before the next attempt
                wifi.wifi_mut().disconnect().ok();
            }
            info!("WiFi up after {:?}", waited?);
            Ok(())
        },
    )?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi connected, address {}", ip_info.ip);
    Ok(ip_info.ip)
}

// EOF
