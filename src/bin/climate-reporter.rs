// bin/climate-reporter.rs

#[cfg(target_os = "espidf")]
use climate_reporter::*;
#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    delay::{Ets, FreeRtos},
    gpio::{AnyIOPin, PinDriver, Pull},
    prelude::Peripherals,
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    nvs::EspDefaultNvsPartition,
    wifi::{BlockingWifi, EspWifi},
};
#[cfg(target_os = "espidf")]
use log::*;

#[cfg(target_os = "espidf")]
esp_idf_sys::esp_app_desc!();

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("Hello.");
    info!("climate-reporter {FW_VERSION} starting up.");

    let config = ReporterConfig::default();
    info!("My config:\n{config:#?}");

    if let Err(e) = run(&config) {
        error!("Fatal: {e:#}");
    }

    // not actually returning from main() but we reboot instead
    info!("main() finished, reboot.");
    FreeRtos::delay_ms(3000);
    esp_idf_hal::reset::restart();
}

#[cfg(target_os = "espidf")]
fn run(config: &ReporterConfig) -> anyhow::Result<()> {
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_default_partition = EspDefaultNvsPartition::take()?;

    info!("Connecting to WiFi...");
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_default_partition))?,
        sysloop,
    )?;
    connect_wifi(&mut wifi, config)?;

    info!("Connecting to MQTT server...");
    let publisher = MqttPublisher::connect(config)?;
    let webhook = EspWebhook::new(config);

    info!("DHT22 on gpio{}", config.sensor_pin);
    // SAFETY: the sensor pin comes from the build config and nothing else drives it.
    let mut pin = PinDriver::input_output_od(unsafe { AnyIOPin::new(config.sensor_pin) })?;
    pin.set_pull(Pull::Up)?;
    pin.set_high()?;
    let sensor = Dht22::new(pin, Ets);

    let mut reporter = Reporter::new(sensor, publisher, webhook, config);
    match reporter.run()? {}
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!(
        "climate-reporter {} runs on ESP-IDF only, build it for an espidf target",
        climate_reporter::FW_VERSION
    )
}

// EOF
