// mqtt.rs

/// Where changed readings go first. Failures here are fatal to the loop.
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> anyhow::Result<()>;
}

#[cfg(target_os = "espidf")]
pub use esp::MqttPublisher;

#[cfg(target_os = "espidf")]
mod esp {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use esp_idf_svc::mqtt::client::{
        EspMqttClient, EspMqttEvent, EventPayload, MqttClientConfiguration, QoS,
    };
    use log::*;

    use crate::*;

    pub struct MqttPublisher {
        client: EspMqttClient<'static>,
        connected: Arc<AtomicBool>,
    }

    impl MqttPublisher {
        /// Start the client and block until the broker accepts us.
        pub fn connect(config: &ReporterConfig) -> anyhow::Result<Self> {
            retry(
                "MQTT connect",
                config.bringup_attempts,
                config.bringup_pause,
                |attempt| {
                    info!("MQTT connecting to {} (attempt {attempt})...", config.mqtt_url);
                    Self::try_connect(config)
                },
            )
        }

        fn try_connect(config: &ReporterConfig) -> anyhow::Result<Self> {
            let connected = Arc::new(AtomicBool::new(false));
            let flag = connected.clone();

            let client = EspMqttClient::new_cb(
                &config.mqtt_url,
                &MqttClientConfiguration {
                    client_id: Some(config.mqtt_client_id.as_str()),
                    username: config.mqtt_user.as_deref(),
                    password: config.mqtt_pass.as_deref(),
                    keep_alive_interval: Some(Duration::from_secs(25)),
                    ..Default::default()
                },
                move |event: EspMqttEvent<'_>| match event.payload() {
                    EventPayload::Connected(_) => {
                        info!("MQTT connected.");
                        flag.store(true, Ordering::Relaxed);
                    }
                    EventPayload::Disconnected => {
                        error!("MQTT connection closed.");
                        flag.store(false, Ordering::Relaxed);
                    }
                    EventPayload::Error(e) => error!("MQTT error: {e:?}"),
                    other => debug!("MQTT event: {other:?}"),
                },
            )?;

            wait_until("MQTT connection", config.wifi_poll, config.mqtt_timeout, || {
                Ok(connected.load(Ordering::Relaxed))
            })?;

            Ok(MqttPublisher { client, connected })
        }

        pub fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Relaxed)
        }
    }

    impl Publisher for MqttPublisher {
        fn publish(&mut self, topic: &str, payload: &[u8]) -> anyhow::Result<()> {
            if !self.is_connected() {
                warn!("MQTT publishing while disconnected");
            }
            let id = self.client.publish(topic, QoS::AtMostOnce, false, payload)?;
            debug!("MQTT sent message #{id} to {topic}");
            Ok(())
        }
    }
}

// EOF
