// reporter.rs

use std::{convert::Infallible, thread};

use anyhow::Context;
use log::*;

use crate::*;

/// What one pass of the loop did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Same encoding as the last one sent; no network I/O.
    Unchanged,
    /// Published to MQTT; `webhook_ok` tells whether the POST went through.
    Changed { webhook_ok: bool },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReporterStats {
    pub iterations: u64,
    pub published: u64,
    pub unchanged: u64,
    pub webhook_failures: u64,
}

/// The sense-compare-publish loop.
///
/// Owns the sensor, the MQTT side and the webhook. The only memory between
/// iterations is the last encoding sent, which callers thread through
/// [`Reporter::step`].
pub struct Reporter<S, P, W> {
    sensor: S,
    publisher: P,
    webhook: W,
    topic: String,
    delay: Duration,
    sensor_retries: u32,
    sensor_retry_delay: Duration,
    stats: ReporterStats,
}

impl<S, P, W> Reporter<S, P, W>
where
    S: ClimateSensor,
    P: Publisher,
    W: Webhook,
{
    pub fn new(sensor: S, publisher: P, webhook: W, config: &ReporterConfig) -> Self {
        Reporter {
            sensor,
            publisher,
            webhook,
            topic: config.mqtt_topic.clone(),
            delay: config.delay,
            sensor_retries: config.sensor_retries,
            sensor_retry_delay: config.sensor_retry_delay,
            stats: ReporterStats::default(),
        }
    }

    pub fn stats(&self) -> ReporterStats {
        self.stats
    }

    /// Loop forever. Only returns on a fatal error.
    pub fn run(&mut self) -> anyhow::Result<Infallible> {
        info!("Entering main loop, delay {:?}...", self.delay);
        let mut last_sent = String::new();
        loop {
            last_sent = self.cycle(last_sent)?;
        }
    }

    /// Run a fixed number of iterations and hand back the last encoding sent.
    pub fn run_for(&mut self, iterations: u64, last_sent: String) -> anyhow::Result<String> {
        (0..iterations).try_fold(last_sent, |last, _| self.cycle(last))
    }

    fn cycle(&mut self, last_sent: String) -> anyhow::Result<String> {
        let (last_sent, _) = self.step(last_sent)?;
        debug!("Stats: {:?}", self.stats);
        thread::sleep(self.delay);
        Ok(last_sent)
    }

    /// Measure once and publish if the encoding differs from `last_sent`.
    ///
    /// Returns the encoding to compare against next time. A failed webhook POST
    /// still counts as sent.
    pub fn step(&mut self, last_sent: String) -> anyhow::Result<(String, Outcome)> {
        info!("Measuring pod climate conditions...");
        let reading = self.read_sensor()?;
        let message = reading.to_json()?;
        self.stats.iterations += 1;

        if message == last_sent {
            info!("No change in climate");
            self.stats.unchanged += 1;
            return Ok((last_sent, Outcome::Unchanged));
        }

        info!("Climate updated! Reporting to MQTT topic {}: {message}", self.topic);
        self.publisher
            .publish(&self.topic, message.as_bytes())
            .with_context(|| format!("MQTT publish to {} failed", self.topic))?;
        self.stats.published += 1;

        let webhook_ok = match self.webhook.post_json(message.as_bytes()) {
            Ok(resp) => {
                if resp.is_success() {
                    info!("Webhook response {}: {}", resp.status, resp.body);
                } else {
                    warn!("Webhook response {}: {}", resp.status, resp.body);
                }
                true
            }
            Err(e) => {
                error!("Failed to send data to webhook: {e:#}");
                self.stats.webhook_failures += 1;
                false
            }
        };

        Ok((message, Outcome::Changed { webhook_ok }))
    }

    fn read_sensor(&mut self) -> anyhow::Result<Reading> {
        let sensor = &mut self.sensor;
        retry(
            "Sensor read",
            self.sensor_retries + 1,
            self.sensor_retry_delay,
            |_| -> anyhow::Result<Reading> {
                sensor.measure()?;
                let reading = Reading::from_sensor(&*sensor);
                if !reading.is_valid() {
                    bail!("sensor gave no valid values: {reading:?}");
                }
                Ok(reading)
            },
        )
    }
}

// EOF
