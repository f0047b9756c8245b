// sensor.rs

use std::fmt::Debug;

/// A temperature/humidity source polled once per loop iteration.
///
/// `measure()` refreshes the internal reading; the accessors return the values
/// of the last successful measurement, or NaN if there never was one.
pub trait ClimateSensor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn measure(&mut self) -> Result<(), Self::Error>;
    fn temperature(&self) -> f32;
    fn humidity(&self) -> f32;
}

// Besides bus errors, the sensor may not answer in time or send a corrupt
// frame. Therefore we extend the pin error cases for proper error handling.
#[derive(Debug, thiserror::Error)]
pub enum SensorError<E: Debug> {
    #[error("sensor pin error: {0:?}")]
    Pin(E),
    #[error("sensor did not respond in time")]
    Timeout,
    #[error("sensor frame checksum mismatch: got {got:#04x}, expected {expected:#04x}")]
    Checksum { got: u8, expected: u8 },
}

// EOF
