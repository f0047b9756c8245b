// reading.rs

use crate::*;

pub const STATUS_MONITORING: &str = "Monitoring";

/// One climate sample as it goes out on the wire.
///
/// Field order is the serialized key order: `temperature`, `humidity`, `status`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    pub temperature: f32,
    pub humidity: f32,
    pub status: &'static str,
}

impl Reading {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Reading {
            temperature,
            humidity,
            status: STATUS_MONITORING,
        }
    }

    /// Take the values of the sensor's last measurement.
    pub fn from_sensor<S: ClimateSensor + ?Sized>(sensor: &S) -> Self {
        Self::new(sensor.temperature(), sensor.humidity())
    }

    pub fn is_valid(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite()
    }

    /// Compact JSON. Identical values always give identical bytes.
    pub fn to_json(&self) -> anyhow::Result<String> {
        if !self.is_valid() {
            bail!("refusing to encode invalid reading {self:?}");
        }
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_three_fields_in_order() {
        let json = Reading::new(24.5, 60.0).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"temperature":24.5,"humidity":60.0,"status":"Monitoring"}"#
        );
    }

    #[test]
    fn encoding_is_repeatable() {
        let a = Reading::new(24.5, 60.0).to_json().unwrap();
        let b = Reading::new(24.5, 60.0).to_json().unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn negative_temperatures_survive() {
        let json = Reading::new(-10.1, 35.2).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"temperature":-10.1,"humidity":35.2,"status":"Monitoring"}"#
        );
    }

    #[test]
    fn nan_is_not_encoded() {
        let r = Reading::new(f32::NAN, 50.0);
        assert!(!r.is_valid());
        assert!(r.to_json().is_err());
        assert!(Reading::new(20.0, f32::INFINITY).to_json().is_err());
    }
}

// EOF
