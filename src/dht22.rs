// dht22.rs

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use log::*;

use crate::*;

const FRAME_BYTES: usize = 5;
const FRAME_BITS: usize = FRAME_BYTES * 8;

// host start signal
const START_LOW_US: u32 = 3000;
const START_HIGH_US: u32 = 25;

// upper bounds in polling steps (~1 us each)
const MAX_RESPONSE_WAIT: u32 = 85;
const MAX_BIT_LOW: u32 = 56;
const MAX_BIT_HIGH: u32 = 75;
// a high pulse longer than this is a one
const ONE_THRESHOLD: u32 = 40;

type PinError<P> = <P as ErrorType>::Error;

/// Bit-banged DHT22 (AM2302) on a single open-drain pin with pull-up.
pub struct Dht22<P, D> {
    pin: P,
    delay: D,
    last: Option<(f32, f32)>,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Dht22 {
            pin,
            delay,
            last: None,
        }
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    /// Run one start-signal/response exchange and return the raw 5-byte frame.
    pub fn read_frame(&mut self) -> Result<[u8; FRAME_BYTES], SensorError<PinError<P>>> {
        // pull down for 3 ms to wake the sensor, then release the line
        self.pin.set_low().map_err(SensorError::Pin)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(SensorError::Pin)?;
        self.delay.delay_us(START_HIGH_US);

        // sensor answers with ~80 us low followed by ~80 us high
        self.wait_while(true, MAX_RESPONSE_WAIT)?;
        self.wait_while(false, MAX_RESPONSE_WAIT)?;
        self.wait_while(true, MAX_RESPONSE_WAIT)?;

        let mut frame = [0u8; FRAME_BYTES];
        for bit in 0..FRAME_BITS {
            // every bit starts with ~50 us low, its value is in the high pulse length
            self.wait_while(false, MAX_BIT_LOW)?;
            let high = self.wait_while(true, MAX_BIT_HIGH)?;
            if high > ONE_THRESHOLD {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        trace!("DHT22 frame {frame:02x?}");
        Ok(frame)
    }

    // Returns how many polling steps the line stayed at `level`.
    fn wait_while(&mut self, level: bool, max_steps: u32) -> Result<u32, SensorError<PinError<P>>> {
        let mut steps = 0;
        while self.pin.is_high().map_err(SensorError::Pin)? == level {
            steps += 1;
            if steps > max_steps {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
        }
        Ok(steps)
    }
}

/// Turn a raw frame into `(temperature, humidity)`.
///
/// Humidity is bytes 0..2 and temperature bytes 2..4, both in tenths, with the
/// top bit of the temperature being the sign. Byte 4 is the low byte of the
/// sum of the other four.
pub fn decode_frame<E: std::fmt::Debug>(
    frame: &[u8; FRAME_BYTES],
) -> Result<(f32, f32), SensorError<E>> {
    let expected = frame[..4].iter().fold(0u8, |sum, b| sum.wrapping_add(*b));
    if frame[4] != expected {
        return Err(SensorError::Checksum {
            got: frame[4],
            expected,
        });
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
    let mut temperature = u16::from_be_bytes([frame[2] & 0x7f, frame[3]]) as f32 / 10.0;
    if frame[2] & 0x80 != 0 {
        temperature = -temperature;
    }
    Ok((temperature, humidity))
}

impl<P, D> ClimateSensor for Dht22<P, D>
where
    P: InputPin + OutputPin,
    PinError<P>: Send + Sync + 'static,
    D: DelayNs,
{
    type Error = SensorError<PinError<P>>;

    fn measure(&mut self) -> Result<(), Self::Error> {
        let frame = self.read_frame()?;
        self.last = Some(decode_frame(&frame)?);
        Ok(())
    }

    fn temperature(&self) -> f32 {
        self.last.map_or(f32::NAN, |(t, _)| t)
    }

    fn humidity(&self) -> f32 {
        self.last.map_or(f32::NAN, |(_, h)| h)
    }
}


// EOF
