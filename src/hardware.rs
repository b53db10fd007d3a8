//! Raspberry Pi GPIO access.
//!
//! Pin numbers in the config file follow the wiringPi scheme by default
//! (pin 0 is BCM GPIO 17), so [`PinNumbering`] translates them before they
//! reach the GPIO peripheral. The actual hardware backend needs the
//! `hardware` feature (`rppal`).

use crate::error::{Error, Result};
use clap::ValueEnum;

/// BCM GPIO number for each wiringPi pin, indexed by wiringPi pin.
const WIRINGPI_TO_BCM: [u8; 32] = [
    17, 18, 27, 22, 23, 24, 25, 4, // 0-7
    2, 3, 8, 7, 10, 9, 11, 14, // 8-15
    15, 28, 29, 30, 31, 5, 6, 13, // 16-23
    19, 26, 12, 16, 20, 21, 0, 1, // 24-31
];

/// How pin numbers in the config file are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PinNumbering {
    /// wiringPi numbering
    #[default]
    #[value(name = "wiringpi")]
    WiringPi,
    /// Broadcom GPIO numbering
    Bcm,
}

impl PinNumbering {
    /// Translate a configured pin into a BCM GPIO number.
    pub fn to_bcm(self, pin: u8) -> Result<u8> {
        match self {
            Self::Bcm => Ok(pin),
            Self::WiringPi => WIRINGPI_TO_BCM
                .get(pin as usize)
                .copied()
                .ok_or_else(|| Error::GpioInit {
                    reason: format!("wiringPi pin {pin} does not exist"),
                }),
        }
    }
}

#[cfg(feature = "hardware")]
pub use rppal_backend::RppalBackend;

#[cfg(feature = "hardware")]
mod rppal_backend {
    use super::PinNumbering;
    use crate::error::{Error, Result};
    use crate::pwm::{PinMode, PwmBackend};
    use rppal::gpio::{Gpio, OutputPin};
    use std::collections::HashMap;
    use std::time::Duration;

    /// Width of one duty step. A channel with range 255 has a 25.5 ms period.
    const SOFT_PWM_STEP: Duration = Duration::from_micros(100);

    /// Software PWM on Raspberry Pi GPIO pins through `rppal`.
    ///
    /// Claimed pins are released (and reset to their previous mode) when the
    /// backend is dropped.
    pub struct RppalBackend {
        gpio: Gpio,
        numbering: PinNumbering,
        outputs: HashMap<u8, OutputPin>,
        ranges: HashMap<u8, u8>,
    }

    impl RppalBackend {
        /// Open the GPIO peripheral. Fails when not running on a Pi or
        /// without access to `/dev/gpiomem`.
        pub fn new(numbering: PinNumbering) -> Result<Self> {
            let gpio = Gpio::new().map_err(|e| Error::GpioInit {
                reason: e.to_string(),
            })?;
            Ok(Self {
                gpio,
                numbering,
                outputs: HashMap::new(),
                ranges: HashMap::new(),
            })
        }

        fn output(&mut self, pin: u8) -> Result<&mut OutputPin> {
            let bcm = self.numbering.to_bcm(pin)?;
            self.outputs.get_mut(&bcm).ok_or_else(|| Error::GpioWrite {
                pin,
                reason: "pin is not configured as an output".to_string(),
            })
        }
    }

    impl PwmBackend for RppalBackend {
        fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
            let bcm = self.numbering.to_bcm(pin)?;
            self.outputs.remove(&bcm);

            let gpio_pin = self.gpio.get(bcm).map_err(|e| Error::GpioInit {
                reason: format!("pin {pin} (BCM {bcm}): {e}"),
            })?;
            match mode {
                PinMode::Output => {
                    self.outputs.insert(bcm, gpio_pin.into_output_low());
                }
            }
            tracing::debug!("Pin {} (BCM {}) set to {:?}", pin, bcm, mode);
            Ok(())
        }

        fn create_channel(&mut self, pin: u8, range: u8) -> Result<()> {
            let bcm = self.numbering.to_bcm(pin)?;
            self.ranges.insert(bcm, range);
            self.write_duty(pin, 0).map_err(|e| Error::GpioInit {
                reason: e.to_string(),
            })
        }

        fn write_duty(&mut self, pin: u8, value: u8) -> Result<()> {
            let bcm = self.numbering.to_bcm(pin)?;
            let range = self.ranges.get(&bcm).copied().unwrap_or(crate::pwm::PWM_RANGE);
            let period = SOFT_PWM_STEP * u32::from(range);
            let pulse_width = SOFT_PWM_STEP * u32::from(value.min(range));

            self.output(pin)?
                .set_pwm(period, pulse_width)
                .map_err(|e| Error::GpioWrite {
                    pin,
                    reason: e.to_string(),
                })
        }
    }
}
