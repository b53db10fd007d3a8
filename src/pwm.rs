//! The three PWM channels behind the RGB LED.
//!
//! Hardware access goes through the [`PwmBackend`] trait so the channel set
//! can be driven by the real GPIO peripheral on a Pi or by a recording fake
//! in tests. The playback loop only sees the narrower [`LedOutput`] trait.
//!
//! ## Rust concepts
//! - Traits as capability seams (`PwmBackend`, `LedOutput`)
//! - `Drop` as scoped cleanup: the LED is switched off on every exit path
//! - Generics with trait bounds instead of trait objects

use crate::config::PinConfig;
use crate::error::Result;
use crate::playback::Delay;
use std::time::Duration;

/// Highest duty-cycle value; a channel written with this is fully on.
pub const PWM_RANGE: u8 = 255;

/// How long each primary color is held by [`PwmChannelSet::identify_sequence`].
pub const IDENTIFY_HOLD: Duration = Duration::from_millis(1000);

/// Direction of a GPIO pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    Output,
}

/// Low-level access to PWM-capable GPIO pins.
pub trait PwmBackend {
    /// Put `pin` into `mode`.
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()>;

    /// Start a PWM channel on `pin` with duty values in `0..=range`, initially 0.
    fn create_channel(&mut self, pin: u8, range: u8) -> Result<()>;

    /// Set the duty cycle of a channel created with [`PwmBackend::create_channel`].
    fn write_duty(&mut self, pin: u8, value: u8) -> Result<()>;
}

/// Something that can show one RGB duty triple at a time.
pub trait LedOutput {
    fn write(&mut self, red: u8, green: u8, blue: u8) -> Result<()>;

    fn all_off(&mut self) -> Result<()> {
        self.write(0, 0, 0)
    }
}

/// The red, green and blue PWM channels of one LED.
///
/// Created once with [`PwmChannelSet::initialize`], which takes ownership of
/// the backend. When the set is dropped the LED is turned off.
pub struct PwmChannelSet<B: PwmBackend> {
    backend: B,
    pins: [u8; 3],
}

impl<B: PwmBackend> PwmChannelSet<B> {
    /// Configure each configured pin as an output and arm a PWM channel on it.
    pub fn initialize(mut backend: B, config: &PinConfig) -> Result<Self> {
        let pins = config.pins();
        for pin in pins {
            backend.set_mode(pin, PinMode::Output)?;
            backend.create_channel(pin, PWM_RANGE)?;
        }

        tracing::info!(
            "PWM channels ready: red={} green={} blue={}",
            pins[0],
            pins[1],
            pins[2]
        );
        Ok(Self { backend, pins })
    }

    /// Light red, then green, then blue at full duty for `hold` each, so the
    /// wiring can be checked by eye before playback starts.
    pub fn identify_sequence(&mut self, delay: &mut impl Delay, hold: Duration) -> Result<()> {
        self.all_off()?;
        for (red, green, blue) in [
            (PWM_RANGE, 0, 0),
            (0, PWM_RANGE, 0),
            (0, 0, PWM_RANGE),
        ] {
            self.write(red, green, blue)?;
            delay.delay(hold);
            self.all_off()?;
        }
        Ok(())
    }
}

impl<B: PwmBackend> LedOutput for PwmChannelSet<B> {
    fn write(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        let [r, g, b] = self.pins;
        self.backend.write_duty(r, red)?;
        self.backend.write_duty(g, green)?;
        self.backend.write_duty(b, blue)?;
        Ok(())
    }
}

impl<B: PwmBackend> Drop for PwmChannelSet<B> {
    fn drop(&mut self) {
        if let Err(e) = self.all_off() {
            tracing::warn!("Failed to turn the LED off: {}", e);
        }
    }
}
