//! Playback: walk the image in row-major order and show each pixel on the LED.
//!
//! For every pixel the loop writes the pixel's duty cycles (unless the pixel
//! is fully transparent), waits one dwell period, then switches the LED off
//! before moving on. A cleared running flag stops playback between pixels.
//!
//! ## Rust concepts
//! - Generic functions over traits (`PixelSource`, `LedOutput`, `Delay`)
//! - `AtomicBool` shared with the Ctrl+C handler
//! - `f32::powf` and `as` casts for the brightness curve

use crate::error::Result;
use crate::image_source::PixelSource;
use crate::is_running;
use crate::pwm::LedOutput;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

/// How long each pixel stays on the LED by default.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(250);

/// Something that can block for a while.
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// Blocks the current thread with `thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Time each pixel is shown before the LED is switched off.
    pub dwell: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            dwell: DEFAULT_DWELL,
        }
    }
}

/// What happened during one call to [`play`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Pixels fetched from the source.
    pub visited: u64,
    /// Pixels written to the LED.
    pub written: u64,
    /// Fully transparent pixels that left the LED untouched.
    pub skipped: u64,
    /// Playback stopped early because the running flag was cleared.
    pub interrupted: bool,
}

/// Map an 8-bit color channel to a PWM duty cycle.
///
/// The channel is squared in normalized space so that mid values look
/// dimmer, closer to how the eye perceives PWM brightness. The result is
/// truncated, not rounded: 128 maps to 64.
pub fn duty_cycle(channel: u8) -> u8 {
    let normalized = f32::from(channel) / 255.0;
    (normalized.powf(2.0) * 255.0) as u8
}

/// Play every pixel of `source` on `output`, top row first, left to right.
pub fn play<S, O, D>(
    source: &S,
    output: &mut O,
    delay: &mut D,
    options: &PlaybackOptions,
    running: &AtomicBool,
) -> Result<PlaybackReport>
where
    S: PixelSource,
    O: LedOutput,
    D: Delay,
{
    let mut report = PlaybackReport::default();

    for y in 0..source.height() {
        for x in 0..source.width() {
            if !is_running(running) {
                tracing::info!("Playback interrupted at x{} y{}", x, y);
                output.all_off()?;
                report.interrupted = true;
                return Ok(report);
            }

            let color = source.pixel_at(x, y)?;
            report.visited += 1;
            tracing::debug!("{} at x{} y{}", color, x, y);

            if color.is_visible() {
                output.write(
                    duty_cycle(color.r),
                    duty_cycle(color.g),
                    duty_cycle(color.b),
                )?;
                report.written += 1;
            } else {
                report.skipped += 1;
            }

            delay.delay(options.dwell);
            output.all_off()?;
        }
    }

    Ok(report)
}
