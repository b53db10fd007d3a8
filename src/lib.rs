//! Play an image back one pixel at a time on a single RGB LED.
//!
//! The LED's three legs are wired to PWM-driven GPIO pins. Each pixel of the
//! image is shown for a fixed dwell time, in row-major order, with a squared
//! brightness curve applied to every channel.
//!
//! This crate provides:
//! - A full playback run with its startup checks ([`app`])
//! - Pin assignment loading ([`config`])
//! - The PWM channel set and its hardware seam ([`pwm`], [`hardware`])
//! - Image decoding into an addressable raster ([`image_source`])
//! - The playback loop ([`playback`])
//! - Signal handling for clean shutdown
//! - The [`Color`] type shared by all of the above

pub mod app;
pub mod config;
pub mod error;
pub mod hardware;
pub mod image_source;
pub mod playback;
pub mod pwm;
pub mod system;

pub use error::{Error, Result};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Color ──────────────────────────────────────────────────────────

/// One RGBA pixel, 8 bits per channel.
///
/// Decoupled from the `image` crate's pixel type so playback logic can be
/// tested with hand-built colors. At the decoder boundary, we convert via
/// `From<image::Rgba<u8>>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the pixel should drive the LED at all.
    ///
    /// There is no blending: any alpha above zero counts as fully visible.
    pub fn is_visible(&self) -> bool {
        self.a != 0
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(p: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }
}

/// Formats as `#RRGGBB` followed by the alpha value, e.g. `#FF8000 a=255`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X} a={}", self.r, self.g, self.b, self.a)
    }
}

// ── Signal handling ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// With ctrlc's `termination` feature the handler also catches SIGTERM and
/// SIGHUP, so `kill` and `systemctl stop` end playback the same way.
///
/// # Rust concept: Arc and AtomicBool
/// The playback loop and the signal handler both need the flag. `Arc` lets
/// them share ownership, and `AtomicBool` is safe to flip from the handler's
/// thread without a mutex.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Signal {
        reason: e.to_string(),
    })?;

    Ok(running)
}

/// Check if playback should keep going.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn color_new() {
        let c = Color::new(10, 20, 30, 40);
        assert_eq!(c.r, 10);
        assert_eq!(c.g, 20);
        assert_eq!(c.b, 30);
        assert_eq!(c.a, 40);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(128, true)]
    #[case(255, true)]
    fn color_visibility_is_an_alpha_gate(#[case] alpha: u8, #[case] visible: bool) {
        assert_eq!(Color::new(255, 255, 255, alpha).is_visible(), visible);
    }

    #[test]
    fn color_from_rgba_pixel() {
        assert_eq!(
            Color::from(image::Rgba([1, 2, 3, 4])),
            Color::new(1, 2, 3, 4)
        );
    }

    #[rstest]
    #[case(Color::new(255, 128, 0, 255), "#FF8000 a=255")]
    #[case(Color::new(0, 0, 0, 0), "#000000 a=0")]
    #[case(Color::new(10, 171, 205, 7), "#0AABCD a=7")]
    fn color_display(#[case] color: Color, #[case] expected: &str) {
        assert_eq!(color.to_string(), expected);
    }

    // The handler is process-wide, so this is the only test that installs it.
    #[cfg(unix)]
    #[test]
    fn sigterm_clears_running_flag() {
        let running = setup_signal_handler().unwrap();
        assert!(is_running(&running));

        // SAFETY: signalling our own pid; the handler installed above catches it.
        unsafe {
            libc::kill(libc::getpid(), libc::SIGTERM);
        }

        for _ in 0..50 {
            if !is_running(&running) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(!is_running(&running));
    }

    #[test]
    fn is_running_reads_flag() {
        let flag = AtomicBool::new(true);
        assert!(is_running(&flag));
        flag.store(false, Ordering::SeqCst);
        assert!(!is_running(&flag));
    }
}
