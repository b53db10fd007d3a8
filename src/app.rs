//! One playback run, from precondition checks to the last pixel.
//!
//! The binary supplies the real GPIO backend and the signal flag; tests pass
//! a recording backend instead. Checks happen in a fixed order: privilege,
//! image argument, image file, pin config, GPIO setup, decode, playback.

use crate::config::PinConfig;
use crate::error::{self, Error, Result};
use crate::image_source::{self, PixelSource};
use crate::playback::{self, Delay, PlaybackOptions, PlaybackReport};
use crate::pwm::{IDENTIFY_HOLD, PwmBackend, PwmChannelSet};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

/// Everything a run needs besides hardware.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub image: Option<PathBuf>,
    pub config: PathBuf,
    pub playback: PlaybackOptions,
    pub skip_identify: bool,
}

/// Run one playback of `options.image`.
///
/// `open_backend` is only called once every precondition has passed. Once
/// the channel set exists, any later failure still leaves the LED off,
/// because dropping the set turns it off.
pub fn run<B, F, D>(
    options: &RunOptions,
    privileged: bool,
    open_backend: F,
    delay: &mut D,
    running: &AtomicBool,
) -> Result<PlaybackReport>
where
    B: PwmBackend,
    F: FnOnce() -> Result<B>,
    D: Delay,
{
    if !privileged {
        return Err(Error::Privilege);
    }

    let image_path = options
        .image
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(Error::Usage)?;
    if !image_path.exists() {
        return Err(Error::FileNotFound { path: image_path });
    }

    let config = match PinConfig::load(&options.config) {
        Ok(config) => config,
        Err(e @ Error::ConfigWrite { .. }) => {
            tracing::warn!("{}; using default pins", error::report(&e));
            PinConfig::default()
        }
        Err(e) => return Err(e),
    };
    tracing::info!(
        "Pins: red={} green={} blue={}",
        config.red_pin(),
        config.green_pin(),
        config.blue_pin()
    );

    let mut leds = PwmChannelSet::initialize(open_backend()?, &config)?;
    if !options.skip_identify {
        leds.identify_sequence(delay, IDENTIFY_HOLD)?;
    }

    tracing::info!("Reading file {}", image_path.display());
    let decoded = image_source::decode(&image_path)?;
    tracing::info!(
        "Got width: {}, height: {} and channels: {}",
        decoded.source.width(),
        decoded.source.height(),
        decoded.channels
    );

    let report = playback::play(&decoded.source, &mut leds, delay, &options.playback, running)?;

    if report.interrupted {
        tracing::info!(
            "Stopped after {} of {} pixels",
            report.visited,
            decoded.source.pixel_count()
        );
    } else {
        tracing::info!(
            "Done: {} pixels shown, {} transparent",
            report.written,
            report.skipped
        );
    }
    Ok(report)
}
