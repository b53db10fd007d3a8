//! Pin assignment: which GPIO pins drive the red, green and blue legs of the LED.
//!
//! The assignment lives in a small line-oriented text file. Lines starting
//! with `#` are comments; the first three remaining lines are the red, green
//! and blue pins, in that order.
//!
//! ```text
//! # gpio_led_image.txt
//! # ...
//! 0
//! 2
//! 3
//! ```

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Where the pin file lives unless overridden on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/gpio_led_image.txt";

const DEFAULT_TEMPLATE: &str = "\
# gpio_led_image.txt
# Represents the configuration file of gpio_led_image, a software made just for fun with RGB leds.
# This file is made of 3 uncommented lines: they are the RGB pins of the led, the first one is the RED pin, the second one is the GREEN pin and the last one is the BLUE pin.
0
2
3
";

/// The three pins of the RGB LED.
///
/// # Rust concept: Copy types as configuration
/// Three `u8`s are cheaper to copy than to borrow, so the config is passed
/// by value once it has been loaded and never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConfig {
    red_pin: u8,
    green_pin: u8,
    blue_pin: u8,
}

impl PinConfig {
    pub fn new(red_pin: u8, green_pin: u8, blue_pin: u8) -> Self {
        Self {
            red_pin,
            green_pin,
            blue_pin,
        }
    }

    /// Load the pin file at `path`, creating it from the default template first
    /// if it does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            create_default(path)?;
        }

        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse the contents of a pin file. `path` is only used in error messages.
    ///
    /// Pins missing from a short file keep their default value.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut config = Self::default();
        let mut position = 0;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let slot = match position {
                0 => &mut config.red_pin,
                1 => &mut config.green_pin,
                2 => &mut config.blue_pin,
                _ => {
                    tracing::warn!("Unneeded line {} in {}: {:?}", index + 1, path.display(), line);
                    position += 1;
                    continue;
                }
            };

            *slot = line.parse().map_err(|_| Error::ConfigParse {
                path: path.to_path_buf(),
                line_number: index + 1,
                line: line.to_string(),
            })?;
            position += 1;
        }

        Ok(config)
    }

    pub fn red_pin(&self) -> u8 {
        self.red_pin
    }

    pub fn green_pin(&self) -> u8 {
        self.green_pin
    }

    pub fn blue_pin(&self) -> u8 {
        self.blue_pin
    }

    /// The pins in red, green, blue order.
    pub fn pins(&self) -> [u8; 3] {
        [self.red_pin, self.green_pin, self.blue_pin]
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self::new(0, 2, 3)
    }
}

/// Write the default pin file to `path`, creating missing parent directories.
///
/// Does nothing if the file already exists.
pub fn create_default(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let write_error = |source| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, DEFAULT_TEMPLATE).map_err(write_error)?;

    tracing::info!("Created default pin config at {}", path.display());
    Ok(())
}
