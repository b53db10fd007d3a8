//! Error type shared by every stage of a playback run.
//!
//! Every error here is terminal for the run: the binary logs it and exits
//! non-zero. There is no retry logic anywhere.
//!
//! ## Rust concepts
//! - `displaydoc::Display` turns each variant's doc comment into its
//!   `Display` message
//! - `std::error::Error::source()` chains the underlying I/O or decoder error

use displaydoc::Display;
use std::path::PathBuf;

/// A specialized result type for LED playback.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a run.
#[derive(Debug, Display)]
pub enum Error {
    /// this software must be run as root
    Privilege,
    /// please specify an image file to read
    Usage,
    /// the file {path:?} cannot be found
    FileNotFound { path: PathBuf },
    /// cannot create the config file {path:?}
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    /// cannot parse pin value {line:?} on line {line_number} of {path:?}
    ConfigParse {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
    /// cannot read the config file {path:?}
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// cannot decode image {path:?}
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// pixel ({x}, {y}) is outside the {width}x{height} image
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// cannot initialize GPIO: {reason}
    GpioInit { reason: String },
    /// cannot write PWM duty cycle to pin {pin}: {reason}
    GpioWrite { pin: u8, reason: String },
    /// cannot install the Ctrl+C handler: {reason}
    Signal { reason: String },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigWrite { source, .. } | Self::ConfigRead { source, .. } => Some(source),
            Self::ImageDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Render `err` followed by every error in its `source()` chain, joined by `: `.
pub fn report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as _;

    #[test]
    fn config_parse_message_names_the_line() {
        let err = Error::ConfigParse {
            path: PathBuf::from("/etc/gpio_led_image.txt"),
            line_number: 5,
            line: "red".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse pin value \"red\" on line 5 of \"/etc/gpio_led_image.txt\""
        );
    }

    #[test]
    fn config_write_exposes_io_source() {
        let err = Error::ConfigWrite {
            path: PathBuf::from("/nope/config.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(Error::Usage.source().is_none());
    }

    #[test]
    fn report_includes_io_reason() {
        let err = Error::ConfigWrite {
            path: PathBuf::from("/nope/config.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            report(&err),
            "cannot create the config file \"/nope/config.txt\": denied"
        );
    }

    #[test]
    fn report_without_source_is_plain_message() {
        assert_eq!(report(&Error::Usage), "please specify an image file to read");
    }

    #[test]
    fn out_of_bounds_message() {
        let err = Error::IndexOutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 2,
        };
        assert_eq!(err.to_string(), "pixel (4, 0) is outside the 4x2 image");
    }
}
