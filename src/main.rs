//! GPIO RGB LED image player
//!
//! Reads an image and shows it on one RGB LED, pixel by pixel: each pixel's
//! color is held for a fixed dwell time, then the LED goes dark and the next
//! pixel follows, row by row from the top left.
//!
//! ## Startup order
//! 1. Privilege check (raw GPIO needs root)
//! 2. Image argument and file existence
//! 3. Pin config (`/etc/gpio_led_image.txt`, created on first run)
//! 4. GPIO setup and a red/green/blue wiring check
//! 5. Image decode and playback
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/gpio-led-image path/to/image.png
//! ```

#[cfg(not(feature = "hardware"))]
fn main() -> std::process::ExitCode {
    eprintln!("This binary requires the 'hardware' feature (rppal).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::ExitCode::FAILURE
}

#[cfg(feature = "hardware")]
fn main() -> std::process::ExitCode {
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = cli::Args::parse();
    match cli::run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", gpio_led_image::error::report(&e));
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "hardware")]
mod cli {
    use clap::Parser;
    use gpio_led_image::app::{self, RunOptions};
    use gpio_led_image::config::DEFAULT_CONFIG_PATH;
    use gpio_led_image::hardware::{PinNumbering, RppalBackend};
    use gpio_led_image::playback::{PlaybackOptions, ThreadDelay};
    use gpio_led_image::{Result, setup_signal_handler, system};
    use std::path::PathBuf;
    use std::time::Duration;

    /// Play an image back pixel by pixel on a PWM-driven RGB LED
    #[derive(Parser)]
    #[command(name = "gpio-led-image")]
    #[command(version)]
    pub struct Args {
        /// Image file to play (PNG, JPEG, GIF or BMP). Quote paths containing spaces.
        image: Option<PathBuf>,

        /// Pin config file (red, green and blue pin, one per line)
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// How pin numbers in the config file are interpreted
        #[arg(long, value_enum, default_value_t = PinNumbering::WiringPi)]
        numbering: PinNumbering,

        /// Milliseconds each pixel is shown
        #[arg(long, default_value = "250")]
        dwell_ms: u64,

        /// Skip the red/green/blue wiring check before playback
        #[arg(long)]
        skip_identify: bool,
    }

    pub fn run(args: Args) -> Result<()> {
        tracing::info!("Starting GPIO RGB led image viewer v{}", env!("CARGO_PKG_VERSION"));
        tracing::info!("Pin numbering: {:?}", args.numbering);

        let running = setup_signal_handler()?;
        let options = RunOptions {
            image: args.image,
            config: args.config,
            playback: PlaybackOptions {
                dwell: Duration::from_millis(args.dwell_ms),
            },
            skip_identify: args.skip_identify,
        };
        let numbering = args.numbering;

        app::run(
            &options,
            system::is_root(),
            || RppalBackend::new(numbering),
            &mut ThreadDelay,
            &running,
        )?;
        Ok(())
    }
}
