//! # Text Watch Application Entry Point
//!
//! Runs the word-clock watchface in a terminal. The face is rendered to stdout
//! every time a frame changes, as ASCII or as Braille pixels; logs go to stderr.
//!
//! ## Modes
//! - default: follow the local clock, fetch weather at start and every hour
//! - `--demo`: a simulated clock that advances one minute per real second
//! - `--once`: print the first frame and exit
//! - `--pixels`: print full-resolution Braille frames instead of ASCII
//! - `--write-config`: write the effective configuration back to disk and exit

use anyhow::{bail, Context};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Timelike};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use text_watch_lib::{
    battery::{BatterySource, FixedBattery, SysfsBattery},
    compositor::Compositor,
    config::{Config, DisplayConfig, CONFIG_FILE},
    renderer::{draw_ascii, draw_braille},
    status::WeatherMessage,
    weather::{unavailable_message, WeatherClient, WeatherError},
    UnitsChanged, WatchFace,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

type WeatherResult = Result<WeatherMessage, WeatherError>;

const USAGE: &str =
    "usage: text-watch [--once] [--demo] [--pixels] [--config PATH] [--write-config]";

/// Command line options.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    once: bool,
    demo: bool,
    pixels: bool,
    write_config: bool,
    help: bool,
    config_path: Option<PathBuf>,
}

/// Parse arguments, excluding the program name.
fn parse_args<I>(args: I) -> anyhow::Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--once" => options.once = true,
            "--demo" => options.demo = true,
            "--pixels" => options.pixels = true,
            "--write-config" => options.write_config = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => options.help = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(options)
}

/// One frame of terminal output.
fn render(host: &Compositor, display: &DisplayConfig, pixels: bool) -> String {
    if pixels {
        draw_braille(host, display.invert)
    } else {
        draw_ascii(host)
    }
}

/// Source of wall-clock time for the face.
enum Clock {
    Local,
    /// One simulated minute per real second, starting at `start`
    Simulated { start: NaiveDateTime, started: Instant },
}

impl Clock {
    fn now(&self) -> NaiveDateTime {
        match self {
            Clock::Local => Local::now().naive_local(),
            Clock::Simulated { start, started } => {
                *start + ChronoDuration::minutes(started.elapsed().as_secs() as i64)
            }
        }
    }
}

fn battery_source(config: &Config) -> Box<dyn BatterySource> {
    match config.battery.fixed_percent {
        Some(percent) => Box::new(FixedBattery(Some(percent))),
        None => Box::new(SysfsBattery::new(&config.battery.capacity_path)),
    }
}

/// Fire off a weather fetch; the result comes back through `tx`.
fn request_weather(client: Option<&WeatherClient>, tx: &mpsc::UnboundedSender<WeatherResult>) {
    let Some(client) = client.cloned() else {
        return;
    };
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch().await;
        if tx.send(result).is_err() {
            debug!("event loop gone, dropping weather result");
        }
    });
}

async fn run(config: Config, demo: bool, pixels: bool) -> anyhow::Result<()> {
    let size = embedded_graphics::prelude::Size::new(config.display.width, config.display.height);
    let mut host = Compositor::new(size);
    let mut face = WatchFace::new(&mut host, size, config.animation.timing());
    let battery = battery_source(&config);

    let clock = if demo {
        let now = Local::now().naive_local();
        let start = now.with_second(0).unwrap_or(now);
        info!(start = %start.format("%H:%M"), "demo clock: one minute per second");
        Clock::Simulated {
            start,
            started: Instant::now(),
        }
    } else {
        Clock::Local
    };

    let mut previous = clock.now();
    face.show_initial(&mut host, previous, battery.as_ref());

    let (tx, mut rx) = mpsc::unbounded_channel::<WeatherResult>();
    let client = if config.weather.enabled {
        match WeatherClient::new(&config.weather) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("weather client unavailable: {}", e);
                face.weather_failed(&mut host);
                None
            }
        }
    } else {
        info!("weather disabled");
        face.weather_failed(&mut host);
        None
    };
    request_weather(client.as_ref(), &tx);

    let mut last_frame_text = render(&host, &config.display, pixels);
    print!("{last_frame_text}");

    let frame_interval = Duration::from_millis(config.display.frame_interval_ms.max(1));
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let frame = Instant::now();
                host.advance(frame - last_frame);
                last_frame = frame;

                let now = clock.now();
                let units = UnitsChanged::between(previous, now);
                if units.minute {
                    let report = face.on_tick(&mut host, now, units, battery.as_ref());
                    previous = now;
                    if report.weather_due {
                        request_weather(client.as_ref(), &tx);
                    }
                }

                let text = render(&host, &config.display, pixels);
                if text != last_frame_text {
                    print!("{text}");
                    last_frame_text = text;
                }
            }
            Some(result) = rx.recv() => {
                match result {
                    Ok(message) => face.apply_weather(&mut host, &message),
                    Err(e) => {
                        warn!("weather fetch failed: {}", e);
                        face.apply_weather(&mut host, &unavailable_message());
                    }
                }
            }
            result = &mut ctrl_c => {
                result.context("listening for Ctrl-C")?;
                info!("interrupted");
                break;
            }
        }
    }

    face.teardown(&mut host);
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args(env::args().skip(1))?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match &options.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    if options.write_config {
        let written = match &options.config_path {
            Some(path) => config.save_to_path(path),
            None => config.save(),
        };
        let target = options
            .config_path
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        written.with_context(|| format!("writing {}", target.display()))?;
        return Ok(());
    }

    if options.once {
        let size =
            embedded_graphics::prelude::Size::new(config.display.width, config.display.height);
        let mut host = Compositor::new(size);
        let mut face = WatchFace::new(&mut host, size, config.animation.timing());
        face.show_initial(
            &mut host,
            Local::now().naive_local(),
            battery_source(&config).as_ref(),
        );
        print!("{}", render(&host, &config.display, options.pixels));
        face.teardown(&mut host);
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    rt.block_on(run(config, options.demo, options.pixels))
}
