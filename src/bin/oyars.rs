// Oyars CLI
// Thumb-shift keyboard remapping daemon for Linux evdev/uinput

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use oyars_core::event::spawn_readers;
use oyars_core::input::{find_keyboards, list_devices, open_devices};
use oyars_core::output::VirtualDevice;
use oyars_core::settings::Settings;
use oyars_core::transform::RemapEngine;
use oyars_core::{parse_keymap_path, KeymapTable};

/// Thumb-shift (oyayubi-shift) key remapper
#[derive(Parser, Debug)]
#[command(name = "oyars")]
#[command(author = "oyars contributors")]
#[command(version = "0.2.0")]
#[command(about = "Thumb-shift keyboard remapper for Linux", long_about = None)]
struct Args {
    /// Keymap file
    #[arg(short, long, value_name = "PATH", default_value = "setting.yab")]
    setting: PathBuf,

    /// Source devices by path or name (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Do not take the exclusive grab on source devices
    #[arg(long)]
    no_grab: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate the keymap file and exit
    #[arg(long)]
    check_config: bool,

    /// List available keyboard devices
    #[arg(long)]
    list_devices: bool,
}

/// Main application state
struct Application {
    args: Args,
    settings: Settings,
    table: KeymapTable,
    /// Flag observed by every reader task and the main loop
    running: Arc<AtomicBool>,
}

impl Application {
    fn new(args: Args) -> anyhow::Result<Self> {
        let settings = match Settings::load_default() {
            Ok(settings) => {
                if let Some(path) = settings.source_path() {
                    log::info!("loaded settings from {}", path.display());
                }
                settings
            }
            Err(e) => {
                log::warn!("could not load settings: {}", e);
                Settings::new()
            }
        };

        let table = parse_keymap_path(&args.setting)
            .with_context(|| format!("failed to load keymap {}", args.setting.display()))?;

        Ok(Self {
            args,
            settings,
            table,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Print available keyboard devices
    fn list_devices() -> anyhow::Result<()> {
        let devices = list_devices().context("finding keyboard devices")?;
        println!("Found {} keyboard device(s):", devices.len());
        for device in &devices {
            match &device.path {
                Some(path) => println!("  {}: {} ({})", device.index, device.name, path),
                None => println!("  {}: {}", device.index, device.name),
            }
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        println!(
            "Configuration is valid: {} layer section(s), {} per-key layer(s)",
            self.table.layer_count(),
            self.table.key_layer_count()
        );
        Ok(())
    }

    /// Run the daemon until a signal or the shutdown chord arrives.
    fn run(self) -> anyhow::Result<()> {
        // Device filter precedence: CLI --devices > settings [devices].only
        // > autodetect.
        let filters: &[String] = if !self.args.devices.is_empty() {
            &self.args.devices
        } else {
            self.settings.devices()
        };
        let devices = if filters.is_empty() {
            find_keyboards().context("autodetecting keyboard devices")?
        } else {
            open_devices(filters).context("opening configured devices")?
        };
        log::info!("using {} source device(s)", devices.len());

        self.install_signal_handler()?;

        let grab = !self.args.no_grab && self.settings.grab();
        let queue = spawn_readers(devices, grab, &self.running).context("grabbing devices")?;

        // The virtual device registers only after every grab succeeded, so
        // a startup failure leaves nothing behind.
        let mut sink = match VirtualDevice::new(self.settings.device_name()) {
            Ok(sink) => sink,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                queue.join();
                return Err(e).context("creating virtual output device");
            }
        };

        let mut engine = RemapEngine::new(self.table);
        engine.set_holding_window(self.settings.holding_window());

        println!("oyars is running. Press Ctrl+C to exit.");
        while self.running.load(Ordering::SeqCst) {
            let event = match queue.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => event,
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            };

            if !event.is_key() {
                if let Err(e) = sink.write(event) {
                    log::error!("output write failed: {}", e);
                }
                continue;
            }

            let out = engine.process_event(event, Instant::now());
            if self.args.verbose {
                log::debug!(
                    "event code={} value={} -> {} synthetic, forward={}",
                    event.code,
                    event.value,
                    out.events.len(),
                    out.forward
                );
            }

            if let Err(e) = sink.write_all(&out.events) {
                log::error!("output write failed: {}", e);
            }
            if out.forward {
                if let Err(e) = sink.write(event) {
                    log::error!("output write failed: {}", e);
                }
            }
            if out.shutdown {
                println!("shutdown chord pressed");
                self.running.store(false, Ordering::SeqCst);
            }
        }

        // Teardown order: release every grab, then destroy the virtual
        // device. Failures are logged, never retried.
        self.running.store(false, Ordering::SeqCst);
        queue.join();
        log::info!("released device grabs");
        if let Err(e) = sink.release_all() {
            log::warn!("failed to release stuck keys: {}", e);
        }
        drop(sink);
        log::info!("virtual device destroyed");

        Ok(())
    }

    fn install_signal_handler(&self) -> anyhow::Result<()> {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let running = self.running.clone();
        let mut signals = Signals::new([SIGINT, SIGTERM]).context("installing signal handler")?;
        std::thread::spawn(move || {
            if let Some(signal) = (&mut signals).into_iter().next() {
                log::info!("received signal {}, shutting down", signal);
                running.store(false, Ordering::SeqCst);
            }
        });
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if args.list_devices {
        return Application::list_devices();
    }

    let app = Application::new(args)?;
    if app.args.check_config {
        return app.validate();
    }

    app.run()
}
