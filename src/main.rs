//! HomeControl console — terminal front-end
//!
//! Connects to the HomeControl board over a serial port, prints door and
//! temperature updates as they arrive, and toggles the lamp and smart plug
//! from an interactive prompt.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! cargo run -- --list-ports
//!
//! # Connect with defaults (or a JSON config file)
//! cargo run -- --port /dev/ttyACM0
//! cargo run -- --config homecontrol.json --threshold 28.5
//!
//! # No hardware: run against the built-in board simulator
//! cargo run -- --simulate
//!
//! # Write the effective configuration and exit
//! cargo run -- --port COM17 --write-config homecontrol.json
//! ```
//!
//! ## Commands
//!
//! - `lamp` / `plug` - Toggle an actuator
//! - `repair` - Acknowledge the temperature warning
//! - `status` - Show current state and link counters
//! - `log` - Show the door log
//! - `help` - Show help
//! - `exit` - Exit
//!
//! Set `RUST_LOG=info` for the full event log on stderr.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossbeam_channel::Receiver;

use homecontrol::adapters::channel_sink::ChannelSink;
use homecontrol::adapters::config_file::JsonConfigFile;
use homecontrol::adapters::log_sink::LogEventSink;
use homecontrol::adapters::serial;
use homecontrol::adapters::simulated::SimulatedDevice;
use homecontrol::app::commands::{Actuator, ConsoleCommand};
use homecontrol::app::events::ConsoleEvent;
use homecontrol::app::ports::ConfigPort;
use homecontrol::app::state::TIMESTAMP_FORMAT;
use homecontrol::config::ConsoleConfig;
use homecontrol::console::Console;

/// Report period of the simulated board (the reference firmware's 1 s loop).
const SIM_PERIOD: Duration = Duration::from_secs(1);

// ── Command line ──────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct Options {
    config_path: Option<String>,
    write_config: Option<String>,
    port: Option<String>,
    baud_rate: Option<u32>,
    read_timeout_ms: Option<u64>,
    warning_threshold_c: Option<f32>,
    simulate: bool,
    list_ports: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut opts = Options::default();
    let mut it = args.iter();

    while let Some(arg) = it.next() {
        let mut value = || {
            it.next()
                .cloned()
                .with_context(|| format!("{} needs a value", arg))
        };
        match arg.as_str() {
            "--config" => opts.config_path = Some(value()?),
            "--write-config" => opts.write_config = Some(value()?),
            "--port" => opts.port = Some(value()?),
            "--baud" => {
                opts.baud_rate = Some(value()?.parse().context("--baud expects an integer")?);
            }
            "--timeout-ms" => {
                opts.read_timeout_ms =
                    Some(value()?.parse().context("--timeout-ms expects an integer")?);
            }
            "--threshold" => {
                opts.warning_threshold_c =
                    Some(value()?.parse().context("--threshold expects a number")?);
            }
            "--simulate" => opts.simulate = true,
            "--list-ports" => opts.list_ports = true,
            "--help" | "-h" => opts.help = true,
            other => bail!("unknown argument '{}' (try --help)", other),
        }
    }

    Ok(opts)
}

/// Defaults, then the config file, then command-line overrides.
fn build_config(opts: &Options) -> Result<ConsoleConfig> {
    let mut config = match &opts.config_path {
        Some(path) => JsonConfigFile::new(path)
            .load()
            .with_context(|| format!("loading {}", path))?,
        None => ConsoleConfig::default(),
    };

    if let Some(port) = &opts.port {
        config.port.clone_from(port);
    }
    if let Some(baud) = opts.baud_rate {
        config.baud_rate = baud;
    }
    if let Some(ms) = opts.read_timeout_ms {
        config.read_timeout_ms = ms;
    }
    if let Some(t) = opts.warning_threshold_c {
        config.warning_threshold_c = t;
    }

    config.validate()?;
    Ok(config)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args)?;

    if opts.help {
        print_usage();
        return Ok(());
    }
    if opts.list_ports {
        list_ports();
        return Ok(());
    }

    let config = build_config(&opts)?;

    if let Some(path) = &opts.write_config {
        JsonConfigFile::new(path).save(&config)?;
        println!("Wrote {}", path);
        return Ok(());
    }

    let (channel, events) = ChannelSink::new();
    let sink = (LogEventSink::new(), channel);

    let console = if opts.simulate {
        println!("Starting simulated board...");
        Console::simulated(&config, &SimulatedDevice::new(), SIM_PERIOD, sink)?
    } else {
        print!("Connecting to {}...", config.port);
        io::stdout().flush()?;
        let console = Console::open_serial(&config, sink)
            .with_context(|| format!("opening {}", config.port))?;
        println!(" connected!");
        console
    };

    let renderer = thread::Builder::new()
        .name("homecontrol-ui".into())
        .spawn(move || render_events(&events))?;

    println!("\nHomeControl console");
    println!("Type 'help' for commands, 'exit' to quit\n");
    run_shell(&console)?;

    let exit = console.shutdown();
    log::info!("Listener exit: {:?}", exit);
    // All senders are gone once the console is shut down.
    let _ = renderer.join();

    println!("Goodbye!");
    Ok(())
}

// ── Presentation ──────────────────────────────────────────────

fn render_events(events: &Receiver<ConsoleEvent>) {
    for event in events {
        match event {
            ConsoleEvent::Temperature {
                celsius,
                warning_active,
            } => {
                if warning_active {
                    println!("Temperature: {:.1} \u{00b0}C  !! HIGH TEMPERATURE !!", celsius);
                } else {
                    println!("Temperature: {:.1} \u{00b0}C", celsius);
                }
            }
            ConsoleEvent::DoorStatus { timestamp, status } => {
                println!(
                    "Door Status: {}  ({})",
                    status,
                    timestamp.format(TIMESTAMP_FORMAT)
                );
            }
            ConsoleEvent::ActuatorChanged { actuator, state } => {
                println!("{} is now {}", actuator, state);
            }
            ConsoleEvent::CommandFailed { actuator, error } => {
                eprintln!("Could not reach the board for {}: {}", actuator, error);
            }
            ConsoleEvent::WarningAcknowledged => println!("Warning cleared."),
            ConsoleEvent::ConnectivityLost(reason) => {
                eprintln!("Link lost: {}. Lamp and plug controls are disabled.", reason);
            }
        }
    }
}

fn run_shell(console: &Console) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(input) = lines.next() else {
            break; // EOF
        };
        let input = input?;
        let input = input.trim();

        match input {
            "" => {}
            "exit" | "quit" => break,
            "help" => print_help(),
            "status" => print_status(console),
            "log" => print_log(console),
            other => match parse_command(other) {
                Some(cmd) => {
                    if let ConsoleCommand::Toggle(_) = cmd {
                        if !console.link_up() {
                            eprintln!("Controls disabled: the link is down");
                            continue;
                        }
                    }
                    if let Err(e) = console.execute(cmd) {
                        eprintln!("Error: {}", e);
                    }
                }
                None => eprintln!("Unknown command '{}' (try 'help')", other),
            },
        }
    }

    Ok(())
}

fn parse_command(input: &str) -> Option<ConsoleCommand> {
    match input {
        "lamp" => Some(ConsoleCommand::Toggle(Actuator::Lamp)),
        "plug" => Some(ConsoleCommand::Toggle(Actuator::Plug)),
        "repair" | "ack" => Some(ConsoleCommand::AcknowledgeWarning),
        _ => None,
    }
}

fn print_status(console: &Console) {
    let s = console.snapshot();
    let temp = &s.temperature;
    println!("Lamp:        {}", s.lamp);
    println!("Plug:        {}", s.plug);
    match temp.last_reading() {
        Some(c) => println!(
            "Temperature: {:.1} \u{00b0}C (threshold {:.1}, warning {})",
            c,
            temp.threshold(),
            if temp.warning_visible() {
                "ON"
            } else if temp.warning_active() {
                "acknowledged"
            } else {
                "off"
            }
        ),
        None => println!("Temperature: -- \u{00b0}C"),
    }
    println!(
        "Door:        {}",
        s.door_status().unwrap_or("waiting for door status...")
    );
    println!(
        "Link:        {}",
        if s.link_up() { "connected" } else { "LOST" }
    );
    println!("{}", s.metrics.to_json());
}

fn print_log(console: &Console) {
    let s = console.snapshot();
    if s.door_log().is_empty() {
        println!("(no door events yet)");
        return;
    }
    println!("{:<20}  Door Status", "Timestamp");
    for entry in s.door_log() {
        println!("{:<20}  {}", entry.formatted_timestamp(), entry.status);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  lamp      Toggle the lamp");
    println!("  plug      Toggle the smart plug");
    println!("  repair    Acknowledge the temperature warning");
    println!("  status    Show current state and link counters");
    println!("  log       Show the door log");
    println!("  help      Show this help");
    println!("  exit      Exit");
}

fn print_usage() {
    println!("Usage: homecontrol [OPTIONS]");
    println!();
    println!("  --port <PORT>          Serial device (default {})", ConsoleConfig::default().port);
    println!("  --baud <RATE>          Baud rate (default 9600)");
    println!("  --timeout-ms <MS>      Read timeout (default 1000)");
    println!("  --threshold <CELSIUS>  Warning threshold (default 27.0)");
    println!("  --config <PATH>        Load settings from a JSON file");
    println!("  --write-config <PATH>  Save the effective settings and exit");
    println!("  --simulate             Use the built-in board simulator");
    println!("  --list-ports           List serial ports and exit");
}

fn list_ports() {
    println!("Available serial ports:");
    match serial::list_ports() {
        Ok(ports) => {
            if ports.is_empty() {
                println!("  (none)");
            }
            for port in ports {
                print!("  {}", port.port_name);
                match &port.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        println!(" - USB (VID: 0x{:04x}, PID: 0x{:04x})", info.vid, info.pid);
                        if let Some(ref manufacturer) = info.manufacturer {
                            println!("      Manufacturer: {}", manufacturer);
                        }
                        if let Some(ref product) = info.product {
                            println!("      Product: {}", product);
                        }
                    }
                    serialport::SerialPortType::BluetoothPort => println!(" - Bluetooth"),
                    serialport::SerialPortType::PciPort => println!(" - PCI"),
                    serialport::SerialPortType::Unknown => println!(" - Unknown"),
                }
            }
        }
        Err(e) => {
            eprintln!("Error listing ports: {}", e);
        }
    }
}
