use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressIterator, ProgressStyle};
use libtinyqv::bringup::{self, SleepDelay};
use libtinyqv::spi::backend::ftdi::FtdiLink;
use libtinyqv::spi::peripheral::TinyQv;

fn parse_u32(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| e.to_string())
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let value = parse_u32(s)?;
    u8::try_from(value).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "tinyqv_cli", about = "TinyQV register access over FTDI SPI")]
struct Cli {
    /// FTDI device description string
    #[arg(long, default_value = "TinyQV bringup A")]
    device: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clock the peripheral through reset
    Bringup,
    /// Read a 32-bit register
    Read {
        #[arg(value_parser = parse_u8)]
        addr: u8,
    },
    /// Write a 32-bit register
    Write {
        #[arg(value_parser = parse_u8)]
        addr: u8,
        #[arg(value_parser = parse_u32)]
        value: u32,
    },
    /// Enable sample generation and capture PCM samples
    Sample {
        /// Number of samples to capture
        #[arg(long, default_value_t = 8000)]
        count: u32,
        /// Polling interval in microseconds
        #[arg(long, default_value_t = 125)]
        interval_us: u64,
        /// Sample clock divider written before capturing
        #[arg(long, value_parser = parse_u32, default_value = "0x40")]
        clock_scale: u32,
        /// Raw output file (one byte per sample)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;

    let cli = Cli::parse();

    let mut link = FtdiLink::open(&cli.device)?;
    link.initialize()?;

    match cli.command {
        Command::Bringup => {
            bringup::reset_sequence(&mut link, &mut SleepDelay)?;
            log::info!("peripheral clocked through reset");
        }
        Command::Read { addr } => {
            let mut dev = TinyQv::new(link);
            let value = dev.transport().read32(addr)?;
            println!("{addr:#04x} = {value:#010x}");
        }
        Command::Write { addr, value } => {
            let mut dev = TinyQv::new(link);
            dev.transport().write32(addr, value)?;
            log::info!("wrote {value:#010x} to {addr:#04x}");
        }
        Command::Sample {
            count,
            interval_us,
            clock_scale,
            out,
        } => {
            let mut dev = TinyQv::new(link);

            dev.set_clock_scale(clock_scale)?;
            dev.enable()?;
            log::info!("sampling {count} PCM values at {interval_us} us intervals");

            let mut samples = Vec::with_capacity(count as usize);
            for _ in (0..count).progress().with_style(
                ProgressStyle::default_spinner()
                    .template("[{elapsed_precise}, eta:{eta}] {bar:40.cyan/blue} {pos} / {len}")
                    .unwrap(),
            ) {
                samples.push(dev.read_sample()?);
                dev.acknowledge_interrupt()?;
                std::thread::sleep(Duration::from_micros(interval_us));
            }

            dev.disable()?;

            if let Some(path) = out {
                let mut file = File::create(&path)?;
                file.write_all(&samples)?;
                log::info!("wrote {} samples to {}", samples.len(), path.display());
            } else {
                for chunk in samples.chunks(16) {
                    let line: Vec<String> = chunk.iter().map(|s| format!("{s:02x}")).collect();
                    println!("{}", line.join(" "));
                }
            }
        }
    }

    Ok(())
}
