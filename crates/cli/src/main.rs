//! RV64 emulator CLI.
//!
//! This binary is the single entry point for running guest images. It
//! performs:
//! 1. **Image selection:** ELF by default, or a flat binary with `--raw`.
//! 2. **Configuration:** Built-in defaults, or a JSON override file.
//! 3. **Execution:** Unbounded by default, or a bounded number of steps
//!    with an optional register dump at the end.
//!
//! Logging is controlled through `RUST_LOG` (for example
//! `RUST_LOG=rv64emu_core=debug`).

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rv64emu_core::config::Config;
use rv64emu_core::machine::Machine;

#[derive(Parser, Debug)]
#[command(
    name = "rv64emu",
    author,
    version,
    about = "RISC-V RV64 system emulator",
    long_about = "Run a RISC-V guest image on an emulated machine with an Sv39 MMU.\n\n\
        Examples:\n  \
        rv64emu kernel.elf\n  \
        rv64emu --raw boot.bin --steps 100000 --dump-state\n  \
        rv64emu kernel.elf --config machine.json"
)]
struct Cli {
    /// Guest image to run (ELF unless --raw is given).
    image: PathBuf,

    /// Treat the image as a flat binary loaded at the RAM base.
    #[arg(long)]
    raw: bool,

    /// JSON machine configuration overriding the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many instructions instead of running forever.
    #[arg(long)]
    steps: Option<u64>,

    /// Dump registers and pc to stderr when a bounded run finishes.
    #[arg(long)]
    dump_state: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<Config>(&text)?
        }
        None => Config::default(),
    };

    let bytes = std::fs::read(&cli.image)?;
    let mut machine = if cli.raw {
        Machine::from_raw(&config, &bytes)?
    } else {
        Machine::from_elf(&config, &bytes)?
    };

    match cli.steps {
        Some(steps) => {
            machine.cpu.run_steps(steps);
            if cli.dump_state {
                machine.cpu.dump_state();
            }
            Ok(())
        }
        None => machine.cpu.run(),
    }
}
