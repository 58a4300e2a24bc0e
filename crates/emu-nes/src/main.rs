//! Headless NES runner.
//!
//! Loads an NROM image, runs a number of frames, and optionally writes a
//! PNG of the last frame or a `nestest`-style instruction trace.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

use emu_core::Cpu;
use emu_nes::{Nes, NesConfig, capture};

struct CliArgs {
    rom_path: Option<PathBuf>,
    frames: u32,
    screenshot_path: Option<PathBuf>,
    record_dir: Option<PathBuf>,
    trace_path: Option<PathBuf>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        rom_path: None,
        frames: 200,
        screenshot_path: None,
        record_dir: None,
        trace_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rom" => {
                i += 1;
                cli.rom_path = args.get(i).map(PathBuf::from);
            }
            "--frames" => {
                i += 1;
                match parse_frames(args.get(i).map(String::as_str)) {
                    Ok(frames) => cli.frames = frames,
                    Err(message) => {
                        eprintln!("{message}");
                        process::exit(1);
                    }
                }
            }
            "--screenshot" => {
                i += 1;
                cli.screenshot_path = args.get(i).map(PathBuf::from);
            }
            "--record" => {
                i += 1;
                cli.record_dir = args.get(i).map(PathBuf::from);
            }
            "--trace" => {
                i += 1;
                cli.trace_path = args.get(i).map(PathBuf::from);
            }
            "--help" | "-h" => {
                eprintln!("Usage: emu-nes --rom <file> [OPTIONS]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --rom <file>         iNES ROM file (.nes, mapper 0)");
                eprintln!("  --frames <n>         Number of frames to run [default: 200]");
                eprintln!("  --screenshot <file>  Save a PNG of the last frame");
                eprintln!("  --record <dir>       Save every frame as PNG");
                eprintln!("  --trace <file>       Write a per-instruction trace");
                eprintln!();
                eprintln!("Set RUST_LOG=debug for device logging.");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn parse_frames(value: Option<&str>) -> Result<u32, String> {
    let value = value.ok_or_else(|| "--frames needs a value".to_string())?;
    value
        .parse()
        .map_err(|e| format!("Invalid --frames value {value:?}: {e}"))
}

fn make_nes(cli: &CliArgs) -> Nes {
    let Some(rom_path) = cli.rom_path.as_ref() else {
        eprintln!("No ROM file specified. Use --rom <file.nes>");
        process::exit(1);
    };

    let rom_data = match std::fs::read(rom_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to read ROM file {}: {e}", rom_path.display());
            process::exit(1);
        }
    };

    match Nes::new(&NesConfig::new(rom_data)) {
        Ok(nes) => {
            let region = nes.region();
            log::info!(
                "loaded ROM: {} ({region:?}, CPU {} Hz)",
                rom_path.display(),
                region.cpu_hz()
            );
            nes
        }
        Err(e) => {
            eprintln!("Failed to load ROM: {e}");
            process::exit(1);
        }
    }
}

/// Run `frames` frames, writing one trace line per instruction.
fn run_traced(nes: &mut Nes, frames: u32, out: &mut impl Write) -> std::io::Result<()> {
    let target = nes.ppu().frame() + u64::from(frames);
    // Finish the reset sequence so the first line shows the entry point.
    nes.step_instruction();
    while nes.ppu().frame() < target && !nes.cpu().is_halted() {
        writeln!(out, "{}", nes.trace_line())?;
        nes.step_instruction();
    }
    if nes.cpu().is_halted() {
        log::warn!("CPU halted at ${:04X}", nes.cpu().pc());
    }
    out.flush()
}

fn main() {
    env_logger::init();
    let cli = parse_args();
    let mut nes = make_nes(&cli);

    if let Some(ref dir) = cli.record_dir {
        if let Err(e) = capture::record(&mut nes, dir, cli.frames) {
            eprintln!("Record error: {e}");
            process::exit(1);
        }
        return;
    }

    if let Some(ref path) = cli.trace_path {
        let result = File::create(path)
            .and_then(|file| run_traced(&mut nes, cli.frames, &mut BufWriter::new(file)));
        if let Err(e) = result {
            eprintln!("Trace error: {e}");
            process::exit(1);
        }
    } else {
        for _ in 0..cli.frames {
            nes.run_frame();
        }
    }

    if let Some(ref path) = cli.screenshot_path {
        if let Err(e) = capture::save_screenshot(&nes, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }
}
