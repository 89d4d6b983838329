use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use thiserror::Error;

use step6502::{
    DebugObserver, ExecutionError, FlatMemory, InstructionLimit, LoadError, Observer, Throttle,
    CPU,
};

/// Run a 6502 binary image on the step6502 interpreter.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Image to load, as PATH@START or PATH@START:END (hex addresses, inclusive end)
    #[arg(short, long, value_name = "PATH@START[:END]", value_parser = parse_segment, required = true)]
    load: Vec<Segment>,

    /// Begin execution at this address instead of the reset vector
    #[arg(short, long, value_name = "ADDR", value_parser = parse_address)]
    start: Option<u16>,

    /// Stop after this many instructions (at least 1)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_instructions: Option<u64>,

    /// Print registers and flags after every instruction
    #[arg(short, long)]
    debug: bool,

    /// Include a zero page dump in the debug output
    #[arg(long, requires = "debug")]
    show_zero_page: bool,

    /// Wait for Enter after every instruction
    #[arg(long, requires = "debug")]
    step: bool,

    /// Sleep this long after every instruction, with or without --debug
    #[arg(long, value_name = "MS", default_value_t = 0)]
    slow_down_ms: u64,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn", value_parser = parse_level)]
    log_level: LevelFilter,
}

/// A binary image and the memory range it is copied into.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    path: PathBuf,
    start: u16,
    end: Option<u16>,
}

/// Settings for the per-instruction debug observer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DebugSettings {
    show_zero_page: bool,
    step: bool,
}

/// Everything needed to set up and run one emulation.
#[derive(Debug, Clone)]
struct RunConfig {
    segments: Vec<Segment>,
    start: Option<u16>,
    max_instructions: Option<u64>,
    debug: Option<DebugSettings>,
    slow_down: Duration,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        let debug = args.debug.then(|| DebugSettings {
            show_zero_page: args.show_zero_page,
            step: args.step,
        });

        RunConfig {
            segments: args.load,
            start: args.start,
            max_instructions: args.max_instructions,
            debug,
            slow_down: Duration::from_millis(args.slow_down_ms),
        }
    }
}

#[derive(Debug, Error)]
enum RunError {
    #[error("couldn't read size of {}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} ({len} bytes) does not fit at 0x{start:04X}", path.display())]
    DoesNotFit { path: PathBuf, start: u16, len: u64 },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = SimpleLogger::new().with_level(args.log_level).init() {
        eprintln!("warning: logger unavailable: {err}");
    }

    match run(RunConfig::from(args)) {
        Ok(cpu) => {
            println!(
                "PC: 0x{:04X}, SP: 0x{:02X}, A: 0x{:02X}, X: 0x{:02X}, Y: 0x{:02X}, P: 0x{:02X}",
                cpu.pc(),
                cpu.sp(),
                cpu.a(),
                cpu.x(),
                cpu.y(),
                cpu.status().to_byte(false)
            );
            println!("{} instructions executed", cpu.instructions_executed());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: RunConfig) -> Result<CPU<FlatMemory>, RunError> {
    let mut memory = FlatMemory::new();
    for segment in &config.segments {
        load_segment(&mut memory, segment)?;
    }

    let mut observers: Vec<Box<dyn Observer<FlatMemory>>> = Vec::new();
    match &config.debug {
        Some(debug) => observers.push(Box::new(
            DebugObserver::stdout()
                .with_zero_page(debug.show_zero_page)
                .with_step(debug.step)
                .with_slow_down(config.slow_down),
        )),
        None if !config.slow_down.is_zero() => {
            observers.push(Box::new(Throttle::new(config.slow_down)))
        }
        None => {}
    }
    if let Some(limit) = config.max_instructions {
        observers.push(Box::new(InstructionLimit::new(limit)));
    }

    let mut cpu = CPU::new(memory);
    cpu.register_observers(observers);

    match config.start {
        Some(address) => cpu.start_at_address(address)?,
        None => cpu.start_emulation()?,
    }

    Ok(cpu)
}

fn load_segment(memory: &mut FlatMemory, segment: &Segment) -> Result<(), RunError> {
    let end = match segment.end {
        Some(end) => end,
        None => {
            // Without an explicit end the whole file is loaded
            let len = fs::metadata(&segment.path)
                .map_err(|source| RunError::Metadata {
                    path: segment.path.clone(),
                    source,
                })?
                .len();

            let last = segment.start as u64 + len.max(1) - 1;
            if last > 0xFFFF {
                return Err(RunError::DoesNotFit {
                    path: segment.path.clone(),
                    start: segment.start,
                    len,
                });
            }
            last as u16
        }
    };

    memory.load_file(&segment.path, segment.start, end)?;
    Ok(())
}

/// Parses a hex address, with or without a `0x` or `$` prefix.
fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s);

    u16::from_str_radix(digits, 16).map_err(|_| format!("'{s}' is not a 16-bit hex address"))
}

fn parse_segment(s: &str) -> Result<Segment, String> {
    let (path, range) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("'{s}' should look like PATH@START or PATH@START:END"))?;

    if path.is_empty() {
        return Err(format!("'{s}' has no path"));
    }

    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (parse_address(start)?, Some(parse_address(end)?)),
        None => (parse_address(range)?, None),
    };

    Ok(Segment {
        path: PathBuf::from(path),
        start,
        end,
    })
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("'{s}' is not one of off, error, warn, info, debug, trace"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_prefixes() {
        assert_eq!(parse_address("8000"), Ok(0x8000));
        assert_eq!(parse_address("0x0200"), Ok(0x0200));
        assert_eq!(parse_address("$FFFC"), Ok(0xFFFC));
        assert!(parse_address("10000").is_err());
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn test_parse_segment() {
        assert_eq!(
            parse_segment("rom.bin@C000:FFFF"),
            Ok(Segment {
                path: PathBuf::from("rom.bin"),
                start: 0xC000,
                end: Some(0xFFFF),
            })
        );
        assert_eq!(
            parse_segment("prog.bin@0x0200"),
            Ok(Segment {
                path: PathBuf::from("prog.bin"),
                start: 0x0200,
                end: None,
            })
        );
        assert!(parse_segment("prog.bin").is_err());
        assert!(parse_segment("@0200").is_err());
    }

    #[test]
    fn test_debug_settings_only_with_debug_flag() {
        let args = Args::parse_from(["step6502", "--load", "a.bin@0200", "-n", "5"]);
        let config = RunConfig::from(args);
        assert!(config.debug.is_none());
        assert_eq!(config.max_instructions, Some(5));

        let args = Args::parse_from([
            "step6502",
            "--load",
            "a.bin@0200",
            "--debug",
            "--slow-down-ms",
            "20",
        ]);
        let config = RunConfig::from(args);
        assert_eq!(
            config.debug,
            Some(DebugSettings {
                show_zero_page: false,
                step: false,
            })
        );
        assert_eq!(config.slow_down, Duration::from_millis(20));
    }

    #[test]
    fn test_slow_down_kept_without_debug() {
        let args = Args::parse_from(["step6502", "--load", "a.bin@0200", "--slow-down-ms", "500"]);
        let config = RunConfig::from(args);

        assert!(config.debug.is_none());
        assert_eq!(config.slow_down, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_instruction_limit_rejected() {
        assert!(Args::try_parse_from(["step6502", "--load", "a.bin@0200", "-n", "0"]).is_err());

        let args = Args::parse_from(["step6502", "--load", "a.bin@0200", "-n", "1"]);
        assert_eq!(RunConfig::from(args).max_instructions, Some(1));
    }
}
