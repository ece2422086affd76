//! CLI entry point for the datapath simulator binary.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use datapath_core::{disassemble, run_traced, CoreConfig, CoreState, RunStop, TraceEvent, TraceSink};
use datapath_sim::loader::load_image_file;
use datapath_sim::report::{format_memory, format_registers, format_summary};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: datapath-sim <image.asc> [options]

Runs a program image from address 0 until it halts, then prints the
cycle count, halt reason, PC, and registers.

Options:
  --max-cycles <N>           Stop after N cycles (default 1000000, 0 = no limit)
  --trace                    Print each instruction as it is fetched
  --dump-memory <START> <END>  Print memory words between two hex byte addresses
  -h, --help                 Show this help message

Exit status: 0 on a clean halt, 2 when the cycle limit is reached, 1 otherwise.

Examples:
  datapath-sim program.asc
  datapath-sim program.asc --trace --dump-memory 0x100 0x11C
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    image: PathBuf,
    cycle_limit: Option<u64>,
    trace: bool,
    dump: Option<(u32, u32)>,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut image: Option<PathBuf> = None;
    let mut cycle_limit = CoreConfig::default().cycle_limit;
    let mut trace = false;
    let mut dump = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--trace" {
            trace = true;
            continue;
        }

        if arg == "--max-cycles" {
            let value = next_value(&mut args, "--max-cycles")?;
            let limit = value
                .parse::<u64>()
                .map_err(|_| format!("invalid cycle count: {value}"))?;
            cycle_limit = (limit != 0).then_some(limit);
            continue;
        }

        if arg == "--dump-memory" {
            let start = parse_address(&next_value(&mut args, "--dump-memory")?)?;
            let end = parse_address(&next_value(&mut args, "--dump-memory")?)?;
            if end < start {
                return Err(format!("empty memory range: 0x{start:X}..0x{end:X}"));
            }
            dump = Some((start, end));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if image.is_some() {
            return Err("multiple image paths provided".to_string());
        }
        image = Some(PathBuf::from(arg));
    }

    let image = image.ok_or_else(|| "missing image path".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        image,
        cycle_limit,
        trace,
        dump,
    }))
}

fn next_value(args: &mut impl Iterator<Item = OsString>, option: &str) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| format!("missing value for {option}"))
}

fn parse_address(text: &str) -> Result<u32, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|_| format!("invalid address: {text}"))
}

struct PrintTrace;

impl TraceSink for PrintTrace {
    fn on_event(&mut self, event: TraceEvent) {
        if let TraceEvent::InstructionStart { pc, word } = event {
            println!("0x{pc:08X}: {word:08X}  {}", disassemble(word));
        }
    }
}

fn run_image(args: &RunArgs) -> Result<(), i32> {
    let program = match load_image_file(&args.image) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    let mut state = match CoreState::with_program(&program) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    let config = CoreConfig {
        cycle_limit: args.cycle_limit,
        tracing_enabled: args.trace,
    };
    let outcome = run_traced(&mut state, &config, &mut PrintTrace);
    log::info!("{} finished after {} cycles", args.image.display(), outcome.cycles);

    print!("{}", format_summary(&outcome, &state));
    print!("{}", format_registers(&state));
    if let Some((start, end)) = args.dump {
        print!("{}", format_memory(&state, start, end));
    }

    match outcome.stop {
        RunStop::Halted(reason) if reason.is_clean_exit() => Ok(()),
        RunStop::Halted(_) => Err(1),
        RunStop::CycleLimit => Err(2),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run_image(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
