use beaver::types::{DEFAULT_SPACE_LIMIT, DEFAULT_TIME_LIMIT};
use beaver::{
    analyze, run_traced, KnownMachines, Limits, MachineEntry, ProgramLoader, RunResult, Symbol,
    KNOWN_MACHINES,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Decodes Busy Beaver machine codes and reports whether they halt.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
#[command(after_help = "EXAMPLES:
  beaver-cli 1RB1LB_1LA1RZ
  beaver-cli --known bb4 --known translated-cycler
  beaver-cli -m 3 1RB2LB1RZ_2LA2RB1LB --trace 50 > trace.json
  beaver-cli --file batch.txt --json")]
struct Cli {
    /// Machine codes to run
    codes: Vec<String>,

    /// Run a machine from the built-in catalog
    #[arg(short, long)]
    known: Vec<String>,

    /// File with one machine per line: `[name:] code [symbols]`
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// List the built-in catalog and exit
    #[arg(long)]
    list: bool,

    /// Alphabet size for codes that do not give one
    #[arg(short = 'm', long, default_value_t = 2)]
    symbols: usize,

    /// Initial symbol of every tape cell
    #[arg(short = 'b', long = "all-tape", default_value_t = 0)]
    all_tape: Symbol,

    /// Maximum number of tape cells a run may visit
    #[arg(short, long, default_value_t = DEFAULT_SPACE_LIMIT)]
    space: usize,

    /// Wall-clock budget per run in milliseconds, 0 disables it
    #[arg(short, long = "time-ms", default_value_t = DEFAULT_TIME_LIMIT.as_millis() as u64)]
    time_ms: u64,

    /// Step budget per run
    #[arg(long)]
    steps: Option<u64>,

    /// Print the first N post-step snapshots as JSON
    #[arg(long, value_name = "N")]
    trace: Option<usize>,

    /// Print one JSON object per machine
    #[arg(long)]
    json: bool,

    /// Print a static analysis of each machine before running it
    #[arg(long)]
    analyze: bool,
}

impl Cli {
    fn limits(&self) -> Limits {
        let time = (self.time_ms > 0).then(|| Duration::from_millis(self.time_ms));
        let mut limits = Limits::new(self.space, time);
        limits.steps = self.steps;
        limits
    }

    /// Gathers every machine to run, in command-line order: codes, catalog names, then the file.
    fn entries(&self) -> Result<Vec<MachineEntry>, beaver::TuringMachineError> {
        let mut entries: Vec<MachineEntry> = self
            .codes
            .iter()
            .map(|code| MachineEntry {
                name: None,
                code: code.clone(),
                symbols: None,
                line: 0,
            })
            .collect();

        for name in &self.known {
            entries.push(KnownMachines::get(name)?.clone());
        }

        if let Some(path) = &self.file {
            entries.extend(ProgramLoader::load_file(path)?);
        }

        Ok(entries)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for entry in KNOWN_MACHINES.iter() {
            println!("{}: {}", entry.label(), entry.code);
        }
        return ExitCode::SUCCESS;
    }

    let entries = match cli.entries() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let limits = cli.limits();
    let mut failed = false;

    for entry in &entries {
        let machine = match entry.decode(cli.symbols, cli.all_tape) {
            Ok(machine) => machine,
            Err(e) => {
                // A malformed code only skips its own entry.
                tracing::warn!(line = entry.line, "skipping {}: {e}", entry.label());
                print_error(&cli, entry, &e.to_string());
                failed = true;
                continue;
            }
        };

        if cli.analyze {
            let analysis = analyze(&machine);
            eprintln!("{machine}{analysis:?}");
        }

        let (result, snapshots) = run_traced(&machine, &limits, cli.trace.unwrap_or(0));
        print_result(&cli, entry, &result);

        if cli.trace.is_some() {
            match serde_json::to_string(&snapshots) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!("failed to serialize trace: {e}"),
            }
        }

        if matches!(result, RunResult::Error(_)) {
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_result(cli: &Cli, entry: &MachineEntry, result: &RunResult) {
    if cli.json {
        let value = serde_json::json!({
            "name": entry.label(),
            "code": entry.code,
            "status": result.status(),
            "result": result,
        });
        println!("{value}");
    } else {
        println!("{}: {}", entry.label(), result);
    }
}

fn print_error(cli: &Cli, entry: &MachineEntry, error: &str) {
    if cli.json {
        let value = serde_json::json!({
            "name": entry.label(),
            "code": entry.code,
            "status": "ERROR",
            "error": error,
        });
        println!("{value}");
    } else {
        println!("{}: ERROR {}", entry.label(), error);
    }
}
