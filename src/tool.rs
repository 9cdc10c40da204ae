// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! CLI tool for exercising linear hash indexes

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use linhash::{Config, LinHashMap};
use rand::{Rng, SeedableRng};
use rustyline::DefaultEditor;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};

    () => {{
        eprintln!("Program terminated unexpectedly");
        std::process::exit(1);
    }};
}

/// Upper bound of `bench --keys`
const MAX_BENCH_KEYS: u64 = 1 << 32;

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub fn init_tracing(quiet: bool, verbose: u8) -> (bool, LevelFilter) {
    let is_verbose = !quiet && verbose > 0;

    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Bridge log crate macros to tracing (the library logs through log::*)
    if tracing_log::LogTracer::init().is_err() {
        die!("INTERNAL ERROR: setting log tracer failed");
    }

    let registry = Registry::default();

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("LINHASH_LOG")
        .from_env_lossy();

    let env_filter = match "rustyline=warn".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let subscriber = registry.with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));

    (is_verbose, level_filter)
}

/// CLI tool for exercising linear hash indexes
#[derive(Parser, Debug)]
#[command(name = "linhash")]
#[command(about = "CLI tool for exercising linear hash indexes")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Number of slots per bucket
    #[arg(short, long, default_value_t = linhash::config::DEFAULT_BUCKET_CAPACITY)]
    slots: usize,

    /// Load factor that triggers a split
    #[arg(short, long, default_value_t = linhash::config::DEFAULT_LOAD_FACTOR)]
    load_factor: f64,

    /// Initial number of home buckets
    #[arg(short, long, default_value_t = linhash::config::DEFAULT_INITIAL_MODULUS)]
    initial_modulus: usize,

    /// Command to run (if omitted, starts interactive shell)
    #[command(subcommand)]
    command: Option<ToolCommand>,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// Get the value for a key
    Get {
        /// The key to look up
        key: String,
    },
    /// Set a key-value pair
    #[command(visible_alias = "put")]
    Set {
        /// The key to set
        key: String,
        /// The value to store
        value: String,
    },
    /// Delete a key (not supported by linear hash indexes)
    Del {
        /// The key to delete
        key: String,
    },
    /// List all entries
    #[command(visible_alias = "list", visible_alias = "ls")]
    Scan,
    /// Count the number of entries
    Count,
    /// Show index statistics
    Info,
    /// Print every bucket chain
    Dump,
    /// Check the structural invariants
    Verify,
    /// Insert and look up integer keys, reporting buckets accessed per lookup
    Bench {
        /// Number of keys to insert (at most 2^32)
        #[arg(
            short = 'n',
            long,
            default_value_t = 100,
            value_parser = clap::value_parser!(u64).range(0..=MAX_BENCH_KEYS)
        )]
        keys: u64,
        /// Insert random keys from [0, 2n) instead of 1..=n
        #[arg(short, long)]
        random: bool,
        /// Seed for random keys
        #[arg(long)]
        seed: Option<u64>,
        /// Print the index and every looked up key
        #[arg(short, long)]
        dump: bool,
    },
}

// Internal shell commands, include all external tool commands
#[derive(Parser, Debug)]
#[command(name = "")]
#[command(no_binary_name = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "
{version}

Available Commands:

{subcommands}

Use `help COMMAND` or `COMMAND --help` for more details.

")]
struct ShellArgs {
    #[command(subcommand)]
    command: ShellCommand,
}

// Shell commands (including ones not available from CLI)
#[derive(Subcommand, Debug, Clone)]
enum ShellCommand {
    #[command(flatten)]
    ToolCmd(ToolCommand),

    /// Exit the current shell
    #[command(visible_alias = "quit")]
    Exit,
}

struct Session {
    map: LinHashMap<String, String>,
    config: Config,
}

impl Session {
    fn open(config: Config) -> linhash::Result<Self> {
        Ok(Self {
            map: config.clone().build()?,
            config,
        })
    }
}

fn print_info(session: &Session) {
    let map = &session.map;
    let growth = map.growth();

    let overflow_buckets = (0..map.directory_len())
        .filter_map(|idx| map.chain_len(idx))
        .map(|len| len - 1)
        .sum::<usize>();

    println!("Population: {}", map.population());
    println!("Capacity: {}", map.capacity());
    println!("Load factor: {:.3} (threshold {})", map.load_factor(), growth.threshold());
    println!("Bucket capacity: {}", map.bucket_capacity());
    println!("Directory length: {}", map.directory_len());
    println!("Overflow buckets: {overflow_buckets}");
    println!("Low modulus: {}", growth.low_modulus());
    println!("High modulus: {}", growth.high_modulus());
    println!("Split pointer: {}", growth.split_pointer());
    println!("Splits: {}", map.metrics().splits());
    println!(
        "Average buckets accessed: {:.4}",
        map.metrics().average_buckets_accessed()
    );
}

fn handle_get(session: &Session, key: &str) {
    match session.map.get(key) {
        Some(value) => println!("{value}"),
        None => println!("(not found)"),
    }
}

fn handle_set(session: &mut Session, key: &str, value: &str) {
    match session.map.put(key.to_string(), value.to_string()) {
        Ok(Some(_)) => println!("OK (overwritten)"),
        Ok(None) => println!("OK (set)"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn handle_del(session: &mut Session, key: &str) {
    match session.map.remove(key) {
        Ok(_) => println!("OK"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn handle_scan(session: &Session) {
    let mut count = 0;
    for (key, value) in &session.map {
        println!("{key} = {value}");
        count += 1;
    }
    println!("({count} items)");
}

fn handle_count(session: &Session) {
    println!("{}", session.map.population());
}

fn handle_dump(session: &Session) {
    println!("Hash Table (Linear Hashing)");
    println!("-------------------------------------------");
    print!("{}", session.map.dump());
    println!("-------------------------------------------");
}

fn handle_verify(session: &Session) {
    match session.map.verify() {
        Ok(()) => println!("OK (verified)"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn handle_bench(config: &Config, keys: u64, random: bool, seed: Option<u64>, dump: bool) {
    let mut map: LinHashMap<u64, u64> = match config.clone().build() {
        Ok(map) => map,
        Err(e) => die!("Error creating index: {}", e),
    };

    if random {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        info!("Inserting {keys} random keys, seed {seed}");

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        for i in 1..=keys {
            let key = rng.random_range(0..keys.saturating_mul(2).max(1));
            if let Err(e) = map.put(key, i.wrapping_mul(i)) {
                die!("Error inserting key {}: {}", key, e);
            }
        }
        println!("Seed: {seed}");
    } else {
        info!("Inserting keys 1..={keys}");

        for i in 1..=keys {
            if let Err(e) = map.put(i, i.wrapping_mul(i)) {
                die!("Error inserting key {}: {}", i, e);
            }
        }
    }

    if dump {
        println!("Hash Table (Linear Hashing)");
        println!("-------------------------------------------");
        print!("{}", map.dump());
        println!("-------------------------------------------");
    }

    let mut found = 0;
    for key in 0..=keys {
        let value = map.get(&key);
        if value.is_some() {
            found += 1;
        }
        if dump {
            match value {
                Some(value) => println!("key = {key} value = {value}"),
                None => println!("key = {key} value = (not found)"),
            }
        }
    }

    println!("Population: {}", map.population());
    println!("Capacity: {}", map.capacity());
    println!("Directory length: {}", map.directory_len());
    println!("Splits: {}", map.metrics().splits());
    println!("Found: {found} of {} lookups", keys.saturating_add(1));
    println!(
        "Average number of buckets accessed = {:.4}",
        map.metrics().average_buckets_accessed()
    );

    if let Err(e) = map.verify() {
        die!("Error: {}", e);
    }
}

/// Result of executing a command
enum CommandResult {
    Continue,
    Exit,
}

/// Execute a parsed command
fn execute_command(session: &mut Session, cmd: ToolCommand) -> CommandResult {
    match cmd {
        ToolCommand::Get { key } => handle_get(session, &key),
        ToolCommand::Set { key, value } => handle_set(session, &key, &value),
        ToolCommand::Del { key } => handle_del(session, &key),
        ToolCommand::Scan => handle_scan(session),
        ToolCommand::Count => handle_count(session),
        ToolCommand::Info => print_info(session),
        ToolCommand::Dump => handle_dump(session),
        ToolCommand::Verify => handle_verify(session),
        ToolCommand::Bench {
            keys,
            random,
            seed,
            dump,
        } => handle_bench(&session.config, keys, random, seed, dump),
    }
    CommandResult::Continue
}

/// Execute a shell-only command
fn execute_shell_command(session: &mut Session, cmd: ShellCommand) -> CommandResult {
    match cmd {
        ShellCommand::ToolCmd(tool_cmd) => execute_command(session, tool_cmd),
        ShellCommand::Exit => CommandResult::Exit,
    }
}

/// Parse and run a shell command line
fn run_shell_command(session: &mut Session, line: &str) -> CommandResult {
    let line = line.trim();
    if line.is_empty() {
        return CommandResult::Continue;
    }

    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return CommandResult::Continue,
        None => {
            eprintln!("error: unclosed quote");
            return CommandResult::Continue;
        }
    };

    match ShellArgs::try_parse_from(&tokens) {
        Ok(args) => execute_shell_command(session, args.command),
        Err(e) => {
            // Print clap's error message
            eprintln!("{e}");
            CommandResult::Continue
        }
    }
}

fn run_shell(session: &mut Session) {
    if io::stdin().is_terminal() {
        run_shell_interactive(session);
    } else {
        run_shell_non_interactive(session);
    }
}

fn run_shell_interactive(session: &mut Session) {
    println!("Welcome to the linear hashing shell");
    println!("The index lives in memory and is discarded on exit.");
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing line editor: {e}");
            return;
        }
    };

    loop {
        match rl.readline("linhash> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ignore Ctrl+C, just show a new prompt
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        }
    }
}

fn run_shell_non_interactive(session: &mut Session) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if stdout.flush().is_err() {
            die!("can't flush stdout");
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF
                break;
            }
            Ok(_) => {
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(e) => {
                die!("Error reading input: {}", e);
            }
        }
    }
}

fn main() {
    let args = ToolArgs::parse();
    let (verbose, level_filter) = init_tracing(args.quiet, args.verbose);

    let cmd = ToolArgs::command();

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        cmd.get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::new()
        .initial_modulus(args.initial_modulus)
        .bucket_capacity(args.slots)
        .load_factor(args.load_factor);

    let mut session = match Session::open(config) {
        Ok(s) => s,
        Err(e) => {
            let note = if verbose {
                ""
            } else {
                ". Note: Use -v (one or multiple times) for more information"
            };
            die!("Error creating index: {}{}", e, note);
        }
    };

    match args.command {
        Some(cmd) => {
            execute_command(&mut session, cmd);
        }
        None => run_shell(&mut session),
    }
}
