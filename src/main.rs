use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use monkey_interp as monkey;

use monkey::environment::Environment;
use monkey::error::{MonkeyError, EXIT_PARSE_ERROR};
use monkey::lexer::Lexer;
use monkey::parser::parse;
use monkey::repl;
use monkey::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Monkey language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints the rendered program
    Parse {
        filename: PathBuf,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses and evaluates a file, printing the result
    Run { filename: PathBuf },

    /// Starts the interactive prompt (default)
    Repl,
}

/// Reads the contents of a file as UTF‑8 text
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let text = String::from_utf8(buf)
        .map_err(MonkeyError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(text)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'monkey_interp::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("monkey_interp::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "{} [{}:{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Prints parse errors and exits with the data‑error status.
fn report_parse_errors(errors: &[String]) -> ! {
    for msg in errors {
        eprintln!("{}", msg);
    }

    debug!(
        "Parse failed with {} error(s), exiting with code {}",
        errors.len(),
        EXIT_PARSE_ERROR
    );

    std::process::exit(EXIT_PARSE_ERROR);
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");
            let source = read_file(filename)?;
            let tokens: Vec<Token> = Lexer::new(&source).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }

            info!("Tokenized {} token(s)", tokens.len());
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");
            let source = read_file(filename)?;
            let (program, errors) = parse(&source);

            if !errors.is_empty() {
                report_parse_errors(&errors);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&program)?);
            } else {
                println!("{}", program);
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");
            let source = read_file(filename)?;
            let env = Environment::new_shared();
            let outcome = repl::run_source(&source, &env);
            let code = repl::exit_code(&outcome);

            match outcome {
                Ok(value) if code == 0 => println!("{}", value),
                Ok(value) => eprintln!("{}", value),
                Err(MonkeyError::Parse { errors }) => report_parse_errors(&errors),
                Err(e) => return Err(e.into()),
            }

            if code != 0 {
                debug!("Runtime error, exiting with code {}", code);
                std::process::exit(code);
            }

            info!("Program executed successfully");
        }

        Commands::Repl => {
            info!("Running Repl subcommand");
            println!("Monkey interpreter; type expressions, Ctrl-D to exit.");

            let stdin = io::stdin();
            repl::start(stdin.lock(), io::stdout())?;
        }
    }

    Ok(())
}
