use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::scanner::{self, Scanner};
use rox::session::{decode_source, Session, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs a program file, or starts a REPL when no file is given
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file into a String.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    decode_source(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<i32> {
    let source = read_file(filename)?;

    if json {
        let (tokens, errors) = scanner::scan(&source);

        for e in &errors {
            eprintln!("{}", e);
        }

        println!(
            "{}",
            serde_json::to_string_pretty(&tokens).context("Failed to serialise tokens")?
        );

        return Ok(if errors.is_empty() { 0 } else { EXIT_STATIC_ERROR });
    }

    let mut tokenized = true;

    for item in Scanner::new(&source) {
        match item {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    Ok(if tokenized { 0 } else { EXIT_STATIC_ERROR })
}

fn parse(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let (tokens, scan_errors) = scanner::scan(&source);

    for e in &scan_errors {
        eprintln!("{}", e);
    }

    match Parser::new(&tokens).parse_expression() {
        Ok(expr) if scan_errors.is_empty() => {
            println!("{}", AstPrinter::print(&expr));
            Ok(0)
        }
        Ok(_) => Ok(EXIT_STATIC_ERROR),
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", e);
            }
            Ok(EXIT_STATIC_ERROR)
        }
    }
}

fn evaluate(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let (tokens, scan_errors) = scanner::scan(&source);

    for e in &scan_errors {
        eprintln!("{}", e);
    }

    let expr = match Parser::new(&tokens).parse_expression() {
        Ok(expr) if scan_errors.is_empty() => expr,
        Ok(_) => return Ok(EXIT_STATIC_ERROR),
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", e);
            }
            return Ok(EXIT_STATIC_ERROR);
        }
    };

    let mut interpreter = Interpreter::new();

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            println!("{}", value);
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(EXIT_RUNTIME_ERROR)
        }
    }
}

fn run(filename: Option<&PathBuf>) -> Result<i32> {
    let mut session = Session::new();

    match filename {
        Some(filename) => {
            let source = read_file(filename)?;
            session.run(&source);
            Ok(session.exit_code())
        }
        None => {
            let stdin = io::stdin();
            session
                .run_prompt(stdin.lock(), io::stdout())
                .context("REPL I/O failed")?;
            Ok(0)
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json)?,
        Commands::Parse { filename } => parse(filename)?,
        Commands::Evaluate { filename } => evaluate(filename)?,
        Commands::Run { filename } => run(filename.as_ref())?,
    };

    if code != 0 {
        debug!("Exiting with code {}", code);
        std::process::exit(code);
    }

    Ok(())
}
