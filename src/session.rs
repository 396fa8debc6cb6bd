//! One interpreter session: the Scan → Parse → Resolve → Interpret pipeline,
//! the error flags the host maps to exit codes, and the REPL loop.

use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner;

/// Exit status for scan, parse and resolve errors.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for runtime errors.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Source text from raw file bytes; invalid UTF‑8 becomes [`LoxError::Utf8`].
pub fn decode_source(bytes: Vec<u8>) -> Result<String> {
    let source: String = String::from_utf8(bytes)?;

    debug!("Decoded {} bytes of source", source.len());

    Ok(source)
}

/// Receives every diagnostic the pipeline produces.
pub trait Reporter {
    fn report(&mut self, error: &LoxError);
}

/// Prints diagnostics to stderr.
#[derive(Debug, Default)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&mut self, error: &LoxError) {
        eprintln!("{}", error);
    }
}

/// Outcome of a single [`Session::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    /// Scan, parse or resolve errors; nothing was executed.
    StaticError,
    /// Execution stopped at a runtime error.
    RuntimeError,
}

pub struct Session {
    interpreter: Interpreter,
    reporter: Box<dyn Reporter>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session printing program output to stdout and diagnostics to stderr.
    pub fn new() -> Self {
        Self::with_parts(Interpreter::new(), Box::new(StderrReporter))
    }

    pub fn with_parts(interpreter: Interpreter, reporter: Box<dyn Reporter>) -> Self {
        Self {
            interpreter,
            reporter,
            had_error: false,
            had_runtime_error: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears both flags; the REPL calls this between lines.
    pub fn reset_errors(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    /// Process exit status for what has happened so far.
    pub fn exit_code(&self) -> i32 {
        if self.had_error {
            EXIT_STATIC_ERROR
        } else if self.had_runtime_error {
            EXIT_RUNTIME_ERROR
        } else {
            0
        }
    }

    fn report_all(&mut self, errors: &[LoxError]) {
        for error in errors {
            self.reporter.report(error);
        }
    }

    /// Runs `source` through every stage, stopping after the first stage
    /// that reports errors. Interpreter state persists across calls.
    pub fn run(&mut self, source: &str) -> RunStatus {
        let (tokens, scan_errors) = scanner::scan(source);

        if !scan_errors.is_empty() {
            self.had_error = true;
            self.report_all(&scan_errors);
        }

        // Parse even after scan errors, to surface syntax errors in one go.
        let statements = match Parser::new(&tokens).parse() {
            Ok(statements) => statements,
            Err(errors) => {
                self.had_error = true;
                self.report_all(&errors);
                return RunStatus::StaticError;
            }
        };

        if !scan_errors.is_empty() {
            return RunStatus::StaticError;
        }

        if let Err(errors) = Resolver::new(&mut self.interpreter).resolve(&statements) {
            self.had_error = true;
            self.report_all(&errors);
            return RunStatus::StaticError;
        }

        debug!("Pipeline reached interpretation");

        match self.interpreter.interpret(&statements) {
            Ok(()) => RunStatus::Ok,
            Err(error) => {
                self.had_runtime_error = true;
                self.reporter.report(&error);
                RunStatus::RuntimeError
            }
        }
    }

    /// Interactive loop: prompt, read a line, run it, repeat until EOF.
    pub fn run_prompt<R: BufRead, W: Write>(&mut self, input: R, mut prompt: W) -> io::Result<()> {
        info!("Starting REPL");

        write!(prompt, "> ")?;
        prompt.flush()?;

        for line in input.lines() {
            let line: String = line?;

            self.run(&line);
            self.reset_errors();

            write!(prompt, "> ")?;
            prompt.flush()?;
        }

        writeln!(prompt)?;

        info!("REPL finished");

        Ok(())
    }
}
