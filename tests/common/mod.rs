#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::session::{Reporter, RunStatus, Session};

/// A `Write` sink the test keeps a handle to after giving it away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every reported diagnostic, rendered as it would be printed.
#[derive(Clone, Default)]
pub struct CollectingReporter(Rc<RefCell<Vec<LoxError>>>);

impl CollectingReporter {
    pub fn errors(&self) -> Vec<LoxError> {
        self.0.borrow().clone()
    }

    pub fn rendered(&self) -> Vec<String> {
        self.0.borrow().iter().map(|e| e.to_string()).collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, error: &LoxError) {
        self.0.borrow_mut().push(error.clone());
    }
}

/// A session wired to in‑memory output and diagnostics.
pub struct Harness {
    pub session: Session,
    pub out: SharedBuffer,
    pub reporter: CollectingReporter,
}

impl Harness {
    pub fn new() -> Self {
        let out = SharedBuffer::default();
        let reporter = CollectingReporter::default();
        let interpreter = Interpreter::with_output(Box::new(out.clone()));
        let session = Session::with_parts(interpreter, Box::new(reporter.clone()));

        Self {
            session,
            out,
            reporter,
        }
    }

    pub fn run(&mut self, source: &str) -> RunStatus {
        self.session.run(source)
    }

    /// Printed lines so far.
    pub fn lines(&self) -> Vec<String> {
        self.out.contents().lines().map(str::to_owned).collect()
    }
}

/// Runs `source` in a fresh session; returns printed lines, rendered
/// diagnostics and the status.
pub fn run(source: &str) -> (Vec<String>, Vec<String>, RunStatus) {
    let mut harness = Harness::new();
    let status = harness.run(source);

    (harness.lines(), harness.reporter.rendered(), status)
}
