//! Built‑in functions pre‑defined in the global scope.
//!
//! | name       | arity | behaviour                                         |
//! |------------|------:|---------------------------------------------------|
//! | `clock`    | 0     | seconds since the Unix epoch, as a number         |
//! | `exit`     | 1     | terminate the process with the given status       |
//! | `println`  | 1     | write the value and a newline to program output   |
//! | `printErr` | 1     | write the value and a newline to stderr           |

use std::fmt;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::error::{LoxError, Result};
use crate::function::Callable;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Signature of a built‑in. Errors are plain messages; the interpreter
/// attaches the call‑site line.
pub type NativeFn = fn(&mut Interpreter, &[Value]) -> std::result::Result<Value, String>;

pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        line: usize,
    ) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        (self.func)(interpreter, &arguments).map_err(|msg| LoxError::runtime(line, msg))
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

/// The fixed registry of built‑ins.
pub fn registry() -> Vec<Rc<NativeFunction>> {
    vec![
        Rc::new(NativeFunction {
            name: "clock",
            arity: 0,
            func: clock,
        }),
        Rc::new(NativeFunction {
            name: "exit",
            arity: 1,
            func: exit,
        }),
        Rc::new(NativeFunction {
            name: "println",
            arity: 1,
            func: println,
        }),
        Rc::new(NativeFunction {
            name: "printErr",
            arity: 1,
            func: print_err,
        }),
    ]
}

fn clock(_interpreter: &mut Interpreter, _args: &[Value]) -> std::result::Result<Value, String> {
    let millis: i64 = Utc::now().timestamp_millis();

    Ok(Value::Number(millis as f64 / 1000.0))
}

fn exit(_interpreter: &mut Interpreter, args: &[Value]) -> std::result::Result<Value, String> {
    match args.first() {
        Some(Value::Number(code)) if code.fract() == 0.0 => {
            info!("Script requested exit with status {}", code);
            std::process::exit(*code as i32)
        }
        Some(other) => Err(format!(
            "Exit status must be an integer, got {}.",
            other.type_name()
        )),
        None => Err("Exit status must be an integer.".to_string()),
    }
}

fn println(interpreter: &mut Interpreter, args: &[Value]) -> std::result::Result<Value, String> {
    let text: String = args.first().map(Value::to_string).unwrap_or_default();

    interpreter
        .write_line(&text)
        .map_err(|e| format!("Failed to write output: {}", e))?;

    Ok(Value::Nil)
}

fn print_err(_interpreter: &mut Interpreter, args: &[Value]) -> std::result::Result<Value, String> {
    let text: String = args.first().map(Value::to_string).unwrap_or_default();

    eprintln!("{}", text);

    Ok(Value::Nil)
}
