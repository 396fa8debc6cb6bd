//! User‑defined functions and the [`Callable`] contract shared with natives
//! and classes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::class::LoxInstance;
use crate::environment::{self, EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;

/// Anything a call expression can invoke. The interpreter checks `arity`
/// before `call`, so implementations may assume the argument count matches.
pub trait Callable {
    fn arity(&self) -> usize;

    /// `line` is the call site, for errors raised inside the callee.
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>, line: usize)
        -> Result<Value>;
}

/// A closure: a declaration plus the scope it was declared in.
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// A copy of this method whose closure additionally defines `this`.
    pub fn bind(&self, instance: Rc<RefCell<LoxInstance>>) -> LoxFunction {
        debug!("Binding method '{}'", self.name());

        let mut scope = Environment::with_enclosing(Rc::clone(&self.closure));
        scope.define("this", Value::Instance(instance));

        LoxFunction::new(
            Rc::clone(&self.declaration),
            scope.into_ref(),
            self.is_initializer,
        )
    }

    /// `this` as captured by [`LoxFunction::bind`].
    fn bound_this(&self, line: usize) -> Result<Value> {
        environment::get_named_at(&self.closure, 0, "this")
            .ok_or_else(|| LoxError::runtime(line, "Initializer called without an instance."))
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        line: usize,
    ) -> Result<Value> {
        debug!("Calling '{}' with {} argument(s)", self.name(), arguments.len());

        let mut scope = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            scope.define(&param.lexeme, argument);
        }

        let flow: Flow = interpreter.execute_block(&self.declaration.body, scope)?;

        // `init` always hands back the instance, even on a bare `return;`.
        if self.is_initializer {
            return self.bound_this(line);
        }

        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        })
    }
}

impl fmt::Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}
