use std::{
    collections::HashMap,
    io::{self, BufRead, BufReader, BufWriter, Write},
    rc::Rc,
};

use crate::{
    ast::{FunctionDef, Program},
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::function::core::BUILTIN_FUNCTIONS,
        parser::core::parse_program,
        runtime::{Heap, ObjectData, ObjectId, ScopeId, VariableId},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// What a statement hands back to the block running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Nothing was produced; the block goes on with its next statement.
    Continue,
    /// A result was produced; the block stops and passes it up. The result
    /// itself may be unbound, as for `return` of an unbound variable.
    Yield(Option<ObjectId>),
}

/// Where an evaluated operand lives.
///
/// Assignment needs to know what to rebind, so operands are not reduced to
/// objects until an operator consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A variable or property binding.
    Variable(VariableId),
    /// An element of a list.
    Element {
        /// The list object.
        list:  ObjectId,
        /// Position within the list, already bounds-checked.
        index: usize,
    },
    /// A computed value with no binding behind it.
    Temporary(Option<ObjectId>),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the heap, the stack of active
/// scopes, the global scope, every named function seen so far and the
/// streams used by `print` and `input`.
///
/// ## Usage
///
/// A `Context` is created once and may run any number of sources; later
/// sources see the variables and functions earlier ones defined. Nested
/// `eval` calls run against the same context.
///
/// ## Example
/// ```
/// use quill::interpreter::evaluator::core::Context;
///
/// let mut output = Vec::new();
/// let mut ctx = Context::with_io(&b""[..], &mut output);
/// ctx.run_source("x = 40").unwrap();
/// ctx.run_source("print x + 2").unwrap();
/// drop(ctx);
///
/// assert_eq!(output, b"42");
/// ```
pub struct Context<'io> {
    pub(crate) heap:        Heap,
    pub(crate) scope_stack: Vec<ScopeId>,
    pub(crate) global:      ScopeId,
    /// Named functions by name. A later definition replaces an earlier one.
    pub functions:          HashMap<String, Rc<FunctionDef>>,
    pub(crate) input:       Box<dyn BufRead + 'io>,
    pub(crate) output:      Box<dyn Write + 'io>,
}

impl Context<'static> {
    /// Creates a context reading from stdin and writing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(BufReader::new(io::stdin()), BufWriter::new(io::stdout()))
    }
}

impl Default for Context<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'io> Context<'io> {
    /// Creates a context with the given input and output streams.
    ///
    /// # Parameters
    /// - `input`: Read by the `input` built-in, one line per call.
    /// - `output`: Written by `print`.
    pub fn with_io(input: impl BufRead + 'io, output: impl Write + 'io) -> Self {
        let mut heap = Heap::new();
        let global = heap.create_scope();

        Self { heap,
               scope_stack: vec![global],
               global,
               functions: HashMap::new(),
               input: Box::new(input),
               output: Box::new(output) }
    }

    /// Parses and runs a complete script.
    ///
    /// # Errors
    /// The first parse or runtime error. Output written before the error
    /// has been flushed.
    pub fn run_source(&mut self, source: &str) -> Result<(), Error> {
        let program = parse_program(source)?;
        self.run_program(&program)?;
        Ok(())
    }

    /// Runs a parsed program.
    ///
    /// Function definitions are registered first, so statements may call
    /// functions defined further down. Statements then run in order in the
    /// current scope; their results are discarded.
    ///
    /// # Errors
    /// The first runtime error.
    pub fn run_program(&mut self, program: &Program) -> EvalResult<()> {
        let result = self.execute(program);
        self.output.flush()?;
        result
    }

    pub(crate) fn execute(&mut self, program: &Program) -> EvalResult<()> {
        for def in &program.functions {
            let Some(name) = &def.name else {
                continue;
            };
            if BUILTIN_FUNCTIONS.contains(&name.as_str()) {
                tracing::warn!(function = name.as_str(),
                               line = def.line,
                               "function is shadowed by the built-in of the same name");
            }
            self.functions.insert(name.clone(), Rc::clone(def));
        }
        for statement in &program.statements {
            self.eval_statement(statement)?;
            self.heap.sweep();
        }
        Ok(())
    }

    /// Number of live objects, for observing the reference-counting model.
    #[must_use]
    pub const fn live_objects(&self) -> usize {
        self.heap.live_objects()
    }

    /// Number of live scopes, including the global scope.
    #[must_use]
    pub const fn live_scopes(&self) -> usize {
        self.heap.live_scopes()
    }

    /// Number of live variables, including object properties.
    #[must_use]
    pub const fn live_variables(&self) -> usize {
        self.heap.live_variables()
    }

    /// The scope on top of the call stack.
    pub(crate) fn current_scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(self.global)
    }

    /// Two-level lookup: the current scope, then the global scope.
    pub(crate) fn lookup(&self, name: &str) -> Option<VariableId> {
        let current = self.current_scope();
        if let Some(variable) = self.heap.find_variable(current, name) {
            return Some(variable);
        }
        if current == self.global {
            return None;
        }
        self.heap.find_variable(self.global, name)
    }

    /// Like [`Context::lookup`], but a missing name is created as an unbound
    /// variable in the current scope.
    pub(crate) fn lookup_or_create(&mut self, name: &str) -> VariableId {
        match self.lookup(name) {
            Some(variable) => variable,
            None => {
                let scope = self.current_scope();
                self.heap.create_variable(scope, name)
            },
        }
    }

    /// The object a slot currently refers to.
    pub(crate) fn load(&self, slot: Slot) -> Option<ObjectId> {
        match slot {
            Slot::Variable(variable) => self.heap.variable(variable).object,
            Slot::Element { list, index } => match self.heap.data(list) {
                ObjectData::List(elements) => elements.get(index).copied(),
                _ => None,
            },
            Slot::Temporary(object) => object,
        }
    }

    /// Holds an extra reference on whatever backs `slot`, so a sweep run by
    /// a nested call cannot free it.
    pub(crate) fn pin(&mut self, slot: Slot) {
        match slot {
            Slot::Variable(variable) => self.heap.retain_variable(variable),
            Slot::Element { list, .. } | Slot::Temporary(Some(list)) => {
                self.heap.retain_object(list);
            },
            Slot::Temporary(None) => {},
        }
    }

    /// Drops the reference taken by [`Context::pin`].
    pub(crate) fn unpin(&mut self, slot: Slot) {
        match slot {
            Slot::Variable(variable) => self.heap.release_variable(variable),
            Slot::Element { list, .. } | Slot::Temporary(Some(list)) => {
                self.heap.release_object(list);
            },
            Slot::Temporary(None) => {},
        }
    }
}
