use std::rc::Rc;

use crate::{
    ast::{Expression, FunctionCall, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            function::{eval, getenv, input, len, print},
        },
        runtime::{ObjectData, ObjectId, ScopeId, VariableId},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the context, its evaluated arguments and the line
/// number of the call. It returns the resulting object, or `None` for an
/// unbound result.
type BuiltinFn = fn(&mut Context<'_>, &[Option<ObjectId>], usize) -> EvalResult<Option<ObjectId>>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the exact number of arguments,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: usize,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"  => { arity: 1, func: print::print },
    "input"  => { arity: 0, func: input::input },
    "getenv" => { arity: 1, func: getenv::getenv },
    "len"    => { arity: 1, func: len::len },
    "eval"   => { arity: 1, func: eval::eval },
}

impl Context<'_> {
    /// Evaluates a call by name.
    ///
    /// The name is resolved, in order, against:
    /// 1. the built-ins,
    /// 2. the named functions,
    /// 3. a variable bound to a closure.
    ///
    /// # Parameters
    /// - `call`: The call site.
    ///
    /// # Returns
    /// The callee's result, `None` if it produced nothing.
    ///
    /// # Errors
    /// - `UnknownFunction` if no built-in, function or variable has the
    ///   name.
    /// - `NotCallable` if the variable is not bound to a function.
    /// - `ArgumentCountMismatch` on an arity mismatch.
    pub(crate) fn eval_call(&mut self, call: &FunctionCall) -> EvalResult<Option<ObjectId>> {
        let line = call.line;

        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == call.name) {
            if call.arguments.len() != builtin.arity {
                return Err(RuntimeError::ArgumentCountMismatch { name: call.name.clone(),
                                                                 expected: builtin.arity,
                                                                 found: call.arguments.len(),
                                                                 line });
            }
            let arguments = self.eval_arguments(&call.arguments)?;
            let result = (builtin.func)(self, &arguments, line);
            self.release_arguments(&arguments);
            return result;
        }

        if let Some(def) = self.functions.get(&call.name).cloned() {
            return self.call_function(&def, None, None, &call.arguments, line);
        }

        let Some(variable) = self.lookup(&call.name) else {
            return Err(RuntimeError::UnknownFunction { name: call.name.clone(),
                                                       line });
        };
        let callee = self.heap.variable(variable).object;
        self.invoke(callee, &call.name, None, &call.arguments, line)
    }

    /// Calls a function object.
    ///
    /// The callee is retained for the duration of the call, so rebinding the
    /// variable that held it cannot free it mid-call.
    ///
    /// # Parameters
    /// - `callee`: The object being called.
    /// - `name`: Name used in diagnostics.
    /// - `this`: The receiver, for method calls.
    /// - `arguments`: Argument expressions, evaluated in the caller's scope.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// `NotCallable` if `callee` is unbound or not a function.
    pub(crate) fn invoke(&mut self,
                         callee: Option<ObjectId>,
                         name: &str,
                         this: Option<ObjectId>,
                         arguments: &[Expression],
                         line: usize)
                         -> EvalResult<Option<ObjectId>> {
        let Some((callee, closure)) = callee.and_then(|object| match self.heap.data(object) {
                                                ObjectData::Function(closure) => {
                                                    Some((object, closure.clone()))
                                                },
                                                _ => None,
                                            })
        else {
            return Err(RuntimeError::NotCallable { name: name.to_string(),
                                                   line });
        };

        self.heap.retain_object(callee);
        let result = self.call_function(&closure.def, closure.scope, this, arguments, line);
        self.heap.release_object(callee);
        result
    }

    /// Executes a user-defined function in a fresh scope.
    ///
    /// Arguments are evaluated in the caller's scope before the new scope is
    /// pushed. The new scope then receives, in this order, the bindings of
    /// the captured scope (except `this`), a `this` variable for method
    /// calls, and one variable per parameter. After the body has run the
    /// scope is released; it survives only if a closure created during the
    /// call captured it.
    ///
    /// # Returns
    /// The first result the body yields, or `None`.
    ///
    /// # Errors
    /// `ArgumentCountMismatch` if the number of arguments differs from the
    /// number of parameters, and anything the body raises.
    fn call_function(&mut self,
                     def: &Rc<FunctionDef>,
                     captured: Option<ScopeId>,
                     this: Option<ObjectId>,
                     arguments: &[Expression],
                     line: usize)
                     -> EvalResult<Option<ObjectId>> {
        if arguments.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.display_name()
                                                                      .to_string(),
                                                             expected: def.params.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        let values = self.eval_arguments(arguments)?;
        tracing::debug!(function = def.display_name(),
                        arguments = values.len(),
                        closure = captured.is_some(),
                        method = this.is_some(),
                        "calling function");

        let scope = self.heap.create_scope();
        if let Some(captured) = captured {
            let inherited: Vec<VariableId> = self.heap
                                                 .scope(captured)
                                                 .variables
                                                 .iter()
                                                 .copied()
                                                 .filter(|&v| self.heap.variable(v).name != "this")
                                                 .collect();
            for variable in inherited {
                self.heap.share_variable(scope, variable);
            }
        }
        if let Some(receiver) = this {
            let variable = self.heap.create_variable(scope, "this");
            self.heap.bind(variable, Some(receiver));
        }
        for (param, value) in def.params.iter().zip(&values) {
            let variable = self.heap.create_variable(scope, param);
            self.heap.bind(variable, *value);
        }
        self.release_arguments(&values);

        self.scope_stack.push(scope);
        let flow = self.eval_block(&def.body);
        self.scope_stack.pop();
        self.heap.release_scope(scope);

        match flow? {
            Flow::Yield(result) => Ok(result),
            Flow::Continue => Ok(None),
        }
    }

    /// Evaluates call arguments left to right in the current scope.
    ///
    /// Each resulting object is retained until [`Context::release_arguments`]
    /// so that evaluating a later argument cannot free an earlier one.
    fn eval_arguments(&mut self, arguments: &[Expression]) -> EvalResult<Vec<Option<ObjectId>>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let slot = match self.eval_expression(argument) {
                Ok(slot) => slot,
                Err(error) => {
                    self.release_arguments(&values);
                    return Err(error);
                },
            };
            let value = self.load(slot);
            if let Some(object) = value {
                self.heap.retain_object(object);
            }
            values.push(value);
        }
        Ok(values)
    }

    fn release_arguments(&mut self, values: &[Option<ObjectId>]) {
        for &object in values.iter().flatten() {
            self.heap.release_object(object);
        }
    }
}
