use std::rc::Rc;

use crate::{
    ast::FunctionDef,
    interpreter::runtime::heap::{ObjectId, ScopeId, VariableId},
};

/// The payload of an object.
///
/// Operator application matches over pairs of these kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    /// A property bag with no payload of its own, as built by `{...}`.
    Base,
    /// A native signed integer.
    Number(i64),
    /// A string.
    Text(String),
    /// A function together with the scope it was defined in.
    Function(Closure),
    /// An ordered sequence of objects.
    List(Vec<ObjectId>),
}

impl ObjectData {
    /// Short kind name used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Base => "object",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Function(_) => "function",
            Self::List(_) => "list",
        }
    }
}

/// A function value.
///
/// `scope` is the scope that was current when an inline function was
/// evaluated. Calling the closure copies that scope's bindings into the call
/// scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    /// The function definition, shared with the AST.
    pub def:   Rc<FunctionDef>,
    /// The captured defining scope.
    pub scope: Option<ScopeId>,
}

/// A reference-counted runtime value.
#[derive(Debug)]
pub struct Object {
    /// What the object holds.
    pub data:       ObjectData,
    /// Named properties, searched linearly.
    pub properties: Vec<VariableId>,
    pub(super) references: usize,
}

/// A named binding. `object` is `None` while the variable is unbound.
#[derive(Debug)]
pub struct Variable {
    /// The binding name.
    pub name:   String,
    /// The bound object, if any.
    pub object: Option<ObjectId>,
    pub(super) references: usize,
}

/// A lexical environment: the variables created in one call, or the
/// globals.
#[derive(Debug)]
pub struct Scope {
    /// Variables in creation order. Names may repeat.
    pub variables: Vec<VariableId>,
    pub(super) references: usize,
}
