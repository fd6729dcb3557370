/// Runtime entities: objects, variables and scopes.
///
/// Defines the closed set of object kinds a script can produce and the
/// records that bind names to them.
pub mod object;

/// The reference-counted heap.
///
/// Owns every object, variable and scope, hands out typed handles to them
/// and frees each entity once nothing refers to it any more.
///
/// # Responsibilities
/// - Allocates and frees entities in slot arenas with free lists.
/// - Maintains reference counts across variables, lists, properties and
///   closures.
/// - Implements two-level name lookup and property auto-vivification.
/// - Renders objects for `print`.
pub mod heap;

pub use heap::{Heap, ObjectId, ScopeId, VariableId};
pub use object::{Closure, Object, ObjectData, Scope, Variable};
