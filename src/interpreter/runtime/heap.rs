use std::fmt;

use crate::interpreter::runtime::object::{Closure, Object, ObjectData, Scope, Variable};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// Handle to an [`Object`] on the [`Heap`].
    ObjectId
);
handle!(
    /// Handle to a [`Variable`] on the [`Heap`].
    VariableId
);
handle!(
    /// Handle to a [`Scope`] on the [`Heap`].
    ScopeId
);

/// Slot storage with a free list. Removed slots are reused by later
/// insertions.
struct Arena<T> {
    slots: Vec<Option<T>>,
    free:  Vec<u32>,
    live:  usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new(),
               free:  Vec::new(),
               live:  0, }
    }
}

impl<T> Arena<T> {
    fn insert(&mut self, value: T) -> u32 {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(value);
            return index;
        }
        let index = self.slots.len() as u32;
        self.slots.push(Some(value));
        index
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.push(index as u32);
        self.live -= 1;
        Some(value)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }
}

/// Owner of all runtime entities.
///
/// Reference counts:
/// - a variable is counted once per scope or property list holding it;
/// - a scope is counted once for being on the call stack and once per
///   closure that captured it, and is destroyed as soon as the count reaches
///   zero;
/// - an object is counted once per variable bound to it and once per list
///   slot holding it.
///
/// Objects are not freed the moment their count reaches zero. They are
/// queued and freed by [`Heap::sweep`], which the evaluator calls between
/// statements. A freshly created object starts at zero and is queued too, so
/// temporaries nobody binds are reclaimed by the next sweep. Temporaries
/// that must survive a nested statement are retained for that long by the
/// evaluator.
///
/// There is no cycle detection. A closure stored in a variable of the scope
/// it captured keeps that scope alive forever.
///
/// # Panics
/// Accessors panic when handed a handle whose entity has already been
/// freed. Handles never outlive their entity unless a reference count is
/// wrong.
#[derive(Default)]
pub struct Heap {
    objects:   Arena<Object>,
    variables: Arena<Variable>,
    scopes:    Arena<Scope>,
    pending:   Vec<ObjectId>,
}

impl Heap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently allocated, including unreferenced ones
    /// awaiting the next sweep.
    #[must_use]
    pub const fn live_objects(&self) -> usize {
        self.objects.live
    }

    /// Number of variables currently allocated.
    #[must_use]
    pub const fn live_variables(&self) -> usize {
        self.variables.live
    }

    /// Number of scopes currently allocated.
    #[must_use]
    pub const fn live_scopes(&self) -> usize {
        self.scopes.live
    }

    #[track_caller]
    pub fn object(&self, id: ObjectId) -> &Object {
        match self.objects.get(id.index()) {
            Some(object) => object,
            None => panic!("stale object handle {id:?}"),
        }
    }

    #[track_caller]
    fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        match self.objects.get_mut(id.index()) {
            Some(object) => object,
            None => panic!("stale object handle {id:?}"),
        }
    }

    #[track_caller]
    pub fn variable(&self, id: VariableId) -> &Variable {
        match self.variables.get(id.index()) {
            Some(variable) => variable,
            None => panic!("stale variable handle {id:?}"),
        }
    }

    #[track_caller]
    fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        match self.variables.get_mut(id.index()) {
            Some(variable) => variable,
            None => panic!("stale variable handle {id:?}"),
        }
    }

    #[track_caller]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        match self.scopes.get(id.index()) {
            Some(scope) => scope,
            None => panic!("stale scope handle {id:?}"),
        }
    }

    #[track_caller]
    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        match self.scopes.get_mut(id.index()) {
            Some(scope) => scope,
            None => panic!("stale scope handle {id:?}"),
        }
    }

    /// The payload of an object.
    #[must_use]
    pub fn data(&self, id: ObjectId) -> &ObjectData {
        &self.object(id).data
    }

    /// Current reference count of an object.
    #[must_use]
    pub fn references(&self, id: ObjectId) -> usize {
        self.object(id).references
    }

    /// Creates an empty scope counted once, for the call stack.
    pub fn create_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.insert(Scope { variables:  Vec::new(),
                                                    references: 1, }));
        tracing::trace!(scope = id.0, "scope created");
        id
    }

    /// Counts one more holder of `scope`.
    pub fn retain_scope(&mut self, scope: ScopeId) {
        self.scope_mut(scope).references += 1;
    }

    /// Drops one reference to `scope`, destroying it at zero.
    ///
    /// Destroying a scope releases its variables; the objects they were
    /// bound to are released in turn but only freed by the next sweep.
    ///
    /// # Returns
    /// `true` if the scope was destroyed.
    pub fn release_scope(&mut self, scope: ScopeId) -> bool {
        let entry = self.scope_mut(scope);
        entry.references = entry.references.saturating_sub(1);
        if entry.references > 0 {
            return false;
        }

        let Some(destroyed) = self.scopes.remove(scope.index()) else {
            return false;
        };
        tracing::trace!(scope = scope.0,
                        variables = destroyed.variables.len(),
                        "scope destroyed");
        for variable in destroyed.variables {
            self.release_variable(variable);
        }
        true
    }

    /// Appends a new unbound variable named `name` to `scope`.
    ///
    /// No check is made for an existing variable of the same name.
    pub fn create_variable(&mut self, scope: ScopeId, name: &str) -> VariableId {
        let id = self.allocate_variable(name);
        self.scope_mut(scope).variables.push(id);
        id
    }

    /// Appends an existing variable to `scope`, so both scopes see the same
    /// binding.
    pub fn share_variable(&mut self, scope: ScopeId, variable: VariableId) {
        self.variable_mut(variable).references += 1;
        self.scope_mut(scope).variables.push(variable);
    }

    /// Finds the variable called `name` in `scope`.
    ///
    /// The most recently created variable of that name wins, so parameters
    /// shadow bindings copied in from a closure.
    #[must_use]
    pub fn find_variable(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        self.scope(scope)
            .variables
            .iter()
            .rev()
            .copied()
            .find(|&variable| self.variable(variable).name == name)
    }

    /// Points `variable` at `object`, adjusting both reference counts.
    pub fn bind(&mut self, variable: VariableId, object: Option<ObjectId>) {
        if let Some(object) = object {
            self.retain_object(object);
        }
        let previous = std::mem::replace(&mut self.variable_mut(variable).object, object);
        if let Some(previous) = previous {
            self.release_object(previous);
        }
    }

    fn allocate_variable(&mut self, name: &str) -> VariableId {
        VariableId(self.variables.insert(Variable { name:       name.to_string(),
                                                    object:     None,
                                                    references: 1, }))
    }

    /// Counts one more holder of `variable`.
    pub fn retain_variable(&mut self, variable: VariableId) {
        self.variable_mut(variable).references += 1;
    }

    /// Drops one reference to a variable, freeing it at zero and releasing
    /// its object.
    pub fn release_variable(&mut self, id: VariableId) {
        let variable = self.variable_mut(id);
        variable.references = variable.references.saturating_sub(1);
        if variable.references > 0 {
            return;
        }
        if let Some(variable) = self.variables.remove(id.index())
           && let Some(object) = variable.object
        {
            self.release_object(object);
        }
    }

    /// Allocates an object with a reference count of zero.
    ///
    /// A closure retains its captured scope and a list retains its elements
    /// for as long as the object lives.
    pub fn create_object(&mut self, data: ObjectData) -> ObjectId {
        match &data {
            ObjectData::Function(Closure { scope: Some(scope), .. }) => self.retain_scope(*scope),
            ObjectData::List(elements) => {
                for &element in elements {
                    self.retain_object(element);
                }
            },
            _ => {},
        }

        let id = ObjectId(self.objects.insert(Object { data,
                                                       properties: Vec::new(),
                                                       references: 0 }));
        self.pending.push(id);
        id
    }

    /// Counts one more holder of `object`.
    pub fn retain_object(&mut self, object: ObjectId) {
        self.object_mut(object).references += 1;
    }

    /// Drops one reference to `object`, queueing it for the next sweep at
    /// zero.
    pub fn release_object(&mut self, object: ObjectId) {
        let entry = self.object_mut(object);
        entry.references = entry.references.saturating_sub(1);
        if entry.references == 0 {
            self.pending.push(object);
        }
    }

    /// Finds the property `name` of `object`, creating an unbound one if it
    /// does not exist yet.
    pub fn get_property(&mut self, object: ObjectId, name: &str) -> VariableId {
        if let Some(found) = self.object(object)
                                 .properties
                                 .iter()
                                 .copied()
                                 .find(|&property| self.variable(property).name == name)
        {
            return found;
        }
        let id = self.allocate_variable(name);
        self.object_mut(object).properties.push(id);
        id
    }

    /// Appends a property `name` bound to `value`.
    pub fn set_property(&mut self, object: ObjectId, name: &str, value: Option<ObjectId>) {
        let id = self.allocate_variable(name);
        self.object_mut(object).properties.push(id);
        self.bind(id, value);
    }

    /// Replaces element `index` of a list with `value`.
    ///
    /// # Returns
    /// `false`, changing nothing, if `list` is not a list or `index` is out
    /// of range.
    pub fn set_element(&mut self, list: ObjectId, index: usize, value: ObjectId) -> bool {
        let in_range = matches!(self.data(list), ObjectData::List(elements) if index < elements.len());
        if !in_range {
            return false;
        }

        self.retain_object(value);
        let previous = match &mut self.object_mut(list).data {
            ObjectData::List(elements) => std::mem::replace(&mut elements[index], value),
            _ => return false,
        };
        self.release_object(previous);
        true
    }

    /// Frees every queued object whose reference count is still zero, and
    /// whatever becomes unreachable as a consequence.
    ///
    /// # Returns
    /// The number of objects freed.
    pub fn sweep(&mut self) -> usize {
        let mut freed = 0;

        while let Some(id) = self.pending.pop() {
            let unreferenced = self.objects
                                   .get(id.index())
                                   .is_some_and(|object| object.references == 0);
            if !unreferenced {
                continue;
            }
            let Some(object) = self.objects.remove(id.index()) else {
                continue;
            };
            freed += 1;

            for property in object.properties {
                self.release_variable(property);
            }
            match object.data {
                ObjectData::List(elements) => {
                    for element in elements {
                        self.release_object(element);
                    }
                },
                ObjectData::Function(Closure { scope: Some(scope), .. }) => {
                    self.release_scope(scope);
                },
                _ => {},
            }
        }

        if freed > 0 {
            tracing::trace!(freed, live = self.objects.live, "heap swept");
        }
        freed
    }

    /// Returns a [`fmt::Display`] adapter printing `object` the way `print`
    /// does. An unbound value prints nothing.
    #[must_use]
    pub const fn render(&self, object: Option<ObjectId>) -> Rendered<'_> {
        Rendered { heap: self, object }
    }

    fn write_object(&self,
                    f: &mut fmt::Formatter<'_>,
                    id: ObjectId,
                    enclosing: &mut Vec<ObjectId>)
                    -> fmt::Result {
        match self.data(id) {
            ObjectData::Base => f.write_str("<object>"),
            ObjectData::Number(n) => write!(f, "{n}"),
            ObjectData::Text(text) => f.write_str(text),
            ObjectData::Function(_) => f.write_str("<function>"),
            ObjectData::List(_) if enclosing.contains(&id) => f.write_str("[...]"),
            ObjectData::List(elements) => {
                enclosing.push(id);
                f.write_str("[")?;
                for (i, &element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write_object(f, element, enclosing)?;
                }
                enclosing.pop();
                f.write_str("]")
            },
        }
    }
}

/// Display adapter returned by [`Heap::render`].
pub struct Rendered<'heap> {
    heap:   &'heap Heap,
    object: Option<ObjectId>,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object {
            Some(id) => self.heap.write_object(f, id, &mut Vec::new()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{Block, FunctionDef};

    fn closure(heap: &mut Heap, scope: ScopeId) -> ObjectId {
        let def = FunctionDef { name:   None,
                                params: vec![],
                                body:   Block::default(),
                                line:   1, };
        heap.create_object(ObjectData::Function(Closure { def:   Rc::new(def),
                                                          scope: Some(scope), }))
    }

    #[test]
    fn unbound_temporaries_are_swept() {
        let mut heap = Heap::new();
        heap.create_object(ObjectData::Number(1));
        heap.create_object(ObjectData::Text("a".to_string()));

        assert_eq!(heap.live_objects(), 2);
        assert_eq!(heap.sweep(), 2);
        assert_eq!(heap.live_objects(), 0);
    }

    #[test]
    fn rebinding_releases_the_previous_object() {
        let mut heap = Heap::new();
        let scope = heap.create_scope();
        let x = heap.create_variable(scope, "x");
        let one = heap.create_object(ObjectData::Number(1));
        let two = heap.create_object(ObjectData::Number(2));

        heap.bind(x, Some(one));
        heap.bind(x, Some(two));
        heap.sweep();

        assert_eq!(heap.live_objects(), 1);
        assert_eq!(heap.references(two), 1);
        assert_eq!(heap.variable(x).object, Some(two));
    }

    #[test]
    fn rebinding_to_the_same_object_keeps_it() {
        let mut heap = Heap::new();
        let scope = heap.create_scope();
        let x = heap.create_variable(scope, "x");
        let one = heap.create_object(ObjectData::Number(1));

        heap.bind(x, Some(one));
        heap.bind(x, Some(one));
        heap.sweep();

        assert_eq!(heap.references(one), 1);
    }

    #[test]
    fn destroying_a_scope_releases_its_variables() {
        let mut heap = Heap::new();
        let scope = heap.create_scope();
        let x = heap.create_variable(scope, "x");
        let object = heap.create_object(ObjectData::Number(5));
        heap.bind(x, Some(object));

        assert!(heap.release_scope(scope));
        assert_eq!(heap.live_variables(), 0);
        assert_eq!(heap.sweep(), 1);
        assert_eq!(heap.live_scopes(), 0);
    }

    #[test]
    fn shared_variable_outlives_the_first_scope() {
        let mut heap = Heap::new();
        let outer = heap.create_scope();
        let inner = heap.create_scope();
        let a = heap.create_variable(outer, "a");
        let ten = heap.create_object(ObjectData::Number(10));
        heap.bind(a, Some(ten));
        heap.share_variable(inner, a);

        heap.release_scope(outer);
        heap.sweep();

        assert_eq!(heap.find_variable(inner, "a"), Some(a));
        assert_eq!(heap.data(ten), &ObjectData::Number(10));
    }

    #[test]
    fn latest_variable_of_a_name_wins() {
        let mut heap = Heap::new();
        let scope = heap.create_scope();
        let first = heap.create_variable(scope, "a");
        let second = heap.create_variable(scope, "a");

        assert_ne!(first, second);
        assert_eq!(heap.find_variable(scope, "a"), Some(second));
        assert_eq!(heap.find_variable(scope, "b"), None);
    }

    #[test]
    fn reading_a_missing_property_creates_it_once() {
        let mut heap = Heap::new();
        let object = heap.create_object(ObjectData::Base);

        let first = heap.get_property(object, "missing");
        let second = heap.get_property(object, "missing");

        assert_eq!(first, second);
        assert_eq!(heap.object(object).properties.len(), 1);
        assert_eq!(heap.variable(first).object, None);
    }

    #[test]
    fn list_elements_are_freed_with_the_list() {
        let mut heap = Heap::new();
        let one = heap.create_object(ObjectData::Number(1));
        let two = heap.create_object(ObjectData::Number(2));
        heap.create_object(ObjectData::List(vec![one, two]));

        assert_eq!(heap.references(one), 1);
        assert_eq!(heap.sweep(), 3);
        assert_eq!(heap.live_objects(), 0);
    }

    #[test]
    fn element_replacement_moves_the_reference() {
        let mut heap = Heap::new();
        let one = heap.create_object(ObjectData::Number(1));
        let list = heap.create_object(ObjectData::List(vec![one]));
        let scope = heap.create_scope();
        let xs = heap.create_variable(scope, "xs");
        heap.bind(xs, Some(list));
        let nine = heap.create_object(ObjectData::Number(9));

        assert!(heap.set_element(list, 0, nine));
        assert!(!heap.set_element(list, 1, nine));
        heap.sweep();

        assert_eq!(heap.live_objects(), 2);
        assert_eq!(heap.render(Some(list)).to_string(), "[9]");
    }

    #[test]
    fn closure_keeps_its_scope_until_freed() {
        let mut heap = Heap::new();
        let scope = heap.create_scope();
        closure(&mut heap, scope);

        assert!(!heap.release_scope(scope));
        assert_eq!(heap.live_scopes(), 1);
        heap.sweep();
        assert_eq!(heap.live_scopes(), 0);
    }

    #[test]
    fn closure_stored_in_its_own_scope_leaks() {
        let mut heap = Heap::new();
        let scope = heap.create_scope();
        let f = heap.create_variable(scope, "f");
        let function = closure(&mut heap, scope);
        heap.bind(f, Some(function));

        heap.release_scope(scope);
        heap.sweep();

        assert_eq!(heap.live_scopes(), 1);
        assert_eq!(heap.live_objects(), 1);
        assert_eq!(heap.live_variables(), 1);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut heap = Heap::new();
        let first = heap.create_object(ObjectData::Number(1));
        heap.sweep();
        let second = heap.create_object(ObjectData::Number(2));

        assert_eq!(first, second);
        assert_eq!(heap.data(second), &ObjectData::Number(2));
    }

    #[test]
    fn rendering() {
        let mut heap = Heap::new();
        let one = heap.create_object(ObjectData::Number(-1));
        let text = heap.create_object(ObjectData::Text("hi".to_string()));
        let inner = heap.create_object(ObjectData::List(vec![]));
        let list = heap.create_object(ObjectData::List(vec![one, text, inner]));
        let base = heap.create_object(ObjectData::Base);

        assert_eq!(heap.render(Some(list)).to_string(), "[-1, hi, []]");
        assert_eq!(heap.render(Some(base)).to_string(), "<object>");
        assert_eq!(heap.render(None).to_string(), "");
    }

    #[test]
    fn self_containing_list_renders_finitely() {
        let mut heap = Heap::new();
        let zero = heap.create_object(ObjectData::Number(0));
        let list = heap.create_object(ObjectData::List(vec![zero]));
        heap.set_element(list, 0, list);

        assert_eq!(heap.render(Some(list)).to_string(), "[[...]]");
    }
}
