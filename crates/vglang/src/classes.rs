//! Class definitions, single inheritance, and instances
//!
//! Class definitions live in an arena owned by the interpreter and are
//! immutable after declaration except for linking the superclass pointer.
//! Superclass links are index-based ([`ClassId`]); instances hold their
//! class id plus shared mutable field storage.
//!
//! Member resolution is table lookup over the inheritance chain: own
//! declarations win over inherited ones, constructors are selected by
//! parameter count only, and static methods live in their own table.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::Span;
use crate::error::{Result, RuntimeError};
use crate::value::Value;

/// Index of a class definition in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

/// Per-field metadata and default value.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Default value, evaluated once at class-declaration time
    pub default: Value,
    /// `private` modifier
    pub private: bool,
    /// `static` modifier
    pub is_static: bool,
    /// `const` modifier
    pub is_const: bool,
}

/// A constructor, selected by arity at `new` time.
#[derive(Debug, Clone)]
pub struct Constructor {
    /// Parameter names
    pub params: Vec<String>,
    /// Constructor body
    pub body: Rc<Vec<crate::ast::Stmt>>,
    /// `private` modifier
    pub private: bool,
    /// Declaration site
    pub span: Span,
}

/// A method or static method.
#[derive(Debug, Clone)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Parameter names
    pub params: Vec<String>,
    /// Method body
    pub body: Rc<Vec<crate::ast::Stmt>>,
    /// `private` modifier
    pub private: bool,
    /// `static` modifier
    pub is_static: bool,
    /// `const` modifier
    pub is_const: bool,
    /// Declaration site
    pub span: Span,
}

/// A class definition.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    superclass_name: Option<String>,
    superclass: Option<ClassId>,
    fields: IndexMap<String, FieldSpec>,
    constructors: Vec<Rc<Constructor>>,
    methods: IndexMap<String, Rc<Method>>,
    static_methods: IndexMap<String, Rc<Method>>,
}

impl ClassDef {
    /// Create an empty definition, optionally naming a superclass.
    pub fn new(name: impl Into<String>, superclass_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            superclass_name,
            superclass: None,
            fields: IndexMap::new(),
            constructors: Vec::new(),
            methods: IndexMap::new(),
            static_methods: IndexMap::new(),
        }
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared superclass name, if any.
    pub fn superclass_name(&self) -> Option<&str> {
        self.superclass_name.as_deref()
    }

    /// The linked superclass, if resolved.
    pub fn superclass(&self) -> Option<ClassId> {
        self.superclass
    }

    /// Add a field with its default value and modifiers.
    pub fn add_field(&mut self, name: impl Into<String>, spec: FieldSpec) {
        self.fields.insert(name.into(), spec);
    }

    /// Add a constructor.
    pub fn add_constructor(&mut self, ctor: Constructor) {
        self.constructors.push(Rc::new(ctor));
    }

    /// Add a method; static methods are routed to their own table.
    pub fn add_method(&mut self, method: Method) {
        let slot = Rc::new(method);
        if slot.is_static {
            self.static_methods.insert(slot.name.clone(), slot);
        } else {
            self.methods.insert(slot.name.clone(), slot);
        }
    }
}

/// The arena of registered class definitions.
#[derive(Debug, Clone, Default)]
pub struct ClassArena {
    defs: Vec<ClassDef>,
}

impl ClassArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition with an already-resolved superclass link.
    pub fn register(&mut self, mut def: ClassDef, superclass: Option<ClassId>) -> ClassId {
        def.superclass = superclass;
        let id = ClassId(self.defs.len());
        self.defs.push(def);
        id
    }

    /// Register a definition leaving the superclass unresolved; use
    /// [`ClassArena::resolve_superclasses`] after the batch.
    pub fn register_unlinked(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.defs.len());
        self.defs.push(def);
        id
    }

    /// Link every pending superclass reference by name.
    ///
    /// # Errors
    ///
    /// `UndefinedName` when a named superclass was never registered.
    pub fn resolve_superclasses(&mut self) -> Result<()> {
        for i in 0..self.defs.len() {
            if self.defs[i].superclass.is_some() {
                continue;
            }
            let Some(super_name) = self.defs[i].superclass_name.clone() else {
                continue;
            };
            let super_id =
                self.lookup(&super_name)
                    .ok_or_else(|| RuntimeError::UndefinedName {
                        kind: "class",
                        name: super_name.clone(),
                        span: None,
                    })?;
            self.defs[i].superclass = Some(super_id);
        }
        Ok(())
    }

    /// Look up a class by name (last registration wins).
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.defs
            .iter()
            .rposition(|d| d.name == name)
            .map(ClassId)
    }

    /// The definition behind an id.
    pub fn get(&self, id: ClassId) -> &ClassDef {
        &self.defs[id.0]
    }

    /// Class name behind an id.
    pub fn name(&self, id: ClassId) -> &str {
        &self.defs[id.0].name
    }

    // ═══════════════════════════════════════════════════════════════════
    // Resolution over the inheritance chain
    // ═══════════════════════════════════════════════════════════════════

    /// Effective field defaults: superclass defaults overridden by own.
    pub fn effective_defaults(&self, id: ClassId) -> IndexMap<String, Value> {
        let mut merged = match self.get(id).superclass {
            Some(parent) => self.effective_defaults(parent),
            None => IndexMap::new(),
        };
        for (name, spec) in &self.get(id).fields {
            merged.insert(name.clone(), spec.default.clone());
        }
        merged
    }

    /// The nearest declaration of a field, own class first.
    pub fn field_spec(&self, id: ClassId, field: &str) -> Option<&FieldSpec> {
        let def = self.get(id);
        match def.fields.get(field) {
            Some(spec) => Some(spec),
            None => def.superclass.and_then(|p| self.field_spec(p, field)),
        }
    }

    /// Whether the chain declares a field.
    pub fn has_field(&self, id: ClassId, field: &str) -> bool {
        self.field_spec(id, field).is_some()
    }

    /// Resolve an instance method, own table first, then the superclass.
    pub fn method(&self, id: ClassId, name: &str) -> Option<Rc<Method>> {
        let def = self.get(id);
        match def.methods.get(name) {
            Some(m) => Some(m.clone()),
            None => def.superclass.and_then(|p| self.method(p, name)),
        }
    }

    /// Resolve a static method through the chain.
    pub fn static_method(&self, id: ClassId, name: &str) -> Option<Rc<Method>> {
        let def = self.get(id);
        match def.static_methods.get(name) {
            Some(m) => Some(m.clone()),
            None => def.superclass.and_then(|p| self.static_method(p, name)),
        }
    }

    /// First constructor whose parameter count equals `arity`.
    pub fn find_constructor(&self, id: ClassId, arity: usize) -> Option<Rc<Constructor>> {
        self.get(id)
            .constructors
            .iter()
            .find(|c| c.params.len() == arity)
            .cloned()
    }

    /// Whether the chain (inclusive) contains a class named `name`.
    pub fn instance_of(&self, id: ClassId, name: &str) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.name(c) == name {
                return true;
            }
            current = self.get(c).superclass;
        }
        false
    }

    /// Build an instance with field storage populated from the effective
    /// defaults. The instance is not yet marked initialized; that happens
    /// after its constructor body ran.
    pub fn create_instance(&self, id: ClassId) -> Rc<ClassInstance> {
        Rc::new(ClassInstance {
            class: id,
            class_name: self.name(id).to_string(),
            fields: RefCell::new(self.effective_defaults(id)),
            initialized: Cell::new(false),
        })
    }
}

/// A class instance: shared mutable field storage plus its class id.
#[derive(Debug)]
pub struct ClassInstance {
    class: ClassId,
    class_name: String,
    fields: RefCell<IndexMap<String, Value>>,
    initialized: Cell<bool>,
}

impl ClassInstance {
    /// The instance's class id.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// The instance's class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Snapshot of the current field storage (for display and debugging).
    pub fn fields(&self) -> IndexMap<String, Value> {
        self.fields.borrow().clone()
    }

    /// Read a field from storage.
    ///
    /// # Errors
    ///
    /// `FieldNotFound` when the field is not present.
    pub fn get_field(&self, field: &str) -> Result<Value> {
        self.fields
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| RuntimeError::FieldNotFound {
                class: self.class_name.clone(),
                field: field.to_string(),
                span: None,
            })
    }

    /// Write a field.
    ///
    /// # Errors
    ///
    /// `FieldNotFound` when no class in the chain declares the field.
    /// `ConstField` when the field is const and already present in storage
    /// — defaults populate storage at construction, so a const field never
    /// accepts a write after construction; only its default survives.
    pub fn set_field(&self, arena: &ClassArena, field: &str, value: Value) -> Result<()> {
        let spec =
            arena
                .field_spec(self.class, field)
                .ok_or_else(|| RuntimeError::FieldNotFound {
                    class: self.class_name.clone(),
                    field: field.to_string(),
                    span: None,
                })?;
        if spec.is_const && self.fields.borrow().contains_key(field) {
            return Err(RuntimeError::ConstField {
                class: self.class_name.clone(),
                field: field.to_string(),
                span: None,
            });
        }
        self.fields.borrow_mut().insert(field.to_string(), value);
        Ok(())
    }

    /// Whether storage currently holds the field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.borrow().contains_key(field)
    }

    /// Mark construction complete.
    pub fn mark_initialized(&self) {
        self.initialized.set(true);
    }

    /// Whether the constructor has finished.
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(default: Value) -> FieldSpec {
        FieldSpec {
            default,
            private: false,
            is_static: false,
            is_const: false,
        }
    }

    #[test]
    fn test_field_defaults_merge_own_wins() {
        let mut arena = ClassArena::new();
        let mut a = ClassDef::new("A", None);
        a.add_field("x", field(Value::Int(1)));
        a.add_field("y", field(Value::Int(10)));
        let a_id = arena.register(a, None);

        let mut b = ClassDef::new("B", Some("A".into()));
        b.add_field("x", field(Value::Int(2)));
        let b_id = arena.register(b, Some(a_id));

        let defaults = arena.effective_defaults(b_id);
        assert_eq!(defaults["x"], Value::Int(2));
        assert_eq!(defaults["y"], Value::Int(10));
    }

    #[test]
    fn test_method_resolution_walks_chain() {
        let mut arena = ClassArena::new();
        let mut a = ClassDef::new("A", None);
        a.add_method(Method {
            name: "greet".into(),
            params: vec![],
            body: Rc::new(vec![]),
            private: false,
            is_static: false,
            is_const: false,
            span: Span::default(),
        });
        let a_id = arena.register(a, None);
        let b_id = arena.register(ClassDef::new("B", Some("A".into())), Some(a_id));

        assert!(arena.method(b_id, "greet").is_some());
        assert!(arena.method(b_id, "missing").is_none());
    }

    #[test]
    fn test_constructor_selection_by_arity() {
        let mut arena = ClassArena::new();
        let mut a = ClassDef::new("A", None);
        a.add_constructor(Constructor {
            params: vec![],
            body: Rc::new(vec![]),
            private: false,
            span: Span::default(),
        });
        a.add_constructor(Constructor {
            params: vec!["x".into()],
            body: Rc::new(vec![]),
            private: false,
            span: Span::default(),
        });
        let id = arena.register(a, None);

        assert_eq!(arena.find_constructor(id, 1).unwrap().params.len(), 1);
        assert!(arena.find_constructor(id, 2).is_none());
    }

    #[test]
    fn test_instance_of_inclusive_chain() {
        let mut arena = ClassArena::new();
        let a_id = arena.register(ClassDef::new("A", None), None);
        let b_id = arena.register(ClassDef::new("B", Some("A".into())), Some(a_id));

        assert!(arena.instance_of(b_id, "B"));
        assert!(arena.instance_of(b_id, "A"));
        assert!(!arena.instance_of(a_id, "B"));
    }

    #[test]
    fn test_const_field_rejects_write_once_stored() {
        let mut arena = ClassArena::new();
        let mut a = ClassDef::new("A", None);
        a.add_field(
            "id",
            FieldSpec {
                default: Value::Int(7),
                private: false,
                is_static: false,
                is_const: true,
            },
        );
        let id = arena.register(a, None);

        let inst = arena.create_instance(id);
        // The default is already in storage, so even the first explicit
        // write is rejected.
        assert!(matches!(
            inst.set_field(&arena, "id", Value::Int(8)),
            Err(RuntimeError::ConstField { .. })
        ));
        assert_eq!(inst.get_field("id").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_set_unknown_field_fails() {
        let mut arena = ClassArena::new();
        let id = arena.register(ClassDef::new("A", None), None);
        let inst = arena.create_instance(id);
        assert!(matches!(
            inst.set_field(&arena, "ghost", Value::Null),
            Err(RuntimeError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_superclasses_deferred() {
        let mut arena = ClassArena::new();
        // Child registered before parent; linking happens afterwards.
        arena.register_unlinked(ClassDef::new("B", Some("A".into())));
        arena.register_unlinked(ClassDef::new("A", None));
        arena.resolve_superclasses().unwrap();

        let b = arena.lookup("B").unwrap();
        assert!(arena.instance_of(b, "A"));
    }

    #[test]
    fn test_resolve_superclasses_missing() {
        let mut arena = ClassArena::new();
        arena.register_unlinked(ClassDef::new("B", Some("Ghost".into())));
        assert!(matches!(
            arena.resolve_superclasses(),
            Err(RuntimeError::UndefinedName { .. })
        ));
    }
}
