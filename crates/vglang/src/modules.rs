//! Libraries, namespaces, and the module registry
//!
//! The library-loading collaborator parses `.vglib` sources elsewhere and
//! hands this crate pre-parsed declarations; registration builds the
//! runtime [`Library`]/[`Namespace`] trees the import statement binds into
//! the global scope. No filesystem access happens here.

use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Stmt};
use crate::value::{Function, Value};

// ═══════════════════════════════════════════════════════════════════════
// Pre-parsed declarations (the collaborator's hand-off format)
// ═══════════════════════════════════════════════════════════════════════

/// A function declared inside a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceFnDecl {
    /// Function name
    pub name: String,
    /// Parameter names
    pub params: Vec<String>,
    /// Function body
    pub body: Vec<Stmt>,
}

/// A variable or constant declared inside a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceVar {
    /// Symbol name
    pub name: String,
    /// Initializer, evaluated at registration time
    pub init: Expr,
}

/// A namespace declaration, possibly nested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamespaceDecl {
    /// Namespace name
    pub name: String,
    /// Function declarations
    pub functions: Vec<NamespaceFnDecl>,
    /// Variable declarations
    pub variables: Vec<NamespaceVar>,
    /// Constant declarations
    pub constants: Vec<NamespaceVar>,
    /// Child namespaces
    pub children: Vec<NamespaceDecl>,
}

/// A library declaration: a name and its namespaces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LibraryDecl {
    /// Library name
    pub name: String,
    /// Namespace declarations
    pub namespaces: Vec<NamespaceDecl>,
}

// ═══════════════════════════════════════════════════════════════════════
// Runtime module tree
// ═══════════════════════════════════════════════════════════════════════

/// A registered namespace: symbols, functions, and child namespaces.
#[derive(Debug, Default)]
pub struct Namespace {
    /// Namespace name
    pub name: String,
    /// Value symbols (functions also appear here as values)
    pub symbols: IndexMap<String, Value>,
    /// Function table for qualified calls
    pub functions: IndexMap<String, Rc<Function>>,
    /// Nested namespaces
    pub children: IndexMap<String, Rc<Namespace>>,
}

impl Namespace {
    /// Look up a symbol.
    pub fn symbol(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    /// Look up a function.
    pub fn function(&self, name: &str) -> Option<Rc<Function>> {
        self.functions.get(name).cloned()
    }

    /// Look up a child namespace.
    pub fn child(&self, name: &str) -> Option<Rc<Namespace>> {
        self.children.get(name).cloned()
    }

    /// Member access: a symbol, or a child namespace as a value.
    pub fn member(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.symbols.get(name) {
            return Some(v.clone());
        }
        self.children
            .get(name)
            .map(|ns| Value::Namespace(ns.clone()))
    }

    /// Walk a nested namespace path starting below this namespace.
    pub fn nested(self: Rc<Self>, path: &[String]) -> Option<Rc<Namespace>> {
        let mut current = self;
        for part in path {
            current = current.child(part)?;
        }
        Some(current)
    }
}

/// A registered library: a named set of namespaces.
#[derive(Debug, Default)]
pub struct Library {
    /// Library name
    pub name: String,
    /// Top-level namespaces
    pub namespaces: IndexMap<String, Rc<Namespace>>,
}

impl Library {
    /// Look up a top-level namespace.
    pub fn namespace(&self, name: &str) -> Option<Rc<Namespace>> {
        self.namespaces.get(name).cloned()
    }
}

/// The interpreter's registry of loaded libraries.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    libraries: IndexMap<String, Rc<Library>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a library (replacing any previous registration of the name).
    pub fn add_library(&mut self, library: Library) {
        self.libraries
            .insert(library.name.clone(), Rc::new(library));
    }

    /// Look up a library by name.
    pub fn library(&self, name: &str) -> Option<Rc<Library>> {
        self.libraries.get(name).cloned()
    }

    /// Names of all registered libraries.
    pub fn library_names(&self) -> Vec<&str> {
        self.libraries.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_member_prefers_symbols() {
        let mut ns = Namespace {
            name: "math".into(),
            ..Default::default()
        };
        ns.symbols.insert("pi".into(), Value::Double(3.14));
        assert_eq!(ns.member("pi"), Some(Value::Double(3.14)));
        assert_eq!(ns.member("tau"), None);
    }

    #[test]
    fn test_nested_walk() {
        let leaf = Rc::new(Namespace {
            name: "inner".into(),
            ..Default::default()
        });
        let mut root = Namespace {
            name: "outer".into(),
            ..Default::default()
        };
        root.children.insert("inner".into(), leaf);
        let root = Rc::new(root);

        assert!(root.clone().nested(&["inner".into()]).is_some());
        assert!(root.clone().nested(&["missing".into()]).is_none());
        assert!(root.nested(&[]).is_some());
    }

    #[test]
    fn test_registry_replaces_same_name() {
        let mut reg = ModuleRegistry::new();
        reg.add_library(Library {
            name: "std".into(),
            ..Default::default()
        });
        reg.add_library(Library {
            name: "std".into(),
            ..Default::default()
        });
        assert_eq!(reg.library_names(), vec!["std"]);
    }
}
