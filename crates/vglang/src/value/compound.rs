//! Struct and enum runtime types

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::error::{Result, RuntimeError};

use super::Value;

/// A declared struct type: a name and its field names.
///
/// Fields default to null; a struct instance is created the first time the
/// definition is instantiated (explicitly or through field assignment).
#[derive(Debug, Clone)]
pub struct StructDef {
    /// Struct name
    pub name: String,
    /// Field names in declaration order
    pub fields: Vec<String>,
}

impl StructDef {
    /// Create a struct definition.
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Whether the struct declares the given field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Create an instance with every field set to null.
    pub fn instantiate(&self) -> StructInstance {
        let mut fields = IndexMap::new();
        for f in &self.fields {
            fields.insert(f.clone(), Value::Null);
        }
        StructInstance {
            name: self.name.clone(),
            fields: RefCell::new(fields),
        }
    }
}

/// A struct instance with mutable named fields.
#[derive(Debug)]
pub struct StructInstance {
    /// The struct type's name
    pub name: String,
    /// Field storage
    pub fields: RefCell<IndexMap<String, Value>>,
}

impl StructInstance {
    /// Read a field.
    pub fn get_field(&self, field: &str) -> Result<Value> {
        self.fields
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| RuntimeError::FieldNotFound {
                class: self.name.clone(),
                field: field.to_string(),
                span: None,
            })
    }

    /// Write a field.
    pub fn set_field(&self, field: &str, value: Value) {
        self.fields.borrow_mut().insert(field.to_string(), value);
    }

    /// Whether the instance currently holds the field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.borrow().contains_key(field)
    }
}

/// A declared enum type: a name and its named values.
///
/// Values are arbitrary (auto-incremented integers unless the declaration
/// gave explicit expressions).
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Enum name
    pub name: String,
    /// Named values in declaration order
    pub values: IndexMap<String, Value>,
}

impl EnumDef {
    /// Create an enum definition.
    pub fn new(name: impl Into<String>, values: IndexMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Look up a named value.
    pub fn value(&self, name: &str) -> Result<Value> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedName {
                kind: "enum value",
                name: format!("{}.{}", self.name, name),
                span: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_instantiate_defaults_null() {
        let def = StructDef::new("Point", vec!["x".into(), "y".into()]);
        let inst = def.instantiate();
        assert!(matches!(inst.get_field("x").unwrap(), Value::Null));
        assert!(matches!(inst.get_field("y").unwrap(), Value::Null));
    }

    #[test]
    fn test_struct_missing_field() {
        let def = StructDef::new("Point", vec!["x".into()]);
        let inst = def.instantiate();
        assert!(matches!(
            inst.get_field("z"),
            Err(RuntimeError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_enum_lookup() {
        let mut values = IndexMap::new();
        values.insert("RED".to_string(), Value::Int(0));
        values.insert("GREEN".to_string(), Value::Int(1));
        let e = EnumDef::new("Color", values);
        assert!(matches!(e.value("GREEN").unwrap(), Value::Int(1)));
        assert!(matches!(
            e.value("BLUE"),
            Err(RuntimeError::UndefinedName { .. })
        ));
    }
}
