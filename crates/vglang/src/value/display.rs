//! Display implementation for values
//!
//! Renders the forms the language prints: `null`, bare strings, `3.0` for
//! doubles, `[1, 2]` for arrays, `Name {field: value}` for struct and
//! class instances.

use std::fmt;

use super::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(n) => write!(f, "{}", n),
            // {:?} keeps the trailing ".0" on whole doubles
            Value::Double(n) => write!(f, "{:?}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),

            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, item) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }

            Value::StructDef(def) => write!(f, "struct {}", def.name),

            Value::Struct(inst) => {
                write!(f, "{} {{", inst.name)?;
                for (i, (k, v)) in inst.fields.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Enum(def) => write!(f, "{}", def.name),

            Value::Instance(inst) => {
                write!(f, "{} {{", inst.class_name())?;
                for (i, (k, v)) in inst.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Function(func) => write!(f, "function {}", func.name),
            Value::FunctionRef(r) => write!(f, "function {}", r.function.name),
            Value::Builtin(b) => write!(f, "function {}", b.name),
            Value::Method(m) => {
                write!(f, "{}.{}", m.instance.class_name(), m.method)
            }
            Value::StaticMethod(s) => write!(f, "{}.{}", s.class_name, s.method),
            Value::Class(_) => write!(f, "class"),
            Value::Namespace(ns) => write!(f, "namespace {}", ns.name),
            Value::Library(lib) => write!(f, "library {}", lib.name),
        }
    }
}
