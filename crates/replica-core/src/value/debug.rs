//! Depth-limited Debug output
//!
//! Handles below the depth limit print as `Kind@addr`, which also keeps
//! cyclic graphs printable.

use std::fmt;

use super::value::Value;

const DEBUG_DEPTH: usize = 3;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, DEBUG_DEPTH)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(i) => write!(f, "{}", i),
        Value::Float(x) => write!(f, "{:?}", x),
        Value::Char(c) => write!(f, "{:?}", c),
        Value::Str(s) => write!(f, "{:?}", &**s),
        Value::Enum(e) => write!(f, "{}::{}", e.type_name, e.variant),
        handle => {
            if depth == 0 {
                return write_marker(f, handle);
            }
            write_handle(f, handle, depth - 1)
        }
    }
}

fn write_marker(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value.identity() {
        Some(id) => write!(f, "{}{}", value.type_name(), id),
        None => f.write_str(value.type_name()),
    }
}

fn write_handle(f: &mut fmt::Formatter<'_>, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::List(items) => match items.try_borrow() {
            Ok(items) => write_seq(f, "[", "]", items.iter(), depth),
            Err(_) => write_marker(f, value),
        },
        Value::Array(items) => match items.try_borrow() {
            Ok(items) => write_seq(f, "#[", "]", items.iter(), depth),
            Err(_) => write_marker(f, value),
        },
        Value::Set(items) => match items.try_borrow() {
            Ok(items) => write_seq(f, "{", "}", items.iter().map(|k| k.value()), depth),
            Err(_) => write_marker(f, value),
        },
        Value::Map(entries) => match entries.try_borrow() {
            Ok(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_value(f, k.value(), depth)?;
                    f.write_str(": ")?;
                    write_value(f, v, depth)?;
                }
                f.write_str("}")
            }
            Err(_) => write_marker(f, value),
        },
        Value::Object(object) => match object.try_borrow() {
            Ok(record) => {
                let fields = record.fields();
                write!(f, "{} {{", record.type_name())?;
                drop(record);
                for (i, field) in fields.iter().enumerate() {
                    f.write_str(if i > 0 { ", " } else { " " })?;
                    write!(f, "{}: ", field.name)?;
                    write_value(f, &field.value, depth)?;
                }
                f.write_str(if fields.is_empty() { "}" } else { " }" })
            }
            Err(_) => write_marker(f, value),
        },
        atomic => write_value(f, atomic, depth),
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
    depth: usize,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_value(f, item, depth)?;
    }
    f.write_str(close)
}
