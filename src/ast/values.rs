use serde::Serialize;

/// A typed bind value inferred from a raw query-string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Value {
    /// Infer the type of a raw value.
    ///
    /// Tried in order: boolean (`true` / `false` only), 64-bit integer, then
    /// string. `"1"` and `"0"` are therefore integers.
    pub fn infer(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            return Value::Bool(b);
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
        Value::String(raw.to_string())
    }

    /// Short type name, used by `explain` output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::String(_) => "string",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
