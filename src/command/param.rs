//! Parameter schema: declared argument types and their conversion.

use std::fmt;

use crate::canvas::Colour;
use crate::error::{EaselError, Result};

/// Semantic type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Decimal number truncated toward zero
    Integer,
    Float,
    String,
    /// `true` or `false`, case-insensitive
    Boolean,
    /// `#RGB` or `#RRGGBB`
    Colour,
    /// Script text passed through unresolved
    Script,
    /// Any text
    Unknown,
}

impl ParamType {
    /// Type name shown in usage strings.
    pub fn label(self) -> &'static str {
        match self {
            ParamType::Integer | ParamType::Float => "number",
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Colour => "colour",
            ParamType::Script => "script",
            ParamType::Unknown => "unknown",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            ParamType::Integer | ParamType::Float => "number",
            ParamType::Boolean => "boolean (true or false)",
            ParamType::Colour => "hex colour (#RGB or #RRGGBB)",
            ParamType::String | ParamType::Script | ParamType::Unknown => "text",
        }
    }
}

/// A typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Optional parameter left out, with no default
    Absent,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Colour(Colour),
    /// Collected variadic arguments
    List(Vec<Value>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Colour(c) => write!(f, "{}", c),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Declaration of one command argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub description: String,
    pub kind: ParamType,
    pub required: bool,
    /// Collects every remaining argument
    pub rest: bool,
    /// Raw text substituted when the argument is missing or empty
    pub default: Option<String>,
    /// Case-sensitive set of accepted values
    pub allowed: Option<Vec<String>>,
    /// Keep surrounding whitespace instead of trimming
    pub verbatim: bool,
}

impl ParameterDefinition {
    pub fn required(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            required: true,
            rest: false,
            default: None,
            allowed: None,
            verbatim: false,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn allow(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn verbatim(mut self) -> Self {
        self.verbatim = true;
        self
    }

    pub fn rest(mut self) -> Self {
        self.rest = true;
        self
    }

    /// Signature fragment such as `fontName: string` or `filled?: boolean`.
    pub fn usage(&self) -> String {
        let prefix = if self.rest { "..." } else { "" };
        let suffix = if self.required || self.rest { "" } else { "?" };
        format!(
            "{}{}{}: {}",
            prefix,
            camel_case(&self.name),
            suffix,
            self.kind.label()
        )
    }

    /// Convert one raw argument, applying trimming and the default.
    ///
    /// `None`, empty and whitespace-only text all count as missing. Verbatim
    /// parameters keep their surrounding whitespace otherwise.
    pub fn convert(&self, command: &str, raw: Option<&str>) -> Result<Value> {
        let given = raw
            .filter(|s| !s.trim().is_empty())
            .map(|s| if self.verbatim { s } else { s.trim() });
        let Some(text) = given.or(self.default.as_deref()) else {
            if self.required {
                return Err(EaselError::invalid_parameter(
                    command,
                    format!("{} (required)", self.name),
                    raw.unwrap_or_default(),
                ));
            }
            return Ok(Value::Absent);
        };

        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|a| a == text) {
                return Err(EaselError::invalid_parameter(
                    command,
                    format!("{} one of {}", self.name, allowed.join(", ")),
                    text,
                ));
            }
        }

        let invalid =
            || EaselError::invalid_parameter(command, format!("{} {}", self.name, self.kind.expected()), text);

        match self.kind {
            ParamType::Integer => {
                let n = parse_number(text).ok_or_else(invalid)?.trunc();
                if n.abs() >= i64::MAX as f64 {
                    return Err(invalid());
                }
                Ok(Value::Integer(n as i64))
            }
            ParamType::Float => parse_number(text).map(Value::Float).ok_or_else(invalid),
            ParamType::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(invalid()),
            },
            ParamType::Colour => Colour::parse_hex(text)
                .map(Value::Colour)
                .map_err(|_| invalid()),
            ParamType::String | ParamType::Script | ParamType::Unknown => {
                Ok(Value::String(text.to_string()))
            }
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let plain = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'));
    if !plain {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `Font Name` -> `fontName`, `ID` -> `id`.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in name.split_whitespace().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Validated arguments of one call, keyed by parameter name.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    command: String,
    values: Vec<(String, Value)>,
}

impl Args {
    pub fn new(command: impl Into<String>, values: Vec<(String, Value)>) -> Self {
        Self {
            command: command.into(),
            values,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn missing(&self, name: &str, expected: &str) -> EaselError {
        EaselError::invalid_parameter(&self.command, format!("{} {}", name, expected), "")
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(Value::Integer(n)) => Ok(*n),
            _ => Err(self.missing(name, "number")),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(Value::Float(n)) => Ok(*n),
            Some(Value::Integer(n)) => Ok(*n as f64),
            _ => Err(self.missing(name, "number")),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(Value::Boolean(b)) => Ok(*b),
            _ => Err(self.missing(name, "boolean")),
        }
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.optional_string(name)
            .ok_or_else(|| self.missing(name, "text"))
    }

    /// A string argument, or `None` when it was left out.
    pub fn optional_string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn colour(&self, name: &str) -> Result<Colour> {
        match self.get(name) {
            Some(Value::Colour(c)) => Ok(*c),
            _ => Err(self.missing(name, "hex colour")),
        }
    }

    /// Items collected by a variadic parameter.
    pub fn list(&self, name: &str) -> &[Value] {
        match self.get(name) {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }
}
