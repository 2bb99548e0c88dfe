use std::collections::BTreeMap;

/// The cardinality of inputs to match for an argument/option.
///
/// An [`ArgSpec`](crate::ArgSpec) without any `Nargs` takes precisely one value, stored as a scalar.
///
/// Inspired by argparse: <https://docs.python.org/3/library/argparse.html#nargs>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// `N`: Precisely `N` values, stored as a list (`0` consumes nothing).
    Precisely(u8),
    /// `*`: May be any number of values, including `0`; matched greedily.
    Any,
    /// `+`: At least one value must be specified; matched greedily.
    AtLeastOne,
}

impl std::fmt::Display for Nargs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The parsed values of a command, keyed by field name.
pub type ValueMap = BTreeMap<String, Value>;

/// A single parsed value.
///
/// The engine never converts raw strings into domain types; that is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A raw string value.
    Str(String),
    /// A flag value (ex: from `Action::StoreTrue`).
    Bool(bool),
    /// A counter value (ex: from `Action::Count`).
    Int(i64),
    /// Multiple values, in encounter order.
    List(Vec<Value>),
    /// The result of a sub-command, along with the name of the chosen sub-command.
    Command {
        /// The sub-command name as it appeared on the Cli.
        name: String,
        /// The values parsed by the sub-command.
        values: ValueMap,
    },
}

impl Value {
    /// Build a `Value::List` of strings.
    pub fn strings<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Value::List(items.into_iter().map(|s| Value::Str(s.into())).collect())
    }

    /// The string, if this is a `Value::Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The flag, if this is a `Value::Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The counter, if this is a `Value::Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The items, if this is a `Value::List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The chosen sub-command name and its values, if this is a `Value::Command`.
    pub fn as_command(&self) -> Option<(&str, &ValueMap)> {
        match self {
            Value::Command { name, values } => Some((name, values)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Command { name, .. } => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::from("abc"), "abc")]
    #[case(Value::from(true), "true")]
    #[case(Value::Int(3), "3")]
    #[case(Value::strings(vec!["a", "b"]), "[a, b]")]
    #[case(Value::List(vec![]), "[]")]
    #[case(Value::Command { name: "sub".to_string(), values: ValueMap::default() }, "sub")]
    fn display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from("x").as_bool(), None);
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(
            Value::strings(vec!["a"]).as_list(),
            Some(&[Value::from("a")][..])
        );

        let command = Value::Command {
            name: "sub".to_string(),
            values: ValueMap::from([("x".to_string(), Value::Int(1))]),
        };
        let (name, values) = command.as_command().unwrap();
        assert_eq!(name, "sub");
        assert_eq!(values.get("x"), Some(&Value::Int(1)));
    }
}
