use std::rc::Rc;

use crate::model::Value;

/// How a matched argument/option turns its raw value(s) into a stored [`Value`].
#[derive(Debug, Clone, Default)]
pub enum Action {
    /// Store the raw value(s), replacing any prior value.
    #[default]
    Set,
    /// Store `true`, ignoring any value.
    StoreTrue,
    /// Store `false`, ignoring any value.
    StoreFalse,
    /// Add the value(s) onto the prior list.
    Append,
    /// Increment the prior counter (starting from `0`).
    Count,
    /// Stop parsing and request the help message.
    Help,
    /// Stop parsing and request the version (the option's `default`).
    Version,
    /// Stop parsing and request a shell completion command (`generate` or `complete`).
    Completion,
    /// Delegate to an externally supplied handler.
    Custom(CustomAction),
}

impl Action {
    /// Whether this is a meta action (never stored, never required).
    pub fn is_meta(&self) -> bool {
        matches!(self, Action::Help | Action::Version | Action::Completion)
    }

    pub(crate) fn consumes_values(&self) -> bool {
        !matches!(
            self,
            Action::StoreTrue | Action::StoreFalse | Action::Count | Action::Help | Action::Version
        )
    }
}

/// The view of parser state handed to a [`CustomAction`].
#[derive(Debug)]
pub struct ActionScope<'a> {
    pub(crate) field_name: &'a str,
    pub(crate) prior: Option<&'a Value>,
    pub(crate) command: &'a [String],
}

impl<'a> ActionScope<'a> {
    /// The field the action stores into.
    pub fn field_name(&self) -> &str {
        self.field_name
    }

    /// The value currently stored for the field, if any.
    pub fn prior(&self) -> Option<&Value> {
        self.prior
    }

    /// The command path, from the root program to the command being parsed.
    pub fn command(&self) -> &[String] {
        self.command
    }
}

type CustomFn = dyn Fn(&[String], &ActionScope<'_>) -> Result<Value, String>;

/// An externally supplied action handler.
///
/// The handler receives the raw values matched for the argument/option, and the current [`ActionScope`].
/// An `Err` message is reported to the user as a parse error.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{CustomAction, Value};
///
/// let joined = CustomAction::new(|values, _scope| Ok(Value::from(values.join("+"))));
/// ```
#[derive(Clone)]
pub struct CustomAction(Rc<CustomFn>);

impl CustomAction {
    /// Wrap a handler.
    pub fn new(
        handler: impl Fn(&[String], &ActionScope<'_>) -> Result<Value, String> + 'static,
    ) -> Self {
        Self(Rc::new(handler))
    }

    pub(crate) fn apply(&self, values: &[String], scope: &ActionScope<'_>) -> Result<Value, String> {
        (self.0)(values, scope)
    }
}

impl std::fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomAction{..}").finish()
    }
}

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    value: String,
    help: Option<String>,
}

impl Completion {
    /// Create a candidate without any help text.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            help: None,
        }
    }

    /// Document the candidate.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help.replace(help.into());
        self
    }

    /// The candidate value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Completion {
    /// Renders the `value:help` line of the completion wire protocol.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The help is single line on the wire.
        let help = self
            .help
            .as_deref()
            .map(|help| help.replace('\n', " "))
            .unwrap_or_default();
        write!(f, "{}:{help}", self.value)
    }
}

type CompleterFn = dyn Fn(&str) -> Vec<Completion>;

/// Produces completion candidates for a partially typed value.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{Completer, Completion};
///
/// let colours = Completer::new(|partial| {
///     ["red", "green"]
///         .iter()
///         .filter(|c| c.starts_with(partial))
///         .map(|c| Completion::new(*c))
///         .collect()
/// });
/// ```
#[derive(Clone)]
pub struct Completer(Rc<CompleterFn>);

impl Completer {
    /// Wrap a completion provider.
    pub fn new(provider: impl Fn(&str) -> Vec<Completion> + 'static) -> Self {
        Self(Rc::new(provider))
    }

    /// A provider offering every choice that starts with the partial value.
    pub fn choices<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        Self::new(move |partial| {
            choices
                .iter()
                .filter(|choice| choice.starts_with(partial))
                .map(|choice| Completion::new(choice.as_str()))
                .collect()
        })
    }

    pub(crate) fn complete(&self, partial: &str) -> Vec<Completion> {
        (self.0)(partial)
    }
}

impl std::fmt::Debug for Completer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completer{..}").finish()
    }
}
