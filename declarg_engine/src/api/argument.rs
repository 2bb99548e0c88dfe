use crate::api::{Action, Completer};
use crate::model::{Nargs, Value};

/// Groups arguments/options for mutual exclusivity and help ordering.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{ArgSpec, Group};
///
/// let output = Group::new("output").exclusive();
/// let json = ArgSpec::option("json").long("--json").store_true().group(output.clone());
/// let yaml = ArgSpec::option("yaml").long("--yaml").store_true().group(output);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    order: i32,
    name: String,
    exclusive: bool,
    section: i32,
}

impl Group {
    /// Create a (non-exclusive) group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Only allow one member of this group to receive a value per invocation.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// The display order of this group.
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// The display section of this group.
    pub fn section(mut self, section: i32) -> Self {
        self.section = section;
        self
    }

    /// The group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the group members are mutually exclusive.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// The group's (order, section) for help display.
    pub fn display_order(&self) -> (i32, i32) {
        (self.order, self.section)
    }
}

/// Marks an argument/option (or command) as deprecated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deprecated {
    /// Deprecated, with the standard notice.
    Notice,
    /// Deprecated, with a custom explanation appended to the notice.
    Message(String),
}

impl Deprecated {
    pub(crate) fn notice(&self, subject: &str) -> String {
        match self {
            Deprecated::Notice => format!("{subject} is deprecated."),
            Deprecated::Message(message) => format!("{subject} is deprecated: {message}"),
        }
    }
}

/// The declarative description of one option or positional argument.
///
/// An `ArgSpec` without any `short` or `long` spellings is a positional argument.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{ArgSpec, Nargs};
///
/// let verbose = ArgSpec::option("verbose").short("-v").long("--verbose").count();
/// let pair = ArgSpec::positional("pair").num_args(Nargs::Precisely(2));
/// ```
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub(crate) field_name: String,
    pub(crate) value_name: String,
    pub(crate) short: Vec<String>,
    pub(crate) long: Vec<String>,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) action: Action,
    pub(crate) num_args: Option<Nargs>,
    pub(crate) choices: Vec<String>,
    pub(crate) group: Option<Group>,
    pub(crate) propagate: bool,
    pub(crate) deprecated: Option<Deprecated>,
    pub(crate) completion: Option<Completer>,
    pub(crate) help: Option<String>,
}

impl ArgSpec {
    fn new(field_name: impl Into<String>, required: bool) -> Self {
        let field_name = field_name.into();
        Self {
            value_name: field_name.to_ascii_uppercase(),
            field_name,
            short: Vec::default(),
            long: Vec::default(),
            required,
            default: None,
            action: Action::default(),
            num_args: None,
            choices: Vec::default(),
            group: None,
            propagate: false,
            deprecated: None,
            completion: None,
            help: None,
        }
    }

    /// Create an option; not required unless marked with [`ArgSpec::required`].
    /// Give it at least one spelling via [`ArgSpec::short`] or [`ArgSpec::long`].
    pub fn option(field_name: impl Into<String>) -> Self {
        Self::new(field_name, false)
    }

    /// Create a positional argument; required unless marked with [`ArgSpec::optional`].
    pub fn positional(field_name: impl Into<String>) -> Self {
        Self::new(field_name, true)
    }

    /// Add a short spelling, ex: `-v`.
    pub fn short(mut self, spelling: impl Into<String>) -> Self {
        self.short.push(spelling.into());
        self
    }

    /// Add a long spelling, ex: `--verbose`.
    pub fn long(mut self, spelling: impl Into<String>) -> Self {
        self.long.push(spelling.into());
        self
    }

    /// The display name for the value(s).
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = value_name.into();
        self
    }

    /// Require a value for this parameter.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Do not require a value for this parameter.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// The already resolved default, stored when the parameter is never matched.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Set the action.
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Shorthand for `action(Action::StoreTrue)`.
    pub fn store_true(self) -> Self {
        self.action(Action::StoreTrue)
    }

    /// Shorthand for `action(Action::StoreFalse)`.
    pub fn store_false(self) -> Self {
        self.action(Action::StoreFalse)
    }

    /// Shorthand for `action(Action::Count)`.
    pub fn count(self) -> Self {
        self.action(Action::Count)
    }

    /// Shorthand for `action(Action::Append)`.
    pub fn append(self) -> Self {
        self.action(Action::Append)
    }

    /// Set the cardinality.
    pub fn num_args(mut self, nargs: Nargs) -> Self {
        self.num_args.replace(nargs);
        self
    }

    /// Restrict the values to a closed set.
    pub fn choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Place the parameter in a group.
    pub fn group(mut self, group: Group) -> Self {
        self.group.replace(group);
        self
    }

    /// Make the option visible to, and settable from, every descendant sub-command.
    pub fn propagate(mut self) -> Self {
        self.propagate = true;
        self
    }

    /// Mark the parameter as deprecated.
    pub fn deprecated(mut self, deprecated: Deprecated) -> Self {
        self.deprecated.replace(deprecated);
        self
    }

    /// Set the completion provider for partially typed values.
    pub fn completion(mut self, completer: Completer) -> Self {
        self.completion.replace(completer);
        self
    }

    /// Document the parameter.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help.replace(help.into());
        self
    }

    /// The field name.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Whether this is a positional argument.
    pub fn is_positional(&self) -> bool {
        self.short.is_empty() && self.long.is_empty()
    }

    /// Every spelling, short ones first.
    pub fn spellings(&self) -> impl Iterator<Item = &String> {
        self.short.iter().chain(self.long.iter())
    }

    /// The name used in messages: the first long spelling, else the first short, else the value name.
    pub fn display_name(&self) -> &str {
        self.long
            .first()
            .or_else(|| self.short.first())
            .unwrap_or(&self.value_name)
    }

    pub(crate) fn subject(&self) -> String {
        if self.is_positional() {
            format!("Argument '{}'", self.value_name)
        } else {
            format!("Option '{}'", self.display_name())
        }
    }

    pub(crate) fn consumes_values(&self) -> bool {
        self.action.consumes_values() && self.num_args != Some(Nargs::Precisely(0))
    }

    pub(crate) fn completer(&self) -> Option<Completer> {
        match &self.completion {
            Some(completer) => Some(completer.clone()),
            None if !self.choices.is_empty() => Some(Completer::choices(self.choices.clone())),
            None => None,
        }
    }
}
