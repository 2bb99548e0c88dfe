use crate::api::{ArgSpec, Deprecated, Group};

/// One entry in a command's ordered argument list.
#[derive(Debug, Clone)]
pub enum Argument {
    /// An option or positional argument.
    Arg(ArgSpec),
    /// A sub-command slot.
    Subcommand(SubcommandSpec),
}

/// The declarative description of a command (or sub-command).
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{ArgSpec, CommandSpec, SubcommandSpec};
///
/// let spec = CommandSpec::new("program")
///     .help("Does awesome stuff.")
///     .add(ArgSpec::option("verbose").short("-v").count())
///     .subcommand(
///         SubcommandSpec::new("command")
///             .command(CommandSpec::new("alpha").add(ArgSpec::positional("item")))
///             .command(CommandSpec::new("beta")),
///     );
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub(crate) real_name: String,
    pub(crate) help: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) deprecated: Option<Deprecated>,
    pub(crate) arguments: Vec<Argument>,
}

impl CommandSpec {
    /// Create a command.
    pub fn new(real_name: impl Into<String>) -> Self {
        Self {
            real_name: real_name.into(),
            help: None,
            description: None,
            deprecated: None,
            arguments: Vec::default(),
        }
    }

    /// Document the command with a short help line.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help.replace(help.into());
        self
    }

    /// Document the command in full sentence/paragraph format.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Mark the command as deprecated.
    pub fn deprecated(mut self, deprecated: Deprecated) -> Self {
        self.deprecated.replace(deprecated);
        self
    }

    /// Add an option/positional argument.
    ///
    /// The order of positional arguments corresponds to their positional order during parsing.
    pub fn add(mut self, arg: ArgSpec) -> Self {
        self.arguments.push(Argument::Arg(arg));
        self
    }

    /// Add a sub-command slot.
    pub fn subcommand(mut self, subcommand: SubcommandSpec) -> Self {
        self.arguments.push(Argument::Subcommand(subcommand));
        self
    }

    /// The command name.
    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// The short help line, if documented.
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The long description, if documented.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The declared arguments, in declaration order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub(crate) fn args(&self) -> impl Iterator<Item = &ArgSpec> {
        self.arguments.iter().filter_map(|argument| match argument {
            Argument::Arg(arg) => Some(arg),
            Argument::Subcommand(_) => None,
        })
    }

    pub(crate) fn subcommands(&self) -> impl Iterator<Item = &SubcommandSpec> {
        self.arguments.iter().filter_map(|argument| match argument {
            Argument::Arg(_) => None,
            Argument::Subcommand(subcommand) => Some(subcommand),
        })
    }

    pub(crate) fn uses_spelling(&self, spelling: &str) -> bool {
        self.args().any(|arg| arg.spellings().any(|s| s == spelling))
    }
}

/// The declarative description of a sub-command slot.
#[derive(Debug, Clone)]
pub struct SubcommandSpec {
    pub(crate) field_name: String,
    pub(crate) required: bool,
    pub(crate) options: Vec<CommandSpec>,
    pub(crate) group: Option<Group>,
    pub(crate) hidden: bool,
}

impl SubcommandSpec {
    /// Create a (required) sub-command slot, storing the chosen sub-command under `field_name`.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            required: true,
            options: Vec::default(),
            group: None,
            hidden: false,
        }
    }

    /// Add a sub-command.
    /// The sub-command is selected on the Cli by its [`CommandSpec::real_name`].
    pub fn command(mut self, command: CommandSpec) -> Self {
        self.options.push(command);
        self
    }

    /// Allow the sub-command to be omitted.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Place the slot in a group.
    pub fn group(mut self, group: Group) -> Self {
        self.group.replace(group);
        self
    }

    /// Hide the slot from help displays.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The field name.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Whether the slot is hidden from help displays.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The sub-command names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|command| command.real_name.as_str())
    }

    pub(crate) fn find(&self, name: &str) -> Option<&CommandSpec> {
        self.options.iter().find(|command| command.real_name == name)
    }
}
