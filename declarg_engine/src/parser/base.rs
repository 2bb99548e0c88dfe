use thiserror::Error;

use crate::api::{CommandSpec, Completion};
use crate::constant::FILE_COMPLETION;
use crate::matcher::{validate, TableError};
use crate::model::ValueMap;
use crate::parser::engine::Engine;

/// Error for an invalid command line parser configuration.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

impl From<TableError> for ConfigError {
    fn from(error: TableError) -> Self {
        ConfigError(error.to_string())
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::default()
    } else {
        format!(" (Did you mean: {})", suggestions.join(", "))
    }
}

/// The reasons the input tokens may be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// An unknown option, or bare arguments left over after every positional was consumed.
    #[error("Unrecognized arguments: {}{}", .tokens.join(" "), did_you_mean(.suggestions))]
    UnrecognizedToken {
        /// The offending token(s).
        tokens: Vec<String>,
        /// The declared spellings that start with the offending token.
        suggestions: Vec<String>,
    },

    /// A value-consuming option/positional had no value available.
    #[error("{subject} requires a value.")]
    MissingRequiredValue {
        /// The offending option/positional, ex: `Option '--name'`.
        subject: String,
    },

    /// A fixed arity option/positional received too few values.
    #[error("{subject} requires {required} values, found {found} ('{}' so far).", .values.join(" "))]
    ArityMismatch {
        /// The offending option/positional.
        subject: String,
        /// The declared arity.
        required: u8,
        /// The number of values available.
        found: usize,
        /// The values collected so far.
        values: Vec<String>,
    },

    /// A value outside of the declared choices.
    #[error("Invalid choice '{value}' (choose from: {}).", .choices.join(", "))]
    InvalidChoice {
        /// The offending value.
        value: String,
        /// The declared choices.
        choices: Vec<String>,
    },

    /// Two members of the same exclusive group both received values.
    #[error("\"{spelling}\" not allowed with \"{existing}\"")]
    MutuallyExclusiveConflict {
        /// The spelling of the later member.
        spelling: String,
        /// The spelling of the member which was already chosen.
        existing: String,
    },

    /// A sub-command token which doesn't name a declared sub-command.
    #[error("Invalid command '{name}'{}", did_you_mean(.suggestions))]
    InvalidSubcommand {
        /// The offending token.
        name: String,
        /// The declared sub-commands that start with the offending token.
        suggestions: Vec<String>,
    },

    /// A required sub-command was not given.
    #[error("A command is required (choose from: {}).", .names.join(", "))]
    MissingSubcommand {
        /// The declared sub-commands.
        names: Vec<String>,
    },

    /// Every required option that was never given, sorted by field name.
    #[error("The following arguments are required: {}", .names.join(", "))]
    RequiredOptionsMissing {
        /// The display names of the missing options.
        names: Vec<String>,
    },

    /// A custom action rejected its value(s).
    #[error("{0}")]
    Custom(String),
}

/// A rejected input, along with the context in which it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error: {error}")]
pub struct BadArgument {
    pub(crate) error: MatchError,
    pub(crate) command: Vec<String>,
    pub(crate) arg: Option<String>,
    pub(crate) value: Option<String>,
}

impl BadArgument {
    /// The reason for the rejection.
    pub fn error(&self) -> &MatchError {
        &self.error
    }

    /// The command path (root program first) being parsed at the rejection.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The field name of the offending argument/option, if any.
    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }

    /// The offending raw value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A request to display the help of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRequest {
    pub(crate) command: Vec<String>,
}

impl HelpRequest {
    /// The command path (root program first) of the command whose help was requested.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The display name, ex: `program sub-command`.
    pub fn display_name(&self) -> String {
        self.command.join(" ")
    }
}

/// The result of a completion query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completions {
    /// Defer to the shell's file path completion.
    File,
    /// The candidate values.
    Candidates(Vec<Completion>),
}

impl std::fmt::Display for Completions {
    /// Renders the completion wire protocol: `file`, or one `value:help` line per candidate.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Completions::File => write!(f, "{FILE_COMPLETION}"),
            Completions::Candidates(candidates) => {
                let lines: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}

/// The shell completion commands, requested via `--completion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCommand {
    /// Print the shell integration script.
    Generate,
    /// Answer the completion query found in the environment.
    Complete,
}

/// The non-local exits of a parse.
///
/// Every variant except `Failure` is a successful short-circuit rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Help was requested.
    Help(HelpRequest),
    /// The version was requested.
    Version(String),
    /// Completion candidates, resulting from a completion mode parse.
    Completion(Completions),
    /// A shell completion command was requested.
    CompletionCommand(CompletionCommand),
    /// The input was rejected.
    Failure(BadArgument),
}

impl From<BadArgument> for Signal {
    fn from(error: BadArgument) -> Self {
        Signal::Failure(error)
    }
}

/// The structured result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub(crate) commands: Vec<String>,
    pub(crate) values: ValueMap,
    pub(crate) deprecations: Vec<String>,
}

impl Parsed {
    /// The command path, from the root program down to the deepest sub-command selected.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// The parsed values of the root command.
    /// Sub-command values are nested under their slot's field name.
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// The deprecation warnings raised during the parse, in encounter order.
    pub fn deprecations(&self) -> &[String] {
        &self.deprecations
    }

    /// Take the parsed values.
    pub fn into_values(self) -> ValueMap {
        self.values
    }
}

/// The parse engine, bound to a validated [`CommandSpec`].
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{ArgSpec, CommandSpec, Parser, Value};
///
/// let parser = Parser::new(
///     CommandSpec::new("program").add(ArgSpec::option("verbose").short("-v").count()),
/// )
/// .unwrap();
/// let parsed = parser.parse(&["-vvv"], false).unwrap();
///
/// assert_eq!(parsed.values()["verbose"], Value::Int(3));
/// ```
#[derive(Debug)]
pub struct Parser {
    command: CommandSpec,
}

impl Parser {
    /// Bind the command specification.
    /// This checks the whole command tree for configuration errors (ex: a repeated option spelling).
    pub fn new(command: CommandSpec) -> Result<Self, ConfigError> {
        validate(&command)?;
        Ok(Self { command })
    }

    /// The bound command specification.
    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    /// Run the parse engine against the input tokens (excluding the program name).
    ///
    /// In completion mode the final token is the one under the cursor: meta actions are ignored, the end of parse checks are skipped,
    /// and failures on completable values are answered with completion candidates instead.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S], completion_mode: bool) -> Result<Parsed, Signal> {
        Engine::new(tokens.iter(), completion_mode).run(&self.command)
    }
}
