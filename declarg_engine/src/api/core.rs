use crate::api::{Action, ArgSpec, Argument, CommandSpec};
use crate::constant::*;
use crate::parser::{ConfigError, ConsoleInterface, GeneralParser, Parser, UserInterface};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The base command line parser.
///
/// Wraps a [`CommandSpec`] with the standard meta options:
/// * `-h/--help` on every (sub-)command, unless the command already uses those spellings.
/// * `--version`, when configured via [`CommandLineParser::version`].
/// * `--completion`, when enabled via [`CommandLineParser::completion`].
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{ArgSpec, CommandLineParser, CommandSpec, Value};
///
/// let parser = CommandLineParser::new(
///     CommandSpec::new("program").add(ArgSpec::option("verbose").short("-v").count()),
/// )
/// .version("1.2.3")
/// .build();
///
/// let parsed = parser.parse_tokens(&["-vv"]).unwrap();
/// assert_eq!(parsed.values()["verbose"], Value::Int(2));
/// ```
pub struct CommandLineParser {
    command: CommandSpec,
    version: Option<String>,
    completion: bool,
}

impl CommandLineParser {
    /// Create a command line parser for the root command.
    pub fn new(command: CommandSpec) -> Self {
        Self {
            command,
            version: None,
            completion: false,
        }
    }

    /// Add a `--version` option, which displays the `version` and exits.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Add a `--completion` option, which generates (`--completion generate`) or answers (`--completion complete`) shell completions.
    pub fn completion(mut self) -> Self {
        self.completion = true;
        self
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        let mut command = self.command;
        inject_help(&mut command);

        if let Some(version) = self.version {
            command.arguments.push(Argument::Arg(
                ArgSpec::option(VERSION_FIELD)
                    .long(VERSION_LONG)
                    .action(Action::Version)
                    .default(version)
                    .help("Show the version and exit."),
            ));
        }

        if self.completion {
            command.arguments.push(Argument::Arg(
                ArgSpec::option(COMPLETION_FIELD)
                    .long(COMPLETION_LONG)
                    .action(Action::Completion)
                    .choices([COMPLETION_GENERATE, COMPLETION_COMPLETE])
                    .help("Generate or answer shell completions."),
            ));
        }

        Ok(GeneralParser::new(Parser::new(command)?, user_interface))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated field name).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated field name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

// Add `-h/--help` to the command and all its sub-commands, skipping the spellings already in use.
fn inject_help(command: &mut CommandSpec) {
    let spellings: Vec<&str> = [HELP_SHORT, HELP_LONG]
        .into_iter()
        .filter(|spelling| !command.uses_spelling(spelling))
        .collect();
    let field_taken = command.args().any(|arg| arg.field_name() == HELP_FIELD)
        || command
            .subcommands()
            .any(|subcommand| subcommand.field_name() == HELP_FIELD);

    if spellings.is_empty() || field_taken {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Skipping help injection for '{}'.", command.real_name());
        }
    } else {
        let help = spellings.into_iter().fold(
            ArgSpec::option(HELP_FIELD)
                .action(Action::Help)
                .help("Show this help message and exit."),
            |help, spelling| {
                if spelling.starts_with("--") {
                    help.long(spelling)
                } else {
                    help.short(spelling)
                }
            },
        );
        command.arguments.push(Argument::Arg(help));
    }

    for argument in command.arguments.iter_mut() {
        if let Argument::Subcommand(subcommand) = argument {
            subcommand.options.iter_mut().for_each(inject_help);
        }
    }
}
