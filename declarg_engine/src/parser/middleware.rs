use std::collections::HashMap;
use std::env;

use crate::api::{ArgSpec, Argument, CommandSpec};
use crate::completion::{complete_line, Shell};
use crate::constant::*;
use crate::model::Nargs;
use crate::parser::{
    BadArgument, CompletionCommand, Completions, MatchError, Parsed, Parser, Signal, UserInterface,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The configured command line parser.
/// Built via [`CommandLineParser::build`](crate::CommandLineParser::build).
pub struct GeneralParser {
    parser: Parser,
    user_interface: Box<dyn UserInterface>,
    environment: HashMap<String, String>,
}

impl std::fmt::Debug for GeneralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("program", &self.parser.command().real_name())
            .finish()
    }
}

impl GeneralParser {
    pub(crate) fn new(parser: Parser, user_interface: Box<dyn UserInterface>) -> Self {
        Self {
            parser,
            user_interface,
            environment: HashMap::default(),
        }
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Override environment variables (ex: `COMPLETION_LINE`) as seen by this parser.
    #[cfg(any(test, feature = "unit_test"))]
    pub fn with_environment<K: Into<String>, V: Into<String>>(
        mut self,
        variables: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.environment
            .extend(variables.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        self.environment
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    /// Run the command line parser against the input tokens.
    ///
    /// On success, any deprecation warnings are displayed and the [`Parsed`] result is returned.
    ///
    /// If the parser encounters an error (ex: un-matched token, missing required option, etc), it will display the error and return with `Err(1)`.
    ///
    /// If help (`-h` or `--help`), version (`--version`), or completion (`--completion`) is requested,
    /// the parser will display the corresponding output and return with `Err(0)`.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<Parsed, i32> {
        match self.parser.parse(tokens, false) {
            Ok(parsed) => {
                for warning in parsed.deprecations() {
                    self.user_interface.print_warning(warning.clone());
                }

                Ok(parsed)
            }
            Err(signal) => Err(self.exit(signal)),
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// Behaves as [`GeneralParser::parse_tokens`], except an `Err(code)` exits the process with that code (via [`std::process::exit`]).
    pub fn parse(&self) -> Parsed {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(parsed) => parsed,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }

    fn exit(&self, signal: Signal) -> i32 {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Exiting on {signal:?}.");
        }

        match signal {
            Signal::Help(request) => {
                self.user_interface
                    .print(render_help(self.find(request.command()), &request.display_name()));
                0
            }
            Signal::Version(version) => {
                self.user_interface.print(version);
                0
            }
            Signal::Completion(completions) => {
                self.user_interface.print(completions.to_string());
                0
            }
            Signal::CompletionCommand(CompletionCommand::Generate) => self.generate(),
            Signal::CompletionCommand(CompletionCommand::Complete) => {
                self.user_interface.print(self.complete().to_string());
                0
            }
            Signal::Failure(error) => {
                self.user_interface.print_error(error);
                1
            }
        }
    }

    fn generate(&self) -> i32 {
        let program = self.parser.command().real_name();
        let shell = self.var(SHELL_VAR).unwrap_or_default();

        match Shell::detect(&shell) {
            Ok(shell) => {
                self.user_interface.print(shell.script(program));
                0
            }
            Err(error) => {
                self.user_interface.print_error(BadArgument {
                    error: MatchError::Custom(error.to_string()),
                    command: vec![program.to_string()],
                    arg: Some(COMPLETION_FIELD.to_string()),
                    value: Some(shell),
                });
                1
            }
        }
    }

    fn complete(&self) -> Completions {
        let line = self.var(COMPLETION_LINE_VAR).unwrap_or_default();
        let location = self
            .var(COMPLETION_LOCATION_VAR)
            .and_then(|location| location.trim().parse::<usize>().ok());
        complete_line(&self.parser, &line, location)
    }

    fn find(&self, path: &[String]) -> &CommandSpec {
        let mut command = self.parser.command();

        for name in path.iter().skip(1) {
            command = command
                .subcommands()
                .find_map(|subcommand| subcommand.find(name))
                .expect("internal error - the help path must name declared sub-commands");
        }

        command
    }
}

fn render_help(command: &CommandSpec, display_name: &str) -> String {
    let mut synopsis = vec![display_name.to_string()];
    let mut entries: Vec<(String, String)> = Vec::default();

    for argument in command.arguments() {
        match argument {
            Argument::Arg(arg) => {
                let usage = usage(arg);
                synopsis.push(if arg.required || arg.is_positional() {
                    usage.clone()
                } else {
                    format!("[{usage}]")
                });
                let names = if arg.is_positional() {
                    usage
                } else {
                    arg.spellings().cloned().collect::<Vec<String>>().join(", ")
                };
                entries.push((names, arg.help.clone().unwrap_or_default()));
            }
            Argument::Subcommand(subcommand) if !subcommand.is_hidden() => {
                let names = format!("{{{}}}", subcommand.names().collect::<Vec<&str>>().join(","));
                synopsis.push(names.clone());
                entries.push((names, String::default()));

                for option in &subcommand.options {
                    entries.push((
                        format!("  {}", option.real_name()),
                        option.help_text().unwrap_or_default().to_string(),
                    ));
                }
            }
            Argument::Subcommand(_) => {}
        }
    }

    let mut lines = vec![format!("usage: {}", synopsis.join(" "))];

    for paragraph in [command.help_text(), command.description_text()]
        .into_iter()
        .flatten()
    {
        lines.push(String::default());
        lines.push(paragraph.to_string());
    }

    if !entries.is_empty() {
        let width = entries.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
        lines.push(String::default());

        for (left, right) in entries {
            lines.push(format!(" {left:width$}  {right}").trim_end().to_string());
        }
    }

    lines.join("\n")
}

fn usage(arg: &ArgSpec) -> String {
    let value = if arg.is_positional() {
        arg.value_name.clone()
    } else if arg.consumes_values() {
        format!("{} {}", arg.display_name(), arg.value_name)
    } else {
        return arg.display_name().to_string();
    };

    match arg.num_args {
        Some(Nargs::Any) | Some(Nargs::AtLeastOne) => format!("{value} [...]"),
        _ => value,
    }
}
