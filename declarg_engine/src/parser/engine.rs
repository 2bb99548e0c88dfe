use std::collections::VecDeque;

use crate::api::{ActionScope, ArgSpec, CommandSpec, Completion, SubcommandSpec};
use crate::matcher::{expand_short, OptionEntry, ParseContext, Slot};
use crate::model::{Nargs, Value};
use crate::parser::action::{dispatch, Dispatch};
use crate::parser::{BadArgument, Completions, HelpRequest, MatchError, Parsed, Signal};
use crate::tokens::{tokenize, RawArg, RawOption, Token};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The parse state machine.
///
/// Alternates between consuming options and consuming the next declared positional/sub-command until the tokens run out.
/// Each (sub-)command parses on its own `ParseContext`, kept in an arena which mirrors the command stack.
#[derive(Debug)]
pub(crate) struct Engine<'s> {
    tokens: VecDeque<Token>,
    contexts: Vec<ParseContext<'s>>,
    completion_mode: bool,
    commands: Vec<String>,
    deprecations: Vec<String>,
}

impl<'s> Engine<'s> {
    pub(crate) fn new<S: AsRef<str>>(
        tokens: impl IntoIterator<Item = S>,
        completion_mode: bool,
    ) -> Self {
        Self {
            tokens: tokenize(tokens, completion_mode),
            contexts: Vec::default(),
            completion_mode,
            commands: Vec::default(),
            deprecations: Vec::default(),
        }
    }

    pub(crate) fn run(mut self, command: &'s CommandSpec) -> Result<Parsed, Signal> {
        let root = ParseContext::root(command)
            .expect("internal error - the command tree must have been validated");
        let index = self.enter(root);
        self.parse_command(index)?;
        let root = self
            .contexts
            .pop()
            .expect("internal error - the root context must outlive the parse");

        Ok(Parsed {
            commands: self.commands,
            values: root.values,
            deprecations: self.deprecations,
        })
    }

    fn enter(&mut self, context: ParseContext<'s>) -> usize {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Entering context {}: {:?}.", self.contexts.len(), context.path);
        }

        self.commands = context.path.clone();
        self.contexts.push(context);
        self.contexts.len() - 1
    }

    fn parse_command(&mut self, index: usize) -> Result<(), Signal> {
        while let Some(token) = self.tokens.pop_front() {
            match token {
                Token::Option(option) => self.consume_option(index, option)?,
                Token::Arg(arg) => self.consume_slot(index, arg)?,
            }
        }

        self.finalize(index)
    }

    fn consume_option(&mut self, index: usize, option: RawOption) -> Result<(), Signal> {
        let virtual_options = if option.is_long {
            vec![option.clone()]
        } else {
            expand_short(option.clone(), &self.contexts[index])
        };

        if self.at_cursor()
            && virtual_options
                .last()
                .map_or(true, |last| last.explicit_value.is_none())
        {
            // The cursor is on the option name itself.
            return Err(Signal::Completion(Completions::Candidates(
                self.option_candidates(index, &option.name),
            )));
        }

        for virtual_option in virtual_options {
            self.match_option(index, virtual_option)?;
        }

        Ok(())
    }

    // Whether the token just taken is the one under the completion cursor.
    fn at_cursor(&self) -> bool {
        self.completion_mode && self.tokens.is_empty()
    }

    fn match_option(&mut self, index: usize, option: RawOption) -> Result<(), Signal> {
        let entry = match self.contexts[index].options.get(option.name.as_str()) {
            Some(entry) => *entry,
            None => return Err(self.unrecognized_option(index, option)),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Matched option '{}' to '{}' (owner context {}).",
                option.name,
                entry.arg.field_name(),
                entry.owner
            );
        }

        let values = if !entry.arg.consumes_values() {
            Vec::default()
        } else if let Some(value) = option.explicit_value {
            vec![value]
        } else if option.is_terminal {
            Vec::default()
        } else {
            self.take_values(entry.arg.num_args, None)
        };

        self.accept(index, entry, &option.name, values)
    }

    fn unrecognized_option(&self, index: usize, option: RawOption) -> Signal {
        if self.at_cursor() {
            return Signal::Completion(Completions::Candidates(
                self.option_candidates(index, &option.name),
            ));
        }

        let suggestions = self.contexts[index]
            .spellings_starting_with(&option.name)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.failure(
            index,
            None,
            MatchError::UnrecognizedToken {
                tokens: vec![option.name],
                suggestions,
            },
            None,
        )
    }

    fn option_candidates(&self, index: usize, prefix: &str) -> Vec<Completion> {
        let context = &self.contexts[index];
        context
            .spellings_starting_with(prefix)
            .into_iter()
            .map(|spelling| completion(spelling, context.options[spelling].arg.help.as_deref()))
            .collect()
    }

    // Take values off the front of the queue, stopping at an option, a terminal token, or the arity limit.
    fn take_values(&mut self, num_args: Option<Nargs>, first: Option<RawArg>) -> Vec<String> {
        let limit = match num_args {
            None => Some(1),
            Some(Nargs::Precisely(n)) => Some(usize::from(n)),
            Some(Nargs::Any) | Some(Nargs::AtLeastOne) => None,
        };
        let mut values = Vec::default();
        let mut terminal = false;

        if let Some(first) = first {
            terminal = first.is_terminal;
            values.push(first.text);
        }

        while !terminal && limit.map_or(true, |limit| values.len() < limit) {
            let arg = match self.tokens.pop_front() {
                Some(Token::Arg(arg)) => arg,
                Some(token) => {
                    self.tokens.push_front(token);
                    break;
                }
                None => break,
            };
            terminal = arg.is_terminal;
            values.push(arg.text);
        }

        values
    }

    fn consume_slot(&mut self, index: usize, first: RawArg) -> Result<(), Signal> {
        let slot = match self.contexts[index].slots.pop_front() {
            Some(slot) => slot,
            None => {
                let mut tokens = vec![first.text];
                tokens.extend(self.tokens.drain(..).map(|token| token.raw().to_string()));
                return Err(self.failure(
                    index,
                    None,
                    MatchError::UnrecognizedToken {
                        tokens,
                        suggestions: Vec::default(),
                    },
                    None,
                ));
            }
        };

        match slot {
            Slot::Positional(arg) => {
                let values = if arg.consumes_values() {
                    self.take_values(arg.num_args, Some(first))
                } else {
                    self.tokens.push_front(Token::Arg(first));
                    Vec::default()
                };
                let entry = OptionEntry { arg, owner: index };
                self.accept(index, entry, arg.display_name(), values)
            }
            Slot::Subcommand(subcommand) => self.consume_subcommand(index, subcommand, first),
        }
    }

    fn consume_subcommand(
        &mut self,
        index: usize,
        subcommand: &'s SubcommandSpec,
        token: RawArg,
    ) -> Result<(), Signal> {
        let command = match subcommand.find(&token.text) {
            Some(command) => command,
            None => {
                let suggestions: Vec<&CommandSpec> = subcommand
                    .options
                    .iter()
                    .filter(|command| command.real_name.starts_with(&token.text))
                    .collect();

                if self.at_cursor() {
                    return Err(Signal::Completion(Completions::Candidates(
                        suggestions
                            .iter()
                            .map(|command| completion(command.real_name(), command.help_text()))
                            .collect(),
                    )));
                }

                return Err(self.failure(
                    index,
                    Some(subcommand.field_name()),
                    MatchError::InvalidSubcommand {
                        name: token.text.clone(),
                        suggestions: suggestions
                            .iter()
                            .map(|command| command.real_name.clone())
                            .collect(),
                    },
                    Some(token.text),
                ));
            }
        };

        if let Some(deprecated) = &command.deprecated {
            self.deprecations
                .push(deprecated.notice(&format!("Command '{}'", command.real_name)));
        }

        let child = ParseContext::child(command, self.contexts.len(), index, &self.contexts[index])
            .expect("internal error - the command tree must have been validated");
        let child_index = self.enter(child);
        self.parse_command(child_index)?;
        let child = self
            .contexts
            .pop()
            .expect("internal error - the sub-command context must outlive its parse");
        debug_assert_eq!(self.contexts.len(), child_index);
        debug_assert_eq!(child.parent, Some(index));

        self.contexts[index].values.insert(
            subcommand.field_name.clone(),
            Value::Command {
                name: command.real_name.clone(),
                values: child.values,
            },
        );

        Ok(())
    }

    fn accept(
        &mut self,
        index: usize,
        entry: OptionEntry<'s>,
        spelling: &str,
        values: Vec<String>,
    ) -> Result<(), Signal> {
        let arg = entry.arg;

        if self.at_cursor() {
            // The cursor is on the final value.
            if let (Some(partial), Some(completer)) = (values.last(), arg.completer()) {
                return Err(Signal::Completion(Completions::Candidates(
                    completer.complete(partial),
                )));
            }
        }

        if arg.consumes_values() {
            if let Err((error, value)) = check_values(arg, &values) {
                return Err(self.reject(index, arg, error, value));
            }
        }

        if self.completion_mode && arg.action.is_meta() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Ignoring meta option '{spelling}' in completion mode.");
            }

            return Ok(());
        }

        if let Some(existing) = self.claim_exclusive(entry, spelling) {
            return Err(self.reject(
                index,
                arg,
                MatchError::MutuallyExclusiveConflict {
                    spelling: spelling.to_string(),
                    existing,
                },
                None,
            ));
        }

        let last = values.last().cloned();
        let outcome = {
            let scope = ActionScope {
                field_name: arg.field_name(),
                prior: self.contexts[entry.owner].values.get(arg.field_name()),
                command: &self.contexts[index].path,
            };
            dispatch(arg, values, &scope)
        };

        match outcome {
            Ok(Dispatch::Store(value)) => {
                let owner = &mut self.contexts[entry.owner];
                owner.missing.remove(arg.field_name());
                owner.values.insert(arg.field_name.clone(), value);

                if let Some(deprecated) = &arg.deprecated {
                    self.deprecations.push(deprecated.notice(&arg.subject()));
                }

                Ok(())
            }
            Ok(Dispatch::Help) => Err(Signal::Help(HelpRequest {
                command: self.contexts[index].path.clone(),
            })),
            Ok(Dispatch::Version(version)) => Err(Signal::Version(version)),
            Ok(Dispatch::Completion(command)) => Err(Signal::CompletionCommand(command)),
            Err(error) => Err(self.reject(index, arg, error, last)),
        }
    }

    // Record the group's chosen member in the owner context, returning the spelling of a conflicting prior member.
    fn claim_exclusive(&mut self, entry: OptionEntry<'s>, spelling: &str) -> Option<String> {
        let arg = entry.arg;
        let group = arg.group.as_ref().filter(|group| group.is_exclusive())?;
        let owner = &mut self.contexts[entry.owner];

        match owner.exclusive.get(group.name()) {
            Some((field, existing)) if *field != arg.field_name() => Some(existing.clone()),
            Some(_) => None,
            None => {
                owner
                    .exclusive
                    .insert(group.name(), (arg.field_name(), spelling.to_string()));
                None
            }
        }
    }

    fn finalize(&mut self, index: usize) -> Result<(), Signal> {
        if self.completion_mode {
            return Ok(());
        }

        while let Some(slot) = self.contexts[index].slots.pop_front() {
            match slot {
                Slot::Positional(arg) if arg.required => {
                    if arg.num_args == Some(Nargs::Any) {
                        self.contexts[index]
                            .values
                            .insert(arg.field_name.clone(), Value::List(Vec::default()));
                    } else {
                        return Err(self.reject(
                            index,
                            arg,
                            MatchError::MissingRequiredValue {
                                subject: arg.subject(),
                            },
                            None,
                        ));
                    }
                }
                Slot::Subcommand(subcommand) if subcommand.required => {
                    return Err(self.failure(
                        index,
                        Some(subcommand.field_name()),
                        MatchError::MissingSubcommand {
                            names: subcommand.names().map(str::to_string).collect(),
                        },
                        None,
                    ));
                }
                _ => {}
            }
        }

        let context = &self.contexts[index];
        let missing: Vec<&ArgSpec> = context
            .missing
            .iter()
            .map(|field| {
                context
                    .command
                    .args()
                    .find(|arg| arg.field_name() == *field)
                    .expect("internal error - missing fields must be declared by the command")
            })
            .collect();

        if let Some(first) = missing.first() {
            let names = missing
                .iter()
                .map(|arg| arg.display_name().to_string())
                .collect();
            return Err(self.reject(
                index,
                first,
                MatchError::RequiredOptionsMissing { names },
                None,
            ));
        }

        let command = self.contexts[index].command;
        let values = &mut self.contexts[index].values;

        for arg in command.args() {
            if arg.action.is_meta() || values.contains_key(arg.field_name()) {
                continue;
            }

            if let Some(default) = &arg.default {
                values.insert(arg.field_name.clone(), default.clone());
            }
        }

        Ok(())
    }

    // Reject the input on account of the argument/option.
    // When the argument under the completion cursor is completable, it answers with its candidates instead.
    fn reject(
        &self,
        index: usize,
        arg: &ArgSpec,
        error: MatchError,
        value: Option<String>,
    ) -> Signal {
        if self.at_cursor() {
            if let Some(completer) = arg.completer() {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Converting '{error}' into completions for '{}'.", arg.field_name());
                }

                let partial = value.as_deref().unwrap_or_default();
                return Signal::Completion(Completions::Candidates(completer.complete(partial)));
            }
        }

        self.failure(index, Some(arg.field_name()), error, value)
    }

    fn failure(
        &self,
        index: usize,
        arg: Option<&str>,
        error: MatchError,
        value: Option<String>,
    ) -> Signal {
        Signal::Failure(BadArgument {
            error,
            command: self.contexts[index].path.clone(),
            arg: arg.map(str::to_string),
            value,
        })
    }
}

fn completion(value: &str, help: Option<&str>) -> Completion {
    match help {
        Some(help) => Completion::new(value).help(help),
        None => Completion::new(value),
    }
}

// Check the value count and choices, returning the error with its offending value.
fn check_values(arg: &ArgSpec, values: &[String]) -> Result<(), (MatchError, Option<String>)> {
    let required = match arg.num_args {
        None | Some(Nargs::AtLeastOne) => 1,
        Some(Nargs::Precisely(n)) => n,
        Some(Nargs::Any) => 0,
    };

    if required > 0 && values.is_empty() {
        return Err((
            MatchError::MissingRequiredValue {
                subject: arg.subject(),
            },
            None,
        ));
    }

    if matches!(arg.num_args, Some(Nargs::Precisely(_))) && values.len() < usize::from(required) {
        return Err((
            MatchError::ArityMismatch {
                subject: arg.subject(),
                required,
                found: values.len(),
                values: values.to_vec(),
            },
            values.last().cloned(),
        ));
    }

    if !arg.choices.is_empty() {
        if let Some(value) = values.iter().find(|value| !arg.choices.contains(value)) {
            return Err((
                MatchError::InvalidChoice {
                    value: value.clone(),
                    choices: arg.choices.clone(),
                },
                Some(value.clone()),
            ));
        }
    }

    Ok(())
}
