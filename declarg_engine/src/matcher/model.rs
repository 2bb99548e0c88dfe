use std::collections::{BTreeSet, HashMap, VecDeque};
use thiserror::Error;

use crate::api::{ArgSpec, Argument, CommandSpec, SubcommandSpec};
use crate::model::ValueMap;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TableError {
    #[error("Command '{command}' cannot duplicate the option '{spelling}'.")]
    DuplicateOption { command: String, spelling: String },

    #[error("Command '{command}' cannot duplicate the parameter '{field}'.")]
    DuplicateField { command: String, field: String },

    #[error("Command '{command}' cannot propagate the positional argument '{field}'.")]
    PropagatedPositional { command: String, field: String },

    #[error("Command '{command}' has an invalid spelling '{spelling}' for '{field}'.")]
    InvalidSpelling {
        command: String,
        field: String,
        spelling: String,
    },

    #[error("Command '{command}' cannot duplicate the sub-command '{name}'.")]
    DuplicateSubcommand { command: String, name: String },
}

/// An option table entry: the option, and the arena index of the context which declares it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OptionEntry<'s> {
    pub arg: &'s ArgSpec,
    pub owner: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Slot<'s> {
    Positional(&'s ArgSpec),
    Subcommand(&'s SubcommandSpec),
}

/// The mutable parse state of one command on the command stack.
///
/// Contexts live in an arena (`Vec<ParseContext>`) and refer to their parent by index.
#[derive(Debug)]
pub(crate) struct ParseContext<'s> {
    pub command: &'s CommandSpec,
    pub path: Vec<String>,
    pub parent: Option<usize>,
    pub slots: VecDeque<Slot<'s>>,
    pub options: HashMap<&'s str, OptionEntry<'s>>,
    // Declaration order, own options first; drives suggestions & completions.
    pub spellings: Vec<&'s str>,
    pub missing: BTreeSet<&'s str>,
    // Exclusive group name -> (field, spelling) of the member already chosen.
    pub exclusive: HashMap<&'s str, (&'s str, String)>,
    pub values: ValueMap,
}

impl<'s> ParseContext<'s> {
    pub(crate) fn root(command: &'s CommandSpec) -> Result<Self, TableError> {
        Self::build(command, vec![command.real_name.clone()], 0, None)
    }

    pub(crate) fn child(
        command: &'s CommandSpec,
        index: usize,
        parent_index: usize,
        parent: &ParseContext<'s>,
    ) -> Result<Self, TableError> {
        let mut path = parent.path.clone();
        path.push(command.real_name.clone());
        Self::build(command, path, index, Some((parent_index, parent)))
    }

    fn build(
        command: &'s CommandSpec,
        path: Vec<String>,
        index: usize,
        parent: Option<(usize, &ParseContext<'s>)>,
    ) -> Result<Self, TableError> {
        let mut slots = VecDeque::default();
        let mut options: HashMap<&'s str, OptionEntry<'s>> = HashMap::default();
        let mut spellings = Vec::default();
        let mut missing = BTreeSet::default();
        let mut fields = BTreeSet::default();

        for argument in &command.arguments {
            match argument {
                Argument::Arg(arg) => {
                    if !fields.insert(arg.field_name.as_str()) {
                        return Err(TableError::DuplicateField {
                            command: command.real_name.clone(),
                            field: arg.field_name.clone(),
                        });
                    }

                    if arg.is_positional() {
                        if arg.propagate {
                            return Err(TableError::PropagatedPositional {
                                command: command.real_name.clone(),
                                field: arg.field_name.clone(),
                            });
                        }

                        slots.push_back(Slot::Positional(arg));
                        continue;
                    }

                    for spelling in arg.spellings() {
                        validate_spelling(command, arg, spelling)?;

                        if options
                            .insert(spelling.as_str(), OptionEntry { arg, owner: index })
                            .is_some()
                        {
                            return Err(TableError::DuplicateOption {
                                command: command.real_name.clone(),
                                spelling: spelling.clone(),
                            });
                        }

                        spellings.push(spelling.as_str());
                    }

                    if arg.required && !arg.action.is_meta() {
                        missing.insert(arg.field_name.as_str());
                    }
                }
                Argument::Subcommand(subcommand) => {
                    if !fields.insert(subcommand.field_name.as_str()) {
                        return Err(TableError::DuplicateField {
                            command: command.real_name.clone(),
                            field: subcommand.field_name.clone(),
                        });
                    }

                    let mut names = BTreeSet::default();

                    for name in subcommand.names() {
                        if !names.insert(name) {
                            return Err(TableError::DuplicateSubcommand {
                                command: command.real_name.clone(),
                                name: name.to_string(),
                            });
                        }
                    }

                    slots.push_back(Slot::Subcommand(subcommand));
                }
            }
        }

        if let Some((parent_index, parent)) = parent {
            // Inherit (without overriding) the propagated options visible to the parent.
            for spelling in &parent.spellings {
                let entry = parent.options[spelling];

                if entry.arg.propagate && !options.contains_key(spelling) {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!(
                            "Propagating '{spelling}' from context {} (via {parent_index}) into context {index}.",
                            entry.owner
                        );
                    }

                    debug_assert!(entry.owner <= parent_index);
                    options.insert(*spelling, entry);
                    spellings.push(*spelling);
                }
            }
        }

        Ok(Self {
            command,
            path,
            parent: parent.map(|(parent_index, _)| parent_index),
            slots,
            options,
            spellings,
            missing,
            exclusive: HashMap::default(),
            values: ValueMap::default(),
        })
    }

    /// The spellings that start with `prefix`, in declaration order.
    pub(crate) fn spellings_starting_with(&self, prefix: &str) -> Vec<&'s str> {
        self.spellings
            .iter()
            .filter(|spelling| spelling.starts_with(prefix))
            .copied()
            .collect()
    }
}

fn validate_spelling(
    command: &CommandSpec,
    arg: &ArgSpec,
    spelling: &str,
) -> Result<(), TableError> {
    let is_short = arg.short.iter().any(|s| s == spelling);
    let valid = if is_short {
        spelling.len() > 1 && spelling.starts_with('-') && !spelling.starts_with("--")
    } else {
        spelling.len() > 2 && spelling.starts_with("--")
    };

    if valid && !spelling.contains('=') {
        Ok(())
    } else {
        Err(TableError::InvalidSpelling {
            command: command.real_name.clone(),
            field: arg.field_name.clone(),
            spelling: spelling.to_string(),
        })
    }
}

/// Construct every context reachable in the command tree, surfacing any configuration error up front.
pub(crate) fn validate(command: &CommandSpec) -> Result<(), TableError> {
    let root = ParseContext::root(command)?;
    validate_children(&root, 0)
}

fn validate_children(context: &ParseContext<'_>, index: usize) -> Result<(), TableError> {
    for subcommand in context.command.subcommands() {
        for command in &subcommand.options {
            let child = ParseContext::child(command, index + 1, index, context)?;
            validate_children(&child, index + 1)?;
        }
    }

    Ok(())
}
