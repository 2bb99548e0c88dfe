use crate::api::{Action, ActionScope, ArgSpec};
use crate::constant::{COMPLETION_COMPLETE, COMPLETION_GENERATE};
use crate::model::{Nargs, Value};
use crate::parser::{CompletionCommand, MatchError};

/// What the engine should do with a matched argument/option.
#[derive(Debug, PartialEq)]
pub(crate) enum Dispatch {
    Store(Value),
    Help,
    Version(String),
    Completion(CompletionCommand),
}

/// Combine the raw value(s) of a matched argument/option with its prior state.
///
/// The caller has already validated the value count and choices.
pub(crate) fn dispatch(
    arg: &ArgSpec,
    values: Vec<String>,
    scope: &ActionScope<'_>,
) -> Result<Dispatch, MatchError> {
    match &arg.action {
        Action::Set => Ok(Dispatch::Store(collect(arg.num_args, values))),
        Action::StoreTrue => Ok(Dispatch::Store(Value::Bool(true))),
        Action::StoreFalse => Ok(Dispatch::Store(Value::Bool(false))),
        Action::Count => {
            let prior = scope.prior().and_then(Value::as_int).unwrap_or(0);
            Ok(Dispatch::Store(Value::Int(prior + 1)))
        }
        Action::Append => {
            let mut items = match scope.prior() {
                Some(Value::List(items)) => items.clone(),
                _ => Vec::default(),
            };
            items.push(collect(arg.num_args, values));
            Ok(Dispatch::Store(Value::List(items)))
        }
        Action::Help => Ok(Dispatch::Help),
        Action::Version => Ok(Dispatch::Version(
            arg.default
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        )),
        Action::Completion => match values.first().map(String::as_str) {
            Some(COMPLETION_GENERATE) => Ok(Dispatch::Completion(CompletionCommand::Generate)),
            Some(COMPLETION_COMPLETE) => Ok(Dispatch::Completion(CompletionCommand::Complete)),
            other => Err(MatchError::InvalidChoice {
                value: other.unwrap_or_default().to_string(),
                choices: vec![
                    COMPLETION_GENERATE.to_string(),
                    COMPLETION_COMPLETE.to_string(),
                ],
            }),
        },
        Action::Custom(custom) => custom
            .apply(&values, scope)
            .map(Dispatch::Store)
            .map_err(MatchError::Custom),
    }
}

// Single value forms store a scalar, every other arity a list.
fn collect(num_args: Option<Nargs>, values: Vec<String>) -> Value {
    match num_args {
        None => Value::Str(
            values
                .into_iter()
                .next()
                .expect("internal error - single value must have been collected"),
        ),
        Some(_) => Value::List(values.into_iter().map(Value::Str).collect()),
    }
}
