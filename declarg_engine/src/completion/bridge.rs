use crate::parser::{Completions, Parser, Signal};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Split the command line typed so far, program name included.
///
/// Quoting is honoured the way a shell would.
/// An unbalanced quote (the user is mid-way through typing it) is closed at the end of the line, so the partial token loses its opening quote.
/// A trailing space outside of any quote means the cursor sits on a new, empty token.
pub(crate) fn split_line(line: &str) -> Vec<String> {
    let line = line.replace('\n', " ");

    match shell_words::split(&line) {
        Ok(mut tokens) => {
            if line.ends_with(' ') {
                tokens.push(String::default());
            }

            tokens
        }
        Err(_) => ["'", "\""]
            .iter()
            .find_map(|quote| shell_words::split(&format!("{line}{quote}")).ok())
            .unwrap_or_else(|| line.split_whitespace().map(str::to_string).collect()),
    }
}

/// Answer a completion query against the parser.
///
/// `line` is the command line typed so far (program name included) and `location` the index of the token under the cursor (the program name being `0`).
/// Without a `location`, the cursor is taken to be on the final token.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{complete_line, ArgSpec, CommandSpec, Parser};
///
/// let parser = Parser::new(
///     CommandSpec::new("program")
///         .add(ArgSpec::option("verbose").long("--verbose").store_true())
///         .add(ArgSpec::option("version").long("--version").store_true()),
/// )
/// .unwrap();
///
/// assert_eq!(
///     complete_line(&parser, "program --ver", Some(1)).to_string(),
///     "--verbose:\n--version:"
/// );
/// ```
pub fn complete_line(parser: &Parser, line: &str, location: Option<usize>) -> Completions {
    let tokens = split_line(line);
    let end = location
        .unwrap_or_else(|| tokens.len().saturating_sub(1))
        .min(tokens.len().saturating_sub(1));
    let arguments = tokens.get(1..=end).unwrap_or_default();

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Completing {arguments:?} (from {tokens:?}).");
    }

    match parser.parse(arguments, true) {
        Ok(_) => Completions::File,
        Err(Signal::Completion(completions)) => completions,
        Err(_) => Completions::Candidates(Vec::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Action, ArgSpec, CommandSpec, SubcommandSpec};
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("program", vec!["program"])]
    #[case("program ", vec!["program", ""])]
    #[case("program --ver", vec!["program", "--ver"])]
    #[case("program 'a b' c", vec!["program", "a b", "c"])]
    #[case("program \"a b", vec!["program", "a b"])]
    #[case("program 'a b ", vec!["program", "a b "])]
    #[case("program 'a \"b", vec!["program", "a \"b"])]
    #[case("program \"a 'b", vec!["program", "a 'b"])]
    #[case("program \"", vec!["program", ""])]
    #[case("program a\nb", vec!["program", "a", "b"])]
    #[case("program a\n", vec!["program", "a", ""])]
    fn split(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_line(line), expected);
    }

    fn parser() -> Parser {
        Parser::new(
            CommandSpec::new("program")
                .add(ArgSpec::option("verbose").long("--verbose").store_true())
                .add(ArgSpec::option("version").long("--version").action(Action::Version))
                .add(ArgSpec::option("colour").long("--colour").choices(vec!["red", "green"]).help("The colour."))
                .subcommand(
                    SubcommandSpec::new("command")
                        .command(CommandSpec::new("alpha").help("First\ncommand."))
                        .command(CommandSpec::new("beta").add(ArgSpec::positional("path"))),
                ),
        )
        .unwrap()
    }

    #[rstest]
    #[case("program --ver", Some(1), "--verbose:\n--version:")]
    #[case("program --ver", None, "--verbose:\n--version:")]
    #[case("program --verbose --ver", Some(1), "--verbose:")]
    #[case("program --verbose ", Some(2), "alpha:First command.\nbeta:")]
    #[case("program ", None, "alpha:First command.\nbeta:")]
    #[case("program b", Some(1), "beta:")]
    #[case("program --colour g", Some(2), "green:")]
    #[case("program --colour ", Some(2), "red:\ngreen:")]
    #[case("program beta ", Some(2), "file")]
    #[case("program beta some/pa", Some(2), "file")]
    #[case("program beta a b", Some(3), "")]
    #[case("program", Some(0), "file")]
    #[case("program --colour 'gr", Some(2), "green:")]
    #[case("program --colour \"gr", Some(2), "green:")]
    #[case("program --colour 'r", None, "red:")]
    #[case("program --colour=\"g", Some(1), "green:")]
    #[case("program --verb alpha", Some(2), "")]
    #[case("program al x", Some(2), "")]
    fn complete(#[case] line: &str, #[case] location: Option<usize>, #[case] expected: &str) {
        assert_eq!(complete_line(&parser(), line, location).to_string(), expected);
    }

    #[test]
    fn complete_beyond_line() {
        assert_eq!(
            complete_line(&parser(), "program --ver", Some(7)),
            complete_line(&parser(), "program --ver", Some(1))
        );
    }
}
