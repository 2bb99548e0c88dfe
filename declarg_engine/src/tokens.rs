use std::collections::VecDeque;

use crate::constant::END_OF_OPTIONS;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An option-like token, ex: `--verbose`, `-abc`, `--key=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawOption {
    pub raw: String,
    pub name: String,
    pub is_long: bool,
    pub explicit_value: Option<String>,
    pub is_terminal: bool,
}

impl RawOption {
    pub(crate) fn new(raw: &str) -> Self {
        let (name, explicit_value) = split_equals_delimiter(raw);
        Self {
            raw: raw.to_string(),
            name: name.to_string(),
            is_long: name.starts_with("--"),
            explicit_value: explicit_value.map(str::to_string),
            is_terminal: false,
        }
    }
}

/// A bare argument token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawArg {
    pub text: String,
    pub is_terminal: bool,
}

impl RawArg {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_terminal: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Option(RawOption),
    Arg(RawArg),
}

impl Token {
    pub(crate) fn raw(&self) -> &str {
        match self {
            Token::Option(option) => &option.raw,
            Token::Arg(arg) => &arg.text,
        }
    }

    fn mark_terminal(&mut self) {
        match self {
            Token::Option(option) => option.is_terminal = true,
            Token::Arg(arg) => arg.is_terminal = true,
        }
    }
}

/// Turn the raw Cli strings into a queue of typed tokens.
///
/// The first `--` ends option processing: it is dropped, the token before it is marked terminal, and every subsequent token is a bare argument.
/// In completion mode `--` is kept (so that it may be completed), and a lone `-` is option-like.
pub(crate) fn tokenize<S: AsRef<str>>(
    tokens: impl IntoIterator<Item = S>,
    completion_mode: bool,
) -> VecDeque<Token> {
    let mut queue: VecDeque<Token> = VecDeque::default();
    let mut options_ended = false;

    for token in tokens {
        let token = token.as_ref();

        if options_ended {
            queue.push_back(Token::Arg(RawArg::new(token)));
        } else if token == END_OF_OPTIONS && !completion_mode {
            options_ended = true;

            if let Some(previous) = queue.back_mut() {
                previous.mark_terminal();
            }
        } else if token.starts_with('-') && (completion_mode || token.len() > 1) {
            queue.push_back(Token::Option(RawOption::new(token)));
        } else {
            queue.push_back(Token::Arg(RawArg::new(token)));
        }
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Tokenized {} tokens (completion_mode={completion_mode}).", queue.len());
    }

    queue
}

fn split_equals_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn option(raw: &str) -> Token {
        Token::Option(RawOption::new(raw))
    }

    fn arg(text: &str) -> Token {
        Token::Arg(RawArg::new(text))
    }

    fn terminal(mut token: Token) -> Token {
        token.mark_terminal();
        token
    }

    #[test]
    fn tokenize_empty() {
        assert_eq!(tokenize(&[] as &[&str], false), VecDeque::default());
    }

    #[rstest]
    #[case(vec!["a"], vec![arg("a")])]
    #[case(vec!["-"], vec![arg("-")])]
    #[case(vec!["-v"], vec![option("-v")])]
    #[case(vec!["--verbose"], vec![option("--verbose")])]
    #[case(vec!["--key=value", "x"], vec![option("--key=value"), arg("x")])]
    #[case(vec!["a", "--", "-v", "--x"], vec![terminal(arg("a")), arg("-v"), arg("--x")])]
    #[case(vec!["--", "--"], vec![arg("--")])]
    #[case(vec!["--", "a"], vec![arg("a")])]
    #[case(vec!["--flag", "--"], vec![terminal(option("--flag"))])]
    #[case(vec![""], vec![arg("")])]
    fn tokenize_normal(#[case] tokens: Vec<&str>, #[case] expected: Vec<Token>) {
        assert_eq!(tokenize(tokens, false), VecDeque::from(expected));
    }

    #[rstest]
    #[case(vec!["-"], vec![option("-")])]
    #[case(vec!["--"], vec![option("--")])]
    #[case(vec!["a", "--", "-v"], vec![arg("a"), option("--"), option("-v")])]
    #[case(vec![""], vec![arg("")])]
    fn tokenize_completion(#[case] tokens: Vec<&str>, #[case] expected: Vec<Token>) {
        assert_eq!(tokenize(tokens, true), VecDeque::from(expected));
    }

    #[rstest]
    #[case("--verbose", "--verbose", true, None)]
    #[case("--key=", "--key", true, Some(""))]
    #[case("--key=a=b", "--key", true, Some("a=b"))]
    #[case("-k=1", "-k", false, Some("1"))]
    #[case("-abc", "-abc", false, None)]
    fn raw_option(
        #[case] raw: &str,
        #[case] name: &str,
        #[case] is_long: bool,
        #[case] explicit_value: Option<&str>,
    ) {
        let option = RawOption::new(raw);
        assert_eq!(option.raw, raw);
        assert_eq!(option.name, name);
        assert_eq!(option.is_long, is_long);
        assert_eq!(option.explicit_value.as_deref(), explicit_value);
        assert!(!option.is_terminal);
    }
}
