use declarg::{
    complete_line, Action, ArgSpec, CommandLineParser, CommandSpec, Completer, Completion,
    Completions, Deprecated, Group, MatchError, Nargs, Parsed, Parser, Signal, SubcommandSpec,
    Value,
};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use rstest::rstest;

#[macro_use]
extern crate assert_matches;

fn parse<S: AsRef<str>>(command: CommandSpec, tokens: &[S]) -> Result<Parsed, Signal> {
    Parser::new(command).unwrap().parse(tokens, false)
}

fn failure(result: Result<Parsed, Signal>) -> (MatchError, String) {
    match result {
        Err(Signal::Failure(error)) => (error.error().clone(), error.to_string()),
        other => panic!("expected a failure, got: {other:?}"),
    }
}

fn flags() -> CommandSpec {
    CommandSpec::new("program")
        .add(ArgSpec::option("verbose").short("-v").long("--verbose").count())
        .add(ArgSpec::option("force").short("-f").store_true())
        .add(ArgSpec::option("config").short("-c").long("--config"))
        .add(ArgSpec::option("pair").short("-p").num_args(Nargs::Precisely(2)))
        .add(ArgSpec::option("items").short("-i").num_args(Nargs::Any))
        .add(ArgSpec::option("names").short("-n").append())
}

#[rstest]
#[case(vec!["-vf"], vec!["-v", "-f"])]
#[case(vec!["-vfc", "x"], vec!["-v", "-f", "-c", "x"])]
#[case(vec!["-fcx"], vec!["-f", "-c", "x"])]
#[case(vec!["-vp", "a", "b"], vec!["-v", "-p", "a", "b"])]
#[case(vec!["-vi", "a", "b", "c"], vec!["-v", "-i", "a", "b", "c"])]
#[case(vec!["-fnx", "-vn", "y"], vec!["-f", "-n", "x", "-v", "-n", "y"])]
fn short_expansion_matches_spread(#[case] bundled: Vec<&str>, #[case] spread: Vec<&str>) {
    // Execute
    let bundled = parse(flags(), &bundled).unwrap();
    let spread = parse(flags(), &spread).unwrap();

    // Verify
    assert_eq!(bundled.values(), spread.values());
}

#[test]
fn fixed_arity_yields_exact_length() {
    for _ in 0..10 {
        // Setup
        let n: u8 = thread_rng().gen_range(2..8);
        let command = CommandSpec::new("program")
            .add(ArgSpec::option("tuple").long("--tuple").num_args(Nargs::Precisely(n)))
            .add(ArgSpec::positional("rest").num_args(Nargs::Any));
        let mut tokens = vec!["--tuple".to_string()];
        tokens.extend((0..n + 2).map(|i| format!("v{i}")));

        // Execute
        let parsed = parse(command, &tokens).unwrap();

        // Verify
        assert_eq!(parsed.values()["tuple"].as_list().unwrap().len(), usize::from(n));
        assert_eq!(parsed.values()["rest"].as_list().unwrap().len(), 2);
    }
}

#[rstest]
#[case(Some("--flag"))]
#[case(Some("--"))]
#[case(None)]
fn greedy_arity_stops_at_boundary(#[case] boundary: Option<&str>) {
    for _ in 0..10 {
        // Setup
        let n: usize = thread_rng().gen_range(0..8);
        let command = CommandSpec::new("program")
            .add(ArgSpec::option("items").long("--items").num_args(Nargs::Any))
            .add(ArgSpec::option("flag").long("--flag").store_true())
            .add(ArgSpec::positional("rest").num_args(Nargs::Any));
        let mut tokens = vec!["--items".to_string()];
        tokens.extend((0..n).map(|i| format!("v{i}")));
        tokens.extend(boundary.map(str::to_string));
        tokens.push("after".to_string());

        // Execute
        let parsed = parse(command, &tokens).unwrap();

        // Verify
        let expected = if boundary.is_some() { n } else { n + 1 };
        assert_eq!(parsed.values()["items"].as_list().unwrap().len(), expected);
    }
}

#[test]
fn required_options_aggregated_by_field() {
    for _ in 0..10 {
        // Setup
        let k: usize = thread_rng().gen_range(2..8);
        let mut fields: Vec<usize> = (0..k).collect();
        fields.shuffle(&mut thread_rng());
        let command = fields.iter().fold(CommandSpec::new("program"), |command, i| {
            command.add(ArgSpec::option(format!("f{i}")).long(format!("--opt-{i}")).required())
        });

        // Execute
        let (error, _) = failure(parse(command, &Vec::<String>::default()));

        // Verify
        let expected: Vec<String> = (0..k).map(|i| format!("--opt-{i}")).collect();
        assert_eq!(error, MatchError::RequiredOptionsMissing { names: expected });
    }
}

#[rstest]
#[case(vec!["--json", "--yaml"], Some("\"--yaml\" not allowed with \"--json\""))]
#[case(vec!["--yaml", "--json"], Some("\"--json\" not allowed with \"--yaml\""))]
#[case(vec!["--json"], None)]
#[case(vec!["--yaml"], None)]
#[case(vec!["--json", "--json"], None)]
fn exclusive_group(#[case] tokens: Vec<&str>, #[case] expected: Option<&str>) {
    // Setup
    let output = Group::new("output").exclusive();
    let command = CommandSpec::new("program")
        .add(ArgSpec::option("json").long("--json").store_true().group(output.clone()))
        .add(ArgSpec::option("yaml").long("--yaml").store_true().group(output));

    // Execute
    let result = parse(command, &tokens);

    // Verify
    match expected {
        Some(message) => {
            let (error, display) = failure(result);
            assert_matches!(error, MatchError::MutuallyExclusiveConflict { .. });
            assert_eq!(display, format!("Parse error: {message}"));
        }
        None => {
            result.unwrap();
        }
    }
}

#[test]
fn exclusive_group_verbosity() {
    // Setup
    let verbosity = Group::new("verbosity").exclusive();
    let command = CommandSpec::new("program")
        .add(ArgSpec::option("verbose").short("-v").long("--verbose").count().group(verbosity.clone()))
        .add(ArgSpec::option("verbosity").long("--verbosity").group(verbosity));

    // Execute
    let (_, display) = failure(parse(command, &["-vv", "--verbosity", "3"]));

    // Verify
    assert_eq!(display, "Parse error: \"--verbosity\" not allowed with \"-v\"");
}

fn remote() -> CommandSpec {
    CommandSpec::new("remote")
        .add(ArgSpec::option("profile").long("--profile").propagate())
        .add(ArgSpec::option("debug").short("-d").store_true().propagate())
        .subcommand(
            SubcommandSpec::new("command")
                .command(
                    CommandSpec::new("push")
                        .add(ArgSpec::option("profile").long("--profile"))
                        .add(ArgSpec::positional("target")),
                )
                .command(CommandSpec::new("pull").deprecated(Deprecated::Notice)),
        )
}

#[rstest]
#[case(vec!["--profile", "a", "push", "t"], Some("a"), None)]
#[case(vec!["push", "t", "--profile", "b"], None, Some("b"))]
#[case(vec!["--profile", "a", "push", "--profile", "b", "t"], Some("a"), Some("b"))]
#[case(vec!["--profile", "a", "--profile", "c", "push", "t"], Some("c"), None)]
fn propagation_precedence(
    #[case] tokens: Vec<&str>,
    #[case] parent: Option<&str>,
    #[case] child: Option<&str>,
) {
    // Execute
    let parsed = parse(remote(), &tokens).unwrap();

    // Verify
    assert_eq!(parsed.values().get("profile"), parent.map(Value::from).as_ref());
    let (name, values) = parsed.values()["command"].as_command().unwrap();
    assert_eq!(name, "push");
    assert_eq!(values.get("profile"), child.map(Value::from).as_ref());
}

#[test]
fn propagation_stores_in_owner() {
    // Execute
    let parsed = parse(remote(), &["pull", "-d"]).unwrap();

    // Verify
    assert_eq!(parsed.values()["debug"], Value::Bool(true));
    assert_eq!(parsed.commands(), &["remote".to_string(), "pull".to_string()]);
    assert_eq!(parsed.deprecations(), &["Command 'pull' is deprecated.".to_string()]);
}

#[test]
fn count_round_trip() {
    for _ in 0..10 {
        // Setup
        let n: usize = thread_rng().gen_range(1..16);
        let token = format!("-{}", "v".repeat(n));

        // Execute
        let parsed = parse(flags(), &[token]).unwrap();

        // Verify
        assert_eq!(parsed.values()["verbose"], Value::Int(n as i64));
    }
}

#[test]
fn append_round_trip() {
    for _ in 0..10 {
        // Setup
        let k: usize = thread_rng().gen_range(1..10);
        let command = CommandSpec::new("program").add(ArgSpec::option("tag").long("--tag").append());
        let tags: Vec<String> = (0..k).map(|i| format!("t{i}")).collect();
        let tokens: Vec<&str> = tags.iter().flat_map(|tag| ["--tag", tag.as_str()]).collect();

        // Execute
        let parsed = parse(command, &tokens).unwrap();

        // Verify
        assert_eq!(parsed.values()["tag"], Value::strings(tags));
    }
}

#[test]
fn tuple_positional_arity() {
    // Setup
    let command = CommandSpec::new("program")
        .add(ArgSpec::positional("pair").num_args(Nargs::Precisely(2)));

    // Execute
    let (error, display) = failure(parse(command, &["one"]));

    // Verify
    assert_matches!(error, MatchError::ArityMismatch { required: 2, found: 1, .. });
    assert!(display.contains("requires 2 values, found 1 ('one' so far)"));
}

#[test]
fn invalid_subcommand_suggestion() {
    // Setup
    let command = CommandSpec::new("program").subcommand(
        SubcommandSpec::new("command")
            .command(CommandSpec::new("alpha"))
            .command(CommandSpec::new("beta")),
    );

    // Execute
    let (error, display) = failure(parse(command, &["alph"]));

    // Verify
    assert_eq!(
        error,
        MatchError::InvalidSubcommand {
            name: "alph".to_string(),
            suggestions: vec!["alpha".to_string()],
        }
    );
    assert_eq!(display, "Parse error: Invalid command 'alph' (Did you mean: alpha)");
}

#[rstest]
#[case("program --ver", Some(1), "--verbose:\n--version:")]
#[case("program --verbose --ver", Some(2), "--verbose:\n--version:")]
#[case("program --format ", Some(2), "json:\nyaml:")]
#[case("program --host lo", Some(2), "localhost:The local machine.")]
#[case("program in", Some(1), "file")]
#[case("program x y", Some(2), "")]
#[case("program x y", None, "")]
#[case("program ", Some(1), "file")]
fn completion(#[case] line: &str, #[case] location: Option<usize>, #[case] expected: &str) {
    // Setup
    let parser = Parser::new(
        CommandSpec::new("program")
            .add(ArgSpec::option("verbose").long("--verbose").store_true())
            .add(ArgSpec::option("version").long("--version").action(Action::Version))
            .add(ArgSpec::option("format").long("--format").choices(vec!["json", "yaml"]))
            .add(ArgSpec::option("host").long("--host").completion(Completer::new(|partial| {
                ["localhost"]
                    .iter()
                    .filter(|host| host.starts_with(partial))
                    .map(|host| Completion::new(*host).help("The local machine."))
                    .collect()
            })))
            .add(ArgSpec::positional("path").optional()),
    )
    .unwrap();

    // Execute
    let completions = complete_line(&parser, line, location);

    // Verify
    if expected == "file" {
        assert_eq!(completions, Completions::File);
    }
    assert_eq!(completions.to_string(), expected);
}

#[rstest]
#[case(vec!["alpha", "x"], Ok(()))]
#[case(vec!["--version"], Err(0))]
#[case(vec!["-h"], Err(0))]
#[case(vec!["alpha", "--help"], Err(0))]
#[case(vec![], Err(1))]
#[case(vec!["alpha"], Err(1))]
#[case(vec!["--completion", "bogus"], Err(1))]
fn general_parser_exit_codes(#[case] tokens: Vec<&str>, #[case] expected: Result<(), i32>) {
    // Setup
    let parser = CommandLineParser::new(
        CommandSpec::new("program")
            .subcommand(
                SubcommandSpec::new("command")
                    .command(CommandSpec::new("alpha").add(ArgSpec::positional("item"))),
            ),
    )
    .version("0.3.0")
    .completion()
    .build_parser()
    .unwrap();

    // Execute
    let result = parser.parse_tokens(&tokens).map(|_| ());

    // Verify
    assert_eq!(result, expected);
}

#[rstest]
#[case(vec![("COMPLETION_LINE", "program al"), ("COMPLETION_LOCATION", "1")], vec!["--completion", "complete"], 0)]
#[case(vec![("SHELL", "/bin/bash")], vec!["--completion", "generate"], 0)]
#[case(vec![("SHELL", "/usr/bin/fish")], vec!["--completion", "generate"], 0)]
#[case(vec![("SHELL", "/bin/tcsh")], vec!["--completion", "generate"], 1)]
fn general_parser_completion(
    #[case] environment: Vec<(&str, &str)>,
    #[case] tokens: Vec<&str>,
    #[case] expected: i32,
) {
    // Setup
    let parser = CommandLineParser::new(
        CommandSpec::new("program").subcommand(
            SubcommandSpec::new("command")
                .command(CommandSpec::new("alpha"))
                .command(CommandSpec::new("beta")),
        ),
    )
    .completion()
    .build_parser()
    .unwrap()
    .with_environment(environment);

    // Execute
    let exit_code = parser.parse_tokens(&tokens).unwrap_err();

    // Verify
    assert_eq!(exit_code, expected);
}

#[test]
fn build_parser_rejects_invalid_spec() {
    // Setup
    let command = CommandSpec::new("program")
        .add(ArgSpec::option("a").long("--same"))
        .add(ArgSpec::option("b").long("--same"));

    // Execute
    let error = CommandLineParser::new(command).build_parser().unwrap_err();

    // Verify
    assert_eq!(
        error.to_string(),
        "Config error: Command 'program' cannot duplicate the option '--same'."
    );
}
