//! `declarg` is a declarative command line parsing engine for Rust.
//!
//! Rather than generating a parser from your program's types, `declarg` interprets a *spec*: a tree of [`CommandSpec`]s describing the options, positional arguments, and sub-commands of a Cli.
//! Parsing produces plain [`Value`]s, keyed by field name, which your program then converts into its own domain types.
//! Specifically, `declarg` attempts to prioritize the following design concerns:
//! * *Data driven*:
//! The Cli is described by ordinary values, so it may be assembled at runtime (ex: loaded from a plugin registry).
//! * *Argparse style semantics*:
//! Options, positionals, cardinality (`Nargs`), choices, mutually exclusive groups, and nested sub-commands behave the way Python's argparse users would expect.
//! * *Propagated options*:
//! An option declared on a command may be made visible to every descendant sub-command, with the deepest occurrence winning.
//! * *Shell completion*:
//! The same engine that parses the Cli also answers completion queries, with integration scripts for bash, zsh, and fish.
//!
//! # Usage
//! ```
//! use declarg::{ArgSpec, CommandLineParser, CommandSpec, Nargs, Value};
//!
//! let parser = CommandLineParser::new(
//!     CommandSpec::new("summer")
//!         .help("Sum some numbers.")
//!         .add(ArgSpec::positional("item").num_args(Nargs::AtLeastOne).help("The items to sum."))
//!         .add(ArgSpec::option("verbose").short("-v").long("--verbose").count()),
//! )
//! .version("1.0.0")
//! .completion()
//! .build();
//!
//! let parsed = parser.parse_tokens(&["-v", "1", "2", "3"]).unwrap();
//! let sum: u32 = parsed.values()["item"]
//!     .as_list()
//!     .unwrap()
//!     .iter()
//!     .map(|item| item.as_str().unwrap().parse::<u32>().unwrap())
//!     .sum();
//!
//! assert_eq!(sum, 6);
//! assert_eq!(parsed.values()["verbose"], Value::Int(1));
//! ```
//!
//! ```console
//! $ summer -h
//! usage: summer ITEM [...] [--verbose] [--help] [--version] [--completion COMPLETION]
//!
//! Sum some numbers.
//!
//!  ITEM [...]     The items to sum.
//!  -v, --verbose
//!  -h, --help     Show this help message and exit.
//!  --version      Show the version and exit.
//!  --completion   Generate or answer shell completions.
//!
//! $ summer
//! Parse error: Argument 'ITEM' requires a value.
//!
//! $ summer 1 --verb
//! Parse error: Unrecognized arguments: --verb (Did you mean: --verbose)
//! ```
//!
//! # Sub-commands
//! Declare a [`SubcommandSpec`] slot on a command, listing its possible sub-commands.
//! The chosen sub-command's values are stored under the slot's field name, as a [`Value::Command`].
//!
//! ```
//! use declarg::{ArgSpec, CommandLineParser, CommandSpec, SubcommandSpec, Value};
//!
//! let parser = CommandLineParser::new(
//!     CommandSpec::new("remote")
//!         .add(ArgSpec::option("token").long("--token").required().propagate())
//!         .subcommand(
//!             SubcommandSpec::new("command")
//!                 .command(CommandSpec::new("push").add(ArgSpec::positional("target")))
//!                 .command(CommandSpec::new("pull")),
//!         ),
//! )
//! .build();
//!
//! let parsed = parser.parse_tokens(&["push", "origin", "--token", "abc"]).unwrap();
//!
//! assert_eq!(parsed.commands(), &["remote".to_string(), "push".to_string()]);
//! assert_eq!(parsed.values()["token"], Value::from("abc"));
//! let (name, values) = parsed.values()["command"].as_command().unwrap();
//! assert_eq!(name, "push");
//! assert_eq!(values["target"], Value::from("origin"));
//! ```
//!
//! # Shell Completion
//! Enable completions via [`CommandLineParser::completion`], then install the integration script for the user's shell:
//!
//! ```console
//! $ SHELL=/bin/bash summer --completion generate >> ~/.bashrc
//! ```
//!
//! The script re-invokes the program as `summer --completion complete`, passing the typed line through the `COMPLETION_LINE` and `COMPLETION_LOCATION` environment variables.
//! The program answers with one `value:help` candidate per line, or `file` to defer to the shell's path completion.
//! Candidates come from option spellings, sub-command names, [`ArgSpec::choices`], or a custom [`Completer`].
//!
//! # Cli Semantics
//! `declarg` parses the Cli tokens according to the following set of rules.
//!
//! * Positional arguments are matched in declaration order.
//! Once the expected cardinality is matched, the parser switches to the next positional (or sub-command slot).
//! * Options are matched by their spellings (`--NAME` or `-N`), anywhere among the command's tokens.
//! * The `Nargs` `*` and `+` match greedily, stopping only at the next option or a `--`.
//! * An option's value may be attached with the `=` character (`--key=123`), in which case only that one value is taken.
//! * Multiple short options may be combined into a single token.
//! For example, `-abc` is equivalent to `-a -b -c`, and `-vcx` is equivalent to `-v -c x` when `-c` takes a value.
//! * A `--` token ends the options: every following token is matched positionally.
//! * Tokens after a sub-command name belong to that sub-command; the parent's propagated options remain available.
//!
//! ### Actions
//! ```console
//! Action     | Values | Stored
//! ------------------------------------------------------------------------
//! Set        | Nargs  | the value (or a list, when Nargs is given)
//! StoreTrue  | 0      | true
//! StoreFalse | 0      | false
//! Count      | 0      | the number of occurrences
//! Append     | Nargs  | a list, extended by each occurrence
//! Custom     | Nargs  | whatever the CustomAction returns
//! Help       | 0      | (displays help and exits)
//! Version    | 0      | (displays the version and exits)
//! Completion | 1      | (generates/answers completions and exits)
//! ```
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events from the engine.
pub use declarg_engine::*;
