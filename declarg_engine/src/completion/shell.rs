use std::str::FromStr;
use thiserror::Error;

const BASH_TEMPLATE: &str = r#"# bash completion for {program}
{function}() {
    local response line
    local -a candidates=()
    response=$(COMPLETION_LINE="${COMP_LINE:0:$COMP_POINT}" COMPLETION_LOCATION="$COMP_CWORD" {program} --completion complete 2>/dev/null)

    if [[ "$response" == "file" ]]; then
        COMPREPLY=($(compgen -f -- "${COMP_WORDS[COMP_CWORD]}"))
        return 0
    fi

    while IFS= read -r line; do
        [[ -n "$line" ]] && candidates+=("${line%%:*}")
    done <<< "$response"
    COMPREPLY=("${candidates[@]}")
}
complete -o default -F {function} {program}
"#;

const ZSH_TEMPLATE: &str = r#"#compdef {program}

{function}() {
    local response
    local -a candidates
    response=$(COMPLETION_LINE="${words[1,CURRENT]}" COMPLETION_LOCATION="$((CURRENT - 1))" {program} --completion complete 2>/dev/null)

    if [[ "$response" == "file" ]]; then
        _files
        return
    fi

    candidates=("${(@f)response}")
    _describe 'values' candidates
}

compdef {function} {program}
"#;

const FISH_TEMPLATE: &str = r#"# fish completion for {program}
function {function}
    set -l tokens (commandline -opc)
    set -l response (env COMPLETION_LINE=(commandline -cp) COMPLETION_LOCATION=(count $tokens) {program} --completion complete 2>/dev/null)

    if test "$response" = "file"
        __fish_complete_path (commandline -ct)
        return
    end

    for line in $response
        set -l parts (string split -m 1 ':' -- $line)
        printf '%s\t%s\n' $parts[1] $parts[2]
    end
end

complete -c {program} -f -a '({function})'
"#;

/// Error for a shell without completion support.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported shell '{0}' (choose from: bash, zsh, fish).")]
pub struct UnsupportedShell(String);

/// The shells with completion support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// GNU bash.
    Bash,
    /// The Z shell.
    Zsh,
    /// The friendly interactive shell.
    Fish,
}

impl FromStr for Shell {
    type Err = UnsupportedShell;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            _ => Err(UnsupportedShell(value.to_string())),
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shell::Bash => write!(f, "bash"),
            Shell::Zsh => write!(f, "zsh"),
            Shell::Fish => write!(f, "fish"),
        }
    }
}

impl Shell {
    /// Detect the shell from the path of a shell executable, ex: the `$SHELL` variable `/usr/bin/zsh`.
    pub fn detect(shell_path: &str) -> Result<Self, UnsupportedShell> {
        let name = shell_path
            .rsplit('/')
            .next()
            .unwrap_or(shell_path)
            .trim();
        Shell::from_str(name)
    }

    /// The shell integration script, which answers completions for `program` by re-invoking it with `--completion complete`.
    pub fn script(&self, program: &str) -> String {
        let template = match self {
            Shell::Bash => BASH_TEMPLATE,
            Shell::Zsh => ZSH_TEMPLATE,
            Shell::Fish => FISH_TEMPLATE,
        };
        template
            .replace("{function}", &function_name(program))
            .replace("{program}", program)
    }
}

fn function_name(program: &str) -> String {
    let sanitized: String = program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("_{sanitized}_completion")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[rstest]
    #[case("bash", Ok(Shell::Bash))]
    #[case("zsh", Ok(Shell::Zsh))]
    #[case("fish", Ok(Shell::Fish))]
    #[case("/bin/bash", Err(UnsupportedShell("/bin/bash".to_string())))]
    #[case("csh", Err(UnsupportedShell("csh".to_string())))]
    fn from_str(#[case] value: &str, #[case] expected: Result<Shell, UnsupportedShell>) {
        assert_eq!(Shell::from_str(value), expected);
        if let Ok(shell) = expected {
            assert_eq!(shell.to_string(), value);
        }
    }

    #[rstest]
    #[case("/bin/bash", Ok(Shell::Bash))]
    #[case("/usr/local/bin/zsh", Ok(Shell::Zsh))]
    #[case("fish", Ok(Shell::Fish))]
    #[case("/bin/sh", Err(UnsupportedShell("sh".to_string())))]
    #[case("", Err(UnsupportedShell("".to_string())))]
    fn detect(#[case] value: &str, #[case] expected: Result<Shell, UnsupportedShell>) {
        assert_eq!(Shell::detect(value), expected);
    }

    #[rstest]
    #[case(Shell::Bash, "complete -o default -F _my_prog_completion my-prog\n")]
    #[case(Shell::Zsh, "#compdef my-prog\n")]
    #[case(Shell::Fish, "complete -c my-prog -f -a '(_my_prog_completion)'\n")]
    fn script(#[case] shell: Shell, #[case] expected: &str) {
        // Execute
        let script = shell.script("my-prog");

        // Verify
        assert_contains!(script, expected);
        assert_contains!(script, "COMPLETION_LINE=");
        assert_contains!(script, "COMPLETION_LOCATION=");
        assert_contains!(script, "my-prog --completion complete");
        assert!(!script.contains("{program}"));
        assert!(!script.contains("{function}"));
    }
}
