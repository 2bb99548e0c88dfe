use crate::matcher::ParseContext;
use crate::tokens::RawOption;

/// Decompose a bundled short option token (ex: `-abc`) into its individual options.
///
/// Characters accumulate into a virtual name (`-a`, `-ab`, ..) until it names a registered option.
/// When the matched option consumes values, the remainder of the token becomes its inline value (ex: `-c0` is `-c` with `0`).
/// If nothing ever matches, the original token is returned unchanged so it may be reported as unrecognized.
pub(crate) fn expand_short(option: RawOption, context: &ParseContext<'_>) -> Vec<RawOption> {
    let characters: Vec<char> = option.name.chars().skip(1).collect();
    let mut virtual_options: Vec<RawOption> = Vec::default();
    let mut virtual_name = String::from("-");

    for (index, character) in characters.iter().enumerate() {
        virtual_name.push(*character);

        let entry = match context.options.get(virtual_name.as_str()) {
            Some(entry) => entry,
            None => continue,
        };

        let mut virtual_option = RawOption {
            raw: option.raw.clone(),
            name: std::mem::replace(&mut virtual_name, String::from("-")),
            is_long: false,
            explicit_value: option.explicit_value.clone(),
            is_terminal: false,
        };

        if entry.arg.consumes_values() {
            let remainder: String = characters[index + 1..].iter().collect();

            if !remainder.is_empty() {
                virtual_option.explicit_value.replace(remainder);
            }

            virtual_options.push(virtual_option);
            break;
        }

        virtual_options.push(virtual_option);
    }

    if virtual_options.is_empty() {
        return vec![option];
    }

    if virtual_name != "-" {
        // Trailing characters which never matched; surfaced as their own (unrecognized) option.
        virtual_options.push(RawOption {
            raw: option.raw.clone(),
            name: virtual_name,
            is_long: false,
            explicit_value: None,
            is_terminal: false,
        });
    }

    if let Some(last) = virtual_options.last_mut() {
        last.is_terminal = option.is_terminal;
    }

    virtual_options
}
