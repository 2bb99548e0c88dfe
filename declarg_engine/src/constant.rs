pub(crate) const HELP_FIELD: &str = "help";
pub(crate) const HELP_SHORT: &str = "-h";
pub(crate) const HELP_LONG: &str = "--help";
pub(crate) const VERSION_FIELD: &str = "version";
pub(crate) const VERSION_LONG: &str = "--version";
pub(crate) const COMPLETION_FIELD: &str = "completion";
pub(crate) const COMPLETION_LONG: &str = "--completion";
pub(crate) const COMPLETION_GENERATE: &str = "generate";
pub(crate) const COMPLETION_COMPLETE: &str = "complete";

pub(crate) const END_OF_OPTIONS: &str = "--";

// Wire protocol shared with the generated shell functions.
pub(crate) const COMPLETION_LINE_VAR: &str = "COMPLETION_LINE";
pub(crate) const COMPLETION_LOCATION_VAR: &str = "COMPLETION_LOCATION";
pub(crate) const FILE_COMPLETION: &str = "file";
pub(crate) const SHELL_VAR: &str = "SHELL";
