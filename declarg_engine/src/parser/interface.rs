use crate::parser::BadArgument;

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_warning(&self, warning: String);
    fn print_error(&self, error: BadArgument);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_warning(&self, warning: String) {
        eprintln!("Warning: {warning}");
    }

    fn print_error(&self, error: BadArgument) {
        eprintln!("{error}");
    }
}
