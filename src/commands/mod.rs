mod context;
mod handlers;
mod parser;
mod utils;

pub use context::AppContext;
pub use handlers::handle_command;
pub use parser::{
    Assignment, Command, CommandResult, Invocation, USAGE, parse_command, parse_entity,
    parse_invocation,
};
