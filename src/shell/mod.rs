//! External command execution and process environment.

pub mod command;
pub mod mock;
pub mod platform;
pub mod runner;

pub use command::{execute_streaming, CommandResult, CommandSpec, OutputCallback, OutputLine};
pub use mock::MockRunner;
pub use platform::{is_ci, is_elevated, passwd_home, tool_on_path, Invoker};
pub use runner::{CommandRunner, DryRunRunner, SystemRunner};
