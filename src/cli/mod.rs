//! CLI layer: argument parsing, command dispatch and process exit handling

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use std::io;

use clap::CommandFactory;

pub use args::{FolderCli, PlanCli};
pub use commands::{
    execute_folder, execute_folder_with, execute_plan, execute_plan_with, CommandOutput,
};
pub use error::{CliError, CliResult};

use crate::exitcode;
use crate::infrastructure::InfraError;

/// Print the outcome of a command and return the process exit code.
///
/// On failure nothing is written to stdout; the message goes to stderr.
pub fn finish<C: CommandFactory>(result: CliResult<CommandOutput>, pretty: bool) -> i32 {
    match result.and_then(|out| emit::<C>(out, pretty)) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    }
}

fn emit<C: CommandFactory>(out: CommandOutput, pretty: bool) -> CliResult<()> {
    match out {
        CommandOutput::Json(value) => {
            let stdout = io::stdout();
            output::write_json(&mut stdout.lock(), &value, pretty)
                .map_err(|e| InfraError::io("write response to stdout", e))?;
        }
        CommandOutput::Completion(shell) => {
            let mut cmd = C::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }
    Ok(())
}
