//! Command dispatch: validate input, resolve credentials, call one service.
//!
//! Validation happens before credential resolution, and credential
//! resolution completes before any request is sent.

use clap_complete::Shell;
use serde_json::Value;
use tracing::instrument;

use crate::cli::args::{FolderCli, FolderCommands, GlobalArgs, PlanCli, PlanCommands};
use crate::cli::CliResult;
use crate::config::{self, Credentials, EnvVars};
use crate::domain::{plan_key, FolderCreate, FolderUpdate, PlanCreate, PlanQuery, PlanUpdate};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraResult;

/// What a successful invocation produces.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Server response to print on stdout.
    Json(Value),
    /// Shell completion script requested.
    Completion(Shell),
}

/// Run a `zfr-folder` command against the real server.
pub fn execute_folder(cli: &FolderCli, env: &EnvVars) -> CliResult<CommandOutput> {
    execute_folder_with(cli, env, ServiceContainer::new)
}

/// Run a `zfr-plan` command against the real server.
pub fn execute_plan(cli: &PlanCli, env: &EnvVars) -> CliResult<CommandOutput> {
    execute_plan_with(cli, env, ServiceContainer::new)
}

/// Run a `zfr-folder` command, building services with `connect`.
#[instrument(level = "debug", skip_all)]
pub fn execute_folder_with<F>(cli: &FolderCli, env: &EnvVars, connect: F) -> CliResult<CommandOutput>
where
    F: FnOnce(&Credentials) -> InfraResult<ServiceContainer>,
{
    let value = match &cli.command {
        FolderCommands::Create {
            name,
            project,
            folder_type,
        } => {
            let folder = FolderCreate::new(name.clone(), project.clone(), *folder_type)?;
            let services = open(&cli.global, env, connect)?;
            services.folders.create(&folder)?
        }
        FolderCommands::Update { id, name } => {
            let folder = FolderUpdate::new(id.clone(), name.clone())?;
            let services = open(&cli.global, env, connect)?;
            services.folders.update(&folder)?
        }
        FolderCommands::Completion { shell } => return Ok(CommandOutput::Completion(*shell)),
    };
    Ok(CommandOutput::Json(value))
}

/// Run a `zfr-plan` command, building services with `connect`.
#[instrument(level = "debug", skip_all)]
pub fn execute_plan_with<F>(cli: &PlanCli, env: &EnvVars, connect: F) -> CliResult<CommandOutput>
where
    F: FnOnce(&Credentials) -> InfraResult<ServiceContainer>,
{
    let value = match &cli.command {
        PlanCommands::Create {
            project,
            name,
            fields,
        } => {
            let plan = PlanCreate::new(project.clone(), name.clone(), fields.clone().into())?;
            let services = open(&cli.global, env, connect)?;
            services.plans.create(&plan)?
        }
        PlanCommands::Update {
            project,
            key,
            name,
            fields,
        } => {
            let plan = PlanUpdate::new(
                project.clone(),
                key.clone(),
                name.clone(),
                fields.clone().into(),
            )?;
            let services = open(&cli.global, env, connect)?;
            services.plans.update(&plan)?
        }
        PlanCommands::Get { key, fields } => {
            let query = PlanQuery::new(key.clone(), fields.clone())?;
            let services = open(&cli.global, env, connect)?;
            services.plans.get(&query)?
        }
        PlanCommands::Delete { key } => {
            let key = plan_key(key.clone())?;
            let services = open(&cli.global, env, connect)?;
            services.plans.delete(&key)?
        }
        PlanCommands::Completion { shell } => return Ok(CommandOutput::Completion(*shell)),
    };
    Ok(CommandOutput::Json(value))
}

/// Resolve credentials, then build the services.
fn open<F>(global: &GlobalArgs, env: &EnvVars, connect: F) -> CliResult<ServiceContainer>
where
    F: FnOnce(&Credentials) -> InfraResult<ServiceContainer>,
{
    let credentials = config::resolve(&global.overrides(), env)?;
    Ok(connect(&credentials)?)
}
