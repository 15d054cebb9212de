//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use clap_complete::Shell;

use crate::config::CliOverrides;
use crate::domain::{FolderType, PlanFieldsInput, PlanStatus};

/// Options shared by every zfr command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Jira URL used to reach the Zephyr Scale API (env: ZFR_URL)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// Username used to log in to Zephyr Scale (env: ZFR_USERNAME)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password used to log in to Zephyr Scale (env: ZFR_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Configuration file (env: ZFR_CONFIG, default: ~/zfr.cfg)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Debug output on stderr (-d, -dd, -ddd)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,
}

impl GlobalArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================
// zfr-folder
// ============================================================

/// Manage Zephyr Scale folders
#[derive(Parser, Debug)]
#[command(name = "zfr-folder")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct FolderCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: FolderCommands,
}

#[derive(Subcommand, Debug)]
pub enum FolderCommands {
    /// Create a new folder
    Create {
        /// Folder name, slash-delimited for nested folders
        #[arg(long)]
        name: Option<String>,
        /// Project key the folder is created under
        #[arg(long)]
        project: Option<String>,
        /// Kind of folder: plan, case or cycle
        #[arg(long = "type", value_name = "TYPE")]
        folder_type: Option<FolderType>,
    },

    /// Rename an existing folder
    Update {
        /// Numeric folder id
        #[arg(long)]
        id: Option<String>,
        /// New folder name
        #[arg(long)]
        name: Option<String>,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================
// zfr-plan
// ============================================================

/// Manage Zephyr Scale test plans
#[derive(Parser, Debug)]
#[command(name = "zfr-plan")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct PlanCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: PlanCommands,
}

/// Optional test plan attributes accepted by create and update.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanFieldArgs {
    /// Objective of the test plan
    #[arg(long)]
    pub objective: Option<String>,

    /// Folder used to group test plans
    #[arg(long)]
    pub folder: Option<String>,

    /// Comma separated labels
    #[arg(long)]
    pub labels: Option<String>,

    /// Comma separated Jira issue keys to link
    #[arg(long)]
    pub issues: Option<String>,

    /// Comma separated test cycle keys
    #[arg(long)]
    pub cycles: Option<String>,

    /// Custom fields as a JSON object
    #[arg(long)]
    pub fields: Option<String>,

    /// Username of the plan owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Plan status: Draft, Deprecated or Approved
    #[arg(long)]
    pub status: Option<PlanStatus>,
}

impl From<PlanFieldArgs> for PlanFieldsInput {
    fn from(args: PlanFieldArgs) -> Self {
        Self {
            objective: args.objective,
            folder: args.folder,
            status: args.status,
            owner: args.owner,
            labels: args.labels,
            issues: args.issues,
            cycles: args.cycles,
            fields: args.fields,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Create a new test plan
    Create {
        /// Project key the plan is created under
        #[arg(long)]
        project: Option<String>,
        /// Name of the test plan
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: PlanFieldArgs,
    },

    /// Update an existing test plan
    Update {
        /// Project key the plan belongs to
        #[arg(long)]
        project: Option<String>,
        /// Test plan key (e.g. PZ-P12)
        #[arg(long)]
        key: Option<String>,
        /// New name of the test plan
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: PlanFieldArgs,
    },

    /// Get an existing test plan
    Get {
        /// Test plan key (e.g. PZ-P12)
        #[arg(long)]
        key: Option<String>,
        /// Comma separated list of fields to return
        #[arg(long)]
        fields: Option<String>,
    },

    /// Delete an existing test plan
    Delete {
        /// Test plan key (e.g. PZ-P12)
        #[arg(long)]
        key: Option<String>,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
