use clap::Parser;
use zfr::cli::logging::setup_logging;
use zfr::cli::{execute_folder, finish, FolderCli};
use zfr::config::EnvVars;

fn main() {
    let cli = FolderCli::parse();
    setup_logging(cli.global.debug);

    let result = execute_folder(&cli, &EnvVars::from_process());
    std::process::exit(finish::<FolderCli>(result, cli.global.pretty));
}
