use clap::Parser;
use zfr::cli::logging::setup_logging;
use zfr::cli::{execute_plan, finish, PlanCli};
use zfr::config::EnvVars;

fn main() {
    let cli = PlanCli::parse();
    setup_logging(cli.global.debug);

    let result = execute_plan(&cli, &EnvVars::from_process());
    std::process::exit(finish::<PlanCli>(result, cli.global.pretty));
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        PlanCli::command().debug_assert();
    }
}
