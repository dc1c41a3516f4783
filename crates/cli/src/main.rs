use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    shelfscope_cli::run()
}
