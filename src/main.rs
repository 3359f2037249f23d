use anyhow::Result;
use jurl::config::{cli, command_args};
use jurl::logging::init_logging;
use jurl::{Config, ConsoleOutputHandler, ExecutionContext, Jurl};

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = Config::from_matches(&matches);
    init_logging(config.verbose);

    let args = command_args(&matches);
    let mut jurl = Jurl::new(&config, ConsoleOutputHandler::stdout(), ExecutionContext::new()?);
    jurl.run(&args)?;
    Ok(())
}
