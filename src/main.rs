use atto_pipe::app::{handle_fatal_error, init_logging, AppConfig};
use atto_pipe::cli::{execute, Cli};
use atto_pipe::pipeline::setup_interrupt_handlers;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();
    let verbose = cli.verbose;

    init_logging(&AppConfig::new(verbose));

    let interrupt = match setup_interrupt_handlers() {
        Ok(flag) => flag,
        Err(e) => handle_fatal_error(e, verbose),
    };

    if let Err(e) = execute(cli, interrupt).await {
        handle_fatal_error(e, verbose);
    }
}
