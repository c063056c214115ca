//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use trueplace_cli::CliError;

#[expect(clippy::print_stderr, reason = "fatal errors are reported on stderr")]
fn main() {
    pretty_env_logger::init();
    match trueplace_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("trueplace: {err}");
            std::process::exit(1);
        }
    }
}
