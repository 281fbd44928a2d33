use mdl_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // state dir is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    let code = match cli::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("mdl error: {:#}", err);
            1
        }
    };
    std::process::exit(code);
}
