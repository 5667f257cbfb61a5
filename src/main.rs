//! `concat-client`: one prompt → remote call → display cycle.
//!
//! Exit status: 0 on success, 1 on any failure (the `ERROR:` line has
//! already been printed), 2 on command line usage errors.

use clap::Parser;
use std::process::ExitCode;
use tokio::io::BufReader;

use concat_rpc::{Cli, RemoteConcatClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ---
    let cli = Cli::parse();
    concat_rpc::init_logging(cli.verbose);

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            println!("ERROR: {}", e.message());
            return ExitCode::FAILURE;
        }
    };

    let client = RemoteConcatClient::with_tcp(config);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    match client.run(stdin, &mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
