//! A command-line client for the hand cricket tournament.
//!
//! The client talks to the action server on behalf of one account. Returned
//! transactions are printed for signing with the account's wallet.

use anyhow::{Context, Result};
use hand_cricket::PlayerId;
use hc_client::{api_client::ApiClient, repl};
use pico_args::Arguments;
use std::io::{self, Write};
use tokio::io::BufReader;

const HELP: &str = "\
Play the hand cricket tournament from the terminal

USAGE:
  hc_client [OPTIONS]

OPTIONS:
  --server URL          Server URL  [default: http://localhost:8080]
  --account PUBKEY      Base58 account to act for

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
    account: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .value_from_str("--server")
            .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        account: pargs.opt_value_from_str("--account").ok().flatten(),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();

    let account = match args.account {
        Some(a) => a,
        None => {
            print!("Account: ");
            stdout.flush()?;
            repl::read_value(&mut stdin)
                .await?
                .context("No account given")?
        }
    };
    let account = PlayerId::parse(&account).context("Invalid account")?;

    let client = ApiClient::new(args.server_url.clone(), account);
    println!(
        "Playing as {} on {}. Type 'help' for commands.",
        client.account().short(),
        args.server_url
    );

    repl::run(&client, &mut stdin, &mut stdout).await
}
