//! Interactive prompt loop.
//!
//! Reads commands line by line until `quit` or end of input and dispatches
//! them to the [`ApiClient`].

use crate::{
    api_client::ApiClient,
    commands::{COMMAND_HELP, Command, parse_command},
};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = "> ";

/// Run the prompt until `quit` or EOF
pub async fn run<R, W>(client: &ApiClient, input: &mut R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut line = String::new();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            // EOF
            writeln!(out)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let command = match parse_command(trimmed) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        if let Err(e) = execute(client, command, out).await {
            writeln!(out, "Error: {:#}", e)?;
        }
    }

    Ok(())
}

/// Read one trimmed line, `None` at end of input
pub async fn read_value<R>(input: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    match input.read_line(&mut line).await? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

async fn execute<W: Write>(client: &ApiClient, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Register | Command::Play(_) | Command::Leaderboard => {
            let reply = match command {
                Command::Register => client.register().await?,
                Command::Play(hand) => client.play(hand).await?,
                _ => client.leaderboard_text().await?,
            };
            writeln!(out, "{}", reply.message)?;
            if let Some(transaction) = reply.transaction {
                writeln!(out, "Transaction to sign: {}", transaction)?;
            }
        }
        Command::Status => {
            let status = client.status().await?;
            writeln!(
                out,
                "{} - {}/{} players, prize pot {} lamports",
                if status.active { "Active" } else { "Ended" },
                status.registered_count,
                status.capacity,
                status.prize_pot
            )?;
        }
        Command::Stats => {
            let stats = client.player_stats().await?;
            writeln!(
                out,
                "{:?}: best {} runs over {} game(s){}",
                stats.phase,
                stats.best_score,
                stats.games_played,
                stats
                    .round_score
                    .map(|s| format!(", current round {} runs", s))
                    .unwrap_or_default()
            )?;
        }
        Command::End => {
            let reply = client.end_tournament().await?;
            writeln!(out, "{}", reply.message)?;
            for payout in &reply.payouts.payouts {
                writeln!(
                    out,
                    "  {}. {} receives {} lamports",
                    payout.rank,
                    payout.player.short(),
                    payout.amount
                )?;
            }
            writeln!(out, "Transaction to sign: {}", reply.transaction)?;
        }
        Command::Help => write!(out, "{}", COMMAND_HELP)?,
        Command::Quit => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_cricket::PlayerId;

    fn offline_client() -> ApiClient {
        ApiClient::new("http://localhost:1".to_string(), PlayerId::from_bytes([1; 32]))
    }

    async fn drive(input: &str) -> String {
        let client = offline_client();
        let mut reader = input.as_bytes();
        let mut out = Vec::new();
        run(&client, &mut reader, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_ends_loop() {
        assert_eq!(drive("").await, "> \n");
    }

    #[tokio::test]
    async fn test_blank_lines_then_eof() {
        assert_eq!(drive("\n   \n").await, "> > > \n");
    }

    #[tokio::test]
    async fn test_quit_stops_before_remaining_input() {
        let out = drive("help\nquit\nregister\n").await;
        assert!(out.contains("Commands:"));
        assert!(!out.contains("Error"));
    }

    #[tokio::test]
    async fn test_parse_errors_are_reported_and_loop_continues() {
        let out = drive("bowl\nplay 9\n").await;
        assert!(out.contains("Unrecognized command 'bowl'"));
        assert!(out.contains("Invalid hand '9'"));
        assert!(out.ends_with("> \n"));
    }

    #[tokio::test]
    async fn test_request_failure_is_printed() {
        let out = drive("register\n").await;
        assert!(out.contains("Error: Registration failed"));
    }

    #[tokio::test]
    async fn test_read_value() {
        let mut reader = "  abc  \n".as_bytes();
        assert_eq!(read_value(&mut reader).await.unwrap(), Some("abc".to_string()));
        assert_eq!(read_value(&mut reader).await.unwrap(), None);
    }
}
