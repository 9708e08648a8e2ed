//! Interactive console
//!
//! Forwards raw command lines to the server: `help` and `exit` are handled
//! locally, everything else is sent verbatim (newline appended) over a
//! fresh exchange, the same framing the one-shot subcommands use. Server
//! error frames are printed and the loop continues.

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use wire::Client;

const HELP: &str = "\
List of sdrdb commands:
  create DB WIDTH                        create a database
  drop DB                                drop a database
  clear DB                               empty a database
  resize DB WIDTH                        set a new trait width
  put DB TRAIT...                        store a new concept
  update DB CONCEPT TRAIT...             replace a concept's traits
  query DB [weighted] similarity A B
  query DB [weighted] usimilarity CONCEPT OTHER...
  query DB [weighted] closest AMOUNT CONCEPT
  query DB matching TRAIT...
  query DB [weighted] matchingx AMOUNT TRAIT...
  help                                   show this help
  exit                                   leave the console
";

pub async fn run(client: Client) -> Result<()> {
    println!("connected to {}", client.endpoint());

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"sdrdb> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "help" => print!("{}", HELP),
            "exit" | "quit" => break,
            _ => match client.exchange(&format!("{}\n", input)).await {
                Ok(payload) => println!("{}", payload.as_str().trim_end()),
                Err(err) => eprintln!("{}", err),
            },
        }
    }

    println!("Goodbye");
    Ok(())
}
