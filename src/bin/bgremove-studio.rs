//! Background Removal Studio CLI Tool
//!
//! Command-line front end for the image intake controller: validates one
//! image, sends it to an external background remover and saves the result.

use bgremove_studio::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}
