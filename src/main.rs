use linkarchive::cli;

#[tokio::main]
async fn main() {
    cli::parse_cli_commands().await;
}
