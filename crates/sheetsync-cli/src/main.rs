use std::sync::Arc;

use sheetsync_cli::config::CliConfig;
use sheetsync_cli::console;
use sheetsync_client::RecordClient;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays the table.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = CliConfig::from_env().unwrap_or_else(|e| {
        eprintln!("invalid configuration: {e}");
        std::process::exit(1);
    });

    tracing::info!(
        base_url = %config.client.base_url,
        page_size = config.view.page_size,
        ordering = ?config.view.ordering,
        "sheetsync console"
    );
    println!("type 'help' for commands");

    let client = Arc::new(RecordClient::new(config.client));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    if let Err(e) = console::run(&config.view, client, stdin, &mut stdout).await {
        eprintln!("console error: {e}");
        std::process::exit(1);
    }
}
