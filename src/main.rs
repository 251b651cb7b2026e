use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroize;

use bank_portal::api::bank::BankClient;
use bank_portal::commands::{self, Reply};
use bank_portal::config::PortalConfig;
use bank_portal::models::AuthContext;
use bank_portal::services::TransferWizard;
use bank_portal::utils::configure_bank_rate_limit;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "bank_portal=debug".parse() {
        filter = filter.add_directive(directive);
    }
    if let Ok(directive) = "reqwest=warn".parse() {
        filter = filter.add_directive(directive);
    }
    // Logs go to stderr so they do not interleave with the console
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting bank portal transfer console...");

    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return;
        }
    };
    configure_bank_rate_limit(config.max_requests_per_second);

    let client = match BankClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create bank client: {}", e);
            return;
        }
    };
    info!(
        "Using bank API at {} (timeout {}s, {} req/s)",
        config.api_base_url,
        config.request_timeout.as_secs(),
        config.max_requests_per_second
    );

    let auth = AuthContext::new(config.user_id.clone());
    let mut wizard = TransferWizard::new(Arc::new(client), auth, config.fallback_network_fee.clone());
    wizard.initialize().await;
    debug!("Loaded {} active accounts", wizard.accounts().len());

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let greeting = format!(
        "{}\n\n{}\n",
        commands::help::execute(),
        commands::wizard::status(&wizard)
    );
    if let Err(e) = write_out(&mut stdout, &greeting).await {
        error!("Failed to write to stdout: {}", e);
        return;
    }

    loop {
        if write_out(&mut stdout, "> ").await.is_err() {
            break;
        }
        let mut line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        let reply = commands::handle_line(&mut wizard, &line).await;
        // The line may have carried a PIN
        line.zeroize();

        match reply {
            Reply::Output(text) if text.is_empty() => {}
            Reply::Output(text) => {
                if let Err(e) = write_out(&mut stdout, &format!("{}\n", text)).await {
                    error!("Failed to write to stdout: {}", e);
                    break;
                }
            }
            Reply::Quit => break,
        }
    }

    info!("Goodbye");
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}
