use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use replier_common::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STORAGE_TTL_SECS, SWEEP_FACTOR};
use replier_server::{Responder, router};
use replier_storage::{CountStore, MAX_PERIOD};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "replier-server", about = "Replier — responder programável de eventos")]
struct Args {
    #[arg(long, env = "REPLIER_HOST", default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, env = "REPLIER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// TTL das contagens por ID, em segundos.
    #[arg(long, env = "REPLIER_STORAGE_TTL", default_value_t = DEFAULT_STORAGE_TTL_SECS, value_parser = parse_secs)]
    storage_ttl: u64,
    /// Intervalo da varredura de contagens expiradas, em segundos (padrão: 3x o TTL).
    #[arg(long, env = "REPLIER_SWEEP_INTERVAL", value_parser = parse_secs)]
    sweep_interval: Option<u64>,
    #[arg(long, env = "REPLIER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn parse_secs(s: &str) -> Result<u64, String> {
    let max = MAX_PERIOD.as_secs();
    match s.parse::<u64>() {
        Ok(0) => Err("o valor deve ser maior que zero".into()),
        Ok(n) if n > max => Err(format!("o valor deve ser no máximo {max} segundos")),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("valor inválido: '{s}'. Use um número inteiro de segundos")),
    }
}

/// Intervalo de varredura: o informado ou TTL * fator.
fn sweep_interval(ttl: Duration, explicit: Option<u64>) -> anyhow::Result<Duration> {
    match explicit {
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => ttl
            .checked_mul(SWEEP_FACTOR)
            .ok_or_else(|| anyhow::anyhow!("intervalo de varredura padrão transborda para TTL {ttl:?}")),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "replier_server=info,replier_storage=info".into());

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let ttl = Duration::from_secs(args.storage_ttl);
    let sweep_interval = sweep_interval(ttl, args.sweep_interval)?;

    let shutdown = CancellationToken::new();
    let store = CountStore::new(ttl);
    let sweeper = store.spawn_sweeper(sweep_interval, shutdown.clone());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(ttl = ?store.ttl(), ?sweep_interval, "replier escutando em {addr}");

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal recebido");
                signal_token.cancel();
            }
            Err(e) => error!("falha ao escutar ctrl-c: {e}"),
        }
    });

    let server_token = shutdown.clone();
    axum::serve(listener, router(Responder::new(store)))
        .with_graceful_shutdown(async move { server_token.cancelled().await })
        .await?;

    // Encerra a varredura mesmo se o servidor parou por outro motivo.
    shutdown.cancel();
    sweeper.await?;

    Ok(())
}
