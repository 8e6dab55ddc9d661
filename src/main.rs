use nunggu::client::{AcknowledgeJob, ClientConfig, Registry};
use nunggu::config::load_config;
use nunggu::utils::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            return;
        }
    };
    logging::init(&config.logging.level);

    let registry = Registry::new();
    let client = match registry.init(ClientConfig::from(&config.client)) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to start job client: {}", e);
            return;
        }
    };

    let acker = client.clone();
    client.consumer(
        move |job| {
            info!(job_id = %job.job_id, key = %job.key, attempt = job.attempt, "received job");
            if let Err(e) = acker.acknowledge_job(AcknowledgeJob::success(job.job_id)) {
                error!("Failed to acknowledge job: {}", e);
            }
        },
        config.client.max_job,
    );
    client.on_error(|e| error!("Job broker error: {}", e));

    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received. Exiting gracefully.");
    }
}
