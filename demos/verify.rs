use resilient_http::{
    harness::{Harness, TracingObserver},
    CallExecutor, Endpoints, PatternClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let endpoints = Endpoints::from_env().map_err(anyhow::Error::msg)?;
    let client = PatternClient::new(CallExecutor::new(), endpoints);
    let harness = Harness::new(client, TracingObserver);

    let reports = harness.run_all().await?;
    for (pattern, report) in reports {
        println!(
            "{pattern}: {}/{} succeeded, expected failures {:?}",
            report.successes, report.trials, report.failures
        );
    }

    Ok(())
}
