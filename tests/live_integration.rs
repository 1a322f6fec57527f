use resilient_http::{
    harness::{Harness, HarnessSettings, NoopObserver, TrialCounts},
    CallExecutor, Endpoints, PatternClient,
};

fn live_enabled() -> bool {
    std::env::var("RESILIENT_HTTP_LIVE").is_ok_and(|value| value == "1")
}

#[tokio::test]
async fn live_endpoints_only_surface_acceptable_kinds() {
    if !live_enabled() {
        eprintln!("skipping live test: set RESILIENT_HTTP_LIVE=1 to hit the real endpoints");
        return;
    }

    let endpoints = Endpoints::from_env().expect("endpoint overrides must be valid");
    let client = PatternClient::new(CallExecutor::new(), endpoints);
    let harness = Harness::new(client, NoopObserver).with_settings(HarnessSettings {
        trials: TrialCounts {
            timeout: 3,
            rate_limit: 3,
            client_error: 2,
            server_error: 2,
        },
        ..HarnessSettings::default()
    });

    let client_report = harness
        .check_client_error()
        .await
        .expect("client probe must only surface client or undefined errors");
    let server_report = harness
        .check_server_error()
        .await
        .expect("server probe must only surface server or undefined errors");
    harness
        .check_timeout()
        .await
        .expect("timeout pattern must pass");
    harness
        .check_rate_limit()
        .await
        .expect("rate-limit pattern must pass");

    // httpbin never answers 2xx on these paths
    assert_eq!(client_report.successes, 0);
    assert_eq!(server_report.successes, 0);
}
