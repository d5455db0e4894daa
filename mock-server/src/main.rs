use mock_server::MockState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let state = MockState::new();
    let tokens = state.tokens();
    info!("listening on {addr}");
    info!(
        base_url = %format!("http://{addr}{}", mock_server::API_PREFIX),
        token_url = %format!("http://{addr}/token"),
        "credential file contents:\n{}\n{}\n{}\n{}",
        tokens.client_id,
        tokens.client_secret,
        tokens.access_token,
        tokens.refresh_token
    );
    mock_server::serve(listener, state).await
}
