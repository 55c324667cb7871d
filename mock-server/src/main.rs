use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_server=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    init_logger();
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let secret = std::env::var("SERVICE_SECRET").unwrap_or_else(|_| mock_server::SERVICE_SECRET.to_string());
    let key = std::env::var("LICENSE_KEY").unwrap_or_else(|_| mock_server::LICENSE_KEY.to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock RMS listening");
    axum::serve(listener, mock_server::app_with_state(mock_server::AppState::new(&secret, &key))).await
}
