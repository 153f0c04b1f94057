mod routes;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8085".into())
        .parse()
        .expect("invalid PORT");

    let state = state::AppState::new();
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "marker server listening");
    axum::serve(listener, app).await.expect("server failed");
}
