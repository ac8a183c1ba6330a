use std::net::SocketAddr;

use axum::{Router, routing::get};
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_samesite_none_compat::{
    Cookie, SameSite, SameSiteNoneCompatLayer, SameSiteNoneConfig,
};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

async fn login(cookies: Cookies) -> &'static str {
    cookies.add(
        Cookie::build(("session", "s3cr3t"))
            .path("/")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::None)
            .build(),
    );
    "logged in"
}

async fn whoami(cookies: Cookies) -> String {
    match cookies.get("session") {
        Some(cookie) => format!("session={}", cookie.value()),
        None => "anonymous".to_string(),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tower_samesite_none_compat=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let compat_config = SameSiteNoneConfig::default()
        // Default: true
        .with_promotion(true)
        // Default: true
        .with_duplication(true)
        // Default: false
        .with_secure_only(true);

    let app = Router::new()
        .route("/login", get(login))
        .route("/whoami", get(whoami))
        .layer(CookieManagerLayer::new())
        .layer(SameSiteNoneCompatLayer::new().with_config(compat_config));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("tcp listener binds successfully");
    let local_addr = listener.local_addr().expect("local address is available");
    tracing::info!("listening at http://{local_addr}");

    axum::serve(listener, app)
        .await
        .expect("server runs successfully");
}
