//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; authentication is delegated to AuthService.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wholesale_admin::adapters::api::{BackendApi, RestClient};
use wholesale_admin::adapters::persistence::SessionFile;
use wholesale_admin::adapters::ui::tui::TuiInputPort;
use wholesale_admin::ports::{
    AuthApi, CategoryApi, InputPort, OrderApi, ProductApi, SessionStore, UserApi,
};
use wholesale_admin::usecases::{
    AuthService, CategoryService, OrderService, ProductService, UserService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    wholesale_admin::adapters::ui::init_ui();

    let cfg = wholesale_admin::shared::config::AppConfig::load().unwrap_or_default();

    let Some(session_secret) = cfg.session_secret() else {
        anyhow::bail!(
            "Set WSADMIN_SESSION_SECRET (env or .env). The session blob is encrypted with it; it is never compiled in."
        );
    };

    let base_url = cfg.base_url_or_default();
    info!(%base_url, "backend base URL");
    let session_path = cfg.session_path_or_default();
    info!(path = %session_path.display(), "session blob path");

    // --- Backend adapter (one cookie-credentialed client for every port) ---
    let client = Arc::new(RestClient::new(
        base_url,
        Duration::from_millis(cfg.request_timeout_ms_or_default()),
    )?);
    let backend = Arc::new(BackendApi::new(Arc::clone(&client)));
    let auth_api: Arc<dyn AuthApi> = Arc::clone(&backend) as Arc<dyn AuthApi>;
    let category_api: Arc<dyn CategoryApi> = Arc::clone(&backend) as Arc<dyn CategoryApi>;
    let product_api: Arc<dyn ProductApi> = Arc::clone(&backend) as Arc<dyn ProductApi>;
    let order_api: Arc<dyn OrderApi> = Arc::clone(&backend) as Arc<dyn OrderApi>;
    let user_api: Arc<dyn UserApi> = Arc::clone(&backend) as Arc<dyn UserApi>;

    // --- Session: encrypted blob + service; rehydrate before the first check ---
    let store: Arc<dyn SessionStore> = Arc::new(SessionFile::new(&session_path, &session_secret));
    let auth_service = Arc::new(AuthService::new(auth_api, store));
    auth_service.hydrate().await;

    // --- Services ---
    let category_service = Arc::new(CategoryService::new(category_api));
    let product_service = Arc::new(ProductService::new(product_api));
    let order_service = Arc::new(OrderService::new(order_api));
    let user_service = Arc::new(UserService::new(user_api));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&auth_service),
        Arc::clone(&category_service),
        Arc::clone(&product_service),
        Arc::clone(&order_service),
        Arc::clone(&user_service),
    ));

    // --- Run (main menu -> dashboard / categories / products / orders / users) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
