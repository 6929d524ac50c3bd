pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/verify-login-code", post(routes::auth::verify_login_code))
        .route("/refresh", post(routes::auth::refresh))
        .route("/change-password", post(routes::auth::change_password))
        .route("/delete-account", post(routes::auth::delete_account))
        .route("/me", get(routes::auth::me));

    // Material routes (staff)
    let material_routes = Router::new()
        .route("/", get(routes::material::list))
        .route("/", post(routes::material::create))
        .route("/{id}", patch(routes::material::update))
        .route("/{id}", delete(routes::material::delete));

    // Messaging routes
    let message_routes = Router::new()
        .route(
            "/conversations/admin",
            get(routes::message::conversations_admin),
        )
        .route(
            "/conversations/customer/{id}",
            get(routes::message::conversations_customer),
        )
        .route(
            "/conversation/{customer_id}/{employee_id}",
            get(routes::message::conversation),
        )
        .route("/send", post(routes::message::send));

    // Customer notification routes
    let notification_routes = Router::new()
        .route("/customer/{id}", get(routes::notification::list))
        .route(
            "/customer/{id}/read-all",
            patch(routes::notification::mark_all_read),
        )
        .route("/{id}/read", patch(routes::notification::mark_read))
        .route("/{id}", delete(routes::notification::delete));

    // Staff notification routes. One shared param name: the segment is a
    // role for list/read-all and a notification id for read.
    let admin_notification_routes = Router::new()
        .route("/{key}", get(routes::admin_notification::list))
        .route(
            "/{key}/read-all",
            patch(routes::admin_notification::mark_all_read),
        )
        .route("/{key}/read", patch(routes::admin_notification::mark_read));

    // Order routes
    let order_routes = Router::new()
        .route("/all", get(routes::order::list_all))
        .route("/customer/{id}", get(routes::order::list_customer))
        .route("/{id}", get(routes::order::get))
        .route("/{id}/status", patch(routes::order::update_status));

    // Order history
    let order_log_routes = Router::new().route("/{id}", get(routes::order::logs));

    // Team routes
    let team_routes = Router::new().route("/employee/{id}/orders", get(routes::team::employee_orders));

    // Quota routes
    let quota_routes = Router::new()
        .route("/", get(routes::quota::list))
        .route("/{id}", get(routes::quota::get));

    // Production submission routes
    let submission_routes = Router::new()
        .route("/create", post(routes::submission::create))
        .route("/quota/{id}", get(routes::submission::list_by_quota))
        .route("/{id}/verify", patch(routes::submission::verify))
        .route("/{id}/reject", patch(routes::submission::reject));

    // Compose API
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/materials", material_routes)
        .nest("/messages", message_routes)
        .nest("/notifications", notification_routes)
        .nest("/admin-notifications", admin_notification_routes)
        .nest("/orders", order_routes)
        .nest("/order-logs", order_log_routes)
        .nest("/teams", team_routes)
        .nest("/quotas", quota_routes)
        .nest("/submissions", submission_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .route("/ws", get(ws::handler::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
