//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - Public: donation status/click, live animation, music catalog,
//!   display images, the first-time setup flow
//! - Protected (HTTP Basic): config page + save, bot setup, monitor
//!   script download, container refresh, diagnostics, spam protection,
//!   donation management, mech administration
//! - `/static/*` - static assets
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Rate limiting** - per-IP token bucket, with a proxy-aware key
//!   extractor when `behind_proxy` is set
//! - **Authentication** - HTTP Basic on the protected group
//! - **Path normalization** - trailing slash handling

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

use crate::api::handlers::{
    add_power_handler, consume_power_handler, delete_donation_handler, disable_temp_debug_handler,
    display_image_handler, display_info_handler, donation_click_handler, donation_status_handler,
    donations_list_handler, download_monitor_script_handler, enable_temp_debug_handler,
    get_difficulty_handler, get_spam_protection_handler, mech_animation_handler,
    mech_reset_handler, mech_status_handler, music_info_handler, music_track_handler,
    performance_stats_handler, port_diagnostics_handler, refresh_containers_handler,
    reset_difficulty_handler, reset_power_handler, save_config_handler,
    save_spam_protection_handler, set_difficulty_handler, setup_save_handler,
    simulate_broadcast_handler, speed_config_handler, submit_donation_handler,
    temp_debug_status_handler, test_animation_handler,
};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web::handlers::{config_page_handler, discord_bot_setup_handler, setup_page_handler};

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/donation/status", get(donation_status_handler))
        .route("/api/donation/click", post(donation_click_handler))
        .route("/mech_animation", get(mech_animation_handler))
        .route("/api/mech/music/info", get(music_info_handler))
        .route("/api/mech/music/{level}", get(music_track_handler))
        .route("/api/mech/display/info", get(display_info_handler))
        .route(
            "/api/mech/display/{level}/{image_type}",
            get(display_image_handler),
        )
        .route("/setup", get(setup_page_handler).post(setup_save_handler))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(config_page_handler))
        .route("/save_config_api", post(save_config_handler))
        .route("/discord_bot_setup", get(discord_bot_setup_handler))
        .route(
            "/download_monitor_script",
            post(download_monitor_script_handler),
        )
        .route("/refresh_containers", post(refresh_containers_handler))
        .route("/enable_temp_debug", post(enable_temp_debug_handler))
        .route("/disable_temp_debug", post(disable_temp_debug_handler))
        .route("/temp_debug_status", get(temp_debug_status_handler))
        .route("/performance_stats", get(performance_stats_handler))
        .route("/port_diagnostics", get(port_diagnostics_handler))
        .route(
            "/api/spam-protection",
            get(get_spam_protection_handler).post(save_spam_protection_handler),
        )
        .route("/api/donation/add-power", post(add_power_handler))
        .route("/api/donation/reset-power", post(reset_power_handler))
        .route("/api/donation/consume-power", post(consume_power_handler))
        .route("/api/donation/submit", post(submit_donation_handler))
        .route("/api/test-mech-animation", post(test_animation_handler))
        .route("/api/mech-speed-config", post(speed_config_handler))
        .route(
            "/api/simulate-donation-broadcast",
            post(simulate_broadcast_handler),
        )
        .route(
            "/api/mech/difficulty",
            get(get_difficulty_handler).post(set_difficulty_handler),
        )
        .route("/api/mech/difficulty/reset", post(reset_difficulty_handler))
        .route("/api/donations/list", get(donations_list_handler))
        .route("/api/donations/delete/{index}", post(delete_donation_handler))
        .route("/api/mech/reset", post(mech_reset_handler))
        .route("/api/mech/status", get(mech_status_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
}

/// Router without rate limiting or connection-info requirements.
///
/// Used by integration tests, which drive the router directly.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

/// Constructs the full application router with all middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads the client IP from
///   `X-Forwarded-For` / `X-Real-IP` instead of the peer socket address;
///   enable only behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let public = public_routes();
    let protected = protected_routes(&state);

    let (public, protected) = if behind_proxy {
        (
            public.layer(rate_limit::proxy_layer()),
            protected.layer(rate_limit::secure_proxy_layer()),
        )
    } else {
        (
            public.layer(rate_limit::layer()),
            protected.layer(rate_limit::secure_layer()),
        )
    };

    let router = Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
