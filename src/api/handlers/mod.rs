//! Route handlers for the JSON/binary API surface.

pub mod config;
pub mod diagnostics;
pub mod donations;
pub mod mech;
pub mod media;
pub mod monitor;
pub mod setup;
pub mod spam;

pub use config::{refresh_containers_handler, save_config_handler};
pub use diagnostics::{
    disable_temp_debug_handler, enable_temp_debug_handler, performance_stats_handler,
    port_diagnostics_handler, temp_debug_status_handler,
};
pub use donations::{
    add_power_handler, consume_power_handler, delete_donation_handler, donation_click_handler,
    donation_status_handler, donations_list_handler, reset_power_handler, submit_donation_handler,
};
pub use mech::{
    get_difficulty_handler, mech_reset_handler, mech_status_handler, reset_difficulty_handler,
    set_difficulty_handler, simulate_broadcast_handler, speed_config_handler,
};
pub use media::{
    display_image_handler, display_info_handler, mech_animation_handler, music_info_handler,
    music_track_handler, test_animation_handler,
};
pub use monitor::download_monitor_script_handler;
pub use setup::setup_save_handler;
pub use spam::{get_spam_protection_handler, save_spam_protection_handler};
