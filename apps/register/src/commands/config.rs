//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current register configuration.
///
/// ## When Used
/// - Startup (tip buttons, currency formatting)
/// - Confirmation step (store name, prep time)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
