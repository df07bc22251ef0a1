//! One shot alerts carried across a redirect in the cookie session

use crate::{
    consts,
    services::{SessionStore, StorageError},
};

/// Stores `alert` to be shown once by the next rendered page
pub fn set_flash_alert(store: &dyn SessionStore, alert: &str) -> Result<(), StorageError> {
    store.set_item(consts::FLASH_ALERT_COOKIE_NAME, alert)
}

/// Takes the pending alert, if any. Read errors are treated as no alert
pub fn take_flash_alert(store: &dyn SessionStore) -> Option<String> {
    let alert = store
        .get_item(consts::FLASH_ALERT_COOKIE_NAME)
        .ok()
        .flatten()?;
    store.remove_item(consts::FLASH_ALERT_COOKIE_NAME);

    Some(alert).filter(|a| !a.is_empty())
}
