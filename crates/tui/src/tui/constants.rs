use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(4);

pub(crate) const STATUS_SEARCH: &str =
    "Search — type to filter as you go • Enter keep • Esc restore previous";
pub(crate) const STATUS_FILTER_PICKER: &str =
    "Filters — ←/→ column • Tab cycle • ↑/↓ move • Space toggle • C clears all • Enter apply • Esc cancel";
pub(crate) const STATUS_FORM_CREATE: &str =
    "New task — Tab next field • ←/→ adjust priority, Space toggles tags • Enter save • Esc cancel";
pub(crate) const STATUS_FORM_EDIT: &str =
    "Edit task — Tab next field • ←/→ adjust priority, Space toggles tags • Enter save • Esc cancel";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion — arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_CHAT: &str = "Chat — Enter send • Esc back to tasks";
pub(crate) const STATUS_HELP: &str = "Keyboard reference — Enter/Esc to close";
pub(crate) const STATUS_REFRESHED: &str = "Refreshed from server";
