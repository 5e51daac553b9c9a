//! Display surface the refresh controller writes to.

use crate::metrics::format::DisplayText;

/// Three text fields plus a refresh control and its busy indicator.
pub trait DisplaySurface {
    fn set_battery_text(&mut self, text: &str);
    fn set_ram_text(&mut self, text: &str);
    fn set_storage_text(&mut self, text: &str);

    /// Enable or disable the refresh control.
    fn set_refresh_enabled(&mut self, enabled: bool);
    fn is_refresh_enabled(&self) -> bool;

    /// Show or hide the busy indicator.
    fn set_busy(&mut self, busy: bool);

    /// Called once after each batch of changes.
    fn render(&mut self) {}

    /// Write all three text fields.
    fn show_text(&mut self, text: &DisplayText) {
        self.set_battery_text(&text.battery);
        self.set_ram_text(&text.ram);
        self.set_storage_text(&text.storage);
    }
}

/// In-memory display state. Starts with the control enabled and idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub battery_text: String,
    pub ram_text: String,
    pub storage_text: String,
    pub refresh_enabled: bool,
    pub busy: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            battery_text: String::new(),
            ram_text: String::new(),
            storage_text: String::new(),
            refresh_enabled: true,
            busy: false,
        }
    }
}

impl DisplaySurface for DisplayState {
    fn set_battery_text(&mut self, text: &str) {
        self.battery_text = text.to_string();
    }

    fn set_ram_text(&mut self, text: &str) {
        self.ram_text = text.to_string();
    }

    fn set_storage_text(&mut self, text: &str) {
        self.storage_text = text.to_string();
    }

    fn set_refresh_enabled(&mut self, enabled: bool) {
        self.refresh_enabled = enabled;
    }

    fn is_refresh_enabled(&self) -> bool {
        self.refresh_enabled
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}
