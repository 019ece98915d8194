//! Lifecycle of the floating panel hosting the web UI.
//!
//! The host runtime owns an `Option<PanelHandle>`: `None` until the panel is
//! first opened, `Some` until it is destroyed.

use log::debug;

/// Palette notifications sent by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMessage {
    Open,
    Close,
    HideBegin,
    HideEnd,
    DisableItemsBegin,
    DisableItemsEnd,
    IsVisible,
}

/// State of a created panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelHandle {
    visible: bool,
    enabled: bool,
    hidden_by_host: bool,
}

impl PanelHandle {
    /// Creates a hidden, enabled panel.
    pub fn create() -> Self {
        Self {
            visible: false,
            enabled: true,
            hidden_by_host: false,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Shows the panel, creating it first if needed.
pub fn show_panel(panel: &mut Option<PanelHandle>) {
    panel.get_or_insert_with(PanelHandle::create).show();
}

/// Releases the panel.
pub fn destroy_panel(panel: &mut Option<PanelHandle>) {
    if panel.take().is_some() {
        debug!("panel destroyed");
    }
}

/// Applies a host notification. Returns whether the panel is visible
/// afterwards.
pub fn handle_palette_message(panel: &mut Option<PanelHandle>, msg: PaletteMessage) -> bool {
    match msg {
        PaletteMessage::Open => show_panel(panel),
        PaletteMessage::Close => {
            if let Some(p) = panel.as_mut() {
                p.hide();
            }
        }
        PaletteMessage::HideBegin => {
            if let Some(p) = panel.as_mut().filter(|p| p.visible) {
                p.hide();
                p.hidden_by_host = true;
            }
        }
        PaletteMessage::HideEnd => {
            if let Some(p) = panel.as_mut().filter(|p| p.hidden_by_host) {
                p.show();
                p.hidden_by_host = false;
            }
        }
        PaletteMessage::DisableItemsBegin => {
            if let Some(p) = panel.as_mut().filter(|p| p.visible) {
                p.enabled = false;
            }
        }
        PaletteMessage::DisableItemsEnd => {
            if let Some(p) = panel.as_mut().filter(|p| p.visible) {
                p.enabled = true;
            }
        }
        PaletteMessage::IsVisible => {}
    }
    panel.as_ref().is_some_and(PanelHandle::is_visible)
}
