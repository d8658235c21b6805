/// Popup view state
///
/// Mirrors what the popup shows and reacts to user input and to messages
/// from the background page. Block edits are applied to the local copy right
/// away and reported to the background page, which owns the session.

use crate::core::messages::{InboundMessage, MovePayload, OutboundMessage, ToggleAction};
use crate::core::BlockList;
use crate::db::{Block, RecState, Settings, SingleSetting, StorageKey};
use crate::error::{RecorderError, Result};
use crate::storage::KeyValueStore;
use tokio::sync::mpsc::UnboundedSender;

/// Pages the recorder cannot attach to
const RESTRICTED_URL_PREFIX: &str = "chrome://";

/// Destination for exported blocks
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), String>;
}

pub struct Popup {
    rec_status: RecState,
    code_blocks: BlockList,
    settings: Settings,
    should_info_display: bool,
    should_wait_request: bool,
    is_valid_tab: bool,
    outbound: UnboundedSender<OutboundMessage>,
}

impl Popup {
    pub fn new(outbound: UnboundedSender<OutboundMessage>) -> Self {
        Self {
            rec_status: RecState::Off,
            code_blocks: BlockList::new(),
            settings: Settings::default(),
            should_info_display: false,
            should_wait_request: false,
            is_valid_tab: true,
            outbound,
        }
    }

    pub fn rec_status(&self) -> RecState {
        self.rec_status
    }

    pub fn code_blocks(&self) -> &BlockList {
        &self.code_blocks
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn should_info_display(&self) -> bool {
        self.should_info_display
    }

    pub fn should_wait_request(&self) -> bool {
        self.should_wait_request
    }

    pub fn is_valid_tab(&self) -> bool {
        self.is_valid_tab
    }

    /// Load the last persisted state when the popup opens.
    ///
    /// Only an active or paused session status is adopted; blocks and
    /// settings replace the view copy when present.
    pub async fn hydrate(&mut self, store: &dyn KeyValueStore) -> Result<()> {
        let items = store.get(&StorageKey::ALL).await?;

        if let Some(blocks) = items.code_blocks {
            self.code_blocks = blocks.into();
        }
        if let Some(status) = items.status.filter(|s| s.has_session()) {
            self.rec_status = status;
        }
        self.settings = items.settings.unwrap_or_default();

        tracing::debug!(
            status = %self.rec_status,
            blocks = self.code_blocks.len(),
            "popup hydrated"
        );
        Ok(())
    }

    /// Mark the tab invalid when it's a browser-internal page
    pub fn check_tab(&mut self, url: &str) {
        if url.starts_with(RESTRICTED_URL_PREFIX) {
            self.is_valid_tab = false;
        }
    }

    pub fn handle_message(&mut self, message: InboundMessage) {
        self.should_info_display = false;
        match message {
            InboundMessage::Start => {
                if self.is_valid_tab {
                    self.start_recording();
                }
            }
            InboundMessage::Stop => self.stop_recording(),
            InboundMessage::Reset => self.reset_recording(),
            InboundMessage::Update(blocks) => {
                tracing::debug!(blocks = blocks.len(), "blocks updated by background");
                self.code_blocks = blocks.into();
            }
        }
    }

    /// Footer button: apply locally, then tell the background page
    pub fn handle_toggle(&mut self, action: ToggleAction) {
        self.should_info_display = false;
        match action {
            ToggleAction::Start => self.start_recording(),
            ToggleAction::Stop => self.stop_recording(),
            ToggleAction::Reset => self.reset_recording(),
        }
        self.send(action.into());
    }

    pub fn toggle_settings(&mut self) {
        self.rec_status = if self.rec_status == RecState::Off {
            RecState::Settings
        } else {
            RecState::Off
        };
    }

    pub fn toggle_info_display(&mut self) {
        self.should_info_display = !self.should_info_display;
    }

    pub fn toggle_wait_request(&mut self) {
        self.should_wait_request = !self.should_wait_request;
    }

    /// Flip one switch and send the whole settings record
    pub fn save_setting(&mut self, setting: SingleSetting) {
        let mut settings = self.settings.clone();
        settings.set(&setting.name, setting.value);
        self.settings = settings.clone();
        self.send(OutboundMessage::Settings(settings));
    }

    pub fn destroy_block(&mut self, index: usize) -> Result<Block> {
        let removed = self.code_blocks.remove(index)?;
        self.send(OutboundMessage::Delete(index));
        Ok(removed)
    }

    pub fn move_block(&mut self, drag_idx: usize, drop_idx: usize) -> Result<()> {
        self.code_blocks.move_block(drag_idx, drop_idx)?;
        self.send(OutboundMessage::Move(MovePayload { drag_idx, drop_idx }));
        Ok(())
    }

    /// Every block on its own line, in order
    pub fn export_text(&self) -> String {
        self.code_blocks.to_text()
    }

    pub fn copy_to_clipboard(&self, clipboard: &mut dyn Clipboard) -> Result<()> {
        clipboard
            .write_text(&self.export_text())
            .map_err(RecorderError::Clipboard)
    }

    fn start_recording(&mut self) {
        self.rec_status = RecState::On;
    }

    fn stop_recording(&mut self) {
        self.rec_status = RecState::Paused;
    }

    fn reset_recording(&mut self) {
        self.rec_status = RecState::Off;
        self.code_blocks.clear();
    }

    fn send(&self, message: OutboundMessage) {
        let action = message.action();
        if self.outbound.send(message).is_err() {
            tracing::warn!(%action, "background page gone, dropped message");
        }
    }
}
