/// Messages exchanged between the popup and the background page
///
/// Wire shape is `{ "type": "...", "payload": ... }` with the payload
/// omitted for plain control messages.

use crate::db::{Block, Settings};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every message type either side may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlAction {
    Start,
    Stop,
    Reset,
    Update,
    Settings,
    Delete,
    Move,
}

impl ControlAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlAction::Start => "START",
            ControlAction::Stop => "STOP",
            ControlAction::Reset => "RESET",
            ControlAction::Update => "UPDATE",
            ControlAction::Settings => "SETTINGS",
            ControlAction::Delete => "DELETE",
            ControlAction::Move => "MOVE",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recording controls the user can press in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Start,
    Stop,
    Reset,
}

/// Background page → popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    Start,
    Stop,
    Reset,
    /// Full ordered block list
    Update(Vec<Block>),
}

impl InboundMessage {
    /// Parse a message as received from the runtime
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn action(&self) -> ControlAction {
        match self {
            InboundMessage::Start => ControlAction::Start,
            InboundMessage::Stop => ControlAction::Stop,
            InboundMessage::Reset => ControlAction::Reset,
            InboundMessage::Update(_) => ControlAction::Update,
        }
    }
}

/// Drag and drop positions of a moved block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub drag_idx: usize,
    pub drop_idx: usize,
}

/// Popup → background page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    Start,
    Stop,
    Reset,
    /// Full settings record
    Settings(Settings),
    /// Index of the removed block
    Delete(usize),
    Move(MovePayload),
}

impl OutboundMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn action(&self) -> ControlAction {
        match self {
            OutboundMessage::Start => ControlAction::Start,
            OutboundMessage::Stop => ControlAction::Stop,
            OutboundMessage::Reset => ControlAction::Reset,
            OutboundMessage::Settings(_) => ControlAction::Settings,
            OutboundMessage::Delete(_) => ControlAction::Delete,
            OutboundMessage::Move(_) => ControlAction::Move,
        }
    }
}

impl From<ToggleAction> for OutboundMessage {
    fn from(action: ToggleAction) -> Self {
        match action {
            ToggleAction::Start => OutboundMessage::Start,
            ToggleAction::Stop => OutboundMessage::Stop,
            ToggleAction::Reset => OutboundMessage::Reset,
        }
    }
}
