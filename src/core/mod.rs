/// Core functionality modules
///
/// Contains the state store, the ordered block list it manages,
/// the popup view state and the messages it exchanges.

pub mod block_list;
pub mod messages;
pub mod model;
pub mod popup;

pub use block_list::BlockList;
pub use messages::{ControlAction, InboundMessage, MovePayload, OutboundMessage, ToggleAction};
pub use model::Model;
pub use popup::{Clipboard, Popup};
