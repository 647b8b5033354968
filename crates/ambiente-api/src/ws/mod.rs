mod broadcaster;
mod handler;
mod heartbeat;
mod manager;
mod protocol;

pub use broadcaster::WsBroadcaster;
pub use handler::ws_handler;
pub use heartbeat::heartbeat_loop;
pub use manager::{WsConnection, WsManager, WsSender};
pub use protocol::{ClientEvent, ServerEvent};
