mod fanout;
mod handler;
mod room_manager;

pub use fanout::start_fanout;
pub use handler::ws_handler;
pub use room_manager::{ClientSubscription, RoomManager};
