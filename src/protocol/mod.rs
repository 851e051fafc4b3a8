//! JSON shapes exchanged with the REST and event-stream collaborators, plus a
//! room container that owns one game and serializes the moves applied to it.

mod api;
mod event;
mod room;

pub use api::{ApiResponse, CreateRoomRequest, JoinRoomRequest, MakeMoveRequest};
pub use event::{GameEvent, GameEventKind};
pub use room::{GameRoom, Seats};
