//! Room command handlers.

mod create_room;
mod delete_room;
mod rename_room;

pub use create_room::{CreateRoomCommand, CreateRoomError, CreateRoomHandler, CreateRoomResult};
pub use delete_room::{DeleteRoomCommand, DeleteRoomError, DeleteRoomHandler, DeleteRoomResult};
pub use rename_room::{RenameRoomCommand, RenameRoomError, RenameRoomHandler, RenameRoomResult};
