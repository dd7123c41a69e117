pub mod command;
pub mod frame;

pub use command::{lookup, CommandKind, CommandSpec};
pub use frame::{make_frame, split_frames};
