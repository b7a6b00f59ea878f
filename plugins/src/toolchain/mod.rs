pub mod command;
pub mod go;

pub use command::CommandToolchain;
pub use go::GoToolchain;
