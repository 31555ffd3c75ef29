pub mod filter;
pub mod key_event;
pub mod navigation;

pub use filter::*;
pub use key_event::*;
pub use navigation::*;
