mod bar;
mod interval;
mod symbol;
mod tick;
mod timestamp;
mod venue;

pub use bar::Bar;
pub use interval::Interval;
pub use symbol::Symbol;
pub use tick::{Tick, BOOK_DEPTH};
pub use timestamp::UtcTimestamp;
pub use venue::Venue;
