#![forbid(unsafe_code)]

pub mod catalog;
pub mod countdown;
pub mod model;
pub mod shuffle;
pub mod time;

pub use time::Clock;
