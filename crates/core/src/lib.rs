#![forbid(unsafe_code)]

pub mod model;
pub mod syllabus;
pub mod time;
pub mod timer;

pub use time::Clock;
