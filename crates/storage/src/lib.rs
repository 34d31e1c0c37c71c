#![forbid(unsafe_code)]

mod counter;
mod entry;

pub use counter::{CountStore, MAX_PERIOD};
pub use entry::CountEntry;
