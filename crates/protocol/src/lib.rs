#![forbid(unsafe_code)]

mod action;
mod condition;
mod event;
mod instruction;
mod parse;

pub use action::{Action, Outcome};
pub use condition::Condition;
pub use event::{APPLICATION_JSON, Event, SPEC_VERSION, validate_spec_version};
pub use instruction::{Instruction, Instructions};
pub use parse::{ParamError, Parse};
