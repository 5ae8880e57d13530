mod platform;
mod timer;

pub(crate) use platform::*;
pub(crate) use timer::*;
