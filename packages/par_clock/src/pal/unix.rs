mod bindings;
mod platform;
mod timer;

use bindings::*;
pub(crate) use platform::*;
pub(crate) use timer::*;
