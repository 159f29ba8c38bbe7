mod alignment_skip;
mod command_error;
mod configuration_error;
mod precondition_error;

pub use alignment_skip::*;
pub use command_error::*;
pub use configuration_error::*;
pub use precondition_error::*;
