pub mod completions;
pub mod field;
pub mod optimize;
pub mod util;
pub mod validate;
