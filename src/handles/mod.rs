mod callback_handle;

pub use callback_handle::*;
