//! Deploy Lambda: repoint a function's code at a freshly uploaded package

pub mod handler;
pub mod updater;

pub use handler::{
    SUCCESS_MESSAGE, UploadLocation, handle_upload, handler, parse_upload_event,
};
pub use updater::{FunctionCodeUpdater, LambdaCodeUpdater};
