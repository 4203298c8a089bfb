pub mod error;
pub mod list;
pub mod models;
pub mod sample;

pub use error::{CommonError, CommonResult};
pub use models::{Chat, Keyed, Message, Sender};
