mod chat;
mod keyed;
mod message;

pub use chat::Chat;
pub use keyed::Keyed;
pub use message::{Message, Sender};
