pub mod models;

pub use models::{Binding, Message, User};
