pub mod chat;
pub mod recall;
pub mod tools;
