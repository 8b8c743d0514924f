//! Wire types shared by the chat client and the development backend.

pub mod domain;
pub mod error;
pub mod protocol;
