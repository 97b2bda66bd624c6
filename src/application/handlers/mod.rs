//! Use-case handlers.

mod handle_message;

pub use handle_message::{
    HandleMessageCommand, HandleMessageError, HandleMessageHandler, HandleMessageResponse,
};
