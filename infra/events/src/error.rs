use std::borrow::Cow;

/// Errors produced by the event bus.
#[cmt_derive::cmt_error]
pub enum EventBusError {
    /// The channel registered for a [`TypeId`](std::any::TypeId) holds a
    /// sender of a different concrete type. Indicates a bus-internal bug.
    #[error("Event type mismatch{}: {message}", format_context(context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Publishing to an event type nobody has subscribed to yet.
    #[error("No channel registered for event{}: {message}", format_context(context))]
    ChannelNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A subscriber requested a zero-sized buffer.
    #[error("Invalid channel capacity{}: {message}", format_context(context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
