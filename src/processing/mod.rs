//! Output processing for the simulated service

mod stream;

pub use stream::ResponseStream;

pub(crate) use stream::StreamContext;
