//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`CustomResult`] | Uniform `{code, message, result, traceId}` envelope |
//! | [`Delivery`] | A message received from a broker queue |
//! | [`QueueOptions`] / [`ExchangeOptions`] | Broker topology options |
//! | [`ConsumeOptions`] / [`PublishOptions`] | Per-operation broker options |
//! | [`RetryPolicy`] | Bounded reconnect policy |

/// Messaging value objects
pub mod messaging;
/// Result envelope
pub mod result;

pub use messaging::{
    ClientMode, ConnectionOptions, ConsumeOptions, Delivery, ExchangeKind, ExchangeOptions,
    PublishOptions, QueueOptions, RetryPolicy,
};
pub use result::CustomResult;
