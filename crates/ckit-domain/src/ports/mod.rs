//! Domain Port Interfaces
//!
//! Contracts implemented by the provider layer. The messaging client in
//! `ckit-providers` drives any broker through these traits, so the AMQP
//! connector and the in-memory broker are interchangeable.

/// Message broker ports
pub mod messaging;

pub use messaging::{
    BrokerConnector, BrokerSession, DeliveryStream, SessionEvent, SessionEventStream,
};
