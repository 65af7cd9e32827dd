//! Internationalization
//!
//! A small dictionary translator loading `<locale>.json` files.

mod translator;

pub use translator::{Dictionary, EasyTranslator};
