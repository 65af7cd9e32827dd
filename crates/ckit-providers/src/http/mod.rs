//! HTTP Client
//!
//! [`HttpClient`] sends the request described by an [`HttpOption`] and
//! reports ordinary failures as result envelopes instead of errors.
//!
//! | Method | Body |
//! |--------|------|
//! | `try_post_json` / `try_patch_json` | JSON object of the parameters |
//! | `try_post_url_encode` | `application/x-www-form-urlencoded` |
//! | `try_get_json` | none, parameters go to the query string |
//! | `try_post_form_data` | `multipart/form-data` with attachments |

pub mod client;
pub mod option;

pub use client::{HttpClient, HttpReply};
pub use option::{Attachment, HttpOption};
