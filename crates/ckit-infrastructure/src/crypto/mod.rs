//! Cryptographic services module
//!
//! RS256 JSON Web Tokens signed with PEM private keys, optionally
//! passphrase-protected (encrypted PKCS#8).

mod jwt;

pub use jwt::{JwtService, PrivateKeyStruct};
