//! URL handling module for pagehoard
//!
//! Discovered hrefs pass through here before registration: relative links are
//! resolved against the page they appeared on, and absolute candidates must
//! carry a recognized scheme and a dotted domain.

mod resolve;

pub use resolve::{accept_link, resolve_link};
