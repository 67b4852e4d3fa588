//! Template backend HTTP client.
//!
//! Speaks the three-endpoint contract the document adapter needs: fetch the
//! style overlay, fetch the spreadsheet file, save the whole document.
//! Blocking, no retries.

mod auth;
mod client;

pub use auth::{load_token, load_token_from, save_token_to, token_file_path, StoredToken};
pub use client::{ClientError, ClientOptions, TemplateClient};
