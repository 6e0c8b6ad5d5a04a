//! Resource-service client: uploading binary payloads and rewriting rich
//! content so adapters only ever ship reference URLs.

pub mod error;
pub mod upload;

pub use {
    error::{Error, Result},
    upload::{HttpUploader, Uploader, rewrite_rich_content},
};
