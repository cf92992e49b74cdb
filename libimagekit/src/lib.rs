//! ImageKit metadata API client library
//!
//! `libimagekit` is a typed async client for the metadata endpoints of the
//! ImageKit media service: technical image metadata (dimensions, format,
//! perceptual hash, EXIF) and the schema of custom metadata fields.
//!
//! # Quick Start
//!
//! ```no_run
//! use libimagekit::{Context, MetadataApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads IMAGEKIT_PRIVATE_KEY, IMAGEKIT_PUBLIC_KEY, IMAGEKIT_ENDPOINT_URL
//!     let api = MetadataApi::new()?;
//!     let ctx = Context::background();
//!
//!     let metadata = api
//!         .fetch_from_url(&ctx, "https://ik.imagekit.io/demo/default-image.jpg")
//!         .await?;
//!     println!("pHash: {}", metadata.data.p_hash);
//!
//!     for field in api.custom_fields(&ctx, false).await?.data {
//!         println!("{} ({:?})", field.name, field.schema.field_type);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`MetadataApi`] - Metadata and custom field operations
//! - [`Config`] - Credentials and endpoint configuration
//! - [`Context`] - Cancellation and deadlines for a request
//! - [`ImageKitError`] - Error taxonomy shared by all operations
//!
//! Every operation performs exactly one HTTP round trip and never retries.
//! Non-success responses and undecodable bodies are reported as errors that
//! still carry the raw [`Response`].

#![warn(clippy::all)]

/// Returns the libimagekit crate version.
///
/// # Examples
///
/// ```
/// let version = libimagekit::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Re-export commonly used types for convenience
pub use auth::Credentials;
pub use config::Config;
pub use context::{CancelHandle, Context};
pub use error::{ImageKitError, Result, TransportKind};
pub use metadata::{
    CreateCustomFieldParam, CustomField, CustomFieldSchema, CustomFieldSchemaPatch,
    CustomFieldType, ExifTree, FieldValue, Metadata, MetadataApi, MetadataResponse,
    UpdateCustomFieldParam,
};
pub use response::{ApiResponse, Response};

// Low-level implementation modules (hidden from docs but still public)
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod context;
#[doc(hidden)]
pub mod decode;
#[doc(hidden)]
pub mod error;
pub mod metadata;
#[doc(hidden)]
pub mod response;
