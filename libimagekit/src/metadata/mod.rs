//! Image metadata and custom metadata fields.
//!
//! [`MetadataApi`] reads technical metadata (dimensions, format, perceptual
//! hash, EXIF) of an image, either by asset id or by public URL, and manages
//! the account's custom metadata field definitions.
//!
//! # Examples
//!
//! ```no_run
//! use libimagekit::{Config, Context, MetadataApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_params("private_key", "public_key", "https://ik.imagekit.io/demo/");
//!     let api = MetadataApi::from_config(&config)?;
//!
//!     let metadata = api.fetch_from_asset(&Context::background(), "file_id").await?;
//!     println!("{}x{} {}", metadata.data.width, metadata.data.height, metadata.data.format);
//!     Ok(())
//! }
//! ```

pub mod custom_field;
pub mod exif;

pub use custom_field::{
    CreateCustomFieldParam, CustomField, CustomFieldResponse, CustomFieldSchema,
    CustomFieldSchemaPatch, CustomFieldType, CustomFieldsResponse, FieldValue,
    UpdateCustomFieldParam,
};
pub use exif::{ExifTree, ExposureExif, Gps, ImageExif, Interoperability, ThumbnailExif};

use crate::client::{Client, Query, Transport};
use crate::config::Config;
use crate::context::Context;
use crate::decode::null_as_default;
use crate::error::{ImageKitError, Result};
use crate::response::ApiResponse;
use reqwest::{Client as ReqwestClient, Method};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;


/// Technical metadata of an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub height: u32,
    pub width: u32,
    /// File size in bytes
    pub size: u64,
    pub format: String,
    pub has_color_profile: bool,
    pub quality: u32,
    /// Pixels per inch
    pub density: u32,
    pub has_transparency: bool,
    /// Perceptual hash, hex encoded
    #[serde(rename = "pHash")]
    pub p_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub exif: ExifTree,
}

/// Response of the metadata read operations.
pub type MetadataResponse = ApiResponse<Metadata>;

/// Client for the metadata endpoints.
///
/// The API is cheap to clone; clones share credentials and the transport.
#[derive(Debug, Clone)]
pub struct MetadataApi<T = ReqwestClient> {
    client: Client<T>,
}

impl MetadataApi<ReqwestClient> {
    /// Creates an API client configured from `IMAGEKIT_*` environment
    /// variables.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    /// Creates an API client from an explicit configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::new(config)?,
        })
    }
}

impl<T: Transport> MetadataApi<T> {
    /// Creates an API client that sends through `transport`.
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            client: Client::with_transport(config, transport),
        }
    }

    /// Returns the underlying HTTP client.
    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    /// Fetches metadata of a file in the media library.
    ///
    /// Sends `GET files/{fileId}/metadata` and expects `200`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageKitError::InvalidArgument`] without sending anything
    /// if `file_id` is empty. Non-200 responses are returned as
    /// [`ImageKitError::Service`] or [`ImageKitError::UnexpectedResponse`],
    /// and undecodable bodies as [`ImageKitError::Decode`]; all three keep
    /// the raw response.
    pub async fn fetch_from_asset(&self, ctx: &Context, file_id: &str) -> Result<MetadataResponse> {
        if file_id.is_empty() {
            return Err(ImageKitError::invalid_argument("fileId can not be blank"));
        }

        let request =
            self.client
                .build_request(Method::GET, &["files", file_id, "metadata"], &Query::new())?;
        let response = self.client.send(ctx, request).await?.expect_status(200)?;

        ApiResponse::decode(response)
    }

    /// Fetches metadata of an image by its public URL.
    ///
    /// Sends `GET metadata?url={url}` and expects `200`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageKitError::InvalidArgument`] without sending anything
    /// if `url` is empty. Other failures as for
    /// [`MetadataApi::fetch_from_asset`].
    pub async fn fetch_from_url(&self, ctx: &Context, url: &str) -> Result<MetadataResponse> {
        if url.is_empty() {
            return Err(ImageKitError::invalid_argument("url can not be blank"));
        }

        let mut query = Query::new();
        query.insert("url".to_string(), url.to_string());

        let request = self.client.build_request(Method::GET, &["metadata"], &query)?;
        let response = self.client.send(ctx, request).await?.expect_status(200)?;

        ApiResponse::decode(response)
    }
}
