//! EXIF data embedded in image metadata.
//!
//! The service groups EXIF tags into image, thumbnail, exif, gps and
//! interoperability records plus vendor maker notes. Tag names keep the
//! service's PascalCase spelling on the wire. Absent tags decode to their
//! zero value; numeric camera quantities are kept at source precision.

use crate::decode::null_as_default;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Date format used by EXIF date tags, e.g. `2008:07:31 10:38:11`.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Parses an EXIF date tag. Returns `None` for empty or malformed values.
///
/// # Examples
///
/// ```
/// use libimagekit::metadata::exif::parse_exif_date;
///
/// let date = parse_exif_date("2008:07:31 10:38:11").unwrap();
/// assert_eq!(date.to_string(), "2008-07-31 10:38:11");
/// assert!(parse_exif_date("").is_none());
/// ```
pub fn parse_exif_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), EXIF_DATE_FORMAT).ok()
}

/// All EXIF records of an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifTree {
    #[serde(deserialize_with = "null_as_default")]
    pub image: ImageExif,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail: ThumbnailExif,
    #[serde(deserialize_with = "null_as_default")]
    pub exif: ExposureExif,
    #[serde(deserialize_with = "null_as_default")]
    pub gps: Gps,
    #[serde(deserialize_with = "null_as_default")]
    pub interoperability: Interoperability,
    /// Vendor-specific notes; shape varies by camera maker
    #[serde(deserialize_with = "null_as_default")]
    pub makernote: BTreeMap<String, Value>,
}

/// IFD0 tags describing the main image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ImageExif {
    pub make: String,
    pub model: String,
    pub orientation: u16,
    pub x_resolution: f64,
    pub y_resolution: f64,
    pub resolution_unit: u16,
    pub software: String,
    pub modify_date: String,
    #[serde(rename = "YCbCrPositioning")]
    pub y_cb_cr_positioning: u16,
    pub exif_offset: u64,
    #[serde(rename = "GPSInfo")]
    pub gps_info: u64,
}

impl ImageExif {
    /// Parses `ModifyDate`.
    pub fn modify_date_time(&self) -> Option<NaiveDateTime> {
        parse_exif_date(&self.modify_date)
    }
}

/// IFD1 tags describing the embedded thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ThumbnailExif {
    pub compression: u16,
    pub x_resolution: f64,
    pub y_resolution: f64,
    pub resolution_unit: u16,
    pub thumbnail_offset: u64,
    pub thumbnail_length: u64,
}

/// Exif sub-IFD tags: exposure, lens and capture settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExposureExif {
    /// Seconds, e.g. `0.00625` for 1/160
    pub exposure_time: f64,
    pub f_number: f64,
    pub exposure_program: u16,
    #[serde(rename = "ISO")]
    pub iso: u32,
    pub exif_version: String,
    pub date_time_original: String,
    pub create_date: String,
    pub shutter_speed_value: f64,
    pub aperture_value: f64,
    pub exposure_compensation: f64,
    pub metering_mode: u16,
    pub flash: u16,
    /// Millimetres
    pub focal_length: f64,
    pub sub_sec_time: String,
    pub sub_sec_time_original: String,
    pub sub_sec_time_digitized: String,
    pub flashpix_version: String,
    pub color_space: u16,
    pub exif_image_width: u32,
    pub exif_image_height: u32,
    pub interop_offset: u64,
    pub focal_plane_x_resolution: f64,
    pub focal_plane_y_resolution: f64,
    pub focal_plane_resolution_unit: u16,
    pub custom_rendered: u16,
    pub exposure_mode: u16,
    pub white_balance: u16,
    pub scene_capture_type: u16,
}

impl ExposureExif {
    /// Parses `DateTimeOriginal`.
    pub fn original_date_time(&self) -> Option<NaiveDateTime> {
        parse_exif_date(&self.date_time_original)
    }

    /// Parses `CreateDate`.
    pub fn create_date_time(&self) -> Option<NaiveDateTime> {
        parse_exif_date(&self.create_date)
    }
}

/// GPS IFD tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gps {
    #[serde(rename = "GPSVersionID", deserialize_with = "null_as_default")]
    pub gps_version_id: Vec<u8>,
}

/// Interoperability IFD tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Interoperability {
    pub interop_index: String,
    pub interop_version: String,
}
