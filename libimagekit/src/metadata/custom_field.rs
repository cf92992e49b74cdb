//! Custom metadata fields.
//!
//! Custom fields are account-wide attribute definitions the service uses to
//! validate user metadata on assets. This module models their schema and
//! implements the create, list, update and delete operations.

use super::MetadataApi;
use crate::client::{Query, Transport};
use crate::context::Context;
use crate::decode::null_as_default;
use crate::error::{ImageKitError, Result};
use crate::response::{ApiResponse, Response};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const CUSTOM_FIELDS: &str = "customFields";

/// Type of values a custom field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomFieldType {
    Number,
    Text,
    Date,
    Boolean,
    SingleSelect,
    MultiSelect,
}

/// A loosely-typed schema value: default values, select options and bounds
/// may be numbers, strings, booleans or lists depending on the field type.
/// Any other JSON shape is kept as `Null` or `Object`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<FieldValue>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl FieldValue {
    /// Creates a numeric value from a float. Returns `None` for NaN or
    /// infinite values, which JSON cannot carry.
    pub fn float(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Self::Number)
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! field_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    Self::Number(value.into())
                }
            }
        )*
    };
}

field_value_from_int!(i32, i64, u32, u64);

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<V: Into<FieldValue>> From<Vec<V>> for FieldValue {
    fn from(values: Vec<V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Validation schema of a custom field.
///
/// Only the type is mandatory. The service, not this client, checks that
/// the bounds and options are compatible with the type.
///
/// # Examples
///
/// ```
/// use libimagekit::metadata::{CustomFieldSchema, CustomFieldType};
///
/// let schema = CustomFieldSchema::new(CustomFieldType::Number)
///     .with_default_value(100)
///     .with_min_value(1)
///     .with_max_value(120);
/// assert_eq!(schema.field_type, CustomFieldType::Number);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSchema {
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_options: Option<Vec<FieldValue>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_value_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl CustomFieldSchema {
    /// Creates a schema of the given type with no constraints.
    pub fn new(field_type: CustomFieldType) -> Self {
        Self {
            field_type,
            default_value: None,
            select_options: None,
            is_value_required: false,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
        }
    }

    pub fn with_default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_select_options<V: Into<FieldValue>>(mut self, options: Vec<V>) -> Self {
        self.select_options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_value_required(mut self, required: bool) -> Self {
        self.is_value_required = required;
        self
    }

    pub fn with_min_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.min_value = Some(value.into());
        self
    }

    pub fn with_max_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.max_value = Some(value.into());
        self
    }

    pub fn with_min_length(mut self, length: u32) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn with_max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }
}

/// Partial schema for updates. Unset members are left unchanged by the
/// service; the type of an existing field cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSchemaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_options: Option<Vec<FieldValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_value_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// A custom field definition as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub schema: CustomFieldSchema,
}

/// Parameters for [`MetadataApi::create_custom_field`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCustomFieldParam {
    /// API name of the field; must not be empty
    pub name: String,
    /// Display label
    pub label: String,
    pub schema: CustomFieldSchema,
}

/// Parameters for [`MetadataApi::update_custom_field`].
///
/// Only the members that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCustomFieldParam {
    #[serde(skip)]
    pub field_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<CustomFieldSchemaPatch>,
}

/// Response of the create and update operations.
pub type CustomFieldResponse = ApiResponse<CustomField>;

/// Response of the list operation.
pub type CustomFieldsResponse = ApiResponse<Vec<CustomField>>;

impl<T: Transport> MetadataApi<T> {
    /// Creates a custom field.
    ///
    /// Sends `POST customFields` and expects `201 Created`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageKitError::InvalidArgument`] without sending anything
    /// if `param.name` is empty.
    pub async fn create_custom_field(
        &self,
        ctx: &Context,
        param: &CreateCustomFieldParam,
    ) -> Result<CustomFieldResponse> {
        if param.name.is_empty() {
            return Err(ImageKitError::invalid_argument("name can not be blank"));
        }

        let request = self
            .client
            .build_json_request(Method::POST, &[CUSTOM_FIELDS], param)?;
        let response = self.client.send(ctx, request).await?.expect_status(201)?;

        ApiResponse::decode(response)
    }

    /// Lists custom fields in the order the service returns them.
    ///
    /// Sends `GET customFields?includeDeletedFields=...` and expects `200`.
    pub async fn custom_fields(
        &self,
        ctx: &Context,
        include_deleted: bool,
    ) -> Result<CustomFieldsResponse> {
        let mut query = Query::new();
        query.insert(
            "includeDeletedFields".to_string(),
            include_deleted.to_string(),
        );

        let request = self
            .client
            .build_request(Method::GET, &[CUSTOM_FIELDS], &query)?;
        let response = self.client.send(ctx, request).await?.expect_status(200)?;

        ApiResponse::decode(response)
    }

    /// Updates the label and/or schema of a custom field.
    ///
    /// Sends `PATCH customFields/{fieldId}` with only the supplied members
    /// and expects `200`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageKitError::InvalidArgument`] without sending anything
    /// if `param.field_id` is empty.
    pub async fn update_custom_field(
        &self,
        ctx: &Context,
        param: &UpdateCustomFieldParam,
    ) -> Result<CustomFieldResponse> {
        if param.field_id.is_empty() {
            return Err(ImageKitError::invalid_argument("fieldId can not be blank"));
        }

        let request = self.client.build_json_request(
            Method::PATCH,
            &[CUSTOM_FIELDS, param.field_id.as_str()],
            param,
        )?;
        let response = self.client.send(ctx, request).await?.expect_status(200)?;

        ApiResponse::decode(response)
    }

    /// Deletes a custom field.
    ///
    /// Sends `DELETE customFields/{fieldId}` and expects `204 No Content`.
    /// The envelope is returned for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`ImageKitError::InvalidArgument`] without sending anything
    /// if `field_id` is empty.
    pub async fn delete_custom_field(&self, ctx: &Context, field_id: &str) -> Result<Response> {
        if field_id.is_empty() {
            return Err(ImageKitError::invalid_argument("fieldId can not be blank"));
        }

        let request = self.client.build_request(
            Method::DELETE,
            &[CUSTOM_FIELDS, field_id],
            &Query::new(),
        )?;

        self.client.send(ctx, request).await?.expect_status(204)
    }
}
