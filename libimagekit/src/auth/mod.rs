//! API credentials.
//!
//! Every request is authenticated with HTTP Basic authentication, using the
//! private key as the username and an empty password.


/// Key pair and URL endpoint of an ImageKit account.
///
/// Credentials are immutable once built and shared read-only by every
/// request issued from one client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    private_key: String,
    public_key: String,
    url_endpoint: String,
}

impl Credentials {
    /// Creates credentials from a key pair and URL endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::auth::Credentials;
    ///
    /// let creds = Credentials::new("private_key", "public_key", "https://ik.imagekit.io/demo/");
    /// assert_eq!(creds.public_key(), "public_key");
    /// ```
    pub fn new(
        private_key: impl Into<String>,
        public_key: impl Into<String>,
        url_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
            url_endpoint: url_endpoint.into(),
        }
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns the URL endpoint used for delivery URLs.
    pub fn url_endpoint(&self) -> &str {
        &self.url_endpoint
    }

    /// Returns the Authorization header value for these credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::auth::Credentials;
    ///
    /// let creds = Credentials::new("key", "", "");
    /// assert_eq!(creds.to_header_value(), "Basic a2V5Og==");
    /// ```
    pub fn to_header_value(&self) -> String {
        use base64::{Engine as _, engine::general_purpose};
        let credentials = format!("{}:", self.private_key);
        let encoded = general_purpose::STANDARD.encode(credentials);
        format!("Basic {}", encoded)
    }
}

// The private key must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("url_endpoint", &self.url_endpoint)
            .finish()
    }
}
