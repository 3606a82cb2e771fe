use super::AuditTrail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Type-safe identifier for Products. The backend uses integer keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A product as served by the catalog endpoint.
///
/// # Wire format
/// The backend names the active flag `status`; it is exposed here as `active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(deserialize_with = "super::whole_number::deserialize")]
    pub price: u64,
    pub stock: u32,
    #[serde(rename = "status")]
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

impl Product {
    /// Creates an active product with no image and empty audit columns.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            price,
            stock,
            active: true,
            audit: AuditTrail::default(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// An image file attached to a product create request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads an image from disk, keeping only the final path component as its name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// MIME type derived from the extension, `None` for anything that is not an image.
    pub fn content_type(&self) -> Option<&'static str> {
        let ext = Path::new(&self.file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

/// Payload for creating a new product (sent as multipart form data).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCreate {
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub active: bool,
    pub image: Option<ImageUpload>,
    pub creby: String,
    pub cretime: DateTime<Utc>,
}

/// Partial update of a stored product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub active: Option<bool>,
}
