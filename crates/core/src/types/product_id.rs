//! Product identifier type.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty.
    #[error("product id cannot be empty")]
    Empty,
}

/// A reference to a catalog product.
///
/// The catalog hands out numeric record ids while the browser storage keeps
/// strings, so ids are normalized to their string form: `ProductId::from(42)`
/// and `"42".parse::<ProductId>()` compare equal.
///
/// ## Serialization
///
/// Always serialized as a JSON string. Deserializes from either a string or an
/// integer so that data written by older clients still loads.
///
/// ## Examples
///
/// ```
/// use quickcart_core::ProductId;
///
/// let from_number = ProductId::from(42_u64);
/// let from_text = ProductId::parse("42").unwrap();
/// assert_eq!(from_number, from_text);
///
/// assert!(ProductId::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if the input is empty.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        if s.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

macro_rules! product_id_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ProductId {
                fn from(id: $ty) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

product_id_from_integer!(i32, i64, u32, u64);

impl TryFrom<&str> for ProductId {
    type Error = ProductIdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(s))
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty string or an integer product id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ProductId, E> {
        ProductId::parse(v).map_err(E::custom)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ProductId, E> {
        ProductId::try_from(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProductId, E> {
        Ok(ProductId::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProductId, E> {
        Ok(ProductId::from(v))
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}
