//! Document identifiers
//!
//! A document key is either the store-native 12-byte object id or its
//! transport string. Conversions between the two are explicit and total:
//! `Opaque → Transport` always succeeds, `Transport → Opaque` succeeds iff the
//! string is 24 hex digits.

use std::fmt;

use bson::oid::ObjectId;
use bson::Bson;
use thiserror::Error;

/// Errors converting a transport string into a store-native id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// String is not 24 hex digits
    #[error("'{0}' is not a valid object id")]
    NotAnObjectId(String),

    /// Stored value cannot serve as a key
    #[error("unsupported key type: {0}")]
    Unsupported(String),
}

/// Identifier of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocKey {
    /// Store-assigned object id
    Opaque(ObjectId),
    /// Textual form used in JSON and URLs
    Transport(String),
}

impl DocKey {
    /// Lowercase hex for object ids, the string itself otherwise
    pub fn to_transport(&self) -> String {
        match self {
            DocKey::Opaque(oid) => oid.to_hex(),
            DocKey::Transport(s) => s.clone(),
        }
    }

    /// Parses the key as a store-native object id
    pub fn to_opaque(&self) -> Result<ObjectId, KeyError> {
        match self {
            DocKey::Opaque(oid) => Ok(*oid),
            DocKey::Transport(s) => {
                ObjectId::parse_str(s).map_err(|_| KeyError::NotAnObjectId(s.clone()))
            }
        }
    }

    /// Reads a key out of a stored `_id` value
    pub fn from_bson(value: &Bson) -> Result<Self, KeyError> {
        match value {
            Bson::ObjectId(oid) => Ok(DocKey::Opaque(*oid)),
            Bson::String(s) => Ok(DocKey::Transport(s.clone())),
            Bson::Int32(i) => Ok(DocKey::Transport(i.to_string())),
            Bson::Int64(i) => Ok(DocKey::Transport(i.to_string())),
            other => Err(KeyError::Unsupported(format!("{:?}", other.element_type()))),
        }
    }

    /// Storage form of the key
    pub fn into_bson(self) -> Bson {
        match self {
            DocKey::Opaque(oid) => Bson::ObjectId(oid),
            DocKey::Transport(s) => Bson::String(s),
        }
    }
}

impl From<ObjectId> for DocKey {
    fn from(oid: ObjectId) -> Self {
        DocKey::Opaque(oid)
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_opaque_renders_lowercase_hex() {
        let oid = ObjectId::parse_str("65A1B2C3D4E5F60718293A4B").unwrap();
        let key = DocKey::from(oid);
        assert_eq!(key.to_transport(), "65a1b2c3d4e5f60718293a4b");
        assert_eq!(key.to_string(), key.to_transport());
    }

    #[test]
    fn test_render_is_stable_and_injective() {
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let oid = ObjectId::new();
            let key = DocKey::Opaque(oid);
            let hex = key.to_transport();
            assert_eq!(hex, key.to_transport());
            assert_eq!(hex.len(), 24);
            assert!(seen.insert(hex));
        }
    }

    #[test]
    fn test_transport_round_trips_to_opaque() {
        let oid = ObjectId::new();
        let transport = DocKey::Transport(oid.to_hex());
        assert_eq!(transport.to_opaque().unwrap(), oid);
    }

    #[test]
    fn test_non_hex_transport_is_not_opaque() {
        let key = DocKey::Transport("branch-7".to_string());
        assert_eq!(
            key.to_opaque(),
            Err(KeyError::NotAnObjectId("branch-7".to_string()))
        );
    }

    #[test]
    fn test_from_bson() {
        let oid = ObjectId::new();
        assert_eq!(DocKey::from_bson(&Bson::ObjectId(oid)).unwrap(), DocKey::Opaque(oid));
        assert_eq!(
            DocKey::from_bson(&Bson::Int64(7)).unwrap(),
            DocKey::Transport("7".to_string())
        );
        assert!(DocKey::from_bson(&Bson::Boolean(true)).is_err());
    }
}
