//! UUID-backed identifiers for catalogue, review and order entities.

/// Raised when a path or payload carries something that is not an id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {value}")]
pub struct InvalidEntityId {
    pub value: String,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse a hyphenated UUID string without surrounding whitespace.
            pub fn new(
                id: impl AsRef<str>,
            ) -> Result<Self, $crate::domain::InvalidEntityId> {
                let raw = id.as_ref();
                let invalid = || $crate::domain::InvalidEntityId {
                    value: raw.to_owned(),
                };
                if raw.trim() != raw {
                    return Err(invalid());
                }
                ::uuid::Uuid::parse_str(raw).map(Self).map_err(|_| invalid())
            }

            pub fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::InvalidEntityId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

pub(crate) use entity_id;
