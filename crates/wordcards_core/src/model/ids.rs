//! Typed entity identifiers.
//!
//! Each id wraps the storage-assigned `INTEGER PRIMARY KEY` so a `CardId`
//! can never be passed where a `ListId` or `UserId` is expected.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

entity_id!(
    /// Registered account identity.
    UserId
);
entity_id!(
    /// Word list identity.
    ListId
);
entity_id!(
    /// Card identity.
    CardId
);
entity_id!(
    /// Quiz attempt identity.
    AttemptId
);

#[cfg(test)]
mod tests {
    use super::{CardId, UserId};

    #[test]
    fn ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&UserId(7)).unwrap(), "7");
        let parsed: CardId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, CardId(42));
    }
}
