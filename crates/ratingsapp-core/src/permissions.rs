//! Role permission bitmask.
//!
//! Each named permission owns one power-of-two bit of a 64-bit mask. On the wire
//! a mask is an array of names in ascending bit order:
//!
//! ```ignore
//! use ratingsapp_core::permissions::Permissions;
//!
//! let held = Permissions::READ_USERS | Permissions::WRITE_USERS;
//! assert_eq!(held.names(), vec!["readUsers", "writeUsers"]);
//! assert!(held.contains(Permissions::READ_USERS));
//! assert!(!held.contains(Permissions::READ_USERS | Permissions::READ_RATINGS));
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Returned when decoding a permission name that is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions(i64);

impl Permissions {
    pub const NONE: Permissions = Permissions(0);
    pub const READ_USERS: Permissions = Permissions(1);
    pub const WRITE_USERS: Permissions = Permissions(1 << 1);
    pub const READ_RATINGS: Permissions = Permissions(1 << 2);
    pub const WRITE_RATINGS: Permissions = Permissions(1 << 3);
    /// Every bit set, including bits without a name.
    pub const ALL: Permissions = Permissions(-1);

    pub const fn from_bits(bits: i64) -> Self {
        Permissions(bits)
    }

    pub const fn bits(self) -> i64 {
        self.0
    }

    /// AND rule: `true` when every bit of `required` is held.
    pub const fn contains(self, required: Permissions) -> bool {
        self.0 & required.0 == required.0
    }

    pub const fn union(self, other: Permissions) -> Self {
        Permissions(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(bits, _)| *bits)
    }

    /// Names of the recognized bits that are set, in ascending bit order.
    pub fn names(self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(bits, _)| self.contains(*bits))
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, UnknownPermission>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Permissions::NONE, |acc, name| {
            let name = name.as_ref();
            Permissions::from_name(name)
                .map(|bits| acc | bits)
                .ok_or_else(|| UnknownPermission(name.to_string()))
        })
    }
}

/// Name table, ascending bit order.
static NAMES: [(Permissions, &str); 4] = [
    (Permissions::READ_USERS, "readUsers"),
    (Permissions::WRITE_USERS, "writeUsers"),
    (Permissions::READ_RATINGS, "readRatings"),
    (Permissions::WRITE_RATINGS, "writeRatings"),
];

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Permissions) -> Permissions {
        self.union(rhs)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Permissions) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Permissions {
    type Output = Permissions;

    fn bitand(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 & rhs.0)
    }
}

impl From<i64> for Permissions {
    fn from(bits: i64) -> Self {
        Permissions(bits)
    }
}

impl From<Permissions> for i64 {
    fn from(permissions: Permissions) -> Self {
        permissions.0
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PermissionsVisitor;

        impl<'de> Visitor<'de> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of permission names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Permissions, A::Error> {
                let mut permissions = Permissions::NONE;
                while let Some(name) = seq.next_element::<String>()? {
                    permissions |= Permissions::from_name(&name)
                        .ok_or_else(|| de::Error::custom(UnknownPermission(name)))?;
                }
                Ok(permissions)
            }
        }

        deserializer.deserialize_seq(PermissionsVisitor)
    }
}
