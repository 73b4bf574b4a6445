//! Identifier types for schedule records.
//!
//! Identifiers are opaque strings taken from the dataset. Each table gets
//! its own newtype so a trip id can never be passed where a stop id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! schedule_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

schedule_id!(
    /// Stop, platform or station identifier.
    StopId
);
schedule_id!(
    /// Trip identifier.
    TripId
);
schedule_id!(
    /// Route identifier.
    RouteId
);
schedule_id!(
    /// Agency (operator) identifier.
    AgencyId
);
schedule_id!(
    /// Service identifier shared by the calendar and its trips.
    ServiceId
);
