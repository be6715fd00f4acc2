//! Identifier newtypes for shipment-side records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// The wrapped UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_id!(
    /// Identifies a shipment.
    ShipmentId
);
uuid_id!(
    /// Identifies a customer.
    CustomerId
);
uuid_id!(
    /// Identifies a package within a shipment.
    PackageId
);
uuid_id!(
    /// Identifies a configured carrier service record.
    CarrierServiceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_uuid() {
        let raw = Uuid::new_v4();
        let id = ShipmentId::from(raw);
        assert_eq!(id.to_string(), raw.to_string());
        assert_eq!(id.as_uuid(), raw);
    }

    #[test]
    fn test_serde_transparent() {
        let id = PackageId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: PackageId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
        assert!(json.starts_with('"'));
    }
}
