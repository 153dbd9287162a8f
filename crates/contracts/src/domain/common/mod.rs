//! Common types and traits for all aggregates

pub mod aggregate_id;

pub use aggregate_id::AggregateId;

/// Declares a `Uuid` newtype identifier with the usual constructors and an
/// [`AggregateId`] impl.
#[macro_export]
macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub struct $name(pub ::uuid::Uuid);

        impl $name {
            pub fn new(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
            pub fn new_v4() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
            pub fn value(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl $crate::domain::common::AggregateId for $name {
            fn as_string(&self) -> String {
                self.0.to_string()
            }
            fn from_string(s: &str) -> Result<Self, String> {
                ::uuid::Uuid::parse_str(s)
                    .map($name::new)
                    .map_err(|e| format!("Invalid UUID: {}", e))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
