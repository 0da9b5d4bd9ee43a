//! Strongly typed integer ids for catalog entities.
//!
//! The storefront API keys every entity by a database-assigned `Long`, so the
//! wrappers are thin `i64` newtypes. They exist to keep brand, category and
//! product ids from being mixed up when facet sets are assembled.

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize)
        )]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

catalog_id!(
    /// Id of a category row (`category.categoryId` on the wire).
    CategoryId
);

catalog_id!(
    /// Id of a brand row (`brand.brandId` on the wire).
    BrandId
);

catalog_id!(
    /// Id of a product row (`productId` on the wire).
    ProductId
);
