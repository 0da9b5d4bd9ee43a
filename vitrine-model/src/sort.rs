use crate::error::ModelError;
use std::fmt;
use std::str::FromStr;

/// Sort orders offered by the browse screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub fn all() -> &'static [SortOrder] {
        use SortOrder::*;
        &[Newest, PriceAsc, PriceDesc, NameAsc, NameDesc]
    }

    /// Value of the `sort` query parameter understood by the catalog API.
    pub fn api_param(&self) -> &'static str {
        match self {
            SortOrder::Newest => "createdAt,desc",
            SortOrder::PriceAsc => "price,asc",
            SortOrder::PriceDesc => "price,desc",
            SortOrder::NameAsc => "name,asc",
            SortOrder::NameDesc => "name,desc",
        }
    }

    /// Stable identifier used in URLs, config files and the CLI.
    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::PriceAsc => "Price: low to high",
            SortOrder::PriceDesc => "Price: high to low",
            SortOrder::NameAsc => "Name: A-Z",
            SortOrder::NameDesc => "Name: Z-A",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortOrder::all()
            .iter()
            .copied()
            .find(|order| {
                order.key().eq_ignore_ascii_case(wanted)
                    || order.api_param().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ModelError::UnknownSortOrder(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_newest_first() {
        assert_eq!(SortOrder::default().api_param(), "createdAt,desc");
    }

    #[test]
    fn parses_keys_and_api_params() {
        assert_eq!("price-asc".parse(), Ok(SortOrder::PriceAsc));
        assert_eq!("name,desc".parse(), Ok(SortOrder::NameDesc));
        assert_eq!(" Newest ".parse(), Ok(SortOrder::Newest));
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
