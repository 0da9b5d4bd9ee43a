//! Tagged filter expression.
//!
//! Compiled facets stay structured until they reach the HTTP boundary, where
//! [`Clause::to_wire`] renders the Spring-Filter dialect understood by the
//! storefront API:
//!
//! ```text
//! (category.categoryId:5 or category.categoryId:6) and (brand.brandId:1) and (price>:0 and price<:50000)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use vitrine_model::Product;

/// Product attribute a clause constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CategoryId,
    BrandId,
    Price,
}

impl Field {
    /// Attribute path as written in the wire dialect.
    pub fn wire_path(&self) -> &'static str {
        match self {
            Field::CategoryId => "category.categoryId",
            Field::BrandId => "brand.brandId",
            Field::Price => "price",
        }
    }

    fn value_of(&self, product: &Product) -> Option<f64> {
        match self {
            Field::CategoryId => product.category_id.map(|id| id.get() as f64),
            Field::BrandId => product.brand_id.map(|id| id.get() as f64),
            Field::Price => Some(product.price),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_path())
    }
}

/// Predicate over products.
///
/// An `InSet` without values and an `And` without members are unconstrained:
/// they match everything and render as the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Clause {
    /// Inclusive bounds on a numeric field.
    Range { field: Field, min: f64, max: f64 },
    /// Field equals one of the values.
    InSet { field: Field, values: Vec<i64> },
    And(Vec<Clause>),
}

impl Clause {
    /// Set membership with sorted, deduplicated values.
    pub fn in_set<I, V>(field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<i64>,
    {
        let mut values: Vec<i64> = values.into_iter().map(Into::into).collect();
        values.sort_unstable();
        values.dedup();
        Clause::InSet { field, values }
    }

    pub fn range(field: Field, min: f64, max: f64) -> Self {
        Clause::Range { field, min, max }
    }

    /// Conjunction of `members`. Nested conjunctions are flattened and
    /// unconstrained members dropped.
    pub fn and(members: impl IntoIterator<Item = Clause>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Clause::And(inner) => flat.extend(inner),
                other if other.is_empty() => {}
                other => flat.push(other),
            }
        }
        Clause::And(flat)
    }

    /// Whether this clause constrains nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Clause::Range { .. } => false,
            Clause::InSet { values, .. } => values.is_empty(),
            Clause::And(members) => members.iter().all(Clause::is_empty),
        }
    }

    /// Evaluate the predicate locally.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Clause::Range { field, min, max } => field
                .value_of(product)
                .is_some_and(|v| v >= *min && v <= *max),
            Clause::InSet { values, .. } if values.is_empty() => true,
            Clause::InSet { field, values } => {
                field.value_of(product).is_some_and(|v| {
                    values.iter().any(|candidate| *candidate as f64 == v)
                })
            }
            Clause::And(members) => members.iter().all(|m| m.matches(product)),
        }
    }

    /// Values of the first set clause on `field`, searching conjunctions.
    pub fn find_set(&self, field: Field) -> Option<&[i64]> {
        match self {
            Clause::InSet { field: f, values } if *f == field => {
                Some(values.as_slice())
            }
            Clause::And(members) => {
                members.iter().find_map(|m| m.find_set(field))
            }
            _ => None,
        }
    }

    /// Bounds of the first range clause on `field`, searching conjunctions.
    pub fn find_range(&self, field: Field) -> Option<(f64, f64)> {
        match self {
            Clause::Range { field: f, min, max } if *f == field => {
                Some((*min, *max))
            }
            Clause::And(members) => {
                members.iter().find_map(|m| m.find_range(field))
            }
            _ => None,
        }
    }

    /// Render the wire-level predicate string.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl Default for Clause {
    fn default() -> Self {
        Clause::And(Vec::new())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Range { field, min, max } => write!(
                f,
                "({field}>:{} and {field}<:{})",
                WireNumber(*min),
                WireNumber(*max)
            ),
            Clause::InSet { values, .. } if values.is_empty() => Ok(()),
            Clause::InSet { field, values } => {
                f.write_str("(")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{field}:{value}")?;
                }
                f.write_str(")")
            }
            Clause::And(members) => {
                let mut first = true;
                for member in members.iter().filter(|m| !m.is_empty()) {
                    if !first {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{member}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

/// Whole numbers render without a fractional part.
struct WireNumber(f64);

impl fmt::Display for WireNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.fract() == 0.0 && value.abs() < 1e15 {
            write!(f, "{value:.0}")
        } else {
            write!(f, "{value}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_renders_parenthesized_disjunction() {
        let clause = Clause::in_set(Field::CategoryId, [6i64, 5, 6]);
        assert_eq!(
            clause.to_wire(),
            "(category.categoryId:5 or category.categoryId:6)"
        );
    }

    #[test]
    fn range_renders_whole_and_fractional_prices() {
        assert_eq!(
            Clause::range(Field::Price, 0.0, 50_000.0).to_wire(),
            "(price>:0 and price<:50000)"
        );
        assert_eq!(
            Clause::range(Field::Price, 9.5, 12.25).to_wire(),
            "(price>:9.5 and price<:12.25)"
        );
    }

    #[test]
    fn conjunction_flattens_and_skips_empty_members() {
        let clause = Clause::and([
            Clause::in_set(Field::BrandId, Vec::<i64>::new()),
            Clause::and([Clause::in_set(Field::BrandId, [1i64])]),
            Clause::range(Field::Price, 0.0, 10.0),
        ]);
        assert_eq!(
            clause,
            Clause::And(vec![
                Clause::in_set(Field::BrandId, [1i64]),
                Clause::range(Field::Price, 0.0, 10.0),
            ])
        );
        assert_eq!(
            clause.to_wire(),
            "(brand.brandId:1) and (price>:0 and price<:10)"
        );
    }

    #[test]
    fn empty_conjunction_is_unconstrained() {
        let clause = Clause::default();
        assert!(clause.is_empty());
        assert_eq!(clause.to_wire(), "");
        assert!(clause.matches(&Product::new(1, 1.0)));
    }

    #[test]
    fn local_evaluation_follows_wire_semantics() {
        let clause = Clause::and([
            Clause::in_set(Field::CategoryId, [5i64, 6]),
            Clause::range(Field::Price, 100.0, 200.0),
        ]);
        let hit = Product::new(1, 150.0).with_category(6);
        let wrong_category = Product::new(2, 150.0).with_category(7);
        let too_cheap = Product::new(3, 99.0).with_category(5);
        let uncategorized = Product::new(4, 150.0);

        assert!(clause.matches(&hit));
        assert!(!clause.matches(&wrong_category));
        assert!(!clause.matches(&too_cheap));
        assert!(!clause.matches(&uncategorized));
    }

    #[test]
    fn finders_search_nested_members() {
        let clause = Clause::and([
            Clause::in_set(Field::BrandId, [3i64]),
            Clause::range(Field::Price, 1.0, 2.0),
        ]);
        assert_eq!(clause.find_set(Field::BrandId), Some(&[3i64][..]));
        assert_eq!(clause.find_set(Field::CategoryId), None);
        assert_eq!(clause.find_range(Field::Price), Some((1.0, 2.0)));
    }
}
