use std::fmt::Write;

use vitrine_core::catalog::CategoryTree;
use vitrine_model::{Product, ResultPage};

/// Indented outline of `roots`, one category per line.
pub fn category_outline(roots: &[CategoryTree]) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&CategoryTree, usize)> =
        roots.iter().rev().map(|root| (root, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let _ = writeln!(out, "{}{} [{}]", "  ".repeat(depth), node.name, node.id);
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

pub fn product_line(product: &Product) -> String {
    let brand = product
        .brand_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let category = product
        .category_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>6}  {:>12.0}  brand {:>4}  category {:>4}  {}",
        product.id.get(), product.price, brand, category, product.name
    )
}

pub fn page_summary(page: &ResultPage, page_index: u32, page_size: u32) -> String {
    format!(
        "page {} of {} | {} shown | {} total | price ceiling {:.0}",
        page_index + 1,
        page.page_count(page_size),
        page.len(),
        page.total_count,
        page.price_ceiling
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::catalog::build_tree;
    use vitrine_model::CategoryNode;

    #[test]
    fn outline_indents_children() {
        let roots = build_tree(&[
            CategoryNode::root(1, "Men"),
            CategoryNode::child(2, "Shirts", 1),
            CategoryNode::root(3, "Women"),
        ]);
        assert_eq!(
            category_outline(&roots),
            "Men [1]\n  Shirts [2]\nWomen [3]\n"
        );
    }

    #[test]
    fn summary_counts_pages() {
        let page = ResultPage {
            items: vec![Product::new(1, 10.0)],
            total_count: 9,
            price_ceiling: 100_000.0,
        };
        assert_eq!(
            page_summary(&page, 0, 8),
            "page 1 of 2 | 1 shown | 9 total | price ceiling 100000"
        );
    }
}
