use crate::ids::CategoryId;

/// One row of the flat category list returned by the catalog API.
///
/// The parent relation is expected to form a forest; a node without a
/// `parent_id` is a root. Nodes are only ever read by the tree builder, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_id: Option<CategoryId>,
}

impl CategoryNode {
    pub fn root(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn child(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        parent_id: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: Some(parent_id.into()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_missing_parent() {
        let node: CategoryNode =
            serde_json::from_str(r#"{"id":3,"name":"Shoes"}"#).unwrap();
        assert_eq!(node, CategoryNode::root(3, "Shoes"));

        let child: CategoryNode =
            serde_json::from_str(r#"{"id":4,"name":"Boots","parentId":3}"#)
                .unwrap();
        assert_eq!(child.parent_id, Some(CategoryId(3)));
    }
}
