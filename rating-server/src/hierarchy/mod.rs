//! Organization hierarchy builder
//!
//! The organization collection is a parent-pointer hierarchy. Instead of one
//! store round-trip per tree node, callers fetch the whole collection once
//! per request and work over this in-memory index: a node table keyed by id
//! plus a parent → children adjacency list. Tree construction is iterative
//! over the index.
//!
//! Parent references are only checked for existence at write time, so a
//! malformed graph (cycle, dangling parent) is representable; every walker
//! here terminates on such input instead of looping or erroring.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::db::models::OrganizationNode;

/// A node of the expanded organization tree
#[derive(Debug, Clone, Serialize)]
pub struct OrgTreeNode {
    #[serde(flatten)]
    pub node: OrganizationNode,
    pub children: Vec<OrgTreeNode>,
}

/// In-memory index over one fetch of the organization collection.
///
/// Child lists and the root list keep the store's fetch order.
#[derive(Debug, Default)]
pub struct OrgIndex {
    nodes: HashMap<String, OrganizationNode>,
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl OrgIndex {
    pub fn from_nodes(nodes: Vec<OrganizationNode>) -> Self {
        let mut index = OrgIndex::default();
        for node in nodes {
            let Some(id) = node.id.as_ref() else {
                continue;
            };
            let key = id.to_string();
            match node.parent.as_ref() {
                Some(parent) => index
                    .children
                    .entry(parent.to_string())
                    .or_default()
                    .push(key.clone()),
                None => index.roots.push(key.clone()),
            }
            index.nodes.insert(key, node);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&OrganizationNode> {
        self.nodes.get(id)
    }

    /// Expand every parentless node into its full tree.
    pub fn forest(&self) -> Vec<OrgTreeNode> {
        self.roots
            .iter()
            .filter_map(|root| self.build_tree(root))
            .collect()
    }

    /// Expand `id` into its full children tree.
    ///
    /// Every node reachable downward appears exactly once; a `visited` set
    /// keeps a cyclic parent graph from being walked twice or forever.
    /// Returns `None` when `id` is not in the index.
    pub fn build_tree(&self, id: &str) -> Option<OrgTreeNode> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        // Iterative depth-first walk producing a post-order list: children
        // always precede their parent, so subtrees can be assembled in one
        // forward pass afterwards.
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(id.to_string());
        let mut post_order: Vec<String> = Vec::new();
        let mut stack: Vec<(String, usize)> = vec![(id.to_string(), 0)];

        while let Some((current, mut cursor)) = stack.pop() {
            let kids = self
                .children
                .get(&current)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            let mut descended = false;
            while cursor < kids.len() {
                let child = kids[cursor].clone();
                cursor += 1;
                if self.nodes.contains_key(&child) && visited.insert(child.clone()) {
                    stack.push((current.clone(), cursor));
                    stack.push((child, 0));
                    descended = true;
                    break;
                }
            }
            if !descended {
                post_order.push(current);
            }
        }

        let mut assembled: HashMap<String, OrgTreeNode> = HashMap::new();
        for key in post_order {
            let node = self.nodes.get(&key)?.clone();
            let children = self
                .children
                .get(&key)
                .map(|kids| {
                    kids.iter()
                        .filter_map(|child| assembled.remove(child))
                        .collect()
                })
                .unwrap_or_default();
            assembled.insert(key, OrgTreeNode { node, children });
        }

        assembled.remove(id)
    }

    /// Ancestry path of `id`, root first, ending with the node itself.
    ///
    /// Walks `parent` upward until a node without parent. A broken link or a
    /// cycle stops the walk; it is not an error.
    pub fn ancestry_path(&self, id: &str) -> Option<Vec<OrganizationNode>> {
        let start = self.nodes.get(id)?;

        let mut path = vec![start.clone()];
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(id.to_string());

        let mut parent = start.parent.as_ref().map(|p| p.to_string());
        while let Some(parent_key) = parent {
            if !seen.insert(parent_key.clone()) {
                break;
            }
            let Some(node) = self.nodes.get(&parent_key) else {
                break;
            };
            path.push(node.clone());
            parent = node.parent.as_ref().map(|p| p.to_string());
        }

        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrgType;
    use chrono::Utc;
    use surrealdb::RecordId;

    fn node(key: &str, parent: Option<&str>, org_type: OrgType) -> OrganizationNode {
        let now = Utc::now();
        OrganizationNode {
            id: Some(RecordId::from_table_key("organization", key)),
            name: key.to_string(),
            org_type,
            parent: parent.map(|p| RecordId::from_table_key("organization", p)),
            email: format!("{key}@example.com"),
            branch_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn key(k: &str) -> String {
        format!("organization:{k}")
    }

    fn ladder() -> Vec<OrganizationNode> {
        vec![
            node("admin", None, OrgType::Admin),
            node("hr", Some("admin"), OrgType::Hr),
            node("ops", Some("hr"), OrgType::OperationsManager),
            node("mgr", Some("ops"), OrgType::Manager),
            node("sup1", Some("mgr"), OrgType::Supervisor),
            node("sup2", Some("mgr"), OrgType::Supervisor),
            node("staff1", Some("sup1"), OrgType::Staff),
            node("staff2", Some("sup1"), OrgType::Staff),
        ]
    }

    fn count_nodes(tree: &OrgTreeNode) -> usize {
        1 + tree.children.iter().map(count_nodes).sum::<usize>()
    }

    #[test]
    fn index_exposes_nodes_by_id() {
        let index = OrgIndex::from_nodes(ladder());
        assert_eq!(index.len(), 8);
        assert!(!index.is_empty());
        assert_eq!(index.get(&key("hr")).unwrap().name, "hr");
        assert!(index.get(&key("nope")).is_none());
    }

    #[test]
    fn build_tree_contains_every_node_exactly_once() {
        let index = OrgIndex::from_nodes(ladder());
        let tree = index.build_tree(&key("admin")).unwrap();
        assert_eq!(count_nodes(&tree), 8);

        // Each id appears once
        let mut ids = Vec::new();
        fn collect(tree: &OrgTreeNode, ids: &mut Vec<String>) {
            ids.push(tree.node.id.as_ref().unwrap().to_string());
            for child in &tree.children {
                collect(child, ids);
            }
        }
        collect(&tree, &mut ids);
        let unique: HashSet<_> = ids.iter().cloned().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn build_tree_nests_along_parent_edges() {
        let index = OrgIndex::from_nodes(ladder());
        let tree = index.build_tree(&key("mgr")).unwrap();
        assert_eq!(tree.children.len(), 2);
        let sup1 = &tree.children[0];
        assert_eq!(sup1.node.name, "sup1");
        assert_eq!(sup1.children.len(), 2);
        assert_eq!(tree.children[1].children.len(), 0);
    }

    #[test]
    fn children_keep_fetch_order() {
        let index = OrgIndex::from_nodes(ladder());
        let tree = index.build_tree(&key("sup1")).unwrap();
        let names: Vec<_> = tree.children.iter().map(|c| c.node.name.clone()).collect();
        assert_eq!(names, vec!["staff1", "staff2"]);
    }

    #[test]
    fn build_tree_of_unknown_id_is_none() {
        let index = OrgIndex::from_nodes(ladder());
        assert!(index.build_tree(&key("nope")).is_none());
    }

    #[test]
    fn forest_expands_all_roots() {
        let mut nodes = ladder();
        nodes.push(node("admin2", None, OrgType::Admin));
        nodes.push(node("hr2", Some("admin2"), OrgType::Hr));
        let index = OrgIndex::from_nodes(nodes);

        let forest = index.forest();
        assert_eq!(forest.len(), 2);
        let total: usize = forest.iter().map(count_nodes).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn cyclic_graph_terminates() {
        // a → b → c → a: constructible because writes only check that the
        // parent exists.
        let nodes = vec![
            node("a", Some("c"), OrgType::Manager),
            node("b", Some("a"), OrgType::Supervisor),
            node("c", Some("b"), OrgType::Staff),
        ];
        let index = OrgIndex::from_nodes(nodes);

        let tree = index.build_tree(&key("a")).unwrap();
        // a is the entry point; the back edge c → a is not followed again
        assert_eq!(count_nodes(&tree), 3);

        let path = index.ancestry_path(&key("a")).unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn ancestry_path_is_root_first() {
        let index = OrgIndex::from_nodes(ladder());
        let path = index.ancestry_path(&key("staff1")).unwrap();
        let names: Vec<_> = path.iter().map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["admin", "hr", "ops", "mgr", "sup1", "staff1"]);
    }

    #[test]
    fn ancestry_stops_at_broken_link() {
        let nodes = vec![
            node("orphan", Some("missing"), OrgType::Supervisor),
            node("leaf", Some("orphan"), OrgType::Staff),
        ];
        let index = OrgIndex::from_nodes(nodes);

        // The walk stops at the dangling parent instead of erroring
        let path = index.ancestry_path(&key("leaf")).unwrap();
        let names: Vec<_> = path.iter().map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["orphan", "leaf"]);
    }

    #[test]
    fn ancestry_of_unknown_id_is_none() {
        let index = OrgIndex::from_nodes(ladder());
        assert!(index.ancestry_path(&key("nope")).is_none());
    }
}
