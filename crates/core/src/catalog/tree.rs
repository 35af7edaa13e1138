//! In-memory catalog hierarchy.
//!
//! The tree is built once per wizard session from the nodes returned by a
//! [`CatalogSource`] and is read-only afterwards.

use std::collections::{HashMap, HashSet};

use dovita_shared::types::CatalogNodeId;
use tracing::debug;

use super::error::CatalogError;
use super::source::CatalogSource;
use super::types::{CatalogNode, CatalogQuery, NodeType, ProjectScope};
use crate::budget::LineItem;

/// Validated forest of catalog nodes.
#[derive(Debug, Clone, Default)]
pub struct CatalogTree {
    nodes: HashMap<CatalogNodeId, CatalogNode>,
    children: HashMap<CatalogNodeId, Vec<CatalogNodeId>>,
    roots: Vec<CatalogNodeId>,
}

impl CatalogTree {
    /// Builds a tree from a flat list of nodes.
    ///
    /// Every parent must exist and sit exactly one level above its child.
    /// Since levels strictly increase with depth, this also rules out cycles.
    pub fn build(nodes: Vec<CatalogNode>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id;
            if by_id.insert(id, node).is_some() {
                return Err(CatalogError::DuplicateNode(id));
            }
        }

        let mut children: HashMap<CatalogNodeId, Vec<CatalogNodeId>> = HashMap::new();
        let mut roots = Vec::new();

        for node in by_id.values() {
            match (node.node_type, node.parent_id) {
                (NodeType::Department, None) => roots.push(node.id),
                (NodeType::Department, Some(_)) => {
                    return Err(CatalogError::DepartmentWithParent(node.id));
                }
                (node_type, None) => {
                    return Err(CatalogError::MissingParent {
                        node: node.id,
                        node_type,
                    });
                }
                (node_type, Some(parent_id)) => {
                    let parent = by_id.get(&parent_id).ok_or(CatalogError::UnknownParent {
                        node: node.id,
                        parent: parent_id,
                    })?;
                    if parent.node_type.child_type() != Some(node_type) {
                        return Err(CatalogError::InvalidNesting {
                            node: node.id,
                            child_type: node_type,
                            parent_type: parent.node_type,
                        });
                    }
                    children.entry(parent_id).or_default().push(node.id);
                }
            }
        }

        let by_code = |a: &CatalogNodeId, b: &CatalogNodeId| by_id[a].code.cmp(&by_id[b].code);
        roots.sort_by(by_code);
        for list in children.values_mut() {
            list.sort_by(by_code);
        }

        Ok(Self {
            nodes: by_id,
            children,
            roots,
        })
    }

    /// Fetches every level visible in `scopes` and builds the tree.
    ///
    /// Nodes whose parent is not visible in the requested scopes are pruned
    /// together with their descendants.
    pub async fn load(
        source: &dyn CatalogSource,
        scopes: &[ProjectScope],
    ) -> Result<Self, CatalogError> {
        let mut kept: Vec<CatalogNode> = Vec::new();
        let mut kept_ids: HashSet<CatalogNodeId> = HashSet::new();
        let mut pruned = 0usize;

        for node_type in NodeType::ALL {
            let mut query = CatalogQuery::of_type(node_type).in_scopes(scopes);
            query.include_inactive = true;

            for node in source.list_nodes(&query).await? {
                let reachable = node
                    .parent_id
                    .is_none_or(|parent| kept_ids.contains(&parent));
                if reachable {
                    kept_ids.insert(node.id);
                    kept.push(node);
                } else {
                    pruned += 1;
                }
            }
        }

        if pruned > 0 {
            debug!(pruned, "Pruned catalog nodes outside the requested scopes");
        }

        Self::build(kept)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by ID.
    #[must_use]
    pub fn get(&self, id: CatalogNodeId) -> Option<&CatalogNode> {
        self.nodes.get(&id)
    }

    /// Looks up a node by ID, failing if it is absent.
    pub fn require(&self, id: CatalogNodeId) -> Result<&CatalogNode, CatalogError> {
        self.get(id).ok_or(CatalogError::NodeNotFound(id))
    }

    /// Departments, ordered by code.
    #[must_use]
    pub fn roots(&self) -> Vec<&CatalogNode> {
        self.roots.iter().map(|id| &self.nodes[id]).collect()
    }

    /// Direct children of a node, ordered by code.
    #[must_use]
    pub fn children(&self, id: CatalogNodeId) -> Vec<&CatalogNode> {
        self.children
            .get(&id)
            .map(|ids| ids.iter().map(|child| &self.nodes[child]).collect())
            .unwrap_or_default()
    }

    /// Every node of one type, ordered by code.
    #[must_use]
    pub fn of_type(&self, node_type: NodeType) -> Vec<&CatalogNode> {
        let mut nodes: Vec<&CatalogNode> = self
            .nodes
            .values()
            .filter(|node| node.node_type == node_type)
            .collect();
        nodes.sort_by(|a, b| a.code.cmp(&b.code));
        nodes
    }

    /// Finds a node of the given type by its catalog code.
    #[must_use]
    pub fn find_by_code(&self, node_type: NodeType, code: &str) -> Option<&CatalogNode> {
        self.nodes
            .values()
            .find(|node| node.node_type == node_type && node.code == code)
    }

    /// Ancestors of a node, root first, excluding the node itself.
    pub fn ancestors(&self, id: CatalogNodeId) -> Result<Vec<&CatalogNode>, CatalogError> {
        let mut chain = Vec::new();
        let mut current = self.require(id)?;
        while let Some(parent_id) = current.parent_id {
            current = self.require(parent_id)?;
            chain.push(current);
        }
        chain.reverse();
        Ok(chain)
    }

    /// The node at `level` in the lineage of `id`, which may be the node itself.
    ///
    /// Returns `None` when `level` is deeper than the node.
    pub fn lineage_node(
        &self,
        id: CatalogNodeId,
        level: NodeType,
    ) -> Result<Option<&CatalogNode>, CatalogError> {
        let node = self.require(id)?;
        if node.node_type == level {
            return Ok(Some(node));
        }
        Ok(self
            .ancestors(id)?
            .into_iter()
            .find(|ancestor| ancestor.node_type == level))
    }

    /// Creates an empty line item anchored at a mayor, partida or subpartida.
    ///
    /// The mayor and partida references are filled from the node lineage.
    pub fn line_item_for(&self, id: CatalogNodeId) -> Result<LineItem, CatalogError> {
        let node = self.require(id)?;
        if node.node_type == NodeType::Department {
            return Err(CatalogError::UnexpectedType {
                node: id,
                expected: NodeType::Mayor,
                actual: NodeType::Department,
            });
        }

        let mayor = self
            .lineage_node(id, NodeType::Mayor)?
            .ok_or(CatalogError::NodeNotFound(id))?;
        let partida = self.lineage_node(id, NodeType::Partida)?;
        let subpartida = self.lineage_node(id, NodeType::Subpartida)?;

        let mut item = LineItem::new(mayor.id);
        item.partida_id = partida.map(|node| node.id);
        item.subpartida_id = subpartida.map(|node| node.id);
        item.description.clone_from(&node.name);
        Ok(item)
    }
}
