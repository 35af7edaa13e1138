//! Catalog data types.

use dovita_shared::types::CatalogNodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of a node in the construction catalog.
///
/// Levels strictly increase with depth:
/// department → mayor → partida → subpartida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Construction department (root level).
    Department,
    /// Top-level cost category inside a department.
    Mayor,
    /// Budget line category nested under a mayor.
    Partida,
    /// Most granular leaf, used for executive costing.
    Subpartida,
}

impl NodeType {
    /// All node types, root first.
    pub const ALL: [Self; 4] = [Self::Department, Self::Mayor, Self::Partida, Self::Subpartida];

    /// Returns the string representation of the node type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Mayor => "mayor",
            Self::Partida => "partida",
            Self::Subpartida => "subpartida",
        }
    }

    /// Parses a node type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "department" | "departamento" => Some(Self::Department),
            "mayor" => Some(Self::Mayor),
            "partida" => Some(Self::Partida),
            "subpartida" => Some(Self::Subpartida),
            _ => None,
        }
    }

    /// Depth in the tree, departments are 0.
    #[must_use]
    pub const fn depth(&self) -> u8 {
        match self {
            Self::Department => 0,
            Self::Mayor => 1,
            Self::Partida => 2,
            Self::Subpartida => 3,
        }
    }

    /// Type expected for direct children, `None` for leaves.
    #[must_use]
    pub const fn child_type(&self) -> Option<Self> {
        match self {
            Self::Department => Some(Self::Mayor),
            Self::Mayor => Some(Self::Partida),
            Self::Partida => Some(Self::Subpartida),
            Self::Subpartida => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visibility scope of a catalog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectScope {
    /// Shared by every branch and project.
    Global,
    /// Specific to a branch office.
    Sucursal,
    /// Specific to a single project.
    Proyecto,
}

impl ProjectScope {
    /// Returns the string representation of the scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Sucursal => "sucursal",
            Self::Proyecto => "proyecto",
        }
    }

    /// Parses a scope from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "global" => Some(Self::Global),
            "sucursal" => Some(Self::Sucursal),
            "proyecto" => Some(Self::Proyecto),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of the construction catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNode {
    /// Node ID.
    pub id: CatalogNodeId,
    /// Catalog code (e.g. "02.01.003").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Level in the hierarchy.
    pub node_type: NodeType,
    /// Parent node, `None` for departments.
    pub parent_id: Option<CatalogNodeId>,
    /// Visibility scope.
    pub project_scope: ProjectScope,
    /// Inactive nodes are kept for history but hidden from selection.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A catalog read: nodes of one type visible in the given scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    /// Node type to fetch.
    pub node_type: NodeType,
    /// Accepted scopes; empty means every scope.
    pub scopes: Vec<ProjectScope>,
    /// Whether inactive nodes are returned.
    pub include_inactive: bool,
}

impl CatalogQuery {
    /// Active nodes of one type in every scope.
    #[must_use]
    pub fn of_type(node_type: NodeType) -> Self {
        Self {
            node_type,
            scopes: Vec::new(),
            include_inactive: false,
        }
    }

    /// Restricts the query to the given scopes.
    #[must_use]
    pub fn in_scopes(mut self, scopes: &[ProjectScope]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    /// Returns true if `node` satisfies this query.
    #[must_use]
    pub fn matches(&self, node: &CatalogNode) -> bool {
        node.node_type == self.node_type
            && (self.include_inactive || node.active)
            && (self.scopes.is_empty() || self.scopes.contains(&node.project_scope))
    }
}
