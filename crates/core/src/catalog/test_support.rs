//! Shared catalog fixtures for unit tests.

use dovita_shared::types::CatalogNodeId;

use super::types::{CatalogNode, NodeType, ProjectScope};

/// Builds a global, active node.
pub(crate) fn node(
    node_type: NodeType,
    code: &str,
    name: &str,
    parent_id: Option<CatalogNodeId>,
) -> CatalogNode {
    CatalogNode {
        id: CatalogNodeId::new(),
        code: code.to_string(),
        name: name.to_string(),
        node_type,
        parent_id,
        project_scope: ProjectScope::Global,
        active: true,
    }
}

/// A small construction catalog with two mayores.
pub(crate) struct SampleCatalog {
    pub nodes: Vec<CatalogNode>,
    pub department: CatalogNodeId,
    pub earthworks: CatalogNodeId,
    pub excavation: CatalogNodeId,
    pub excavation_manual: CatalogNodeId,
    pub excavation_machine: CatalogNodeId,
    pub structure: CatalogNodeId,
    pub foundations: CatalogNodeId,
    pub footing: CatalogNodeId,
}

pub(crate) fn sample_catalog() -> SampleCatalog {
    let department = node(NodeType::Department, "A", "Construcción", None);
    let structure = node(NodeType::Mayor, "02", "Estructura", Some(department.id));
    let earthworks = node(NodeType::Mayor, "01", "Terracerías", Some(department.id));
    let excavation = node(NodeType::Partida, "01.01", "Excavación", Some(earthworks.id));
    let excavation_machine = node(
        NodeType::Subpartida,
        "01.01.02",
        "Excavación con máquina",
        Some(excavation.id),
    );
    let excavation_manual = node(
        NodeType::Subpartida,
        "01.01.01",
        "Excavación a mano",
        Some(excavation.id),
    );
    let foundations = node(NodeType::Partida, "02.01", "Cimentación", Some(structure.id));
    let footing = node(
        NodeType::Subpartida,
        "02.01.01",
        "Zapata aislada",
        Some(foundations.id),
    );

    SampleCatalog {
        department: department.id,
        earthworks: earthworks.id,
        excavation: excavation.id,
        excavation_manual: excavation_manual.id,
        excavation_machine: excavation_machine.id,
        structure: structure.id,
        foundations: foundations.id,
        footing: footing.id,
        nodes: vec![
            department,
            structure,
            earthworks,
            excavation,
            excavation_machine,
            excavation_manual,
            foundations,
            footing,
        ],
    }
}
