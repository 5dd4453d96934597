//! Class database - the single-inheritance graph of engine and extension classes.
//!
//! Uses `petgraph::StableDiGraph` with:
//! - Nodes: `ClassNode` (name plus engine/extension kind)
//! - Edges: child -> parent
//!
//! A stable graph keeps node indices valid when extension classes are
//! unregistered.

use std::sync::Arc;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use rustc_hash::FxHashMap;

use gdbind_core::{BindError, ClassSpec, ExtensionClassInfo};

/// Where a class comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Engine { refcounted: bool },
    Extension,
}

#[derive(Debug, Clone)]
pub struct ClassNode {
    pub name: String,
    pub kind: ClassKind,
}

/// Inheritance graph plus the registered extension classes.
#[derive(Default)]
pub struct ClassDb {
    graph: StableDiGraph<ClassNode, ()>,
    index: FxHashMap<String, NodeIndex>,
    extensions: FxHashMap<String, Arc<ExtensionClassInfo>>,
    /// Extension class names, oldest registration first.
    registration_order: Vec<String>,
}

impl ClassDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of engine classes described by a catalog.
    pub fn from_catalog(classes: &[&ClassSpec]) -> Self {
        let mut db = Self::new();
        for class in classes {
            db.add_node(
                class.name,
                ClassKind::Engine {
                    refcounted: class.refcounted,
                },
            );
        }
        for class in classes {
            if let Some(parent) = class.parent {
                let parent_kind = ClassKind::Engine {
                    refcounted: class.refcounted && parent != "Object",
                };
                let parent_idx = db.add_node(parent, parent_kind);
                let child_idx = db.index[class.name];
                db.graph.update_edge(child_idx, parent_idx, ());
            }
        }
        db
    }

    fn add_node(&mut self, name: &str, kind: ClassKind) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(ClassNode {
            name: name.to_string(),
            kind,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<ClassKind> {
        let idx = *self.index.get(name)?;
        self.graph.node_weight(idx).map(|node| node.kind)
    }

    fn parent_index(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Outgoing).next()
    }

    /// Direct parent of a class.
    pub fn parent(&self, name: &str) -> Option<&str> {
        let idx = *self.index.get(name)?;
        let parent = self.parent_index(idx)?;
        self.graph.node_weight(parent).map(|node| node.name.as_str())
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let Some(&start) = self.index.get(name) else {
            return chain;
        };
        let mut current = self.parent_index(start);
        while let Some(idx) = current {
            if let Some(node) = self.graph.node_weight(idx) {
                chain.push(node.name.as_str());
            }
            current = self.parent_index(idx);
        }
        chain
    }

    /// True when `class` is `ancestor` or derives from it.
    pub fn inherits(&self, class: &str, ancestor: &str) -> bool {
        class == ancestor || self.ancestors(class).contains(&ancestor)
    }

    pub fn is_refcounted(&self, name: &str) -> bool {
        self.inherits(name, "RefCounted")
    }

    /// The nearest engine class of `name` (itself for engine classes).
    pub fn engine_base(&self, name: &str) -> Option<&str> {
        if let Some(ClassKind::Engine { .. }) = self.kind(name) {
            return self.index.get_key_value(name).map(|(k, _)| k.as_str());
        }
        self.ancestors(name)
            .into_iter()
            .find(|ancestor| matches!(self.kind(ancestor), Some(ClassKind::Engine { .. })))
    }

    /// Add an extension class under an already known parent.
    pub fn register_extension(&mut self, info: Arc<ExtensionClassInfo>) -> Result<(), BindError> {
        if self.contains(&info.name) {
            return Err(BindError::AlreadyRegistered(info.name.clone()));
        }
        let Some(&parent_idx) = self.index.get(&info.parent) else {
            return Err(BindError::UnknownParent {
                class: info.name.clone(),
                parent: info.parent.clone(),
            });
        };
        let idx = self.add_node(&info.name, ClassKind::Extension);
        self.graph.add_edge(idx, parent_idx, ());
        self.registration_order.push(info.name.clone());
        self.extensions.insert(info.name.clone(), info);
        Ok(())
    }

    /// Remove an extension class; engine classes cannot be removed.
    pub fn unregister_extension(&mut self, name: &str) -> Option<Arc<ExtensionClassInfo>> {
        let info = self.extensions.remove(name)?;
        if let Some(idx) = self.index.remove(name) {
            self.graph.remove_node(idx);
        }
        self.registration_order.retain(|registered| registered != name);
        Some(info)
    }

    pub fn extension(&self, name: &str) -> Option<&Arc<ExtensionClassInfo>> {
        self.extensions.get(name)
    }

    /// Registered extension classes, oldest first.
    pub fn extension_names(&self) -> &[String] {
        &self.registration_order
    }

    /// Number of known classes, engine and extension.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl std::fmt::Debug for ClassDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDb")
            .field("classes", &self.index.len())
            .field("extensions", &self.registration_order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{class, extension_info};

    fn db() -> ClassDb {
        let object = class("Object", None, vec![]);
        let refcounted = ClassSpec {
            refcounted: true,
            ..class("RefCounted", Some("Object"), vec![])
        };
        let mesh = ClassSpec {
            refcounted: true,
            ..class("Mesh", Some("Resource"), vec![])
        };
        let resource = ClassSpec {
            refcounted: true,
            ..class("Resource", Some("RefCounted"), vec![])
        };
        let node = class("Node", Some("Object"), vec![]);
        let node3d = class("Node3D", Some("Node"), vec![]);
        ClassDb::from_catalog(&[&object, &refcounted, &resource, &mesh, &node, &node3d])
    }

    #[test]
    fn ancestors_walk_to_root() {
        let db = db();
        assert_eq!(db.ancestors("Mesh"), ["Resource", "RefCounted", "Object"]);
        assert_eq!(db.parent("Node3D"), Some("Node"));
        assert!(db.ancestors("Object").is_empty());
    }

    #[test]
    fn inheritance_queries() {
        let db = db();
        assert!(db.inherits("Node3D", "Object"));
        assert!(db.inherits("Node3D", "Node3D"));
        assert!(!db.inherits("Node", "Node3D"));
        assert!(db.is_refcounted("Mesh"));
        assert!(!db.is_refcounted("Node3D"));
    }

    #[test]
    fn register_extension_class() {
        let mut db = db();
        db.register_extension(Arc::new(extension_info("Spinner", "Node3D"))).unwrap();

        assert_eq!(db.kind("Spinner"), Some(ClassKind::Extension));
        assert!(db.inherits("Spinner", "Node"));
        assert_eq!(db.engine_base("Spinner"), Some("Node3D"));
        assert_eq!(db.extension_names(), ["Spinner"]);
    }

    #[test]
    fn extension_of_extension() {
        let mut db = db();
        db.register_extension(Arc::new(extension_info("Base3D", "Node3D"))).unwrap();
        db.register_extension(Arc::new(extension_info("Leaf3D", "Base3D"))).unwrap();
        assert_eq!(db.ancestors("Leaf3D"), ["Base3D", "Node3D", "Node", "Object"]);
        assert_eq!(db.engine_base("Leaf3D"), Some("Node3D"));
    }

    #[test]
    fn duplicate_and_unknown_parent_rejected() {
        let mut db = db();
        db.register_extension(Arc::new(extension_info("Spinner", "Node3D"))).unwrap();
        assert_eq!(
            db.register_extension(Arc::new(extension_info("Spinner", "Node3D"))),
            Err(BindError::AlreadyRegistered("Spinner".into()))
        );
        assert!(matches!(
            db.register_extension(Arc::new(extension_info("Orphan", "Nope"))),
            Err(BindError::UnknownParent { .. })
        ));
        assert!(matches!(
            db.register_extension(Arc::new(extension_info("Node", "Object"))),
            Err(BindError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn unregister_keeps_other_indices_valid() {
        let mut db = db();
        db.register_extension(Arc::new(extension_info("A", "Node3D"))).unwrap();
        db.register_extension(Arc::new(extension_info("B", "Node"))).unwrap();

        assert!(db.unregister_extension("A").is_some());
        assert!(db.unregister_extension("A").is_none());
        assert!(db.unregister_extension("Node").is_none());
        assert!(!db.contains("A"));
        assert_eq!(db.parent("B"), Some("Node"));
        assert_eq!(db.extension_names(), ["B"]);
    }
}
