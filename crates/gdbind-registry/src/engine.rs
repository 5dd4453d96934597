//! The loaded engine: interface, resolved binds and class database.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info};

use gdbind_core::{
    BindError, BindingConfig, ClassSpec, ExtensionClassInfo, GodotVersion, Interface, Lifetime, MethodBindPtr,
    NameHash, ObjectPtr, RefCountBinds, Runtime,
};

use crate::class_db::ClassDb;
use crate::method_table::MethodTable;

/// Signature hash shared by `init_ref`, `reference` and `unreference`.
const REF_COUNT_HASH: i64 = 2240911060;

/// A loaded engine.
///
/// Created once per library initialization and shared by every lifetime.
pub struct Engine {
    iface: Arc<dyn Interface>,
    config: BindingConfig,
    version: GodotVersion,
    methods: MethodTable,
    classes: RwLock<ClassDb>,
    ref_counting: Option<RefCountBinds>,
}

impl Engine {
    /// Check the engine version and resolve every bind in `catalog`.
    pub fn load(
        iface: Arc<dyn Interface>,
        catalog: &[&'static ClassSpec],
        config: BindingConfig,
    ) -> Result<Arc<Self>, BindError> {
        let version = iface.godot_version();
        if version < config.minimum_version {
            return Err(BindError::IncompatibleVersion {
                required: config.minimum_version,
                found: version,
            });
        }

        let methods = MethodTable::load(iface.as_ref(), catalog, &config)?;
        let ref_counting = resolve_ref_counting(iface.as_ref());
        if ref_counting.is_none() {
            error!(%version, "RefCounted binds missing, owned references will leak");
        }
        info!(%version, binds = methods.len(), classes = catalog.len(), "engine loaded");

        Ok(Arc::new(Self {
            iface,
            config,
            version,
            methods,
            classes: RwLock::new(ClassDb::from_catalog(catalog)),
            ref_counting,
        }))
    }

    pub fn interface(&self) -> &Arc<dyn Interface> {
        &self.iface
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn version(&self) -> GodotVersion {
        self.version
    }

    /// Open a new lifetime on this engine.
    pub fn lifetime(self: &Arc<Self>) -> Lifetime {
        Lifetime::new(Arc::clone(self) as Arc<dyn Runtime>)
    }

    pub fn classes(&self) -> RwLockReadGuard<'_, ClassDb> {
        self.classes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn classes_mut(&self) -> RwLockWriteGuard<'_, ClassDb> {
        self.classes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an extension class with the class database and the engine.
    ///
    /// Nothing is left registered when the engine rejects the class.
    pub fn register_class(&self, info: ExtensionClassInfo) -> Result<(), BindError> {
        let info = Arc::new(info);
        let name = info.name.clone();
        self.classes_mut().register_extension(Arc::clone(&info))?;

        if let Err(err) = self.iface.register_extension_class(info) {
            error!(class = %name, %err, "engine rejected extension class");
            self.classes_mut().unregister_extension(&name);
            return Err(err);
        }
        info!(class = %name, "extension class registered");
        Ok(())
    }

    /// Unregister one extension class. Returns false for unknown names.
    pub fn unregister_class(&self, name: &str) -> bool {
        let removed = self.classes_mut().unregister_extension(name);
        if removed.is_some() {
            self.iface.unregister_extension_class(name);
            debug!(class = name, "extension class unregistered");
        }
        removed.is_some()
    }

    /// Unregister every extension class, newest first.
    pub fn unregister_all(&self) {
        let names: Vec<String> = self.classes().extension_names().iter().rev().cloned().collect();
        for name in names {
            self.unregister_class(&name);
        }
    }

    pub fn extension_class(&self, name: &str) -> Option<Arc<ExtensionClassInfo>> {
        self.classes().extension(name).cloned()
    }

    /// Construct an object of a known class.
    pub fn construct(&self, class: &str) -> Result<ObjectPtr, BindError> {
        if !self.classes().contains(class) {
            return Err(BindError::UnknownClass(class.to_string()));
        }
        self.iface
            .construct_object(class)
            .ok_or_else(|| BindError::ConstructionFailed(class.to_string()))
    }
}

fn resolve_ref_counting(iface: &dyn Interface) -> Option<RefCountBinds> {
    let bind = |method| iface.method_bind("RefCounted", method, REF_COUNT_HASH);
    Some(RefCountBinds {
        init_ref: bind("init_ref")?,
        reference: bind("reference")?,
        unreference: bind("unreference")?,
    })
}

impl Runtime for Engine {
    fn interface(&self) -> &dyn Interface {
        self.iface.as_ref()
    }

    fn config(&self) -> &BindingConfig {
        &self.config
    }

    #[inline]
    fn method_bind(&self, key: NameHash, class: &'static str, method: &'static str) -> Result<MethodBindPtr, BindError> {
        self.methods.bind(key, class, method)
    }

    fn ref_counting(&self) -> Option<RefCountBinds> {
        self.ref_counting
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("version", &self.version)
            .field("binds", &self.methods.len())
            .field("classes", &*self.classes())
            .finish_non_exhaustive()
    }
}
