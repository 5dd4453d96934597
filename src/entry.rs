//! The library entry point the engine calls.
//!
//! A GDExtension library exports one `extern "C"` function named in its
//! `.gdextension` file. [`gdextension_entry!`](crate::gdextension_entry)
//! generates it from an [`ExtensionLibrary`] value:
//!
//! ```ignore
//! struct Game;
//!
//! impl ExtensionLibrary for Game {
//!     fn register(&self, engine: &Arc<Engine>) -> Result<(), BindError> {
//!         register_class::<Spinner>(engine)
//!     }
//! }
//!
//! gdbind::gdextension_entry!(game_library_init, Game);
//! ```
//!
//! The engine then walks the initialization levels upwards on load and
//! downwards on unload. gdbind loads its [`Engine`] and registers classes at
//! [`BindingConfig::init_level`], and unregisters them when that level is
//! deinitialized.

use std::ffi::c_void;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info};

use gdbind_core::{BindError, BindingConfig, ClassSpec, InitLevel, Interface};
use gdbind_registry::Engine;

use crate::classes;
use crate::native::{GetProcAddress, Initialization, NativeInterface, guarded};

/// Hooks a library provides to the entry point.
pub trait ExtensionLibrary: Send + 'static {
    fn config(&self) -> BindingConfig {
        BindingConfig::default()
    }

    /// Register the library's extension classes.
    fn register(&self, engine: &Arc<Engine>) -> Result<(), BindError>;

    /// Called for every level the engine initializes once the engine is loaded.
    fn on_level_init(&self, _engine: &Arc<Engine>, _level: InitLevel) {}

    fn on_level_deinit(&self, _engine: &Arc<Engine>, _level: InitLevel) {}
}

/// Per-library state between the engine's initialize and deinitialize calls.
pub struct LibraryState<L> {
    library: L,
    config: BindingConfig,
    iface: Arc<dyn Interface>,
    catalog: Vec<&'static ClassSpec>,
    engine: Option<Arc<Engine>>,
}

impl<L: ExtensionLibrary> LibraryState<L> {
    pub fn new(library: L, iface: Arc<dyn Interface>) -> Self {
        let config = library.config();
        Self {
            library,
            config,
            iface,
            catalog: classes::catalog(),
            engine: None,
        }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// The loaded engine, between the configured level's init and deinit.
    pub fn engine(&self) -> Option<&Arc<Engine>> {
        self.engine.as_ref()
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    /// Run one initialization level.
    ///
    /// At the configured level this loads the engine and registers the
    /// library's classes. A failed registration unloads the engine again.
    pub fn initialize(&mut self, level: InitLevel) -> Result<(), BindError> {
        if level == self.config.init_level && self.engine.is_none() {
            let engine = Engine::load(Arc::clone(&self.iface), &self.catalog, self.config.clone())?;
            if let Err(err) = self.library.register(&engine) {
                engine.unregister_all();
                return Err(err);
            }
            info!(?level, classes = engine.classes().extension_names().len(), "library initialized");
            self.engine = Some(engine);
        }
        if let Some(engine) = &self.engine {
            self.library.on_level_init(engine, level);
        }
        Ok(())
    }

    /// Undo [`LibraryState::initialize`] for one level.
    pub fn deinitialize(&mut self, level: InitLevel) {
        let Some(engine) = &self.engine else {
            return;
        };
        self.library.on_level_deinit(engine, level);
        if level == self.config.init_level {
            engine.unregister_all();
            self.engine = None;
            info!(?level, "library deinitialized");
        }
    }
}

type SharedState<L> = Mutex<LibraryState<L>>;

fn level_from_raw(level: u32) -> Option<InitLevel> {
    InitLevel::try_from(level).ok()
}

unsafe extern "C" fn initialize<L: ExtensionLibrary>(userdata: *mut c_void, level: u32) {
    let Some(level) = level_from_raw(level) else {
        error!(level, "unknown initialization level");
        return;
    };
    guarded("initialize", (), || {
        // SAFETY: `userdata` is the state boxed by `init_library`.
        let state = unsafe { &*userdata.cast::<SharedState<L>>() };
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = state.initialize(level) {
            error!(?level, %err, "library initialization failed");
        }
    });
}

unsafe extern "C" fn deinitialize<L: ExtensionLibrary>(userdata: *mut c_void, level: u32) {
    let Some(level) = level_from_raw(level) else {
        error!(level, "unknown initialization level");
        return;
    };
    guarded("deinitialize", (), || {
        // SAFETY: as in `initialize`.
        let shared = unsafe { &*userdata.cast::<SharedState<L>>() };
        let minimum = {
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            state.deinitialize(level);
            state.config().init_level
        };
        if level == minimum {
            debug!(?level, "releasing library state");
            // SAFETY: the engine makes no further calls below its minimum
            // level, so this is the last use of `userdata`.
            drop(unsafe { Box::from_raw(userdata.cast::<SharedState<L>>()) });
        }
    });
}

/// Body of the generated entry function.
///
/// Returns 1 when the library is ready for the engine's initialize calls.
///
/// # Safety
///
/// The arguments must be the ones the engine passed to the entry function.
pub unsafe fn init_library<L: ExtensionLibrary>(
    library: L,
    get_proc_address: Option<GetProcAddress>,
    class_library: *mut c_void,
    initialization: *mut Initialization,
) -> u8 {
    let Some(get_proc_address) = get_proc_address else {
        error!("engine passed no get_proc_address");
        return 0;
    };
    if initialization.is_null() {
        error!("engine passed no initialization record");
        return 0;
    }
    // SAFETY: forwarded from the caller.
    let iface = match unsafe { NativeInterface::load(get_proc_address, class_library) } {
        Ok(iface) => iface,
        Err(err) => {
            error!(%err, "GDExtension interface unavailable");
            return 0;
        }
    };

    let state = LibraryState::new(library, iface as Arc<dyn Interface>);
    let minimum = state.config().init_level;
    let userdata = Box::into_raw(Box::new(Mutex::new(state)));
    // SAFETY: checked non-null above; the engine owns the record.
    unsafe {
        *initialization = Initialization {
            minimum_initialization_level: minimum.into(),
            userdata: userdata.cast(),
            initialize: Some(initialize::<L>),
            deinitialize: Some(deinitialize::<L>),
        };
    }
    1
}

/// Export the GDExtension entry function `$symbol` for `$library`.
#[macro_export]
macro_rules! gdextension_entry {
    ($symbol:ident, $library:expr) => {
        /// GDExtension entry point.
        ///
        /// # Safety
        ///
        /// Called by the engine only.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $symbol(
            get_proc_address: ::core::option::Option<$crate::native::GetProcAddress>,
            class_library: *mut ::core::ffi::c_void,
            initialization: *mut $crate::native::Initialization,
        ) -> u8 {
            // SAFETY: forwarded from the engine.
            unsafe { $crate::entry::init_library($library, get_proc_address, class_library, initialization) }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::headless::HeadlessEngine;
    use gdbind_core::{ClassFlags, ExtensionClassInfo, GodotVersion};

    #[derive(Default)]
    struct Recorder {
        inits: Arc<AtomicUsize>,
        deinits: Arc<AtomicUsize>,
        fail: bool,
    }

    unsafe fn free_nothing(_: gdbind_core::InstancePtr) {}

    fn info(name: &str) -> ExtensionClassInfo {
        ExtensionClassInfo {
            name: name.to_string(),
            parent: "Node3D".to_string(),
            flags: ClassFlags::default(),
            create: Box::new(|_| None),
            free: free_nothing,
            get_virtual: |_| None,
        }
    }

    impl ExtensionLibrary for Recorder {
        fn register(&self, engine: &Arc<Engine>) -> Result<(), BindError> {
            engine.register_class(info("Spinner"))?;
            if self.fail {
                return engine.register_class(info("Spinner"));
            }
            Ok(())
        }

        fn on_level_init(&self, _engine: &Arc<Engine>, _level: InitLevel) {
            self.inits.fetch_add(1, Ordering::Relaxed);
        }

        fn on_level_deinit(&self, _engine: &Arc<Engine>, _level: InitLevel) {
            self.deinits.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn engine_loads_at_the_configured_level() {
        let headless = Arc::new(HeadlessEngine::new());
        let recorder = Recorder::default();
        let inits = Arc::clone(&recorder.inits);
        let mut state = LibraryState::new(recorder, headless.clone());

        state.initialize(InitLevel::Core).unwrap();
        state.initialize(InitLevel::Servers).unwrap();
        assert!(state.engine().is_none());

        state.initialize(InitLevel::Scene).unwrap();
        state.initialize(InitLevel::Editor).unwrap();
        assert_eq!(inits.load(Ordering::Relaxed), 2);
        let engine = state.engine().expect("loaded at scene level");
        assert!(engine.classes().contains("Spinner"));
        assert!(headless.has_extension_class("Spinner"));
    }

    #[test]
    fn deinit_unregisters_classes() {
        let headless = Arc::new(HeadlessEngine::new());
        let recorder = Recorder::default();
        let deinits = Arc::clone(&recorder.deinits);
        let mut state = LibraryState::new(recorder, headless.clone());
        for level in InitLevel::ALL {
            state.initialize(level).unwrap();
        }
        for level in InitLevel::ALL.into_iter().rev() {
            state.deinitialize(level);
        }
        assert!(state.engine().is_none());
        assert_eq!(deinits.load(Ordering::Relaxed), 2);
        assert!(!headless.has_extension_class("Spinner"));
    }

    #[test]
    fn failed_registration_leaves_nothing_behind() {
        let headless = Arc::new(HeadlessEngine::new());
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut state = LibraryState::new(recorder, headless.clone());
        let err = state.initialize(InitLevel::Scene).unwrap_err();
        assert_eq!(err, BindError::AlreadyRegistered("Spinner".to_string()));
        assert!(state.engine().is_none());
        assert!(!headless.has_extension_class("Spinner"));
    }

    #[test]
    fn old_engines_are_refused() {
        let headless = Arc::new(HeadlessEngine::new().with_version(GodotVersion::new(4, 1, 3)));
        let mut state = LibraryState::new(Recorder::default(), headless);
        assert!(matches!(
            state.initialize(InitLevel::Scene),
            Err(BindError::IncompatibleVersion { .. })
        ));
    }
}
