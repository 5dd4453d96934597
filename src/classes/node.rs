use gdbind_core::{Callable, ErrorCode, NodePath, StringName, VirtualThunk};

use crate::classes::{MultiplayerApi, Object};
use crate::extension::{ExtensionClass, hook_thunk};
use crate::macros::{engine_class, engine_enum};
use crate::{HasVirtuals, Obj};

engine_enum! {
    /// How a node reacts to the scene tree being paused.
    pub struct ProcessMode {
        INHERIT = 0,
        PAUSABLE = 1,
        WHEN_PAUSED = 2,
        ALWAYS = 3,
        DISABLED = 4,
    }
}

engine_enum! {
    /// Where `add_child` places an internal child.
    pub struct InternalMode {
        DISABLED = 0,
        FRONT = 1,
        BACK = 2,
    }
}

engine_class! {
    /// Base of everything that lives in the scene tree.
    pub struct Node: "Node" => Object;
    refcounted: false;
    ancestors { as_object => Object }
    virtuals ["_ready", "_process", "_physics_process", "_enter_tree", "_exit_tree"];
    methods<'lt> {
        add_child(node: &Obj<'_, Node>, force_readable_name: bool, internal: InternalMode) = 3863233950;
        remove_child(node: &Obj<'_, Node>) = 1078189570;
        get_child_count(include_internal: bool) -> i64 = 894402480;
        get_child(idx: i64, include_internal: bool) -> Option<Obj<'lt, Node>> = 541253412;
        get_parent() -> Option<Obj<'lt, Node>> = 3160264692;
        set_name(name: &StringName) => set "name" = 3304788590;
        get_name() -> StringName => get "name" = 2002593661;
        get_path() -> NodePath = 4075236667;
        is_inside_tree() -> bool = 36873697;
        queue_free() = 3218959716;
        set_process(enable: bool) => set "processing" = 2586408642;
        is_processing() -> bool => get "processing" = 36873697;
        set_physics_process(enable: bool) => set "physics_processing" = 2586408642;
        is_physics_processing() -> bool => get "physics_processing" = 36873697;
        set_process_mode(mode: ProcessMode) => set "process_mode" = 1841290486;
        get_process_mode() -> ProcessMode => get "process_mode" = 739966102;
        get_multiplayer() -> Option<Obj<'lt, MultiplayerApi>> = 406750475;
        set_multiplayer_authority(id: i64, recursive: bool) = 972357352;
        get_multiplayer_authority() -> i64 = 3905245786;
        is_multiplayer_authority() -> bool = 36873697;
    }
}

/// Hooks a Rust `Node` subclass (or a subclass of any node class) can
/// override.
///
/// ```ignore
/// #[derive(ExtensionClass)]
/// #[class(base = Node3D)]
/// struct Spinner {
///     base: Base<Node3D>,
///     speed: f64,
/// }
///
/// impl INode for Spinner {
///     fn process(&mut self, delta: f64) {
///         // ...
///     }
/// }
/// ```
pub trait INode: ExtensionClass {
    fn ready(&mut self) {}

    fn process(&mut self, _delta: f64) {}

    fn physics_process(&mut self, _delta: f64) {}

    fn enter_tree(&mut self) {}

    fn exit_tree(&mut self) {}
}

impl<T: INode> HasVirtuals<T> for Node {
    fn virtual_by_name(name: &str) -> Option<VirtualThunk> {
        match name {
            "_ready" => Some(hook_thunk!(INode::ready())),
            "_process" => Some(hook_thunk!(INode::process(delta: f64))),
            "_physics_process" => Some(hook_thunk!(INode::physics_process(delta: f64))),
            "_enter_tree" => Some(hook_thunk!(INode::enter_tree())),
            "_exit_tree" => Some(hook_thunk!(INode::exit_tree())),
            _ => <Object as HasVirtuals<T>>::virtual_by_name(name),
        }
    }
}

impl<'lt> Obj<'lt, Node> {
    pub fn add_child(&self, child: &Obj<'_, Node>) {
        self.advanced().add_child(child, false, InternalMode::DISABLED);
    }

    pub fn remove_child(&self, child: &Obj<'_, Node>) {
        self.advanced().remove_child(child);
    }

    pub fn child_count(&self) -> usize {
        usize::try_from(self.advanced().get_child_count(false)).unwrap_or(0)
    }

    /// Child at `index`; negative indices count from the end.
    ///
    /// The handle is bound to this node, which keeps the child alive.
    pub fn child(&self, index: i64) -> Option<Obj<'lt, Node>> {
        self.advanced()
            .get_child(index, false)
            .map(|child| child.bind_to(self))
    }

    pub fn children(&self) -> Vec<Obj<'lt, Node>> {
        (0..self.advanced().get_child_count(false))
            .filter_map(|index| self.child(index))
            .collect()
    }

    pub fn parent(&self) -> Option<Obj<'lt, Node>> {
        self.advanced().get_parent()
    }

    pub fn name(&self) -> String {
        self.advanced().get_name().into_string()
    }

    pub fn set_name(&self, name: &str) {
        self.advanced().set_name(&StringName::from(name));
    }

    pub fn path(&self) -> NodePath {
        self.advanced().get_path()
    }

    pub fn is_inside_tree(&self) -> bool {
        self.advanced().is_inside_tree()
    }

    /// Ask the engine to free this node at the end of the frame.
    pub fn queue_free(&self) {
        self.advanced().queue_free();
    }

    pub fn is_processing(&self) -> bool {
        self.advanced().is_processing()
    }

    pub fn set_process(&self, enable: bool) {
        self.advanced().set_process(enable);
    }

    pub fn is_physics_processing(&self) -> bool {
        self.advanced().is_physics_processing()
    }

    pub fn set_physics_process(&self, enable: bool) {
        self.advanced().set_physics_process(enable);
    }

    pub fn process_mode(&self) -> ProcessMode {
        self.advanced().get_process_mode()
    }

    pub fn set_process_mode(&self, mode: ProcessMode) {
        self.advanced().set_process_mode(mode);
    }

    pub fn multiplayer(&self) -> Option<Obj<'lt, MultiplayerApi>> {
        self.advanced().get_multiplayer()
    }

    pub fn multiplayer_authority(&self) -> i64 {
        self.advanced().get_multiplayer_authority()
    }

    /// Give peer `id` authority over this node and all of its children.
    pub fn set_multiplayer_authority(&self, id: i64) {
        self.advanced().set_multiplayer_authority(id, true);
    }

    pub fn is_multiplayer_authority(&self) -> bool {
        self.advanced().is_multiplayer_authority()
    }

    /// Run `handler` once the node and all of its children are ready.
    pub fn on_ready(&self, handler: impl Fn() + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("ready", move |_| handler())
    }

    /// Run `handler` every time the node enters the tree.
    pub fn on_tree_entered(&self, handler: impl Fn() + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("tree_entered", move |_| handler())
    }

    /// Run `handler` every time the node starts leaving the tree, while it
    /// is still inside.
    pub fn on_tree_exiting(&self, handler: impl Fn() + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("tree_exiting", move |_| handler())
    }

    /// Run `handler` every time the node has left the tree.
    pub fn on_tree_exited(&self, handler: impl Fn() + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("tree_exited", move |_| handler())
    }
}
