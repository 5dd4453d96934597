//! Scene tree, virtual hooks and object destruction.
//!
//! Hooks and the tree signals run with the state lock released, so they may
//! call back into the engine. Each node emits its signal right after the
//! matching hook: `tree_entered` after `_enter_tree`, `ready` after
//! `_ready`, `tree_exiting` after `_exit_tree`. `tree_exited` follows once
//! the node is detached.

use gdbind_core::AbiType;
use tracing::{debug, trace, warn};

use super::slots::{SlotBuffer, Stored};
use super::{HeadlessEngine, State};

impl State {
    pub(super) fn in_tree(&self, addr: usize) -> bool {
        let mut current = Some(addr);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.object(node).and_then(|object| object.parent);
        }
        false
    }

    fn is_ancestor(&self, ancestor: usize, of: usize) -> bool {
        let mut current = Some(of);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.object(node).and_then(|object| object.parent);
        }
        false
    }

    /// `addr` and its descendants, parents before children.
    pub(super) fn pre_order(&self, addr: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut stack = vec![addr];
        while let Some(node) = stack.pop() {
            let Some(object) = self.object(node) else {
                continue;
            };
            order.push(node);
            stack.extend(object.children.iter().rev());
        }
        order
    }

    /// `addr` and its descendants, children before parents.
    pub(super) fn post_order(&self, addr: usize) -> Vec<usize> {
        fn visit(state: &State, node: usize, order: &mut Vec<usize>) {
            let Some(object) = state.object(node) else {
                return;
            };
            for child in &object.children {
                visit(state, *child, order);
            }
            order.push(node);
        }
        let mut order = Vec::new();
        visit(self, addr, &mut order);
        order
    }

    fn detach(&mut self, child: usize) {
        let Some(parent) = self.object_mut(child).and_then(|object| object.parent.take()) else {
            return;
        };
        if let Some(parent) = self.object_mut(parent) {
            parent.children.retain(|node| *node != child);
        }
    }
}

impl HeadlessEngine {
    /// Run hook `hook` of the extension instance on `addr`, if it has one.
    pub(super) fn run_hook(&self, addr: usize, hook: &str, args: &[Stored], types: &[AbiType]) -> bool {
        let Some((thunk, instance)) = self.hook(addr, hook) else {
            return false;
        };
        trace!(object = addr, hook, "running virtual hook");
        let buffer = SlotBuffer::new(args, types, &mut self.lock().payloads);
        let pointers = buffer.pointers();
        let mut ret = [0u64; 6];
        // SAFETY: the slots match the hook's parameters and `ret` fits any
        // return type.
        unsafe { thunk(self, instance, pointers.as_ptr(), ret.as_mut_ptr().cast()) };
        buffer.release(&mut self.lock().payloads);
        true
    }

    pub(super) fn scene_add_child(&self, parent: usize, child: usize) {
        let entering = {
            let mut state = self.lock();
            if !state.objects.contains_key(&parent) || !state.inherits(child, "Node") {
                warn!(parent, child, "add_child with an invalid node");
                return;
            }
            if state.object(child).is_some_and(|object| object.parent.is_some()) {
                warn!(parent, child, "add_child on a node that already has a parent");
                return;
            }
            if state.is_ancestor(child, parent) {
                warn!(parent, child, "add_child would create a cycle");
                return;
            }
            if let Some(object) = state.object_mut(child) {
                object.parent = Some(parent);
            }
            if let Some(object) = state.object_mut(parent) {
                object.children.push(child);
            }
            if state.in_tree(parent) {
                state.pre_order(child)
            } else {
                Vec::new()
            }
        };
        if entering.is_empty() {
            return;
        }

        for node in &entering {
            self.run_hook(*node, "_enter_tree", &[], &[]);
            self.emit(*node, "tree_entered", &[]);
        }

        let readying: Vec<usize> = {
            let mut state = self.lock();
            let order = state.post_order(child);
            order
                .into_iter()
                .filter(|node| match state.object_mut(*node) {
                    Some(object) if !object.ready => {
                        object.ready = true;
                        true
                    }
                    _ => false,
                })
                .collect()
        };
        for node in readying {
            self.run_hook(node, "_ready", &[], &[]);
            self.emit(node, "ready", &[]);
        }
        debug!(parent, child, nodes = entering.len(), "subtree entered the tree");
    }

    pub(super) fn scene_remove_child(&self, parent: usize, child: usize) {
        let exiting = {
            let state = self.lock();
            if state.object(child).and_then(|object| object.parent) != Some(parent) {
                warn!(parent, child, "remove_child on a node that is not a child");
                return;
            }
            if state.in_tree(child) {
                state.post_order(child)
            } else {
                Vec::new()
            }
        };
        self.exit_tree(&exiting);
        self.lock().detach(child);
        for node in exiting {
            self.emit(node, "tree_exited", &[]);
        }
    }

    fn exit_tree(&self, exiting: &[usize]) {
        for node in exiting.iter().copied() {
            self.run_hook(node, "_exit_tree", &[], &[]);
            self.emit(node, "tree_exiting", &[]);
        }
    }

    /// Destroy `addr` and, for nodes, its whole subtree.
    pub(super) fn scene_destroy(&self, addr: usize) {
        let exiting = {
            let state = self.lock();
            if !state.objects.contains_key(&addr) {
                return;
            }
            if state.in_tree(addr) {
                state.post_order(addr)
            } else {
                Vec::new()
            }
        };
        self.exit_tree(&exiting);
        self.lock().detach(addr);
        for node in exiting {
            self.emit(node, "tree_exited", &[]);
        }

        let (instances, held) = {
            let mut state = self.lock();
            let doomed = state.post_order(addr);
            let mut instances = Vec::new();
            let mut held = Vec::new();
            for node in doomed {
                let Some(object) = state.objects.remove(&node) else {
                    continue;
                };
                state.ids.remove(&object.id);
                state.queued.retain(|queued| *queued != node);
                if state.multiplayer == Some(node) {
                    state.multiplayer = None;
                }
                state.destroyed += 1;
                held.extend(object.held_refs());
                trace!(object = node, class = %object.class, "destroyed");
                if let Some(instance) = object.instance {
                    instances.push(instance);
                }
            }
            (instances, held)
        };

        for instance in instances {
            // SAFETY: the instance was created for this class and its object
            // is gone.
            unsafe { instance.info.free_instance(instance.ptr) };
        }
        for object in held {
            self.release_ref(object);
        }
    }

    /// Drop one engine-held reference, destroying the object at zero.
    pub(super) fn release_ref(&self, addr: usize) {
        let last = {
            let mut state = self.lock();
            match state.object_mut(addr).and_then(|object| object.refcount.as_mut()) {
                Some(count) => {
                    *count = count.saturating_sub(1);
                    *count == 0
                }
                None => false,
            }
        };
        if last {
            self.scene_destroy(addr);
        }
    }

    /// Advance one frame: physics hooks, then process hooks, in tree order,
    /// then one-shot emitters and deferred signal handlers, then free every
    /// node queued with `queue_free`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn tick(&self, delta: f64) {
        let order = {
            let state = self.lock();
            state.pre_order(state.root)
        };
        for (hook, flag) in [("_physics_process", "physics_processing"), ("_process", "processing")] {
            for node in &order {
                let enabled = {
                    let state = self.lock();
                    match state.object(*node) {
                        Some(object) => object.props.get(&(flag, None)).map(Stored::as_bool),
                        None => continue,
                    }
                };
                if enabled == Some(false) {
                    continue;
                }
                self.run_hook(*node, hook, &[Stored::float(delta)], &[AbiType::Float]);
            }
        }
        self.advance_emitters(&order, delta);
        self.flush_deferred();
        self.flush_queue();
    }

    fn flush_queue(&self) {
        let queued = std::mem::take(&mut self.lock().queued);
        for node in queued {
            debug!(object = node, "freeing queued node");
            self.scene_destroy(node);
        }
    }
}
