//! Signal connections and emission.
//!
//! Handlers run with the state lock released. Deferred connections run at
//! the end of the next [`HeadlessEngine::tick`].

use gdbind_core::{Callable, ErrorCode, ObjectPtr, Value};
use tracing::{debug, trace, warn};

use super::slots::Stored;
use super::{HeadlessEngine, State};

const DEFERRED: i64 = 1;
const ONE_SHOT: i64 = 4;

pub(super) struct Connection {
    signal: String,
    callable: Callable,
    flags: i64,
}

impl State {
    /// Handlers connected to `signal` on `addr`, dropping one-shot
    /// connections and those whose owner is gone.
    fn take_handlers(&mut self, addr: usize, signal: &str) -> Vec<(Callable, bool)> {
        let ids = &self.ids;
        let Some(object) = self.objects.get_mut(&addr) else {
            return Vec::new();
        };
        object.connections.retain(|connection| {
            let owner = connection.callable.owner();
            owner.is_none() || ids.contains_key(&owner.0)
        });
        let handlers = object
            .connections
            .iter()
            .filter(|connection| connection.signal == signal)
            .map(|connection| (connection.callable.clone(), connection.flags & DEFERRED != 0))
            .collect();
        object
            .connections
            .retain(|connection| connection.signal != signal || connection.flags & ONE_SHOT == 0);
        handlers
    }
}

impl HeadlessEngine {
    pub(super) fn connect(&self, addr: usize, signal: &str, callable: Option<&Callable>, flags: i64) -> ErrorCode {
        let Some(callable) = callable else {
            return ErrorCode::InvalidParameter;
        };
        let mut state = self.lock();
        let Some(object) = state.object_mut(addr) else {
            return ErrorCode::InvalidParameter;
        };
        if object
            .connections
            .iter()
            .any(|connection| connection.signal == signal && connection.callable == *callable)
        {
            warn!(object = addr, signal, "signal is already connected to this callable");
            return ErrorCode::InvalidParameter;
        }
        object.connections.push(Connection {
            signal: signal.to_string(),
            callable: callable.clone(),
            flags,
        });
        debug!(object = addr, signal, flags, "connected");
        ErrorCode::Ok
    }

    pub(super) fn disconnect(&self, addr: usize, signal: &str, callable: Option<&Callable>) {
        let mut state = self.lock();
        let Some(object) = state.object_mut(addr) else {
            return;
        };
        let before = object.connections.len();
        object
            .connections
            .retain(|connection| connection.signal != signal || Some(&connection.callable) != callable);
        if object.connections.len() == before {
            warn!(object = addr, signal, "disconnecting a signal that is not connected");
        }
    }

    pub(super) fn is_connected(&self, addr: usize, signal: &str, callable: Option<&Callable>) -> bool {
        self.lock().object(addr).is_some_and(|object| {
            object
                .connections
                .iter()
                .any(|connection| connection.signal == signal && Some(&connection.callable) == callable)
        })
    }

    /// Call every handler of `signal` on `addr`; returns how many there were.
    pub(super) fn emit(&self, addr: usize, signal: &str, args: &[Value]) -> usize {
        let handlers = self.lock().take_handlers(addr, signal);
        for (callable, deferred) in &handlers {
            if *deferred {
                self.lock().deferred.push((callable.clone(), args.to_vec()));
            } else {
                trace!(object = addr, signal, "calling handler");
                callable.call(args);
            }
        }
        handlers.len()
    }

    pub(super) fn flush_deferred(&self) {
        let calls = std::mem::take(&mut self.lock().deferred);
        for (callable, args) in calls {
            callable.call(&args);
        }
    }

    /// Step one-shot particle emitters among `nodes` by `delta` seconds.
    /// Those whose lifetime ran out stop emitting and emit `finished`.
    pub(super) fn advance_emitters(&self, nodes: &[usize], delta: f64) {
        for node in nodes.iter().copied() {
            let is_emitter = {
                let state = self.lock();
                state.inherits(node, "CPUParticles3D") || state.inherits(node, "GPUParticles3D")
            };
            if !is_emitter
                || !self.get_property(node, "emitting", &[]).as_bool()
                || !self.get_property(node, "one_shot", &[]).as_bool()
            {
                continue;
            }
            let lifetime = self.get_property(node, "lifetime", &[]).as_float();
            let speed = self.get_property(node, "speed_scale", &[]).as_float();
            let elapsed = {
                let mut state = self.lock();
                let Some(object) = state.object_mut(node) else {
                    continue;
                };
                object.emit_elapsed += delta * speed;
                object.emit_elapsed
            };
            if elapsed >= lifetime {
                self.reset_emitter(node);
                self.set_property(node, "emitting", vec![Stored::bool(false)]);
                debug!(object = node, "one-shot emitter finished");
                self.emit(node, "finished", &[]);
            }
        }
    }

    pub(super) fn reset_emitter(&self, addr: usize) {
        if let Some(object) = self.lock().object_mut(addr) {
            object.emit_elapsed = 0.0;
        }
    }

    /// Emit `signal` on `object` as the engine would, with `args`.
    ///
    /// Returns the number of connected handlers, deferred ones included.
    pub fn emit_signal(&self, object: ObjectPtr, signal: &str, args: &[Value]) -> usize {
        self.emit(object.addr(), signal, args)
    }

    /// Connections to `signal` on `object`.
    pub fn connection_count(&self, object: ObjectPtr, signal: &str) -> usize {
        self.lock().object(object.addr()).map_or(0, |object| {
            object
                .connections
                .iter()
                .filter(|connection| connection.signal == signal)
                .count()
        })
    }
}
