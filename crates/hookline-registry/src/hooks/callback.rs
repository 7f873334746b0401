//! Callback values that can be registered against a hook.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use hookline_core::HookResult;
use serde_json::Value;

/// Signature shared by every callback.
///
/// The slice holds at most `accepted_args` leading dispatch arguments.
/// Filters carry the returned value forward; actions discard it.
pub type CallbackFn = dyn Fn(&mut [Value]) -> HookResult<Value> + Send + Sync;

/// Receiver used to give each closure its own identity.
#[derive(Debug)]
pub(crate) struct ClosureAnchor;

/// A registrable callback.
///
/// Each variant carries what is needed to derive its identity key:
/// free functions by name, static methods by class and method name,
/// bound methods and closures by the identity of their receiver.
#[derive(Clone)]
pub enum Callback {
    /// A named free function.
    Function {
        /// Function name, used verbatim as the identity.
        name: String,
        /// The callable.
        f: Arc<CallbackFn>,
    },
    /// A method bound to a shared receiver.
    Method {
        /// The receiver. Its allocation is the identity anchor.
        object: Arc<dyn Any + Send + Sync>,
        /// Method name.
        method: String,
        /// The callable, already bound to `object`.
        f: Arc<CallbackFn>,
    },
    /// An associated function referenced through its type name.
    Static {
        /// Type name.
        class: String,
        /// Method name.
        method: String,
        /// The callable.
        f: Arc<CallbackFn>,
    },
    /// An anonymous closure. Clones share one identity.
    Closure {
        /// Synthetic receiver standing in for the closure instance.
        anchor: Arc<dyn Any + Send + Sync>,
        /// The callable.
        f: Arc<CallbackFn>,
    },
}

impl Callback {
    /// Method name used for the synthetic receiver of a closure.
    pub const CLOSURE_METHOD: &'static str = "__invoke";

    /// Wraps a named free function.
    pub fn function<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut [Value]) -> HookResult<Value> + Send + Sync + 'static,
    {
        Self::Function {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Binds `f` to `object` under `method`.
    ///
    /// Two callbacks built from the same `Arc` and method name share an
    /// identity, so registering both at one hook and priority stores a
    /// single entry.
    pub fn method<T, F>(object: &Arc<T>, method: impl Into<String>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &mut [Value]) -> HookResult<Value> + Send + Sync + 'static,
    {
        let receiver = Arc::clone(object);
        let anchor: Arc<dyn Any + Send + Sync> = object.clone();

        Self::Method {
            object: anchor,
            method: method.into(),
            f: Arc::new(move |args: &mut [Value]| f(&receiver, args)),
        }
    }

    /// Wraps an associated function referenced as `class::method`.
    pub fn static_method<F>(class: impl Into<String>, method: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut [Value]) -> HookResult<Value> + Send + Sync + 'static,
    {
        Self::Static {
            class: class.into(),
            method: method.into(),
            f: Arc::new(f),
        }
    }

    /// Wraps an anonymous closure.
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&mut [Value]) -> HookResult<Value> + Send + Sync + 'static,
    {
        Self::Closure {
            anchor: Arc::new(ClosureAnchor),
            f: Arc::new(f),
        }
    }

    /// Invokes the callable with the already-truncated argument list.
    pub fn invoke(&self, args: &mut [Value]) -> HookResult<Value> {
        match self {
            Self::Function { f, .. }
            | Self::Method { f, .. }
            | Self::Static { f, .. }
            | Self::Closure { f, .. } => f(args),
        }
    }

    /// Receiver whose allocation identifies this callback, if any.
    pub(crate) fn receiver(&self) -> Option<(&Arc<dyn Any + Send + Sync>, &str)> {
        match self {
            Self::Method { object, method, .. } => Some((object, method.as_str())),
            Self::Closure { anchor, .. } => Some((anchor, Self::CLOSURE_METHOD)),
            Self::Function { .. } | Self::Static { .. } => None,
        }
    }

    /// Short variant name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Function { .. } => "function",
            Self::Method { .. } => "method",
            Self::Static { .. } => "static",
            Self::Closure { .. } => "closure",
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function { name, .. } => f.debug_struct("Function").field("name", name).finish(),
            Self::Method { object, method, .. } => f
                .debug_struct("Method")
                .field("object", &Arc::as_ptr(object).cast::<()>())
                .field("method", method)
                .finish(),
            Self::Static { class, method, .. } => f
                .debug_struct("Static")
                .field("class", class)
                .field("method", method)
                .finish(),
            Self::Closure { anchor, .. } => f
                .debug_struct("Closure")
                .field("anchor", &Arc::as_ptr(anchor).cast::<()>())
                .finish(),
        }
    }
}
