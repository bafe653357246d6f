//! # Components and Type Keys
//!
//! Components are plain data associated 1:1 with at most one entity per type.
//! Every component, global and resource type gets a small numeric [`TypeKey`]
//! the first time it is used; the store indexes its pools with it.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use parking_lot::Mutex;

/// Marker trait for ECS components.
///
/// Components carry no required behavior; storage concerns (clearing,
/// removal, enumeration, naming) are provided by the pool.
///
/// # Example
///
/// ```rust
/// use wikigolf_core::Component;
///
/// #[derive(Debug, Clone, Copy, Default)]
/// struct Velocity { x: f32, y: f32 }
///
/// impl Component for Velocity {}
/// ```
pub trait Component: 'static {}

/// Process-wide numeric identifier for a Rust type.
///
/// Allocated from a shared counter on first use and memoized per type. Only
/// meaningful for comparisons within one process run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(u32);

static NEXT_KEY: AtomicU32 = AtomicU32::new(0);
static REGISTRY: OnceLock<Mutex<HashMap<TypeId, TypeKey>>> = OnceLock::new();

thread_local! {
    static LOCAL_KEYS: RefCell<HashMap<TypeId, TypeKey>> = RefCell::new(HashMap::new());
}

impl TypeKey {
    /// Returns the key for `T`, allocating the next unused one on first call.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        let type_id = TypeId::of::<T>();
        if let Some(key) = LOCAL_KEYS.with(|keys| keys.borrow().get(&type_id).copied()) {
            return key;
        }

        let key = *REGISTRY
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .entry(type_id)
            .or_insert_with(|| {
                let key = TypeKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed));
                tracing::trace!(key = key.0, type_name = std::any::type_name::<T>(), "type key allocated");
                key
            });

        LOCAL_KEYS.with(|keys| keys.borrow_mut().insert(type_id, key));
        key
    }

    /// Returns the raw key as a slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
