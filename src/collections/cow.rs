/*
Copy-on-Write Handles
=====================

A `CowPtr<T>` shares one heap value between any number of handles and only
copies it when someone asks to change it.

    a ──┐                         a ──→ [ value ]  count 1
        ├──→ [ value ]  count 2
    b ──┘                         b ──→ [ copy  ]  count 1
                    b.get_mut()
                   ───────────→

Vocabulary
----------

  bound      The handle points at a value. `CowPtr::unbound()` (and
             `Default`) hold nothing; reading through them fails with
             `Error::NullReference`.

  use count  How many live handles point at the same value. Cloning a
             handle bumps it, dropping one lowers it, and the value is freed
             with the last handle.

  unique     Use count of exactly 1. Only a unique handle may hand out
             `&mut T`; a shared one first clones the value through
             `CowClone` and rebinds itself to the copy.


Why a Separate Clone Hook
-------------------------

The copy made on write is not always a plain `Clone`: a list of partials
wants to report that it is duplicating its whole backing sequence. Managed
types opt in by implementing `CowClone`, which is what `get_mut` calls.

The count is an `Rc` count: not atomic, so handles are neither `Send` nor
`Sync` and stay on the thread that made them.
*/

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::error::{Error, Result};

/// Capability a value needs to live behind a [`CowPtr`]: produce an owned,
/// independent copy of itself when a shared handle is written through.
pub trait CowClone {
    fn cow_clone(&self) -> Self;
}

// Routes `Rc::make_mut` through the managed type's own clone hook.
struct Slot<T>(T);

impl<T: CowClone> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Slot(self.0.cow_clone())
    }
}

/// Reference-counted handle with copy-on-write semantics.
pub struct CowPtr<T> {
    inner: Option<Rc<Slot<T>>>,
}

impl<T> CowPtr<T> {
    /// Bind a new handle to `value` with a use count of 1.
    pub fn new(value: T) -> Self {
        Self {
            inner: Some(Rc::new(Slot(value))),
        }
    }

    /// A handle holding nothing.
    pub fn unbound() -> Self {
        Self { inner: None }
    }

    pub fn is_bound(&self) -> bool {
        self.inner.is_some()
    }

    /// Number of handles sharing this value, 0 when unbound.
    pub fn use_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    pub fn is_unique(&self) -> bool {
        self.use_count() == 1
    }

    /// True when both handles point at the very same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Shared access. Never copies.
    pub fn get(&self) -> Result<&T> {
        self.inner
            .as_deref()
            .map(|slot| &slot.0)
            .ok_or(Error::NullReference)
    }

    /// Drop the current binding (other handles keep the value) and bind to
    /// `value` with a fresh count of 1.
    pub fn rebind(&mut self, value: T) {
        self.inner = Some(Rc::new(Slot(value)));
    }

    /// Drop the current binding, leaving this handle unbound.
    pub fn release(&mut self) {
        self.inner = None;
    }
}

impl<T: CowClone> CowPtr<T> {
    /// Exclusive access, copying the value first if it is shared.
    pub fn get_mut(&mut self) -> Result<&mut T> {
        let rc = self.inner.as_mut().ok_or(Error::NullReference)?;
        Ok(Self::unique_mut(rc))
    }

    /// Like [`get_mut`](Self::get_mut), binding to `init()` first if unbound.
    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, init: F) -> &mut T {
        let rc = self.inner.get_or_insert_with(|| Rc::new(Slot(init())));
        Self::unique_mut(rc)
    }

    /// Take the value out, copying it if other handles still share it.
    pub fn into_owned(self) -> Result<T> {
        let rc = self.inner.ok_or(Error::NullReference)?;
        Ok(match Rc::try_unwrap(rc) {
            Ok(slot) => slot.0,
            Err(shared) => shared.0.cow_clone(),
        })
    }

    fn unique_mut(rc: &mut Rc<Slot<T>>) -> &mut T {
        let count = Rc::strong_count(rc);
        if count > 1 {
            trace!("copy-on-write: detaching from {count} shared handles");
        }
        &mut Rc::make_mut(rc).0
    }
}

impl<T> Clone for CowPtr<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for CowPtr<T> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<T: fmt::Debug> fmt::Debug for CowPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CowPtr")
            .field("use_count", &self.use_count())
            .field("value", &self.get().ok())
            .finish()
    }
}
