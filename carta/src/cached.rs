//! Cached derived values with explicit invalidation.

/// A lazily recomputed value guarded by a dirty flag.
///
/// Mutators call [`invalidate`](Self::invalidate); readers go through
/// [`get_or_update`](Self::get_or_update), so a stale value can never be
/// observed accidentally. The previously computed value stays reachable
/// through [`last`](Self::last) for the few places that knowingly tolerate
/// staleness.
#[derive(Debug, Clone)]
pub(crate) struct Cached<T> {
    value: Option<T>,
    dirty: bool,
}

impl<T> Cached<T> {
    /// An empty cache; the first access computes the value.
    pub(crate) fn empty() -> Self {
        Self {
            value: None,
            dirty: true,
        }
    }

    /// Marks the value as out of date, keeping it readable through
    /// [`last`](Self::last).
    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the next [`get_or_update`](Self::get_or_update) will recompute.
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty || self.value.is_none()
    }

    /// Returns the cached value, recomputing it first if it is out of date.
    pub(crate) fn get_or_update(&mut self, compute: impl FnOnce() -> T) -> &T {
        if self.dirty {
            self.value = None;
            self.dirty = false;
        }
        self.value.get_or_insert_with(compute)
    }

    /// The most recently computed value, which may be out of date.
    pub(crate) fn last(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_when_invalidated() {
        let computations = std::cell::Cell::new(0);
        let count = || computations.set(computations.get() + 1);

        let mut cached = Cached::empty();
        assert_eq!(*cached.get_or_update(|| { count(); 1 }), 1);
        assert_eq!(*cached.get_or_update(|| { count(); 2 }), 1);
        assert_eq!(computations.get(), 1);

        cached.invalidate();
        assert!(cached.is_dirty());
        assert_eq!(cached.last(), Some(&1));
        assert_eq!(*cached.get_or_update(|| { count(); 3 }), 3);
        assert_eq!(computations.get(), 2);
    }
}
