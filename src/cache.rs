//! Lazily populated, manually invalidated cache slot.
//!
//! Server zone lists and zone details are fetched on first read and kept
//! until a mutation on the owning object resets them.

#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    slot: Option<T>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> Cached<T> {
    pub fn is_loaded(&self) -> bool {
        self.slot.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Returns the cached value, running `load` only when nothing is cached.
    /// A failing loader leaves the slot unloaded.
    pub fn get_or_load<E, F>(&mut self, load: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let value = match self.slot.take() {
            Some(value) => value,
            None => load()?,
        };
        Ok(self.slot.insert(value))
    }
}
