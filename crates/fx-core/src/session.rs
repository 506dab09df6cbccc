use fnv::FnvHashMap;

/// Boolean flags that live for one browsing session.
///
/// The browser implementation sits on `sessionStorage`; tests use
/// [`MemorySessionStore`] to fake a fresh or already-booted session.
pub trait SessionStore {
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str, value: bool);
}

#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    flags: FnvHashMap<String, bool>,
    writes: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where `key` is already set.
    pub fn with_flag(key: &str) -> Self {
        let mut store = Self::new();
        store.flags.insert(key.to_string(), true);
        store
    }

    /// Number of `set_flag` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.writes += 1;
        self.flags.insert(key.to_string(), value);
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn get_flag(&self, key: &str) -> bool {
        (**self).get_flag(key)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        (**self).set_flag(key, value)
    }
}
