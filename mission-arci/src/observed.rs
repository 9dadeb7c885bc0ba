use std::sync::{Arc, RwLock};

/// Thread-safe holder of the latest value delivered by an asynchronous
/// producer.
///
/// Clones share the same cell. Readers never block on the producer for
/// longer than the copy of the value.
#[derive(Debug)]
pub struct ObservedValue<T> {
    inner: Arc<RwLock<Option<T>>>,
}

impl<T> ObservedValue<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the held value.
    pub fn set(&self, value: T) {
        // a poisoned lock still holds a whole `Option`
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(value);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn has_value(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl<T: Clone> ObservedValue<T> {
    /// Returns a copy of the latest value, if any has been observed.
    pub fn get(&self) -> Option<T> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl<T> Clone for ObservedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for ObservedValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_set_get_clear() {
        let value = ObservedValue::new();
        assert!(!value.has_value());
        assert_eq!(value.get(), None);
        value.set(1);
        value.set(2);
        assert_eq!(value.get(), Some(2));
        value.clear();
        assert_eq!(value.get(), None);
    }

    #[test]
    fn test_shared_between_threads() {
        let value = ObservedValue::new();
        let writer = value.clone();
        thread::spawn(move || {
            for i in 0..100 {
                writer.set(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(value.get(), Some(99));
    }
}
