// src/application/ports/storage.rs

/// Browser-style persistent key/value storage (the `localStorage` of a window).
///
/// Values are plain strings; reading a missing key yields `None`.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);

    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
