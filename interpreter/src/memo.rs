use std::fmt;
use std::sync::OnceLock;

/// A value computed on first access and cached afterwards.
///
/// `set` replaces the cached value directly; the supplier is then never run.
pub struct Memo<T> {
    value: OnceLock<T>,
    supplier: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> Memo<T> {
    pub fn new(supplier: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Memo {
            value: OnceLock::new(),
            supplier: Box::new(supplier),
        }
    }

    /// Return the cached value, computing it on first access.
    pub fn get(&self) -> &T {
        self.value.get_or_init(|| (self.supplier)())
    }

    /// Override the cached value.
    pub fn set(&mut self, value: T) {
        self.value = OnceLock::from(value);
    }

    pub fn is_cached(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("value", &self.value.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn computes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memo::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "ruby".to_string()
        });

        assert!(!memo.is_cached());
        assert_eq!(memo.get(), "ruby");
        assert_eq!(memo.get(), "ruby");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_overrides_without_computing() {
        let mut memo = Memo::new(|| -> u32 { panic!("supplier must not run") });
        memo.set(3);
        assert!(memo.is_cached());
        assert_eq!(*memo.get(), 3);
    }

    #[test]
    fn set_replaces_a_computed_value() {
        let mut memo = Memo::new(|| 1);
        assert_eq!(*memo.get(), 1);
        memo.set(2);
        assert_eq!(*memo.get(), 2);
    }
}
