//! Per-value cache entries for instrument settings.

/// A locally held copy of an instrument setting plus whether it can be trusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cached<T> {
    value: T,
    valid: bool,
}

impl<T: Copy> Cached<T> {
    /// Create an entry holding `value` which must still be read from the instrument.
    pub const fn new(value: T) -> Self {
        Self { value, valid: false }
    }

    /// The cached value if it is known to match the instrument.
    pub fn get(&self) -> Option<T> {
        self.valid.then_some(self.value)
    }

    /// The last value stored, valid or not.
    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Store a value confirmed on the instrument.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.valid = true;
    }

    /// Mark the value as stale, keeping the last known value.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}
