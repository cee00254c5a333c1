//! Single-assignment output cells.

/// A single-assignment cell that is either empty or filled.
///
/// Every resolution step reports its outcome through one `Slot`. A slot starts
/// empty and keeps the first value it is given; later calls to [`Slot::set`]
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot<T> {
    value: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Creates a slot already holding `value`.
    pub const fn filled(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Fills the slot. Returns `false` and drops `value` if it was already filled.
    pub fn set(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Returns a reference to the value, if filled.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Empties the slot, returning its value.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn into_option(self) -> Option<T> {
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Slot<U> {
        Slot {
            value: self.value.map(f),
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        Self { value }
    }
}

impl<T> From<Slot<T>> for Option<T> {
    fn from(slot: Slot<T>) -> Self {
        slot.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_empty() {
        let slot: Slot<u8> = Slot::new();
        assert!(slot.is_empty());
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn test_slot_keeps_first_value() {
        let mut slot = Slot::new();
        assert!(slot.set("first"));
        assert!(!slot.set("second"));
        assert_eq!(slot.get(), Some(&"first"));
    }

    #[test]
    fn test_slot_take_empties() {
        let mut slot = Slot::filled(3);
        assert_eq!(slot.take(), Some(3));
        assert!(slot.is_empty());
        assert!(slot.set(4));
    }

    #[test]
    fn test_slot_option_conversions() {
        let slot: Slot<i32> = Some(1).into();
        assert_eq!(slot.clone().map(|v| v + 1).into_option(), Some(2));
        assert_eq!(Option::from(slot), Some(1));
    }
}
