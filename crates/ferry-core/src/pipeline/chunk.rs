//! Chunk: the bounded batch assembled by the driver.

/// Ordered, bounded batch of items.
///
/// The driver fills a chunk up to `capacity`, hands it to the sink exactly
/// once, and drops it. Capacity is fixed at construction.
#[derive(Debug)]
pub struct Chunk<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Chunk<T> {
    /// # Panics
    /// Panics when `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "chunk capacity must be positive");
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one item.
    ///
    /// # Panics
    /// Panics when the chunk is already full; callers check `is_full`
    /// before every push.
    pub fn push(&mut self, item: T) {
        assert!(!self.is_full(), "push into a full chunk");
        self.items.push(item);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}
