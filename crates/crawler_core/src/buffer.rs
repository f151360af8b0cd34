use thiserror::Error;

/// Capacity a fresh buffer starts with (1 MiB).
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024 * 1024;
/// Minimum amount a buffer grows by when a write does not fit (512 KiB).
pub const DEFAULT_GROWTH_INCREMENT: usize = 512 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("could not allocate {requested} bytes for response buffer")]
    Allocation { requested: usize },
}

/// Append-only byte accumulator for one transfer's body.
///
/// Capacity is always at least `len() + 1`. When a write does not fit, the
/// buffer grows once by `max(increment, chunk.len() + 1)`; it never shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    increment: usize,
    reallocations: usize,
}

impl ResponseBuffer {
    pub fn new() -> Result<Self, BufferError> {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, DEFAULT_GROWTH_INCREMENT)
    }

    pub fn with_capacity(initial: usize, increment: usize) -> Result<Self, BufferError> {
        let initial = initial.max(1);
        let mut data = Vec::new();
        data.try_reserve_exact(initial)
            .map_err(|_| BufferError::Allocation { requested: initial })?;
        Ok(Self {
            data,
            increment: increment.max(1),
            reallocations: 0,
        })
    }

    pub fn append(&mut self, chunk: &[u8]) -> Result<(), BufferError> {
        if chunk.is_empty() {
            return Ok(());
        }
        let capacity = self.data.capacity();
        if self.data.len() + chunk.len() + 1 > capacity {
            let new_capacity = capacity + self.increment.max(chunk.len() + 1);
            let additional = new_capacity - self.data.len();
            self.data
                .try_reserve_exact(additional)
                .map_err(|_| BufferError::Allocation {
                    requested: new_capacity,
                })?;
            self.reallocations += 1;
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Number of growth events since creation.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }
}
