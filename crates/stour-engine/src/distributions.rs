//! Double-buffered distribution storage.

/// The two generations of distribution values a rank holds.
///
/// `old` is the read-only input to the current step; `new` is the
/// write-only output, including the send-halo tail. Values are never
/// mutated in place — after a full pass the roles swap, so every
/// site's update reads only the fully-formed prior generation.
#[derive(Clone, Debug)]
pub struct DistributionBuffers {
    old: Vec<f64>,
    new: Vec<f64>,
}

impl DistributionBuffers {
    /// Two zeroed buffers of `slot_count` values each.
    pub fn new(slot_count: usize) -> Self {
        Self {
            old: vec![0.0; slot_count],
            new: vec![0.0; slot_count],
        }
    }

    /// Number of slots per generation, send halo included.
    pub fn slot_count(&self) -> usize {
        self.old.len()
    }

    /// The last published generation.
    pub fn old(&self) -> &[f64] {
        &self.old
    }

    /// Mutable access to the published generation, for seeding initial
    /// conditions before the run starts.
    pub fn old_mut(&mut self) -> &mut [f64] {
        &mut self.old
    }

    /// Borrow both generations at once: `(read old, write new)`.
    pub fn split(&mut self) -> (&[f64], &mut [f64]) {
        (&self.old, &mut self.new)
    }

    /// Publish the staged generation: new becomes old.
    ///
    /// The displaced buffer is reused as the next staging area without
    /// clearing — every slot is overwritten by the next pass anyway.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.old, &mut self.new);
    }
}
