/// Fixed-capacity circular byte queue with a registered read port.
///
/// The queue is usable two ways:
/// - directly, through `try_push` / `try_pop`, which take effect immediately;
/// - as a clocked component, through `tick`, where a write becomes visible
///   on the following tick and a read lands in the registered output
///   (`registered_read`) one tick after it was requested.
///
/// Capacity is a power of two. Both cursors count modulo `2 * capacity`, so
/// the bit above the slot index tells a full buffer apart from an empty one
/// without a separate occupancy register.
pub struct RingBuffer {
    slots: Box<[u8]>,
    write_cursor: usize,
    read_cursor: usize,
    /// Registered read output, valid for exactly one tick after a read.
    read_data: u8,
    read_valid: bool,
}

impl RingBuffer {
    /// Allocate a buffer of `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two. `PipelineConfig::validate`
    /// rejects such depths before a pipeline is built.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "ring buffer capacity must be a power of two: {}",
            capacity
        );
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
            write_cursor: 0,
            read_cursor: 0,
            read_data: 0,
            read_valid: false,
        }
    }

    /// Return cursors and the read port to their power-on values.
    ///
    /// Slot contents are left in place; they are unreachable until
    /// overwritten.
    pub fn reset(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
        self.read_data = 0;
        self.read_valid = false;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.write_cursor.wrapping_sub(self.read_cursor) & self.cursor_mask()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write_cursor == self.read_cursor
    }

    /// Same slot index, opposite wrap bit.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.write_cursor == (self.read_cursor ^ self.capacity())
    }

    /// Append `byte`. Returns `false` and discards the byte if the buffer is
    /// full.
    pub fn try_push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        let slot = self.slot(self.write_cursor);
        self.slots[slot] = byte;
        self.write_cursor = self.advance(self.write_cursor);
        true
    }

    /// Remove and return the oldest byte, or `None` if the buffer is empty.
    pub fn try_pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.slots[self.slot(self.read_cursor)];
        self.read_cursor = self.advance(self.read_cursor);
        Some(byte)
    }

    /// Registered read output: the byte fetched by the previous tick's read
    /// request, if that read found data.
    #[inline]
    pub fn registered_read(&self) -> Option<u8> {
        self.read_valid.then_some(self.read_data)
    }

    /// Advance one tick.
    ///
    /// Full and empty are judged on the state *before* this tick, so a write
    /// into a full buffer is rejected even if a read frees a slot in the
    /// same tick. Returns whether the write (if any) was accepted.
    pub fn tick(&mut self, write: Option<u8>, read: bool) -> bool {
        let can_write = !self.is_full();
        let can_read = !self.is_empty();

        self.read_valid = false;
        if read {
            if can_read {
                let byte = self.slots[self.slot(self.read_cursor)];
                self.read_cursor = self.advance(self.read_cursor);
                self.read_data = byte;
                self.read_valid = true;
            } else {
                log::warn!("read requested from empty ring buffer");
            }
        }

        match write {
            Some(byte) if can_write => {
                let slot = self.slot(self.write_cursor);
                self.slots[slot] = byte;
                self.write_cursor = self.advance(self.write_cursor);
                true
            }
            Some(byte) => {
                log::warn!("ring buffer full, dropping byte 0x{:02X}", byte);
                false
            }
            None => false,
        }
    }

    #[inline]
    fn cursor_mask(&self) -> usize {
        2 * self.capacity() - 1
    }

    #[inline]
    fn slot(&self, cursor: usize) -> usize {
        cursor & (self.capacity() - 1)
    }

    #[inline]
    fn advance(&self, cursor: usize) -> usize {
        (cursor + 1) & self.cursor_mask()
    }
}

#[cfg(test)]
mod tests;
