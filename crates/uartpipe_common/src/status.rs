use bitflags::bitflags;

bitflags! {
    /// Snapshot of the pipeline's boundary outputs after a tick.
    ///
    /// `LINE` mirrors `serial_out` (set = high / mark).
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Status: u8 {
        const LINE = 1 << 0;
        const TX_BUSY = 1 << 1;
        const TX_DONE = 1 << 2;
        const FIFO_FULL = 1 << 3;
        const FIFO_EMPTY = 1 << 4;
    }
}

impl Status {
    /// Idle pipeline: line high, nothing in flight, buffer drained.
    pub const IDLE: Status = Status::LINE.union(Status::FIFO_EMPTY);
}
