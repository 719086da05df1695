/// Opaque handle issued to a mounted component when its fragment is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Append-only registration position. Later registrations compare greater.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(pub u64);

impl Sequence {
    pub const INITIAL: Sequence = Sequence(0);

    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }
}

/// Handle for one scheduled (deferred) commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

impl FrameHandle {
    /// Reserved sentinel; schedulers never hand this out.
    pub const INVALID: FrameHandle = FrameHandle(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Sequence::INITIAL;
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.next(), Sequence(2));
    }
}
