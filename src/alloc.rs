/// Strategy the heap uses to grow its backing array.
///
/// Supplied at construction; [`SystemAllocator`] is the default. An `Err`
/// from [`reserve`](ArrayAllocator::reserve) is treated as a fatal
/// allocation failure by the heap.
pub trait ArrayAllocator {
    /// Makes room for at least `additional` more elements in `buf`.
    fn reserve<E>(&mut self, buf: &mut Vec<E>, additional: usize) -> anyhow::Result<()>;

    /// Capacity to grow to when an array of `current` slots is full.
    fn next_capacity(&self, current: usize) -> usize {
        if current == 0 {
            FIRST_CAPACITY
        } else {
            std::cmp::max(current + 1, current * 3 / 2)
        }
    }
}

/// Size of the first allocation made for an empty heap.
pub const FIRST_CAPACITY: usize = 32;

/// The platform allocator, via `Vec`'s fallible reservation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl ArrayAllocator for SystemAllocator {
    fn reserve<E>(&mut self, buf: &mut Vec<E>, additional: usize) -> anyhow::Result<()> {
        buf.try_reserve_exact(additional)?;
        Ok(())
    }
}
