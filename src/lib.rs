//! A double-ended sequence container over square-root sized chunks.
//!
//! `SqrtDeque` keeps its elements in an ordered table of contiguous chunks
//! and keeps every chunk's length close to the square root of the total
//! element count. That balance point buys all three of:
//!
//! - amortized *O(1)* pushes and pops at either end,
//! - *O(√n)* insertion and removal at arbitrary positions,
//! - *O(√n)* random access with cache-friendly traversal inside chunks.
//!
//! A plain ring buffer gets the first and third but pays *O(n)* for middle
//! insertion; a linked list gets the second but loses random access. The
//! chunk table sits in between:
//!
//! ```text
//!            chunk table (itself a chunk of chunk descriptors)
//!          +-----------+-----------+-----------+
//!          | chunk 0   | chunk 1   | chunk 2   |
//!          +-----+-----+-----+-----+-----+-----+
//!                |           |           |
//!                v           v           v
//!          [0 1 2 3 . .] [4 5 6 . . .] [7 8 9 . .]
//!           live prefix   live prefix   live prefix
//! ```
//!
//! Logical order is the concatenation of the chunks' live prefixes. After
//! every edit the container checks the edited chunk: a chunk that has grown
//! well past the balance point is split at its midpoint, and a pair of
//! neighbours that has shrunk well below it is merged. A rare randomized
//! full sweep ([`rebalance`]) additionally bounds the drift that workloads
//! hammering a single boundary could otherwise accumulate.
//!
//! Elements are addressed by *logical index* throughout. The positional
//! cursors ([`Cursor`], [`CursorMut`]) follow the same rule: a cursor is a
//! container reference plus an index, so rebalancing never invalidates it,
//! and inserting in front of a cursor shifts which element it sees rather
//! than following the old element. Fallible operations report one of three
//! error kinds ([`DequeError`]): an out-of-bounds index, an empty container,
//! or a detached/foreign cursor.
//!
//! [`rebalance`]: SqrtDeque::rebalance

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, Index, IndexMut, Range, RangeBounds};
use std::ptr;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

#[macro_use]
mod macros;

mod chunk;
mod cursor;
mod drain;
pub mod error;
mod into_iter;
mod iter;
mod raw_vec;

pub use cursor::{Cursor, CursorMut};
pub use drain::Drain;
pub use error::DequeError;
pub use into_iter::IntoIter;
pub use iter::{Iter, IterMut};


use chunk::{fit, Chunk};
use error::Result;

/// Chunks shorter than this never split, whatever the container size.
const SPLIT_MIN_LEN: usize = 16;

/// Probability of running a full [`SqrtDeque::rebalance`] sweep after an
/// edit, as a threshold for one `u32` draw: 20_000 / 2³² ≈ 5·10⁻⁶.
const SWEEP_PROBE_THRESHOLD: u32 = 20_000;

/// A double-ended sequence container over square-root sized chunks.
///
/// See the [module-level documentation](./index.html) for the layout and
/// cost profile.
pub struct SqrtDeque<T> {
    // Always holds at least one chunk; a lone chunk may be empty, any other
    // configuration has only non-empty chunks.
    chunks: Chunk<Chunk<T>>,
    len: usize,
    sweep_rng: SmallRng,
}

impl<T> SqrtDeque<T> {
    /// Creates an empty deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqrtdeque::SqrtDeque;
    ///
    /// let deque: SqrtDeque<i32> = SqrtDeque::new();
    /// assert!(deque.is_empty());
    /// ```
    pub fn new() -> Self {
        let mut chunks = Chunk::new();
        chunks.insert(0, Chunk::new());
        Self { chunks, len: 0, sweep_rng: SmallRng::from_entropy() }
    }

    /// Returns the number of elements in the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// assert_eq!(deque.len(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::new();
    /// assert!(deque.is_empty());
    /// deque.push_back(42);
    /// assert!(!deque.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Provides a reference to the element at `index`.
    ///
    /// Element at index 0 is the front of the deque.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] if `index` is not below the length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// assert_eq!(deque.at(1), Ok(&2));
    /// assert!(deque.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        if index >= self.len {
            return Err(DequeError::IndexOutOfBounds { index, len: self.len });
        }
        let (chunk, offset) = self.locate(index);
        Ok(&self.chunks.as_slice()[chunk].as_slice()[offset])
    }

    /// Provides a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] if `index` is not below the length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// *deque.at_mut(1).unwrap() += 40;
    /// assert_eq!(deque, [1, 42, 3]);
    /// ```
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len {
            return Err(DequeError::IndexOutOfBounds { index, len: self.len });
        }
        let (chunk, offset) = self.locate(index);
        Ok(&mut self.chunks.as_mut_slice()[chunk].as_mut_slice()[offset])
    }

    /// Provides a reference to the element at `index`, or `None` if the
    /// index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// assert_eq!(deque.get(1), Some(&2));
    /// assert_eq!(deque.get(5), None);
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    /// Provides a mutable reference to the element at `index`, or `None` if
    /// the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.at_mut(index).ok()
    }

    /// Provides a reference to the front element.
    ///
    /// # Errors
    ///
    /// [`DequeError::Empty`] if the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// use sqrtdeque::DequeError;
    ///
    /// let mut deque = SqrtDeque::new();
    /// assert_eq!(deque.front(), Err(DequeError::Empty));
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// assert_eq!(deque.front(), Ok(&1));
    /// ```
    pub fn front(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        self.at(0)
    }

    /// Provides a mutable reference to the front element.
    ///
    /// # Errors
    ///
    /// [`DequeError::Empty`] if the deque is empty.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        self.at_mut(0)
    }

    /// Provides a reference to the back element.
    ///
    /// # Errors
    ///
    /// [`DequeError::Empty`] if the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// assert_eq!(deque.back(), Ok(&3));
    /// ```
    pub fn back(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        self.at(self.len - 1)
    }

    /// Provides a mutable reference to the back element.
    ///
    /// # Errors
    ///
    /// [`DequeError::Empty`] if the deque is empty.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        self.at_mut(self.len - 1)
    }

    /// Prepends an element to the front of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::new();
    /// deque.push_front(1);
    /// deque.push_front(2);
    /// assert_eq!(deque, [2, 1]);
    /// ```
    #[inline]
    pub fn push_front(&mut self, value: T) {
        self.insert_unchecked(0, value);
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::new();
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// assert_eq!(deque, [1, 2]);
    /// ```
    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.insert_unchecked(self.len, value);
    }

    /// Removes the front element and returns it.
    ///
    /// # Errors
    ///
    /// [`DequeError::Empty`] if the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2]);
    /// assert_eq!(deque.pop_front(), Ok(1));
    /// assert_eq!(deque.pop_front(), Ok(2));
    /// assert!(deque.pop_front().is_err());
    /// ```
    pub fn pop_front(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        Ok(self.remove_unchecked(0))
    }

    /// Removes the back element and returns it.
    ///
    /// # Errors
    ///
    /// [`DequeError::Empty`] if the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2]);
    /// assert_eq!(deque.pop_back(), Ok(2));
    /// assert_eq!(deque.pop_back(), Ok(1));
    /// assert!(deque.pop_back().is_err());
    /// ```
    pub fn pop_back(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        Ok(self.remove_unchecked(self.len - 1))
    }

    /// Inserts `value` before position `index`, shifting everything from
    /// `index` on one position towards the back. `index == len` appends.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] if `index` is greater than the
    /// length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// deque.insert_at(1, 5).unwrap();
    /// assert_eq!(deque, [1, 5, 2, 3]);
    /// assert!(deque.insert_at(9, 9).is_err());
    /// ```
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(DequeError::IndexOutOfBounds { index, len: self.len });
        }
        self.insert_unchecked(index, value);
        Ok(())
    }

    /// Removes the element at position `index` and returns it, shifting the
    /// elements behind it one position towards the front.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] if `index` is not below the length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// assert_eq!(deque.remove_at(1), Ok(2));
    /// assert_eq!(deque, [1, 3]);
    /// ```
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(DequeError::IndexOutOfBounds { index, len: self.len });
        }
        Ok(self.remove_unchecked(index))
    }

    /// Clears the deque, dropping all elements and all chunks but a fresh
    /// empty one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.chunks.insert(0, Chunk::new());
        self.len = 0;
    }

    /// Shortens the deque, keeping the first `len` elements and dropping
    /// the rest. A `len` of at least the current length is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3, 4]);
    /// deque.truncate(2);
    /// assert_eq!(deque, [1, 2]);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            drop(self.remove_unchecked(self.len - 1));
        }
    }

    /// Returns `true` if the deque contains an element equal to the given
    /// value. This operation is *O(n)*.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// assert!(deque.contains(&2));
    /// assert!(!deque.contains(&4));
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|el| el == x)
    }

    /// Swaps the elements at indices `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// deque.swap(0, 2);
    /// assert_eq!(deque, [3, 2, 1]);
    /// ```
    pub fn swap(&mut self, i: usize, j: usize) {
        if i >= self.len {
            index_out_of_bounds(self.len, i);
        }
        if j >= self.len {
            index_out_of_bounds(self.len, j);
        }
        if i == j {
            return;
        }
        let (ci, oi) = self.locate(i);
        let (cj, oj) = self.locate(j);
        let table = self.chunks.as_mut_slice();
        let pi = table[ci].as_mut_ptr();
        let pj = table[cj].as_mut_ptr();
        // SAFETY: both offsets address live slots and i != j makes them
        // distinct slots
        unsafe {
            ptr::swap(pi.add(oi), pj.add(oj));
        }
    }

    /// Returns a front-to-back iterator over the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// let collected: Vec<_> = deque.iter().copied().collect();
    /// assert_eq!(collected, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns a front-to-back iterator yielding mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// for el in deque.iter_mut() {
    ///     *el += 10;
    /// }
    /// assert_eq!(deque, [11, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Returns a cursor at position `pos`. The position may equal the
    /// length, which addresses the end of the deque.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] if `pos` is greater than the length.
    pub fn cursor_at(&self, pos: usize) -> Result<Cursor<'_, T>> {
        if pos > self.len {
            return Err(DequeError::IndexOutOfBounds { index: pos, len: self.len });
        }
        Ok(Cursor::new(self, pos))
    }

    /// Returns a cursor at the front of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// let cursor = deque.cursor_begin();
    /// assert_eq!(cursor.get(), Ok(&1));
    /// ```
    pub fn cursor_begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, 0)
    }

    /// Returns a cursor one past the back of the deque. Dereferencing it
    /// fails until it moves onto an element.
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.len)
    }

    /// Returns a mutable cursor at position `pos`.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] if `pos` is greater than the length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 4]);
    /// let mut cursor = deque.cursor_at_mut(2).unwrap();
    /// cursor.insert(3).unwrap();
    /// assert_eq!(deque, [1, 2, 3, 4]);
    /// ```
    pub fn cursor_at_mut(&mut self, pos: usize) -> Result<CursorMut<'_, T>> {
        if pos > self.len {
            return Err(DequeError::IndexOutOfBounds { index: pos, len: self.len });
        }
        Ok(CursorMut::new(self, pos))
    }

    /// Returns a mutable cursor at the front of the deque.
    pub fn cursor_begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, 0)
    }

    /// Returns a mutable cursor one past the back of the deque.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len;
        CursorMut::new(self, len)
    }

    /// Removes the index range `range` from the deque in bulk, returning
    /// the removed elements as an iterator. Dropping the iterator drops the
    /// elements it has not yielded.
    ///
    /// # Panics
    ///
    /// Panics if the range has a start greater than its end or an end
    /// greater than the length of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3, 4, 5, 6]);
    /// assert_eq!(deque.drain(1..4).collect::<Vec<_>>(), [2, 3, 4]);
    /// assert_eq!(deque, [1, 5, 6]);
    /// ```
    pub fn drain<R>(&mut self, range: R) -> Drain<'_, T>
    where
        R: RangeBounds<usize>,
    {
        let Range { start, end } = simplify_range(range, self.len);
        Drain::new(self, start, end - start)
    }

    /// Restores the chunk balance in one full sweep: drops empty chunks,
    /// splits every oversized chunk and merges every undersized pair of
    /// neighbours.
    ///
    /// The per-edit checks keep the balance in the common case; this sweep
    /// also runs on its own with a tiny fixed probability after each edit,
    /// which bounds the drift of workloads that always edit at a chunk
    /// boundary. Calling it directly is never required.
    pub fn rebalance(&mut self) {
        let mut i = 0;
        while self.chunks.len() > 1 && i < self.chunks.len() {
            if self.chunks.as_slice()[i].is_empty() {
                self.chunks.remove(i);
            } else {
                i += 1;
            }
        }
        let mut i = 0;
        while i < self.chunks.len() {
            if self.should_split(self.chunks.as_slice()[i].len()) {
                self.split_chunk(i);
                // skip the freshly created left half
                i += 1;
            }
            i += 1;
        }
        let mut i = 0;
        while i + 1 < self.chunks.len() {
            let combined = self.chunks.as_slice()[i].len() + self.chunks.as_slice()[i + 1].len();
            if self.should_merge(combined) {
                // re-check the merged chunk against its new right neighbour
                self.merge_chunks(i);
            } else {
                i += 1;
            }
        }
    }

    /// Maps a logical index in `[0, len)` to a chunk index and an offset
    /// inside that chunk, scanning from whichever end is nearer.
    fn locate(&self, pos: usize) -> (usize, usize) {
        debug_assert!(pos < self.len);
        let table = self.chunks.as_slice();
        if pos <= self.len / 2 {
            let mut i = 0;
            let mut rem = pos;
            while rem >= table[i].len() {
                rem -= table[i].len();
                i += 1;
            }
            (i, rem)
        } else {
            let mut i = table.len() - 1;
            let mut rem = self.len - pos;
            while rem > table[i].len() {
                rem -= table[i].len();
                i -= 1;
            }
            (i, table[i].len() - rem)
        }
    }

    /// Like [`locate`](Self::locate) but also accepts `pos == len`, which
    /// addresses the slot past the last element. A position on a chunk
    /// boundary resolves to the end of the earlier chunk.
    fn locate_allow_end(&self, pos: usize) -> (usize, usize) {
        debug_assert!(pos <= self.len);
        let table = self.chunks.as_slice();
        if pos <= self.len / 2 {
            let mut i = 0;
            let mut rem = pos;
            while rem > table[i].len() {
                rem -= table[i].len();
                i += 1;
            }
            (i, rem)
        } else {
            let mut i = table.len() - 1;
            let mut rem = self.len - pos;
            while i != 0 && rem >= table[i].len() {
                rem -= table[i].len();
                i -= 1;
            }
            (i, table[i].len() - rem)
        }
    }

    /// `index` must be at most `self.len`.
    fn insert_unchecked(&mut self, index: usize, value: T) {
        let (chunk, offset) = self.locate_allow_end(index);
        self.chunks.as_mut_slice()[chunk].insert(offset, value);
        self.len += 1;
        if self.should_split(self.chunks.as_slice()[chunk].len()) {
            self.split_chunk(chunk);
        }
        self.maybe_sweep();
    }

    /// `index` must be below `self.len`.
    fn remove_unchecked(&mut self, index: usize) -> T {
        let (chunk, offset) = self.locate(index);
        let value = self.chunks.as_mut_slice()[chunk].remove(offset);
        self.len -= 1;
        if self.chunks.as_slice()[chunk].is_empty() && self.chunks.len() > 1 {
            self.chunks.remove(chunk);
        } else if chunk + 1 < self.chunks.len() {
            let combined =
                self.chunks.as_slice()[chunk].len() + self.chunks.as_slice()[chunk + 1].len();
            if self.should_merge(combined) {
                self.merge_chunks(chunk);
            }
        }
        self.maybe_sweep();
        value
    }

    fn should_split(&self, chunk_len: usize) -> bool {
        chunk_len >= SPLIT_MIN_LEN
            && chunk_len.saturating_mul(chunk_len) > self.len.saturating_mul(8)
    }

    fn should_merge(&self, combined: usize) -> bool {
        combined.saturating_mul(combined).saturating_mul(64) <= self.len
    }

    /// Splits the chunk at `index` at its midpoint. The new chunk enters
    /// the table at `index` and takes the first half; the original keeps
    /// the second half.
    fn split_chunk(&mut self, index: usize) {
        let full = self.chunks.as_slice()[index].len();
        let half = full / 2;
        self.chunks.insert(index, Chunk::with_capacity(fit(full)));
        let (head, tail) = self.chunks.as_mut_slice().split_at_mut(index + 1);
        let fresh = &mut head[index];
        let old = &mut tail[0];
        // SAFETY: the fresh chunk has room for `half` values; after the
        // relocation the moved-out slots of `old` are raw storage again and
        // its survivors are shifted over them
        unsafe {
            ptr::copy_nonoverlapping(old.as_ptr(), fresh.as_mut_ptr(), half);
            fresh.set_len(half);
            ptr::copy(old.as_ptr().add(half), old.as_mut_ptr(), full - half);
            old.set_len(full - half);
        }
    }

    /// Merges the chunk at `index + 1` into the chunk at `index` and
    /// removes it from the table, releasing its storage.
    fn merge_chunks(&mut self, index: usize) {
        let (head, tail) = self.chunks.as_mut_slice().split_at_mut(index + 1);
        let left = &mut head[index];
        let right = &mut tail[0];
        let (left_len, right_len) = (left.len(), right.len());
        left.reserve_total(fit(left_len + right_len));
        // SAFETY: the left chunk now has room for both live prefixes; the
        // right chunk's slots become raw storage once its length is zeroed
        unsafe {
            ptr::copy_nonoverlapping(right.as_ptr(), left.as_mut_ptr().add(left_len), right_len);
            left.set_len(left_len + right_len);
            right.set_len(0);
        }
        self.chunks.remove(index + 1);
    }

    fn maybe_sweep(&mut self) {
        if self.sweep_rng.next_u32() < SWEEP_PROBE_THRESHOLD {
            self.rebalance();
        }
    }

    #[cfg(test)]
    pub(crate) fn chunk_lens(&self) -> Vec<usize> {
        self.chunks.as_slice().iter().map(Chunk::len).collect()
    }
}

impl<T: Clone> Clone for SqrtDeque<T> {
    /// Deep-copies every element into fresh chunks of the same shape.
    fn clone(&self) -> Self {
        Self { chunks: self.chunks.clone(), len: self.len, sweep_rng: SmallRng::from_entropy() }
    }
}

impl<T: fmt::Debug> fmt::Debug for SqrtDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T> Default for SqrtDeque<T> {
    /// Creates an empty deque.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for SqrtDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for SqrtDeque<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> From<Vec<T>> for SqrtDeque<T> {
    /// Moves the vector's elements into a fresh deque, front to back.
    fn from(other: Vec<T>) -> Self {
        let mut deque = Self::new();
        deque.extend(other);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for SqrtDeque<T> {
    fn from(arr: [T; N]) -> Self {
        let mut deque = Self::new();
        deque.extend(arr);
        deque
    }
}

impl<T> FromIterator<T> for SqrtDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

impl<T: Hash> Hash for SqrtDeque<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        self.iter().for_each(|elem| elem.hash(state));
    }
}

impl<T> Index<usize> for SqrtDeque<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        self.get(index).unwrap_or_else(|| index_out_of_bounds(self.len(), index))
    }
}

impl<T> IndexMut<usize> for SqrtDeque<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        self.get_mut(index).unwrap_or_else(|| index_out_of_bounds(len, index))
    }
}

impl<T> IntoIterator for SqrtDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the deque into a front-to-back iterator yielding elements
    /// by value.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a SqrtDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SqrtDeque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T: PartialOrd> PartialOrd for SqrtDeque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for SqrtDeque<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: PartialEq> PartialEq for SqrtDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SqrtDeque<T> {}

__impl_slice_eq! { [] SqrtDeque<T>, Vec<U>, }
__impl_slice_eq! { [] SqrtDeque<T>, &[U], }
__impl_slice_eq! { [] SqrtDeque<T>, &mut [U], }
__impl_slice_eq! { [const N: usize] SqrtDeque<T>, [U; N], }
__impl_slice_eq! { [const N: usize] SqrtDeque<T>, &[U; N], }
__impl_slice_eq! { [const N: usize] SqrtDeque<T>, &mut [U; N], }

fn index_out_of_bounds(len: usize, index: usize) -> ! {
    panic!("index out of bounds: the len is {} but the index is {}", len, index);
}

fn simplify_range(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
    // we later check for start > end so ignore here if start > len
    let start = match range.start_bound() {
        Bound::Unbounded => 0,
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => {
            i.checked_add(1).expect("range start Bound::Excluded(usize::MAX) is > usize::MAX")
        }
    };
    let end = match range.end_bound() {
        Bound::Unbounded => len,
        Bound::Excluded(&i) if i <= len => i,
        Bound::Included(&i) if i < len => i + 1,
        bound => panic!("range end {:?} should be <= length {}", bound, len),
    };
    if start > end {
        panic!(
            "range start {:?} should be <= range end {:?}",
            range.start_bound(),
            range.end_bound()
        );
    }
    start..end
}
