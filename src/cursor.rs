use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr::{self, NonNull};

use crate::error::{DequeError, Result};
use crate::SqrtDeque;

/// A positional cursor over a [`SqrtDeque`].
///
/// A cursor addresses a *logical position* in `[0, len]`, not a storage
/// location: the deque may split, merge and relocate chunks without ever
/// invalidating a cursor, and an insertion in front of a cursor shifts
/// which element the cursor sees. The position `len` is the end position;
/// moving there is fine, dereferencing there is not.
///
/// A cursor created with [`Cursor::default`] is *detached*: it addresses no
/// container and every dereference or motion fails with
/// [`DequeError::InvalidCursor`].
///
/// The element reference obtained by [`get`] is cached until the cursor
/// moves, so repeated dereferences at one position cost a single lookup.
///
/// [`get`]: Cursor::get
///
/// # Examples
///
/// ```
/// # use sqrtdeque::SqrtDeque;
/// let deque = SqrtDeque::from([1, 2, 3]);
/// let mut cursor = deque.cursor_begin();
/// assert_eq!(cursor.get(), Ok(&1));
/// cursor.advance().unwrap();
/// assert_eq!(cursor.get(), Ok(&2));
/// ```
pub struct Cursor<'a, T> {
    deque: Option<&'a SqrtDeque<T>>,
    pos: usize,
    cached: Cell<Option<&'a T>>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(deque: &'a SqrtDeque<T>, pos: usize) -> Self {
        debug_assert!(pos <= deque.len());
        Self { deque: Some(deque), pos, cached: Cell::new(None) }
    }

    /// Returns the logical position the cursor addresses.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` if the cursor addresses no container.
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.deque.is_none()
    }

    /// Returns a reference to the element at the cursor.
    ///
    /// # Errors
    ///
    /// [`DequeError::InvalidCursor`] on a detached cursor and
    /// [`DequeError::IndexOutOfBounds`] at the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// assert_eq!(deque.cursor_begin().get(), Ok(&1));
    /// assert!(deque.cursor_end().get().is_err());
    /// ```
    pub fn get(&self) -> Result<&'a T> {
        if let Some(cached) = self.cached.get() {
            return Ok(cached);
        }
        let deque = self.deque.ok_or(DequeError::InvalidCursor)?;
        let element = deque.at(self.pos)?;
        self.cached.set(Some(element));
        Ok(element)
    }

    /// Moves the cursor to the absolute position `pos`.
    ///
    /// # Errors
    ///
    /// [`DequeError::InvalidCursor`] on a detached cursor,
    /// [`DequeError::IndexOutOfBounds`] if `pos` is past the end position.
    pub fn seek_to(&mut self, pos: usize) -> Result<()> {
        let deque = self.deque.ok_or(DequeError::InvalidCursor)?;
        if pos > deque.len() {
            return Err(DequeError::IndexOutOfBounds { index: pos, len: deque.len() });
        }
        self.pos = pos;
        self.cached.set(None);
        Ok(())
    }

    /// Moves the cursor by `delta` positions, backwards for negative
    /// values. The end position is a valid target.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// let mut cursor = deque.cursor_end();
    /// cursor.seek_by(-3).unwrap();
    /// assert_eq!(cursor.get(), Ok(&1));
    /// assert!(cursor.seek_by(-1).is_err());
    /// ```
    pub fn seek_by(&mut self, delta: isize) -> Result<()> {
        let deque = self.deque.ok_or(DequeError::InvalidCursor)?;
        let pos = self.pos.checked_add_signed(delta).unwrap_or(usize::MAX);
        if pos > deque.len() {
            return Err(DequeError::IndexOutOfBounds { index: pos, len: deque.len() });
        }
        self.pos = pos;
        self.cached.set(None);
        Ok(())
    }

    /// Moves the cursor one position towards the back.
    #[inline]
    pub fn advance(&mut self) -> Result<()> {
        self.seek_by(1)
    }

    /// Moves the cursor one position towards the front.
    #[inline]
    pub fn retreat(&mut self) -> Result<()> {
        self.seek_by(-1)
    }

    /// Returns a new cursor `delta` positions away.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// let cursor = deque.cursor_begin().offset(2).unwrap();
    /// assert_eq!(cursor.get(), Ok(&3));
    /// ```
    pub fn offset(mut self, delta: isize) -> Result<Self> {
        self.seek_by(delta)?;
        Ok(self)
    }

    /// Returns the signed distance from `origin` to `self`.
    ///
    /// # Errors
    ///
    /// [`DequeError::InvalidCursor`] if either cursor is detached or the two
    /// cursors belong to different containers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let deque = SqrtDeque::from([1, 2, 3]);
    /// let begin = deque.cursor_begin();
    /// let end = deque.cursor_end();
    /// assert_eq!(end.offset_from(&begin), Ok(3));
    /// ```
    pub fn offset_from(&self, origin: &Self) -> Result<isize> {
        let a = self.deque.ok_or(DequeError::InvalidCursor)?;
        let b = origin.deque.ok_or(DequeError::InvalidCursor)?;
        if !ptr::eq(a, b) {
            return Err(DequeError::InvalidCursor);
        }
        Ok(self.pos as isize - origin.pos as isize)
    }

    fn owner_ptr(&self) -> *const SqrtDeque<T> {
        match self.deque {
            Some(deque) => deque as *const SqrtDeque<T>,
            None => ptr::null(),
        }
    }
}

impl<T> Default for Cursor<'_, T> {
    /// Creates a detached cursor.
    fn default() -> Self {
        Self { deque: None, pos: 0, cached: Cell::new(None) }
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        Self { deque: self.deque, pos: self.pos, cached: self.cached.clone() }
    }
}

/// Cursors are equal when they address the same position of the same
/// container. All detached cursors compare equal.
impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.owner_ptr(), other.owner_ptr()) && self.pos == other.pos
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("detached", &self.is_detached())
            .finish()
    }
}

impl<'a, T> Add<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    /// Returns a cursor `delta` positions towards the back.
    ///
    /// # Panics
    ///
    /// Panics when the motion leaves `[0, len]` or the cursor is detached;
    /// use [`Cursor::offset`] for a fallible version.
    fn add(self, delta: isize) -> Cursor<'a, T> {
        self.offset(delta).unwrap_or_else(|err| panic!("cursor motion failed: {err}"))
    }
}

impl<'a, T> Sub<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    /// Returns a cursor `delta` positions towards the front.
    ///
    /// # Panics
    ///
    /// Panics when the motion leaves `[0, len]` or the cursor is detached.
    fn sub(self, delta: isize) -> Cursor<'a, T> {
        let back = delta.checked_neg().unwrap_or_else(|| panic!("cursor motion failed"));
        self.offset(back).unwrap_or_else(|err| panic!("cursor motion failed: {err}"))
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    /// # Panics
    ///
    /// Panics when the motion leaves `[0, len]` or the cursor is detached.
    fn add_assign(&mut self, delta: isize) {
        if let Err(err) = self.seek_by(delta) {
            panic!("cursor motion failed: {err}");
        }
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    /// # Panics
    ///
    /// Panics when the motion leaves `[0, len]` or the cursor is detached.
    fn sub_assign(&mut self, delta: isize) {
        let back = delta.checked_neg().unwrap_or_else(|| panic!("cursor motion failed"));
        if let Err(err) = self.seek_by(back) {
            panic!("cursor motion failed: {err}");
        }
    }
}

impl<'s, 'a, T> Sub<&'s Cursor<'a, T>> for &'s Cursor<'a, T> {
    type Output = isize;

    /// Returns the signed distance between two cursors.
    ///
    /// # Panics
    ///
    /// Panics when the cursors belong to different containers or either is
    /// detached; use [`Cursor::offset_from`] for a fallible version.
    fn sub(self, origin: &'s Cursor<'a, T>) -> isize {
        self.offset_from(origin).unwrap_or_else(|err| panic!("cursor difference failed: {err}"))
    }
}

/// A positional cursor that can edit the [`SqrtDeque`] it addresses.
///
/// The mutable cursor holds the exclusive borrow of its deque, so it stays
/// valid across its own edits; positions follow the same logical-index
/// rules as [`Cursor`]. It converts into a (shared) [`Cursor`] via `From`.
///
/// # Examples
///
/// ```
/// # use sqrtdeque::SqrtDeque;
/// let mut deque = SqrtDeque::from([1, 3]);
/// let mut cursor = deque.cursor_at_mut(1).unwrap();
/// cursor.insert(2).unwrap();
/// assert_eq!(cursor.get(), Ok(&2));
/// assert_eq!(deque, [1, 2, 3]);
/// ```
pub struct CursorMut<'a, T> {
    deque: Option<NonNull<SqrtDeque<T>>>,
    pos: usize,
    marker: PhantomData<&'a mut SqrtDeque<T>>,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(deque: &'a mut SqrtDeque<T>, pos: usize) -> Self {
        debug_assert!(pos <= deque.len());
        Self { deque: Some(NonNull::from(deque)), pos, marker: PhantomData }
    }

    /// Returns the logical position the cursor addresses.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` if the cursor addresses no container.
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.deque.is_none()
    }

    fn deque(&self) -> Result<&SqrtDeque<T>> {
        // SAFETY: the cursor was handed the exclusive borrow for 'a when it
        // was created, and &self keeps this reborrow shared
        self.deque.map(|ptr| unsafe { &*ptr.as_ptr() }).ok_or(DequeError::InvalidCursor)
    }

    fn deque_mut(&mut self) -> Result<&mut SqrtDeque<T>> {
        // SAFETY: as above, and &mut self makes this reborrow unique
        self.deque.map(|ptr| unsafe { &mut *ptr.as_ptr() }).ok_or(DequeError::InvalidCursor)
    }

    /// Returns a reference to the element at the cursor.
    ///
    /// # Errors
    ///
    /// [`DequeError::InvalidCursor`] on a detached cursor and
    /// [`DequeError::IndexOutOfBounds`] at the end position.
    pub fn get(&self) -> Result<&T> {
        let pos = self.pos;
        self.deque()?.at(pos)
    }

    /// Returns a mutable reference to the element at the cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// let mut cursor = deque.cursor_at_mut(1).unwrap();
    /// *cursor.get_mut().unwrap() += 40;
    /// assert_eq!(deque, [1, 42, 3]);
    /// ```
    pub fn get_mut(&mut self) -> Result<&mut T> {
        let pos = self.pos;
        self.deque_mut()?.at_mut(pos)
    }

    /// Moves the cursor to the absolute position `pos`.
    pub fn seek_to(&mut self, pos: usize) -> Result<()> {
        let len = self.deque()?.len();
        if pos > len {
            return Err(DequeError::IndexOutOfBounds { index: pos, len });
        }
        self.pos = pos;
        Ok(())
    }

    /// Moves the cursor by `delta` positions, backwards for negative
    /// values. The end position is a valid target.
    pub fn seek_by(&mut self, delta: isize) -> Result<()> {
        let len = self.deque()?.len();
        let pos = self.pos.checked_add_signed(delta).unwrap_or(usize::MAX);
        if pos > len {
            return Err(DequeError::IndexOutOfBounds { index: pos, len });
        }
        self.pos = pos;
        Ok(())
    }

    /// Moves the cursor one position towards the back.
    #[inline]
    pub fn advance(&mut self) -> Result<()> {
        self.seek_by(1)
    }

    /// Moves the cursor one position towards the front.
    #[inline]
    pub fn retreat(&mut self) -> Result<()> {
        self.seek_by(-1)
    }

    /// Inserts `value` in front of the cursor. The cursor ends up on the
    /// inserted element; everything from the old position on shifts one
    /// position towards the back.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 3]);
    /// let mut cursor = deque.cursor_end_mut();
    /// cursor.insert(9).unwrap();
    /// assert_eq!(cursor.get(), Ok(&9));
    /// assert_eq!(deque, [1, 3, 9]);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<()> {
        let pos = self.pos;
        self.deque_mut()?.insert_at(pos, value)
    }

    /// Removes the element at the cursor and returns it. The cursor ends up
    /// on the successor of the removed element, or at the end position if
    /// the back element was removed.
    ///
    /// # Errors
    ///
    /// [`DequeError::IndexOutOfBounds`] at the end position,
    /// [`DequeError::InvalidCursor`] on a detached cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqrtdeque::SqrtDeque;
    /// let mut deque = SqrtDeque::from([1, 2, 3]);
    /// let mut cursor = deque.cursor_at_mut(1).unwrap();
    /// assert_eq!(cursor.remove(), Ok(2));
    /// assert_eq!(cursor.get(), Ok(&3));
    /// assert_eq!(deque, [1, 3]);
    /// ```
    pub fn remove(&mut self) -> Result<T> {
        let pos = self.pos;
        self.deque_mut()?.remove_at(pos)
    }
}

impl<T> Default for CursorMut<'_, T> {
    /// Creates a detached cursor.
    fn default() -> Self {
        Self { deque: None, pos: 0, marker: PhantomData }
    }
}

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
    /// Downgrades a mutable cursor to a shared one at the same position.
    fn from(cursor: CursorMut<'a, T>) -> Self {
        match cursor.deque {
            // SAFETY: consuming the mutable cursor turns its exclusive
            // borrow for 'a into this shared one
            Some(ptr) => Cursor::new(unsafe { &*ptr.as_ptr() }, cursor.pos),
            None => Cursor::default(),
        }
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("pos", &self.pos)
            .field("detached", &self.is_detached())
            .finish()
    }
}

// A CursorMut behaves like the &mut SqrtDeque<T> it was created from.
unsafe impl<T: Send> Send for CursorMut<'_, T> {}
unsafe impl<T: Sync> Sync for CursorMut<'_, T> {}
