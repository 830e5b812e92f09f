use std::alloc::{self, handle_alloc_error, Layout};
use std::mem;
use std::ptr::NonNull;

/// Uninitialized, aligned storage for `cap` values of `T`.
///
/// This is purely an allocation handle: it never reads or drops the values
/// stored in it. Tracking which slots are live is the caller's job. For
/// zero-sized types no memory is ever allocated; the capacity is kept as
/// plain bookkeeping so callers can treat all types uniformly.
pub(crate) struct RawVec<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> RawVec<T> {
    /// Allocates storage for exactly `cap` values.
    pub fn with_capacity(cap: usize) -> Self {
        if mem::size_of::<T>() == 0 || cap == 0 {
            return Self { ptr: NonNull::dangling(), cap };
        }
        let layout = Self::layout(cap);
        // SAFETY: the layout has non-zero size
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr.cast()) else {
            handle_alloc_error(layout);
        };
        Self { ptr, cap }
    }

    #[inline]
    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Moves the storage to a new allocation of `new_cap` slots. Slots below
    /// `min(cap, new_cap)` keep their bytes; everything above is
    /// uninitialized. Used for both growing and the proportional shrink.
    pub fn realloc_to(&mut self, new_cap: usize) {
        if mem::size_of::<T>() == 0 || new_cap == self.cap {
            self.cap = new_cap;
            return;
        }
        if self.cap == 0 {
            *self = Self::with_capacity(new_cap);
            return;
        }
        let new_layout = Self::layout(new_cap);
        // SAFETY: the current allocation was made with layout(self.cap) and
        // the new size has been validated by layout()
        let ptr = unsafe {
            alloc::realloc(self.ptr.as_ptr().cast(), Self::layout(self.cap), new_layout.size())
        };
        let Some(ptr) = NonNull::new(ptr.cast()) else {
            handle_alloc_error(new_layout);
        };
        self.ptr = ptr;
        self.cap = new_cap;
    }

    fn layout(cap: usize) -> Layout {
        let layout = Layout::array::<T>(cap).expect("capacity overflow");
        assert!(layout.size() <= isize::MAX as usize, "capacity overflow");
        layout
    }
}

impl<T> Drop for RawVec<T> {
    fn drop(&mut self) {
        if mem::size_of::<T>() != 0 && self.cap != 0 {
            // SAFETY: the allocation was made with this layout and has not
            // been freed yet
            unsafe {
                alloc::dealloc(self.ptr.as_ptr().cast(), Self::layout(self.cap));
            }
        }
    }
}

// A RawVec is an owning handle, so it inherits the element type's thread
// affinity the same way Vec<T> does.
unsafe impl<T: Send> Send for RawVec<T> {}
unsafe impl<T: Sync> Sync for RawVec<T> {}
