use std::{hash::Hash, mem::MaybeUninit, ops::Deref};

/// Inline vector with a fixed capacity, used for move sequences (at most 4
/// moves) and expanded dice (at most 4 values) so neither allocates.
#[derive(Clone, Copy)]
pub struct TinyVec<T, const N: usize>
where
    T: Copy,
{
    buf: [MaybeUninit<T>; N],
    len: u8,
}

impl<T, const N: usize> TinyVec<T, N>
where
    T: Copy,
{
    pub const fn new() -> Self {
        const { assert!(N <= 255, "TinyVec supports up to 255 elements") }
        TinyVec { buf: [const { MaybeUninit::uninit() }; N], len: 0 }
    }

    pub fn from_slice(items: &[T]) -> Self {
        let mut vec = Self::new();
        for &item in items {
            vec.push(item);
        }
        vec
    }

    pub fn push(&mut self, val: T) {
        assert!((self.len as usize) < N, "TinyVec capacity {N} exceeded");
        self.buf[self.len as usize].write(val);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: previously pushed, so initialized
        Some(unsafe { self.buf[self.len as usize].assume_init_read() })
    }

    /// Removes the element at `idx`, shifting the tail left.
    pub fn remove(&mut self, idx: usize) -> T {
        assert!(idx < self.len as usize, "index {idx} out of bounds");
        // SAFETY: idx < len, so the slot was initialized
        let removed = unsafe { self.buf[idx].assume_init_read() };
        self.buf.copy_within(idx + 1..self.len as usize, idx);
        self.len -= 1;
        removed
    }
}

impl<T: Copy, const N: usize> Default for TinyVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> Deref for TinyVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Only the first `self.len` elements are initialized
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr() as *const T, self.len as usize) }
    }
}

impl<T: Copy + PartialEq, const N: usize> PartialEq for TinyVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Copy + Eq, const N: usize> Eq for TinyVec<T, N> {}

impl<T: Copy + Hash, const N: usize> Hash for TinyVec<T, N> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Copy + std::fmt::Debug, const N: usize> std::fmt::Debug for TinyVec<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy, const N: usize> FromIterator<T> for TinyVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        for item in iter {
            vec.push(item);
        }
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_remove() {
        let mut v: TinyVec<u8, 4> = TinyVec::new();
        assert!(v.is_empty());
        v.push(6);
        v.push(2);
        v.push(6);
        assert_eq!(&*v, &[6, 2, 6]);
        assert_eq!(v.remove(0), 6);
        assert_eq!(&*v, &[2, 6]);
        assert_eq!(v.pop(), Some(6));
        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.pop(), None);
    }

    #[test]
    fn equality_ignores_uninitialized_tail() {
        let mut a: TinyVec<u8, 4> = TinyVec::from_slice(&[1, 2, 3]);
        a.pop();
        let b: TinyVec<u8, 4> = TinyVec::from_slice(&[1, 2]);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn overflow_panics() {
        let mut v: TinyVec<u8, 2> = TinyVec::new();
        v.push(1);
        v.push(2);
        v.push(3);
    }
}
