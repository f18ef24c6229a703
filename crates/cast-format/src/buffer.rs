//! Lazy typed views over property values.

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use crate::Value;

/// A read-only, restartable view of a property's values as `T`.
///
/// Nothing is copied until the values are iterated. A buffer is only handed out
/// when the property's type matches `T`, so every element projects successfully.
pub struct Buffer<'a, T> {
    values: &'a [Value],
    project: fn(&Value) -> Option<T>,
}

impl<'a, T> Buffer<'a, T> {
    pub(crate) fn new(values: &'a [Value], project: fn(&Value) -> Option<T>) -> Option<Self> {
        match values.first() {
            Some(first) if project(first).is_none() => None,
            _ => Some(Self { values, project }),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).and_then(self.project)
    }

    /// Iterate over the elements from the start.
    pub fn iter(&self) -> BufferIter<'a, T> {
        BufferIter {
            values: self.values.iter(),
            project: self.project,
        }
    }

    /// Collect the elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Get the underlying values.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl<T> Clone for Buffer<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Buffer<'_, T> {}

impl<T> fmt::Debug for Buffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer").field("len", &self.len()).finish()
    }
}

impl<'a, T> IntoIterator for Buffer<'a, T> {
    type Item = T;
    type IntoIter = BufferIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &Buffer<'a, T> {
    type Item = T;
    type IntoIter = BufferIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Buffer`].
pub struct BufferIter<'a, T> {
    values: slice::Iter<'a, Value>,
    project: fn(&Value) -> Option<T>,
}

impl<T> Iterator for BufferIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.values.next().and_then(self.project)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> DoubleEndedIterator for BufferIter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        self.values.next_back().and_then(self.project)
    }
}

impl<T> ExactSizeIterator for BufferIter<'_, T> {}

impl<T> FusedIterator for BufferIter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restartable() {
        let values = [Value::from(1u32), Value::from(2u32), Value::from(3u32)];
        let buffer = Buffer::new(&values, Value::as_u32).unwrap();

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.to_vec(), [1, 2, 3]);
        assert_eq!(buffer.iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
        assert_eq!(buffer.iter().sum::<u32>(), 6);
        assert_eq!(buffer.get(1), Some(2));
        assert_eq!(buffer.get(3), None);
    }

    #[test]
    fn test_type_mismatch_yields_none() {
        let values = [Value::from(1.0f32)];
        assert!(Buffer::new(&values, Value::as_vec3).is_none());
    }

    #[test]
    fn test_empty() {
        let buffer = Buffer::new(&[], Value::as_vec3).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.iter().next(), None);
    }
}
