//! Lazy `[index, element]` iteration over arrays.
//!
//! [`ArrayEntries`] is an explicit cursor: one integer position advanced by
//! every call to [`ArrayEntries::step`]. It is single-pass; once it reports
//! [`IteratorStep::Done`] it stays done, and a fresh cursor must be created
//! through `ArrayPrototype::entries` to iterate again.

use core_types::{ArrayRef, FunctionRef, JsResult, Value};

/// Result of advancing an iterator.
#[derive(Debug, Clone, PartialEq)]
pub enum IteratorStep {
    /// The next `(index, element)` pair
    Yield(usize, Value),
    /// The iterator is exhausted
    Done,
}

impl IteratorStep {
    /// Returns true for [`IteratorStep::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, IteratorStep::Done)
    }
}

/// Cursor over the entries of an array.
///
/// The length is captured when the cursor is created. Holes are not
/// skipped: they yield `undefined`, which is then passed through the
/// optional transform like any other element.
///
/// # Examples
///
/// ```
/// use builtins::{ArrayPrototype, IteratorStep};
/// use core_types::Value;
///
/// let arr = Value::array(vec![Value::string("a"), Value::string("b")]);
/// let mut entries = ArrayPrototype::entries(&arr, None).unwrap();
///
/// assert_eq!(entries.step().unwrap(), IteratorStep::Yield(0, Value::string("a")));
/// assert_eq!(entries.step().unwrap(), IteratorStep::Yield(1, Value::string("b")));
/// assert!(entries.step().unwrap().is_done());
/// ```
#[derive(Debug, Clone)]
pub struct ArrayEntries {
    array: ArrayRef,
    len: usize,
    index: usize,
    transform: Option<FunctionRef>,
}

impl ArrayEntries {
    pub(crate) fn new(array: ArrayRef, transform: Option<FunctionRef>) -> Self {
        let len = array.borrow().len();
        Self {
            array,
            len,
            index: 0,
            transform,
        }
    }

    /// Advances the cursor by one entry.
    ///
    /// The cursor moves past the entry before the transform runs, so a
    /// failing transform does not make the same entry come back.
    pub fn step(&mut self) -> JsResult<IteratorStep> {
        if self.index >= self.len {
            return Ok(IteratorStep::Done);
        }

        let index = self.index;
        self.index += 1;

        let element = self.array.borrow().get(index).unwrap_or(Value::Undefined);
        let element = match &self.transform {
            Some(transform) => transform.call(vec![element])?,
            None => element,
        };

        Ok(IteratorStep::Yield(index, element))
    }

    /// Number of entries not yet produced.
    pub fn remaining(&self) -> usize {
        self.len - self.index
    }
}

impl Iterator for ArrayEntries {
    type Item = JsResult<(usize, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(IteratorStep::Yield(index, element)) => Some(Ok((index, element))),
            Ok(IteratorStep::Done) => None,
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
