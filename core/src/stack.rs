//! Persistent stack
//!
//! An immutable singly linked list with O(1) push/pop. Pushing or popping
//! returns a new stack that shares its tail with the old one, so keeping an
//! old stack around (e.g. a machine snapshot taken at a pause point) costs
//! nothing beyond the reference count.

use std::fmt;
use std::rc::Rc;

struct Cell<T> {
    head: T,
    tail: Stack<T>,
}

/// Immutable, structurally shared stack
pub struct Stack<T> {
    top: Option<Rc<Cell<T>>>,
    len: usize,
}

impl<T> Stack<T> {
    /// The empty stack
    pub fn new() -> Self {
        Stack { top: None, len: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Return a new stack with `value` on top
    pub fn push(&self, value: T) -> Self {
        Stack {
            top: Some(Rc::new(Cell {
                head: value,
                tail: self.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Top element, if any
    pub fn peek(&self) -> Option<&T> {
        self.top.as_ref().map(|cell| &cell.head)
    }

    /// Split into the top element and the rest of the stack
    pub fn pop(&self) -> Option<(&T, Stack<T>)> {
        self.top.as_ref().map(|cell| (&cell.head, cell.tail.clone()))
    }

    /// Iterate from the top down
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.top.as_deref(),
        }
    }

    /// Whether two stacks share the same top cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.top, &other.top) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Clone> Stack<T> {
    /// Build a stack whose top is the first element of `items`
    pub fn from_ordered<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Stack::new(), |stack, item| stack.push(item))
    }

    /// Elements bottom-first, i.e. in the order they were pushed
    pub fn to_pushed_order(&self) -> Vec<T> {
        let mut items: Vec<T> = self.iter().cloned().collect();
        items.reverse();
        items
    }
}

impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Stack {
            top: self.top.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Stack::new()
    }
}

impl<T> Drop for Stack<T> {
    // Unlink iteratively so dropping a long uniquely-owned stack does not recurse.
    fn drop(&mut self) {
        let mut next = self.top.take();
        while let Some(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(mut cell) => next = cell.tail.top.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Cell<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|cell| {
            self.next = cell.tail.top.as_deref();
            &cell.head
        })
    }
}
