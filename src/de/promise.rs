//! Deferred-resolution handle for forward alias references.

use std::cell::RefCell;
use std::rc::Rc;

use super::error::DeError;

type Writer<T> = Box<dyn FnOnce(&T) -> Result<(), DeError>>;

/// A single-assignment cell holding "a value that will exist before the
/// current document finishes parsing".
///
/// Writers subscribed before resolution run synchronously, in
/// subscription order, when [`Promise::resolve`] fires; a writer
/// subscribed after resolution runs immediately. Resolution happens
/// exactly once; a second `resolve` is an error.
pub struct Promise<T> {
    inner: Rc<RefCell<State<T>>>,
}

struct State<T> {
    value: Option<T>,
    writers: Vec<Writer<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Promise<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(State {
                value: None,
                writers: Vec::new(),
            })),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Register a writer to run against the resolved value.
    pub fn subscribe<F>(&self, writer: F) -> Result<(), DeError>
    where
        F: FnOnce(&T) -> Result<(), DeError> + 'static,
    {
        {
            let mut state = self.inner.borrow_mut();
            if state.value.is_none() {
                state.writers.push(Box::new(writer));
                return Ok(());
            }
        }
        let state = self.inner.borrow();
        match &state.value {
            Some(value) => writer(value),
            None => Ok(()),
        }
    }

    /// Assign the value and run every pending writer.
    pub fn resolve(&self, value: T) -> Result<(), DeError> {
        let writers = {
            let mut state = self.inner.borrow_mut();
            if state.value.is_some() {
                return Err(DeError::PromiseAlreadyResolved);
            }
            state.value = Some(value);
            std::mem::take(&mut state.writers)
        };

        let state = self.inner.borrow();
        let Some(value) = &state.value else {
            return Ok(());
        };
        for writer in writers {
            writer(value)?;
        }
        Ok(())
    }
}
