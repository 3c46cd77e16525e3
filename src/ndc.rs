//! Nested diagnostic context: a per-thread stack of strings used to tag log
//! lines with request or task metadata (`%z`, `%y`, `%x`).

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static STACK: RefCell<NdcStack> = RefCell::new(NdcStack {
        frames: Vec::new(),
        max_depth: None,
    });
}

struct NdcStack {
    frames: Vec<String>,
    max_depth: Option<usize>,
}

impl NdcStack {
    fn truncate_to_max(&mut self) {
        if let Some(max) = self.max_depth {
            self.frames.truncate(max);
        }
    }
}

/// Push a frame onto the current thread's stack.
///
/// The frame is dropped when the stack already holds `max_depth` frames.
pub fn push(frame: impl Into<String>) {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.max_depth.map_or(true, |max| stack.frames.len() < max) {
            stack.frames.push(frame.into());
        }
    })
}

/// Remove and return the top frame.
pub fn pop() -> Option<String> {
    STACK.with(|stack| stack.borrow_mut().frames.pop())
}

/// Top frame without removing it.
pub fn peek() -> Option<String> {
    STACK.with(|stack| stack.borrow().frames.last().cloned())
}

pub fn depth() -> usize {
    STACK.with(|stack| stack.borrow().frames.len())
}

pub fn clear() {
    STACK.with(|stack| stack.borrow_mut().frames.clear())
}

/// Limit the stack to `max` frames, discarding any frames above it.
/// `None` removes the limit.
pub fn set_max_depth(max: Option<usize>) {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.max_depth = max;
        stack.truncate_to_max();
    })
}

/// Copy of the current thread's frames, bottom first.
pub fn clone_stack() -> Vec<String> {
    STACK.with(|stack| stack.borrow().frames.clone())
}

/// Replace the current thread's frames, typically with a
/// [`clone_stack`] taken on the parent thread before spawning.
pub fn inherit(frames: Vec<String>) {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.frames = frames;
        stack.truncate_to_max();
    })
}

/// Run `f` with read access to the current thread's frames.
pub(crate) fn with_frames<R>(f: impl FnOnce(&[String]) -> R) -> R {
    STACK.with(|stack| f(&stack.borrow().frames))
}

/// Guard returned by [`enter`]; pops its frame when dropped.
///
/// The guard is tied to the thread whose stack it truncates and cannot be
/// sent elsewhere:
///
/// ```compile_fail
/// fn assert_send<T: Send>(_: T) {}
/// assert_send(tracing_log_pattern::ndc::enter("frame"));
/// ```
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct NdcGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

/// Push `frame` and return a guard that restores the previous depth on drop.
///
/// Guards must be dropped in reverse order of creation. Dropping an outer
/// guard first truncates the stack to its depth, removing the frames of any
/// inner guards still alive.
pub fn enter(frame: impl Into<String>) -> NdcGuard {
    let depth = depth();
    push(frame);
    NdcGuard {
        depth,
        _not_send: PhantomData,
    }
}

impl Drop for NdcGuard {
    fn drop(&mut self) {
        STACK.with(|stack| stack.borrow_mut().frames.truncate(self.depth));
    }
}
