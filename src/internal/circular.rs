//! Circular dependency detection infrastructure.

use std::any::TypeId;
use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Classes currently being built on this thread, outermost first.
thread_local! {
    static BUILD_STACK: RefCell<Vec<(TypeId, &'static str)>> = const { RefCell::new(Vec::new()) };
}

/// Guard marking a class as in progress until dropped.
///
/// Nested builds started from factories run on the same thread, so the stack
/// also catches cycles that pass through a factory-created child container.
pub(crate) struct StackGuard {
    id: TypeId,
}

impl StackGuard {
    /// Pushes `id` onto the build stack, or fails with the cycle path if it is
    /// already there.
    pub(crate) fn enter(id: TypeId, name: &'static str) -> DiResult<Self> {
        BUILD_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|(entry, _)| *entry == id) {
                let mut path: Vec<&'static str> = stack[start..].iter().map(|(_, n)| *n).collect();
                path.push(name);
                return Err(DiError::Circular(path));
            }
            stack.push((id, name));
            Ok(Self { id })
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        BUILD_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some((last, _)) = stack.pop() {
                debug_assert_eq!(last, self.id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn reentry_reports_path_from_first_occurrence() {
        let _outer = StackGuard::enter(TypeId::of::<B>(), "B").unwrap();
        let _a = StackGuard::enter(TypeId::of::<A>(), "A").unwrap();
        match StackGuard::enter(TypeId::of::<A>(), "A") {
            Err(DiError::Circular(path)) => assert_eq!(path, vec!["A", "A"]),
            _ => panic!("expected circular error"),
        }
    }

    #[test]
    fn guard_pops_on_drop() {
        {
            let _a = StackGuard::enter(TypeId::of::<A>(), "A").unwrap();
        }
        assert!(StackGuard::enter(TypeId::of::<A>(), "A").is_ok());
    }
}
