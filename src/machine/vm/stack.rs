/// Maximum operand stack depth in words.
pub(super) const STACK_CAPACITY: usize = 32768;

/// Bounded LIFO operand stack.
///
/// Capacity checks live here; the VM maps a failed push or pop to the
/// matching fault with the faulting instruction's address attached.
pub(super) struct Stack {
    items: Vec<u16>,
}

impl Stack {
    pub(super) fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Pushes a word, returning `false` when the stack is at capacity.
    #[must_use]
    pub(super) fn push(&mut self, value: u16) -> bool {
        if self.items.len() >= STACK_CAPACITY {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Pops the most recently pushed word, `None` when empty.
    pub(super) fn pop(&mut self) -> Option<u16> {
        self.items.pop()
    }

    pub(super) fn depth(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order() {
        let mut stack = Stack::new();
        assert!(stack.push(1));
        assert!(stack.push(2));
        assert!(stack.push(3));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn push_fails_at_capacity() {
        let mut stack = Stack::new();
        for i in 0..STACK_CAPACITY {
            assert!(stack.push(i as u16));
        }
        assert_eq!(stack.depth(), STACK_CAPACITY);
        assert!(!stack.push(0));
        assert_eq!(stack.depth(), STACK_CAPACITY);
    }
}
