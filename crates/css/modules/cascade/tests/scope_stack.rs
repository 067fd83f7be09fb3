#![cfg(test)]

use css_cascade::{ScopeEntry, ScopeStack};

#[test]
fn guard_pops_exactly_what_its_depth_pushed() {
    let mut stack = ScopeStack::with_capacity(2);
    {
        let mut outer = stack.enter();
        outer.push(0);
        outer.push(3);
        {
            let mut inner = outer.enter();
            inner.push(7);
            assert_eq!(inner.depth(), 2);
            assert_eq!(
                inner.active(),
                [
                    ScopeEntry { depth: 1, rule: 0 },
                    ScopeEntry { depth: 1, rule: 3 },
                    ScopeEntry { depth: 2, rule: 7 },
                ]
            );
        }
        assert_eq!(outer.depth(), 1);
        assert_eq!(outer.len(), 2);
        {
            let sibling = outer.enter();
            assert_eq!(sibling.len(), 2);
        }
    }
    assert!(stack.is_balanced());
}

#[test]
fn stack_grows_past_its_initial_capacity() {
    fn descend(stack: &mut ScopeStack, remaining: usize) -> usize {
        let mut level = stack.enter();
        level.push(remaining);
        if remaining == 0 {
            return level.len();
        }
        descend(&mut level, remaining - 1)
    }
    let mut stack = ScopeStack::with_capacity(4);
    assert_eq!(descend(&mut stack, 99), 100);
    assert!(stack.is_balanced());
}

#[test]
fn guard_unwinds_on_early_return() {
    fn visit(stack: &mut ScopeStack, fail: bool) -> Result<(), String> {
        let mut level = stack.enter();
        level.push(1);
        if fail {
            return Err("node failed".to_owned());
        }
        Ok(())
    }
    let mut stack = ScopeStack::default();
    assert!(visit(&mut stack, true).is_err());
    assert!(stack.is_balanced());
    assert!(visit(&mut stack, false).is_ok());
    assert!(stack.is_balanced());
}
