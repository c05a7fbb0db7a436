//! # Tree Visitor Module / 树访问者模块
//!
//! A closed, two-method visitor over [`TestTree`]. There are exactly two node
//! kinds, so visitors implement one callback per kind instead of matching on
//! the node themselves.
//!
//! 针对 [`TestTree`] 的封闭式双方法访问者。节点只有两种类型，
//! 因此访问者为每种类型实现一个回调，而不是自行匹配节点。

use crate::core::tree::{NodeId, TestNode, TestTree};

/// What the walker does after a callback returns.
/// 回调返回后遍历器的行为。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Descend into the node's children / 进入该节点的子节点
    Continue,
    /// Do not visit the node's children / 不访问该节点的子节点
    SkipChildren,
}

pub trait TestTreeVisitor {
    fn visit_suite(&mut self, _id: NodeId, _suite: &TestNode) -> Walk {
        Walk::Continue
    }

    fn visit_test(&mut self, _id: NodeId, _test: &TestNode) -> Walk {
        Walk::Continue
    }
}

impl TestTree {
    /// Walks the subtree rooted at `from` in pre-order, children in insertion order.
    /// 以先序遍历以 `from` 为根的子树，子节点按插入顺序访问。
    pub fn walk<V: TestTreeVisitor + ?Sized>(&self, from: NodeId, visitor: &mut V) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            let next = if node.is_suite() {
                visitor.visit_suite(id, node)
            } else {
                visitor.visit_test(id, node)
            };
            if next == Walk::Continue {
                stack.extend(node.children().iter().rev().copied());
            }
        }
    }
}
