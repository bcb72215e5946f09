//! 可预读包装
//!
//! 在任意迭代器外层缓存至多一个元素：`peek()` 拉取并缓存，
//! 随后的 `next()` 直接返回缓存而不再拉取上游。

use std::iter::FusedIterator;

/// 支持 `peek` 的迭代器包装
///
/// 不用 `std::iter::Peekable`：它既不能在不拉取上游的情况下询问是否有缓存，
/// 也取不回内部的生成器。
#[derive(Debug)]
pub struct Peekable<I: Iterator> {
    inner: I,
    /// `Some(None)` 表示已经预读到结束
    cached: Option<Option<I::Item>>,
}

impl<I: Iterator> Peekable<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            cached: None,
        }
    }

    /// 查看下一个元素但不消费
    pub fn peek(&mut self) -> Option<&I::Item> {
        let inner = &mut self.inner;
        self.cached.get_or_insert_with(|| inner.next()).as_ref()
    }

    /// 是否已有缓存的元素
    pub fn has_cached(&self) -> bool {
        matches!(self.cached, Some(Some(_)))
    }

    /// 取回被包装的迭代器，缓存的元素会丢失
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: Iterator> Iterator for Peekable<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cached.take() {
            Some(cached) => cached,
            None => self.inner.next(),
        }
    }
}

impl<I: FusedIterator> FusedIterator for Peekable<I> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kit::generator::Generator;
    use std::cell::Cell;

    #[test]
    fn test_peek_twice_does_not_advance() {
        let pulled = Cell::new(0);
        let source = (0..5).inspect(|_| pulled.set(pulled.get() + 1));
        let mut iter = Peekable::new(source);

        assert_eq!(iter.peek(), Some(&0));
        assert_eq!(iter.peek(), Some(&0));
        assert_eq!(pulled.get(), 1);
        assert!(iter.has_cached());
    }

    #[test]
    fn test_next_returns_peeked_once() {
        let mut iter = Peekable::new(0..3);

        assert_eq!(iter.peek(), Some(&0));
        assert_eq!(iter.next(), Some(0));
        assert!(!iter.has_cached());
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.peek(), Some(&2));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_has_cached_does_not_pull() {
        let pulled = Cell::new(0);
        let mut iter = Peekable::new((0..3).inspect(|_| pulled.set(pulled.get() + 1)));

        assert!(!iter.has_cached());
        assert_eq!(pulled.get(), 0);
        iter.peek();
        assert!(iter.has_cached());
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_into_inner_resumes_after_cached() {
        let gen = Generator::from_source("digits", 0..4).unwrap();
        let mut iter = Peekable::new(gen);

        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.peek(), Some(&1));
        let rest: Vec<i32> = iter.into_inner().collect();
        assert_eq!(rest, vec![2, 3]);
    }

    #[test]
    fn test_peek_at_end() {
        let mut iter = Peekable::new(std::iter::once(9));
        assert_eq!(iter.next(), Some(9));
        assert_eq!(iter.peek(), None);
        assert_eq!(iter.peek(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_peek_over_generator() {
        let gen = Generator::from_source("letters", vec!['a', 'b']).unwrap();
        let mut iter = Peekable::new(gen);

        assert_eq!(iter.peek(), Some(&'a'));
        assert_eq!(iter.peek(), Some(&'a'));
        assert_eq!(iter.next(), Some('a'));
        assert_eq!(iter.peek(), Some(&'b'));
        assert_eq!(iter.next(), Some('b'));
        assert_eq!(iter.peek(), None);
        assert_eq!(iter.next(), None);
    }
}
