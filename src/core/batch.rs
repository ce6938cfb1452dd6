use std::collections::VecDeque;

use log::debug;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BatchStatus {
    Continuable,
    Full,
}

/// Bounded buffer of items between the line source and the consumer.
///
/// Filled up to `batch_size` items, then drained in insertion order. The
/// allocation is reused across passes.
pub struct Batch<I> {
    items: VecDeque<I>,
    status: BatchStatus,
    batch_size: usize,
}

impl<I> Batch<I> {
    pub fn new(batch_size: usize) -> Batch<I> {
        Batch {
            items: VecDeque::with_capacity(batch_size),
            status: BatchStatus::Continuable,
            batch_size,
        }
    }

    pub fn add_item(&mut self, item: I) {
        self.items.push_back(item);
        self.status = if self.items.len() >= self.batch_size {
            BatchStatus::Full
        } else {
            BatchStatus::Continuable
        };
    }

    pub fn next_item(&mut self) -> Option<I> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn get_status(&self) -> BatchStatus {
        self.status
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            debug!("Discarding {} pending item(s)", self.items.len());
        }
        self.status = BatchStatus::Continuable;
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Batch, BatchStatus};

    #[test]
    fn batch_should_be_full_at_capacity() {
        let mut batch = Batch::new(2);
        batch.add_item(1);
        assert_eq!(batch.get_status(), BatchStatus::Continuable);
        batch.add_item(2);
        assert_eq!(batch.get_status(), BatchStatus::Full);
    }

    #[test]
    fn items_should_be_drained_in_order() {
        let mut batch = Batch::new(3);
        batch.add_item("a");
        batch.add_item("b");

        assert_eq!(batch.get_status(), BatchStatus::Continuable);
        assert_eq!(batch.next_item(), Some("a"));
        assert_eq!(batch.next_item(), Some("b"));
        assert_eq!(batch.next_item(), None);
        assert!(batch.is_empty());
    }

    #[test]
    fn clear_should_reset_status() {
        let mut batch = Batch::new(1);
        batch.add_item(10);
        batch.clear();

        assert_eq!(batch.get_status(), BatchStatus::Continuable);
        assert_eq!(batch.len(), 0);
        assert_eq!(batch.batch_size(), 1);
    }
}
