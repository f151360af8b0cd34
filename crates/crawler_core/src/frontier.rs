use std::collections::VecDeque;

/// Which pending URL is fetched next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontierOrder {
    /// Most recently discovered first (depth-biased).
    #[default]
    Lifo,
    /// Oldest discovery first (breadth-first).
    Fifo,
}

/// Discovered URLs awaiting a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    pending: VecDeque<String>,
    order: FrontierOrder,
}

impl Frontier {
    pub fn new(order: FrontierOrder) -> Self {
        Self {
            pending: VecDeque::new(),
            order,
        }
    }

    pub fn push(&mut self, url: String) {
        self.pending.push_back(url);
    }

    pub fn pop_one(&mut self) -> Option<String> {
        match self.order {
            FrontierOrder::Lifo => self.pending.pop_back(),
            FrontierOrder::Fifo => self.pending.pop_front(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
