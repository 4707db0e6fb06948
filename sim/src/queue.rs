use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use common::EventKind;

/// Un evento futuro en el heap, ordenado por (tiempo, seq).
/// El seq desempata los eventos con el mismo timestamp en orden FIFO,
/// así la corrida es determinista.
struct Scheduled {
    time: f64,
    seq: u64,
    kind: EventKind,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.time.total_cmp(&other.time) == Ordering::Equal && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Cola de eventos futuros: min-heap por timestamp.
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, time: f64, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { time, seq, kind }));
    }

    /// Saca el evento más próximo en el tiempo.
    pub fn pop(&mut self) -> Option<(f64, EventKind)> {
        self.heap.pop().map(|Reverse(s)| (s.time, s.kind))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_devuelve_en_orden_de_timestamp() {
        let mut q = EventQueue::new();
        q.push(3.0, EventKind::EndOfRun);
        q.push(1.0, EventKind::InventoryRequest);
        q.push(2.0, EventKind::Other(99));

        assert!(matches!(q.pop(), Some((t, EventKind::InventoryRequest)) if t == 1.0));
        assert!(matches!(q.pop(), Some((t, EventKind::Other(99))) if t == 2.0));
        assert!(matches!(q.pop(), Some((t, EventKind::EndOfRun)) if t == 3.0));
        assert!(q.pop().is_none());
    }

    #[test]
    fn mismo_timestamp_sale_en_orden_de_llegada() {
        let mut q = EventQueue::new();
        q.push(1.0, EventKind::Other(1));
        q.push(1.0, EventKind::Other(2));
        q.push(1.0, EventKind::Other(3));

        let tags: Vec<u32> = std::iter::from_fn(|| q.pop())
            .map(|(_, kind)| match kind {
                EventKind::Other(tag) => tag,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(tags, vec![1, 2, 3]);
    }
}
