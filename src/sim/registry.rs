//! Bounded registry of committed pieces

use std::collections::VecDeque;

use super::piece::{Piece, PieceId};

/// Active pieces in commit order, oldest first
pub struct ActivePieces {
    pieces: VecDeque<Piece>,
    capacity: Option<usize>,
}

impl ActivePieces {
    /// `None` never evicts. A zero capacity is treated as one.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            pieces: VecDeque::new(),
            capacity: capacity.map(|c| c.max(1)),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append a piece, returning the oldest pieces pushed out by the cap
    pub fn push(&mut self, piece: Piece) -> Vec<Piece> {
        self.pieces.push_back(piece);
        let mut evicted = Vec::new();
        if let Some(cap) = self.capacity {
            while self.pieces.len() > cap {
                if let Some(old) = self.pieces.pop_front() {
                    evicted.push(old);
                }
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }
}
