//! Input and output adapters for operators.
//!
//! Operators read individuals from a [`Population`] and hand results to a
//! [`Sink`]. Both are implemented for the standard collections, so a
//! `Vec<Sequence<G>>` works as either.

use crate::genome::Sequence;
use std::collections::VecDeque;

/// Read-only, indexable view of a population.
pub trait Population<G> {
    /// Number of individuals.
    fn size(&self) -> usize;

    /// Individual at `index`. Panics when out of range.
    fn at(&self, index: usize) -> &Sequence<G>;

    /// Forward iteration in index order.
    fn members<'a>(&'a self) -> impl Iterator<Item = &'a Sequence<G>>
    where
        G: 'a,
    {
        (0..self.size()).map(move |i| self.at(i))
    }
}

impl<G> Population<G> for [Sequence<G>] {
    fn size(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> &Sequence<G> {
        &self[index]
    }
}

impl<G> Population<G> for Vec<Sequence<G>> {
    fn size(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> &Sequence<G> {
        &self[index]
    }
}

impl<G> Population<G> for VecDeque<Sequence<G>> {
    fn size(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> &Sequence<G> {
        &self[index]
    }
}

/// Destination for operator output.
pub trait Sink<T> {
    /// Accepts one item.
    fn push(&mut self, item: T);
}

impl<T> Sink<T> for Vec<T> {
    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }
}

impl<T> Sink<T> for VecDeque<T> {
    fn push(&mut self, item: T) {
        self.push_back(item);
    }
}
