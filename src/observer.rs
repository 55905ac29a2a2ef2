//! Hooks for tracing a search, e.g. to render the order in which cells are visited.
use crate::node::Frontier;
use crate::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// A node entered an open list (or had its cost lowered while open).
    Opened { point: Point, frontier: Frontier },
    /// A node was popped and finalised.
    Closed { point: Point },
    /// A jump scan probed a cell.
    Tested { point: Point },
    /// Iterative deepening entered a cell.
    Visited { point: Point },
}

pub trait SearchObserver {
    fn on_event(&mut self, event: SearchEvent);
}

impl<F> SearchObserver for F
where
    F: FnMut(SearchEvent),
{
    fn on_event(&mut self, event: SearchEvent) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    #[inline(always)]
    fn on_event(&mut self, _: SearchEvent) {}
}
