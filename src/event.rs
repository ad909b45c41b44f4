use crate::beachline::ArcId;
use crate::geometry::Point;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Handle of a circle event in the queue's pool.
pub(crate) type CircleId = usize;

/// An event popped from the queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Event {
    /// The sweep line reaches a site.
    Site(usize),
    /// The arc `arc` shrinks to a point at `center`, which becomes a Voronoi vertex, when
    /// the sweep line reaches `y`.
    Circle { id: CircleId, arc: ArcId, center: Point, y: f64 },
}

/// A predicted circle event. `valid` is the flag shared by the owning arc and the queued
/// entry: cancelling the event clears it instead of removing the entry.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CircleEvent {
    pub arc: ArcId,
    pub center: Point,
    /// Sweep coordinate at which the event fires (bottom of the circle).
    pub y: f64,
    valid: bool,
}

#[derive(Clone, Copy, Debug)]
enum Payload {
    Site(usize),
    Circle(CircleId),
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    y: f64,
    x: f64,
    seq: u64,
    payload: Payload,
}

impl Entry {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so that the max-heap yields the smallest key first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key_cmp(self)
    }
}

/// Priority queue of site and circle events keyed by `(y, x, insertion order)`.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<Entry>,
    circles: Vec<CircleEvent>,
    next_seq: u64,
    discarded: usize,
}

impl EventQueue {
    pub fn with_capacity(sites: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(sites * 2),
            circles: Vec::with_capacity(sites),
            next_seq: 0,
            discarded: 0,
        }
    }

    fn push(&mut self, y: f64, x: f64, payload: Payload) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { y, x, seq, payload });
    }

    pub fn push_site(&mut self, id: usize, position: Point) {
        self.push(position.y, position.x, Payload::Site(id));
    }

    /// Schedules a circle event for `arc`, firing when the sweep line reaches `y`.
    pub fn push_circle(&mut self, arc: ArcId, center: Point, y: f64) -> CircleId {
        let id = self.circles.len();
        self.circles.push(CircleEvent { arc, center, y, valid: true });
        self.push(y, center.x, Payload::Circle(id));
        id
    }

    /// Cancels a circle event. The queued entry is dropped lazily by `pop_min`.
    pub fn invalidate(&mut self, id: CircleId) {
        self.circles[id].valid = false;
    }

    pub fn is_valid(&self, id: CircleId) -> bool {
        self.circles[id].valid
    }

    pub fn circle(&self, id: CircleId) -> &CircleEvent {
        &self.circles[id]
    }

    /// Pops the smallest valid event, skipping cancelled circle events.
    pub fn pop_min(&mut self) -> Option<Event> {
        while let Some(entry) = self.heap.pop() {
            match entry.payload {
                Payload::Site(id) => return Some(Event::Site(id)),
                Payload::Circle(id) => {
                    let circle = self.circles[id];
                    if circle.valid {
                        // A fired event is consumed; its arc no longer owns it.
                        self.circles[id].valid = false;
                        return Some(Event::Circle { id, arc: circle.arc, center: circle.center, y: circle.y });
                    }
                    self.discarded += 1;
                }
            }
        }
        None
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of cancelled circle events dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_order_by_y_then_x_then_insertion() {
        let mut queue = EventQueue::with_capacity(4);
        queue.push_site(0, Point::new(5.0, 1.0));
        queue.push_site(1, Point::new(2.0, 1.0));
        queue.push_site(2, Point::new(9.0, 0.0));
        queue.push_site(3, Point::new(2.0, 1.0));

        let order: Vec<Event> = std::iter::from_fn(|| queue.pop_min()).collect();
        assert_eq!(order, vec![Event::Site(2), Event::Site(1), Event::Site(3), Event::Site(0)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_invalidated_circle_is_skipped() {
        let mut queue = EventQueue::with_capacity(2);
        let stale = queue.push_circle(7, Point::new(0.0, 0.0), 1.0);
        let live = queue.push_circle(8, Point::new(1.0, 0.0), 2.0);
        queue.push_site(0, Point::new(0.0, 3.0));

        queue.invalidate(stale);
        assert!(!queue.is_valid(stale));

        assert_eq!(
            queue.pop_min(),
            Some(Event::Circle { id: live, arc: 8, center: Point::new(1.0, 0.0), y: 2.0 })
        );
        assert!(!queue.is_valid(live), "fired events are consumed");
        assert_eq!(queue.pop_min(), Some(Event::Site(0)));
        assert_eq!(queue.pop_min(), None);
        assert_eq!(queue.discarded(), 1);
    }

    #[test]
    fn test_site_before_circle_at_same_key() {
        let mut queue = EventQueue::with_capacity(1);
        queue.push_site(0, Point::new(1.0, 2.0));
        queue.push_circle(3, Point::new(1.0, 0.0), 2.0);
        assert_eq!(queue.pop_min(), Some(Event::Site(0)));
    }
}
