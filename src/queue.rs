use crate::error::LiftError;

/// A pending floor visit. Stops form a forward-only chain through arena
/// indices; each `next` link is owned by its predecessor.
#[derive(Debug)]
struct Stop {
    floor: i32,
    next: Option<usize>,
}

/// Queue of pending stops ordered to minimize direction reversals: a new
/// stop joins wherever serving it keeps the car sweeping the way it is
/// already going, which may be the head, the tail, or the middle of the
/// chain rather than strict arrival order.
///
/// The chain from `head` up to (but excluding) `pivot` is strictly
/// monotonic in one direction; the chain from `pivot` to `tail` is
/// strictly monotonic in the opposite direction. With no reversed leg,
/// `pivot == tail`.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    slots: Vec<Stop>,
    head: Option<usize>,
    tail: Option<usize>,
    pivot: Option<usize>,
}

/// The five distinct ways a stop can join the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertionStyle {
    /// First stop; initialises the chain.
    Create,
    /// Plain append at the tail.
    Enqueue,
    /// Splice into the middle of a leg.
    Insert,
    /// New head, served before everything already queued.
    Jump,
    /// Append that starts a new, oppositely-directed leg.
    Pivot,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the queue has another stop. Never mutates the chain.
    pub fn has_next(&self) -> bool {
        self.head.is_some()
    }

    /// Pops the first stop off the queue and returns its floor.
    pub fn pop_next_stop(&mut self) -> Result<i32, LiftError> {
        let head = self.head.ok_or(LiftError::EmptyQueue)?;
        let floor = self.slots[head].floor;
        self.head = self.slots[head].next;

        if self.head.is_none() {
            // Fully drained; only now is it safe to recycle the arena,
            // since `pivot` may still index a node popped earlier.
            self.slots.clear();
            self.tail = None;
            self.pivot = None;
        }

        Ok(floor)
    }

    fn alloc(&mut self, floor: i32) -> usize {
        self.slots.push(Stop { floor, next: None });
        self.slots.len() - 1
    }

    fn floor(&self, idx: usize) -> i32 {
        self.slots[idx].floor
    }

    /// The stop lies strictly between the car and the scheduled next stop,
    /// so it must be served first.
    fn is_jump(&self, current: i32, destination: i32, head: usize) -> bool {
        let up = self.floor(head);
        (destination > current && destination < up) || (destination < current && destination > up)
    }

    /// The stop falls outside the range spanned by the first and last
    /// queued floors, so it belongs at the end.
    fn is_appended(&self, destination: i32, head: usize, tail: usize) -> bool {
        let up = self.floor(head);
        let down = self.floor(tail);
        (destination < up && destination < down) || (destination > up && destination > down)
    }

    /// An append that would reverse the direction the queue is moving.
    fn is_pivot(&self, destination: i32, head: usize, tail: usize) -> bool {
        let Some(second) = self.slots[head].next else {
            return false;
        };
        let rising = self.floor(head) < self.floor(second);
        let down = self.floor(tail);
        (rising && destination < down) || (!rising && destination > down)
    }

    fn classify(&self, current: i32, destination: i32, head: usize, tail: usize) -> InsertionStyle {
        if self.is_jump(current, destination, head) {
            InsertionStyle::Jump
        } else if self.is_appended(destination, head, tail) {
            if self.is_pivot(destination, head, tail) {
                InsertionStyle::Pivot
            } else {
                InsertionStyle::Enqueue
            }
        } else {
            // Neither first, last, nor next: it goes somewhere inside.
            InsertionStyle::Insert
        }
    }

    /// Adds a stop to the queue.
    ///
    /// `current` is the floor the car is at right now; `destination` must
    /// differ from it (the elevator enforces this before delegating). The
    /// queue imposes no range bounds and does not deduplicate floors.
    pub fn add_stop(&mut self, current: i32, destination: i32) {
        debug_assert_ne!(current, destination);

        let style = match (self.head, self.tail) {
            (Some(head), Some(tail)) => self.classify(current, destination, head, tail),
            _ => InsertionStyle::Create,
        };

        match style {
            InsertionStyle::Create => {
                let idx = self.alloc(destination);
                self.head = Some(idx);
                self.tail = Some(idx);
                self.pivot = Some(idx);
            }
            InsertionStyle::Jump => {
                let idx = self.alloc(destination);
                self.slots[idx].next = self.head;
                self.head = Some(idx);
            }
            InsertionStyle::Enqueue => {
                let idx = self.alloc(destination);
                if let Some(tail) = self.tail {
                    self.slots[tail].next = Some(idx);
                    if self.pivot == Some(tail) {
                        self.pivot = Some(idx);
                    }
                }
                self.tail = Some(idx);
            }
            InsertionStyle::Pivot => {
                // The pivot stays put: it now marks where the new,
                // oppositely-directed leg begins.
                let idx = self.alloc(destination);
                if let Some(tail) = self.tail {
                    self.slots[tail].next = Some(idx);
                }
                self.tail = Some(idx);
            }
            InsertionStyle::Insert => {
                if let (Some(head), Some(tail)) = (self.head, self.tail) {
                    self.splice(destination, head, tail);
                }
            }
        }
    }

    /// Splices `destination` into whichever leg it belongs to, scanning
    /// adjacent pairs for the first strict between-gap. A scan that finds
    /// no gap drops the stop on the floor; callers relying on a stop being
    /// scheduled must not submit floors already present in the leg.
    fn splice(&mut self, destination: i32, head: usize, tail: usize) {
        let Some(second) = self.slots[head].next else {
            // Single-node queue: there is no adjacent pair to open up.
            return;
        };

        let mut rising = self.floor(head) < self.floor(second);
        let down = self.floor(tail);

        let mut cursor = if (rising && destination < down) || (!rising && destination > down) {
            head
        } else {
            // The reversed leg runs the other way.
            rising = !rising;
            match self.pivot {
                Some(pivot) => pivot,
                None => return,
            }
        };

        while let Some(next) = self.slots[cursor].next {
            let near = self.floor(cursor);
            let far = self.floor(next);
            let gap = (rising && near < destination && destination < far)
                || (!rising && near > destination && destination > far);
            if gap {
                let idx = self.alloc(destination);
                self.slots[idx].next = Some(next);
                self.slots[cursor].next = Some(idx);
                return;
            }
            cursor = next;
        }
    }

    #[cfg(test)]
    fn pivot_floor(&self) -> Option<i32> {
        self.pivot.map(|idx| self.floor(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut DispatchQueue) -> Vec<i32> {
        let mut floors = Vec::new();
        while queue.has_next() {
            floors.push(queue.pop_next_stop().unwrap());
        }
        floors
    }

    /// Builds a queue by adding stops in order, all from the given
    /// starting floor.
    fn queue_of(current: i32, floors: &[i32]) -> DispatchQueue {
        let mut queue = DispatchQueue::new();
        for &floor in floors {
            queue.add_stop(current, floor);
        }
        queue
    }

    #[test]
    fn n_adds_drain_in_n_pops() {
        let mut queue = queue_of(0, &[4, 7, 9, 2]);
        assert!(queue.has_next());

        let floors = drain(&mut queue);
        assert_eq!(floors.len(), 4);
        assert!(!queue.has_next());
        assert_eq!(queue.pop_next_stop(), Err(LiftError::EmptyQueue));
    }

    #[test]
    fn pop_on_empty_queue_fails() {
        let mut queue = DispatchQueue::new();
        assert_eq!(queue.pop_next_stop(), Err(LiftError::EmptyQueue));
        // Still empty, still failing.
        assert_eq!(queue.pop_next_stop(), Err(LiftError::EmptyQueue));
    }

    #[test]
    fn has_next_is_pure_observation() {
        let mut queue = queue_of(0, &[3, 5]);
        for _ in 0..10 {
            assert!(queue.has_next());
        }
        assert_eq!(drain(&mut queue), vec![3, 5]);
    }

    #[test]
    fn jump_takes_the_head() {
        let mut queue = DispatchQueue::new();
        queue.add_stop(5, 8);
        queue.add_stop(5, 6);
        assert_eq!(drain(&mut queue), vec![6, 8]);
    }

    #[test]
    fn enqueue_extends_the_current_leg() {
        let mut queue = queue_of(0, &[3, 5]);
        assert_eq!(queue.pivot_floor(), Some(5));

        queue.add_stop(0, 9);
        // The old tail was the pivot, so the pivot follows the append.
        assert_eq!(queue.pivot_floor(), Some(9));
        assert_eq!(drain(&mut queue), vec![3, 5, 9]);
    }

    #[test]
    fn pivot_starts_a_reversed_leg() {
        let mut queue = queue_of(0, &[3, 5, 7]);
        queue.add_stop(7, 2);

        // The pivot stays on the last stop of the rising leg.
        assert_eq!(queue.pivot_floor(), Some(7));
        assert_eq!(drain(&mut queue), vec![3, 5, 7, 2]);
    }

    #[test]
    fn insert_splices_into_the_primary_leg() {
        let mut queue = queue_of(0, &[3, 7]);
        queue.add_stop(0, 5);
        assert_eq!(drain(&mut queue), vec![3, 5, 7]);
    }

    #[test]
    fn insert_splices_into_the_reversed_leg() {
        // Falling leg 20-10-5, then 25 opens a rising return leg.
        let mut queue = queue_of(30, &[20, 10, 5]);
        queue.add_stop(5, 25);
        assert_eq!(queue.pivot_floor(), Some(5));

        // 22 is inside the head-to-tail range but beyond the falling leg,
        // so the scan starts at the pivot with the direction flipped.
        queue.add_stop(0, 22);
        assert_eq!(drain(&mut queue), vec![20, 10, 5, 22, 25]);
    }

    #[test]
    fn falling_primary_leg_orders_descending() {
        let mut queue = DispatchQueue::new();
        queue.add_stop(10, 7);
        queue.add_stop(10, 4);
        queue.add_stop(10, 5);
        assert_eq!(drain(&mut queue), vec![7, 5, 4]);
    }

    #[test]
    fn duplicate_floor_in_leg_is_silently_dropped() {
        // 3 already heads the rising leg; re-adding it finds no adjacent
        // gap, so the request vanishes rather than corrupting the chain.
        let mut queue = queue_of(0, &[3, 7]);
        queue.add_stop(0, 3);
        assert_eq!(drain(&mut queue), vec![3, 7]);
    }

    #[test]
    fn no_deduplication_across_legs() {
        // Once a reversed leg exists the queue range runs tail-to-head, so
        // 5 lands at the tail again even though the rising leg holds a 5.
        let mut queue = queue_of(0, &[3, 5, 7]);
        queue.add_stop(7, 2);
        queue.add_stop(0, 5);
        assert_eq!(drain(&mut queue), vec![3, 5, 7, 2, 5]);
    }

    #[test]
    fn reuse_after_full_drain() {
        let mut queue = queue_of(0, &[2, 4]);
        assert_eq!(drain(&mut queue), vec![2, 4]);

        queue.add_stop(4, 1);
        queue.add_stop(4, 3);
        assert_eq!(drain(&mut queue), vec![3, 1]);
    }

    #[test]
    fn pivot_survives_pops_into_the_reversed_leg() {
        let mut queue = queue_of(0, &[3, 5, 7]);
        queue.add_stop(7, 2);

        assert_eq!(queue.pop_next_stop().unwrap(), 3);
        assert_eq!(queue.pop_next_stop().unwrap(), 5);

        // Head now sits on the pivot; an appended far floor still lands at
        // the tail behind the reversed leg.
        queue.add_stop(5, 1);
        assert_eq!(drain(&mut queue), vec![7, 2, 1]);
    }
}
