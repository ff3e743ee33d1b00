//! Win detection for spider-and-flies.

use super::board::{CORNERING_NODES, HOME_NODES, REFUGE_NODES};
use super::types::{Node, Winner};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Refuge visits the spider may rack up before it is awarded the round.
///
/// Counted separately for each refuge node, so circling between `f` and
/// `h` needs seven visits to one of them.
pub const REFUGE_THRESHOLD: u8 = 6;

/// Counts consecutive spider evaluations spent on each refuge node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefugeTracker {
    visits: [u8; REFUGE_NODES.len()],
}

impl RefugeTracker {
    /// Records one evaluation with the spider on `spider`.
    ///
    /// Landing on a refuge bumps that refuge's count; landing anywhere
    /// else clears both. Returns true once a count passes the threshold.
    #[instrument(skip(self))]
    pub fn record(&mut self, spider: Node) -> bool {
        match REFUGE_NODES.iter().position(|&n| n == spider) {
            Some(slot) => {
                self.visits[slot] = self.visits[slot].saturating_add(1);
                debug!(visits = ?self.visits, "Spider on refuge");
                self.visits.iter().any(|&v| v > REFUGE_THRESHOLD)
            }
            None => {
                self.reset();
                false
            }
        }
    }

    /// Visit count for a refuge node, or zero for any other node.
    pub fn visits(&self, node: Node) -> u8 {
        REFUGE_NODES
            .iter()
            .position(|&n| n == node)
            .map_or(0, |slot| self.visits[slot])
    }

    /// Clears all counts.
    pub fn reset(&mut self) {
        self.visits = Default::default();
    }
}

/// Returns true if the spider stands on the flies' home side.
pub fn spider_reached_home(spider: Node) -> bool {
    HOME_NODES.contains(&spider)
}

/// Returns true if every fly sits on a cornering node.
pub fn flies_cornered(flies: &[Node]) -> bool {
    flies.iter().all(|node| CORNERING_NODES.contains(node))
}

/// Applies the win rules in priority order.
///
/// `refuge_check` is false when the spider has not moved since the last
/// evaluation; its visit counts are then left alone.
#[instrument(skip(tracker))]
pub fn evaluate(
    tracker: &mut RefugeTracker,
    spider: Node,
    flies: &[Node],
    refuge_check: bool,
) -> Option<Winner> {
    let winner = if refuge_check && tracker.record(spider) {
        Some(Winner::Pursuer)
    } else if spider_reached_home(spider) {
        Some(Winner::Pursuer)
    } else if flies_cornered(flies) {
        Some(Winner::Evader)
    } else {
        None
    };

    if winner.is_some() {
        tracker.reset();
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refuge_counts_and_resets() {
        let mut tracker = RefugeTracker::default();
        assert!(!tracker.record(Node::F));
        assert!(!tracker.record(Node::H));
        assert!(!tracker.record(Node::F));
        assert_eq!(tracker.visits(Node::F), 2);
        assert_eq!(tracker.visits(Node::H), 1);

        assert!(!tracker.record(Node::E));
        assert_eq!(tracker.visits(Node::F), 0);
        assert_eq!(tracker.visits(Node::H), 0);
    }

    #[test]
    fn test_refuge_threshold_is_exclusive() {
        let mut tracker = RefugeTracker::default();
        for _ in 0..REFUGE_THRESHOLD {
            assert!(!tracker.record(Node::H));
        }
        assert!(tracker.record(Node::H));
    }

    #[test]
    fn test_home_wins_over_cornered_flies() {
        let mut tracker = RefugeTracker::default();
        let flies = [Node::E, Node::F, Node::G];
        assert_eq!(
            evaluate(&mut tracker, Node::D, &flies, true),
            Some(Winner::Pursuer)
        );
    }

    #[test]
    fn test_cornered_flies_win() {
        let mut tracker = RefugeTracker::default();
        let flies = [Node::G, Node::E, Node::F];
        assert_eq!(
            evaluate(&mut tracker, Node::H, &flies, true),
            Some(Winner::Evader)
        );
        assert_eq!(tracker.visits(Node::H), 0);
    }

    #[test]
    fn test_no_refuge_count_without_spider_move() {
        let mut tracker = RefugeTracker::default();
        let flies = [Node::A, Node::B, Node::C];
        for _ in 0..20 {
            assert_eq!(evaluate(&mut tracker, Node::F, &flies, false), None);
        }
        assert_eq!(tracker.visits(Node::F), 0);
    }
}
