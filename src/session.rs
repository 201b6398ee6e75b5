//! Per-interaction display state
//!
//! Each user session owns one of these and passes it into report assembly;
//! nothing here is shared between sessions.

use std::collections::BTreeSet;

/// Which properties currently have their price and building charts expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    expanded: BTreeSet<i64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with every given property expanded
    pub fn expanding<I: IntoIterator<Item = i64>>(property_ids: I) -> Self {
        Session {
            expanded: property_ids.into_iter().collect(),
        }
    }

    pub fn expand(&mut self, property_id: i64) {
        self.expanded.insert(property_id);
    }

    pub fn collapse(&mut self, property_id: i64) {
        self.expanded.remove(&property_id);
    }

    /// Flip a property's chart; returns whether it is now expanded
    pub fn toggle(&mut self, property_id: i64) -> bool {
        if self.expanded.remove(&property_id) {
            false
        } else {
            self.expanded.insert(property_id);
            true
        }
    }

    pub fn is_expanded(&self, property_id: i64) -> bool {
        self.expanded.contains(&property_id)
    }

    pub fn expanded(&self) -> impl Iterator<Item = i64> + '_ {
        self.expanded.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut session = Session::new();
        assert!(session.toggle(1001));
        assert!(session.is_expanded(1001));
        assert!(!session.toggle(1001));
        assert!(!session.is_expanded(1001));
    }

    #[test]
    fn test_expand_collapse() {
        let mut session = Session::expanding([3, 1]);
        session.expand(2);
        session.collapse(3);

        assert_eq!(session.expanded().collect::<Vec<_>>(), vec![1, 2]);
    }
}
