use crate::cards::{Card, Rank};

/// Ranks of a hand grouped by multiplicity, sorted by (count desc, rank desc).
///
/// Example: KKK72 groups as [(King, 3), (Seven, 1), (Two, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(Rank, u8)>,
}

impl RankGroups {
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.rank().value() as usize] += 1;
        }
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .copied()
            .filter_map(|r| {
                let n = counts[r.value() as usize];
                (n > 0).then_some((r, n))
            })
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        Self { groups }
    }

    /// Ranks that appear exactly `count` times, highest first.
    pub fn with_count(&self, count: u8) -> Vec<Rank> {
        self.groups.iter().filter(|(_, n)| *n == count).map(|(r, _)| *r).collect()
    }

    pub fn quad(&self) -> Option<Rank> {
        self.with_count(4).first().copied()
    }

    pub fn trips(&self) -> Option<Rank> {
        self.with_count(3).first().copied()
    }

    pub fn pairs(&self) -> Vec<Rank> {
        self.with_count(2)
    }

    pub fn kickers(&self) -> Vec<Rank> {
        self.with_count(1)
    }

    /// Number of distinct ranks.
    pub fn distinct(&self) -> usize {
        self.groups.len()
    }
}
