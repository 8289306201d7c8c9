//! Pot accounting and side-pot settlement.
//!
//! The betting engine only records how much each seat has put in over the
//! whole hand. Side pots are derived from those totals at settlement time.

use crate::evaluator::Evaluation;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PotError {
    #[error("pot {pot} has no eligible players")]
    NoEligiblePlayers { pot: usize },
    #[error("chip mismatch: paid {paid}, contributed {contributed}")]
    ChipMismatch { paid: u64, contributed: u64 },
    #[error("seat {0} is not at this table")]
    UnknownSeat(usize),
}

/// One layer of the pot and the seats that can win it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePot {
    pub amount: u64,
    /// Seats, ascending.
    pub eligible: Vec<usize>,
}

/// Who won a single pot and how it was split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotAward {
    pub pot: usize,
    pub amount: u64,
    /// Winners in odd-chip order (first seat left of the dealer first).
    pub winners: Vec<usize>,
    /// Chips paid to each winner, aligned with `winners`.
    pub shares: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Chips paid to each seat.
    pub payouts: Vec<u64>,
    pub awards: Vec<PotAward>,
}

impl Settlement {
    pub fn total(&self) -> u64 {
        self.payouts.iter().sum()
    }
}

/// Tracks each seat's contribution to the current hand.
#[derive(Debug, Clone, Default)]
pub struct PotManager {
    contributions: Vec<u64>,
}

impl PotManager {
    pub fn new(seats: usize) -> Self {
        Self { contributions: vec![0; seats] }
    }

    /// Start a new hand.
    pub fn reset(&mut self, seats: usize) {
        self.contributions.clear();
        self.contributions.resize(seats, 0);
    }

    pub fn add(&mut self, seat: usize, amount: u64) {
        if seat >= self.contributions.len() {
            self.contributions.resize(seat + 1, 0);
        }
        self.contributions[seat] += amount;
    }

    pub fn total(&self) -> u64 {
        self.contributions.iter().sum()
    }

    pub fn contribution(&self, seat: usize) -> u64 {
        self.contributions.get(seat).copied().unwrap_or(0)
    }

    pub fn contributions(&self) -> &[u64] {
        &self.contributions
    }

    /// Build the side-pot ladder from contribution levels.
    ///
    /// `folded[i]` marks seats that can no longer win. Adjacent layers with the
    /// same eligible set are merged, and layers funded only by folded seats are
    /// folded into a neighbouring pot.
    ///
    /// ```
    /// use draw_poker::pot::PotManager;
    ///
    /// let mut pot = PotManager::new(3);
    /// pot.add(0, 500);
    /// pot.add(1, 1000);
    /// pot.add(2, 1000);
    /// let pots = pot.side_pots(&[false, false, false]);
    /// assert_eq!(pots[0].amount, 1500);
    /// assert_eq!(pots[0].eligible, vec![0, 1, 2]);
    /// assert_eq!(pots[1].amount, 1000);
    /// assert_eq!(pots[1].eligible, vec![1, 2]);
    /// ```
    pub fn side_pots(&self, folded: &[bool]) -> Vec<SidePot> {
        let mut levels: Vec<u64> = self.contributions.iter().copied().filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots: Vec<SidePot> = Vec::new();
        let mut dead = 0u64;
        let mut prev = 0u64;
        for lvl in levels {
            let contributors: Vec<usize> = self
                .contributions
                .iter()
                .enumerate()
                .filter(|(_, &c)| c >= lvl)
                .map(|(seat, _)| seat)
                .collect();
            let amount = (lvl - prev) * contributors.len() as u64;
            prev = lvl;
            let eligible: Vec<usize> = contributors
                .into_iter()
                .filter(|&seat| !folded.get(seat).copied().unwrap_or(false))
                .collect();

            if eligible.is_empty() {
                match pots.last_mut() {
                    Some(last) => last.amount += amount,
                    None => dead += amount,
                }
                continue;
            }
            match pots.last_mut() {
                Some(last) if last.eligible == eligible => last.amount += amount,
                _ => pots.push(SidePot { amount: amount + dead, eligible }),
            }
            dead = 0;
        }
        if dead > 0 {
            pots.push(SidePot { amount: dead, eligible: Vec::new() });
        }
        pots
    }

    /// Pay every pot to the best eligible hand, splitting ties.
    ///
    /// `hands[seat]` is `None` for seats that cannot show down. Odd chips go
    /// one at a time to tied winners starting left of `dealer`.
    pub fn distribute(
        &self,
        pots: &[SidePot],
        hands: &[Option<Evaluation>],
        dealer: usize,
    ) -> Result<Settlement, PotError> {
        let seats = self.contributions.len();
        let mut payouts = vec![0u64; seats];
        let mut awards = Vec::with_capacity(pots.len());

        for (idx, pot) in pots.iter().enumerate() {
            let contenders: Vec<(usize, &Evaluation)> = pot
                .eligible
                .iter()
                .filter_map(|&seat| hands.get(seat).and_then(Option::as_ref).map(|e| (seat, e)))
                .collect();
            let best = contenders
                .iter()
                .map(|(_, e)| *e)
                .max()
                .ok_or(PotError::NoEligiblePlayers { pot: idx })?;
            let mut winners: Vec<usize> =
                contenders.iter().filter(|(_, e)| *e == best).map(|(s, _)| *s).collect();
            winners.sort_by_key(|&s| (s + seats - (dealer + 1) % seats) % seats);

            let k = winners.len() as u64;
            let per = pot.amount / k;
            let mut remainder = pot.amount % k;
            let mut shares = Vec::with_capacity(winners.len());
            for &w in &winners {
                let mut share = per;
                if remainder > 0 {
                    share += 1;
                    remainder -= 1;
                }
                payouts[w] += share;
                shares.push(share);
            }
            awards.push(PotAward { pot: idx, amount: pot.amount, winners, shares });
        }

        let settlement = Settlement { payouts, awards };
        let contributed = self.total();
        if settlement.total() != contributed {
            return Err(PotError::ChipMismatch { paid: settlement.total(), contributed });
        }
        Ok(settlement)
    }

    /// The whole pot to one seat, used when everyone else folded.
    pub fn award_uncontested(&self, seat: usize) -> Result<Settlement, PotError> {
        if seat >= self.contributions.len() {
            return Err(PotError::UnknownSeat(seat));
        }
        let amount = self.total();
        let mut payouts = vec![0u64; self.contributions.len()];
        payouts[seat] = amount;
        let award = PotAward { pot: 0, amount, winners: vec![seat], shares: vec![amount] };
        Ok(Settlement { payouts, awards: vec![award] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::hand::Hand;

    fn eval(s: &str) -> Option<Evaluation> {
        Some(evaluate(&s.parse::<Hand>().unwrap()))
    }

    fn pot_with(contribs: &[u64]) -> PotManager {
        let mut p = PotManager::new(contribs.len());
        for (seat, &c) in contribs.iter().enumerate() {
            p.add(seat, c);
        }
        p
    }

    #[test]
    fn equal_contributions_make_one_pot() {
        let p = pot_with(&[100, 100, 100]);
        let pots = p.side_pots(&[false; 3]);
        assert_eq!(pots, vec![SidePot { amount: 300, eligible: vec![0, 1, 2] }]);
    }

    #[test]
    fn folded_contributor_funds_pot_but_is_not_eligible() {
        let p = pot_with(&[510, 0, 1000]);
        let pots = p.side_pots(&[false, true, false]);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0], SidePot { amount: 1020, eligible: vec![0, 2] });
        assert_eq!(pots[1], SidePot { amount: 490, eligible: vec![2] });
    }

    #[test]
    fn dead_money_above_all_live_players_joins_previous_pot() {
        // seat 0 bet 300 then folded; seats 1 and 2 are all-in for 100
        let p = pot_with(&[300, 100, 100]);
        let pots = p.side_pots(&[true, false, false]);
        assert_eq!(pots, vec![SidePot { amount: 500, eligible: vec![1, 2] }]);
    }

    #[test]
    fn three_level_ladder_pays_each_layer() {
        let p = pot_with(&[100, 50, 200]);
        let pots = p.side_pots(&[false; 3]);
        assert_eq!(pots.len(), 3);
        let hands = [eval("Qs Qh 2c 3d 8s"), eval("As Ah 2d 3c 8h"), eval("7c 6c 2h 3s 9d")];
        let s = p.distribute(&pots, &hands, 0).unwrap();
        assert_eq!(s.payouts, vec![100, 150, 100]);
    }

    #[test]
    fn split_pot_odd_chip_goes_left_of_dealer() {
        let p = pot_with(&[50, 50, 1]);
        let pots = p.side_pots(&[false, false, true]);
        assert_eq!(pots, vec![SidePot { amount: 101, eligible: vec![0, 1] }]);
        let hands = [eval("Ac Kd 9h 7s 5c"), eval("Ad Kc 9s 7h 5d"), None];
        // dealer at seat 0: seat 1 is first to the left
        let s = p.distribute(&pots, &hands, 0).unwrap();
        assert_eq!(s.payouts, vec![50, 51, 0]);
        // dealer at seat 2: seat 0 is first to the left
        let s = p.distribute(&pots, &hands, 2).unwrap();
        assert_eq!(s.payouts, vec![51, 50, 0]);
        assert_eq!(s.total(), 101);
    }

    #[test]
    fn pot_without_hands_is_an_error() {
        let p = pot_with(&[10, 10]);
        let pots = p.side_pots(&[false, false]);
        let err = p.distribute(&pots, &[None, None], 0).unwrap_err();
        assert_eq!(err, PotError::NoEligiblePlayers { pot: 0 });
    }

    #[test]
    fn uncontested_award_takes_everything() {
        let p = pot_with(&[10, 20, 5]);
        let s = p.award_uncontested(1).unwrap();
        assert_eq!(s.payouts, vec![0, 35, 0]);
        assert!(p.award_uncontested(9).is_err());
    }
}
