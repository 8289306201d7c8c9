use crate::hand::Hand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
    /// Out of chips at the end of a round; never dealt in again.
    Eliminated,
}

impl PlayerStatus {
    pub fn label(self) -> &'static str {
        match self {
            PlayerStatus::Active => "active",
            PlayerStatus::Folded => "folded",
            PlayerStatus::AllIn => "all-in",
            PlayerStatus::Eliminated => "eliminated",
        }
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) name: String,
    pub(crate) chips: u64,
    pub(crate) bet: u64,
    pub(crate) status: PlayerStatus,
    pub(crate) hand: Option<Hand>,
}

impl Player {
    pub fn new(name: impl Into<String>, chips: u64) -> Self {
        Self { name: name.into(), chips, bet: 0, status: PlayerStatus::Active, hand: None }
    }

    /// Returns the player's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the chips not yet committed to the pot
    pub fn chips(&self) -> u64 {
        self.chips
    }

    /// Returns the player's bet in the current betting phase
    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn is_folded(&self) -> bool {
        matches!(self.status, PlayerStatus::Folded | PlayerStatus::Eliminated)
    }

    pub fn is_all_in(&self) -> bool {
        matches!(self.status, PlayerStatus::AllIn)
    }

    /// Still in the hand and able to act.
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Active)
    }

    /// Move up to `amount` chips from the stack into this phase's bet.
    /// Returns the chips actually moved; a player who empties their stack is all-in.
    pub(crate) fn commit(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.bet += paid;
        if self.chips == 0 && paid > 0 {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }

    pub(crate) fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }

    /// Reset per-hand state; busted players become eliminated.
    pub(crate) fn reset_for_hand(&mut self) {
        self.bet = 0;
        self.hand = None;
        self.status = if self.chips == 0 { PlayerStatus::Eliminated } else { PlayerStatus::Active };
    }

    pub(crate) fn reset_bet(&mut self) {
        self.bet = 0;
    }
}
