use crate::action::Action;
use crate::events::GameEvent;
use std::collections::HashMap;

/// Counters kept for one opponent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpponentStats {
    pub name: String,
    pub rounds_seen: u32,
    pub folds: u32,
    pub calls: u32,
    pub checks: u32,
    pub raises: u32,
    pub all_ins: u32,
    pub showdowns: u32,
    pub showdowns_won: u32,
    /// Total cards drawn over all draws.
    pub cards_drawn: u32,
    pub draws: u32,
}

impl OpponentStats {
    fn named(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    /// Raises per voluntary action, 0.0 to 1.0.
    pub fn aggression(&self) -> f64 {
        let acts = self.raises + self.calls;
        if acts == 0 {
            0.0
        } else {
            self.raises as f64 / acts as f64
        }
    }

    pub fn fold_rate(&self) -> f64 {
        let acts = self.folds + self.calls + self.checks + self.raises;
        if acts == 0 {
            0.0
        } else {
            self.folds as f64 / acts as f64
        }
    }

    pub fn average_draw(&self) -> Option<f64> {
        (self.draws > 0).then(|| self.cards_drawn as f64 / self.draws as f64)
    }
}

/// Arena of [`OpponentStats`] keyed by player name.
#[derive(Debug, Clone, Default)]
pub struct OpponentBook {
    stats: Vec<OpponentStats>,
    index: HashMap<String, usize>,
}

impl OpponentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OpponentStats> {
        self.index.get(name).map(|&i| &self.stats[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpponentStats> + '_ {
        self.stats.iter()
    }

    fn entry(&mut self, name: &str) -> &mut OpponentStats {
        let idx = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.stats.push(OpponentStats::named(name));
                let i = self.stats.len() - 1;
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.stats[idx]
    }

    /// Update counters from a table event. Events about `me` are ignored.
    pub fn record(&mut self, me: &str, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { stacks, .. } => {
                for (name, _) in stacks.iter().filter(|(n, _)| n != me) {
                    self.entry(name).rounds_seen += 1;
                }
            }
            GameEvent::ActionTaken { name, action, paid, all_in, .. } if name != me => {
                let s = self.entry(name);
                match action {
                    Action::Fold => s.folds += 1,
                    Action::Call if *paid == 0 => s.checks += 1,
                    Action::Call => s.calls += 1,
                    Action::Raise { .. } => s.raises += 1,
                }
                if *all_in {
                    s.all_ins += 1;
                }
            }
            GameEvent::CardsExchanged { name, count } if name != me => {
                let s = self.entry(name);
                s.draws += 1;
                s.cards_drawn += *count as u32;
            }
            GameEvent::HandShown { name, .. } if name != me => {
                self.entry(name).showdowns += 1;
            }
            GameEvent::PotAwarded { winners, .. } => {
                for (name, _) in winners.iter().filter(|(n, _)| n != me) {
                    self.entry(name).showdowns_won += 1;
                }
            }
            _ => {}
        }
    }

    /// Mean aggression over opponents with at least one voluntary action.
    pub fn table_aggression(&self) -> Option<f64> {
        let active: Vec<f64> =
            self.stats.iter().filter(|s| s.raises + s.calls > 0).map(OpponentStats::aggression).collect();
        (!active.is_empty()).then(|| active.iter().sum::<f64>() / active.len() as f64)
    }
}
