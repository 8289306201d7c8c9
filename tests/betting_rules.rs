use draw_poker::action::Action;
use draw_poker::betting::{BettingLimits, BettingRound, Phase};
use draw_poker::events::{GameEvent, NullSink, RecordingSink};
use draw_poker::player::Player;
use draw_poker::pot::PotManager;
use proptest::prelude::*;

fn table(stacks: &[u64]) -> Vec<Player> {
    stacks.iter().enumerate().map(|(i, &c)| Player::new(format!("P{i}"), c)).collect()
}

#[test]
fn short_call_goes_all_in_for_the_stack() {
    let mut players = table(&[1000, 80]);
    let mut pot = PotManager::new(2);
    let limits = BettingLimits { opening_bet: 0, min_raise: 20, max_raises: 4 };
    let mut round = BettingRound::start(1, Phase::PostDraw, &players, 0, limits);

    round.apply(&mut players, &mut pot, Action::raise_to(200), &mut NullSink);
    assert_eq!(round.to_call(&players[1]), 80);
    let r = round.apply(&mut players, &mut pot, Action::Call, &mut NullSink).unwrap();
    assert_eq!(r.paid, 80);
    assert!(r.all_in);
    assert_eq!(players[1].chips(), 0);
    assert!(round.is_complete());
    assert_eq!(pot.total(), 280);
}

#[test]
fn completed_round_ignores_further_actions() {
    let mut players = table(&[500, 500]);
    let mut pot = PotManager::new(2);
    let limits = BettingLimits { opening_bet: 0, min_raise: 20, max_raises: 4 };
    let mut round = BettingRound::start(1, Phase::PostDraw, &players, 0, limits);
    round.apply(&mut players, &mut pot, Action::Call, &mut NullSink);
    round.apply(&mut players, &mut pot, Action::Call, &mut NullSink);
    assert!(round.is_complete());

    let before = (round.state().clone(), pot.total(), players[0].chips(), players[1].chips());
    let mut sink = RecordingSink::new();
    assert!(round.apply(&mut players, &mut pot, Action::raise_to(100), &mut sink).is_none());
    assert!(sink.events().is_empty());
    assert_eq!(before, (round.state().clone(), pot.total(), players[0].chips(), players[1].chips()));
}

#[test]
fn raise_cap_turns_raises_into_calls() {
    let mut players = table(&[5000, 5000]);
    let mut pot = PotManager::new(2);
    let limits = BettingLimits { opening_bet: 0, min_raise: 20, max_raises: 2 };
    let mut sink = RecordingSink::new();
    let mut round = BettingRound::start(1, Phase::PostDraw, &players, 0, limits);
    round.apply(&mut players, &mut pot, Action::raise_to(40), &mut sink);
    round.apply(&mut players, &mut pot, Action::raise_to(80), &mut sink);
    let r = round.apply(&mut players, &mut pot, Action::raise_to(400), &mut sink).unwrap();
    assert_eq!(r.applied, Action::Call);
    assert_eq!(round.state().raise_count, 2);
    assert!(round.is_complete());
    assert!(sink.events().iter().any(|e| matches!(e, GameEvent::ActionAdjusted { .. })));
}

fn any_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        2 => Just(Action::Fold),
        4 => Just(Action::Call),
        3 => (0u64..1500).prop_map(Action::raise_to),
    ]
}

proptest! {
    #[test]
    fn chips_are_conserved_and_the_round_terminates(
        stacks in prop::collection::vec(1u64..1200, 2..=6),
        actions in prop::collection::vec(any_action(), 64),
        first in 0usize..6,
        opening in prop_oneof![Just(0u64), Just(20u64)],
    ) {
        let mut players = table(&stacks);
        let n = players.len();
        let total: u64 = stacks.iter().sum();
        let mut pot = PotManager::new(n);
        let limits = BettingLimits { opening_bet: opening, min_raise: 20, max_raises: 4 };
        let mut round = BettingRound::start(1, Phase::PreDraw, &players, first % n, limits);

        let mut steps = 0;
        while !round.is_complete() {
            let action = actions[steps % actions.len()];
            let r = round.apply(&mut players, &mut pot, action, &mut NullSink);
            prop_assert!(r.is_some());
            let in_hand: u64 = players.iter().map(Player::chips).sum();
            prop_assert_eq!(in_hand + pot.total(), total);
            prop_assert!(round.state().raise_count <= 4);
            steps += 1;
            prop_assert!(steps < 200, "betting round did not terminate");
        }

        let live = players.iter().filter(|p| !p.is_folded()).count();
        if live >= 2 {
            let bet = round.state().current_bet;
            for p in players.iter().filter(|p| p.can_act()) {
                prop_assert_eq!(p.bet(), bet, "{} left the round unmatched", p.name());
            }
        }
    }
}
