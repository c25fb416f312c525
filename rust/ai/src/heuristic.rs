//! Rule-based policy.
//!
//! **Preflop:** hole cards are scored as `4 x high + low` plus bonuses for
//! pairs, suitedness, connectedness and two broadway cards. Strong scores
//! open to three big blinds or re-raise; playable scores call when the price
//! is right; everything else folds or checks.
//!
//! **Postflop:** the strength percentile from the street advisor is treated
//! as equity and compared against the break-even equity of a call. Wet
//! boards make the bot bet bigger but call tighter.

use pokerroom_engine::advisor::{
    AdvisoryRequest, BoardAdvisory, FlushDraw, PlayerAdvisory, StraightDraw,
};
use pokerroom_engine::cards::Card;
use pokerroom_engine::hand::Category;
use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::rules::{ActionKind, LegalActions, RaiseBounds};
use pokerroom_engine::table::Table;

use crate::BotPolicy;

const POSTFLOP_CALL_MARGIN: f64 = 0.06;
const POSTFLOP_RAISE_STRONG_EQUITY: f64 = 0.70;
const POSTFLOP_PROBE_EQUITY: f64 = 0.45;
const POSTFLOP_WET_BOOST: f64 = 0.05;

const PREFLOP_RAISE_SCORE: u32 = 85;
const PREFLOP_CALL_SCORE: u32 = 70;
const PREFLOP_MAX_BREAK_EVEN: f64 = 0.40;
const PREFLOP_MIN_SPR: f64 = 4.0;

const OVERCARD_MAX_BREAK_EVEN: f64 = 0.33;
const CHIP_STEP: u32 = 10;

#[derive(Debug, Clone, Default)]
pub struct HeuristicBot;

impl HeuristicBot {
    pub fn new() -> Self {
        Self
    }

    fn preflop(&self, table: &Table, seat: usize, hole: [Card; 2], legal: &LegalActions) -> PlayerAction {
        let score = preflop_score(hole);
        let big_blind = table.blind_level().big;

        if legal.to_call == 0 {
            if score >= PREFLOP_RAISE_SCORE {
                if let Some(bounds) = legal.raise {
                    let target = bounds.min_to.max(big_blind * 3);
                    return PlayerAction::Raise(clamp_to_step(target, bounds));
                }
            }
            return check_or_fallback(legal);
        }

        if score >= PREFLOP_RAISE_SCORE {
            if let Some(bounds) = legal.raise {
                let target = table.current_bet() + table.last_raise_size().max(big_blind * 2);
                return PlayerAction::Raise(clamp_to_step(target, bounds));
            }
        }

        if score >= PREFLOP_CALL_SCORE && legal.contains(ActionKind::Call) {
            let pot_math = table.pot_math(seat);
            if pot_math.break_even_equity <= PREFLOP_MAX_BREAK_EVEN || pot_math.stack_to_pot >= PREFLOP_MIN_SPR {
                return PlayerAction::Call;
            }
        }
        fold_or_fallback(legal)
    }

    fn postflop(
        &self,
        table: &Table,
        advisory: &PlayerAdvisory,
        board: Option<&BoardAdvisory>,
        legal: &LegalActions,
    ) -> PlayerAction {
        let wet = board.is_some_and(BoardAdvisory::is_wet);
        let extra = if wet { POSTFLOP_WET_BOOST } else { 0.0 };
        let equity = advisory.strength_percentile / 100.0;
        let break_even = advisory.pot_math.break_even_equity;
        let pot = table.pot();

        if legal.to_call == 0 {
            if let Some(bounds) = legal.raise {
                if equity >= POSTFLOP_RAISE_STRONG_EQUITY - extra {
                    return PlayerAction::Raise(value_raise_to(pot, wet, bounds));
                }
                if equity >= POSTFLOP_PROBE_EQUITY + extra {
                    return PlayerAction::Raise(clamp_to_step(pot / 2, bounds));
                }
            }
            return check_or_fallback(legal);
        }

        if equity >= break_even + POSTFLOP_CALL_MARGIN + extra {
            if let Some(bounds) = legal.raise {
                if is_strong_made_hand(advisory) {
                    return PlayerAction::Raise(value_raise_to(pot, wet, bounds));
                }
                if is_strong_draw(advisory) {
                    return PlayerAction::Raise(clamp_to_step(pot + pot * 3 / 4, bounds));
                }
            }
            if legal.contains(ActionKind::Call) {
                return PlayerAction::Call;
            }
        } else if call_with_draw(advisory, extra) && legal.contains(ActionKind::Call) {
            return PlayerAction::Call;
        }
        fold_or_fallback(legal)
    }
}

impl BotPolicy for HeuristicBot {
    fn decide(&self, table: &Table, seat: usize) -> PlayerAction {
        let legal = table.legal_actions(seat);
        if legal.is_empty() {
            return PlayerAction::Check;
        }
        let Some(hole) = table.player(seat).ok().and_then(|p| p.hole()) else {
            return fold_or_fallback(&legal);
        };
        if table.community().len() < 3 {
            return self.preflop(table, seat, hole, &legal);
        }

        let advisory = match table.player(seat).ok().and_then(|p| p.advisory().cloned()) {
            Some(a) => Some(a),
            // analytics were not installed for this street; work them out here
            None => AdvisoryRequest {
                seat,
                street: table.street(),
                hole,
                community: table.community().to_vec(),
                pot_math: table.pot_math(seat),
            }
            .compute()
            .ok()
            .flatten(),
        };
        match advisory {
            Some(advisory) => self.postflop(table, &advisory, table.board_advisory(), &legal),
            None => check_or_fallback(&legal),
        }
    }

    fn name(&self) -> &str {
        "HeuristicBot"
    }
}

/// Preflop hand score; pocket aces score 106, seven-deuce offsuit 30.
pub fn preflop_score(hole: [Card; 2]) -> u32 {
    let a = u32::from(hole[0].rank.value());
    let b = u32::from(hole[1].rank.value());
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    let mut score = 4 * hi + lo;
    if hi == lo {
        score += 40 + 2 * (hi - 2);
    } else {
        match hi - lo - 1 {
            0 => score += 8,
            1 => score += 4,
            _ => {}
        }
    }
    if hole[0].suit == hole[1].suit {
        score += 10;
    }
    if lo >= 10 {
        score += 10;
    }
    score
}

fn is_strong_made_hand(a: &PlayerAdvisory) -> bool {
    a.category() >= Category::TwoPair
}

fn is_strong_draw(a: &PlayerAdvisory) -> bool {
    a.flush_draw == FlushDraw::FourFlush || a.straight_draw == StraightDraw::OpenEnded
}

fn call_with_draw(a: &PlayerAdvisory, extra: f64) -> bool {
    is_strong_draw(a) || (a.overcards >= 1 && a.pot_math.break_even_equity < OVERCARD_MAX_BREAK_EVEN + extra)
}

fn value_raise_to(pot: u32, wet: bool, bounds: RaiseBounds) -> u32 {
    let sizing = if wet { pot * 9 / 10 } else { pot * 13 / 20 };
    clamp_to_step(pot + sizing, bounds)
}

/// Rounds to the nearest chip step, then forces the amount into the legal range.
fn clamp_to_step(target: u32, bounds: RaiseBounds) -> u32 {
    let target = target.max(bounds.min_to);
    let rounded = (target + CHIP_STEP / 2) / CHIP_STEP * CHIP_STEP;
    rounded.clamp(bounds.min_to, bounds.max_to)
}

fn check_or_fallback(legal: &LegalActions) -> PlayerAction {
    if legal.contains(ActionKind::Check) {
        PlayerAction::Check
    } else if legal.contains(ActionKind::Call) {
        PlayerAction::Call
    } else {
        PlayerAction::Fold
    }
}

fn fold_or_fallback(legal: &LegalActions) -> PlayerAction {
    if legal.contains(ActionKind::Check) {
        PlayerAction::Check
    } else if legal.contains(ActionKind::Fold) {
        PlayerAction::Fold
    } else {
        PlayerAction::Call
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerroom_engine::cards::parse_cards;
    use pokerroom_engine::table::TableConfig;

    fn hole(s: &str) -> [Card; 2] {
        let v = parse_cards(s).unwrap();
        [v[0], v[1]]
    }

    fn is_legal(table: &Table, seat: usize, action: PlayerAction) -> bool {
        let legal = table.legal_actions(seat);
        match action {
            PlayerAction::Fold => legal.contains(ActionKind::Fold),
            PlayerAction::Check => legal.contains(ActionKind::Check),
            PlayerAction::Call => legal.contains(ActionKind::Call),
            PlayerAction::Raise(to) => legal.raise.is_some_and(|b| (b.min_to..=b.max_to).contains(&to)),
        }
    }

    #[test]
    fn preflop_scores() {
        assert_eq!(preflop_score(hole("Ah Ad")), 4 * 14 + 14 + 40 + 24 + 10);
        assert_eq!(preflop_score(hole("Ah Kh")), 4 * 14 + 13 + 10 + 8 + 10);
        assert_eq!(preflop_score(hole("7h 2d")), 30);
        assert_eq!(preflop_score(hole("9s 7s")), 36 + 7 + 10 + 4);
        assert!(preflop_score(hole("Ks Kd")) >= PREFLOP_RAISE_SCORE);
        assert!(preflop_score(hole("Jh Tc")) >= PREFLOP_CALL_SCORE);
    }

    #[test]
    fn raise_targets_land_on_chip_steps_inside_bounds() {
        let bounds = RaiseBounds {
            min_to: 200,
            max_to: 1_234,
        };
        assert_eq!(clamp_to_step(50, bounds), 200);
        assert_eq!(clamp_to_step(304, bounds), 300);
        assert_eq!(clamp_to_step(305, bounds), 310);
        assert_eq!(clamp_to_step(5_000, bounds), 1_234);
        assert_eq!(value_raise_to(200, false, bounds), 330);
        assert_eq!(value_raise_to(200, true, bounds), 380);
    }

    #[test]
    fn bot_only_plays_legal_actions_through_many_hands() {
        let bot = HeuristicBot::new();
        let mut table = Table::new(TableConfig::new(4).with_seed(99)).unwrap();
        for _ in 0..30 {
            if table.start_hand().is_err() {
                break;
            }
            while table.is_hand_in_progress() {
                if let Some(seat) = table.current_seat() {
                    let action = bot.decide(&table, seat);
                    assert!(is_legal(&table, seat, action), "{:?} illegal for seat {}", action, seat);
                    table.apply_action(seat, action).unwrap();
                } else if table.is_round_complete() {
                    table.advance_street().unwrap();
                    table.refresh_advisories().unwrap();
                } else {
                    table.showdown().unwrap();
                }
            }
            let chips: u32 = table.players().iter().map(|p| p.stack()).sum();
            assert_eq!(chips, 20_000);
        }
    }

    #[test]
    fn no_legal_actions_means_check() {
        let bot = HeuristicBot::new();
        let table = Table::new(TableConfig::new(2)).unwrap();
        assert_eq!(bot.decide(&table, 0), PlayerAction::Check);
    }
}
