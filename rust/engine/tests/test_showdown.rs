use std::collections::BTreeMap;

use pokerroom_engine::cards::parse_cards;
use pokerroom_engine::hand::evaluate;
use pokerroom_engine::pot::PotManager;
use pokerroom_engine::showdown::{resolve, ShownHand};

fn shown(seat: usize, hole: &str, board: &str) -> ShownHand {
    let hole = parse_cards(hole).unwrap();
    let board = parse_cards(board).unwrap();
    ShownHand {
        seat,
        value: evaluate(&hole, &board).unwrap(),
        best_five: Vec::new(),
    }
}

const BOARD: &str = "2c 7d 9h Js 3s";

#[test]
fn short_stack_wins_only_the_main_pot() {
    let mut pm = PotManager::new();
    pm.add(0, 100);
    pm.add(1, 300);
    pm.add(2, 300);
    let hands = vec![
        shown(0, "Ac Ad", BOARD),
        shown(1, "Kc Kd", BOARD),
        shown(2, "Qc Qd", BOARD),
    ];
    let breakdown = pm.build_side_pots(|_| true);
    let result = resolve(hands, &breakdown, 0, 3).unwrap();

    assert_eq!(result.pots.len(), 2);
    assert_eq!(result.pots[0].winners, vec![0]);
    assert_eq!(result.pots[1].winners, vec![1]);
    assert_eq!(result.payouts, BTreeMap::from([(0, 300), (1, 400)]));
    assert_eq!(result.winners, vec![0, 1]);
}

#[test]
fn split_pot_gives_odd_chip_left_of_dealer() {
    let mut pm = PotManager::new();
    pm.add(0, 51);
    pm.add(1, 100);
    pm.add(2, 100);
    // seat 0 folded after committing 51
    let breakdown = pm.build_side_pots(|s| s != 0);
    let hands = vec![shown(1, "Ac 4d", BOARD), shown(2, "Ah 4c", BOARD)];
    let result = resolve(hands, &breakdown, 1, 3).unwrap();

    assert_eq!(result.pots[0].winners, vec![1, 2]);
    // dealer 1: seat 2 is first clockwise
    assert_eq!(result.pots[0].amount, 153);
    assert_eq!(result.payouts, BTreeMap::from([(1, 125), (2, 126)]));
    assert_eq!(result.payouts.values().sum::<u32>(), breakdown.total());
}

#[test]
fn result_serializes_for_transport() {
    let mut pm = PotManager::new();
    pm.add(0, 200);
    pm.add(1, 200);
    let hands = vec![shown(0, "Ac Ad", BOARD), shown(1, "Kc Kd", BOARD)];
    let result = resolve(hands, &pm.build_side_pots(|_| true), 0, 2).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["winners"], serde_json::json!([0]));
    assert_eq!(json["payouts"]["0"], 400);
}
