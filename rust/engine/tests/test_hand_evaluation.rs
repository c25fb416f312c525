use pokerroom_engine::cards::{parse_cards, Card};
use pokerroom_engine::hand::{best_five, evaluate, evaluate_cards, Category, HandValue};

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

fn value(hole: &str, board: &str) -> HandValue {
    evaluate(&cards(hole), &cards(board)).unwrap()
}

#[test]
fn detects_royal_flush() {
    let hs = value("Ah Kh", "Qh Jh Th 2c 3d");
    assert_eq!(hs.category, Category::StraightFlush);
    assert_eq!(hs.keys[0], 14);
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = value("Ah 2d", "3c 4s 5h 9d Kc");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.keys[0], 5);
    let six_high = value("6h 2d", "3c 4s 5h 9d Kc");
    assert_eq!(six_high.category, Category::Straight);
    assert!(wheel < six_high);
}

#[test]
fn steel_wheel_is_a_five_high_straight_flush() {
    let v = value("Ad 2d", "3d 4d 5d Kc Qs");
    assert_eq!(v.category, Category::StraightFlush);
    assert_eq!(v.keys[0], 5);
}

#[test]
fn category_ordering_is_correct() {
    let quads = value("Ac Ad", "Ah As Kc Qd 2h");
    let full_house = value("Kc Kd", "Kh Qc Qd 2h 3s");
    let flush = value("2s 9s", "Js Qs 4s Kd Kh");
    let straight = value("5c 6h", "7c 8h 9d 2s 3c");
    let trips = value("Qc Qh", "Qd 2s 3c 4h 9d");
    assert!(quads > full_house);
    assert!(full_house > flush);
    assert!(flush > straight);
    assert!(straight > trips);
}

#[test]
fn kicker_breaks_pair_ties() {
    let a = value("Ah Kd", "As 9c 7d 4h 2s");
    let b = value("Ac Qd", "As 9c 7d 4h 2s");
    assert_eq!(a.category, Category::OnePair);
    assert!(a > b);
}

#[test]
fn board_plays_is_a_tie() {
    let board = "Ts Js Qd Kc Ah";
    assert_eq!(value("2c 3d", board), value("4h 5s", board));
}

#[test]
fn flush_uses_top_five_suited() {
    let v = value("2h 3h", "Ah Kh 9h 7h 5c");
    assert_eq!(v.category, Category::Flush);
    assert_eq!(v.keys, [14, 13, 9, 7, 3]);
}

#[test]
fn ordering_is_total_and_deterministic() {
    let hands = [
        value("Ah Kd", "As 9c 7d 4h 2s"),
        value("2c 3d", "Ts Js Qd Kc Ah"),
        value("7c 7d", "7h 2s 2c 9d Jd"),
        value("8c 9c", "Tc Jc Qc 2d 3h"),
        value("Kh 2d", "9s 7c 5d 4h 3c"),
    ];
    for a in &hands {
        assert_eq!(a.cmp(a), std::cmp::Ordering::Equal);
        for b in &hands {
            assert_eq!(a.cmp(b), b.cmp(a).reverse());
            for c in &hands {
                if a < b && b < c {
                    assert!(a < c);
                }
            }
        }
    }
    let seven = cards("Ah Kd As 9c 7d 4h 2s");
    assert_eq!(evaluate_cards(&seven).unwrap(), evaluate_cards(&seven).unwrap());
}

#[test]
fn duplicate_cards_are_rejected() {
    assert!(evaluate(&cards("Ah Kd"), &cards("Ah 9c 7d")).is_err());
}

#[test]
fn best_five_realises_the_value() {
    let hole = cards("Qs Qd");
    let board = cards("Qh 5c 5d 2s 9h");
    let five = best_five(&hole, &board).unwrap();
    assert_eq!(evaluate_cards(&five).unwrap(), evaluate(&hole, &board).unwrap());
    assert_eq!(evaluate_cards(&five).unwrap().category, Category::FullHouse);
}
