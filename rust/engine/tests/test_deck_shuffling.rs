use std::collections::HashSet;

use pokerroom_engine::cards::Card;
use pokerroom_engine::deck::Deck;
use pokerroom_engine::errors::EngineFault;

#[test]
fn deck_reset_has_52_unique_cards() {
    let mut deck = Deck::new_with_seed(42);
    deck.reset();
    let mut set = HashSet::new();
    for i in 0..52 {
        let c = deck.draw().expect("should have 52 cards");
        assert!(set.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert_eq!(deck.draw(), Err(EngineFault::DeckUnderflow));
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    d1.shuffle();
    d2.shuffle();
    let a: Vec<Card> = d1.draw_many(10).unwrap();
    let b: Vec<Card> = d2.draw_many(10).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    d1.shuffle();
    d2.shuffle();
    assert_ne!(
        d1.draw_many(10).unwrap(),
        d2.draw_many(10).unwrap(),
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn reshuffle_restores_the_full_deck() {
    let mut deck = Deck::new_with_seed(9);
    deck.shuffle();
    deck.draw_many(20).unwrap();
    assert_eq!(deck.remaining(), 32);
    deck.shuffle();
    assert_eq!(deck.remaining(), 52);
    let all: HashSet<Card> = deck.draw_many(52).unwrap().into_iter().collect();
    assert_eq!(all.len(), 52);
}

#[test]
fn draw_many_past_the_end_takes_nothing() {
    let mut deck = Deck::new_with_seed(3);
    deck.shuffle();
    deck.draw_many(50).unwrap();
    assert_eq!(deck.draw_many(3), Err(EngineFault::DeckUnderflow));
    assert_eq!(deck.remaining(), 2);
}

#[test]
fn burn_and_deal_follow_holdem_procedure() {
    let mut deck = Deck::new_with_seed(777);
    deck.shuffle();

    let p1 = deck.draw_many(2).unwrap();
    let p2 = deck.draw_many(2).unwrap();
    deck.burn().unwrap();
    let flop = deck.draw_many(3).unwrap();
    deck.burn().unwrap();
    let turn = deck.draw().unwrap();
    deck.burn().unwrap();
    let river = deck.draw().unwrap();

    let mut set = HashSet::new();
    for c in p1.iter().chain(&p2).chain(&flop).chain([&turn, &river]) {
        assert!(set.insert(*c));
    }
    assert_eq!(deck.remaining(), 52 - 4 - 3 - 5);
}
