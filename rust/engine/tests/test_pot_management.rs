use pokerroom_engine::pot::{PotManager, Refund, SidePot};

#[test]
fn three_way_all_in_builds_two_side_pots() {
    let mut pm = PotManager::new();
    pm.add(0, 100);
    pm.add(1, 300);
    pm.add(2, 500);

    let b = pm.build_side_pots(|_| true);
    assert_eq!(
        b.pots,
        vec![
            SidePot {
                amount: 300,
                eligible: vec![0, 1, 2]
            },
            SidePot {
                amount: 400,
                eligible: vec![1, 2]
            },
        ]
    );
    assert_eq!(b.refund, Some(Refund { seat: 2, amount: 100 }));
    assert_eq!(b.total(), pm.total());
}

#[test]
fn equal_stacks_no_side_pot() {
    let mut pm = PotManager::new();
    pm.add(0, 1000);
    pm.add(1, 1000);
    let b = pm.build_side_pots(|_| true);
    assert_eq!(b.pots.len(), 1);
    assert_eq!(b.pots[0].amount, 2000);
}

#[test]
fn folded_top_contributor_is_not_eligible() {
    let mut pm = PotManager::new();
    pm.add(0, 200);
    pm.add(1, 600);
    pm.add(2, 600);
    let b = pm.build_side_pots(|s| s != 2);
    assert_eq!(b.pots[0].eligible, vec![0, 1]);
    assert_eq!(b.pots[1].eligible, vec![1]);
    assert_eq!(b.total(), 1400);
}

#[test]
fn reset_clears_commitments() {
    let mut pm = PotManager::new();
    pm.add(0, 50);
    pm.add(0, 50);
    assert_eq!(pm.committed(0), 100);
    pm.reset_all();
    assert_eq!(pm.total(), 0);
    assert!(pm.build_side_pots(|_| true).pots.is_empty());
}
