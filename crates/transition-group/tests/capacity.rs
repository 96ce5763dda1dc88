use transition_group::{Phase, TransitionKind};
use transition_group_testing::{call, GroupHarness, Hook};

#[test]
fn growing_past_capacity_hard_drops_the_oldest_child() {
    let harness = GroupHarness::new(2);
    harness.update(&["a", "b"]).expect("mount");
    harness.take_calls();

    harness.update(&["a", "b", "c"]).expect("update");

    // "a" is evicted without any hook; "b" stays and "c" enters.
    assert_eq!(
        harness.take_calls(),
        vec![
            call("c", Hook::WillEnter),
            call("c", Hook::DidEnter),
            call("b", Hook::WillStay),
            call("b", Hook::DidStay),
        ]
    );
    assert_eq!(harness.tracked(), vec!["b", "c"]);
    assert_eq!(harness.phase(&"a"), None);
}

#[test]
fn hard_drop_clears_in_flight_state_without_notifying_the_child() {
    let harness = GroupHarness::new(2);
    harness.update(&["a"]).expect("mount");
    harness.defer(TransitionKind::Enter);

    harness.update(&["a", "b"]).expect("enter b");
    assert!(harness.group().is_in_flight(&"b"));

    harness.update(&["a", "b", "c"]).expect("enter c");
    assert_eq!(harness.tracked(), vec!["b", "c"]);
    assert_eq!(
        harness.hooks_for(&"a"),
        vec![
            Hook::WillAppear,
            Hook::DidAppear,
            Hook::WillStay,
            Hook::DidStay
        ]
    );

    harness.update(&["b", "c", "d"]).expect("enter d");
    assert_eq!(harness.tracked(), vec!["c", "d"]);
    assert!(!harness.group().is_in_flight(&"b"));

    // The dropped child's completion arrives late and changes nothing.
    assert!(harness.complete(&"b", TransitionKind::Enter));
    assert_eq!(harness.hooks_for(&"b"), vec![Hook::WillEnter]);
    assert_eq!(harness.tracked(), vec!["c", "d"]);
}

#[test]
fn hard_drop_of_a_leaving_child_skips_did_leave() {
    let harness = GroupHarness::new(2);
    harness.update(&["a", "b"]).expect("mount");
    harness.defer(TransitionKind::Leave);

    harness.update(&["b"]).expect("leave a");
    assert_eq!(harness.phase(&"a"), Some(Phase::Leaving));

    harness.update(&["b", "c"]).expect("enter c");
    assert_eq!(harness.tracked(), vec!["b", "c"]);

    assert!(harness.complete(&"a", TransitionKind::Leave));
    assert!(!harness.hooks_for(&"a").contains(&Hook::DidLeave));
}

#[test]
fn tracked_length_never_exceeds_capacity() {
    let sequences: [&[&str]; 8] = [
        &["a"],
        &["a", "b", "c"],
        &["d"],
        &["d", "e", "f", "g"],
        &[],
        &["a", "a", "b"],
        &["h", "i"],
        &["i", "h", "j"],
    ];

    for size in 1..=3 {
        let harness = GroupHarness::new(size);
        harness.defer(TransitionKind::Leave);
        for (step, keys) in sequences.iter().enumerate() {
            harness.update(keys).expect("update");
            assert!(
                harness.tracked().len() <= size,
                "size {size} exceeded at step {step}: {:?}",
                harness.tracked()
            );
            if step % 2 == 0 {
                harness.complete_all(TransitionKind::Leave);
            }
        }
    }
}

#[test]
fn default_size_keeps_one_child_entering_and_one_leaving() {
    let harness = GroupHarness::new(transition_group::DEFAULT_SIZE);
    harness.update(&["home"]).expect("mount");
    harness.defer(TransitionKind::Enter);
    harness.defer(TransitionKind::Leave);

    harness.update(&["settings"]).expect("switch");
    assert_eq!(harness.tracked(), vec!["home", "settings"]);
    assert_eq!(harness.phase(&"home"), Some(Phase::Leaving));
    assert_eq!(harness.phase(&"settings"), Some(Phase::Entering));

    // A third view arriving mid-switch pushes out the leaving one.
    harness.update(&["search"]).expect("switch again");
    assert_eq!(harness.tracked(), vec!["settings", "search"]);
    assert_eq!(
        harness.group().in_flight_keys(),
        vec!["settings", "search"]
    );
}

#[test]
fn staying_children_keep_their_relative_order() {
    let harness = GroupHarness::new(4);
    harness.update(&["a", "b", "c"]).expect("mount");

    harness.update(&["c", "b", "a"]).expect("reorder");
    assert_eq!(harness.rendered_keys(), vec!["a", "b", "c"]);

    harness.update(&["x", "c", "a"]).expect("insert");
    assert_eq!(harness.rendered_keys(), vec!["a", "c", "x"]);
}

#[test]
fn stay_completion_after_drop_and_re_add_is_ignored() {
    let harness = GroupHarness::new(1);
    harness.update(&["a"]).expect("mount");
    harness.defer(TransitionKind::Stay);

    harness.update(&["a"]).expect("stay");
    harness.update(&["b"]).expect("drop a");
    harness.update(&["a"]).expect("re-add a");
    assert_eq!(harness.tracked(), vec!["a"]);

    assert!(harness.complete(&"a", TransitionKind::Stay));
    assert_eq!(
        harness.hooks_for(&"a"),
        vec![
            Hook::WillAppear,
            Hook::DidAppear,
            Hook::WillStay,
            Hook::WillEnter,
            Hook::DidEnter
        ]
    );
}

#[test]
fn oversized_desired_collection_rotates_on_repeated_updates() {
    let harness = GroupHarness::new(2);
    harness.update(&["a", "b", "c"]).expect("mount");
    assert_eq!(harness.tracked(), vec!["b", "c"]);
    harness.take_calls();

    // The same collection again: the untracked "a" is merged at the tail and
    // the oldest tracked child is evicted to make room for it.
    harness.update(&["a", "b", "c"]).expect("repeat");
    assert_eq!(harness.tracked(), vec!["c", "a"]);
    assert_eq!(
        harness.take_calls(),
        vec![
            call("a", Hook::WillEnter),
            call("a", Hook::DidEnter),
            call("c", Hook::WillStay),
            call("c", Hook::DidStay),
        ]
    );

    harness.update(&["a", "b", "c"]).expect("repeat again");
    assert_eq!(harness.tracked(), vec!["a", "b"]);
}
