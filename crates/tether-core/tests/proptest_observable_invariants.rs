//! Property-based invariant tests for `ObservableValue`.
//!
//! Random operation sequences are applied to an observable and to a plain
//! model of its listener list. After every step:
//!
//! 1. Each listener has received exactly the values the model predicts,
//!    in order (registration-order delivery, once per `set`).
//! 2. `bind_and_replay` delivers the current value immediately;
//!    `add_listener` delivers nothing until the next `set`.
//! 3. Equal values are delivered again (no dedup).
//! 4. After `dispose_all` no earlier listener receives anything.
//! 5. `get()` returns the last value set.
//! 6. `version()` equals the number of `set` calls.
//! 7. `listener_count()` matches the model.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use tether_core::{ListenerId, ObservableValue};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Set(u8),
    Add,
    Bind,
    Remove(usize),
    DisposeAll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..4).prop_map(Op::Set),
        2 => Just(Op::Add),
        2 => Just(Op::Bind),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::DisposeAll),
    ]
}

// ── Model ─────────────────────────────────────────────────────────────────

/// One registration: what it actually received and what it should have.
struct Tracked {
    id: ListenerId,
    received: Rc<RefCell<Vec<u8>>>,
    expected: Vec<u8>,
    live: bool,
}

fn register(
    obs: &ObservableValue<u8>,
    replay: bool,
    order: &Rc<RefCell<Vec<usize>>>,
    slot: usize,
) -> Tracked {
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let order = Rc::clone(order);
    let listener = move |v: &u8| {
        sink.borrow_mut().push(*v);
        order.borrow_mut().push(slot);
    };
    let id = if replay {
        obs.bind_and_replay(listener)
    } else {
        obs.add_listener(listener)
    };
    Tracked {
        id,
        received,
        expected: Vec::new(),
        live: true,
    }
}

proptest! {
    #[test]
    fn ops_match_model(
        initial in any::<u8>(),
        ops in proptest::collection::vec(op_strategy(), 0..64),
    ) {
        let obs = ObservableValue::new(initial);
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut tracked: Vec<Tracked> = Vec::new();
        let mut current = initial;
        let mut sets = 0u64;

        for op in ops {
            order.borrow_mut().clear();
            match op {
                Op::Set(v) => {
                    obs.set(v);
                    current = v;
                    sets += 1;
                    for t in tracked.iter_mut().filter(|t| t.live) {
                        t.expected.push(v);
                    }
                    let live_slots: Vec<usize> = tracked
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.live)
                        .map(|(i, _)| i)
                        .collect();
                    prop_assert_eq!(&*order.borrow(), &live_slots);
                }
                Op::Add => {
                    let slot = tracked.len();
                    tracked.push(register(&obs, false, &order, slot));
                }
                Op::Bind => {
                    let slot = tracked.len();
                    let mut t = register(&obs, true, &order, slot);
                    t.expected.push(current);
                    tracked.push(t);
                }
                Op::Remove(pick) => {
                    if !tracked.is_empty() {
                        let idx = pick % tracked.len();
                        let t = &mut tracked[idx];
                        prop_assert_eq!(obs.remove_listener(t.id), t.live);
                        t.live = false;
                    }
                }
                Op::DisposeAll => {
                    obs.dispose_all();
                    for t in &mut tracked {
                        t.live = false;
                    }
                }
            }

            for t in &tracked {
                prop_assert_eq!(&*t.received.borrow(), &t.expected);
            }
            prop_assert_eq!(obs.get(), current);
            prop_assert_eq!(obs.version(), sets);
            prop_assert_eq!(obs.listener_count(), tracked.iter().filter(|t| t.live).count());
        }
    }

    #[test]
    fn repeated_equal_sets_all_delivered(value in any::<u8>(), repeats in 1usize..16) {
        let obs = ObservableValue::new(value);
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        obs.add_listener(move |_| *sink.borrow_mut() += 1);

        for _ in 0..repeats {
            obs.set(value);
        }
        prop_assert_eq!(*count.borrow(), repeats);
    }

    #[test]
    fn listener_ids_are_unique(adds in 1usize..32, dispose_every in 1usize..8) {
        let obs = ObservableValue::new(0u8);
        let mut ids = Vec::with_capacity(adds);
        for i in 0..adds {
            ids.push(obs.add_listener(|_| {}));
            if i % dispose_every == 0 {
                obs.dispose_all();
            }
        }
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn late_registrations_skip_current_pass(listeners in 1usize..8, value in any::<u8>()) {
        let obs = ObservableValue::new(0u8);
        let late_calls = Rc::new(RefCell::new(0usize));

        for _ in 0..listeners {
            let handle = obs.clone();
            let late_calls = Rc::clone(&late_calls);
            obs.add_listener(move |_| {
                let late_calls = Rc::clone(&late_calls);
                handle.add_listener(move |_| *late_calls.borrow_mut() += 1);
            });
        }

        obs.set(value);
        prop_assert_eq!(*late_calls.borrow(), 0);
        prop_assert_eq!(obs.listener_count(), listeners * 2);
    }
}
