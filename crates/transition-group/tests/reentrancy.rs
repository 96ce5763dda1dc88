use std::cell::RefCell;
use std::rc::Rc;

use transition_group::{Done, TransitionChild, TransitionGroup, TransitionGroupConfig};

type Log = Rc<RefCell<Vec<String>>>;
type Slot = Rc<RefCell<Option<TransitionGroup<&'static str, Scene>>>>;

/// A child that can push a new desired collection from inside its hooks.
#[derive(Clone)]
struct Scene {
    name: &'static str,
    log: Log,
    group: Slot,
    on_enter: Option<Vec<&'static str>>,
    after_leave: Option<Vec<&'static str>>,
}

impl Scene {
    fn new(name: &'static str, log: &Log, group: &Slot) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            group: Rc::clone(group),
            on_enter: None,
            after_leave: None,
        }
    }

    fn push(&self, keys: &[&'static str]) {
        let group = self.group.borrow().clone().expect("group installed");
        let children: Vec<_> = keys
            .iter()
            .map(|&key| (key, Scene::new(key, &self.log, &self.group)))
            .collect();
        group.update_desired_children(children).expect("nested update");
    }
}

impl TransitionChild<&'static str> for Scene {
    fn will_enter(&self, done: Done<&'static str>) {
        self.log.borrow_mut().push(format!("will enter {}", self.name));
        if let Some(keys) = &self.on_enter {
            self.push(keys);
        }
        done.complete();
    }

    fn did_enter(&self) {
        self.log.borrow_mut().push(format!("entered {}", self.name));
    }

    fn did_leave(&self) {
        self.log.borrow_mut().push(format!("left {}", self.name));
        if let Some(keys) = &self.after_leave {
            self.push(keys);
        }
    }
}

fn setup() -> (TransitionGroup<&'static str, Scene>, Log, Slot) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let slot: Slot = Rc::new(RefCell::new(None));
    let group = TransitionGroup::new(TransitionGroupConfig::default().with_size(3)).expect("group");
    *slot.borrow_mut() = Some(group.clone());
    (group, log, slot)
}

#[test]
fn leave_completion_may_push_a_new_collection() {
    let (group, log, slot) = setup();
    let mut first = Scene::new("a", &log, &slot);
    first.after_leave = Some(vec!["b"]);
    group.update_desired_children([("a", first)]).expect("mount");

    group.update_desired_children(Vec::new()).expect("leave");

    assert_eq!(group.tracked_keys(), vec!["b"]);
    assert_eq!(
        *log.borrow(),
        vec!["left a", "will enter b", "entered b"]
    );
    slot.borrow_mut().take();
}

#[test]
fn nested_update_from_a_hook_settles_on_latest_collection() {
    let (group, log, slot) = setup();
    group
        .update_desired_children([("a", Scene::new("a", &log, &slot))])
        .expect("mount");

    let mut b = Scene::new("b", &log, &slot);
    b.on_enter = Some(vec!["a"]);
    let c = Scene::new("c", &log, &slot);
    group
        .update_desired_children([("a", Scene::new("a", &log, &slot)), ("b", b), ("c", c)])
        .expect("update");

    assert_eq!(group.tracked_keys(), vec!["a"]);
    assert!(group.in_flight_keys().is_empty());
    let log = log.borrow();
    assert!(log.contains(&"left b".to_string()));
    assert!(log.contains(&"left c".to_string()));
    slot.borrow_mut().take();
}

/// A child that finishes its parked transition when it is dropped.
struct Flushing {
    parked: RefCell<Option<Done<u8>>>,
}

impl Flushing {
    fn new() -> Self {
        Self {
            parked: RefCell::new(None),
        }
    }
}

impl TransitionChild<u8> for Flushing {
    fn will_enter(&self, done: Done<u8>) {
        *self.parked.borrow_mut() = Some(done);
    }
}

impl Drop for Flushing {
    fn drop(&mut self) {
        if let Some(done) = self.parked.borrow_mut().take() {
            done.complete();
        }
    }
}

#[test]
fn children_may_complete_from_drop_when_evicted_or_disposed() {
    let group = TransitionGroup::new(TransitionGroupConfig::new(|_: &Flushing| ()).with_size(1))
        .expect("group");
    group.update_desired_children([(1u8, Flushing::new())]).expect("mount");
    group.update_desired_children([(2u8, Flushing::new())]).expect("enter 2");
    assert!(group.is_in_flight(&2));

    group.update_desired_children([(3u8, Flushing::new())]).expect("enter 3");
    assert_eq!(group.tracked_keys(), vec![3]);
    assert!(group.is_in_flight(&3));

    group.dispose();
    assert!(group.is_empty());
}
