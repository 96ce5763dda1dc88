use std::cell::{Cell, RefCell};
use std::rc::Rc;

use transition_group::{
    Container, Done, Rendered, TransitionChild, TransitionEvent, TransitionGroup,
    TransitionGroupConfig, ViewSwitcher,
};

const FRAME_MILLIS: u64 = 16;
const FADE_FRAMES: u32 = 4;
const SLIDE_FRAMES: u32 = 6;

/// Selected view index, and how many frames to run before the next selection
/// (`None` runs until every animation settled).
const SCRIPT: &[(usize, Option<u32>)] = &[
    (0, None),
    (1, None),
    (2, Some(3)),
    (0, Some(2)),
    (2, None),
];

struct Animation {
    label: String,
    frames_left: u32,
    done: Done<&'static str>,
}

/// Frame-stepped animations shared by every panel.
#[derive(Clone, Default)]
struct Animator {
    running: Rc<RefCell<Vec<Animation>>>,
}

impl Animator {
    fn start(&self, label: String, frames: u32, done: Done<&'static str>) {
        log::debug!("start {label} ({frames} frames)");
        self.running.borrow_mut().push(Animation {
            label,
            frames_left: frames,
            done,
        });
    }

    /// Advances every animation by one frame and completes the finished ones.
    fn tick(&self) {
        let finished: Vec<Animation> = {
            let mut running = self.running.borrow_mut();
            for animation in running.iter_mut() {
                animation.frames_left = animation.frames_left.saturating_sub(1);
            }
            let (finished, still_running): (Vec<_>, Vec<_>) =
                running.drain(..).partition(|animation| animation.frames_left == 0);
            *running = still_running;
            finished
        };
        for animation in finished {
            log::debug!("finish {}", animation.label);
            animation.done.complete();
        }
    }

    fn is_idle(&self) -> bool {
        self.running.borrow().is_empty()
    }
}

#[derive(Clone)]
struct Panel {
    title: &'static str,
    animator: Animator,
}

impl TransitionChild<&'static str> for Panel {
    fn will_appear(&self, done: Done<&'static str>) {
        self.animator
            .start(format!("{} fade in", self.title), FADE_FRAMES, done);
    }

    fn will_enter(&self, done: Done<&'static str>) {
        self.animator
            .start(format!("{} slide in", self.title), SLIDE_FRAMES, done);
    }

    fn will_leave(&self, done: Done<&'static str>) {
        self.animator
            .start(format!("{} slide out", self.title), SLIDE_FRAMES, done);
    }

    fn did_stay(&self) {
        log::debug!("{} stays on screen", self.title);
    }
}

fn print_frame(frame: u64, rendered: &Rendered<&'static str, String>) {
    let children: Vec<&str> = rendered
        .children
        .iter()
        .map(|child| child.value.as_str())
        .collect();
    println!(
        "{:>5}ms | {}: {}",
        frame * FRAME_MILLIS,
        rendered.container.name(),
        children.join(" ")
    );
}

fn main() {
    env_logger::init();

    println!("=== Transition Group View Switcher ===");
    println!("Panels slide in and out while the selection changes,");
    println!("including selections made before the previous switch settled.");
    println!();

    let animator = Animator::default();
    let panels = ["home", "movies", "settings"].map(|title| {
        (
            title,
            Panel {
                title,
                animator: animator.clone(),
            },
        )
    });

    let config = TransitionGroupConfig::new(|panel: &Panel| format!("[{}]", panel.title))
        .with_container(Container::named("view-manager"))
        .with_transition_listener(|event: &TransitionEvent<&'static str>| {
            log::info!("{:?} finished for {}", event.kind, event.key);
        });
    let group = match TransitionGroup::new(config) {
        Ok(group) => group,
        Err(err) => {
            log::error!("failed to create transition group: {err}");
            return;
        }
    };

    let needs_render = Rc::new(Cell::new(false));
    group.set_invalidation_callback({
        let needs_render = Rc::clone(&needs_render);
        move || needs_render.set(true)
    });

    let mut switcher = ViewSwitcher::new(group.clone(), panels);
    let mut frame = 0u64;
    for &(index, budget) in SCRIPT {
        if let Err(err) = switcher.select(index) {
            log::error!("failed to select view {index}: {err}");
            continue;
        }
        println!("-- select {:?}", switcher.selected_key());

        let mut remaining = budget;
        loop {
            if needs_render.replace(false) {
                print_frame(frame, &group.render());
            }
            let exhausted = matches!(remaining, Some(0));
            if exhausted || animator.is_idle() {
                break;
            }
            animator.tick();
            frame += 1;
            remaining = remaining.map(|frames| frames - 1);
        }
    }

    if let Err(err) = switcher.clear() {
        log::error!("failed to clear views: {err}");
    }
    while !animator.is_idle() {
        animator.tick();
        frame += 1;
    }
    print_frame(frame, &group.render());
    group.dispose();
}
