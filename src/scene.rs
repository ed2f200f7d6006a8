//! Scene stack with deferred transitions.
//!
//! Scenes request push/pop/change while the stack is mid-traversal; the
//! requests are queued and applied at a barrier after the update pass, so
//! the entry currently executing is never invalidated under its own feet.

/// Capability set a scene must provide. The stack never needs concrete
/// identity, only dispatch.
pub trait Scene {
    /// Reacts to edge-triggered input (key presses, menu choices). Runs
    /// once per tick on the top entry, before `update`.
    fn handle_input(&mut self, requests: &mut SceneRequests);

    /// Advances the scene by one fixed tick. Top entry only.
    fn update(&mut self, dt: f32, requests: &mut SceneRequests);

    /// Draws the scene. The whole stack renders bottom-to-top, so a pause
    /// overlay leaves the gameplay underneath visible.
    fn render(&self);
}

/// A staged stack mutation.
pub enum Transition {
    /// Push a new top entry.
    Push(Box<dyn Scene>),
    /// Remove the top entry.
    Pop,
    /// Pop the top entry, then push the replacement.
    Change(Box<dyn Scene>),
    /// Drop the whole stack, then push a single entry.
    ClearAndPush(Box<dyn Scene>),
}

/// Transition queue handed to scenes during input/update. Mutations land
/// here and are applied later by the stack.
#[derive(Default)]
pub struct SceneRequests {
    pending: Vec<Transition>,
    quit: bool,
}

impl SceneRequests {
    /// Stages a push of `scene` on top of the stack.
    pub fn push_scene(&mut self, scene: Box<dyn Scene>) {
        self.pending.push(Transition::Push(scene));
    }

    /// Stages removal of the top entry.
    pub fn pop_scene(&mut self) {
        self.pending.push(Transition::Pop);
    }

    /// Stages replacement of the top entry with `scene`.
    pub fn change_scene(&mut self, scene: Box<dyn Scene>) {
        self.pending.push(Transition::Change(scene));
    }

    /// Stages a full reset of the stack to just `scene`.
    pub fn clear_and_push(&mut self, scene: Box<dyn Scene>) {
        self.pending.push(Transition::ClearAndPush(scene));
    }

    /// Asks the runner to shut down after this frame.
    pub fn quit(&mut self) {
        self.quit = true;
    }
}

/// Owns the scene sequence and its pending transitions.
#[derive(Default)]
pub struct SceneStack {
    scenes: Vec<Box<dyn Scene>>,
    requests: SceneRequests,
}

impl SceneStack {
    /// Stack holding one initial scene.
    pub fn new(initial: Box<dyn Scene>) -> Self {
        SceneStack {
            scenes: vec![initial],
            requests: SceneRequests::default(),
        }
    }

    /// True once every scene has been popped; the runner exits then.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Number of stacked scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True after some scene requested shutdown.
    pub fn should_quit(&self) -> bool {
        self.requests.quit
    }

    /// One simulation tick: input then update on the top entry only, then
    /// the transition barrier.
    pub fn tick(&mut self, dt: f32) {
        if let Some(top) = self.scenes.last_mut() {
            top.handle_input(&mut self.requests);
            top.update(dt, &mut self.requests);
        }
        self.apply_pending();
    }

    /// Applies queued transitions in enqueue order. Called strictly outside
    /// the input/update pass that requested them.
    pub fn apply_pending(&mut self) {
        for transition in self.requests.pending.drain(..) {
            match transition {
                Transition::Push(scene) => self.scenes.push(scene),
                Transition::Pop => {
                    self.scenes.pop();
                }
                Transition::Change(scene) => {
                    self.scenes.pop();
                    self.scenes.push(scene);
                }
                Transition::ClearAndPush(scene) => {
                    self.scenes.clear();
                    self.scenes.push(scene);
                }
            }
        }
    }

    /// Renders every entry bottom-to-top.
    pub fn render(&self) {
        for scene in &self.scenes {
            scene.render();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Ev {
        Input(u32),
        Update(u32),
        Render(u32),
    }

    struct Probe {
        id: u32,
        log: Rc<RefCell<Vec<Ev>>>,
        on_update: Option<fn(&mut SceneRequests)>,
    }

    impl Probe {
        fn new(id: u32, log: &Rc<RefCell<Vec<Ev>>>) -> Box<Self> {
            Box::new(Probe {
                id,
                log: Rc::clone(log),
                on_update: None,
            })
        }
    }

    impl Scene for Probe {
        fn handle_input(&mut self, _requests: &mut SceneRequests) {
            self.log.borrow_mut().push(Ev::Input(self.id));
        }

        fn update(&mut self, _dt: f32, requests: &mut SceneRequests) {
            self.log.borrow_mut().push(Ev::Update(self.id));
            if let Some(f) = self.on_update.take() {
                f(requests);
            }
        }

        fn render(&self) {
            self.log.borrow_mut().push(Ev::Render(self.id));
        }
    }

    #[test]
    fn input_and_update_hit_top_entry_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = SceneStack::new(Probe::new(1, &log));
        stack.requests.push_scene(Probe::new(2, &log));
        stack.apply_pending();

        stack.tick(0.016);
        assert_eq!(&*log.borrow(), &[Ev::Input(2), Ev::Update(2)]);
    }

    #[test]
    fn render_walks_the_whole_stack_bottom_up() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = SceneStack::new(Probe::new(1, &log));
        stack.requests.push_scene(Probe::new(2, &log));
        stack.apply_pending();

        stack.render();
        assert_eq!(&*log.borrow(), &[Ev::Render(1), Ev::Render(2)]);
    }

    #[test]
    fn transitions_requested_mid_update_are_deferred_to_the_barrier() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut probe = Probe::new(1, &log);
        probe.on_update = Some(|requests| {
            requests.pop_scene();
        });
        let mut stack = SceneStack::new(probe);

        // The pop must not land while the scene is still executing; after
        // the barrier inside tick() the stack is empty.
        stack.tick(0.016);
        assert!(stack.is_empty());
        assert_eq!(&*log.borrow(), &[Ev::Input(1), Ev::Update(1)]);
    }

    #[test]
    fn transitions_apply_in_enqueue_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = SceneStack::new(Probe::new(1, &log));
        stack.requests.push_scene(Probe::new(2, &log));
        stack.requests.pop_scene();
        stack.requests.push_scene(Probe::new(3, &log));
        stack.apply_pending();

        assert_eq!(stack.len(), 2);
        stack.tick(0.016);
        // Top is the probe pushed last.
        assert!(log.borrow().contains(&Ev::Update(3)));
    }

    #[test]
    fn change_replaces_and_clear_and_push_resets() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = SceneStack::new(Probe::new(1, &log));
        stack.requests.change_scene(Probe::new(2, &log));
        stack.apply_pending();
        assert_eq!(stack.len(), 1);

        stack.requests.push_scene(Probe::new(3, &log));
        stack.requests.clear_and_push(Probe::new(4, &log));
        stack.apply_pending();
        assert_eq!(stack.len(), 1);

        stack.tick(0.016);
        assert!(log.borrow().contains(&Ev::Update(4)));
    }
}
