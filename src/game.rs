//! Fixed-timestep runner: wall-clock time accumulates into a lag counter
//! and whole ticks are consumed from it, so simulation dt never varies no
//! matter what the render frame rate does.

use macroquad::prelude::*;

use crate::scene::SceneStack;

/// Simulation tick length in seconds.
pub const TICK_DT: f32 = 1.0 / 60.0;

// After a long stall (window drag, debugger) catching up tick-by-tick
// would take longer than real time; past this many ticks the backlog is
// dropped instead.
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Lag accumulator turning variable frame times into whole fixed ticks.
#[derive(Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    /// Accumulator starting with zero lag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one frame's wall-clock time and returns how many fixed ticks
    /// to simulate. Leftover lag past the catch-up cap is discarded.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        let mut ticks = 0;
        while self.accumulator >= TICK_DT && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK_DT;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = 0.0;
        }
        ticks
    }
}

/// Drives the scene stack until it empties or a scene requests quit.
/// Renders once per real frame regardless of how many ticks ran.
pub async fn run(mut stack: SceneStack) {
    let mut timestep = FixedTimestep::new();

    loop {
        let ticks = timestep.advance(get_frame_time());
        for _ in 0..ticks {
            stack.tick(TICK_DT);
        }

        if stack.is_empty() || stack.should_quit() {
            break;
        }

        clear_background(BLACK);
        stack.render();
        next_frame().await;
    }
}
