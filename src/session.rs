//! Session — the engine object that owns all mutable core state.
//!
//! The session is constructed and torn down by the caller; there are no
//! singletons. Everything runs on one logical thread: timer ticks, key
//! actions, and load completions are discrete events applied to completion,
//! so reads always see the last completed write.

use rand::rngs::StdRng;

use crate::catalog::EnemyCatalog;
use crate::input::Action;
use crate::layer::{DEFAULT_LAYER_1, DEFAULT_LAYER_2, LayerState, RANDOM_SPAN};
use crate::refresh::RefreshController;
use crate::sink::{RenderSink, SinkConfig};

/// What the application layer should do after an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    ToggleHud,
    Quit,
}

/// Read-only view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub layer1: i32,
    pub layer2: i32,
    pub refresh_seconds: u32,
    /// `None` while auto-refresh is suspended.
    pub countdown: Option<u64>,
    /// Enemy names resolved for the current background pair.
    pub enemies: Vec<String>,
    pub catalog_ready: bool,
    pub catalog_error: Option<String>,
}

pub struct Session<K: RenderSink> {
    layer1: LayerState,
    layer2: LayerState,
    refresh: RefreshController,
    catalog: EnemyCatalog,
    rng: StdRng,
    sink: K,
}

impl<K: RenderSink> Session<K> {
    pub fn new(catalog: EnemyCatalog, sink: K, rng: StdRng) -> Self {
        let mut session = Session {
            layer1: LayerState::new(DEFAULT_LAYER_1),
            layer2: LayerState::new(DEFAULT_LAYER_2),
            refresh: RefreshController::default(),
            catalog,
            rng,
            sink,
        };
        session.push_to_sink();
        session.sink.animate(true);
        session
    }

    pub fn catalog_mut(&mut self) -> &mut EnemyCatalog {
        &mut self.catalog
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Advance to `tick`; fires the refresh action on a cycle boundary.
    pub fn on_tick(&mut self, tick: u64) {
        if self.refresh.should_fire(tick) {
            self.refresh_layers(tick);
        }
    }

    /// Apply one input action. Every action is re-evaluated against current
    /// state here; nothing is captured between events.
    pub fn apply(&mut self, action: Action, tick: u64) -> Outcome {
        match action {
            Action::RandomizeBoth => self.refresh_layers(tick),
            Action::ZeroBoth => {
                self.layer1.zero();
                self.layer2.zero();
                self.push_to_sink();
            }
            Action::RandomizeLayer1 => {
                self.layer1.randomize(&mut self.rng, keyboard_extra(tick));
                self.push_to_sink();
            }
            Action::RandomizeLayer2 => {
                self.layer2.randomize(&mut self.rng, keyboard_extra(tick));
                self.push_to_sink();
            }
            Action::IntervalUp => self.refresh.adjust(1),
            Action::IntervalDown => self.refresh.adjust(-1),
            Action::ToggleRefresh => self.refresh.toggle(),
            Action::ShiftLayer1(delta) => {
                self.layer1.shift(delta);
                self.push_to_sink();
            }
            Action::ShiftLayer2(delta) => {
                self.layer2.shift(delta);
                self.push_to_sink();
            }
            Action::ToggleHud => return Outcome::ToggleHud,
            Action::Quit => return Outcome::Quit,
        }
        Outcome::Continue
    }

    pub fn snapshot(&self, tick: u64) -> Snapshot {
        Snapshot {
            layer1: self.layer1.value(),
            layer2: self.layer2.value(),
            refresh_seconds: self.refresh.interval(),
            countdown: self.refresh.countdown(tick),
            enemies: self
                .catalog
                .enemies_for_background_pair(self.layer1.value(), self.layer2.value()),
            catalog_ready: self.catalog.ready(),
            catalog_error: self.catalog.error(),
        }
    }

    /// The refresh action: assign the background pair of a random enemy
    /// group, or randomize both layers directly while the catalog is not
    /// usable.
    fn refresh_layers(&mut self, tick: u64) {
        match self.catalog.random_enemy_group(&mut self.rng) {
            Some(group) => {
                self.layer1.set(group.bg1);
                self.layer2.set(group.bg2);
            }
            None => {
                let extra = keyboard_extra(tick);
                self.layer1.randomize(&mut self.rng, extra);
                self.layer2.randomize(&mut self.rng, extra);
            }
        }
        self.push_to_sink();
    }

    fn push_to_sink(&mut self) {
        self.sink.configure(SinkConfig {
            layer1: self.layer1.value(),
            layer2: self.layer2.value(),
        });
    }
}

/// Manual and fallback randomization drift with session time.
fn keyboard_extra(tick: u64) -> i32 {
    (tick % RANDOM_SPAN as u64) as i32
}
