//! The set of live creatures and the routing of frame work to them.

use stage_engine::{Cue, DragEvent};

use super::{Creature, CreatureEnv};

#[derive(Debug, Default)]
pub struct Herd {
    creatures: Vec<Creature>,
}

impl Herd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, creature: Creature) {
        self.creatures.push(creature);
    }

    pub fn get(&self, id: u32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    /// Creatures that have not been destroyed yet.
    pub fn active_count(&self) -> usize {
        self.creatures.iter().filter(|c| !c.is_destroyed()).count()
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Hand a drag event to the creature owning the binding.
    pub fn route_drag(&mut self, event: DragEvent, env: &mut CreatureEnv) {
        let binding = event.binding();
        let Some(creature) = self.creatures.iter_mut().find(|c| c.binding() == binding) else {
            return;
        };
        if let Err(err) = creature.on_drag(event, env) {
            log::warn!("{}", err);
        }
    }

    /// Run the registered frame ticks in registration order.
    pub fn run_ticks(&mut self, env: &mut CreatureEnv) {
        for (id, tick) in env.ticker.snapshot() {
            // An earlier tick this frame may have ended this one.
            if !env.ticker.contains(id) {
                continue;
            }
            let Some(creature) = self.creatures.iter_mut().find(|c| c.id() == id) else {
                continue;
            };
            if let Some(next) = tick(creature, env) {
                if let Err(err) = creature.transition(next, env) {
                    log::warn!("{}", err);
                }
            }
        }
    }

    /// Hand a timeline cue to its owner. Returns false if no creature owns it.
    pub fn route_cue(&mut self, cue: Cue, env: &mut CreatureEnv) -> bool {
        let Some(creature) = self.creatures.iter_mut().find(|c| c.id() == cue.owner) else {
            return false;
        };
        if let Err(err) = creature.on_cue(cue, env) {
            log::warn!("{}", err);
        }
        true
    }

    /// Remove and return every destroyed creature.
    pub fn take_departed(&mut self) -> Vec<Creature> {
        let (gone, kept): (Vec<Creature>, Vec<Creature>) = std::mem::take(&mut self.creatures)
            .into_iter()
            .partition(|c| c.is_destroyed());
        self.creatures = kept;
        gone
    }
}
