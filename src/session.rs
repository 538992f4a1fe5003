//! Combat Orchestrator
//!
//! `CombatSession` owns everything the combat core mutates: the player, the
//! spawned creatures, the session clock and the pending events. Input calls
//! (`attempt_cast`, `set_target`, `auto_attack`, ...) are handled one at a
//! time; `update` advances the world by one frame.
//!
//! Within a frame the order is fixed: the player's cast is advanced first,
//! then creature AI, then deaths are settled, then the player regenerates.
//! Casts that finish this frame therefore resolve before any new cast attempt
//! is validated against their cooldowns.

use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::abilities::{load_ability_catalog, AbilityCatalog, AbilityId, ABILITIES_PATH};
use crate::actor::{Actor, ActorRef, CreatureId};
use crate::classes::ClassId;
use crate::combat::events::{CombatEvent, CombatEventSink};
use crate::combat::{
    advance_cast, apply_damage, commit_cast, resolve, validate_cast, AbilityInvocation,
    CastOutcome, CastRejection, CastStart, CastState, CooldownTracker,
};
use crate::constants::SLOT_COUNT;
use crate::creatures::{
    default_spawns, tick_creature, AiContext, BehaviorRegistry, Creature, CreatureSpawn,
    CreatureTemplates,
};
use crate::items::ItemCatalog;
use crate::loot::{resolve_loot, LootDrop};
use crate::rng::GameRng;
use crate::talents::{TalentId, TalentRejection};
use crate::tuning::{CombatTuning, TUNING_PATH};

/// The player's combat state
#[derive(Clone, Debug)]
pub struct PlayerCharacter {
    pub name: String,
    pub class: ClassId,
    pub actor: Actor,
    /// Action bar, one ability per slot
    pub slots: [Option<AbilityId>; SLOT_COUNT],
    pub cooldowns: CooldownTracker,
    pub cast: Option<CastState>,
    pub target: Option<CreatureId>,
    pub gold: u32,
    pub inventory: Vec<String>,
    /// Equipment slot -> item id
    pub equipment: BTreeMap<String, String>,
    pub experience: u32,
    pub talents: BTreeSet<TalentId>,
    pub last_attack_at: Option<f32>,
    /// Last cast, swing or hit taken
    pub last_combat_at: Option<f32>,
    health_regen_timer: f32,
}

impl PlayerCharacter {
    /// A fresh character with the class's stats, starter bar and loadout
    pub fn new(name: &str, class: ClassId, tuning: &CombatTuning) -> Self {
        let stats = class.base_stats();
        let loadout = class.starter_loadout();

        let mut slots = [None; SLOT_COUNT];
        for (slot, ability) in slots.iter_mut().zip(class.starter_abilities()) {
            *slot = Some(*ability);
        }

        Self {
            name: name.to_string(),
            class,
            actor: Actor::new(stats.health, stats.mana, stats.attack_damage, Vec3::ZERO),
            slots,
            cooldowns: CooldownTracker::new(tuning.global_cooldown),
            cast: None,
            target: None,
            gold: loadout.gold,
            inventory: loadout.inventory,
            equipment: loadout.equipment,
            experience: 0,
            talents: BTreeSet::new(),
            last_attack_at: None,
            last_combat_at: None,
            health_regen_timer: 0.0,
        }
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }

    pub fn in_combat(&self, now: f32, out_of_combat_delay: f32) -> bool {
        self.last_combat_at
            .is_some_and(|t| now - t < out_of_combat_delay)
    }
}

/// Cast bar readout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastProgress {
    pub ability: AbilityId,
    /// Elapsed fraction in [0, 1]
    pub fraction: f32,
    pub remaining: f32,
}

/// One combat session: a player, the creatures around them, and a clock.
#[derive(Resource)]
pub struct CombatSession {
    player: PlayerCharacter,
    creatures: BTreeMap<CreatureId, Creature>,
    next_creature_id: u32,
    catalog: AbilityCatalog,
    items: ItemCatalog,
    templates: CreatureTemplates,
    behaviors: BehaviorRegistry,
    tuning: CombatTuning,
    rng: GameRng,
    now: f32,
    events: Vec<CombatEvent>,
    last_rejection: Option<CastRejection>,
}

impl CombatSession {
    /// Session with the shipped catalogs and default tuning
    pub fn new(class: ClassId, rng: GameRng) -> Self {
        Self::with_config(class, rng, AbilityCatalog::builtin(), CombatTuning::default())
    }

    /// Session configured from the asset files. Anything missing or broken
    /// falls back to the shipped defaults.
    pub fn from_assets(class: ClassId, rng: GameRng) -> Self {
        let catalog = match load_ability_catalog(Path::new(ABILITIES_PATH)) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("{}, using builtin abilities", e);
                AbilityCatalog::builtin()
            }
        };
        let tuning = CombatTuning::load(Path::new(TUNING_PATH));
        Self::with_config(class, rng, catalog, tuning)
    }

    pub fn with_config(
        class: ClassId,
        rng: GameRng,
        catalog: AbilityCatalog,
        tuning: CombatTuning,
    ) -> Self {
        Self {
            player: PlayerCharacter::new(class.name(), class, &tuning),
            creatures: BTreeMap::new(),
            next_creature_id: 1,
            catalog,
            items: ItemCatalog::builtin(),
            templates: CreatureTemplates::builtin(),
            behaviors: BehaviorRegistry::builtin(),
            tuning,
            rng,
            now: 0.0,
            events: Vec::new(),
            last_rejection: None,
        }
    }

    // ------------------------------------------------------------------
    // World setup
    // ------------------------------------------------------------------

    /// Spawn a creature from its template. Unknown templates spawn nothing.
    pub fn spawn_creature(&mut self, spawn: &CreatureSpawn) -> Option<CreatureId> {
        let Some(template) = self.templates.get(&spawn.template) else {
            warn!("Unknown creature template '{}' for {}", spawn.template, spawn.name);
            return None;
        };

        if let Some(script) = &template.script_id {
            if !self.behaviors.contains(script) {
                warn!("No behavior registered for '{}', {} uses generic AI", script, spawn.name);
            }
        }

        let id = CreatureId(self.next_creature_id);
        self.next_creature_id += 1;
        let creature = Creature::from_template(id, spawn, template, &self.tuning);
        debug!("Spawned {} ({}) as {}", spawn.name, template.name, id);
        self.creatures.insert(id, creature);
        Some(id)
    }

    /// Populate the world with the shipped spawn list
    pub fn spawn_defaults(&mut self) -> Vec<CreatureId> {
        default_spawns()
            .iter()
            .filter_map(|spawn| self.spawn_creature(spawn))
            .collect()
    }

    pub fn register_behavior(&mut self, behavior: Box<dyn crate::creatures::CreatureBehavior>) {
        self.behaviors.register(behavior);
    }

    // ------------------------------------------------------------------
    // Player intents
    // ------------------------------------------------------------------

    /// Select a target. Only living hostile creatures can be targeted.
    pub fn set_target(&mut self, id: CreatureId) -> bool {
        let valid = self
            .creatures
            .get(&id)
            .is_some_and(|c| c.hostile && c.is_alive());
        if valid {
            self.player.target = Some(id);
        }
        valid
    }

    pub fn clear_target(&mut self) {
        self.player.target = None;
    }

    /// Put an ability on the action bar
    pub fn assign_slot(&mut self, slot: usize, ability: AbilityId) -> Result<(), CastRejection> {
        if slot >= SLOT_COUNT {
            return Err(CastRejection::EmptySlot { slot });
        }
        let definition = self
            .catalog
            .get(&ability)
            .ok_or(CastRejection::UnknownAbility(ability))?;
        if !definition.usable_by(self.player.class) {
            return Err(CastRejection::NotUsable(ability));
        }
        self.player.slots[slot] = Some(ability);
        Ok(())
    }

    pub fn clear_slot(&mut self, slot: usize) {
        if let Some(entry) = self.player.slots.get_mut(slot) {
            *entry = None;
        }
    }

    /// Try to use the ability in `slot` on the current target.
    ///
    /// A rejected attempt changes nothing except the remembered rejection.
    pub fn attempt_cast(&mut self, slot: usize) -> Result<CastOutcome, CastRejection> {
        let result = self.try_cast(slot);
        match &result {
            Ok(_) => self.last_rejection = None,
            Err(rejection) => {
                debug!("Cast in slot {} rejected: {}", slot, rejection);
                self.last_rejection = Some(rejection.clone());
            }
        }
        result
    }

    fn try_cast(&mut self, slot: usize) -> Result<CastOutcome, CastRejection> {
        if !self.player.actor.is_alive() {
            return Err(CastRejection::CasterDead);
        }
        if self.player.is_casting() {
            return Err(CastRejection::Busy);
        }
        let ability = self
            .player
            .slots
            .get(slot)
            .copied()
            .flatten()
            .ok_or(CastRejection::EmptySlot { slot })?;
        let definition = self
            .catalog
            .get(&ability)
            .ok_or(CastRejection::UnknownAbility(ability))?;

        let target_id = if definition.targets_self() {
            None
        } else {
            self.player.target
        };
        let target = target_id
            .and_then(|id| self.creatures.get(&id))
            .map(|c| &c.actor);

        validate_cast(
            &self.player.actor,
            definition,
            target,
            &self.player.cooldowns,
            slot,
            self.now,
        )?;

        let target_ref = target_id.map_or(ActorRef::Player, ActorRef::Creature);
        let start = commit_cast(
            definition,
            &mut self.player.actor,
            &mut self.player.cooldowns,
            slot,
            target_ref,
            self.now,
        );
        self.player.last_combat_at = Some(self.now);

        match start {
            CastStart::Instant => {
                let magnitude = self.resolve_player_ability(ability, target_ref);
                Ok(CastOutcome::Resolved { magnitude })
            }
            CastStart::Timed(cast) => {
                self.events.emit(CombatEvent::CastStarted {
                    caster: ActorRef::Player,
                    ability,
                    target: target_ref,
                    started_at: cast.started_at,
                    ends_at: cast.ends_at,
                });
                let ends_at = cast.ends_at;
                self.player.cast = Some(cast);
                Ok(CastOutcome::Started { ends_at })
            }
        }
    }

    fn resolve_player_ability(&mut self, ability: AbilityId, target_ref: ActorRef) -> f32 {
        let Some(definition) = self.catalog.get(&ability) else {
            return 0.0;
        };
        let target = match target_ref {
            ActorRef::Creature(id) => self.creatures.get_mut(&id).map(|c| &mut c.actor),
            ActorRef::Player => None,
        };
        let magnitude = resolve(
            definition,
            AbilityInvocation {
                caster: ActorRef::Player,
                actor: &mut self.player.actor,
                target_ref,
                target,
                now: self.now,
            },
            &mut self.rng,
            &mut self.events,
        );
        self.events.emit(CombatEvent::CastCompleted {
            caster: ActorRef::Player,
            ability,
            target: target_ref,
            magnitude,
        });
        magnitude
    }

    /// Learn a talent of the player's class. Each talent is learned once.
    pub fn learn_talent(&mut self, talent: TalentId) -> Result<(), TalentRejection> {
        if self.player.talents.contains(&talent) {
            return Err(TalentRejection::AlreadyLearned(talent));
        }
        let definition = talent.definition();
        if definition.class != self.player.class {
            return Err(TalentRejection::WrongClass {
                talent,
                class: self.player.class,
            });
        }

        definition.effect.apply(&mut self.player.actor);
        self.player.talents.insert(talent);
        info!("{} learned {}", self.player.name, definition.name);
        self.events.emit(CombatEvent::TalentLearned { talent });
        Ok(())
    }

    /// Melee swing at whatever is in front of the player.
    ///
    /// Hits the nearest living hostile creature within attack range in front
    /// of the player, with damage applied at the swing instant. Returns the
    /// damage dealt, or None if the swing was on cooldown or hit nothing.
    pub fn auto_attack(&mut self) -> Option<f32> {
        if !self.player.actor.is_alive() {
            return None;
        }
        let ready = self
            .player
            .last_attack_at
            .map_or(true, |t| self.now - t >= self.tuning.player_attack_cooldown);
        if !ready {
            return None;
        }
        self.player.last_attack_at = Some(self.now);
        self.player.last_combat_at = Some(self.now);

        let origin = self.player.actor.position;
        let facing = self.player.actor.facing;
        let range = self.tuning.player_attack_range;
        let victim = self
            .creatures
            .values_mut()
            .filter(|c| c.hostile && c.is_alive())
            .filter(|c| {
                let offset = c.actor.position - origin;
                offset.length() <= range && facing.dot(offset) > 0.0
            })
            .min_by(|a, b| {
                let da = a.actor.position.distance(origin);
                let db = b.actor.position.distance(origin);
                da.total_cmp(&db)
            })?;

        let applied = apply_damage(
            ActorRef::Player,
            ActorRef::Creature(victim.id),
            &mut victim.actor,
            self.player.actor.base_damage,
            None,
            false,
            &mut self.events,
        );
        Some(applied)
    }

    /// Input-driven movement. Casting does not prevent or interrupt it.
    pub fn move_player(&mut self, direction: Vec3, dt: f32) {
        if !self.player.actor.is_alive() {
            return;
        }
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        if flat == Vec3::ZERO {
            return;
        }
        self.player.actor.position += flat * self.tuning.player_move_speed * dt.max(0.0);
        self.player.actor.face(flat);
    }

    /// Turn in place
    pub fn face_player(&mut self, direction: Vec3) {
        self.player.actor.face(direction);
    }

    /// Take one entry from a corpse. Gold goes to the purse, items to the
    /// bags. A corpse with nothing left despawns.
    pub fn take_loot(&mut self, id: CreatureId, index: usize) -> Option<LootDrop> {
        if !self.player.actor.is_alive() {
            return None;
        }
        let creature = self.creatures.get_mut(&id)?;
        if creature.is_alive() || index >= creature.loot.len() {
            return None;
        }
        let drop = creature.loot.remove(index);
        let emptied = creature.loot.is_empty();

        match &drop {
            LootDrop::Gold(amount) => self.player.gold += amount,
            LootDrop::Item(item) => self.player.inventory.push(item.clone()),
        }
        self.events.emit(CombatEvent::LootTaken {
            creature: id,
            drop: drop.clone(),
        });

        if emptied {
            self.creatures.remove(&id);
            debug!("{} looted clean, despawning", id);
        }
        Some(drop)
    }

    /// Take everything from a corpse, first entry first
    pub fn take_all_loot(&mut self, id: CreatureId) -> Vec<LootDrop> {
        let mut taken = Vec::new();
        while let Some(drop) = self.take_loot(id, 0) {
            taken.push(drop);
        }
        taken
    }

    // ------------------------------------------------------------------
    // Frame update
    // ------------------------------------------------------------------

    /// Advance the world by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.now += dt;

        self.advance_player_cast();
        self.run_creature_ai(dt);
        self.settle_deaths();
        self.regenerate(dt);
    }

    fn advance_player_cast(&mut self) {
        if let Some(cast) = advance_cast(&mut self.player.cast, self.now) {
            self.resolve_player_ability(cast.ability, cast.target);
        } else if let Some(cast) = &self.player.cast {
            self.events.emit(CombatEvent::CastProgressed {
                caster: ActorRef::Player,
                ability: cast.ability,
                progress: cast.progress(self.now),
                remaining: cast.remaining(self.now),
            });
        }
    }

    fn run_creature_ai(&mut self, dt: f32) {
        let health_before = self.player.actor.health;
        let mut ctx = AiContext {
            catalog: &self.catalog,
            tuning: &self.tuning,
            rng: &mut self.rng,
            events: &mut self.events,
            now: self.now,
            dt,
        };
        for creature in self.creatures.values_mut() {
            tick_creature(creature, &mut self.player.actor, &self.behaviors, &mut ctx);
        }
        if self.player.actor.health < health_before {
            self.player.last_combat_at = Some(self.now);
        }
    }

    /// Pay out every hostile creature that died and hasn't been paid yet
    fn settle_deaths(&mut self) {
        for creature in self.creatures.values_mut() {
            if creature.is_alive() || !creature.hostile || creature.reward_granted {
                continue;
            }
            creature.reward_granted = true;
            creature.loot = resolve_loot(creature.loot_table.as_ref(), &self.items, &mut self.rng);
            info!(
                "{} died, dropping {} item(s)",
                creature.spawn_name,
                creature.loot.len()
            );
            self.events.emit(CombatEvent::LootGenerated {
                creature: creature.id,
                drops: creature.loot.clone(),
            });

            if creature.experience > 0 {
                self.player.experience += creature.experience;
                self.events.emit(CombatEvent::ExperienceGained {
                    amount: creature.experience,
                    total: self.player.experience,
                });
            }
            if self.player.target == Some(creature.id) {
                self.player.target = None;
            }
        }
    }

    fn regenerate(&mut self, dt: f32) {
        let player = &mut self.player;
        if !player.actor.is_alive() {
            return;
        }
        let in_combat = player.in_combat(self.now, self.tuning.out_of_combat_delay);

        let mana_rate = if in_combat {
            self.tuning.mana_regen_in_combat
        } else {
            self.tuning.mana_regen_out_of_combat
        };
        let max_mana = player.actor.max_mana;
        player.actor.restore_mana(max_mana * mana_rate * dt);

        if in_combat {
            player.health_regen_timer = 0.0;
            return;
        }
        player.health_regen_timer += dt;
        while player.health_regen_timer >= self.tuning.health_regen_interval {
            player.health_regen_timer -= self.tuning.health_regen_interval;
            let amount = (player.actor.max_health * self.tuning.health_regen_fraction).ceil();
            let healed = player.actor.heal(amount);
            if healed > 0.0 {
                self.events.emit(CombatEvent::Healed {
                    source: ActorRef::Player,
                    target: ActorRef::Player,
                    ability: None,
                    amount: healed,
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn player(&self) -> &PlayerCharacter {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerCharacter {
        &mut self.player
    }

    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    /// Look up a creature by spawn name
    pub fn find_creature(&self, spawn_name: &str) -> Option<&Creature> {
        self.creatures.values().find(|c| c.spawn_name == spawn_name)
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    /// The player alongside the catalog, for edits that validate abilities
    pub(crate) fn player_with_catalog(&mut self) -> (&mut PlayerCharacter, &AbilityCatalog) {
        (&mut self.player, &self.catalog)
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.rng.seed
    }

    /// The player's cast bar, if a cast is in flight
    pub fn cast_progress(&self) -> Option<CastProgress> {
        self.player.cast.as_ref().map(|cast| CastProgress {
            ability: cast.ability,
            fraction: cast.progress(self.now),
            remaining: cast.remaining(self.now),
        })
    }

    /// Remaining cooldown of a slot as a fraction, 0 for empty slots
    pub fn slot_cooldown_fraction(&self, slot: usize) -> f32 {
        self.player
            .slots
            .get(slot)
            .copied()
            .flatten()
            .and_then(|ability| self.catalog.get(&ability))
            .map_or(0.0, |def| {
                self.player
                    .cooldowns
                    .slot_remaining_fraction(slot, def.cooldown, self.now)
            })
    }

    pub fn last_rejection(&self) -> Option<&CastRejection> {
        self.last_rejection.as_ref()
    }

    pub fn pending_events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Hand over every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Living hostile creatures by distance from the player, nearest first
    pub fn hostiles_by_distance(&self) -> Vec<(CreatureId, f32)> {
        let origin = self.player.actor.position;
        let mut hostiles: Vec<(CreatureId, f32)> = self
            .creatures
            .values()
            .filter(|c| c.hostile && c.is_alive())
            .map(|c| (c.id, c.actor.position.distance(origin)))
            .collect();
        hostiles.sort_by(|a, b| a.1.total_cmp(&b.1));
        hostiles
    }

    /// Kill counts per template id, for reports
    pub fn kills_by_template(&self) -> HashMap<String, usize> {
        let mut kills = HashMap::new();
        for creature in self.creatures.values().filter(|c| c.reward_granted) {
            *kills.entry(creature.template_id.clone()).or_insert(0) += 1;
        }
        kills
    }
}
