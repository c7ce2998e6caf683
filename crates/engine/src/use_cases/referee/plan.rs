//! Command rules.
//!
//! Each command kind is checked against a [`LocationSnapshot`] and turned into
//! a [`Plan`]: the state changes to apply plus the detail lines to record.
//! Nothing here touches storage, so the rules can be tested on hand-built
//! snapshots.

use imagind_domain::commands::{GetItemFromItemArgs, GiveItemArgs, SpeakArgs};
use imagind_domain::{
    Actor, ActorId, CapabilitySet, Command, EntityKind, Exit, ExitId, Item, ItemId, ItemOwner,
    LocationId, MAX_CONTAINMENT_DEPTH,
};

use super::error::CommandError;
use crate::use_cases::snapshot::LocationSnapshot;

/// Who a command is checked for.
#[derive(Debug, Clone, Copy)]
pub enum Acting<'a> {
    Actor(&'a Actor),
    /// The game master
    System,
}

/// A single state change. Transfers and moves are compare-and-set.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    TransferItem {
        item_id: ItemId,
        from: ItemOwner,
        to: ItemOwner,
    },
    MoveActor {
        actor_id: ActorId,
        from: LocationId,
        to: LocationId,
    },
    SaveActor(Actor),
    SaveItem(Item),
    SaveExit(Exit),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub mutations: Vec<Mutation>,
    pub output: Vec<String>,
    /// Where the acting actor ends up after leaving through an exit
    pub arrival: Option<LocationId>,
}

impl Plan {
    fn output(lines: Vec<String>) -> Self {
        Self {
            output: lines,
            ..Self::default()
        }
    }

    fn mutation(mutation: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            ..Self::default()
        }
    }

    fn with_output(mut self, lines: Vec<String>) -> Self {
        self.output = lines;
        self
    }
}

pub fn plan(
    command: &Command,
    acting: Acting<'_>,
    snapshot: &LocationSnapshot,
    capabilities: &CapabilitySet,
) -> Result<Plan, CommandError> {
    match acting {
        Acting::Actor(actor) => plan_for_actor(command, actor, snapshot, capabilities),
        Acting::System => plan_for_system(command, snapshot),
    }
}

fn plan_for_actor(
    command: &Command,
    actor: &Actor,
    s: &LocationSnapshot,
    capabilities: &CapabilitySet,
) -> Result<Plan, CommandError> {
    match command {
        Command::GoExit(args) => go_exit(actor, s, args.exit_id),
        Command::PickUpItem(args) => pick_up(actor, s, args.item_id),
        Command::GetItemFromItem(args) => get_item_from_item(actor, s, args),
        Command::DropItem(args) => drop_item(actor, s, args.item_id),
        Command::GiveItemToAgent(args) => give_item(actor, s, args),
        Command::LookAround => Ok(Plan::output(s.look_around(Some(actor.id)))),
        Command::LookAtItem(args) => look_at_item(actor, s, args.item_id),
        Command::LookAtAgent(args) => look_at_agent(s, args.target_agent_id),
        Command::LookAtExit(args) => look_at_exit(s, args.exit_id),
        Command::SpeakToAgent(args) => speak(actor, s, args),
        Command::AttackAgent(args) => attack(actor, s, args.target_agent_id),
        Command::SearchLocation => Ok(Plan::output(search_location(s))),
        Command::SearchItem(args) => search_item(actor, s, args.item_id),
        Command::SearchExit(args) => search_exit(s, args.exit_id),
        Command::GetInventory => Ok(Plan::output(inventory(actor, s))),
        Command::Wait => Ok(Plan::default()),
        Command::DisplayHelpText => Ok(Plan::output(capabilities.help_lines())),
        Command::Emote(args) => Ok(Plan::output(vec![args.emote_text.clone()])),
        Command::UpdateAgentIntent(args) => {
            let mut updated = actor.clone();
            updated.current_intent = args.intent.clone();
            Ok(Plan::mutation(Mutation::SaveActor(updated)).with_output(vec![args.intent.clone()]))
        }
        Command::UpdateAgentMood(args) => {
            let mut updated = actor.clone();
            updated.mood = args.mood.clone();
            Ok(Plan::mutation(Mutation::SaveActor(updated)).with_output(vec![args.mood.clone()]))
        }
        other => Err(CommandError::InvalidCapability { kind: other.kind() }),
    }
}

fn plan_for_system(command: &Command, s: &LocationSnapshot) -> Result<Plan, CommandError> {
    match command {
        Command::DoNothing => Ok(Plan::default()),
        Command::Event(args) => Ok(Plan::output(vec![args.event_text.clone()])),
        Command::RevealItem(args) => {
            let item = s
                .item(args.item_id)
                .ok_or_else(|| CommandError::not_found(EntityKind::Item, args.item_id))?;
            if !item.hidden {
                return Err(CommandError::not_accessible(format!(
                    "the {} is already visible",
                    item.label
                )));
            }
            if s.is_enclosed_by_hidden(item) {
                return Err(CommandError::not_accessible(format!(
                    "the {} is inside a hidden container",
                    item.label
                )));
            }
            let mut revealed = item.clone();
            revealed.hidden = false;
            Ok(Plan::mutation(Mutation::SaveItem(revealed)).with_output(reason_lines(&args.reason)))
        }
        Command::RevealExit(args) => {
            let exit = s
                .exit(args.exit_id)
                .ok_or_else(|| CommandError::not_found(EntityKind::Exit, args.exit_id))?;
            if !exit.hidden {
                return Err(CommandError::not_accessible(format!(
                    "the {} is already visible",
                    exit.label
                )));
            }
            let mut revealed = exit.clone();
            revealed.hidden = false;
            Ok(Plan::mutation(Mutation::SaveExit(revealed)).with_output(reason_lines(&args.reason)))
        }
        Command::UnlockExit(args) => {
            let exit = s
                .exit(args.exit_id)
                .ok_or_else(|| CommandError::not_found(EntityKind::Exit, args.exit_id))?;
            if !exit.locked {
                return Err(CommandError::not_accessible(format!(
                    "the {} is not locked",
                    exit.label
                )));
            }
            let mut unlocked = exit.clone();
            unlocked.locked = false;
            Ok(Plan::mutation(Mutation::SaveExit(unlocked)).with_output(reason_lines(&args.reason)))
        }
        Command::UpdateItemDescription(args) => {
            let item = s
                .item(args.item_id)
                .ok_or_else(|| CommandError::not_found(EntityKind::Item, args.item_id))?;
            let mut updated = item.clone();
            updated.short_description = args.description.clone();
            updated.long_description = args.description.clone();
            Ok(Plan::mutation(Mutation::SaveItem(updated)).with_output(reason_lines(&args.reason)))
        }
        Command::SpawnAgent(args) => {
            if args.location_id != s.location_id() {
                return Err(CommandError::not_accessible(
                    "creatures can only be spawned where the scene takes place",
                ));
            }
            let template = s
                .templates
                .iter()
                .find(|t| t.id == args.template_id)
                .ok_or_else(|| {
                    CommandError::not_found(EntityKind::CreatureTemplate, args.template_id)
                })?;
            let spawned = template.spawn(&args.name, s.location_id());
            Ok(Plan::mutation(Mutation::SaveActor(spawned)))
        }
        other => Err(CommandError::InvalidCapability { kind: other.kind() }),
    }
}

fn reason_lines(reason: &str) -> Vec<String> {
    if reason.trim().is_empty() {
        Vec::new()
    } else {
        vec![reason.to_string()]
    }
}

// =============================================================================
// Lookups
// =============================================================================

fn visible_exit(s: &LocationSnapshot, exit_id: ExitId) -> Result<&Exit, CommandError> {
    let exit = s
        .exit(exit_id)
        .ok_or_else(|| CommandError::not_found(EntityKind::Exit, exit_id))?;
    if exit.hidden {
        return Err(CommandError::not_accessible(format!(
            "the {} is hidden",
            exit.label
        )));
    }
    Ok(exit)
}

fn present_actor(s: &LocationSnapshot, actor_id: ActorId) -> Result<&Actor, CommandError> {
    s.actor(actor_id)
        .ok_or_else(|| CommandError::not_found(EntityKind::Actor, actor_id))
}

fn living_other(
    actor: &Actor,
    s: &LocationSnapshot,
    target_id: ActorId,
) -> Result<Actor, CommandError> {
    let target = present_actor(s, target_id)?;
    if target.id == actor.id {
        return Err(CommandError::not_accessible(format!(
            "{} cannot do that to themselves",
            actor.label
        )));
    }
    if target.is_dead() {
        return Err(CommandError::not_accessible(format!(
            "{} is dead",
            target.label
        )));
    }
    Ok(target.clone())
}

/// An item the actor can handle directly: visible, and either on the floor,
/// carried by the actor, or inside a visible container that is one of those.
fn reachable_item<'a>(
    actor: &Actor,
    s: &'a LocationSnapshot,
    item_id: ItemId,
) -> Result<&'a Item, CommandError> {
    let item = s
        .item(item_id)
        .ok_or_else(|| CommandError::not_found(EntityKind::Item, item_id))?;
    if item.hidden {
        return Err(CommandError::not_accessible(format!(
            "the {} cannot be seen",
            item.label
        )));
    }

    match item.owner {
        ItemOwner::Location(_) => Ok(item),
        ItemOwner::Actor(owner) if owner == actor.id => Ok(item),
        ItemOwner::Actor(owner) => {
            let holder = s
                .actor(owner)
                .map(|a| a.label.as_str())
                .unwrap_or("someone else");
            Err(CommandError::not_accessible(format!(
                "the {} is carried by {}",
                item.label, holder
            )))
        }
        ItemOwner::Item(container_id) => {
            let open = s.item(container_id).is_some_and(|container| {
                !container.hidden
                    && (matches!(container.owner, ItemOwner::Location(_))
                        || container.owner == ItemOwner::Actor(actor.id))
            });
            if open {
                Ok(item)
            } else {
                Err(CommandError::not_accessible(format!(
                    "the {} is out of reach",
                    item.label
                )))
            }
        }
    }
}

/// Whether `item` sits somewhere in `holder`'s possession.
fn is_held_by(s: &LocationSnapshot, item: &Item, holder: ActorId) -> bool {
    let mut owner = item.owner;
    for _ in 0..MAX_CONTAINMENT_DEPTH {
        match owner {
            ItemOwner::Actor(id) => return id == holder,
            ItemOwner::Location(_) => return false,
            ItemOwner::Item(container_id) => match s.item(container_id) {
                Some(container) => owner = container.owner,
                None => return false,
            },
        }
    }
    false
}

fn ensure_can_carry(carrier: &Actor, s: &LocationSnapshot, item: &Item) -> Result<(), CommandError> {
    if is_held_by(s, item, carrier.id) {
        return Ok(());
    }
    let load = s.load_of(ItemOwner::Actor(carrier.id));
    if load.saturating_add(s.weight_of(item)) > carrier.capacity {
        return Err(CommandError::not_accessible(format!(
            "{} cannot carry the {} as well",
            carrier.label, item.label
        )));
    }
    Ok(())
}

fn description_or(item_long: &str, item_short: &str, fallback: String) -> String {
    if !item_long.is_empty() {
        item_long.to_string()
    } else if !item_short.is_empty() {
        item_short.to_string()
    } else {
        fallback
    }
}

fn list_with_articles<'a>(items: impl Iterator<Item = &'a Item>) -> Option<String> {
    let names: Vec<String> = items.map(Item::with_article).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

// =============================================================================
// Movement and possession
// =============================================================================

fn go_exit(actor: &Actor, s: &LocationSnapshot, exit_id: ExitId) -> Result<Plan, CommandError> {
    let exit = visible_exit(s, exit_id)?;
    if exit.locked {
        return Err(CommandError::not_accessible(format!(
            "the {} is locked",
            exit.label
        )));
    }
    Ok(Plan {
        mutations: vec![Mutation::MoveActor {
            actor_id: actor.id,
            from: s.location_id(),
            to: exit.destination_id,
        }],
        output: Vec::new(),
        arrival: Some(exit.destination_id),
    })
}

fn pick_up(actor: &Actor, s: &LocationSnapshot, item_id: ItemId) -> Result<Plan, CommandError> {
    let item = reachable_item(actor, s, item_id)?;
    if item.owner == ItemOwner::Actor(actor.id) {
        return Err(CommandError::not_accessible(format!(
            "{} already carries the {}",
            actor.label, item.label
        )));
    }
    ensure_can_carry(actor, s, item)?;
    Ok(Plan::mutation(Mutation::TransferItem {
        item_id: item.id,
        from: item.owner,
        to: ItemOwner::Actor(actor.id),
    }))
}

fn get_item_from_item(
    actor: &Actor,
    s: &LocationSnapshot,
    args: &GetItemFromItemArgs,
) -> Result<Plan, CommandError> {
    let container = reachable_item(actor, s, args.container_item_id)?;
    if !container.is_container() {
        return Err(CommandError::not_accessible(format!(
            "the {} holds nothing",
            container.label
        )));
    }
    let item = s
        .item(args.target_item_id)
        .ok_or_else(|| CommandError::not_found(EntityKind::Item, args.target_item_id))?;
    if item.owner != ItemOwner::Item(container.id) {
        return Err(CommandError::not_accessible(format!(
            "the {} is not in the {}",
            item.label, container.label
        )));
    }
    if item.hidden {
        return Err(CommandError::not_accessible(format!(
            "the {} cannot be seen",
            item.label
        )));
    }
    ensure_can_carry(actor, s, item)?;
    Ok(Plan::mutation(Mutation::TransferItem {
        item_id: item.id,
        from: item.owner,
        to: ItemOwner::Actor(actor.id),
    }))
}

fn drop_item(actor: &Actor, s: &LocationSnapshot, item_id: ItemId) -> Result<Plan, CommandError> {
    let item = s
        .item(item_id)
        .ok_or_else(|| CommandError::not_found(EntityKind::Item, item_id))?;
    if item.owner != ItemOwner::Actor(actor.id) {
        return Err(CommandError::not_owner(format!(
            "{} does not carry the {}",
            actor.label, item.label
        )));
    }
    Ok(Plan::mutation(Mutation::TransferItem {
        item_id: item.id,
        from: item.owner,
        to: ItemOwner::Location(s.location_id()),
    }))
}

fn give_item(actor: &Actor, s: &LocationSnapshot, args: &GiveItemArgs) -> Result<Plan, CommandError> {
    let item = s
        .item(args.item_id)
        .ok_or_else(|| CommandError::not_found(EntityKind::Item, args.item_id))?;
    if item.owner != ItemOwner::Actor(actor.id) {
        return Err(CommandError::not_owner(format!(
            "{} does not carry the {}",
            actor.label, item.label
        )));
    }
    let receiver = living_other(actor, s, args.target_agent_id)?;
    ensure_can_carry(&receiver, s, item)?;
    Ok(Plan::mutation(Mutation::TransferItem {
        item_id: item.id,
        from: item.owner,
        to: ItemOwner::Actor(receiver.id),
    }))
}

// =============================================================================
// Perception
// =============================================================================

fn look_at_item(actor: &Actor, s: &LocationSnapshot, item_id: ItemId) -> Result<Plan, CommandError> {
    let item = reachable_item(actor, s, item_id)?;
    Ok(Plan::output(vec![description_or(
        &item.long_description,
        &item.short_description,
        format!("It is an ordinary {}.", item.label),
    )]))
}

fn look_at_agent(s: &LocationSnapshot, target_id: ActorId) -> Result<Plan, CommandError> {
    let target = present_actor(s, target_id)?;
    let mut lines = vec![description_or(
        &target.long_description,
        &target.short_description,
        format!("{} looks unremarkable.", target.label),
    )];
    if target.is_dead() {
        lines.push(format!("{} is dead.", target.label));
    } else if !target.mood.is_empty() {
        lines.push(format!("{} seems {}.", target.label, target.mood));
    }
    Ok(Plan::output(lines))
}

fn look_at_exit(s: &LocationSnapshot, exit_id: ExitId) -> Result<Plan, CommandError> {
    let exit = visible_exit(s, exit_id)?;
    let mut lines = vec![description_or(
        &exit.long_description,
        &exit.short_description,
        format!("The {} leads {}.", exit.label, exit.direction),
    )];
    if exit.locked {
        lines.push("It is locked.".to_string());
    }
    Ok(Plan::output(lines))
}

fn search_location(s: &LocationSnapshot) -> Vec<String> {
    let floor = ItemOwner::Location(s.location_id());
    let mut lines = Vec::new();
    for item in s.visible_contents(floor) {
        lines.push(format!("There is {} here.", item.with_article()));
    }
    for container in s.visible_contents(floor).filter(|i| i.is_container()) {
        for item in s.visible_contents(ItemOwner::Item(container.id)) {
            lines.push(format!(
                "Inside the {} there is {}.",
                container.label,
                item.with_article()
            ));
        }
    }
    if lines.is_empty() {
        lines.push("You find nothing of interest.".to_string());
    }
    lines
}

fn search_item(actor: &Actor, s: &LocationSnapshot, item_id: ItemId) -> Result<Plan, CommandError> {
    let item = reachable_item(actor, s, item_id)?;
    if !item.is_container() {
        return Ok(Plan::output(vec![format!(
            "You find nothing special about the {}.",
            item.label
        )]));
    }

    let lines: Vec<String> = s
        .visible_contents(ItemOwner::Item(item.id))
        .map(|inner| format!("Inside the {} there is {}.", item.label, inner.with_article()))
        .collect();
    if lines.is_empty() {
        return Ok(Plan::output(vec![format!("The {} is empty.", item.label)]));
    }
    Ok(Plan::output(lines))
}

fn search_exit(s: &LocationSnapshot, exit_id: ExitId) -> Result<Plan, CommandError> {
    let exit = visible_exit(s, exit_id)?;
    let mut lines = Vec::new();
    if !exit.long_description.is_empty() {
        lines.push(exit.long_description.clone());
    }
    if exit.locked {
        lines.push("It is locked.".to_string());
    }
    if lines.is_empty() {
        lines.push(format!("You find nothing unusual about the {}.", exit.label));
    }
    Ok(Plan::output(lines))
}

fn inventory(actor: &Actor, s: &LocationSnapshot) -> Vec<String> {
    let carried = ItemOwner::Actor(actor.id);
    let Some(list) = list_with_articles(s.visible_contents(carried)) else {
        return vec!["You are carrying nothing.".to_string()];
    };

    let mut lines = vec![format!("You are carrying {}.", list)];
    for container in s.visible_contents(carried).filter(|i| i.is_container()) {
        if let Some(inner) = list_with_articles(s.visible_contents(ItemOwner::Item(container.id))) {
            lines.push(format!("The {} holds {}.", container.label, inner));
        }
    }
    lines
}

// =============================================================================
// Interaction
// =============================================================================

fn speak(actor: &Actor, s: &LocationSnapshot, args: &SpeakArgs) -> Result<Plan, CommandError> {
    let target = living_other(actor, s, args.target_agent_id)?;
    let plan = Plan::output(vec![args.message.clone()]);
    if target.autonomous && !target.activated {
        let mut woken = target;
        woken.activated = true;
        return Ok(Plan {
            mutations: vec![Mutation::SaveActor(woken)],
            ..plan
        });
    }
    Ok(plan)
}

fn attack(actor: &Actor, s: &LocationSnapshot, target_id: ActorId) -> Result<Plan, CommandError> {
    let mut target = living_other(actor, s, target_id)?;
    let damage = actor.damage_against(&target);
    let defeated = target.apply_damage(damage);
    if target.autonomous && !defeated {
        target.activated = true;
    }

    let mut lines = vec![if damage > 0 {
        format!("The blow deals {} damage.", damage)
    } else {
        "The blow does no harm.".to_string()
    }];
    if defeated {
        lines.push(format!("{} is defeated.", target.label));
    }
    Ok(Plan::mutation(Mutation::SaveActor(target)).with_output(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagind_domain::commands::{RevealItemArgs, SpawnAgentArgs};
    use imagind_domain::{CommandKind, CreatureTemplate, Location};

    struct Fixture {
        snapshot: LocationSnapshot,
        hero: Actor,
    }

    fn fixture() -> Fixture {
        let location = Location::new("Courtyard");
        let hero = Actor::new("Mira", location.id)
            .with_capacity(5)
            .with_combat_stats(10, 4, 0);
        Fixture {
            snapshot: LocationSnapshot {
                location,
                exits: Vec::new(),
                actors: vec![hero.clone()],
                items: Vec::new(),
                templates: Vec::new(),
            },
            hero,
        }
    }

    fn player_caps(actor: &Actor) -> CapabilitySet {
        CapabilitySet::for_actor(Some(actor))
    }

    fn run(f: &Fixture, command: Command) -> Result<Plan, CommandError> {
        plan(&command, Acting::Actor(&f.hero), &f.snapshot, &player_caps(&f.hero))
    }

    fn item_command(kind: CommandKind, item_id: ItemId) -> Command {
        Command::from_raw(kind, &serde_json::json!({ "item_id": item_id })).unwrap()
    }

    #[test]
    fn pick_up_moves_item_into_inventory() {
        let mut f = fixture();
        let apple = Item::new("apple", ItemOwner::Location(f.snapshot.location_id()));
        f.snapshot.items.push(apple.clone());

        let plan = run(&f, item_command(CommandKind::PickUpItem, apple.id)).unwrap();

        assert_eq!(
            plan.mutations,
            vec![Mutation::TransferItem {
                item_id: apple.id,
                from: apple.owner,
                to: ItemOwner::Actor(f.hero.id),
            }]
        );
    }

    #[test]
    fn pick_up_rejects_hidden_and_heavy_items() {
        let mut f = fixture();
        let floor = ItemOwner::Location(f.snapshot.location_id());
        let coin = Item::new("coin", floor).hidden();
        let anvil = Item::new("anvil", floor).with_weight(50);
        f.snapshot.items.extend([coin.clone(), anvil.clone()]);

        assert!(matches!(
            run(&f, item_command(CommandKind::PickUpItem, coin.id)),
            Err(CommandError::NotAccessible(_))
        ));
        assert!(matches!(
            run(&f, item_command(CommandKind::PickUpItem, anvil.id)),
            Err(CommandError::NotAccessible(_))
        ));
    }

    #[test]
    fn contents_of_hidden_container_are_out_of_reach() {
        let mut f = fixture();
        let chest = Item::new("chest", ItemOwner::Location(f.snapshot.location_id()))
            .with_capacity(10)
            .hidden();
        let ring = Item::new("ring", ItemOwner::Item(chest.id));
        f.snapshot.items.extend([chest.clone(), ring.clone()]);

        assert!(matches!(
            run(&f, item_command(CommandKind::PickUpItem, ring.id)),
            Err(CommandError::NotAccessible(_))
        ));
    }

    #[test]
    fn someone_elses_item_can_be_neither_dropped_nor_taken() {
        let mut f = fixture();
        let tom = Actor::new("Tom", f.snapshot.location_id());
        let knife = Item::new("knife", ItemOwner::Actor(tom.id));
        f.snapshot.actors.push(tom);
        f.snapshot.items.push(knife.clone());

        assert!(matches!(
            run(&f, item_command(CommandKind::DropItem, knife.id)),
            Err(CommandError::NotOwner(_))
        ));
        assert!(matches!(
            run(&f, item_command(CommandKind::PickUpItem, knife.id)),
            Err(CommandError::NotAccessible(_))
        ));
    }

    #[test]
    fn attack_reports_defeat_and_deactivates_target() {
        let mut f = fixture();
        let goblin = Actor::new("Goblin", f.snapshot.location_id())
            .autonomous()
            .with_combat_stats(3, 1, 1);
        f.snapshot.actors.push(goblin.clone());
        let command = Command::from_raw(
            CommandKind::AttackAgent,
            &serde_json::json!({ "target_agent_id": goblin.id }),
        )
        .unwrap();

        let plan = run(&f, command).unwrap();

        assert_eq!(
            plan.output,
            vec![
                "The blow deals 3 damage.".to_string(),
                "Goblin is defeated.".to_string()
            ]
        );
        match &plan.mutations[..] {
            [Mutation::SaveActor(target)] => {
                assert!(target.is_dead());
                assert!(!target.activated);
            }
            other => panic!("unexpected mutations: {:?}", other),
        }
    }

    #[test]
    fn speaking_wakes_a_dormant_autonomous_actor() {
        let mut f = fixture();
        let mut hermit = Actor::new("Hermit", f.snapshot.location_id()).autonomous();
        hermit.activated = false;
        f.snapshot.actors.push(hermit.clone());
        let command = Command::from_raw(
            CommandKind::SpeakToAgent,
            &serde_json::json!({ "target_agent_id": hermit.id, "message": "Hello?" }),
        )
        .unwrap();

        let plan = run(&f, command).unwrap();

        assert_eq!(plan.output, vec!["Hello?".to_string()]);
        assert!(matches!(&plan.mutations[..], [Mutation::SaveActor(a)] if a.activated));
    }

    #[test]
    fn inventory_lists_carried_items_or_nothing() {
        let mut f = fixture();
        assert_eq!(
            run(&f, Command::GetInventory).unwrap().output,
            vec!["You are carrying nothing.".to_string()]
        );

        let bag = Item::new("bag", ItemOwner::Actor(f.hero.id)).with_capacity(4);
        let coin = Item::new("coin", ItemOwner::Item(bag.id));
        f.snapshot.items.extend([bag, coin]);

        assert_eq!(
            run(&f, Command::GetInventory).unwrap().output,
            vec![
                "You are carrying a bag.".to_string(),
                "The bag holds a coin.".to_string()
            ]
        );
    }

    #[test]
    fn system_command_is_rejected_for_actors() {
        let f = fixture();
        assert!(matches!(
            run(&f, Command::DoNothing),
            Err(CommandError::InvalidCapability {
                kind: CommandKind::DoNothing
            })
        ));
    }

    #[test]
    fn reveal_fails_inside_hidden_container_then_succeeds_once_opened() {
        let mut f = fixture();
        let chest = Item::new("chest", ItemOwner::Location(f.snapshot.location_id()))
            .with_capacity(10)
            .hidden();
        let ring = Item::new("ring", ItemOwner::Item(chest.id)).hidden();
        f.snapshot.items.extend([chest.clone(), ring.clone()]);
        let reveal_ring = Command::RevealItem(RevealItemArgs {
            item_id: ring.id,
            reason: String::new(),
        });

        assert!(matches!(
            plan_for_system(&reveal_ring, &f.snapshot),
            Err(CommandError::NotAccessible(_))
        ));

        f.snapshot.items[0].hidden = false;
        let plan = plan_for_system(&reveal_ring, &f.snapshot).unwrap();
        assert!(matches!(&plan.mutations[..], [Mutation::SaveItem(i)] if !i.hidden));
    }

    #[test]
    fn spawn_uses_a_template_allowed_here() {
        let mut f = fixture();
        let template = CreatureTemplate::new("Rat");
        f.snapshot.location.template_ids.push(template.id);
        f.snapshot.templates.push(template.clone());

        let command = Command::SpawnAgent(SpawnAgentArgs {
            template_id: template.id,
            location_id: f.snapshot.location_id(),
            name: String::new(),
        });
        let plan = plan_for_system(&command, &f.snapshot).unwrap();

        match &plan.mutations[..] {
            [Mutation::SaveActor(rat)] => {
                assert_eq!(rat.label, "Rat");
                assert!(rat.is_active_autonomous());
            }
            other => panic!("unexpected mutations: {:?}", other),
        }

        let elsewhere = Command::SpawnAgent(SpawnAgentArgs {
            template_id: template.id,
            location_id: LocationId::new(),
            name: String::new(),
        });
        assert!(plan_for_system(&elsewhere, &f.snapshot).is_err());
    }
}
