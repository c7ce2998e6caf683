//! Prompt text for the LLM resolver.

use imagind_domain::{Actor, Item};

use crate::infrastructure::ports::WorldContext;

pub const INTERPRET_SYSTEM_PROMPT: &str = "\
You turn a character's natural-language instructions into actions in a text adventure.
The world is made of locations joined by exits. Locations hold items and other characters.
Call as few tools as it takes to carry out what the character asked, in the order they asked.
Only use ids listed in the tool parameters; never invent one.
If the text starts with a quotation mark, or nothing else fits, pass it verbatim to speak_to_agent \
for someone who is present, or use emote.
If the character tries something that is not allowed, such as walking through a locked exit, \
use emote to show their confusion.";

pub const CONSEQUENCES_SYSTEM_PROMPT: &str = "\
You are the game master of a text adventure.
You are given the events that just happened in one location.
Decide what, if anything, follows from them, and call the tools for it.
Reveal a hidden item only when a character actively searches for it or your notes say the \
action warrants it; looking around is not enough.
Unlock an exit only when a character does something that should unlock it.
If nothing follows, make no tool calls or call do_nothing.";

pub const COMPOSE_USER_PROMPT: &str = "\
What do you want to do next? Answer in one or two sentences in the first person, as plain \
instructions. Avoid doing the same thing twice in a row.";

pub fn interpret_user_prompt(actor: &Actor, text: &str) -> String {
    format!(
        "{} (id {}) says they want to do this: {}\n\nWhich tool calls carry it out?",
        actor.label, actor.id, text
    )
}

pub fn consequences_user_prompt(narration: &str) -> String {
    format!(
        "These events just happened here:\n{}\n\nWhich tool calls, if any, should follow?",
        narration
    )
}

fn labels(items: &[Item]) -> String {
    if items.is_empty() {
        return "nothing".to_string();
    }
    items
        .iter()
        .map(|i| i.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-text rendering of a context, ids included, for the system prompt.
pub fn describe_context(context: &WorldContext) -> String {
    let mut out = format!(
        "Location: {} ({})\n{}\n",
        context.location.label, context.location.id, context.location.long_description
    );

    out.push_str("\nExits:\n");
    for exit in &context.exits {
        let mut flags = Vec::new();
        if exit.locked {
            flags.push("locked");
        }
        if exit.hidden {
            flags.push("hidden");
        }
        out.push_str(&format!(
            "- {} ({}), {}: {}{}\n",
            exit.label,
            exit.id,
            exit.direction,
            exit.short_description,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        ));
    }

    out.push_str("\nItems:\n");
    for item in &context.items {
        out.push_str(&format!(
            "- {} ({}) held by {}{}\n",
            item.label,
            item.id,
            item.owner,
            if item.hidden { " [hidden]" } else { "" }
        ));
    }

    out.push_str("\nCharacters:\n");
    for actor in &context.actors {
        out.push_str(&format!(
            "- {} ({}): {}{}\n",
            actor.label,
            actor.id,
            actor.short_description,
            if actor.is_dead() { " [dead]" } else { "" }
        ));
    }

    if !context.inventory.is_empty() {
        out.push_str(&format!("\nCarrying: {}\n", labels(&context.inventory)));
    }

    if !context.templates.is_empty() {
        out.push_str("\nCreatures that may appear here:\n");
        for template in &context.templates {
            out.push_str(&format!(
                "- {} ({}): {}\n",
                template.name, template.id, template.description
            ));
        }
    }

    out
}

/// Persona prompt for an autonomous actor choosing its next move.
pub fn compose_system_prompt(actor: &Actor, context: &WorldContext) -> String {
    let present = context
        .actors
        .iter()
        .map(|a| a.label.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let present = if present.is_empty() {
        "nobody".to_string()
    } else {
        present
    };

    let mut prompt = format!(
        "You are {}, {}. You live in a game world but you never reveal that. \
         Decide what to do based on the following.\n\n\
         Your location: {}\n\
         Items present: {}\n\
         Characters present: {}\n\
         Your inventory: {}\n\
         Your mood: {}\n\
         Your current intent: {}\n\
         Your long-term goal: {}\n\
         Your backstory: {}\n",
        actor.label,
        actor.long_description,
        context.location.short_description,
        labels(&context.items),
        present,
        labels(&context.inventory),
        actor.mood,
        actor.current_intent,
        actor.goal,
        actor.backstory,
    );

    if !context.recent_events.is_empty() {
        prompt.push_str("\nWhat has happened so far:\n");
        for line in &context.recent_events {
            prompt.push_str(line);
            prompt.push('\n');
        }
    }

    prompt
}
