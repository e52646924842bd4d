//! Non-player characters: dialogue anchors with an interaction radius.
//!
//! NPCs never fight and never lose health; they stand where the room config
//! put them and talk when the player interacts in range.

use hivebreak_common::RoomId;
use serde::{Deserialize, Serialize};

use crate::dialogue::{DialogueLine, DialogueScript, LineKind};
use crate::entity::{Entity, Faction};
use crate::input::Vec2;

/// Kind of NPC, selecting appearance and default dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    /// Line infantry
    Soldier,
    /// Machine-cult engineer
    TechPriest,
    /// Itinerant investigator
    Inquisitor,
    /// Political officer
    Commissar,
    /// Stranded civilian
    Civilian,
    /// Lobotomized drone
    Servitor,
}

impl NpcKind {
    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Soldier => "Soldier",
            Self::TechPriest => "Tech Priest",
            Self::Inquisitor => "Inquisitor",
            Self::Commissar => "Commissar",
            Self::Civilian => "Civilian",
            Self::Servitor => "Servitor",
        }
    }

    /// Default dialogue lines for this kind.
    #[must_use]
    pub fn default_lines(self) -> &'static [&'static str] {
        match self {
            Self::Soldier => &[
                "Greetings, Scout. The Emperor protects.",
                "Beware of the infestation ahead.",
                "Purge the xenos with extreme prejudice.",
                "We've lost contact with Squad Epsilon in the eastern chambers.",
            ],
            Self::TechPriest => &[
                "The Omnissiah guides us.",
                "Your weapons have been blessed by the Machine God.",
                "The alien technology must be studied and destroyed.",
                "I can upgrade your equipment if you bring me the necessary components.",
            ],
            Self::Inquisitor => &[
                "Trust no one, not even yourself.",
                "The xenos taint must be cleansed with fire.",
                "I sense warp disturbances in this area.",
                "Report any heretical activities directly to me.",
            ],
            Self::Commissar => &[
                "Failure is not an option, Scout.",
                "Show no fear in the face of the alien.",
                "The Emperor demands victory at any cost.",
                "Retreat is punishable by death.",
            ],
            Self::Civilian => &[
                "Please help us! The creatures came so suddenly.",
                "I saw them take people away... alive.",
                "Is there any safe way out of here?",
                "Thank the Emperor you've come!",
            ],
            Self::Servitor => &[
                "Awaiting instructions.",
                "Systems functioning within acceptable parameters.",
                "Maintenance protocols active.",
                "Biological components stable.",
            ],
        }
    }

    /// Get all NPC kinds.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Soldier,
            Self::TechPriest,
            Self::Inquisitor,
            Self::Commissar,
            Self::Civilian,
            Self::Servitor,
        ]
    }
}

/// A one-shot quest briefing delivered before regular dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestLine {
    /// The briefing text
    pub text: String,
    delivered: bool,
}

impl QuestLine {
    /// Creates an undelivered quest line.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delivered: false,
        }
    }

    /// Whether the briefing has been delivered.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.delivered
    }
}

/// Default interaction radius in world units.
const INTERACTION_RADIUS: f32 = 80.0;
/// Default ticks between interactions.
const INTERACTION_COOLDOWN: u32 = 60;

/// A non-player character.
#[derive(Debug, Clone, Serialize)]
pub struct Npc {
    /// Shared entity body
    pub entity: Entity,
    kind: NpcKind,
    name: String,
    script: DialogueScript,
    interaction_radius: f32,
    cooldown_left: u32,
    quest: Option<QuestLine>,
}

impl Npc {
    /// Creates an NPC with the kind's default dialogue.
    #[must_use]
    pub fn new(kind: NpcKind, name: impl Into<String>, pos: Vec2, room: RoomId) -> Self {
        let script = DialogueScript::new(
            kind.default_lines()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        );
        Self {
            entity: Entity::new(Faction::Imperial, pos, 40.0, 70.0, 100, room),
            kind,
            name: name.into(),
            script,
            interaction_radius: INTERACTION_RADIUS,
            cooldown_left: 0,
            quest: None,
        }
    }

    /// Replaces the dialogue script.
    #[must_use]
    pub fn with_script(mut self, script: DialogueScript) -> Self {
        self.script = script;
        self
    }

    /// Attaches a quest briefing delivered on first interaction.
    #[must_use]
    pub fn with_quest(mut self, text: impl Into<String>) -> Self {
        self.quest = Some(QuestLine::new(text));
        self
    }

    /// Returns the NPC kind.
    #[must_use]
    pub const fn kind(&self) -> NpcKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this NPC carries a quest briefing.
    #[must_use]
    pub const fn has_quest(&self) -> bool {
        self.quest.is_some()
    }

    /// Whether the quest briefing (if any) has been delivered.
    #[must_use]
    pub fn quest_delivered(&self) -> bool {
        self.quest.as_ref().is_some_and(QuestLine::is_delivered)
    }

    /// Whether the player is close enough (and the cooldown clear) to talk.
    #[must_use]
    pub fn can_interact(&self, player_pos: Vec2) -> bool {
        self.cooldown_left == 0 && self.entity.distance_to(player_pos) < self.interaction_radius
    }

    /// Delivers the next line: the quest briefing first, then cycling
    /// dialogue. Starts the interaction cooldown.
    pub fn interact(&mut self) -> DialogueLine {
        self.cooldown_left = INTERACTION_COOLDOWN;

        if let Some(quest) = self.quest.as_mut() {
            if !quest.delivered {
                quest.delivered = true;
                return DialogueLine {
                    speaker: self.name.clone(),
                    text: quest.text.clone(),
                    kind: LineKind::Quest,
                };
            }
        }

        DialogueLine {
            speaker: self.name.clone(),
            text: self.script.next_line(),
            kind: LineKind::Dialogue,
        }
    }

    /// Advances the interaction cooldown by one tick.
    pub fn tick(&mut self) {
        self.cooldown_left = self.cooldown_left.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc() -> Npc {
        Npc::new(
            NpcKind::Soldier,
            "Sergeant Tarkus",
            Vec2::new(100.0, 300.0),
            RoomId::new(0),
        )
    }

    #[test]
    fn test_kinds_have_default_dialogue() {
        for kind in NpcKind::all() {
            assert!(!kind.default_lines().is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn test_interaction_range() {
        let npc = npc();
        assert!(npc.can_interact(Vec2::new(150.0, 300.0)));
        assert!(!npc.can_interact(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn test_interaction_cooldown() {
        let mut npc = npc();
        let near = Vec2::new(150.0, 300.0);

        npc.interact();
        assert!(!npc.can_interact(near));

        for _ in 0..INTERACTION_COOLDOWN {
            npc.tick();
        }
        assert!(npc.can_interact(near));
    }

    #[test]
    fn test_dialogue_cycles() {
        let mut npc = npc();
        let lines = NpcKind::Soldier.default_lines();

        let mut seen = Vec::new();
        for _ in 0..lines.len() {
            seen.push(npc.interact().text);
        }
        assert_eq!(seen, lines.iter().map(|s| (*s).to_string()).collect::<Vec<_>>());

        // Wraps back to the first line.
        assert_eq!(npc.interact().text, lines[0]);
    }

    #[test]
    fn test_quest_delivered_first_and_once() {
        let mut npc = npc().with_quest("Recover the relic from the reliquary.");

        let first = npc.interact();
        assert_eq!(first.kind, LineKind::Quest);
        assert!(npc.quest_delivered());

        let second = npc.interact();
        assert_eq!(second.kind, LineKind::Dialogue);
    }

    #[test]
    fn test_npcs_are_imperial_faction() {
        let npc = npc();
        assert_eq!(npc.entity.faction(), Faction::Imperial);
        assert!(!npc.entity.faction().is_hostile_to(Faction::Player));
    }
}
