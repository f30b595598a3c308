//! # Content Catalog
//!
//! The templates a floor can be populated with, plus the tables deciding how
//! many of them appear and how often.

use crate::{
    Agent, AgentTemplate, DelveError, DelveResult, HostilityTable, Item, ItemTemplate, Position,
    SpawnEntry, SpawnTable,
};
use std::collections::BTreeMap;

/// Everything generation needs to know about agents and items.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    pub agents: BTreeMap<String, AgentTemplate>,
    pub items: BTreeMap<String, ItemTemplate>,
    pub monster_table: SpawnTable,
    pub item_table: SpawnTable,
    /// `(min_floor, max_count)` thresholds for monsters per room
    pub max_monsters: Vec<(u32, u32)>,
    /// `(min_floor, max_count)` thresholds for items per room
    pub max_items: Vec<(u32, u32)>,
    pub hostilities: HostilityTable,
}

impl ContentCatalog {
    /// The stock bestiary, armory and spawn tables.
    pub fn standard() -> Self {
        let agents = [
            ("player", AgentTemplate::player()),
            ("orc", AgentTemplate::orc()),
            ("troll", AgentTemplate::troll()),
            ("kobold", AgentTemplate::kobold()),
        ];
        let items = [
            ("health_potion", ItemTemplate::new("Health Potion", '!', [127, 0, 255])),
            ("confusion_scroll", ItemTemplate::new("Confusion Scroll", '~', [207, 63, 255])),
            ("lightning_scroll", ItemTemplate::new("Lightning Scroll", '~', [255, 255, 0])),
            ("fireball_scroll", ItemTemplate::new("Fireball Scroll", '~', [255, 0, 0])),
            ("dagger", ItemTemplate::new("Dagger", '/', [0, 191, 255])),
            ("sword", ItemTemplate::new("Sword", '/', [0, 191, 255])),
            ("leather_armor", ItemTemplate::new("Leather Armor", '[', [139, 69, 19])),
            ("chain_mail", ItemTemplate::new("Chain Mail", '[', [139, 69, 19])),
        ];

        Self {
            agents: agents
                .into_iter()
                .map(|(id, template)| (id.to_string(), template))
                .collect(),
            items: items
                .into_iter()
                .map(|(id, template)| (id.to_string(), template))
                .collect(),
            monster_table: SpawnTable::new(vec![
                SpawnEntry::new("orc", 80, 0),
                SpawnEntry::new("kobold", 20, 2),
                SpawnEntry::new("troll", 15, 3),
                SpawnEntry::new("troll", 30, 5),
                SpawnEntry::new("troll", 60, 7),
            ]),
            item_table: SpawnTable::new(vec![
                SpawnEntry::new("health_potion", 35, 0),
                SpawnEntry::new("confusion_scroll", 10, 2),
                SpawnEntry::new("lightning_scroll", 25, 4),
                SpawnEntry::new("sword", 5, 4),
                SpawnEntry::new("fireball_scroll", 25, 6),
                SpawnEntry::new("chain_mail", 15, 6),
            ]),
            max_monsters: vec![(1, 2), (4, 3), (6, 5)],
            max_items: vec![(1, 1), (4, 2)],
            hostilities: HostilityTable::standard(),
        }
    }

    /// Spawns a fresh agent from the template registered under `template_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{ContentCatalog, Position};
    ///
    /// let content = ContentCatalog::standard();
    /// let troll = content.spawn_agent("troll", Position::new(3, 4)).unwrap();
    /// assert_eq!(troll.name, "Troll");
    /// assert!(content.spawn_agent("dragon", Position::new(0, 0)).is_err());
    /// ```
    pub fn spawn_agent(&self, template_id: &str, position: Position) -> DelveResult<Agent> {
        self.agents
            .get(template_id)
            .map(|template| template.spawn(position, &self.hostilities))
            .ok_or_else(|| unknown_template("agent", template_id))
    }

    pub fn spawn_item(&self, template_id: &str, position: Position) -> DelveResult<Item> {
        self.items
            .get(template_id)
            .map(|template| template.spawn(position))
            .ok_or_else(|| unknown_template("item", template_id))
    }

    /// A fresh player agent.
    pub fn spawn_player(&self, position: Position) -> DelveResult<Agent> {
        self.spawn_agent("player", position)
    }

    /// Checks that every spawn table entry names a registered template.
    pub fn validate(&self) -> DelveResult<()> {
        for entry in &self.monster_table.entries {
            if !self.agents.contains_key(&entry.template_id) {
                return Err(unknown_template("agent", &entry.template_id));
            }
        }
        for entry in &self.item_table.entries {
            if !self.items.contains_key(&entry.template_id) {
                return Err(unknown_template("item", &entry.template_id));
            }
        }
        Ok(())
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn unknown_template(kind: &str, id: &str) -> DelveError {
    DelveError::InvalidConfig(format!("no {} template named '{}'", kind, id))
}
