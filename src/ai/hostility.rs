//! # Hostility
//!
//! Who an agent is willing to attack.
//!
//! A [`HostilitySet`] names both whole affiliations and individual agents. The
//! defaults per affiliation come from a [`HostilityTable`] that is handed to
//! agent creation, so tests and mods can swap in their own food chain.

use crate::{Affiliation, Agent, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The affiliations and specific agents an agent treats as enemies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostilitySet {
    pub affiliations: BTreeSet<Affiliation>,
    pub agents: BTreeSet<EntityId>,
}

impl HostilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_affiliations(affiliations: impl IntoIterator<Item = Affiliation>) -> Self {
        Self {
            affiliations: affiliations.into_iter().collect(),
            agents: BTreeSet::new(),
        }
    }

    /// Adds a grudge against one specific agent.
    pub fn add_agent(&mut self, id: EntityId) {
        self.agents.insert(id);
    }

    /// Hostile when the other agent's affiliation or its identity is listed.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Affiliation, AgentTemplate, HostilitySet, HostilityTable, Position};
    ///
    /// let table = HostilityTable::empty();
    /// let player = AgentTemplate::player().spawn(Position::new(0, 0), &table);
    /// let mut grudges = HostilitySet::from_affiliations([Affiliation::Plants]);
    /// assert!(!grudges.is_hostile_to(&player));
    /// grudges.add_agent(player.id);
    /// assert!(grudges.is_hostile_to(&player));
    /// ```
    pub fn is_hostile_to(&self, other: &Agent) -> bool {
        self.affiliations.contains(&other.affiliation) || self.agents.contains(&other.id)
    }
}

/// Default hostility per affiliation. Affiliations without an entry are neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostilityTable {
    entries: BTreeMap<Affiliation, BTreeSet<Affiliation>>,
}

impl HostilityTable {
    /// A table where every affiliation is neutral.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock table: Einsof and generic hostiles hate everyone else, the
    /// nature consumers form a food chain, and the rest are neutral.
    pub fn standard() -> Self {
        let everyone_but = |me: Affiliation| {
            Affiliation::all()
                .into_iter()
                .filter(move |other| *other != me)
        };

        let mut table = Self::empty();
        table.set(Affiliation::Einsof, everyone_but(Affiliation::Einsof));
        table.set(Affiliation::GenericHostile, everyone_but(Affiliation::GenericHostile));
        table.set(
            Affiliation::Tier1Consumer,
            [Affiliation::Einsof, Affiliation::Plants, Affiliation::GenericHostile],
        );
        table.set(
            Affiliation::Tier2Consumer,
            [Affiliation::Einsof, Affiliation::Tier1Consumer, Affiliation::GenericHostile],
        );
        table.set(
            Affiliation::Tier3Consumer,
            [Affiliation::Einsof, Affiliation::Tier2Consumer, Affiliation::GenericHostile],
        );
        table
    }

    /// Replaces the hostile affiliations for `affiliation`.
    pub fn set(
        &mut self,
        affiliation: Affiliation,
        hostile_to: impl IntoIterator<Item = Affiliation>,
    ) {
        self.entries
            .insert(affiliation, hostile_to.into_iter().collect());
    }

    /// The hostility set a freshly spawned agent of `affiliation` starts with.
    pub fn default_for(&self, affiliation: Affiliation) -> Option<HostilitySet> {
        self.entries
            .get(&affiliation)
            .map(|hostile| HostilitySet::from_affiliations(hostile.iter().copied()))
    }
}

/// Filters what an agent can see down to what it wants to fight.
pub struct HostilityResolver;

impl HostilityResolver {
    /// Ids of the hostile agents among `visible`, in the order they were given.
    ///
    /// A neutral agent (no hostility set) never resolves any targets.
    pub fn resolve<'a>(
        agent: &Agent,
        visible: impl IntoIterator<Item = &'a Agent>,
    ) -> Vec<EntityId> {
        let Some(hostility) = agent.hostility.as_ref() else {
            return Vec::new();
        };
        visible
            .into_iter()
            .filter(|other| other.id != agent.id && hostility.is_hostile_to(other))
            .map(|other| other.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentTemplate, Position};

    fn with_affiliation(affiliation: Affiliation, table: &HostilityTable) -> Agent {
        let mut template = AgentTemplate::orc();
        template.affiliation = affiliation;
        template.spawn(Position::new(0, 0), table)
    }

    #[test]
    fn test_standard_table() {
        let table = HostilityTable::standard();
        let hostile = table.default_for(Affiliation::GenericHostile).unwrap();
        assert!(hostile.affiliations.contains(&Affiliation::Player));
        assert!(!hostile.affiliations.contains(&Affiliation::GenericHostile));
        assert_eq!(hostile.affiliations.len(), 7);

        let tier2 = table.default_for(Affiliation::Tier2Consumer).unwrap();
        assert!(tier2.affiliations.contains(&Affiliation::Tier1Consumer));
        assert!(!tier2.affiliations.contains(&Affiliation::Plants));

        assert!(table.default_for(Affiliation::Player).is_none());
        assert!(table.default_for(Affiliation::Plants).is_none());
        assert!(table.default_for(Affiliation::Neutral).is_none());
    }

    #[test]
    fn test_custom_table_substitution() {
        let mut table = HostilityTable::empty();
        table.set(Affiliation::Plants, [Affiliation::Player]);
        let plant = with_affiliation(Affiliation::Plants, &table);
        let orc = with_affiliation(Affiliation::GenericHostile, &table);
        assert!(plant.hostility.is_some());
        assert!(orc.hostility.is_none());
    }

    #[test]
    fn test_resolve_by_affiliation_and_identity() {
        let table = HostilityTable::standard();
        let mut tier1 = with_affiliation(Affiliation::Tier1Consumer, &table);
        let plant = with_affiliation(Affiliation::Plants, &table);
        let neutral = with_affiliation(Affiliation::Neutral, &table);
        let other_tier1 = with_affiliation(Affiliation::Tier1Consumer, &table);

        let found = HostilityResolver::resolve(&tier1, [&neutral, &plant, &other_tier1]);
        assert_eq!(found, vec![plant.id]);

        tier1.hostility.as_mut().unwrap().add_agent(neutral.id);
        let found = HostilityResolver::resolve(&tier1, [&neutral, &plant, &other_tier1]);
        assert_eq!(found, vec![neutral.id, plant.id]);
    }

    #[test]
    fn test_neutral_agent_resolves_nothing() {
        let table = HostilityTable::standard();
        let player = AgentTemplate::player().spawn(Position::new(0, 0), &table);
        let orc = with_affiliation(Affiliation::GenericHostile, &table);
        assert!(HostilityResolver::resolve(&player, [&orc]).is_empty());
    }

    #[test]
    fn test_agent_never_targets_itself() {
        let table = HostilityTable::standard();
        let mut orc = with_affiliation(Affiliation::GenericHostile, &table);
        let id = orc.id;
        orc.hostility.as_mut().unwrap().add_agent(id);
        let copy = orc.clone();
        assert!(HostilityResolver::resolve(&orc, [&copy]).is_empty());
    }
}
