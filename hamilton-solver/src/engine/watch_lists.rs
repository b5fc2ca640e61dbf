use enum_map::EnumMap;

use super::domain_events::DomainEvent;
use super::domain_events::DomainEvents;
use super::variables::DomainRef;
use super::variables::GraphId;
use super::variables::IntegerId;
use crate::containers::KeyedVec;
use crate::hamilton_assert_moderate;
use crate::propagation::PropagatorId;

type Watchers = EnumMap<DomainEvent, Vec<PropagatorId>>;

/// For every variable and every [`DomainEvent`], the propagators which have to be notified when
/// that event happens.
#[derive(Debug, Default, Clone)]
pub(crate) struct WatchLists {
    graphs: KeyedVec<GraphId, Watchers>,
    integers: KeyedVec<IntegerId, Watchers>,
}

impl WatchLists {
    pub(crate) fn watch(
        &mut self,
        domain: DomainRef,
        events: DomainEvents,
        propagator_id: PropagatorId,
    ) {
        let watchers = self.watchers_mut(domain);

        for event in events.events() {
            hamilton_assert_moderate!(
                !watchers[event].contains(&propagator_id),
                "Propagator {propagator_id} is already watching {event} of {domain:?}"
            );
            watchers[event].push(propagator_id);
        }
    }

    pub(crate) fn get_watchers(&self, domain: DomainRef, event: DomainEvent) -> &[PropagatorId] {
        let watchers = match domain {
            DomainRef::Graph(graph) => self.graphs.get(graph),
            DomainRef::Integer(integer) => self.integers.get(integer),
        };

        watchers.map(|watchers| watchers[event].as_slice()).unwrap_or_default()
    }

    /// Whether any propagator is subscribed to any event of `domain`.
    pub(crate) fn is_watched(&self, domain: DomainRef) -> bool {
        let watchers = match domain {
            DomainRef::Graph(graph) => self.graphs.get(graph),
            DomainRef::Integer(integer) => self.integers.get(integer),
        };

        watchers.is_some_and(|watchers| watchers.values().any(|watching| !watching.is_empty()))
    }

    fn watchers_mut(&mut self, domain: DomainRef) -> &mut Watchers {
        match domain {
            DomainRef::Graph(graph) => {
                self.graphs.accommodate(graph, Watchers::default());
                &mut self.graphs[graph]
            }
            DomainRef::Integer(integer) => {
                self.integers.accommodate(integer, Watchers::default());
                &mut self.integers[integer]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn only_subscribed_events_are_watched() {
        let mut watch_lists = WatchLists::default();
        let graph = DomainRef::Graph(GraphId::create_from_index(1));

        watch_lists.watch(graph, DomainEvents::ARC_ENFORCED, PropagatorId(0));
        watch_lists.watch(graph, DomainEvents::ARCS, PropagatorId(2));

        assert_eq!(
            watch_lists.get_watchers(graph, DomainEvent::ArcEnforced),
            &[PropagatorId(0), PropagatorId(2)]
        );
        assert_eq!(
            watch_lists.get_watchers(graph, DomainEvent::ArcRemoved),
            &[PropagatorId(2)]
        );
        assert!(watch_lists
            .get_watchers(DomainRef::Graph(GraphId::create_from_index(0)), DomainEvent::ArcRemoved)
            .is_empty());
        assert!(watch_lists
            .get_watchers(
                DomainRef::Integer(IntegerId::create_from_index(0)),
                DomainEvent::UpperBound
            )
            .is_empty());
        assert!(watch_lists.is_watched(graph));
        assert!(!watch_lists.is_watched(DomainRef::Graph(GraphId::create_from_index(0))));
    }
}
