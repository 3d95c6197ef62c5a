//! Command and route dispatch
//!
//! Components never call into each other directly; they enqueue named commands
//! and routes on a dispatcher the application drains once per frame. This keeps
//! dispatch single-threaded and re-entrancy free: a dialog callback that
//! re-invokes a command only appends to the queue.
//!
//! Routes are namespaced by their first path segment (`library/templates/pages`
//! belongs to the `library` namespace). The bus remembers the current route per
//! namespace so a section can save it before a tab switch and restore it the
//! next time it is shown.

use crate::model::modal::{ConnectArgs, ImportArgs, InsertArgs, ModalConfig};
use crate::model::template::TemplateModel;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Typed argument bag attached to a command or route dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CommandArgs {
    #[default]
    None,
    Show(ModalConfig),
    Insert(InsertArgs),
    Import(ImportArgs),
    Model(TemplateModel),
    Connect(ConnectArgs),
}

/// A queued dispatch waiting to be handled by the application.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    Command { name: String, args: CommandArgs },
    Route { name: String, args: CommandArgs },
}

/// The dispatch interface handed to components.
///
/// Trait-object based so tests can substitute a recording stub.
pub trait Dispatcher {
    /// Enqueue a named command.
    fn run(&self, command: &str, args: CommandArgs);

    /// Enqueue a named route and mark it current for its namespace.
    fn route(&self, route: &str, args: CommandArgs);

    /// Remember the namespace's current route for later restoration.
    fn save_route_state(&self, namespace: &str);

    /// Re-route to the namespace's saved route. Returns whether one existed;
    /// a missing saved route is a normal condition, not an error.
    fn restore_route_state(&self, namespace: &str) -> bool;
}

fn namespace_of(route: &str) -> &str {
    route.split('/').next().unwrap_or(route)
}

/// Queue-backed production dispatcher.
#[derive(Default)]
pub struct QueueBus {
    queue: RefCell<VecDeque<BusMessage>>,
    current_routes: RefCell<HashMap<String, String>>,
    saved_routes: RefCell<HashMap<String, String>>,
}

impl QueueBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next queued dispatch, if any.
    pub fn take_next(&self) -> Option<BusMessage> {
        self.queue.borrow_mut().pop_front()
    }

    /// The route currently active within a namespace.
    pub fn current_route(&self, namespace: &str) -> Option<String> {
        self.current_routes.borrow().get(namespace).cloned()
    }
}

impl Dispatcher for QueueBus {
    fn run(&self, command: &str, args: CommandArgs) {
        trace!(event = "bus.command_queued", command = command);
        self.queue.borrow_mut().push_back(BusMessage::Command {
            name: command.to_string(),
            args,
        });
    }

    fn route(&self, route: &str, args: CommandArgs) {
        trace!(event = "bus.route_queued", route = route);
        self.current_routes
            .borrow_mut()
            .insert(namespace_of(route).to_string(), route.to_string());
        self.queue.borrow_mut().push_back(BusMessage::Route {
            name: route.to_string(),
            args,
        });
    }

    fn save_route_state(&self, namespace: &str) {
        let current = self.current_routes.borrow().get(namespace).cloned();
        if let Some(route) = current {
            self.saved_routes
                .borrow_mut()
                .insert(namespace.to_string(), route);
        }
    }

    fn restore_route_state(&self, namespace: &str) -> bool {
        let saved = self.saved_routes.borrow().get(namespace).cloned();
        match saved {
            Some(route) => {
                self.route(&route, CommandArgs::None);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_routes_are_drained_in_order() {
        let bus = QueueBus::new();
        bus.run("library/open", CommandArgs::None);
        bus.route("library/templates/pages", CommandArgs::None);

        assert_eq!(
            bus.take_next(),
            Some(BusMessage::Command {
                name: "library/open".to_string(),
                args: CommandArgs::None,
            })
        );
        assert_eq!(
            bus.take_next(),
            Some(BusMessage::Route {
                name: "library/templates/pages".to_string(),
                args: CommandArgs::None,
            })
        );
        assert_eq!(bus.take_next(), None);
    }

    #[test]
    fn routing_tracks_the_current_route_per_namespace() {
        let bus = QueueBus::new();
        assert_eq!(bus.current_route("library"), None);

        bus.route("library/templates/blocks", CommandArgs::None);
        bus.route("editor/canvas", CommandArgs::None);

        assert_eq!(
            bus.current_route("library").as_deref(),
            Some("library/templates/blocks")
        );
        assert_eq!(bus.current_route("editor").as_deref(), Some("editor/canvas"));
    }

    #[test]
    fn restore_without_a_saved_route_reports_false() {
        let bus = QueueBus::new();
        bus.route("library/templates/blocks", CommandArgs::None);
        while bus.take_next().is_some() {}

        assert!(!bus.restore_route_state("library"));
        assert_eq!(bus.take_next(), None);
    }

    #[test]
    fn save_then_restore_re_routes_to_the_saved_route() {
        let bus = QueueBus::new();
        bus.route("library/templates/pages", CommandArgs::None);
        bus.save_route_state("library");
        while bus.take_next().is_some() {}

        assert!(bus.restore_route_state("library"));
        assert_eq!(
            bus.take_next(),
            Some(BusMessage::Route {
                name: "library/templates/pages".to_string(),
                args: CommandArgs::None,
            })
        );
    }

    #[test]
    fn save_captures_the_route_active_before_a_switch() {
        let bus = QueueBus::new();
        bus.route("library/templates/pages", CommandArgs::None);

        // Tab switch: state is saved first, then the new tab is routed.
        bus.save_route_state("library");
        bus.route("library/templates/blocks", CommandArgs::None);
        while bus.take_next().is_some() {}

        assert!(bus.restore_route_state("library"));
        assert_eq!(
            bus.take_next(),
            Some(BusMessage::Route {
                name: "library/templates/pages".to_string(),
                args: CommandArgs::None,
            })
        );
    }
}
