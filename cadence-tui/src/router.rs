use anyhow::Result;
use ratatui::{Frame, crossterm::event::KeyCode, layout::Rect};

use crate::{
    routes::{browser::BrowserRoute, log::LogRoute, playback::PlaybackRoute, queue::QueueRoute},
    state::AppState,
};
use cadence_core::engine::AudioEngineHandle;

/// Trait that all routes must implement
pub trait RouteHandler: std::fmt::Debug {
    /// Render this route's UI
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Handle keyboard input for this route
    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> Result<RouteAction>;

    /// Get the display name for breadcrumbs/navigation
    fn name(&self) -> &str;

    /// Optional: Called when entering this route
    fn on_enter(&mut self, _state: &mut AppState, _handle: &AudioEngineHandle) -> Result<()> {
        Ok(())
    }

    /// Optional: Called when leaving this route
    fn on_exit(&mut self, _state: &mut AppState, _handle: &AudioEngineHandle) -> Result<()> {
        Ok(())
    }

    /// Key hints shown in the controls bar
    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![("Tab", "Switch Tab")]
    }
}

/// Actions that can be returned from route handlers
#[derive(Debug)]
pub enum RouteAction {
    /// Do nothing, stay on current route
    None,
    /// Go back to previous route
    Pop,
    /// Navigate to a new route
    Push(Box<dyn RouteHandler>),
    /// Replace the whole stack with a new tab
    Replace(Box<dyn RouteHandler>),
}

/// Router manages the navigation stack. The root is the active tab; pushed
/// routes are sub-views of it.
pub struct Router {
    root: Box<dyn RouteHandler>,
    stack: Vec<Box<dyn RouteHandler>>,
}

impl Router {
    pub fn new(initial_route: Box<dyn RouteHandler>) -> Self {
        Self {
            root: initial_route,
            stack: Vec::new(),
        }
    }

    /// Get current route (top of stack)
    pub fn current(&self) -> &dyn RouteHandler {
        self.stack.last().unwrap_or(&self.root).as_ref()
    }

    /// Get mutable reference to current route
    pub fn current_mut(&mut self) -> &mut Box<dyn RouteHandler> {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    /// Name of the active tab, whatever is pushed on top of it
    pub fn tab_name(&self) -> &str {
        self.root.name()
    }

    /// Execute a route action
    pub fn execute_action(
        &mut self,
        action: RouteAction,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> Result<()> {
        match action {
            RouteAction::None => Ok(()),
            RouteAction::Pop => self.pop(state, handle).map(|_| ()),
            RouteAction::Push(route) => self.push(route, state, handle),
            RouteAction::Replace(route) => self.replace(route, state, handle),
        }
    }

    /// Navigate to a new route (push onto stack)
    pub fn push(
        &mut self,
        mut route: Box<dyn RouteHandler>,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> Result<()> {
        route.on_enter(state, handle)?;
        self.stack.push(route);
        Ok(())
    }

    /// Go back (pop from stack). The root tab is never popped.
    pub fn pop(
        &mut self,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> Result<Option<Box<dyn RouteHandler>>> {
        match self.stack.pop() {
            Some(mut route) => {
                route.on_exit(state, handle)?;
                Ok(Some(route))
            }
            None => Ok(None),
        }
    }

    /// Switch tab: exit everything and make `new_route` the root
    pub fn replace(
        &mut self,
        mut new_route: Box<dyn RouteHandler>,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> Result<()> {
        while let Some(mut old_route) = self.stack.pop() {
            old_route.on_exit(state, handle)?;
        }
        self.root.on_exit(state, handle)?;
        new_route.on_enter(state, handle)?;
        self.root = new_route;
        Ok(())
    }

    /// Get the depth of navigation
    pub fn depth(&self) -> usize {
        self.stack.len() + 1
    }
}

/// Get a route handler for a given tab name
pub fn route_for_name(name: &str) -> Box<dyn RouteHandler> {
    match name {
        "Playback" => Box::new(PlaybackRoute),
        "Queue" => Box::new(QueueRoute),
        "Browser" => Box::new(BrowserRoute),
        "Log" => Box::new(LogRoute::new()),
        _ => Box::new(PlaybackRoute),
    }
}

/// Get all main tab names in order
pub fn tab_names() -> &'static [&'static str] {
    &["Playback", "Queue", "Browser", "Log"]
}

/// The tab after `current`, wrapping around
pub fn next_tab(current: &str) -> &'static str {
    let tabs = tab_names();
    let idx = tabs.iter().position(|n| *n == current).unwrap_or(0);
    tabs[(idx + 1) % tabs.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle() {
        assert_eq!(next_tab("Playback"), "Queue");
        assert_eq!(next_tab("Log"), "Playback");
        assert_eq!(next_tab("History"), "Queue");
        for name in tab_names() {
            assert_eq!(route_for_name(name).name(), *name);
        }
    }
}
