//! Overlay panel controller
//!
//! Search, cart and menu overlays are mutually exclusive: toggling one
//! flips it and closes the other two, even when the toggle closes it.
//! Any scroll closes everything. State lives for the page session only.

/// Toggleable overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Search form
    Search,
    /// Shopping cart
    Cart,
    /// Navigation menu
    Menu,
}

/// Which overlay is visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PanelState {
    /// Rest state, also forced on scroll
    #[default]
    AllClosed,
    /// Search form visible
    SearchOpen,
    /// Shopping cart visible
    CartOpen,
    /// Navigation menu visible
    MenuOpen,
}

impl PanelState {
    /// State with only `panel` open
    #[inline]
    #[must_use]
    pub fn open(panel: Panel) -> Self {
        match panel {
            Panel::Search => Self::SearchOpen,
            Panel::Cart => Self::CartOpen,
            Panel::Menu => Self::MenuOpen,
        }
    }

    /// Open panel, if any
    #[inline]
    #[must_use]
    pub fn panel(self) -> Option<Panel> {
        match self {
            Self::AllClosed => None,
            Self::SearchOpen => Some(Panel::Search),
            Self::CartOpen => Some(Panel::Cart),
            Self::MenuOpen => Some(Panel::Menu),
        }
    }

    /// Per-panel `active` flags for the view layer
    #[must_use]
    pub fn flags(self) -> PanelFlags {
        PanelFlags {
            search: self == Self::SearchOpen,
            cart: self == Self::CartOpen,
            menu: self == Self::MenuOpen,
        }
    }
}

/// `active` class of each overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelFlags {
    /// Search form active
    pub search: bool,
    /// Shopping cart active
    pub cart: bool,
    /// Navigation menu active
    pub menu: bool,
}

/// Mutually-exclusive overlay state machine
#[derive(Debug, Clone, Default)]
pub struct PanelController {
    state: PanelState,
}

impl PanelController {
    /// Create controller with everything closed
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Check if `panel` is visible
    #[inline]
    #[must_use]
    pub fn is_open(&self, panel: Panel) -> bool {
        self.state.panel() == Some(panel)
    }

    /// Flip `panel`, closing the other two
    pub fn toggle(&mut self, panel: Panel) -> PanelState {
        self.state = if self.is_open(panel) {
            PanelState::AllClosed
        } else {
            PanelState::open(panel)
        };
        tracing::debug!("Toggled {:?} panel: {:?}", panel, self.state);
        self.state
    }

    /// Close everything
    pub fn on_scroll(&mut self) -> PanelState {
        self.state = PanelState::AllClosed;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert_eq!(PanelController::new().state(), PanelState::AllClosed);
    }

    #[test]
    fn cart_over_search_closes_search() {
        let mut panels = PanelController::new();
        panels.toggle(Panel::Search);

        let state = panels.toggle(Panel::Cart);

        assert_eq!(state, PanelState::CartOpen);
        assert_eq!(
            state.flags(),
            PanelFlags {
                search: false,
                cart: true,
                menu: false
            }
        );
    }

    #[test]
    fn toggling_open_panel_closes_all() {
        let mut panels = PanelController::new();
        panels.toggle(Panel::Menu);
        assert_eq!(panels.toggle(Panel::Menu), PanelState::AllClosed);
    }

    #[test]
    fn scroll_closes_from_every_state() {
        for panel in [None, Some(Panel::Search), Some(Panel::Cart), Some(Panel::Menu)] {
            let mut panels = PanelController::new();
            if let Some(panel) = panel {
                panels.toggle(panel);
            }
            assert_eq!(panels.on_scroll(), PanelState::AllClosed);
            assert_eq!(panels.state().flags(), PanelFlags::default());
        }
    }
}
