use super::types::View;
use crate::surface::Surface;

/// Tracks which view is visible and keeps the navigation links in step.
#[derive(Debug, Default)]
pub struct ViewController {
    active: Option<View>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchOutcome {
    pub view: View,
    /// False when the document has no link for the view.
    pub link_marked: bool,
    /// The caller owns the side effect; the switch itself never waits on it.
    pub loads_history: bool,
}

impl ViewController {
    pub fn new(initial: Option<View>) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Option<View> {
        self.active
    }

    pub fn switch_view(&mut self, surface: &dyn Surface, target: View) -> SwitchOutcome {
        for view in View::ALL {
            surface.set_view_visible(view, false);
        }
        surface.set_view_visible(target, true);

        for link_id in surface.nav_link_ids() {
            surface.set_link_active(&link_id, false);
        }
        let link_marked = surface.set_link_active(target.link_id(), true);
        if !link_marked {
            tracing::warn!("No navigation link {} in document", target.link_id());
        }

        tracing::debug!("Switched view: {:?} -> {:?}", self.active, target);
        self.active = Some(target);

        SwitchOutcome {
            view: target,
            link_marked,
            loads_history: target == View::History,
        }
    }
}
