//! Screen implementations. Each screen is a top-level Component.

pub mod lookup;
pub mod neighbours;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components in tab-bar order.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Lookup, Box::new(lookup::LookupScreen::new())),
        (
            ScreenId::Neighbours,
            Box::new(neighbours::NeighboursScreen::new()),
        ),
    ]
}
