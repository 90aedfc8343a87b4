//! Tab router: exactly one panel of grouped fields is visible at a time.

use crate::fields::FieldId;
use crate::surface::Surface;

/// Identifier of one tab panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabKey {
    Layout,
    Artwork,
    Details,
    Style,
}

/// Declaration of a tab: its key, button label, and the fields its panel
/// contains. File slots and the render controls sit outside the tabs.
pub struct TabSpec {
    pub key: TabKey,
    pub label: &'static str,
    pub fields: &'static [FieldId],
}

/// Declared tab order; the first entry is the initial active tab.
pub const TAB_SPECS: &[TabSpec] = &[
    TabSpec {
        key: TabKey::Layout,
        label: "Layout",
        fields: &[FieldId::Width, FieldId::Height, FieldId::Dpr, FieldId::Format],
    },
    TabSpec {
        key: TabKey::Artwork,
        label: "Artwork",
        fields: &[
            FieldId::BgScale,
            FieldId::BgOffsetX,
            FieldId::BgOffsetY,
            FieldId::MainScale,
            FieldId::MainOffsetX,
            FieldId::MainOffsetY,
        ],
    },
    TabSpec {
        key: TabKey::Details,
        label: "Details",
        fields: &[
            FieldId::PlayerName,
            FieldId::TeamName,
            FieldId::FavoriteChampion,
            FieldId::Playstyle,
            FieldId::SideTag,
            FieldId::BadgeText,
            FieldId::CardRank,
            FieldId::CornerLabel,
            FieldId::PlaystyleIcon,
        ],
    },
    TabSpec {
        key: TabKey::Style,
        label: "Style",
        fields: &[
            FieldId::BorderColor,
            FieldId::BorderWidth,
            FieldId::Radius,
            FieldId::BgBlur,
            FieldId::Transparent,
        ],
    },
];

/// Tab containing a given field, if the field lives inside a tab panel.
pub fn tab_for_field(field: FieldId) -> Option<TabKey> {
    TAB_SPECS
        .iter()
        .find(|spec| spec.fields.contains(&field))
        .map(|spec| spec.key)
}

/// Tracks the single active tab and pushes visibility state to the surface.
pub struct TabRouter {
    active: TabKey,
}

impl TabRouter {
    pub fn new() -> Self {
        Self {
            active: TAB_SPECS[0].key,
        }
    }

    pub fn active(&self) -> TabKey {
        self.active
    }

    /// Activate a tab: the surface hides every other panel and updates the
    /// selected/tabindex attributes so only the active panel is
    /// keyboard-reachable. Activating the already-active tab re-pushes the
    /// same state (harmless, and how initialization paints the first tab).
    pub fn activate<S: Surface>(&mut self, key: TabKey, surface: &mut S) {
        self.active = key;
        for spec in TAB_SPECS {
            surface.set_tab_state(spec.key, spec.key == key);
        }
    }
}

impl Default for TabRouter {
    fn default() -> Self {
        Self::new()
    }
}
