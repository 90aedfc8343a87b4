//! Typed field table for the card form.
//!
//! The browser form addresses its inputs by string name; here every
//! recognized field is enumerated up front together with its value domain,
//! and the raw string values are checked against that domain at the
//! serialization boundary. Values are stored verbatim as strings until then,
//! matching how form controls hold state.

use std::collections::HashMap;

/// Every field the render request recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Width,
    Height,
    Dpr,
    Format,
    Transparent,
    BorderColor,
    BorderWidth,
    Radius,
    BgBlur,
    BgScale,
    BgOffsetX,
    BgOffsetY,
    MainScale,
    MainOffsetX,
    MainOffsetY,
    PlayerName,
    TeamName,
    FavoriteChampion,
    Playstyle,
    SideTag,
    BadgeText,
    CardRank,
    CornerLabel,
    PlaystyleIcon,
}

impl FieldId {
    /// Wire name of the field as the endpoint expects it.
    pub fn name(self) -> &'static str {
        match self {
            FieldId::Width => "width",
            FieldId::Height => "height",
            FieldId::Dpr => "dpr",
            FieldId::Format => "format",
            FieldId::Transparent => "transparent",
            FieldId::BorderColor => "borderColor",
            FieldId::BorderWidth => "borderWidth",
            FieldId::Radius => "radius",
            FieldId::BgBlur => "bgBlur",
            FieldId::BgScale => "bgScale",
            FieldId::BgOffsetX => "bgOffsetX",
            FieldId::BgOffsetY => "bgOffsetY",
            FieldId::MainScale => "mainScale",
            FieldId::MainOffsetX => "mainOffsetX",
            FieldId::MainOffsetY => "mainOffsetY",
            FieldId::PlayerName => "playerName",
            FieldId::TeamName => "teamName",
            FieldId::FavoriteChampion => "favoriteChampion",
            FieldId::Playstyle => "playstyle",
            FieldId::SideTag => "sideTag",
            FieldId::BadgeText => "badgeText",
            FieldId::CardRank => "cardRank",
            FieldId::CornerLabel => "cornerLabel",
            FieldId::PlaystyleIcon => "playstyleIcon",
        }
    }

    /// Reverse lookup from a wire name.
    pub fn from_name(name: &str) -> Option<FieldId> {
        FIELD_SPECS
            .iter()
            .map(|spec| spec.id)
            .find(|id| id.name() == name)
    }
}

/// Expected value domain for a field, mirroring the native input constraints
/// declared in the markup.
#[derive(Debug, Clone, Copy)]
pub enum FieldDomain {
    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },
    /// Decimal number within an inclusive range
    Decimal { min: f64, max: f64 },
    /// One of a fixed set of values (compared case-insensitively)
    Choice(&'static [&'static str]),
    /// Free text up to a maximum length
    Text { max_len: usize },
    /// Checkbox-style flag; serialized only when truthy
    Flag,
}

impl FieldDomain {
    /// Check a raw string value against the domain. Returns a human-readable
    /// reason on violation, suitable for the status line.
    pub fn check(&self, raw: &str) -> std::result::Result<(), String> {
        match self {
            FieldDomain::Integer { min, max } => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| "must be a whole number".to_string())?;
                if value < *min || value > *max {
                    return Err(format!("must be between {} and {}", min, max));
                }
                Ok(())
            }
            FieldDomain::Decimal { min, max } => {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| "must be a number".to_string())?;
                if !value.is_finite() || value < *min || value > *max {
                    return Err(format!("must be between {} and {}", min, max));
                }
                Ok(())
            }
            FieldDomain::Choice(options) => {
                let lowered = raw.trim().to_ascii_lowercase();
                if options.iter().any(|opt| *opt == lowered) {
                    Ok(())
                } else {
                    Err(format!("must be one of: {}", options.join(", ")))
                }
            }
            FieldDomain::Text { max_len } => {
                if raw.chars().count() > *max_len {
                    Err(format!("must be at most {} characters", max_len))
                } else {
                    Ok(())
                }
            }
            FieldDomain::Flag => Ok(()),
        }
    }
}

/// Declaration of one recognized field: its domain, its default value (if
/// the form seeds one), and the sync key linking its paired number/range
/// controls (if any).
pub struct FieldSpec {
    pub id: FieldId,
    pub domain: FieldDomain,
    pub default: Option<&'static str>,
    pub sync_key: Option<&'static str>,
}

/// Values the `transparent` flag treats as set.
pub const TRUTHY_FLAG_VALUES: &[&str] = &["on", "true", "1"];

/// Format values offered by the form.
pub const FORMAT_CHOICES: &[&str] = &["png", "jpeg", "pdf"];

/// Playstyle icon keys offered by the form.
pub const ICON_CHOICES: &[&str] = &["rushdown", "zoning", "mixups", "grappler", "allrounder"];

/// The complete field table, in declaration (tab) order. Constraint
/// validation reports the first violation in this order.
pub const FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        id: FieldId::Width,
        domain: FieldDomain::Integer { min: 64, max: 2048 },
        default: Some("384"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::Height,
        domain: FieldDomain::Integer { min: 64, max: 2048 },
        default: Some("576"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::Dpr,
        domain: FieldDomain::Decimal { min: 1.0, max: 4.0 },
        default: Some("3"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::Format,
        domain: FieldDomain::Choice(FORMAT_CHOICES),
        default: Some("png"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::BgScale,
        domain: FieldDomain::Integer { min: 10, max: 400 },
        default: Some("100"),
        sync_key: Some("bgScale"),
    },
    FieldSpec {
        id: FieldId::BgOffsetX,
        domain: FieldDomain::Integer { min: -500, max: 500 },
        default: Some("0"),
        sync_key: Some("bgOffsetX"),
    },
    FieldSpec {
        id: FieldId::BgOffsetY,
        domain: FieldDomain::Integer { min: -500, max: 500 },
        default: Some("0"),
        sync_key: Some("bgOffsetY"),
    },
    FieldSpec {
        id: FieldId::MainScale,
        domain: FieldDomain::Integer { min: 10, max: 300 },
        default: Some("92"),
        sync_key: Some("mainScale"),
    },
    FieldSpec {
        id: FieldId::MainOffsetX,
        domain: FieldDomain::Integer { min: -500, max: 500 },
        default: Some("0"),
        sync_key: Some("mainOffsetX"),
    },
    FieldSpec {
        id: FieldId::MainOffsetY,
        domain: FieldDomain::Integer { min: -500, max: 500 },
        default: Some("0"),
        sync_key: Some("mainOffsetY"),
    },
    FieldSpec {
        id: FieldId::PlayerName,
        domain: FieldDomain::Text { max_len: 40 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::TeamName,
        domain: FieldDomain::Text { max_len: 28 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::FavoriteChampion,
        domain: FieldDomain::Text { max_len: 32 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::Playstyle,
        domain: FieldDomain::Text { max_len: 16 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::SideTag,
        domain: FieldDomain::Text { max_len: 48 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::BadgeText,
        domain: FieldDomain::Text { max_len: 20 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::CardRank,
        domain: FieldDomain::Text { max_len: 8 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::CornerLabel,
        domain: FieldDomain::Text { max_len: 6 },
        default: None,
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::PlaystyleIcon,
        domain: FieldDomain::Choice(ICON_CHOICES),
        default: Some("rushdown"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::BorderColor,
        domain: FieldDomain::Text { max_len: 16 },
        default: Some("#d4af37"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::BorderWidth,
        domain: FieldDomain::Integer { min: 0, max: 60 },
        default: Some("12"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::Radius,
        domain: FieldDomain::Integer { min: 0, max: 96 },
        default: Some("28"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::BgBlur,
        domain: FieldDomain::Integer { min: 0, max: 40 },
        default: Some("4"),
        sync_key: None,
    },
    FieldSpec {
        id: FieldId::Transparent,
        domain: FieldDomain::Flag,
        default: None,
        sync_key: None,
    },
];

/// Look up the declaration for a field.
pub fn spec_for(id: FieldId) -> &'static FieldSpec {
    FIELD_SPECS
        .iter()
        .find(|spec| spec.id == id)
        .expect("every FieldId has a spec entry")
}

/// Live values of the form, stored as raw strings keyed by field.
///
/// Construction seeds every field that declares a default, so a freshly
/// built form serializes to the same request the untouched page would send.
#[derive(Debug, Clone)]
pub struct FormState {
    values: HashMap<FieldId, String>,
}

impl FormState {
    pub fn new() -> Self {
        let mut values = HashMap::new();
        for spec in FIELD_SPECS {
            if let Some(default) = spec.default {
                values.insert(spec.id, default.to_string());
            }
        }
        Self { values }
    }

    /// Store a raw value verbatim.
    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }

    /// Current raw value, if any.
    pub fn get(&self, id: FieldId) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }

    /// Whether the `transparent` flag is currently set.
    pub fn flag_set(&self, id: FieldId) -> bool {
        self.get(id)
            .map(|raw| TRUTHY_FLAG_VALUES.contains(&raw.trim().to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// First field whose value violates its declared domain, in table order,
    /// together with the violation reason.
    pub fn first_invalid(&self) -> Option<(FieldId, String)> {
        for spec in FIELD_SPECS {
            if let Some(raw) = self.get(spec.id) {
                if let Err(reason) = spec.domain.check(raw) {
                    return Some((spec.id, reason));
                }
            }
        }
        None
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
