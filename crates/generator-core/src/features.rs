//! Feature registry
//!
//! The closed set of optional features a generated application can carry,
//! plus the resolution step that turns a user-supplied selection into the
//! internal feature set. File gating and markup fragments are declared in
//! the template manifests; this table is the single in-code source of truth
//! for the identifiers themselves.

use crate::config::{AppConfig, FeatureSelection};
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Optional features of a generated application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    NavigationBar,
    DrawerBar,
    SearchBar,
    ContentPage,
    BpmTaskPage,
    UserInfo,
}

/// Resolved set of active features; ordered so iteration is stable
pub type FeatureSet = BTreeSet<Feature>;

impl Feature {
    /// Every feature, in declaration order
    pub const ALL: [Feature; 6] = [
        Feature::NavigationBar,
        Feature::DrawerBar,
        Feature::SearchBar,
        Feature::ContentPage,
        Feature::BpmTaskPage,
        Feature::UserInfo,
    ];

    /// Wire identifier, as used in prompts, manifests and templates
    pub fn id(&self) -> &'static str {
        match self {
            Feature::NavigationBar => "navigationBar",
            Feature::DrawerBar => "drawerBar",
            Feature::SearchBar => "searchBar",
            Feature::ContentPage => "contentPage",
            Feature::BpmTaskPage => "bpmTaskPage",
            Feature::UserInfo => "userInfo",
        }
    }

    /// Human-readable title for prompt items
    pub fn title(&self) -> &'static str {
        match self {
            Feature::NavigationBar => "Navigation bar",
            Feature::DrawerBar => "Drawer bar",
            Feature::SearchBar => "Search bar",
            Feature::ContentPage => "Content page",
            Feature::BpmTaskPage => "Process task page",
            Feature::UserInfo => "User info widget",
        }
    }

    /// Short hint shown next to the prompt item
    pub fn hint(&self) -> &'static str {
        match self {
            Feature::NavigationBar => "top navigation markup in the app shell",
            Feature::DrawerBar => "collapsible side drawer markup",
            Feature::SearchBar => "search control and search results component",
            Feature::ContentPage => "document list, upload button and upload service",
            Feature::BpmTaskPage => "process services task and form components",
            Feature::UserInfo => "logged-in user widget in the header",
        }
    }

    /// Parse a wire identifier
    pub fn parse(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.id() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Resolve the configuration's feature selection into the internal set
///
/// Pure function of the configuration. An empty or absent selection resolves
/// to the empty set (the minimal file set). An identifier unknown to the
/// registry is an [`Error::UnknownFeature`] - a user typo must fail the run
/// before any file is written, not silently no-op.
pub fn resolve_active_features(config: &AppConfig) -> Result<FeatureSet> {
    let mut active = FeatureSet::new();

    match &config.features {
        FeatureSelection::List(names) => {
            for name in names {
                let feature = Feature::parse(name).ok_or_else(|| Error::UnknownFeature {
                    name: name.clone(),
                })?;
                active.insert(feature);
            }
        }
        FeatureSelection::Flags(flags) => {
            for (enabled, feature) in [
                (flags.navigation_bar, Feature::NavigationBar),
                (flags.drawer_bar, Feature::DrawerBar),
                (flags.search_bar, Feature::SearchBar),
                (flags.content_page, Feature::ContentPage),
                (flags.bpm_task_page, Feature::BpmTaskPage),
                (flags.user_info, Feature::UserInfo),
            ] {
                if enabled {
                    active.insert(feature);
                }
            }
        }
    }

    Ok(active)
}
