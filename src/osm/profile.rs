// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Describes which OSM ways form the road network of a [Graph](crate::Graph),
/// and which one-way and turn restriction tags apply to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile,
    /// customary the most specific [access tag](https://wiki.openstreetmap.org/wiki/Key:access).
    pub name: &'a str,

    /// Values of the [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag
    /// of ways which can be used for routing.
    pub highways: &'a [&'a str],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions.
    ///
    /// This array is used mainly used to follow the access tags, but also to follow mode-specific
    /// one-way and turn restrictions (see [Profile::is_allowed], [Profile::way_direction] and
    /// [Profile::is_exempted]).
    pub access: &'a [&'a str],

    /// Force no routing over [motorroad=yes](https://wiki.openstreetmap.org/wiki/Key:motorroad) ways.
    pub disallow_motorroad: bool,

    /// Force ignoring of [turn restrictions](https://wiki.openstreetmap.org/wiki/Turn_restriction).
    pub disable_restrictions: bool,
}

/// Turn restriction kind indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRestriction {
    /// Not a turn restriction, or a turn restriction which does not apply for the current [Profile].
    Inapplicable,

    /// The turn indicated by this restriction is prohibited.
    Prohibitory,

    /// After entering the via node from the `from` way, only the `to` way may be taken.
    Mandatory,
}

impl<'a> Profile<'a> {
    /// Checks if a way with the given tags is part of the road network: its highway value
    /// must be listed in [Profile::highways] and [Profile::is_allowed] must pass.
    pub fn is_routable(&self, tags: &HashMap<String, String>) -> bool {
        tags.get("highway")
            .is_some_and(|h| self.highways.contains(&h.as_str()))
            && self.is_allowed(tags)
    }

    /// Checks if the way is routable, by considering motor roads ([Profile::disallow_motorroad])
    /// and access tags ([Profile::access]).
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        // Check against the motorroad tag
        if self.disallow_motorroad && tags.get("motorroad").map(|v| v.as_str()) == Some("yes") {
            return false;
        }

        // Check against the access tags
        match self
            .access
            .iter()
            .rev()
            .find_map(|&mode| tags.get(mode).map(|v| v.as_str()))
        {
            Some("no") | Some("private") => false,
            _ => true,
        }
    }

    /// Checks if a way is traversable forward (first return value) and
    /// backwards (second return value) by investigating mode-specific and generic one-way tags.
    ///
    /// Some ways (highway=motorway, highway=motorway_link, junction=roundabout and
    /// junction=circular) default to being one-way, except if overridden by specific tags.
    pub fn way_direction(&self, tags: &HashMap<String, String>) -> (bool, bool) {
        let mut forward = true;
        let mut backward = true;

        match tags.get("highway").map(|s| s.as_str()).unwrap_or("") {
            "motorway" | "motorway_link" => backward = false,
            _ => {}
        }

        match tags.get("junction").map(|s| s.as_str()).unwrap_or("") {
            "roundabout" | "circular" => backward = false,
            _ => {}
        }

        match self.get_active_oneway_value(tags) {
            "yes" | "true" | "1" => {
                forward = true;
                backward = false;
            }

            "-1" | "reverse" => {
                forward = false;
                backward = true;
            }

            "no" => {
                forward = true;
                backward = true;
            }

            _ => {}
        }

        (forward, backward)
    }

    /// Returns the value of the most specific "oneway:MODE" tag (based on [Profile::access]),
    /// falling back to simply "oneway", and returning an empty string if no relevant tag was found.
    fn get_active_oneway_value<'t>(&self, tags: &'t HashMap<String, String>) -> &'t str {
        self.access
            .iter()
            .rev()
            .filter(|&&mode| mode != "access")
            .find_map(|&mode| tags.get(&format!("oneway:{}", mode)))
            .or_else(|| tags.get("oneway"))
            .map(|oneway_tag| oneway_tag.as_str())
            .unwrap_or("")
    }

    /// Figures out what kind of [TurnRestriction] a relation with given tags represents.
    pub fn restriction_kind(&self, tags: &HashMap<String, String>) -> TurnRestriction {
        if self.disable_restrictions
            || tags.get("type").map(|v| v.as_str()) != Some("restriction")
            || self.is_exempted(tags)
        {
            return TurnRestriction::Inapplicable;
        }

        let (kind, description) = self
            .get_active_restriction_tag(tags)
            .split_once('_')
            .unwrap_or(("", ""));

        match description {
            "right_turn" | "left_turn" | "u_turn" | "straight_on" => {}
            _ => return TurnRestriction::Inapplicable,
        }

        match kind {
            "no" => TurnRestriction::Prohibitory,
            "only" => TurnRestriction::Mandatory,
            _ => TurnRestriction::Inapplicable,
        }
    }

    /// Returns true if [Profile::access] intersects with any mode present in the `except` tag.
    /// If the tag is missing, returns false.
    pub fn is_exempted(&self, tags: &HashMap<String, String>) -> bool {
        tags.get("except")
            .map_or("", |v| v.as_str())
            .split(';')
            .any(|exempted_type| self.access.contains(&exempted_type))
    }

    /// Returns the value of the most specific "restriction:MODE" tag (based on [Profile::access]),
    /// falling back to simply "restriction".
    fn get_active_restriction_tag<'t>(&self, tags: &'t HashMap<String, String>) -> &'t str {
        self.access
            .iter()
            .rev()
            .filter(|&&mode| mode != "access")
            .find_map(|&mode| tags.get(&format!("restriction:{}", mode)))
            .or_else(|| tags.get("restriction"))
            .map(|v| v.as_str())
            .unwrap_or("")
    }
}

const MOTOR_HIGHWAYS: [&str; 16] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "minor",
    "residential",
    "living_street",
    "track",
    "service",
];

const BUS_HIGHWAYS: [&str; 17] = with_highway(MOTOR_HIGHWAYS, "busway");

/// Appends a highway value to a list of highway values.
const fn with_highway<const N: usize, const M: usize>(
    highways: [&'static str; N],
    extra: &'static str,
) -> [&'static str; M] {
    let mut out = [""; M];
    let mut i = 0;
    while i < N {
        out[i] = highways[i];
        i += 1;
    }
    out[N] = extra;
    out
}

/// Example routing [Profile] for cars, with appropriate
/// [access tags](https://wiki.openstreetmap.org/wiki/Key:access).
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    highways: &MOTOR_HIGHWAYS,
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    disallow_motorroad: false,
    disable_restrictions: false,
};

/// Example routing [Profile] for buses, additionally allowed on
/// `highway=busway` and bus-only roads.
pub const BUS_PROFILE: Profile = Profile {
    name: "bus",
    highways: &BUS_HIGHWAYS,
    access: &["access", "vehicle", "motor_vehicle", "psv", "bus"],
    disallow_motorroad: false,
    disable_restrictions: false,
};

#[cfg(test)]
mod tests {
    use super::{Profile, TurnRestriction, BUS_PROFILE, CAR_PROFILE};
    use std::collections::HashMap;

    const TEST_PROFILE: Profile = Profile {
        name: "cat",
        highways: &["footway", "path"],
        access: &["access", "cat"],
        disallow_motorroad: false,
        disable_restrictions: false,
    };

    const TEST_PROFILE_WITHOUT_MOTORROAD: Profile = Profile {
        disallow_motorroad: true,
        ..TEST_PROFILE
    };

    const TEST_PROFILE_WITHOUT_RESTRICTIONS: Profile = Profile {
        disable_restrictions: true,
        ..TEST_PROFILE
    };

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    #[test]
    fn is_routable() {
        assert!(TEST_PROFILE.is_routable(&tags! {"highway": "footway"}));
        assert!(TEST_PROFILE.is_routable(&tags! {"highway": "path"}));
        assert!(!TEST_PROFILE.is_routable(&tags! {"highway": "motorway"}));
        assert!(!TEST_PROFILE.is_routable(&tags! {}));
        assert!(!TEST_PROFILE.is_routable(&tags! {"highway": "path", "access": "no"}));
        assert!(TEST_PROFILE
            .is_routable(&tags! {"highway": "path", "access": "no", "cat": "destination"}));
        assert!(TEST_PROFILE.is_routable(&tags! {"highway": "path", "motorroad": "yes"}));
        assert!(!TEST_PROFILE_WITHOUT_MOTORROAD
            .is_routable(&tags! {"highway": "path", "motorroad": "yes"}));

        assert!(CAR_PROFILE.is_routable(&tags! {"highway": "primary"}));
        assert!(!CAR_PROFILE.is_routable(&tags! {"highway": "busway"}));
        assert!(!CAR_PROFILE.is_routable(&tags! {"highway": "primary", "motor_vehicle": "no"}));
        assert!(BUS_PROFILE.is_routable(&tags! {"highway": "busway"}));
        assert!(BUS_PROFILE
            .is_routable(&tags! {"highway": "primary", "motor_vehicle": "no", "bus": "yes"}));
    }

    #[test]
    fn bus_highways_extend_car_highways() {
        assert_eq!(BUS_PROFILE.highways.len(), CAR_PROFILE.highways.len() + 1);
        assert!(CAR_PROFILE
            .highways
            .iter()
            .all(|h| BUS_PROFILE.highways.contains(h)));
        assert_eq!(BUS_PROFILE.highways.last(), Some(&"busway"));
    }

    #[test]
    fn is_allowed() {
        assert!(TEST_PROFILE.is_allowed(&tags! {"highway": "footway"}));
        assert!(!TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "no"}));
        assert!(!TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "private"}));
        assert!(TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "destination"}));
        assert!(
            TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "no", "cat": "yes"})
        );
    }

    #[test]
    fn way_direction() {
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path"}),
            (true, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "oneway": "yes"}),
            (true, false),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "oneway": "-1"}),
            (false, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "motorway_link"}),
            (true, false),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "junction": "roundabout"}),
            (true, false),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "motorway_link", "oneway": "no"}),
            (true, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"junction": "circular", "oneway": "-1"}),
            (false, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "oneway": "yes", "oneway:cat": "no"}),
            (true, true),
        );
    }

    #[test]
    fn restriction_kind() {
        assert_eq!(
            TEST_PROFILE.restriction_kind(&tags! {"type": "multipolygon"}),
            TurnRestriction::Inapplicable,
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "no_u_turn"}),
            TurnRestriction::Prohibitory,
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "only_left_turn"}),
            TurnRestriction::Mandatory,
        );
        assert_eq!(
            TEST_PROFILE.restriction_kind(
                &tags! {"type": "restriction", "restriction": "only_left_turn", "except": "psv;cat"}
            ),
            TurnRestriction::Inapplicable,
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "only_360"}),
            TurnRestriction::Inapplicable,
        );
        assert_eq!(
            TEST_PROFILE.restriction_kind(
                &tags! {"type": "restriction", "restriction": "no_left_turn", "restriction:cat": "only_right_turn"}
            ),
            TurnRestriction::Mandatory,
        );
        assert_eq!(
            TEST_PROFILE_WITHOUT_RESTRICTIONS
                .restriction_kind(&tags! {"type": "restriction", "restriction": "no_u_turn"}),
            TurnRestriction::Inapplicable,
        );
    }
}
