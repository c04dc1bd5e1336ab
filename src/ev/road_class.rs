// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::EncodedEnum;

/// Classification of a road, based on the
/// [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoadClass {
    Other,
    Track,
    Service,
    LivingStreet,
    Residential,
    Unclassified,
    TertiaryLink,
    Tertiary,
    SecondaryLink,
    Secondary,
    PrimaryLink,
    Primary,
    TrunkLink,
    Trunk,
    MotorwayLink,
    Motorway,
}

impl RoadClass {
    pub fn from_tag(highway: &str) -> Self {
        match highway {
            "motorway" => Self::Motorway,
            "motorway_link" => Self::MotorwayLink,
            "trunk" => Self::Trunk,
            "trunk_link" => Self::TrunkLink,
            "primary" => Self::Primary,
            "primary_link" => Self::PrimaryLink,
            "secondary" => Self::Secondary,
            "secondary_link" => Self::SecondaryLink,
            "tertiary" => Self::Tertiary,
            "tertiary_link" => Self::TertiaryLink,
            "unclassified" | "minor" => Self::Unclassified,
            "residential" => Self::Residential,
            "living_street" => Self::LivingStreet,
            "service" => Self::Service,
            "track" => Self::Track,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Track => "track",
            Self::Service => "service",
            Self::LivingStreet => "living_street",
            Self::Residential => "residential",
            Self::Unclassified => "unclassified",
            Self::TertiaryLink => "tertiary_link",
            Self::Tertiary => "tertiary",
            Self::SecondaryLink => "secondary_link",
            Self::Secondary => "secondary",
            Self::PrimaryLink => "primary_link",
            Self::Primary => "primary",
            Self::TrunkLink => "trunk_link",
            Self::Trunk => "trunk",
            Self::MotorwayLink => "motorway_link",
            Self::Motorway => "motorway",
        }
    }

    /// Arterial roads and above - secondary up to motorway, including links.
    pub fn is_high_traffic(self) -> bool {
        self >= Self::SecondaryLink
    }

    /// Returns the main road class for link roads, and `self` otherwise.
    pub fn without_link(self) -> Self {
        match self {
            Self::MotorwayLink => Self::Motorway,
            Self::TrunkLink => Self::Trunk,
            Self::PrimaryLink => Self::Primary,
            Self::SecondaryLink => Self::Secondary,
            Self::TertiaryLink => Self::Tertiary,
            other => other,
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EncodedEnum for RoadClass {
    const VALUES: &'static [Self] = &[
        Self::Other,
        Self::Track,
        Self::Service,
        Self::LivingStreet,
        Self::Residential,
        Self::Unclassified,
        Self::TertiaryLink,
        Self::Tertiary,
        Self::SecondaryLink,
        Self::Secondary,
        Self::PrimaryLink,
        Self::Primary,
        Self::TrunkLink,
        Self::Trunk,
        Self::MotorwayLink,
        Self::Motorway,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }
}
