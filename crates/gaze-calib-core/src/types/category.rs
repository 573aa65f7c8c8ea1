//! Session categories recorded alongside every calibration sample.
//!
//! The capture protocol walks a fixed set of head positions for each of a
//! fixed set of distances. Both are closed sets, so unknown labels are
//! rejected when a record is parsed rather than deep inside an estimator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CalibError;

/// Where the user was asked to hold their head while looking at a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadPosition {
    #[serde(rename = "Middle")]
    Middle,
    #[serde(rename = "Top")]
    Top,
    #[serde(rename = "Down")]
    Down,
    #[serde(rename = "Left")]
    Left,
    #[serde(rename = "Right")]
    Right,
}

impl HeadPosition {
    /// Every position in protocol order.
    pub const ALL: [HeadPosition; 5] = [
        HeadPosition::Middle,
        HeadPosition::Top,
        HeadPosition::Down,
        HeadPosition::Left,
        HeadPosition::Right,
    ];

    /// Label as written by the capture app.
    pub fn label(self) -> &'static str {
        match self {
            HeadPosition::Middle => "Middle",
            HeadPosition::Top => "Top",
            HeadPosition::Down => "Down",
            HeadPosition::Left => "Left",
            HeadPosition::Right => "Right",
        }
    }

    /// Next position in protocol order, wrapping around.
    pub fn next(self) -> HeadPosition {
        match self {
            HeadPosition::Middle => HeadPosition::Top,
            HeadPosition::Top => HeadPosition::Down,
            HeadPosition::Down => HeadPosition::Left,
            HeadPosition::Left => HeadPosition::Right,
            HeadPosition::Right => HeadPosition::Middle,
        }
    }
}

impl fmt::Display for HeadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HeadPosition {
    type Err = CalibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        HeadPosition::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| CalibError::invalid(format!("unknown head position '{s}'")))
    }
}

/// How far from the screen the device was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DistanceToScreen {
    #[serde(rename = "Regular")]
    Regular,
    #[serde(rename = "Close")]
    Close,
    #[serde(rename = "Arms Extended")]
    ArmsExtended,
}

impl DistanceToScreen {
    /// Every distance in protocol order.
    pub const ALL: [DistanceToScreen; 3] = [
        DistanceToScreen::Regular,
        DistanceToScreen::ArmsExtended,
        DistanceToScreen::Close,
    ];

    /// Label as written by the capture app.
    pub fn label(self) -> &'static str {
        match self {
            DistanceToScreen::Regular => "Regular",
            DistanceToScreen::Close => "Close",
            DistanceToScreen::ArmsExtended => "Arms Extended",
        }
    }

    /// Next distance in protocol order, wrapping around.
    pub fn next(self) -> DistanceToScreen {
        match self {
            DistanceToScreen::Regular => DistanceToScreen::ArmsExtended,
            DistanceToScreen::ArmsExtended => DistanceToScreen::Close,
            DistanceToScreen::Close => DistanceToScreen::Regular,
        }
    }
}

impl fmt::Display for DistanceToScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DistanceToScreen {
    type Err = CalibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DistanceToScreen::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| CalibError::invalid(format!("unknown distance to screen '{s}'")))
    }
}
