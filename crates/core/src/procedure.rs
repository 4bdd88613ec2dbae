//! Dental procedures that have an order form.
//!
//! Each procedure is known by two names: an internal key (`boneGraft`) used by the
//! selection table and the forms, and the localised label shown to staff
//! (`Bone graft`, `ผ่าตัดเหงือก`). Both resolve to the same [`Procedure`].

use crate::{OrderError, OrderResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Procedure {
    BoneGraft,
    GumSurgery,
    RootCanal,
}

impl Procedure {
    pub const ALL: [Procedure; 3] = [
        Procedure::BoneGraft,
        Procedure::GumSurgery,
        Procedure::RootCanal,
    ];

    /// Internal key used by the selection table.
    pub fn key(self) -> &'static str {
        match self {
            Procedure::BoneGraft => "boneGraft",
            Procedure::GumSurgery => "gumSurgery",
            Procedure::RootCanal => "rootCanal",
        }
    }

    /// Localised display label.
    pub fn label(self) -> &'static str {
        match self {
            Procedure::BoneGraft => "Bone graft",
            Procedure::GumSurgery => "ผ่าตัดเหงือก",
            Procedure::RootCanal => "รักษารากฟัน",
        }
    }

    /// Two-letter order-code prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Procedure::BoneGraft => "BG",
            Procedure::GumSurgery => "GS",
            Procedure::RootCanal => "RT",
        }
    }

    /// Resolve either the internal key or the display label. Matching is exact: any other
    /// spelling, including padded or differently cased text, resolves to nothing.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == name || p.label() == name)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Procedure {
    type Err = OrderError;

    fn from_str(s: &str) -> OrderResult<Self> {
        Self::from_name(s).ok_or_else(|| OrderError::UnknownProcedure(s.to_string()))
    }
}
