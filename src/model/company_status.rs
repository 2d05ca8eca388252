use serde::{Deserialize, Serialize};
use std::fmt;

/// Company statuses accepted by the patch path and carried on records.
///
/// The closed class (`removed`, `dissolved`, `converted-closed`) changes how
/// listing counts are interpreted: the metrics "active" bucket is reported
/// as inactive for companies in that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyStatus {
    Active,
    Dissolved,
    Liquidation,
    Receivership,
    ConvertedClosed,
    Open,
    Closed,
    InsolvencyProceedings,
    VoluntaryArrangement,
    Administration,
    Registered,
    Removed,
}

impl CompanyStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "dissolved" => Some(Self::Dissolved),
            "liquidation" => Some(Self::Liquidation),
            "receivership" => Some(Self::Receivership),
            "converted-closed" => Some(Self::ConvertedClosed),
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "insolvency-proceedings" => Some(Self::InsolvencyProceedings),
            "voluntary-arrangement" => Some(Self::VoluntaryArrangement),
            "administration" => Some(Self::Administration),
            "registered" => Some(Self::Registered),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dissolved => "dissolved",
            Self::Liquidation => "liquidation",
            Self::Receivership => "receivership",
            Self::ConvertedClosed => "converted-closed",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::InsolvencyProceedings => "insolvency-proceedings",
            Self::VoluntaryArrangement => "voluntary-arrangement",
            Self::Administration => "administration",
            Self::Registered => "registered",
            Self::Removed => "removed",
        }
    }

    /// Companies in the closed class no longer have genuinely active
    /// officers, whatever the metrics source reports.
    pub fn is_closed_class(&self) -> bool {
        matches!(self, Self::Removed | Self::Dissolved | Self::ConvertedClosed)
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
