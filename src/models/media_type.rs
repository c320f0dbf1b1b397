use serde::Serialize;

/// Channel a month's advertising spend was booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Digital,
    Tv,
    Newspaper,
    Magazine,
    Outdoor,
    Radio,
    Other,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::Tv => "tv",
            Self::Newspaper => "newspaper",
            Self::Magazine => "magazine",
            Self::Outdoor => "outdoor",
            Self::Radio => "radio",
            Self::Other => "other",
        }
    }

    /// Strict parse: the set of media types is closed, so unknown input is
    /// `None` rather than a catch-all.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "digital" => Some(Self::Digital),
            "tv" => Some(Self::Tv),
            "newspaper" => Some(Self::Newspaper),
            "magazine" => Some(Self::Magazine),
            "outdoor" => Some(Self::Outdoor),
            "radio" => Some(Self::Radio),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [MediaType] {
        &[
            Self::Digital,
            Self::Tv,
            Self::Newspaper,
            Self::Magazine,
            Self::Outdoor,
            Self::Radio,
            Self::Other,
        ]
    }

    /// The breakdown bucket that receives this channel's spend.
    pub fn bucket(&self) -> SpendBucket {
        match self {
            Self::Digital => SpendBucket::Online,
            Self::Tv | Self::Radio => SpendBucket::Broadcast,
            Self::Newspaper | Self::Magazine => SpendBucket::Print,
            Self::Outdoor | Self::Other => SpendBucket::Other,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-channel spend column on a monthly spend record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendBucket {
    Online,
    Print,
    Broadcast,
    Other,
}

impl SpendBucket {
    /// Column name in `monthly_advertising_spend`.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Online => "online_spend",
            Self::Print => "print_spend",
            Self::Broadcast => "broadcast_spend",
            Self::Other => "other_spend",
        }
    }

    #[cfg(test)]
    pub fn all() -> &'static [SpendBucket] {
        &[
            Self::Online,
            Self::Print,
            Self::Broadcast,
            Self::Other,
        ]
    }
}
