use std::fmt;

/// The declared kind of a raw object record.
///
/// Parsed case-insensitively from the record's `type` field. Anything outside
/// the recognized set lands in [`ObjectKind::Unknown`] and is classified as an
/// "other" leaf rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Host,
    Network,
    ServiceTcp,
    ServiceUdp,
    ServiceIcmp,
    ServiceOther,
    Range,
    RulebaseAction,
    /// A network group (`group` or `network-group`).
    NetworkGroup,
    ServiceGroup,
    /// Unrecognized type, lower-cased. Empty when the record has no type.
    Unknown(String),
}

/// The family of members a group may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberCategory {
    Network,
    Service,
}

impl ObjectKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "host" => ObjectKind::Host,
            "network" => ObjectKind::Network,
            "service-tcp" => ObjectKind::ServiceTcp,
            "service-udp" => ObjectKind::ServiceUdp,
            "service-icmp" => ObjectKind::ServiceIcmp,
            "service-other" => ObjectKind::ServiceOther,
            "range" => ObjectKind::Range,
            "rulebaseaction" => ObjectKind::RulebaseAction,
            "group" | "network-group" => ObjectKind::NetworkGroup,
            "service-group" => ObjectKind::ServiceGroup,
            _ => ObjectKind::Unknown(lowered),
        }
    }

    /// The member category of a group kind, `None` for leaf kinds.
    #[must_use]
    pub fn group_category(&self) -> Option<MemberCategory> {
        match self {
            ObjectKind::NetworkGroup => Some(MemberCategory::Network),
            ObjectKind::ServiceGroup => Some(MemberCategory::Service),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.group_category().is_some()
    }

    /// Whether an object of this kind may be a member of a group of `category`.
    ///
    /// Network groups hold hosts, networks, ranges and network groups; service
    /// groups hold the four service kinds and service groups.
    #[must_use]
    pub fn fits(&self, category: MemberCategory) -> bool {
        match category {
            MemberCategory::Network => matches!(
                self,
                ObjectKind::Host
                    | ObjectKind::Network
                    | ObjectKind::Range
                    | ObjectKind::NetworkGroup
            ),
            MemberCategory::Service => matches!(
                self,
                ObjectKind::ServiceTcp
                    | ObjectKind::ServiceUdp
                    | ObjectKind::ServiceIcmp
                    | ObjectKind::ServiceOther
                    | ObjectKind::ServiceGroup
            ),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Host => "host",
            ObjectKind::Network => "network",
            ObjectKind::ServiceTcp => "service-tcp",
            ObjectKind::ServiceUdp => "service-udp",
            ObjectKind::ServiceIcmp => "service-icmp",
            ObjectKind::ServiceOther => "service-other",
            ObjectKind::Range => "range",
            ObjectKind::RulebaseAction => "rulebaseaction",
            ObjectKind::NetworkGroup => "group",
            ObjectKind::ServiceGroup => "service-group",
            ObjectKind::Unknown(raw) if raw.is_empty() => "<untyped>",
            ObjectKind::Unknown(raw) => raw.as_str(),
        };
        f.write_str(name)
    }
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberCategory::Network => f.write_str("network"),
            MemberCategory::Service => f.write_str("service"),
        }
    }
}
