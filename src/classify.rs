use crate::{MemberCategory, ObjectKind, ObjectRecord, ResolvedObject};

/// Outcome of classifying one raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A leaf object, final after pass 1.
    Leaf(ResolvedObject),
    /// A group, expanded in pass 2 once every leaf is known.
    Deferred(MemberCategory),
    /// The record has no uid and gets no catalog entry.
    Skipped,
}

/// Classify a raw record into a leaf value, or defer it as a group.
///
/// Every leaf falls back to its display name when the type-specific field
/// it would normally show is missing.
#[must_use]
pub fn classify(record: &ObjectRecord) -> Classification {
    if record.uid().is_none() {
        return Classification::Skipped;
    }

    let kind = record.kind();
    let name = record.display_name().to_owned();
    let leaf = match kind {
        ObjectKind::NetworkGroup => return Classification::Deferred(MemberCategory::Network),
        ObjectKind::ServiceGroup => return Classification::Deferred(MemberCategory::Service),
        ObjectKind::Host => ResolvedObject::Host {
            address: present(&record.address).map_or_else(|| name.clone(), str::to_owned),
            name,
        },
        ObjectKind::Network => ResolvedObject::Network {
            cidr: match present(&record.subnet) {
                Some(subnet) => format!("{subnet}/{}", or_unknown(&record.mask_length)),
                None => name.clone(),
            },
            name,
        },
        ObjectKind::ServiceTcp | ObjectKind::ServiceUdp => {
            let protocol = if kind == ObjectKind::ServiceTcp {
                "TCP"
            } else {
                "UDP"
            };
            ResolvedObject::Service {
                descriptor: present(&record.port)
                    .map_or_else(|| name.clone(), |port| format!("{protocol} {port}")),
                name,
            }
        }
        ObjectKind::ServiceIcmp => ResolvedObject::Service {
            descriptor: present(&record.icmp_type)
                .map_or_else(|| name.clone(), |t| format!("ICMP {t}")),
            name,
        },
        ObjectKind::ServiceOther => ResolvedObject::Service {
            descriptor: format!("{} ({name})", or_unknown(&record.protocol)),
            name,
        },
        ObjectKind::Range => ResolvedObject::Range {
            bounds: match present(&record.range_start) {
                Some(start) => format!("{start}-{}", or_unknown(&record.range_end)),
                None => name.clone(),
            },
            name,
        },
        ObjectKind::RulebaseAction => ResolvedObject::Action { name },
        ObjectKind::Unknown(_) => ResolvedObject::Other {
            value: match present(&record.comments) {
                Some(comment) => format!("{name} ({comment})"),
                None => name.clone(),
            },
            name,
        },
    };
    Classification::Leaf(leaf)
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn or_unknown(field: &Option<String>) -> &str {
    present(field).unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(record: &ObjectRecord) -> ResolvedObject {
        match classify(record) {
            Classification::Leaf(obj) => obj,
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn host_uses_address() {
        let obj = leaf(
            &ObjectRecord::new("h1", "host")
                .with_name("web1")
                .with_address("10.0.0.1"),
        );
        assert_eq!(
            obj,
            ResolvedObject::Host {
                name: "web1".into(),
                address: "10.0.0.1".into()
            }
        );
    }

    #[test]
    fn host_without_address_falls_back_to_name() {
        let obj = leaf(&ObjectRecord::new("h1", "Host").with_name("web1"));
        assert_eq!(obj.value(), Some("web1"));
    }

    #[test]
    fn unnamed_record_uses_uid_as_name() {
        let obj = leaf(&ObjectRecord::new("h9", "host"));
        assert_eq!(obj.name(), "h9");
        assert_eq!(obj.value(), Some("h9"));
    }

    #[test]
    fn network_cidr() {
        let obj = leaf(
            &ObjectRecord::new("n1", "network")
                .with_name("lan")
                .with_subnet("10.0.0.0", "24"),
        );
        assert_eq!(obj.value(), Some("10.0.0.0/24"));
    }

    #[test]
    fn network_missing_mask_renders_question_mark() {
        let mut record = ObjectRecord::new("n1", "network").with_name("lan");
        record.subnet = Some("10.0.0.0".into());
        assert_eq!(leaf(&record).value(), Some("10.0.0.0/?"));
    }

    #[test]
    fn network_without_subnet_falls_back_to_name() {
        let obj = leaf(&ObjectRecord::new("n1", "network").with_name("lan"));
        assert_eq!(obj.value(), Some("lan"));
    }

    #[test]
    fn tcp_and_udp_services() {
        let tcp = leaf(&ObjectRecord::new("s1", "service-tcp").with_name("https").with_port("443"));
        assert_eq!(tcp.value(), Some("TCP 443"));
        let udp = leaf(&ObjectRecord::new("s2", "service-udp").with_name("dns").with_port("53"));
        assert_eq!(udp.value(), Some("UDP 53"));
        let bare = leaf(&ObjectRecord::new("s3", "service-tcp").with_name("custom"));
        assert_eq!(bare.value(), Some("custom"));
    }

    #[test]
    fn icmp_service() {
        let obj = leaf(
            &ObjectRecord::new("i1", "service-icmp")
                .with_name("echo")
                .with_icmp_type("8"),
        );
        assert_eq!(obj.value(), Some("ICMP 8"));
        let bare = leaf(&ObjectRecord::new("i2", "service-icmp").with_name("any-icmp"));
        assert_eq!(bare.value(), Some("any-icmp"));
    }

    #[test]
    fn other_protocol_service() {
        let obj = leaf(
            &ObjectRecord::new("o1", "service-other")
                .with_name("gre")
                .with_protocol("47"),
        );
        assert_eq!(obj.value(), Some("47 (gre)"));
        let bare = leaf(&ObjectRecord::new("o2", "service-other").with_name("mystery"));
        assert_eq!(bare.value(), Some("? (mystery)"));
    }

    #[test]
    fn range_bounds() {
        let obj = leaf(
            &ObjectRecord::new("r1", "range")
                .with_name("dhcp")
                .with_range("10.0.0.100", "10.0.0.200"),
        );
        assert_eq!(obj.value(), Some("10.0.0.100-10.0.0.200"));
        let bare = leaf(&ObjectRecord::new("r2", "range").with_name("pool"));
        assert_eq!(bare.value(), Some("pool"));
    }

    #[test]
    fn rulebase_action() {
        let obj = leaf(&ObjectRecord::new("a1", "RulebaseAction").with_name("Accept"));
        assert_eq!(obj, ResolvedObject::Action { name: "Accept".into() });
    }

    #[test]
    fn unknown_type_with_and_without_comment() {
        let plain = leaf(&ObjectRecord::new("x1", "dns-domain").with_name(".example.com"));
        assert_eq!(plain.value(), Some(".example.com"));
        let commented = leaf(
            &ObjectRecord::new("x2", "CpmiAnyObject")
                .with_name("Any")
                .with_comments("matches everything"),
        );
        assert_eq!(commented.value(), Some("Any (matches everything)"));
    }

    #[test]
    fn groups_are_deferred() {
        assert_eq!(
            classify(&ObjectRecord::new("g1", "group")),
            Classification::Deferred(MemberCategory::Network)
        );
        assert_eq!(
            classify(&ObjectRecord::new("g2", "Service-Group")),
            Classification::Deferred(MemberCategory::Service)
        );
        assert_eq!(
            classify(&ObjectRecord::new("g3", "network-group").with_name("lan-grp")),
            Classification::Deferred(MemberCategory::Network)
        );
    }

    #[test]
    fn missing_uid_is_skipped() {
        let record = ObjectRecord {
            type_name: Some("host".into()),
            name: Some("orphan".into()),
            ..ObjectRecord::default()
        };
        assert_eq!(classify(&record), Classification::Skipped);
    }
}
