//! Completeness rules for line items.
//!
//! A profile is complete when it carries every field required to price and
//! submit it. Missing fields come back as an ordered, human-readable list so
//! the host UI can name them; identical input shapes always produce the
//! identical list.

use crate::error::{OrderingError, OrderingResult};
use crate::models::{ResolvedProfile, ServiceKind, ServiceProfile};

/// Ordered missing-field list for one profile.
///
/// `has_tier_data` and `unit_price` come from the resolution pass; storage
/// profiles cannot be complete without a resolvable, positively priced tier.
pub fn missing_fields(profile: &ServiceProfile, has_tier_data: bool, unit_price: f64) -> Vec<String> {
    let mut missing = Vec::new();
    let mut require = |ok: bool, field: &str| {
        if !ok {
            missing.push(field.to_string());
        }
    };

    match profile.kind {
        ServiceKind::Compute => {
            require(!profile.region.trim().is_empty(), "region");
            require(profile.quantity >= 1, "instance count");
            require(profile.months >= 1, "duration (months)");
            require(is_set(&profile.instance_type), "instance type");
            require(is_set(&profile.os_image), "operating system image");
            require(is_set(&profile.boot_volume_type), "boot volume type");
            require(
                profile.boot_volume_gb.is_some_and(|gb| gb > 0.0),
                "boot volume size",
            );
        }
        ServiceKind::ObjectStorage => {
            require(!profile.region.trim().is_empty(), "region");
            require(!profile.tier_key.trim().is_empty(), "storage tier");
            require(has_tier_data, "tier pricing data");
            require(profile.months >= 1, "duration (months)");
            require(unit_price > 0.0, "unit price");
        }
    }

    missing
}

/// Gate for appending a new line item: every existing one must be complete.
pub fn ensure_can_append(resolved: &[ResolvedProfile]) -> OrderingResult<()> {
    first_incomplete(resolved)
}

/// Gate for final submission: names the first incomplete item's index.
pub fn ensure_submittable(resolved: &[ResolvedProfile]) -> OrderingResult<()> {
    first_incomplete(resolved)
}

fn first_incomplete(resolved: &[ResolvedProfile]) -> OrderingResult<()> {
    match resolved.iter().enumerate().find(|(_, p)| !p.is_complete) {
        Some((position, profile)) => Err(OrderingError::MissingRequiredField {
            index: position + 1,
            fields: profile.missing_fields.clone(),
        }),
        None => Ok(()),
    }
}

fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateServiceProfile;

    fn blank_compute() -> ServiceProfile {
        ServiceProfile::new(CreateServiceProfile::blank(ServiceKind::Compute))
    }

    fn blank_storage() -> ServiceProfile {
        ServiceProfile::new(CreateServiceProfile::blank(ServiceKind::ObjectStorage))
    }

    #[test]
    fn compute_missing_fields_are_ordered_and_deterministic() {
        let profile = blank_compute();
        let first = missing_fields(&profile, false, 0.0);
        let second = missing_fields(&profile, false, 0.0);

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                "region",
                "instance type",
                "operating system image",
                "boot volume type",
                "boot volume size",
            ]
        );
    }

    #[test]
    fn complete_compute_profile_has_no_missing_fields() {
        let mut profile = blank_compute();
        profile.region = "lagos-1".to_string();
        profile.instance_type = Some("vm.standard.2".to_string());
        profile.os_image = Some("ubuntu-24.04".to_string());
        profile.boot_volume_type = Some("ssd".to_string());
        profile.boot_volume_gb = Some(100.0);

        assert!(missing_fields(&profile, false, 0.0).is_empty());
    }

    #[test]
    fn storage_requires_resolvable_tier_and_positive_price() {
        let mut profile = blank_storage();
        profile.region = "lagos-1".to_string();
        profile.tier_key = "lagos-1::std".to_string();

        assert_eq!(
            missing_fields(&profile, false, 0.0),
            vec!["tier pricing data", "unit price"]
        );
        assert_eq!(missing_fields(&profile, true, 0.0), vec!["unit price"]);
        assert!(missing_fields(&profile, true, 10.0).is_empty());
    }

    #[test]
    fn whitespace_only_selections_count_as_missing() {
        let mut profile = blank_compute();
        profile.region = "lagos-1".to_string();
        profile.instance_type = Some("   ".to_string());
        profile.os_image = Some("ubuntu-24.04".to_string());
        profile.boot_volume_type = Some("ssd".to_string());
        profile.boot_volume_gb = Some(100.0);

        assert_eq!(missing_fields(&profile, false, 0.0), vec!["instance type"]);
    }
}
