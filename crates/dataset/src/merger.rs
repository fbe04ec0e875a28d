//! Merger: joins the four source tables into property drafts
//!
//! Projects, configurations and variants are walked in file order, so the
//! same tables always produce the same sequence of entries.

use std::collections::{HashMap, HashSet};

use propchat_core::{Possession, Property};
use serde::{Deserialize, Serialize};

use crate::extractors::{
    extract_amenities, extract_bhk, extract_builder, extract_location, parse_area, parse_images,
    parse_possession, parse_price, parse_rera_id,
};
use crate::loader::{RawRow, SourceTables};

/// A merged record before the structural and range checks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDraft {
    pub id: String,
    pub project_id: String,
    pub config_id: String,
    pub variant_id: Option<String>,

    pub project_name: Option<String>,
    pub builder: String,
    pub project_type: Option<String>,
    pub status: Option<String>,
    pub rera_id: Option<String>,
    pub slug: Option<String>,

    pub city: Option<String>,
    pub locality: Option<String>,
    pub full_address: Option<String>,
    pub pincode: Option<String>,

    pub bhk: Option<u32>,
    pub area: Option<f64>,
    pub price: Option<f64>,

    pub possession: Possession,
    pub amenities: Vec<String>,
    pub property_images: Vec<String>,
    pub floor_plan_images: Vec<String>,
}

impl PropertyDraft {
    /// Structural check: `None` when a required field never resolved
    pub fn into_entry(self) -> Option<Property> {
        Some(Property {
            bhk: self.bhk?,
            price: self.price?,
            area: self.area?,
            city: self.city.filter(|c| !c.trim().is_empty())?,
            project_name: self.project_name?,
            id: self.id,
            project_id: self.project_id,
            config_id: self.config_id,
            variant_id: self.variant_id,
            builder: self.builder,
            project_type: self.project_type,
            status: self.status,
            rera_id: self.rera_id,
            slug: self.slug,
            locality: self.locality,
            full_address: self.full_address,
            pincode: self.pincode,
            possession: self.possession,
            amenities: self.amenities,
            property_images: self.property_images,
            floor_plan_images: self.floor_plan_images,
        })
    }
}

/// Counters describing one merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub projects: usize,
    pub configurations: usize,
    pub variants: usize,
    pub drafts: usize,
    /// Drafts discarded by the structural check
    pub incomplete: usize,
    /// Configurations whose project is unknown
    pub orphan_configurations: usize,
    /// Variants whose configuration is unknown
    pub orphan_variants: usize,
}

/// Drafts plus orphan counts
#[derive(Debug, Clone, Default)]
pub struct DraftSet {
    pub drafts: Vec<PropertyDraft>,
    pub orphan_configurations: usize,
    pub orphan_variants: usize,
}

/// Structurally complete entries plus the merge report
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub properties: Vec<Property>,
    pub report: MergeReport,
}

/// Build one draft per (configuration, variant) pair
///
/// A configuration without variants yields a single draft with empty
/// variant fields.
pub fn build_drafts(tables: &SourceTables) -> DraftSet {
    let mut addresses: HashMap<&str, &RawRow> = HashMap::new();
    for row in &tables.addresses {
        if let Some(project_id) = row.get("projectId") {
            addresses.entry(project_id).or_insert(row);
        }
    }

    let project_ids: HashSet<&str> = tables.projects.iter().filter_map(|p| p.get("id")).collect();

    let mut configurations: HashMap<&str, Vec<&RawRow>> = HashMap::new();
    let mut orphan_configurations = 0usize;
    for row in &tables.configurations {
        match row.get("projectId") {
            Some(project_id) if project_ids.contains(project_id) => {
                configurations.entry(project_id).or_default().push(row);
            }
            _ => orphan_configurations += 1,
        }
    }

    let config_ids: HashSet<&str> = configurations
        .values()
        .flatten()
        .filter_map(|c| c.get("id"))
        .collect();

    let mut variants: HashMap<&str, Vec<&RawRow>> = HashMap::new();
    let mut orphan_variants = 0usize;
    for row in &tables.variants {
        match row.get("configurationId") {
            Some(config_id) if config_ids.contains(config_id) => {
                variants.entry(config_id).or_default().push(row);
            }
            _ => orphan_variants += 1,
        }
    }

    let mut drafts = Vec::new();
    for project in &tables.projects {
        let Some(project_id) = project.get("id") else {
            continue;
        };
        let address = addresses.get(project_id).copied();

        for config in configurations.get(project_id).into_iter().flatten() {
            let config_variants = config
                .get("id")
                .and_then(|id| variants.get(id))
                .map(Vec::as_slice)
                .unwrap_or_default();

            if config_variants.is_empty() {
                drafts.push(draft(project, address, config, None));
            } else {
                for variant in config_variants {
                    drafts.push(draft(project, address, config, Some(*variant)));
                }
            }
        }
    }

    if orphan_configurations > 0 || orphan_variants > 0 {
        tracing::warn!(
            orphan_configurations,
            orphan_variants,
            "Ignoring rows that reference unknown parents"
        );
    }

    DraftSet {
        drafts,
        orphan_configurations,
        orphan_variants,
    }
}

fn draft(
    project: &RawRow,
    address: Option<&RawRow>,
    config: &RawRow,
    variant: Option<&RawRow>,
) -> PropertyDraft {
    let project_id = project.get("id").unwrap_or_default().to_string();
    let config_id = config.get("id").unwrap_or_default().to_string();
    let variant_id = variant.and_then(|v| v.get("id")).map(str::to_string);

    let project_name = project.get("projectName").map(str::to_string);
    let full_address = address.and_then(|a| a.get("fullAddress")).map(str::to_string);
    let location = extract_location(
        full_address.as_deref().unwrap_or_default(),
        project_name.as_deref().unwrap_or_default(),
    );

    let bhk = config.get("type").and_then(extract_bhk);
    let variant_field = |column: &str| variant.and_then(|v| v.get(column));

    PropertyDraft {
        id: variant_id.clone().unwrap_or_else(|| config_id.clone()),
        project_id,
        config_id,
        variant_id,

        builder: extract_builder(project_name.as_deref().unwrap_or_default()),
        project_name,
        project_type: project.get("projectType").map(str::to_string),
        status: project.get("status").map(str::to_string),
        rera_id: project.get("reraId").and_then(parse_rera_id),
        slug: project.get("slug").map(str::to_string),

        city: location.city,
        locality: location.locality,
        full_address,
        pincode: address.and_then(|a| a.get("pincode")).map(str::to_string),

        bhk,
        area: variant_field("carpetArea").and_then(parse_area),
        price: variant_field("price").and_then(parse_price),

        possession: parse_possession(project.get("status").unwrap_or_default()),
        amenities: extract_amenities(variant_field("aboutProperty").unwrap_or_default(), bhk.unwrap_or(0)),
        property_images: variant_field("propertyImages").map(parse_images).unwrap_or_default(),
        floor_plan_images: variant_field("floorPlanImage").map(parse_images).unwrap_or_default(),
    }
}

/// Merge the tables and apply the structural check
pub fn merge(tables: &SourceTables) -> MergeOutcome {
    let draft_set = build_drafts(tables);
    let drafts = draft_set.drafts.len();

    let properties: Vec<Property> = draft_set
        .drafts
        .into_iter()
        .filter_map(PropertyDraft::into_entry)
        .collect();

    let report = MergeReport {
        projects: tables.projects.len(),
        configurations: tables.configurations.len(),
        variants: tables.variants.len(),
        drafts,
        incomplete: drafts - properties.len(),
        orphan_configurations: draft_set.orphan_configurations,
        orphan_variants: draft_set.orphan_variants,
    };

    if report.incomplete > 0 {
        metrics::counter!("propchat_properties_dropped_total", "stage" => "structural")
            .increment(report.incomplete as u64);
    }

    tracing::info!(
        drafts = report.drafts,
        complete = properties.len(),
        incomplete = report.incomplete,
        "Merge finished"
    );

    MergeOutcome { properties, report }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::from_pairs(pairs.iter().copied())
    }

    /// Two Pune variants under one configuration, one Mumbai configuration
    /// without variants, and one orphan of each kind
    pub fn tables() -> SourceTables {
        SourceTables {
            projects: vec![
                row(&[
                    ("id", "p1"),
                    ("projectName", "Kolte Patil Life Republic"),
                    ("status", "Ready to move"),
                    ("reraId", r#"["P52100012345"]"#),
                    ("slug", "kolte-patil-life-republic"),
                ]),
                row(&[("id", "p2"), ("projectName", "Lodha Amara"), ("status", "Under Construction")]),
            ],
            addresses: vec![
                row(&[("projectId", "p1"), ("fullAddress", "Near Hinjewadi Phase 1, Marunji, Pune"), ("pincode", "411057")]),
                row(&[("projectId", "p1"), ("fullAddress", "Duplicate, Mumbai")]),
                row(&[("projectId", "p2"), ("fullAddress", "Kolshet Road, Mumbai")]),
            ],
            configurations: vec![
                row(&[("id", "c1"), ("projectId", "p1"), ("type", "2 BHK")]),
                row(&[("id", "c2"), ("projectId", "p2"), ("type", "3BHK Apartment")]),
                row(&[("id", "c9"), ("projectId", "missing"), ("type", "1 BHK")]),
            ],
            variants: vec![
                row(&[
                    ("id", "v1"),
                    ("configurationId", "c1"),
                    ("price", "80"),
                    ("carpetArea", "750"),
                    ("aboutProperty", "Gym and garden"),
                    ("propertyImages", r#"["https://img.example/v1.jpg"]"#),
                ]),
                row(&[("id", "v2"), ("configurationId", "c1"), ("price", "9500000"), ("carpetArea", "820")]),
                row(&[("id", "v9"), ("configurationId", "c404"), ("price", "1")]),
            ],
            missing: Vec::new(),
        }
    }
}
