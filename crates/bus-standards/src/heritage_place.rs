//! Heritage Place template.
//!
//! The published sheet predates several renames in the resource model, so
//! many of its headers only match through [`HEADER_ALIASES`].

use crate::profile::{ConceptAlias, RestrictedFamily, SheetProfile};

pub const GRAPH_ID: &str = "34cfe98e-c2c0-11ea-9026-02e7594ce0a0";

/// Node group (and node) holding the EAMENA ID of a heritage place.
pub const BUSINESS_ID_NODEGROUP: &str = "34cfe992-c2c0-11ea-9026-02e7594ce0a0";

/// The model carries two `Disturbance Date *` blocks; only these nodes are used.
pub const DISTURBANCE_DATE_NODES: &[&str] = &[
    "34cfea92-c2c0-11ea-9026-02e7594ce0a0",
    "34cfea7f-c2c0-11ea-9026-02e7594ce0a0",
    "34cfea65-c2c0-11ea-9026-02e7594ce0a0",
    "34cfea7a-c2c0-11ea-9026-02e7594ce0a0",
];

/// Node key → header used by the sheet.
pub const HEADER_ALIASES: &[(&str, &str)] = &[
    ("GEOMETRY", "GEOMETRIES"),
    ("TIDAL_RANGE", "TIDAL_ENERGY"),
    ("THREAT_CAUSE_TYPE", "THREAT_TYPE"),
    ("RESTRICTED_ACCESS_RECORD_DESIGNATION", "ACCESS"),
    ("LOCATION_CERTAINTY", "SITE_LOCATION_CERTAINTY"),
    ("OVERALL_CONDITION_STATE_TYPE", "OVERALL_CONDITION_STATE"),
    ("OVERALL_SITE_SHAPE_TYPE", "SITE_OVERALL_SHAPE_TYPE"),
    ("DESCRIPTION_ASSIGNMENT", "RESOURCE_DESCRIPTION"),
    ("HERITAGE_PLACE_FUNCTION_BELIEF", "HERITAGE_RESOURCE_CLASSIFICATION"),
    ("CULTURAL_SUB_PERIOD_CERTAINTY", "CULTURAL_SUBPERIOD_CERTAINTY"),
    ("CULTURAL_SUB_PERIOD_TYPE", "CULTURAL_SUBPERIOD_TYPE"),
    (
        "SITE_FEATURE_INTERPRETATION_NUMBER_TYPE",
        "SITE_FEATURE_INTERPRETATION_NUMBER",
    ),
    ("GOOGLE_EARTH_ASSESSMENT", "GE_ASSESSMENT_YES_NO_"),
    ("ARCHAEOLOGICAL_FROM_DATE", "ARCHAEOLOGICAL_DATE_FROM__CAL_"),
    ("ARCHAEOLOGICAL_TO_DATE", "ARCHAEOLOGICAL_DATE_TO__CAL_"),
    ("ADMINISTRATIVE_DIVISION", "ADMINISTRATIVE_SUBDIVISION"),
    ("ADMINISTRATIVE_DIVISION_TYPE", "ADMINISTRATIVE_SUBDIVISION_TYPE"),
    ("MINIMUM_DEPTH_MAX_ELEVATION", "MINIMUM_DEPTH_MAX_ELEVATION_M_"),
    ("MAXIMUM_DEPTH_MIN_ELEVATION", "MAXIMUM_DEPTH_MIN_ELEVATION_M_"),
    ("SITE_FEATURE_FORM_TYPE_BELIEF", "SITE_FEATURE_FORM"),
    ("SITE_FEATURE_INTERPRETATION_BELIEF", "SITE_FEATURE_INTERPRETATION"),
    ("CULTURAL_PERIOD_BELIEF", "PERIODIZATION"),
    ("CULTURAL_SUB_PERIOD_BELIEF", "CULTURAL_SUBPERIOD"),
    ("SITE_FEATURE_ASSIGNMENT", "SITE_FEATURES"),
    ("ARCHAEOLOGICAL_TIMESPACE", "ABSOLUTE_CHRONOLOGY"),
    ("DAMAGE_OBSERVATION", "EFFECTS"),
    ("DISTURBANCE_EVENT", "DISTURBANCES"),
    ("THREAT_INFERENCE_MAKING", "THREATS"),
    ("INFORMATION_RESOURCE", "INFORMATION_RESOURCE_USED"),
    ("BUILT_COMPONENT", "BUILT_COMPONENT_RELATED_RESOURCE"),
    ("HERITAGE_PLACE_RESOURCE_INSTANCE", "HP_RELATED_RESOURCE"),
    (
        "RELATED_GEOARCHAEOLOGY_PALAEOLANDSCAPE",
        "RELATED_GEOARCH_PALAEO",
    ),
    (
        "DETAILED_CONDITION_ASSESSMENTS",
        "RELATED_DETAILED_CONDITION_RESOURCE",
    ),
];

pub const CONCEPT_ALIASES: &[ConceptAlias] = &[
    ConceptAlias {
        node_key: "COUNTRY_TYPE",
        label: "Iran (Islamic Republic of)",
        alias: "Iran",
    },
    ConceptAlias {
        node_key: "ASSESSMENT_ACTIVITY_TYPE",
        label: "Desk-based Assessment",
        alias: "Desk Based Assessment",
    },
    ConceptAlias {
        node_key: "EFFECT_TYPE",
        label: "Erosion/Deterioration",
        alias: "Erosion/Deterioration (micro-bio)",
    },
    ConceptAlias {
        node_key: "TIDAL_RANGE",
        label: "Mesotidal (2-4m)",
        alias: "Mesotidal (2-4 m)",
    },
    ConceptAlias {
        node_key: "FETCH_TYPE",
        label: "Moderately exposed (10-100km)",
        alias: "Moderately exposed (10-100 km)",
    },
];

/// Column headers of the current Heritage Place template.
pub const EXPECTED_HEADERS: &[&str] = &[
    "UNIQUEID",
    "ASSESSMENT_INVESTIGATOR___ACTOR",
    "INVESTIGATOR_ROLE_TYPE",
    "ASSESSMENT_ACTIVITY_TYPE",
    "ASSESSMENT_ACTIVITY_DATE",
    "GE_ASSESSMENT_YES_NO_",
    "GE_IMAGERY_ACQUISITION_DATE",
    "INFORMATION_RESOURCE_USED",
    "INFORMATION_RESOURCE_ACQUISITION_DATE",
    "RESOURCE_NAME",
    "NAME_TYPE",
    "HERITAGE_PLACE_TYPE",
    "GENERAL_DESCRIPTION_TYPE",
    "GENERAL_DESCRIPTION",
    "HERITAGE_PLACE_FUNCTION",
    "HERITAGE_PLACE_FUNCTION_CERTAINTY",
    "DESIGNATION",
    "DESIGNATION_FROM_DATE",
    "DESIGNATION_TO_DATE",
    "GEOMETRIC_PLACE_EXPRESSION",
    "GEOMETRY_QUALIFIER",
    "SITE_LOCATION_CERTAINTY",
    "GEOMETRY_EXTENT_CERTAINTY",
    "SITE_OVERALL_SHAPE_TYPE",
    "GRID_ID",
    "COUNTRY_TYPE",
    "CADASTRAL_REFERENCE",
    "RESOURCE_ORIENTATION",
    "ADDRESS",
    "ADDRESS_TYPE",
    "ADMINISTRATIVE_SUBDIVISION",
    "ADMINISTRATIVE_SUBDIVISION_TYPE",
    "OVERALL_ARCHAEOLOGICAL_CERTAINTY_VALUE",
    "OVERALL_SITE_MORPHOLOGY_TYPE",
    "CULTURAL_PERIOD_TYPE",
    "CULTURAL_PERIOD_CERTAINTY",
    "CULTURAL_SUBPERIOD_TYPE",
    "CULTURAL_SUBPERIOD_CERTAINTY",
    "DATE_INFERENCE_MAKING_ACTOR",
    "ARCHAEOLOGICAL_DATE_FROM__CAL_",
    "ARCHAEOLOGICAL_DATE_TO__CAL_",
    "BP_DATE_FROM",
    "BP_DATE_TO",
    "AH_DATE_FROM",
    "AH_DATE_TO",
    "SH_DATE_FROM",
    "SH_DATE_TO",
    "SITE_FEATURE_FORM_TYPE",
    "SITE_FEATURE_FORM_TYPE_CERTAINTY",
    "SITE_FEATURE_SHAPE_TYPE",
    "SITE_FEATURE_ARRANGEMENT_TYPE",
    "SITE_FEATURE_NUMBER_TYPE",
    "SITE_FEATURE_INTERPRETATION_TYPE",
    "SITE_FEATURE_INTERPRETATION_NUMBER",
    "SITE_FEATURE_INTERPRETATION_CERTAINTY",
    "BUILT_COMPONENT_RELATED_RESOURCE",
    "HP_RELATED_RESOURCE",
    "MATERIAL_CLASS",
    "MATERIAL_TYPE",
    "CONSTRUCTION_TECHNIQUE",
    "MEASUREMENT_NUMBER",
    "MEASUREMENT_UNIT",
    "DIMENSION_TYPE",
    "MEASUREMENT_SOURCE_TYPE",
    "RELATED_GEOARCH_PALAEO",
    "OVERALL_CONDITION_STATE",
    "DAMAGE_EXTENT_TYPE",
    "DISTURBANCE_CAUSE_CATEGORY_TYPE",
    "DISTURBANCE_CAUSE_TYPE",
    "DISTURBANCE_CAUSE_CERTAINTY",
    "DISTURBANCE_DATE_FROM",
    "DISTURBANCE_DATE_TO",
    "DISTURBANCE_DATE_OCCURRED_BEFORE",
    "DISTURBANCE_DATE_OCCURRED_ON",
    "DISTURBANCE_CAUSE_ASSIGNMENT_ASSESSOR_NAME",
    "EFFECT_TYPE",
    "EFFECT_CERTAINTY",
    "THREAT_CATEGORY",
    "THREAT_TYPE",
    "THREAT_PROBABILITY",
    "THREAT_INFERENCE_MAKING_ASSESSOR_NAME",
    "INTERVENTION_ACTIVITY_TYPE",
    "RECOMMENDATION_TYPE",
    "PRIORITY_TYPE",
    "RELATED_DETAILED_CONDITION_RESOURCE",
    "TOPOGRAPHY_TYPE",
    "LAND_COVER_TYPE",
    "LAND_COVER_ASSESSMENT_DATE",
    "SURFICIAL_GEOLOGY_TYPE",
    "DEPOSITIONAL_PROCESS",
    "BEDROCK_GEOLOGY",
    "FETCH_TYPE",
    "WAVE_CLIMATE",
    "TIDAL_ENERGY",
    "MINIMUM_DEPTH_MAX_ELEVATION_M_",
    "MAXIMUM_DEPTH_MIN_ELEVATION_M_",
    "DATUM_TYPE",
    "DATUM_DESCRIPTION_EPSG_CODE",
    "RESTRICTED_ACCESS_RECORD_DESIGNATION",
];

pub const PROFILE: SheetProfile = SheetProfile {
    schema_name: "Heritage Place",
    identifier_header: "UNIQUEID",
    identifier_is_node: false,
    upsert_by_identifier: false,
    header_aliases: HEADER_ALIASES,
    actor_suffix: Some("___ACTOR"),
    restricted_family: Some(RestrictedFamily {
        key_prefix: "DISTURBANCE_DATE_",
        allowed_nodes: DISTURBANCE_DATE_NODES,
    }),
    concept_aliases: CONCEPT_ALIASES,
    expected_headers: EXPECTED_HEADERS,
    business_id_nodegroup: BUSINESS_ID_NODEGROUP,
};
