//! Built-in documentation catalog for the host scripting API.
//!
//! A fixed table, not a search index. The cache snapshot on disk is a
//! serialization of exactly this structure.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDoc {
    pub description: String,
    pub parameters: String,
    pub returns: String,
    pub example: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSection {
    pub description: String,
    #[serde(default)]
    pub methods: IndexMap<String, MethodDoc>,
    #[serde(default)]
    pub common_errors: Vec<String>,
    #[serde(default)]
    pub best_practices: Vec<String>,
}

/// Canned remediation for a known failure signature. Every word in
/// `signature` must appear in the failure context for the remedy to
/// apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRemedy {
    pub signature: Vec<String>,
    pub context: String,
    pub solution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocCatalog {
    pub sections: IndexMap<String, ApiSection>,
    pub remedies: Vec<ErrorRemedy>,
}

fn method(description: &str, parameters: &str, returns: &str, example: &str) -> MethodDoc {
    MethodDoc {
        description: description.to_string(),
        parameters: parameters.to_string(),
        returns: returns.to_string(),
        example: example.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn builtin_catalog() -> DocCatalog {
    let mut sections = IndexMap::new();

    sections.insert(
        "ExtrudeFeatures".to_string(),
        ApiSection {
            description: "Create extrusions from sketch profiles".to_string(),
            methods: IndexMap::from([
                (
                    "createInput".to_string(),
                    method(
                        "Creates an input object for an extrude feature",
                        "profile, operation",
                        "ExtrudeFeatureInput",
                        "extrudeInput = extrudes.createInput(profile, adsk.fusion.FeatureOperations.NewBodyFeatureOperation)",
                    ),
                ),
                (
                    "add".to_string(),
                    method(
                        "Creates the extrude feature",
                        "input",
                        "ExtrudeFeature",
                        "extrudeFeature = extrudes.add(extrudeInput)",
                    ),
                ),
            ]),
            common_errors: strings(&[
                "Profile must be closed for solid extrusion",
                "Cannot extrude a profile with zero area",
                "Profile must be on a single plane",
            ]),
            best_practices: strings(&[
                "Validate that profiles exist before extruding",
                "Use ValueInput.createByString for values with units",
            ]),
        },
    );

    sections.insert(
        "RevolveFeatures".to_string(),
        ApiSection {
            description: "Create revolved features from sketch profiles".to_string(),
            methods: IndexMap::from([
                (
                    "createInput".to_string(),
                    method(
                        "Creates an input object for a revolve feature",
                        "profile, axis, operation",
                        "RevolveFeatureInput",
                        "revolveInput = revolves.createInput(profile, axis, adsk.fusion.FeatureOperations.NewBodyFeatureOperation)",
                    ),
                ),
                (
                    "add".to_string(),
                    method(
                        "Creates the revolve feature",
                        "input",
                        "RevolveFeature",
                        "revolveFeature = revolves.add(revolveInput)",
                    ),
                ),
            ]),
            common_errors: strings(&[
                "Axis cannot be tangent to the profile (ERROR 3: ASM_PATH_TANGENT)",
                "Axis cannot intersect the profile boundary",
                "Profile must be closed for solid revolution",
                "Revolution angle must be greater than zero",
            ]),
            best_practices: strings(&[
                "Check the axis position relative to the profile",
                "Mark the revolution axis as construction geometry",
                "For partial revolutions, set the angle extent on the input object",
            ]),
        },
    );

    sections.insert(
        "Sketches".to_string(),
        ApiSection {
            description: "Create and manage sketches on planes or planar faces".to_string(),
            methods: IndexMap::from([(
                "add".to_string(),
                method(
                    "Creates a new sketch on a plane or face",
                    "planarEntity",
                    "Sketch",
                    "sketch = sketches.add(rootComp.xYConstructionPlane)",
                ),
            )]),
            common_errors: strings(&[
                "Sketches can only be created on a planar surface or face",
                "The profile collection may be empty when the sketch is not properly constrained",
            ]),
            best_practices: strings(&[
                "Check that the sketch contains profiles before using them",
                "Set isConstruction on geometry that should not produce profiles",
            ]),
        },
    );

    let remedies = vec![
        ErrorRemedy {
            signature: strings(&["tangent", "revolve"]),
            context: "Revolve operations".to_string(),
            solution: "The revolve failed because the axis is tangent to the profile. Move the axis away from the profile or change the profile shape.".to_string(),
        },
        ErrorRemedy {
            signature: strings(&["profile", "extrude"]),
            context: "Extrude operations".to_string(),
            solution: "The extrude failed because of an invalid profile. Make sure the sketch contains closed profiles and that the right profile is selected.".to_string(),
        },
        ErrorRemedy {
            signature: strings(&["boolean", "body"]),
            context: "Boolean operations".to_string(),
            solution: "The boolean operation failed. Verify that all participating bodies exist before the operation.".to_string(),
        },
        ErrorRemedy {
            signature: strings(&["null", "object"]),
            context: "General API usage".to_string(),
            solution: "A null object was referenced. Check that every object exists before using it.".to_string(),
        },
    ];

    DocCatalog { sections, remedies }
}
