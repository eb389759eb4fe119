//! Galley map: aircraft storage layouts and what is stowed where.
//!
//! Layouts are static. Positions are placed in a compartment when their
//! location code equals the compartment code (ignoring case).

use std::fmt;

use serde::Serialize;

use crate::model::Item;

/// Kind of stowage compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompartmentKind {
    /// Full-size trolley.
    Trolley,
    /// Half-size trolley.
    HalfTrolley,
    /// Standard storage unit.
    StandardUnit,
    /// Oven.
    Oven,
    /// Chiller.
    Chiller,
}

impl fmt::Display for CompartmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trolley => write!(f, "trolley"),
            Self::HalfTrolley => write!(f, "half trolley"),
            Self::StandardUnit => write!(f, "standard unit"),
            Self::Oven => write!(f, "oven"),
            Self::Chiller => write!(f, "chiller"),
        }
    }
}

/// A slot in a galley.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Compartment {
    /// Location code, e.g. `G1-T1`.
    pub code: &'static str,
    /// What kind of slot it is.
    pub kind: CompartmentKind,
}

/// A galley and its compartments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Galley {
    /// Galley code, e.g. `G1`.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Compartments front to back.
    pub compartments: Vec<Compartment>,
}

/// The galleys of one aircraft type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AircraftLayout {
    /// Aircraft type, e.g. `A320`.
    pub aircraft: &'static str,
    /// Galleys front to back.
    pub galleys: Vec<Galley>,
}

const fn slot(code: &'static str, kind: CompartmentKind) -> Compartment {
    Compartment { code, kind }
}

/// Aircraft types with a known layout.
pub const AIRCRAFT: &[&str] = &["A320", "B738"];

/// Layout of a known aircraft type (case-insensitive).
#[must_use]
pub fn layout(aircraft: &str) -> Option<AircraftLayout> {
    use CompartmentKind::{Chiller, HalfTrolley, Oven, StandardUnit, Trolley};

    match aircraft.trim().to_ascii_uppercase().as_str() {
        "A320" => Some(AircraftLayout {
            aircraft: "A320",
            galleys: vec![
                Galley {
                    code: "G1",
                    name: "Forward galley",
                    compartments: vec![
                        slot("G1-T1", Trolley),
                        slot("G1-T2", Trolley),
                        slot("G1-H1", HalfTrolley),
                        slot("G1-S1", StandardUnit),
                        slot("G1-S2", StandardUnit),
                        slot("G1-S3", StandardUnit),
                        slot("G1-O1", Oven),
                    ],
                },
                Galley {
                    code: "G5",
                    name: "Aft galley",
                    compartments: vec![
                        slot("G5-T1", Trolley),
                        slot("G5-T2", Trolley),
                        slot("G5-T3", Trolley),
                        slot("G5-T4", Trolley),
                        slot("G5-H1", HalfTrolley),
                        slot("G5-S1", StandardUnit),
                        slot("G5-S2", StandardUnit),
                        slot("G5-S3", StandardUnit),
                        slot("G5-S4", StandardUnit),
                        slot("G5-O1", Oven),
                        slot("G5-O2", Oven),
                        slot("G5-C1", Chiller),
                    ],
                },
            ],
        }),
        "B738" => Some(AircraftLayout {
            aircraft: "B738",
            galleys: vec![
                Galley {
                    code: "G1",
                    name: "Forward galley",
                    compartments: vec![
                        slot("G1-T1", Trolley),
                        slot("G1-H1", HalfTrolley),
                        slot("G1-S1", StandardUnit),
                        slot("G1-S2", StandardUnit),
                        slot("G1-O1", Oven),
                    ],
                },
                Galley {
                    code: "G4",
                    name: "Aft galley",
                    compartments: vec![
                        slot("G4-T1", Trolley),
                        slot("G4-T2", Trolley),
                        slot("G4-T3", Trolley),
                        slot("G4-H1", HalfTrolley),
                        slot("G4-S1", StandardUnit),
                        slot("G4-S2", StandardUnit),
                        slot("G4-S3", StandardUnit),
                        slot("G4-O1", Oven),
                    ],
                },
            ],
        }),
        _ => None,
    }
}

/// A position as shown on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stowed {
    /// Owning item.
    pub item_id: i64,
    /// Item name.
    pub name: String,
    /// Position id.
    pub position_id: i64,
    /// Location code as stored.
    pub code: String,
    /// Amount left.
    pub available: i64,
    /// Capacity.
    pub quantity: i64,
    /// Unit of measure.
    pub unit: String,
}

/// A compartment with its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompartmentView {
    /// The compartment.
    pub compartment: Compartment,
    /// Positions stowed there.
    pub contents: Vec<Stowed>,
}

/// A galley with its filled-in compartments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleyView {
    /// Galley code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Compartments with contents.
    pub compartments: Vec<CompartmentView>,
}

/// The map page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleyMap {
    /// Aircraft type.
    pub aircraft: &'static str,
    /// Galleys front to back.
    pub galleys: Vec<GalleyView>,
    /// Positions whose code matches no compartment.
    pub unplaced: Vec<Stowed>,
}

impl GalleyMap {
    /// Place every position of `items` into `layout`.
    #[must_use]
    pub fn build(layout: &AircraftLayout, items: &[Item]) -> Self {
        let mut stowed: Vec<Stowed> = items
            .iter()
            .flat_map(|item| {
                item.positions.iter().map(move |p| Stowed {
                    item_id: item.id,
                    name: item.name.clone(),
                    position_id: p.id,
                    code: p.code.clone(),
                    available: p.available,
                    quantity: p.quantity,
                    unit: p.unit.clone(),
                })
            })
            .collect();

        let mut galleys = Vec::with_capacity(layout.galleys.len());
        for galley in &layout.galleys {
            let mut compartments = Vec::with_capacity(galley.compartments.len());
            for c in &galley.compartments {
                let (contents, rest): (Vec<Stowed>, Vec<Stowed>) = stowed
                    .into_iter()
                    .partition(|s| s.code.eq_ignore_ascii_case(c.code));
                stowed = rest;
                compartments.push(CompartmentView {
                    compartment: *c,
                    contents,
                });
            }
            galleys.push(GalleyView {
                code: galley.code,
                name: galley.name,
                compartments,
            });
        }

        Self {
            aircraft: layout.aircraft,
            galleys,
            unplaced: stowed,
        }
    }

    /// Contents of one compartment, if it exists in the layout.
    #[must_use]
    pub fn compartment(&self, code: &str) -> Option<&CompartmentView> {
        self.galleys
            .iter()
            .flat_map(|g| g.compartments.iter())
            .find(|c| c.compartment.code.eq_ignore_ascii_case(code))
    }
}
