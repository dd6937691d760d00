//! Land parcel ("block") model.

use crate::geometry::{self, BoundingBox, Point};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;

/// Minimum vertex count for a renderable block polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Tolerance used when checking fixture center/bbox against the polygon.
const GEOMETRY_EPSILON: f64 = 1e-6;

/// Lifecycle status of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Active,
    Resting,
    Replanting,
    Maintenance,
}

impl BlockStatus {
    pub const ALL: [Self; 4] = [
        Self::Active,
        Self::Resting,
        Self::Replanting,
        Self::Maintenance,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resting => "resting",
            Self::Replanting => "replanting",
            Self::Maintenance => "maintenance",
        }
    }
}

/// What the block grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Avocado,
    Citrus,
    Nuts,
    Vegetables,
    Fallow,
}

impl CropType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Avocado => "avocado",
            Self::Citrus => "citrus",
            Self::Nuts => "nuts",
            Self::Vegetables => "vegetables",
            Self::Fallow => "fallow",
        }
    }
}

/// How the block is irrigated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationType {
    Drip,
    Sprinkler,
    Flood,
    None,
}

impl IrrigationType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Drip => "drip",
            Self::Sprinkler => "sprinkler",
            Self::Flood => "flood",
            Self::None => "none",
        }
    }
}

/// Free-form planting metadata. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMetadata {
    pub trees: Option<u32>,
    pub variety: Option<String>,
    pub rootstock: Option<String>,
    pub spacing: Option<String>,
    pub notes: Option<String>,
}

/// Map-space geometry for a block.
///
/// `center` and `bounding_box` are denormalized caches of the polygon. The
/// fixture loader re-derives both (see [`Block::reconcile_geometry`]) so
/// they can never drift from `points` inside a running process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCoordinates {
    pub points: Vec<Point>,
    pub center: Point,
    pub bounding_box: BoundingBox,
}

/// A land parcel belonging to a ranch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub ranch_id: String,
    pub name: String,
    pub block_number: u32,
    /// Area in acres. Positive.
    pub area: f64,
    pub crop_type: CropType,
    pub planting_date: NaiveDate,
    #[serde(default)]
    pub last_harvest: Option<NaiveDate>,
    pub soil_type: String,
    pub irrigation_type: IrrigationType,
    pub coordinates: BlockCoordinates,
    #[serde(default)]
    pub metadata: BlockMetadata,
    pub status: BlockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Block {
    /// True when the polygon satisfies the ≥3-vertex invariant.
    #[must_use]
    pub fn has_valid_polygon(&self) -> bool {
        self.coordinates.points.len() >= MIN_POLYGON_POINTS
    }

    /// Recompute `center` and `bounding_box` from the polygon.
    ///
    /// Returns `true` when the stored values already agreed with the
    /// derived ones (within a small tolerance). The loader warns on `false`
    /// and keeps the derived values; stored geometry is a cache, never an
    /// independent source of truth.
    pub fn reconcile_geometry(&mut self) -> bool {
        let derived_center = geometry::polygon_center(&self.coordinates.points);
        let derived_bbox = BoundingBox::from_polygon(&self.coordinates.points);

        let consistent = points_close(self.coordinates.center, derived_center)
            && bbox_close(self.coordinates.bounding_box, derived_bbox);

        self.coordinates.center = derived_center;
        self.coordinates.bounding_box = derived_bbox;
        consistent
    }
}

fn points_close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < GEOMETRY_EPSILON && (a.y - b.y).abs() < GEOMETRY_EPSILON
}

fn bbox_close(a: BoundingBox, b: BoundingBox) -> bool {
    (a.min_x - b.min_x).abs() < GEOMETRY_EPSILON
        && (a.max_x - b.max_x).abs() < GEOMETRY_EPSILON
        && (a.min_y - b.min_y).abs() < GEOMETRY_EPSILON
        && (a.max_y - b.max_y).abs() < GEOMETRY_EPSILON
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IrrigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "active" => Ok(Self::Active),
            "resting" => Ok(Self::Resting),
            "replanting" => Ok(Self::Replanting),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(ParseEnumError {
                expected: "block status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for CropType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "avocado" => Ok(Self::Avocado),
            "citrus" => Ok(Self::Citrus),
            "nuts" => Ok(Self::Nuts),
            "vegetables" => Ok(Self::Vegetables),
            "fallow" => Ok(Self::Fallow),
            _ => Err(ParseEnumError {
                expected: "crop type",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for IrrigationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "drip" => Ok(Self::Drip),
            "sprinkler" => Ok(Self::Sprinkler),
            "flood" => Ok(Self::Flood),
            "none" => Ok(Self::None),
            _ => Err(ParseEnumError {
                expected: "irrigation type",
                got: s.to_string(),
            }),
        }
    }
}

/// Test fixture shared by the map/scene/store test modules.
#[cfg(test)]
pub(crate) fn sample_block(id: &str, status: BlockStatus) -> Block {
    use chrono::TimeZone;

    let points = vec![
        Point::new(100.0, 100.0),
        Point::new(200.0, 100.0),
        Point::new(200.0, 180.0),
        Point::new(100.0, 180.0),
    ];
    Block {
        id: id.to_string(),
        ranch_id: "ranch-don-enrique".to_string(),
        name: format!("Block {id}"),
        block_number: 1,
        area: 12.5,
        crop_type: CropType::Avocado,
        planting_date: NaiveDate::from_ymd_opt(2019, 3, 15).expect("valid date"),
        last_harvest: None,
        soil_type: "sandy loam".to_string(),
        irrigation_type: IrrigationType::Drip,
        coordinates: BlockCoordinates {
            points,
            center: Point::new(150.0, 140.0),
            bounding_box: BoundingBox {
                min_x: 100.0,
                max_x: 200.0,
                min_y: 100.0,
                max_y: 180.0,
            },
        },
        metadata: BlockMetadata::default(),
        status,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("ts"),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("ts"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockStatus, CropType, IrrigationType, sample_block};
    use crate::geometry::Point;
    use std::str::FromStr;

    #[test]
    fn enum_json_matches_fixture_spelling() {
        assert_eq!(
            serde_json::to_string(&BlockStatus::Replanting).expect("json"),
            "\"replanting\""
        );
        assert_eq!(
            serde_json::to_string(&CropType::Avocado).expect("json"),
            "\"avocado\""
        );
        assert_eq!(
            serde_json::to_string(&IrrigationType::Drip).expect("json"),
            "\"drip\""
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for status in BlockStatus::ALL {
            assert_eq!(
                BlockStatus::from_str(&status.to_string()).expect("roundtrip"),
                status
            );
        }
        assert!(BlockStatus::from_str("fallow").is_err());
        assert!(CropType::from_str("active").is_err());
        assert!(IrrigationType::from_str("pivot").is_err());
    }

    #[test]
    fn reconcile_keeps_consistent_geometry() {
        let mut block = sample_block("b1", BlockStatus::Active);
        assert!(block.reconcile_geometry());
        assert!((block.coordinates.center.x - 150.0).abs() < 1e-9);
    }

    #[test]
    fn reconcile_repairs_drifted_cache() {
        let mut block = sample_block("b1", BlockStatus::Active);
        block.coordinates.center = Point::new(0.0, 0.0);
        assert!(!block.reconcile_geometry());
        // derived values win
        assert!((block.coordinates.center.x - 150.0).abs() < 1e-9);
        assert!((block.coordinates.bounding_box.max_y - 180.0).abs() < 1e-9);
    }

    #[test]
    fn polygon_invariant_detects_degenerate_fixture() {
        let mut block = sample_block("b1", BlockStatus::Active);
        block.coordinates.points.truncate(2);
        assert!(!block.has_valid_polygon());
    }

    #[test]
    fn block_deserializes_from_camel_case_fixture_shape() {
        let json = r#"{
            "id": "rde-block-1",
            "ranchId": "ranch-don-enrique",
            "name": "North Field",
            "blockNumber": 1,
            "area": 14.2,
            "cropType": "avocado",
            "plantingDate": "2018-05-02",
            "soilType": "decomposed granite",
            "irrigationType": "drip",
            "coordinates": {
                "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}],
                "center": {"x": 6.666, "y": 3.333},
                "boundingBox": {"minX": 0, "maxX": 10, "minY": 0, "maxY": 10}
            },
            "metadata": {"trees": 450, "variety": "Hass"},
            "status": "active",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-06-01T00:00:00Z"
        }"#;
        let block: Block = serde_json::from_str(json).expect("fixture shape");
        assert_eq!(block.name, "North Field");
        assert_eq!(block.metadata.trees, Some(450));
        assert!(block.last_harvest.is_none());
        assert!(block.has_valid_polygon());
    }
}
