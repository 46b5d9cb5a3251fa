//! Game-side tile records
//!
//! The tile database the game reads: per-tile flags, interactions, and
//! drops. The editor assigns these by `game_id`; field names are part of the
//! on-disk JSON contract.

use serde::{Deserialize, Serialize};

use crate::GameId;

/// An item drop granted by a tile action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drop {
    pub item_id: GameId,
    /// Inclusive min/max quantity range.
    pub quantity: [u32; 2],
}

/// An interaction the player can perform on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualities_required: Option<Vec<String>>,
    /// Tile the target turns into after the action completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns_into: Option<GameId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gives: Option<Vec<Drop>>,
    /// When `true`, drops spawn on the tile instead of the inventory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gives_in_place: Option<bool>,
}

/// One game tile definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: GameId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_ids: Option<Vec<GameId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climbs_to: Option<Vec<GameId>>,
}

impl Tile {
    /// Whether the tile carries a given flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags
            .as_ref()
            .map(|flags| flags.iter().any(|f| f == flag))
            .unwrap_or(false)
    }
}

/// The full tile database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileData {
    pub tiles: Vec<Tile>,
}

impl TileData {
    /// Find a tile by id.
    pub fn tile(&self, id: GameId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_tile_omits_optional_fields() {
        let tile = Tile {
            id: 3,
            name: "Grass".to_string(),
            flags: None,
            actions: None,
            drop_ids: None,
            climbs_to: None,
        };

        assert_eq!(
            serde_json::to_value(&tile).unwrap(),
            json!({ "id": 3, "name": "Grass" })
        );
    }

    #[test]
    fn test_tile_round_trip_with_actions() {
        let json = json!({
            "id": 10,
            "name": "Berry Bush",
            "flags": ["WALKABLE"],
            "actions": [{
                "name": "harvest",
                "type": 2,
                "qualities_required": ["cutting"],
                "turns_into": 11,
                "gives": [{ "item_id": 40, "quantity": [1, 3] }],
                "gives_in_place": true,
            }],
            "drop_ids": [40],
        });

        let tile: Tile = serde_json::from_value(json.clone()).unwrap();
        assert!(tile.has_flag("WALKABLE"));
        assert!(!tile.has_flag("CLIMBABLE"));

        let action = &tile.actions.as_ref().unwrap()[0];
        assert_eq!(action.turns_into, Some(11));
        assert_eq!(action.gives.as_ref().unwrap()[0].quantity, [1, 3]);

        assert_eq!(serde_json::to_value(&tile).unwrap(), json);
    }

    #[test]
    fn test_tile_data_lookup() {
        let data = TileData {
            tiles: vec![
                Tile {
                    id: 1,
                    name: "Dirt".to_string(),
                    flags: None,
                    actions: None,
                    drop_ids: None,
                    climbs_to: None,
                },
                Tile {
                    id: 2,
                    name: "Stone".to_string(),
                    flags: None,
                    actions: None,
                    drop_ids: None,
                    climbs_to: None,
                },
            ],
        };

        assert_eq!(data.tile(2).unwrap().name, "Stone");
        assert!(data.tile(5).is_none());
    }
}
