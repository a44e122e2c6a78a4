//! JSON command protocol for scripted editing.
//!
//! Commands run against a `TestHarness`. Rejections come back as
//! `CommandResponse { success: false, error }`; the session is untouched.

use serde::{Deserialize, Serialize};
use shared::{Category, GridKind, ShapeKey, Texture};

use crate::harness::TestHarness;
use crate::state::EditorMode;

/// A command against the editing session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Select a shape (and optionally a texture) for later placement
    Select {
        category: Category,
        angle_bucket: String,
        shape_name: String,
        #[serde(default)]
        texture: Option<Texture>,
    },
    /// Place the selected shape; grid defaults to the shape's grid
    Place {
        cell: usize,
        #[serde(default)]
        grid: Option<GridKind>,
    },
    /// Erase shapes of one category at a cell
    Erase {
        cell: usize,
        category: Category,
        #[serde(default)]
        grid: Option<GridKind>,
    },
    /// Preview the selected shape at a cell
    Hover {
        cell: usize,
        #[serde(default)]
        grid: Option<GridKind>,
    },
    /// Switch between free and constrained editing
    SetMode { mode: EditorMode },
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Clear both grids.
    Clear,
    /// Inspect the composition: list all placements.
    Inspect,
    /// Export the composition document as JSON.
    ExportComposition {
        #[serde(default)]
        name: Option<String>,
    },
    /// Replace the composition with a document given as JSON text.
    LoadComposition { json: String },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn ok_serialized<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(format!("failed to serialize response: {e}")),
        }
    }
}

/// Grid for a command: explicit, else the selected shape's, else serifs
fn target_grid(harness: &TestHarness, grid: Option<GridKind>) -> GridKind {
    grid.or_else(|| harness.state.selection.shape().map(|k| k.category.grid_kind()))
        .unwrap_or(GridKind::Serifs)
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::Select {
            category,
            angle_bucket,
            shape_name,
            texture,
        } => {
            let key = ShapeKey::new(category, angle_bucket, shape_name);
            match harness.state.select(key.clone()) {
                Ok(()) => {
                    harness.state.selection.set_texture(texture);
                    CommandResponse::ok_with_data(serde_json::json!({ "selected": key.to_string() }))
                }
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Place { cell, grid } => {
            let kind = target_grid(harness, grid);
            match harness.place_selected(kind, cell) {
                Ok(outcome) => CommandResponse::ok_with_data(serde_json::json!({
                    "id": outcome.id,
                    "grid": outcome.grid,
                    "cells": outcome.cells,
                    "cleared": outcome.cleared.len(),
                })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Erase { cell, category, grid } => {
            let kind = grid.unwrap_or_else(|| category.grid_kind());
            let removed = harness.state.erase(kind, cell, category);
            let ids: Vec<_> = removed.iter().map(|p| p.id).collect();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": ids }))
        }

        AgentCommand::Hover { cell, grid } => {
            let kind = target_grid(harness, grid);
            match harness.hover(kind, cell) {
                Ok(preview) => CommandResponse::ok_serialized(&preview),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::SetMode { mode } => {
            harness.set_mode(mode);
            CommandResponse::ok_with_data(serde_json::json!({ "mode": mode }))
        }

        AgentCommand::Undo => {
            let success = harness.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = harness.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        AgentCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }

        AgentCommand::Inspect => CommandResponse::ok_with_data(inspect(harness)),

        AgentCommand::ExportComposition { name } => {
            if let Some(name) = name {
                harness.state.composition.name = name;
            }
            let json = harness.export_composition_json();
            CommandResponse::ok_with_data(serde_json::json!({ "composition_json": json }))
        }

        AgentCommand::LoadComposition { json } => match harness.load_composition_json(&json) {
            Ok(report) => {
                let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
                CommandResponse::ok_with_data(serde_json::json!({
                    "placed": report.placed,
                    "warnings": warnings,
                }))
            }
            Err(e) => CommandResponse::err(e.to_string()),
        },
    }
}

/// Placements of both grids with their visual position
pub fn inspect(harness: &TestHarness) -> serde_json::Value {
    let state = &harness.state;
    let engine = state.engine();
    let mut grids = serde_json::Map::new();

    for kind in GridKind::all() {
        let placements: Vec<serde_json::Value> = state
            .composition
            .grids
            .get(*kind)
            .placements()
            .map(|p| {
                let positioning = engine.positioning(p);
                let origin = positioning
                    .as_ref()
                    .and_then(|pos| harness.layout.placement_origin(*kind, pos));
                serde_json::json!({
                    "id": p.id,
                    "shape": p.key.to_string(),
                    "anchor": p.anchor,
                    "cells": p.cells,
                    "texture": p.texture,
                    "positioning": positioning,
                    "origin": origin,
                })
            })
            .collect();
        grids.insert(kind.as_str().to_string(), serde_json::Value::Array(placements));
    }

    serde_json::json!({
        "name": state.composition.name,
        "mode": state.settings.mode,
        "placement_count": state.composition.grids.placement_count(),
        "version": state.composition.version(),
        "grids": grids,
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_serialization_failure_is_error_response() {
        let resp = CommandResponse::ok_serialized(&Unserializable);
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert!(resp.error.unwrap().contains("not representable"));
    }

    #[test]
    fn test_hover_response_carries_preview() {
        let mut h = TestHarness::new();
        h.select(Category::Bodies, "0_deg", "horizontal").unwrap();
        let resp = execute_command(&mut h, AgentCommand::Hover { cell: 12, grid: None });
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["verdict"], "placeable");
        assert_eq!(data["cells"], serde_json::json!([12]));
    }

    #[test]
    fn test_command_serde_undo() {
        let json = r#"{"command": "undo"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::Undo));
    }

    #[test]
    fn test_command_serde_select() {
        let json = r##"{"command": "select", "category": "joins", "angle_bucket": "0_deg", "shape_name": "bridge", "texture": "#ff0000"}"##;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::Select {
                category, texture, ..
            } => {
                assert_eq!(category, Category::Joins);
                assert_eq!(texture, Some(Texture::Color("#ff0000".to_string())));
            }
            _ => panic!("Expected Select"),
        }
    }

    #[test]
    fn test_command_serde_place_default_grid() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"command": "place", "cell": 4}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Place { cell: 4, grid: None }));
    }

    #[test]
    fn test_command_serde_set_mode() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"command": "set_mode", "mode": "constrained"}"#).unwrap();
        assert!(matches!(
            cmd,
            AgentCommand::SetMode {
                mode: EditorMode::Constrained
            }
        ));
    }

    #[test]
    fn test_execute_place_without_selection() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "place", "cell": 12}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("no shape selected"));
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = TestHarness::new();
        h.place(&crate::fixtures::body_key("0_deg", "horizontal"), 12)
            .unwrap();
        h.place(&crate::fixtures::join_key("0_deg", "bridge"), 0).unwrap();

        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["placement_count"], 2);
        assert_eq!(data["grids"]["joins"][0]["cells"], serde_json::json!([0, 1]));
        assert!(data["grids"]["serifs"][0]["origin"]["x"].is_number());
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut h = TestHarness::new();
        h.place(&crate::fixtures::serif_key("0_deg", "cap"), 2).unwrap();

        let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["undone"], true);
        assert_eq!(h.placement_count(), 0);

        let resp = execute_json(&mut h, r#"{"command": "redo"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["redone"], true);
        assert_eq!(h.placement_count(), 1);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        assert!(execute_json(&mut h, "not valid json").is_err());
    }
}
