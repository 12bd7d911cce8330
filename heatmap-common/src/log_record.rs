use serde::{Deserialize, Serialize};

/// Top level of a robot simulation log: one entry per evolved generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationLog {
    #[serde(default)]
    pub simulation_info: Option<SimulationInfo>,
    pub generations: Vec<GenerationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// One generation block as written by the simulator's JSON logger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    #[serde(default)]
    pub maze_info: Option<MazeInfo>,
    #[serde(default)]
    pub individuals: Vec<IndividualRecord>,
    #[serde(default)]
    pub generation_stats: Option<GenerationStats>,
}

/// Maze metadata attached to a generation. Start and goal are `[x, y]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeInfo {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
    #[serde(default)]
    pub start: Option<[f32; 2]>,
    #[serde(default)]
    pub goal: Option<[f32; 2]>,
    pub layout: Vec<LayoutRow>,
}

impl MazeInfo {
    /// Layout rows flattened to plain strings, whichever encoding the log used.
    pub fn layout_rows(&self) -> Vec<String> {
        self.layout.iter().map(LayoutRow::to_text).collect()
    }
}

/// A maze row is either a string (`"#OSG"`) or, as the C logger writes it,
/// an array of one-character strings (`["#", "O", "S", "G"]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutRow {
    Text(String),
    Cells(Vec<String>),
}

impl LayoutRow {
    pub fn to_text(&self) -> String {
        match self {
            LayoutRow::Text(s) => s.clone(),
            LayoutRow::Cells(cells) => cells.concat(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualRecord {
    pub id: u32,
    pub fitness: f32,
    #[serde(default)]
    pub steps_taken: Option<u32>,
    #[serde(default)]
    pub reached_goal: bool,
    #[serde(default)]
    pub is_best: bool,
    #[serde(default)]
    pub collision_count: Option<u32>,
    #[serde(default)]
    pub final_position: Option<FinalPosition>,
    /// Absent when the simulator ran without movement logging for this individual.
    #[serde(default)]
    pub movements: Option<Vec<MovementRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalPosition {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default)]
    pub distance_to_goal: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementRecord {
    pub position: [f32; 2],
    pub step: u32,
    pub action: String,
    #[serde(default)]
    pub angle: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStats {
    pub goals_reached: u32,
    pub avg_fitness: f32,
    pub best_fitness: f32,
    pub best_individual_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_layout_encodings() {
        let info: MazeInfo = serde_json::from_value(serde_json::json!({
            "type": "SIMPLE",
            "width": 4,
            "height": 2,
            "start": [1, 1],
            "layout": ["O#SG", ["#", "B", "O", "G"]]
        }))
        .unwrap();

        assert_eq!(info.layout_rows(), vec!["O#SG".to_string(), "#BOG".to_string()]);
        assert_eq!(info.kind.as_deref(), Some("SIMPLE"));
        assert_eq!(info.start, Some([1.0, 1.0]));
        assert!(info.goal.is_none());
    }

    #[test]
    fn optional_individual_fields_default() {
        let ind: IndividualRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "fitness": 12.5
        }))
        .unwrap();

        assert!(!ind.reached_goal);
        assert!(!ind.is_best);
        assert!(ind.movements.is_none());
    }
}
