//! End-to-end runs over small hand-written logs.

use maze_heatmap::{
    extract_movements, parse_log, ComparativeAnalysis, ExtractFilter, FilterSpec, MazeGrid, MazeMarkers,
    PathAnalysis, Statistics,
};
use serde_json::json;

fn two_robot_log() -> serde_json::Value {
    json!({
        "simulation_info": { "version": "1.0", "created": "2024" },
        "generations": [
            {
                "generation": 0,
                "maze_info": {
                    "type": "SIMPLE",
                    "width": 4,
                    "height": 4,
                    "layout": [
                        ["B", "B", "B", "B"],
                        ["B", "S", "O", "B"],
                        ["B", "O", "G", "B"],
                        ["B", "B", "B", "B"]
                    ]
                },
                "individuals": [
                    {
                        "id": 0, "fitness": 9.5, "steps_taken": 3, "reached_goal": true, "is_best": true,
                        "movements": [
                            { "step": 0, "position": [1.0, 1.0], "angle": 0.0, "action": "FORWARD" },
                            { "step": 1, "position": [2.0, 1.0], "angle": 0.0, "action": "TURN_RIGHT_45" },
                            { "step": 2, "position": [2.0, 2.0], "angle": 90.0, "action": "FORWARD" }
                        ]
                    },
                    {
                        "id": 1, "fitness": 2.5, "steps_taken": 2, "reached_goal": false, "is_best": false,
                        "movements": [
                            { "step": 1, "position": [1.0, 2.0], "action": "BACKWARD" },
                            { "step": 0, "position": [1.0, 1.0], "action": "FORWARD" }
                        ]
                    }
                ],
                "generation_stats": {
                    "goals_reached": 1, "avg_fitness": 6.0, "best_fitness": 9.5, "best_individual_id": 0
                }
            }
        ]
    })
}

#[test]
fn two_robots_end_to_end() {
    let log = parse_log(two_robot_log()).unwrap();
    let extraction = extract_movements(&log, ExtractFilter::default());
    assert_eq!(extraction.events.len(), 5);

    let maze_info = extraction.maze_info.as_ref().unwrap();
    let maze = MazeGrid::from_info(maze_info).unwrap();
    assert_eq!((maze.rows(), maze.cols()), (4, 4));

    let markers = MazeMarkers::resolve(Some(maze_info), &maze);
    assert_eq!(markers.start.map(|p| (p.x, p.y)), Some((1.0, 1.0)));
    assert_eq!(markers.goal.map(|p| (p.x, p.y)), Some((2.0, 2.0)));

    let analysis = ComparativeAnalysis::new(&maze, &extraction.events);
    let views = analysis.outcome_split().unwrap();

    let successful = &views[1];
    assert_eq!(successful.source_filter, FilterSpec::Successful);
    // every cell of A's route is visited once, so all tie at the peak
    assert_eq!(successful.density_grid.get(1, 1), Some(1.0));
    assert_eq!(successful.density_grid.get(1, 2), Some(1.0));
    assert_eq!(successful.density_grid.get(2, 2), Some(1.0));
    assert_eq!(successful.density_grid.get(2, 1), Some(0.0));

    let all = &views[0];
    assert_eq!(all.density_grid.get(1, 1), Some(1.0));
    assert_eq!(all.density_grid.get(2, 1), Some(0.5));

    let failed = &views[2];
    assert_eq!(failed.density_grid.get(2, 1), Some(1.0));
    assert_eq!(failed.density_grid.get(2, 2), Some(0.0));

    let stats = Statistics::calculate(&extraction.events).unwrap();
    assert_eq!(stats.success_rate, 50.0);
    assert_eq!(stats.individual_count, 2);
    assert_eq!(stats.total_movements, 5);
    assert_eq!(stats.generation_range, (0, 0));
    assert_eq!(stats.fitness_min, 2.5);
    assert_eq!(stats.fitness_max, 9.5);

    let paths = PathAnalysis::analyze(&extraction.events);
    assert_eq!(paths.trajectories.len(), 2);
    assert_eq!(paths.successful.len(), 1);
    let b = paths.failed_paths().next().unwrap();
    let b_steps: Vec<u32> = b.events.iter().map(|e| e.step).collect();
    assert_eq!(b_steps, vec![0, 1]);
    assert_eq!(paths.end_positions.len(), 2);
}

#[test]
fn best_only_and_generation_filters_compose() {
    let log = parse_log(two_robot_log()).unwrap();

    let best = extract_movements(&log, ExtractFilter { generation: None, best_only: true });
    assert_eq!(best.events.len(), 3);
    assert!(best.events.iter().all(|e| e.reached_goal));

    let absent = extract_movements(&log, ExtractFilter { generation: Some(5), best_only: false });
    assert!(absent.events.is_empty());
    assert!(Statistics::calculate(&absent.events).is_none());
}

#[test]
fn evolution_over_many_generations() {
    let layout = vec!["OOOOOOOOOO"; 10];
    let generations: Vec<_> = (0..20)
        .map(|g: u32| {
            let fitness = f64::from(g);
            let x = fitness * 0.5;
            json!({
                "generation": g,
                "maze_info": { "layout": layout.clone() },
                "individuals": [{
                    "id": 0, "fitness": fitness,
                    "movements": [{ "step": 0, "position": [x, 3.6], "action": "FORWARD" }]
                }]
            })
        })
        .collect();
    let log = parse_log(json!({ "generations": generations })).unwrap();
    let extraction = extract_movements(&log, ExtractFilter::default());
    let maze = MazeGrid::from_info(extraction.maze_info.as_ref().unwrap()).unwrap();

    let views = ComparativeAnalysis::new(&maze, &extraction.events).evolution(4).unwrap();
    let picked: Vec<_> = views.iter().map(|v| v.source_filter).collect();
    assert_eq!(
        picked,
        vec![
            FilterSpec::Generation(0),
            FilterSpec::Generation(5),
            FilterSpec::Generation(10),
            FilterSpec::Generation(15)
        ]
    );
    // generation 15 sits at x = 7.5, which rounds to even column 8 on row 4
    assert_eq!(views[3].density_grid.get(4, 8), Some(1.0));
}
