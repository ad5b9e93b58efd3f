//! CLI utility for building navigation meshes from OBJ files and running path queries

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use navmesh::{BuildConfig, NavMesh, NavMeshQuery, QueryConfig, SearchStrategy};
use navmesh_common::TriMesh;

/// A CLI utility for navigation mesh inspection and pathfinding
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads a mesh
#[derive(clap::Args, Debug)]
struct MeshArgs {
    /// Input mesh file (OBJ format)
    #[clap(long, value_parser)]
    input: PathBuf,

    /// JSON settings file with optional `build` and `query` sections
    #[clap(long, value_parser)]
    config: Option<PathBuf>,

    /// Down vector for the walkability test (x,y,z); use 0,1,0 for counter-clockwise meshes
    #[clap(long, value_parser = parse_vector, allow_hyphen_values = true)]
    down: Option<Vec3>,

    /// Maximum slope in degrees that is considered walkable
    #[clap(long)]
    max_slope: Option<f32>,

    /// Weld vertices by position, snapping them to a grid of this size
    #[clap(long)]
    weld: Option<f32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a navigation mesh and print its statistics
    Inspect {
        #[clap(flatten)]
        mesh: MeshArgs,
    },

    /// Find a path on a navigation mesh
    FindPath {
        #[clap(flatten)]
        mesh: MeshArgs,

        /// Start position (x,y,z)
        #[clap(long, value_parser = parse_vector, allow_hyphen_values = true)]
        start: Vec3,

        /// End position (x,y,z)
        #[clap(long, value_parser = parse_vector, allow_hyphen_values = true)]
        end: Vec3,

        /// Agent radius
        #[clap(long, default_value = "0.0")]
        radius: f32,

        /// Face search algorithm
        #[clap(long, value_enum)]
        strategy: Option<Strategy>,

        /// Output path file (.json writes JSON, anything else one waypoint per line)
        #[clap(long, value_parser)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Greedy,
    Astar,
}

impl From<Strategy> for SearchStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Greedy => SearchStrategy::GreedyBestFirst,
            Strategy::Astar => SearchStrategy::AStar,
        }
    }
}

/// Contents of a `--config` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    build: BuildConfig,
    query: QueryConfig,
}

impl Settings {
    fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Waypoint file written by `find-path --output path.json`
#[derive(Debug, Serialize)]
struct PathReport {
    start: Vec3,
    end: Vec3,
    radius: f32,
    waypoints: Vec<Vec3>,
    faces: Vec<u32>,
    length: f32,
}

/// Parse a comma-separated vector
fn parse_vector(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();

    if parts.len() != 3 {
        return Err(format!(
            "Vector must have 3 components, got {}",
            parts.len()
        ));
    }

    let x = parts[0].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = parts[1].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let z = parts[2].trim().parse::<f32>().map_err(|e| e.to_string())?;

    Ok(Vec3::new(x, y, z))
}

impl MeshArgs {
    /// Build settings from the config file with command line overrides applied
    fn build_config(&self, mut config: BuildConfig) -> BuildConfig {
        if let Some(down) = self.down {
            config = config.with_down(down);
        }
        if let Some(max_slope) = self.max_slope {
            config = config.with_max_slope_angle(max_slope);
        }
        if let Some(weld) = self.weld {
            config = config.with_welding(weld);
        }
        config
    }

    fn load(&self) -> Result<(NavMesh, QueryConfig)> {
        let settings = Settings::load(self.config.as_deref())?;
        let build_config = self.build_config(settings.build);
        log::debug!("Build settings: {:?}", build_config);

        println!("Loading mesh from {}...", self.input.display());
        let tri_mesh = TriMesh::from_obj(&self.input)
            .map_err(|e| anyhow!("Failed to load mesh: {}", e))?;

        println!(
            "Mesh loaded: {} vertices, {} triangles",
            tri_mesh.vert_count(),
            tri_mesh.tri_count()
        );

        let nav_mesh = NavMesh::from_tri_mesh(&tri_mesh, &build_config)
            .map_err(|e| anyhow!("Failed to build navigation mesh: {}", e))?;

        Ok((nav_mesh, settings.query))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Inspect { mesh } => inspect(&mesh),
        Commands::FindPath {
            mesh,
            start,
            end,
            radius,
            strategy,
            output,
        } => find_path(&mesh, start, end, radius, strategy, output.as_deref()),
    }
}

/// Build a navigation mesh and print what went into it
fn inspect(args: &MeshArgs) -> Result<()> {
    let (nav_mesh, _) = args.load()?;
    print!("{}", describe(&nav_mesh));
    Ok(())
}

fn describe(nav_mesh: &NavMesh) -> String {
    let stats = nav_mesh.stats();
    let mut text = format!(
        "Navigation mesh: {} vertices, {} faces\n\
         Input triangles: {} ({} not walkable, {} degenerate)\n\
         Edges: {} shared, {} boundary, {} non-manifold\n",
        nav_mesh.vertex_count(),
        nav_mesh.face_count(),
        stats.input_triangles,
        stats.culled_triangles,
        stats.degenerate_triangles,
        stats.edges.shared_edges,
        stats.edges.boundary_edges,
        stats.edges.non_manifold_edges,
    );

    match nav_mesh.bounds() {
        Some((bmin, bmax)) => text.push_str(&format!("Bounds: min={bmin}, max={bmax}\n")),
        None => text.push_str("Bounds: empty\n"),
    }

    let isolated = nav_mesh
        .faces()
        .iter()
        .filter(|face| face.neighbors().next().is_none())
        .count();
    text.push_str(&format!("Isolated faces: {isolated}\n"));
    text
}

/// Find a path on a navigation mesh
fn find_path(
    args: &MeshArgs,
    start: Vec3,
    end: Vec3,
    radius: f32,
    strategy: Option<Strategy>,
    output: Option<&Path>,
) -> Result<()> {
    let (nav_mesh, mut query_config) = args.load()?;
    if let Some(strategy) = strategy {
        query_config = query_config.with_search(strategy.into());
    }

    println!("Finding path from {} to {} (radius {})...", start, end, radius);

    let query = NavMeshQuery::with_config(&nav_mesh, query_config);
    let path = query
        .find_path(start, end, radius)
        .map_err(|status| anyhow!("Failed to find path: {}", status))?;

    println!(
        "Found path through {} faces with {} waypoints (length {:.3})",
        path.faces.len(),
        path.waypoints.len(),
        path.length()
    );

    let Some(output_path) = output else {
        println!("Path:");
        for (i, waypoint) in path.waypoints.iter().enumerate() {
            println!("{}: {},{},{}", i, waypoint.x, waypoint.y, waypoint.z);
        }
        return Ok(());
    };

    println!("Saving path to {}...", output_path.display());
    let is_json = output_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;

    if is_json {
        let report = PathReport {
            start,
            end,
            radius,
            length: path.length(),
            faces: path.faces.iter().map(|f| f.id()).collect(),
            waypoints: path.waypoints,
        };
        serde_json::to_writer_pretty(&mut file, &report)?;
        writeln!(file)?;
    } else {
        writeln!(file, "# Path from {} to {}", start, end)?;
        writeln!(file, "# {} waypoints", path.waypoints.len())?;
        for waypoint in &path.waypoints {
            writeln!(file, "{},{},{}", waypoint.x, waypoint.y, waypoint.z)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STRIP_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 0 0 1
v 1 0 1
v 2 0 1
f 1 4 5 2
f 2 5 6 3
";

    fn mesh_args(input: PathBuf) -> MeshArgs {
        MeshArgs {
            input,
            config: None,
            down: Some(Vec3::Y),
            max_slope: None,
            weld: None,
        }
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("1,-2.5, 3").unwrap(), Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("1,a,3").is_err());
    }

    #[test]
    fn test_cli_parses_find_path() {
        let args = Args::try_parse_from([
            "navmesh",
            "find-path",
            "--input",
            "level.obj",
            "--start",
            "-1,0,2",
            "--end",
            "3,0,4",
            "--radius",
            "0.4",
            "--strategy",
            "astar",
            "--down",
            "0,1,0",
        ])
        .unwrap();

        let Commands::FindPath {
            mesh,
            start,
            radius,
            strategy,
            ..
        } = args.command
        else {
            panic!("expected find-path");
        };
        assert_eq!(start, Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(radius, 0.4);
        assert_eq!(strategy, Some(Strategy::Astar));
        assert_eq!(mesh.down, Some(Vec3::Y));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.json");
        fs::write(
            &config_path,
            r#"{ "build": { "max_slope_angle": 30.0, "down": [0.0, 1.0, 0.0] }, "query": { "search": "a_star" } }"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&config_path)).unwrap();
        assert_eq!(settings.query.search, SearchStrategy::AStar);

        let mut args = mesh_args(PathBuf::from("unused.obj"));
        args.down = None;
        args.max_slope = Some(60.0);
        let config = args.build_config(settings.build);
        assert_eq!(config.max_slope_angle, 60.0);
        assert_eq!(config.down, Vec3::Y);
        assert!(!config.weld_vertices);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("missing.json"))).is_err());
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_inspect_and_find_path() {
        let dir = tempdir().unwrap();
        let obj_path = dir.path().join("strip.obj");
        fs::write(&obj_path, STRIP_OBJ).unwrap();
        let args = mesh_args(obj_path);

        let (nav_mesh, _) = args.load().unwrap();
        let report = describe(&nav_mesh);
        assert!(report.contains("6 vertices, 4 faces"));
        assert!(report.contains("Edges: 3 shared"));

        let json_path = dir.path().join("path.json");
        find_path(
            &args,
            Vec3::new(0.2, 0.0, 0.5),
            Vec3::new(1.8, 0.0, 0.5),
            0.1,
            Some(Strategy::Greedy),
            Some(&json_path),
        )
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(written["waypoints"].as_array().unwrap().len(), 2);

        let text_path = dir.path().join("path.txt");
        find_path(
            &args,
            Vec3::new(0.2, 0.0, 0.5),
            Vec3::new(1.8, 0.0, 0.5),
            0.0,
            None,
            Some(&text_path),
        )
        .unwrap();
        let text = fs::read_to_string(&text_path).unwrap();
        assert!(text.lines().any(|line| line == "0.2,0,0.5"));
    }

    #[test]
    fn test_find_path_off_mesh_fails() {
        let dir = tempdir().unwrap();
        let obj_path = dir.path().join("strip.obj");
        fs::write(&obj_path, STRIP_OBJ).unwrap();

        let result = find_path(
            &mesh_args(obj_path),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(1.8, 0.0, 0.5),
            0.0,
            None,
            None,
        );
        assert!(result.is_err());
    }
}
