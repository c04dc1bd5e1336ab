// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use turncost::osm::{FileFormat, JunctionCostConfig, Options};
use turncost::turn_cost::{
    CombinedTurnCostProvider, DrivingSide, TurnCostConfig, TurnCostProvider,
};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] turncost::osm::Error);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Auto => FileFormat::Unknown,
            Format::Xml => FileFormat::Xml,
            Format::XmlGz => FileFormat::XmlGz,
            Format::XmlBz2 => FileFormat::XmlBz2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    AvoidTurns,
}

/// Imports an OSM file and lists the costs of all turns with stored penalties.
#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Format of the OSM file
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Turn angle thresholds and costs
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Smallest angle (in degrees) considered a turn
    #[arg(long)]
    min_angle: Option<f64>,

    /// Smallest angle (in degrees) considered a sharp turn
    #[arg(long)]
    min_sharp_angle: Option<f64>,

    /// Angles (in degrees) above this are considered U-turns
    #[arg(long)]
    min_u_turn_angle: Option<f64>,

    /// Assume traffic drives on the left side of the road
    #[arg(long)]
    left_hand_traffic: bool,

    /// Save the turn cost table to this file
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Cli {
    fn turn_cost_config(&self) -> TurnCostConfig {
        let base = match self.preset {
            Preset::Default => TurnCostConfig::DEFAULT,
            Preset::AvoidTurns => TurnCostConfig::AVOID_TURNS,
        };

        TurnCostConfig {
            min_angle: self.min_angle.unwrap_or(base.min_angle),
            min_sharp_angle: self.min_sharp_angle.unwrap_or(base.min_sharp_angle),
            min_u_turn_angle: self.min_u_turn_angle.unwrap_or(base.min_u_turn_angle),
            ..base
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let turn_costs = cli.turn_cost_config();
    turn_costs.validate()?;

    let driving_side = if cli.left_hand_traffic {
        DrivingSide::Left
    } else {
        DrivingSide::Right
    };

    let options = Options {
        file_format: cli.format.into(),
        junction_costs: JunctionCostConfig {
            driving_side,
            turn_angles: turn_costs,
            ..JunctionCostConfig::DEFAULT
        },
        ..Options::default()
    };

    let g = load_graph(&options, &cli.osm_file)?;

    if let Some(output) = &cli.output {
        let f = BufWriter::new(File::create(output)?);
        g.turn_costs().write_to(f)?;
        log::info!("turn cost table saved to {}", output.display());
    }

    let provider = CombinedTurnCostProvider::new(&g, turn_costs)?;
    let stored = &g.encoding().turn_cost;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "from_way\tvia_node\tto_way\tstored_s\ttotal_ms")?;
    for (key, flags) in g.turn_costs().iter() {
        let (Some(from), Some(via), Some(to)) = (
            g.get_edge(key.from_edge),
            g.get_node(key.via_node),
            g.get_edge(key.to_edge),
        ) else {
            continue;
        };

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            from.way_id,
            via.osm_id,
            to.way_id,
            stored.get_decimal(false, flags),
            provider.turn_millis(key.from_edge, key.via_node, key.to_edge),
        )?;
    }
    out.flush()?;

    Ok(())
}

fn load_graph<P: AsRef<Path>>(
    options: &Options<'_>,
    path: P,
) -> Result<turncost::Graph, GraphLoadError> {
    turncost::osm::graph_from_file(options, path.as_ref())
        .map_err(|e| GraphLoadError(PathBuf::from(path.as_ref()), e))
}
