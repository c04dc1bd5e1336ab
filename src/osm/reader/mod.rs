// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use graph_builder::GraphBuilder;

use super::{Error, JunctionCostConfig, Profile, CAR_PROFILE};
use crate::{ElevationProvider, Graph, NoElevation};

mod graph_builder;
mod model;
mod xml;

pub use model::Way;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format from the first bytes of a file,
    /// returning [FileFormat::Unknown] if the content is not recognized.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(&[0x1F, 0x8B]) {
            return Self::XmlGz;
        }
        if header.starts_with(b"BZh") {
            return Self::XmlBz2;
        }

        let text = header.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(header);
        match text.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'<') => Self::Xml,
            _ => Self::Unknown,
        }
    }
}

/// Additional controls for interpreting OSM data as a routing [Graph].
#[derive(Clone, Copy)]
pub struct Options<'a> {
    /// How OSM features should be interpreted and converted into a [Graph].
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter features by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],

    /// Penalties precomputed for turns through junctions.
    pub junction_costs: JunctionCostConfig<'a>,

    /// Source of node elevations, used for the slope of edges.
    pub elevation: &'a dyn ElevationProvider,
}

impl Default for Options<'static> {
    fn default() -> Self {
        Self {
            profile: &CAR_PROFILE,
            file_format: FileFormat::Unknown,
            bbox: [0.0; 4],
            junction_costs: JunctionCostConfig::DEFAULT,
            elevation: &NoElevation,
        }
    }
}

impl std::fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("profile", &self.profile.name)
            .field("file_format", &self.file_format)
            .field("bbox", &self.bbox)
            .field("junction_costs", &self.junction_costs)
            .finish_non_exhaustive()
    }
}

/// Internal trait for objects which can stream [osm features](model::Feature)
/// from an underlying source.
trait FeatureReader {
    type Error;
    fn next(&mut self) -> Result<Option<model::Feature>, Self::Error>;
}

fn build<F: FeatureReader>(options: &Options<'_>, features: F) -> Result<Graph, Error>
where
    Error: From<F::Error>,
{
    GraphBuilder::new(options).build(features)
}

/// Parse OSM features from a reader into a [Graph] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn graph_from_io<R: io::Read>(options: &Options<'_>, reader: R) -> Result<Graph, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(b.fill_buf()?),
        f => f,
    };

    match format {
        FileFormat::Unknown => Err(Error::UnsupportedFormat),

        FileFormat::Xml => build(options, xml::Reader::from_io(b)),

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            build(options, xml::Reader::from_io(io::BufReader::new(d)))
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            build(options, xml::Reader::from_io(io::BufReader::new(d)))
        }
    }
}

/// Parse OSM features from a file at the provided path into a [Graph] as per the provided [Options].
pub fn graph_from_file<P: AsRef<Path>>(options: &Options<'_>, path: P) -> Result<Graph, Error> {
    let f = File::open(path)?;
    graph_from_io(options, f)
}

/// Parse OSM features from a static buffer into a [Graph] as per the provided [Options].
pub fn graph_from_buffer(options: &Options<'_>, data: &[u8]) -> Result<Graph, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        build(options, xml::Reader::from_buffer(data))
    } else {
        let options = Options {
            file_format: format,
            ..*options
        };
        graph_from_io(&options, io::Cursor::new(data))
    }
}
