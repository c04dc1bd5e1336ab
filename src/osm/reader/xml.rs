// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::str::from_utf8;

use quick_xml::events::{BytesStart, Event};

use super::model;
use super::FeatureReader;

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> IoParser<R> {
    #[inline]
    fn new(reader: R) -> Self {
        Self(quick_xml::Reader::from_reader(reader), Vec::default())
    }
}

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> BufParser<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Self(quick_xml::Reader::from_reader(data))
    }
}

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event<'b>(&'b mut self) -> quick_xml::Result<Event<'b>> {
        self.0.read_event()
    }
}

/// Reader reads osm [Features](model::Feature) from an XML file.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<P: Parser> Reader<P> {
    #[inline]
    fn new(parser: P) -> Self {
        Self { parser, eof: false }
    }
}

impl<P: Parser> FeatureReader for Reader<P> {
    type Error = quick_xml::Error;

    fn next(&mut self) -> Result<Option<model::Feature>, Self::Error> {
        let mut f: Option<model::Feature> = None;

        while !self.eof {
            match self.parser.read_event()? {
                Event::Empty(start) => match start.local_name().as_ref() {
                    b"node" => {
                        if let Some(n) = parse_node(&start) {
                            return Ok(Some(model::Feature::Node(n)));
                        }
                    }
                    // "way" or "relation" can't be self-closing
                    b"tag" => {
                        if let Some(tags) = feature_tags(&mut f) {
                            if let Some((k, v)) = parse_tag(&start) {
                                tags.insert(k, v);
                            }
                        }
                    }
                    b"nd" => {
                        if let Some(nodes) = feature_nodes(&mut f) {
                            if let Some(ref_) = parse_nd(&start) {
                                nodes.push(ref_);
                            }
                        }
                    }
                    b"member" => {
                        if let Some(members) = feature_members(&mut f) {
                            if let Some(member) = parse_member(&start) {
                                members.push(member);
                            }
                        }
                    }
                    _ => {}
                },

                Event::Start(start) => match start.local_name().as_ref() {
                    b"node" => f = parse_node(&start).map(model::Feature::Node),
                    b"way" => f = parse_way(&start).map(model::Feature::Way),
                    b"relation" => f = parse_relation(&start).map(model::Feature::Relation),
                    // "tag", "nd" and "member" must be self-closing
                    _ => {}
                },

                Event::End(end) => match end.local_name().as_ref() {
                    b"node" | b"way" | b"relation" => {
                        if let Some(f) = f.take() {
                            return Ok(Some(f));
                        }
                    }
                    _ => {}
                },

                Event::Eof => self.eof = true,

                _ => {}
            }
        }

        Ok(f)
    }
}

impl<'a> Reader<BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self::new(BufParser::new(data))
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R) -> Self {
        Self::new(IoParser::new(reader))
    }
}

fn parse_attr<T: std::str::FromStr>(value: &[u8]) -> Option<T> {
    from_utf8(value).ok()?.parse().ok()
}

fn parse_id(start: &BytesStart<'_>, element: &str) -> Option<i64> {
    let mut id: i64 = 0;

    for attr in start.attributes().flatten() {
        if attr.key.as_ref() == b"id" {
            id = parse_attr(&attr.value).unwrap_or(0);
        }
    }

    if id != 0 {
        Some(id)
    } else {
        log::debug!("skipping {element} without a valid id");
        None
    }
}

fn parse_node(start: &BytesStart<'_>) -> Option<model::Node> {
    let mut id: i64 = 0;
    let mut lat = f64::NAN;
    let mut lon = f64::NAN;

    for attr in start.attributes().flatten() {
        match attr.key.as_ref() {
            b"id" => id = parse_attr(&attr.value).unwrap_or(0),
            b"lat" => lat = parse_attr(&attr.value).unwrap_or(f64::NAN),
            b"lon" => lon = parse_attr(&attr.value).unwrap_or(f64::NAN),
            _ => {}
        }
    }

    if id != 0 && lat.is_finite() && lon.is_finite() {
        Some(model::Node {
            id,
            lat,
            lon,
            tags: HashMap::default(),
        })
    } else {
        log::debug!("skipping node {id} without a valid id or position");
        None
    }
}

fn parse_way(start: &BytesStart<'_>) -> Option<model::Way> {
    parse_id(start, "way").map(|id| model::Way {
        id,
        nodes: Vec::default(),
        tags: HashMap::default(),
    })
}

fn parse_relation(start: &BytesStart<'_>) -> Option<model::Relation> {
    parse_id(start, "relation").map(|id| model::Relation {
        id,
        members: Vec::default(),
        tags: HashMap::default(),
    })
}

fn parse_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in start.attributes().flatten() {
        match attr.key.as_ref() {
            b"k" => k = attr.unescape_value().ok().map(|s| s.into_owned()),
            b"v" => v = attr.unescape_value().ok().map(|s| s.into_owned()),
            _ => {}
        }
    }

    k.map(|k| (k, v.unwrap_or_default()))
}

fn parse_nd(start: &BytesStart<'_>) -> Option<i64> {
    start
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"ref")
        .and_then(|attr| parse_attr::<i64>(&attr.value))
        .filter(|&ref_| ref_ != 0)
}

fn parse_member(start: &BytesStart<'_>) -> Option<model::RelationMember> {
    let mut ref_: i64 = 0;
    let mut type_ = None;
    let mut role = None;

    for attr in start.attributes().flatten() {
        match attr.key.as_ref() {
            b"ref" => ref_ = parse_attr(&attr.value).unwrap_or(0),
            b"type" => type_ = parse_feature_type(&attr.value),
            b"role" => role = from_utf8(&attr.value).ok().map(|s| s.to_string()),
            _ => {}
        }
    }

    match (ref_, type_, role) {
        (0, _, _) => None,
        (ref_, Some(type_), Some(role)) => Some(model::RelationMember { type_, ref_, role }),
        _ => None,
    }
}

fn parse_feature_type(s: &[u8]) -> Option<model::FeatureType> {
    match s {
        b"node" => Some(model::FeatureType::Node),
        b"way" => Some(model::FeatureType::Way),
        b"relation" => Some(model::FeatureType::Relation),
        _ => None,
    }
}

fn feature_tags(f: &mut Option<model::Feature>) -> Option<&mut HashMap<String, String>> {
    match f {
        None => None,
        Some(model::Feature::Node(ref mut n)) => Some(&mut n.tags),
        Some(model::Feature::Way(ref mut w)) => Some(&mut w.tags),
        Some(model::Feature::Relation(ref mut r)) => Some(&mut r.tags),
    }
}

fn feature_nodes(f: &mut Option<model::Feature>) -> Option<&mut Vec<i64>> {
    match f {
        Some(model::Feature::Way(ref mut w)) => Some(&mut w.nodes),
        _ => None,
    }
}

fn feature_members(f: &mut Option<model::Feature>) -> Option<&mut Vec<model::RelationMember>> {
    match f {
        Some(model::Feature::Relation(ref mut r)) => Some(&mut r.members),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::model::{Feature, FeatureType, Node, Relation, RelationMember, Way};
    use super::*;

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    const JUNCTION_XML: &[u8] = include_bytes!("test_fixtures/junction.osm");

    fn collect_all<F: FeatureReader>(
        mut features: F,
    ) -> Result<(Vec<Node>, Vec<Way>, Vec<Relation>), F::Error> {
        let mut nodes = Vec::default();
        let mut ways = Vec::default();
        let mut relations = Vec::default();

        while let Some(f) = features.next()? {
            match f {
                Feature::Node(n) => nodes.push(n),
                Feature::Way(w) => ways.push(w),
                Feature::Relation(r) => relations.push(r),
            }
        }

        Ok((nodes, ways, relations))
    }

    fn check_against_expected<F: FeatureReader>(features: F) -> Result<(), F::Error> {
        let (nodes, ways, relations) = collect_all(features)?;

        assert_eq!(nodes.len(), 9);
        assert_eq!(
            nodes[0],
            Node {
                id: -1,
                lat: 52.0,
                lon: 21.0,
                tags: tags! {},
            },
        );
        assert_eq!(nodes[1].tags, tags! {"highway": "traffic_signals"});
        assert_eq!(
            nodes.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![-1, -2, -3, -4, -5, -6, -7, -8, -9],
        );

        assert_eq!(ways.len(), 7);
        assert_eq!(
            ways[0],
            Way {
                id: -100,
                nodes: vec![-4, -2, -5],
                tags: tags! {"highway": "trunk", "lanes": "2", "name": "Trunk A&B"},
            },
        );
        assert_eq!(ways[5].nodes, vec![-2, -9]);
        assert_eq!(ways[6].tags, tags! {"highway": "footway"});

        assert_eq!(relations.len(), 2);
        assert_eq!(
            relations[0],
            Relation {
                id: -200,
                members: vec![
                    RelationMember {
                        type_: FeatureType::Way,
                        ref_: -105,
                        role: "from".to_string(),
                    },
                    RelationMember {
                        type_: FeatureType::Node,
                        ref_: -2,
                        role: "via".to_string(),
                    },
                    RelationMember {
                        type_: FeatureType::Way,
                        ref_: -101,
                        role: "to".to_string(),
                    },
                ],
                tags: tags! {"restriction": "no_right_turn", "type": "restriction"},
            },
        );
        assert_eq!(relations[1].tags.get("except").map(String::as_str), Some("motorcar"));

        Ok(())
    }

    #[test]
    fn parse_from_buf() -> Result<(), quick_xml::Error> {
        check_against_expected(Reader::from_buffer(JUNCTION_XML))
    }

    #[test]
    fn parse_from_io() -> Result<(), quick_xml::Error> {
        check_against_expected(Reader::from_io(io::Cursor::new(JUNCTION_XML)))
    }

    #[test]
    fn skips_invalid_elements() -> Result<(), quick_xml::Error> {
        const DATA: &[u8] = br#"<osm>
            <node id="1" lat="x" lon="2"/>
            <node id="0" lat="1" lon="2"/>
            <node id="2" lat="1" lon="2"/>
            <way id="abc"><nd ref="1"/><tag k="highway" v="primary"/></way>
        </osm>"#;
        let (nodes, ways, relations) = collect_all(Reader::from_buffer(DATA))?;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, 2);
        assert!(ways.is_empty());
        assert!(relations.is_empty());
        Ok(())
    }
}
